use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "outlook", version, about = "Microsoft Graph mail, calendar and contacts tools")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Profile name to use"
    )]
    pub profile: String,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[arg(long, global = true, help = "Credential broker connection id")]
    pub connection_id: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the available tools.
    Tools(ToolsArgs),
    /// Invoke one tool and print its result envelope.
    Call(CallArgs),
    /// Run the JSON-RPC tool server on stdin/stdout.
    Serve,
}

#[derive(Debug, Args)]
pub struct ToolsArgs {
    #[arg(long, help = "Include each tool's input schema")]
    pub schema: bool,
}

#[derive(Debug, Args)]
pub struct CallArgs {
    #[arg(help = "Tool name, e.g. get_all_calendars")]
    pub tool: String,
    #[arg(long, conflicts_with = "args_file", help = "Tool arguments as a JSON object")]
    pub args: Option<String>,
    #[arg(long, help = "Read tool arguments from a JSON file")]
    pub args_file: Option<PathBuf>,
}
