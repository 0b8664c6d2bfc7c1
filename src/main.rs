use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = outlook::cli::Cli::parse();
    outlook::logging::init(cli.verbose);

    if let Err(err) = outlook::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
