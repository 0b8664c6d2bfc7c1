use crate::context::AppContext;
use crate::error::AppResult;
use crate::server;

pub async fn run(ctx: &AppContext) -> AppResult<()> {
    if ctx.outlook.default_connection().is_none() {
        tracing::warn!("no default connection configured; every call must pass connection_id");
    }
    server::serve_stdio(&ctx.registry, &ctx.outlook).await
}
