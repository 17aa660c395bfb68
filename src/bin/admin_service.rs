use anyhow::Result;
use evco::{models::ServiceKind, startup::run_service};

#[tokio::main]
async fn main() -> Result<()> {
    run_service(ServiceKind::Admin).await
}
