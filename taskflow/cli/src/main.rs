use clap::Parser;
use sea_orm::Database;
use std::sync::Arc;
use std::time::Duration;
use taskflow_cli::{Cli, config::ClientConfig, run};
use taskflow_server::enhancement::{TitleEnhancer, WebhookEnhancer};
use taskflow_server::session::TaskSession;
use taskflow_server::store::DatabaseTaskStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let config = ClientConfig::from_env()?;

    let db = Database::connect(&config.db_url).await?;
    let store = Arc::new(DatabaseTaskStore::new(db));
    let enhancer = match config.enhancement_url.as_deref() {
        Some(url) if !url.trim().is_empty() => {
            let enhancer = WebhookEnhancer::new(
                url.trim(),
                Duration::from_secs(config.enhancement_timeout_secs),
            )?;
            Some(Arc::new(enhancer) as Arc<dyn TitleEnhancer>)
        }
        _ => None,
    };

    let mut session = TaskSession::new(store, enhancer);
    run(args.command, &mut session, &mut std::io::stdout()).await
}
