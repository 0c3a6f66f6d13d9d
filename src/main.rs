use anyhow::Context;
use clap::Parser;
use news_relay::cli::{Cli, EventKind};
use news_relay::{
    ConsoleTransport, HttpListingFetcher, InboundEvent, NewsRelay, RelayConfig, SeenStore,
    Transport, WebhookTransport,
};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Cli::parse();
    let config = RelayConfig::load(Path::new(&args.config))
        .with_context(|| format!("loading config from {}", args.config))?;
    info!("Loaded configuration from {}", args.config);

    let fetcher = HttpListingFetcher::new(&config)?;
    let transport: Box<dyn Transport> = match &config.webhook_url {
        Some(endpoint) => {
            info!("Delivering through webhook at {}", endpoint);
            Box::new(WebhookTransport::new(endpoint)?)
        }
        None => {
            info!("No webhook configured, delivering to console");
            Box::new(ConsoleTransport)
        }
    };

    let relay = NewsRelay::new(
        Box::new(fetcher),
        transport,
        SeenStore::new(&config.state_file),
        config.send_pause(),
    );

    let event = match args.event {
        EventKind::Start => InboundEvent::Start { user_id: args.user },
        EventKind::News => InboundEvent::RequestNews { user_id: args.user },
    };

    if let Some(report) = relay.handle(event).await? {
        info!(
            "Request {} complete: delivered {} of {} fetched articles to user {}",
            report.request_id, report.delivered, report.fetched, report.user_id
        );
    }

    Ok(())
}
