use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use annotator::{
    cli::{self, Cli},
    Config, NAME, VERSION,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Chargement de la configuration (.env puis variables d'environnement)
    let config = Config::from_env()?;

    // Initialisation du logging
    setup_tracing(&config.log_level, &config.log_format);
    info!("🚀 {} v{}", NAME, VERSION);

    if let Err(e) = cli::run(cli.command, config).await {
        error!("❌ {:#}", e);
        return Err(e);
    }

    Ok(())
}

/// Configure le tracing pour le logging structuré
fn setup_tracing(log_level: &str, log_format: &str) {
    let level = log_level.parse().unwrap_or(tracing::Level::INFO);
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let registry = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_line_number(true)
                    .with_file(true),
            )
            .init();
    }
}
