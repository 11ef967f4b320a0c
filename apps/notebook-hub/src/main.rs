use clap::Parser;
use notebook_hub::cli::{Cli, run};
use notebook_hub::config::HubConfig;
use notebook_hub::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = std::env::var("HUB_LOG").ok();
    init_logging(filter.as_deref(), cli.log_format)?;

    let cfg = HubConfig::load(cli.config.as_deref(), |name| std::env::var(name).ok())?;
    tracing::debug!(backends = cfg.backends.len(), "Configuration loaded");

    run(
        &cfg,
        &cli.command,
        &mut std::io::stdin().lock(),
        &mut std::io::stdout().lock(),
    )
}
