use clap::Parser;

use geoportal_cache::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = cli::load_and_merge_config(&cli)?;
    cli::init_logger_from_settings(&settings)?;

    tracing::debug!(
        version = geoportal_cache::pkg_version(),
        application = %settings.application.name,
        "Starting"
    );

    cli::execute_command(&cli, settings).await?;
    Ok(())
}
