//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{
    FetchCommandHandler, InfoCommandHandler, PurgeCommandHandler, StatsCommandHandler,
};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::services::GeoDataService;

/// Execute a CLI command with the given settings
///
/// Builds the service from `settings`, opens its store and dispatches to the
/// command's handler.
///
/// # Errors
/// Returns errors from service construction or the command handler
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    let service = GeoDataService::new(&settings)?;
    service.init().await;

    tracing::debug!(
        base_url = %settings.http.base_url,
        backend = service.primary_backend(),
        "Service ready"
    );

    execute_with_service(&cli.command, service).await
}

/// Dispatch `command` against an already constructed service
pub async fn execute_with_service(command: &Commands, service: GeoDataService) -> AppResult<()> {
    match command {
        Commands::Fetch {
            target,
            output,
            pretty,
        } => {
            FetchCommandHandler::new(service)
                .execute(*target, output.as_deref(), *pretty)
                .await
        }
        Commands::Info { domain } => InfoCommandHandler::new(service).execute(*domain).await,
        Commands::Purge { domain, all } => {
            let domain = if *all { None } else { *domain };
            PurgeCommandHandler::new(service).execute(domain).await
        }
        Commands::Stats { domain } => StatsCommandHandler::new(service).execute(*domain).await,
    }
}
