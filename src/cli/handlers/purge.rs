//! Purge command handler

use crate::domains::Domain;
use crate::error::AppResult;
use crate::services::GeoDataService;
use crate::store::WriteOutcome;

/// Handler for the purge command
pub struct PurgeCommandHandler {
    service: GeoDataService,
}

impl PurgeCommandHandler {
    pub fn new(service: GeoDataService) -> Self {
        Self { service }
    }

    /// Purge one layer, or every layer when `domain` is `None`.
    ///
    /// Never fails: entries that could not be deleted are reported.
    pub async fn execute(&self, domain: Option<Domain>) -> AppResult<()> {
        for line in self.purge(domain).await {
            println!("{}", line);
        }
        Ok(())
    }

    pub async fn purge(&self, domain: Option<Domain>) -> Vec<String> {
        let outcomes = match domain {
            Some(domain) => vec![(domain, self.service.purge(domain).await)],
            None => self.service.purge_all().await,
        };

        outcomes
            .into_iter()
            .map(|(domain, outcome)| {
                let status = match outcome {
                    WriteOutcome::Primary => "purged",
                    WriteOutcome::Fallback => "purged from fallback store",
                    WriteOutcome::Dropped => "could not be purged",
                };
                format!("{}: {}", domain, status)
            })
            .collect()
    }
}
