//! Stats command handler

use crate::domains::Domain;
use crate::error::AppResult;
use crate::geo::CollectionStats;
use crate::services::GeoDataService;

/// Handler for the stats command
pub struct StatsCommandHandler {
    service: GeoDataService,
}

impl StatsCommandHandler {
    pub fn new(service: GeoDataService) -> Self {
        Self { service }
    }

    pub async fn execute(&self, domain: Domain) -> AppResult<()> {
        let stats = self.service.stats(domain).await?;
        println!("{}", summary(domain, &stats));
        Ok(())
    }
}

fn summary(domain: Domain, stats: &CollectionStats) -> String {
    match stats.total_area_ha {
        Some(total) => format!(
            "{}: {} features, {:.2} ha total",
            domain, stats.feature_count, total
        ),
        None => format!("{}: {} features", domain, stats.feature_count),
    }
}
