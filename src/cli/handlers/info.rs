//! Info command handler
//!
//! Prints the cache state of one layer or all of them.

use std::fmt::Write;

use crate::domains::{CacheInfo, Domain};
use crate::error::AppResult;
use crate::services::GeoDataService;

/// Handler for the info command
pub struct InfoCommandHandler {
    service: GeoDataService,
}

impl InfoCommandHandler {
    pub fn new(service: GeoDataService) -> Self {
        Self { service }
    }

    pub async fn execute(&self, domain: Option<Domain>) -> AppResult<()> {
        print!("{}", self.report(domain).await);
        Ok(())
    }

    /// Human readable report, one block per layer.
    pub async fn report(&self, domain: Option<Domain>) -> String {
        let domains = match domain {
            Some(domain) => vec![domain],
            None => Domain::ALL.to_vec(),
        };

        let mut report = String::new();
        for domain in domains {
            let info = self.service.cache_info(domain).await;
            render(&mut report, domain, &info);
        }
        report
    }
}

fn render(out: &mut String, domain: Domain, info: &CacheInfo) {
    if !info.has_cache {
        let _ = writeln!(out, "{}: not cached", domain);
        return;
    }

    let state = if info.is_expired { "expired" } else { "fresh" };
    let _ = writeln!(out, "{}: cached, {}", domain, state);

    if let Some(stored_at) = info.stored_at {
        let _ = writeln!(out, "  stored at:   {}", stored_at);
    }
    if let Some(age) = info.age_minutes {
        let _ = writeln!(out, "  age:         {} min", age);
    }
    if let Some(expires_in) = info.expires_in_minutes {
        let _ = writeln!(out, "  expires in:  {} min", expires_in);
    }
    if let Some(size_kb) = info.size_kb {
        let _ = writeln!(out, "  size:        {:.2} KB", size_kb);
    }
    if let Some(version) = &info.schema_version {
        let _ = writeln!(out, "  schema:      {}", version);
    }
}
