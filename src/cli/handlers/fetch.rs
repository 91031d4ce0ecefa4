//! Fetch command handler
//!
//! Resolves one layer or all of them and writes the GeoJSON to stdout or a file.

use std::path::Path;

use serde_json::{Map, Value};

use crate::cli::parser::FetchTarget;
use crate::error::{AppError, AppResult};
use crate::services::GeoDataService;

/// Handler for the fetch command
pub struct FetchCommandHandler {
    service: GeoDataService,
}

impl FetchCommandHandler {
    pub fn new(service: GeoDataService) -> Self {
        Self { service }
    }

    /// Resolve `target` and write it out.
    ///
    /// With `all`, layers that loaded are written even when others failed;
    /// the first failure is returned afterwards.
    pub async fn execute(
        &self,
        target: FetchTarget,
        output: Option<&Path>,
        pretty: bool,
    ) -> AppResult<()> {
        let (document, failure) = match target.domain() {
            Some(domain) => (to_value(&self.service.fetch(domain).await?)?, None),
            None => self.fetch_all().await?,
        };

        let json = if pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        }
        .map_err(|e| AppError::Internal { source: e.into() })?;

        write_output(output, json).await?;

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn fetch_all(&self) -> AppResult<(Value, Option<AppError>)> {
        let mut layers = Map::new();
        let mut failure = None;

        for (domain, result) in self.service.fetch_all().await {
            match result {
                Ok(collection) => {
                    layers.insert(domain.to_string(), to_value(&collection)?);
                }
                Err(error) => {
                    tracing::error!(domain = %domain, error = %error, "Layer unavailable");
                    failure.get_or_insert(error);
                }
            }
        }

        Ok((Value::Object(layers), failure))
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal { source: e.into() })
}

async fn write_output(output: Option<&Path>, json: String) -> AppResult<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, json + "\n")
                .await
                .map_err(|e| AppError::Internal {
                    source: anyhow::Error::from(e)
                        .context(format!("writing {}", path.display())),
                })?;
            tracing::info!(path = %path.display(), "GeoJSON written");
        }
        None => println!("{}", json),
    }
    Ok(())
}
