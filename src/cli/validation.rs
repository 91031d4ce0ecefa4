//! CLI argument validation functions
//!
//! Custom value parsers for arguments that clap cannot validate on its own.

use std::fs;
use std::path::PathBuf;

use crate::domains::Domain;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!(
            "Cannot read configuration file '{}': {}",
            path_str, e
        )),
    }
}

/// Validate that an output file can be created: its parent directory must exist
pub fn validate_output_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str.trim());

    if path.as_os_str().is_empty() {
        return Err("Output path cannot be empty".to_string());
    }

    if path.is_dir() {
        return Err(format!("Output path is a directory: '{}'", path_str));
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.is_dir()
    {
        return Err(format!(
            "Output directory does not exist: '{}'",
            parent.display()
        ));
    }

    Ok(path)
}

/// Validate an API origin: http or https, with a host
pub fn validate_base_url(url_str: &str) -> Result<String, String> {
    let url = url_str.trim();

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| format!("Base URL must start with http:// or https://, got: '{}'", url))?;

    if rest.is_empty() || rest.starts_with('/') {
        return Err(format!("Base URL has no host: '{}'", url));
    }

    if url.contains(char::is_whitespace) {
        return Err("Base URL cannot contain spaces".to_string());
    }

    Ok(url.trim_end_matches('/').to_string())
}

/// Parse a domain name (case-insensitive)
pub fn validate_domain(domain_str: &str) -> Result<Domain, String> {
    domain_str.parse::<Domain>().map_err(|e| e.to_string())
}
