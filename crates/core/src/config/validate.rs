use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Crew roster and fleet are non-empty with unique, non-blank names
/// - Transit range is ordered
/// - Service URLs use http(s)
/// - Traffic interval is non-zero when the generator is enabled
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    validate_names(
        "crew.members",
        config.crew.members.iter().map(|m| m.name.as_str()),
    )?;
    validate_names("ship.fleet", config.ship.fleet.iter().map(|s| s.name.as_str()))?;

    if config.dispatch.transit_min_ms > config.dispatch.transit_max_ms {
        return Err(ConfigError::ValidationError(format!(
            "dispatch.transit_min_ms ({}) exceeds dispatch.transit_max_ms ({})",
            config.dispatch.transit_min_ms, config.dispatch.transit_max_ms
        )));
    }

    let services = &config.services;
    for (key, url) in [
        ("services.crew_url", &services.crew_url),
        ("services.ship_url", &services.ship_url),
        ("services.package_url", &services.package_url),
    ] {
        if let Some(url) = url {
            if !is_http_url(url) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be an http(s) URL, got {:?}",
                    key, url
                )));
            }
        }
    }

    if config.traffic.enabled {
        if config.traffic.interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "traffic.interval_ms cannot be 0".to_string(),
            ));
        }
        if !is_http_url(&config.traffic.target_url) {
            return Err(ConfigError::ValidationError(format!(
                "traffic.target_url must be an http(s) URL, got {:?}",
                config.traffic.target_url
            )));
        }
    }

    Ok(())
}

fn validate_names<'a>(
    section: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} contains a blank name",
                section
            )));
        }
        if !seen.insert(name) {
            return Err(ConfigError::ValidationError(format!(
                "{} contains duplicate name {:?}",
                section, name
            )));
        }
    }

    if seen.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{} cannot be empty",
            section
        )));
    }

    Ok(())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
