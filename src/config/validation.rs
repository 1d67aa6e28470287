use crate::config::types::{Config, Field, ListingConfig, SelectorConfig, SinkConfig, Strategy, TimingConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Schema names SQLite reserves for itself
const RESERVED_NAMESPACES: &[&str] = &["main", "temp"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_listing_config(&config.listing)?;
    validate_timing_config(&config.timing)?;
    validate_selectors(&config.selectors)?;
    validate_sink_config(&config.sink)?;
    Ok(())
}

/// Validates the listing section
fn validate_listing_config(config: &ListingConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid listing url '{}': {}", config.url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Listing url '{}' must use http or https",
            config.url
        )));
    }

    validate_css("link-selector", &config.link_selector)?;
    if let Some(ready) = &config.ready_selector {
        validate_css("ready-selector", ready)?;
    }

    Ok(())
}

/// Validates timing configuration
fn validate_timing_config(config: &TimingConfig) -> Result<(), ConfigError> {
    if config.retry_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "retry-attempts must be >= 1, got {}",
            config.retry_attempts
        )));
    }

    if config.progress_every < 1 {
        return Err(ConfigError::Validation(format!(
            "progress-every must be >= 1, got {}",
            config.progress_every
        )));
    }

    if config.max_scrolls == Some(0) {
        return Err(ConfigError::Validation(
            "max-scrolls must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates every strategy of every fallback chain
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    for field in Field::ALL {
        for strategy in config.chain(field) {
            validate_css(field.name(), strategy.selector())?;

            if let Strategy::Attribute { attribute, .. } = strategy {
                if attribute.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "attribute strategy for {} needs a non-empty attribute name",
                        field.name()
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Validates sink parameters that are present
///
/// Absent parameters are accepted here; the sink reports them when it is
/// connected.
fn validate_sink_config(config: &SinkConfig) -> Result<(), ConfigError> {
    if let Some(endpoint) = &config.endpoint {
        if endpoint.trim().is_empty() {
            return Err(ConfigError::Validation(
                "sink endpoint cannot be empty".to_string(),
            ));
        }
    }

    for (key, value) in [("database", &config.database), ("collection", &config.collection)] {
        if let Some(name) = value {
            validate_identifier(key, name)?;
        }
    }

    if let Some(database) = &config.database {
        if RESERVED_NAMESPACES.contains(&database.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "sink database '{}' is reserved",
                database
            )));
        }
    }

    Ok(())
}

/// Sink names are spliced into SQL, so only plain identifiers are allowed
fn validate_identifier(key: &str, name: &str) -> Result<(), ConfigError> {
    let mut chars = name.chars();
    let starts_well = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);

    if !starts_well || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::Validation(format!(
            "sink {} must be a plain identifier (letters, digits, underscores), got '{}'",
            key, name
        )));
    }

    Ok(())
}

/// Checks that a selector parses as CSS
fn validate_css(field: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector {
            field: field.to_string(),
            message: "selector cannot be empty".to_string(),
        });
    }

    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        field: field.to_string(),
        message: format!("'{}': {:?}", selector, e),
    })?;

    Ok(())
}
