use super::Config;
use anyhow::Result;

pub fn validate_config(config: &Config) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if !config.backend.url.starts_with("http://") && !config.backend.url.starts_with("https://") {
        warnings.push(format!(
            "[X] Backend URL must start with http:// or https://: {}",
            config.backend.url
        ));
    }

    if config.backend.timeout_secs == 0 {
        warnings.push("[X] Backend timeout cannot be 0".to_string());
    }

    if config.backend.timeout_secs > 60 {
        warnings.push(format!(
            "[!] Backend timeout ({}s) is unusually high. The console blocks on each request.",
            config.backend.timeout_secs
        ));
    }

    if !["trace", "debug", "info", "warn", "error"].contains(&config.logging.level.as_str()) {
        warnings.push(format!(
            "[X] Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
            config.logging.level
        ));
    }

    if !["json", "pretty"].contains(&config.logging.format.as_str()) {
        warnings.push(format!(
            "[X] Invalid log format: {}. Must be 'json' or 'pretty'",
            config.logging.format
        ));
    }

    if config.console.refresh_interval_secs == 0 {
        warnings.push("[!] Refresh interval is 0. The console will hammer the backend.".to_string());
    }

    if config.console.page_size == 0 {
        warnings.push("[X] Page size cannot be 0".to_string());
    }

    if config.console.page_size > 1000 {
        warnings.push(format!(
            "[!] Page size ({}) is more than the backend's usual maximum (1000)",
            config.console.page_size
        ));
    }

    if config.console.default_time_range_hours <= 0 {
        warnings.push("[X] Default time range must be at least 1 hour".to_string());
    }

    Ok(warnings)
}
