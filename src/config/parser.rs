use super::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn parse_config(path: &PathBuf) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

pub fn save_config(config: &Config, path: &PathBuf) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config() {
        let config_content = r#"
[backend]
url = "http://waf-control.internal:8080"

[logging]
level = "debug"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        let path = PathBuf::from(temp_file.path());

        let config = parse_config(&path).unwrap();
        assert_eq!(config.backend.url, "http://waf-control.internal:8080");
        assert_eq!(config.logging.level, "debug");
        // Omitted fields fall back to defaults.
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.console.page_size, 100);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"").unwrap();
        let path = PathBuf::from(temp_file.path());

        let config = parse_config(&path).unwrap();
        assert_eq!(config.backend.url, "http://127.0.0.1:8080");
        assert_eq!(config.console.default_time_range_hours, 24);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let mut config = Config::default();
        config.backend.url = "https://waf.example.com".to_string();

        let temp_file = NamedTempFile::new().unwrap();
        let path = PathBuf::from(temp_file.path());
        save_config(&config, &path).unwrap();

        let reloaded = parse_config(&path).unwrap();
        assert_eq!(reloaded.backend.url, "https://waf.example.com");
    }
}
