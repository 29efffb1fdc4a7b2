use crate::domain::error::Result;
use crate::domain::timestamp::Zone;
use crate::infrastructure::json_store::{TextEncoding, WriteOptions};
use serde::Deserialize;

const DEFAULT_CONFIG: &str = "config/energy-timeseries";
const ENV_PREFIX: &str = "ENERGY_TIMESERIES";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub pretty: bool,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            encoding: default_encoding(),
            log_level: default_log_level(),
            pretty: false,
        }
    }
}

impl Settings {
    pub fn zone(&self) -> Result<Zone> {
        self.timezone.parse()
    }

    pub fn text_encoding(&self) -> Result<TextEncoding> {
        self.encoding.parse()
    }

    pub fn write_options(&self) -> Result<WriteOptions> {
        Ok(WriteOptions {
            encoding: self.text_encoding()?,
            pretty: self.pretty,
        })
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(DEFAULT_CONFIG)
}

/// Load settings from an optional file (any format the `config` crate
/// recognizes by extension) with `ENERGY_TIMESERIES_*` environment overrides.
pub fn load_settings_from(name: &str) -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(name).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let name = dir.path().join("absent");
        let settings = load_settings_from(name.to_str().unwrap()).unwrap();

        assert_eq!(settings.timezone, "UTC");
        assert_eq!(settings.zone().unwrap(), Zone::Utc);
        assert_eq!(settings.text_encoding().unwrap(), TextEncoding::Utf8);
        assert!(!settings.pretty);
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("meters.toml"),
            "timezone = \"Europe/Brussels\"\nencoding = \"latin-1\"\npretty = true\n",
        )
        .unwrap();

        let name = dir.path().join("meters");
        let settings = load_settings_from(name.to_str().unwrap()).unwrap();

        assert_eq!(settings.zone().unwrap(), Zone::Named(chrono_tz::Europe::Brussels));
        let options = settings.write_options().unwrap();
        assert_eq!(options.encoding, TextEncoding::Latin1);
        assert!(options.pretty);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_invalid_values_surface_on_use() {
        let settings = Settings {
            timezone: "Atlantis/Capital".to_string(),
            encoding: "ebcdic".to_string(),
            ..Settings::default()
        };
        assert!(settings.zone().is_err());
        assert!(settings.write_options().is_err());
    }
}
