//! Site-level settings consumed by the filters
//!
//! ```toml
//! timezone = "+02:00"
//!
//! [markdown]
//! footnotes = true
//! smart_punctuation = true
//! ```

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

use crate::time::{parse_zone, Zone};
use crate::{Error, Result};

/// Host configuration
///
/// Every field has a default, so an empty document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The host timezone as a zone designation (`UTC`, `+02:00`, `-0500`, ...)
    ///
    /// Used for epoch seconds and for date text without an offset. Unset means UTC.
    pub timezone: Option<String>,
    pub markdown: MarkdownConfig,
}

impl Config {
    /// Reads a configuration from TOML source
    #[cfg(feature = "config")]
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Config =
            basic_toml::from_str(source).map_err(|err| Error::Config(err.to_string()))?;
        config.local_offset()?;
        Ok(config)
    }

    /// The host timezone as a numeric offset
    pub fn local_offset(&self) -> Result<FixedOffset> {
        let Some(timezone) = self.timezone.as_deref() else {
            return Ok(Utc.fix());
        };
        match parse_zone(timezone) {
            Some(Zone::Utc) => Ok(Utc.fix()),
            Some(Zone::Fixed(offset)) => Ok(offset),
            None => Err(Error::Config(format!(
                "timezone {timezone:?} is not a zone designation such as \"UTC\" or \"+02:00\""
            ))),
        }
    }
}

/// Markdown extensions, on top of plain CommonMark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    pub tables: bool,
    pub strikethrough: bool,
    pub footnotes: bool,
    pub smart_punctuation: bool,
    pub tasklists: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            footnotes: false,
            smart_punctuation: false,
            tasklists: false,
        }
    }
}

#[cfg(all(test, feature = "config"))]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_empty() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.local_offset().unwrap(), Utc.fix());
        assert!(config.markdown.tables);
        assert!(!config.markdown.footnotes);
    }

    #[test]
    fn test_timezone() {
        let config = Config::from_toml(r#"timezone = "+02:00""#).unwrap();
        assert_eq!(
            config.local_offset().unwrap(),
            FixedOffset::east_opt(2 * 3600).unwrap()
        );
        let config = Config::from_toml(r#"timezone = "-0530""#).unwrap();
        assert_eq!(
            config.local_offset().unwrap(),
            FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap()
        );
        let config = Config::from_toml(r#"timezone = "UTC""#).unwrap();
        assert_eq!(config.local_offset().unwrap(), Utc.fix());
    }

    #[test]
    fn test_markdown_section() {
        let config = Config::from_toml(
            r#"
            [markdown]
            strikethrough = false
            tasklists = true
            "#,
        )
        .unwrap();
        assert!(config.markdown.tables);
        assert!(!config.markdown.strikethrough);
        assert!(config.markdown.tasklists);
    }

    #[test]
    fn test_invalid() {
        assert_matches!(
            Config::from_toml(r#"timezone = "Mars/Olympus""#),
            Err(Error::Config(_))
        );
        assert_matches!(Config::from_toml("timezone = 3"), Err(Error::Config(_)));
        assert_matches!(Config::from_toml("colour = true"), Err(Error::Config(_)));
    }
}
