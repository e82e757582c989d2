use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::layout::{GeometryOverrides, LayoutConfig};

const DEFAULT_LAYOUT_TIMEOUT_MS: u64 = 5_000;

/// Application configuration loaded from environment variables.
/// Every variable is optional; unset values fall back to the A4 defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub layout: LayoutConfig,
    pub layout_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Fails on unparsable
    /// values or on a geometry that cannot be laid out.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides = GeometryOverrides {
            page_width: parse_optional(&lookup, "PAGE_WIDTH_MM")?,
            page_height: parse_optional(&lookup, "PAGE_HEIGHT_MM")?,
            margin: parse_optional(&lookup, "PAGE_MARGIN_MM")?,
            content_top: parse_optional(&lookup, "CONTENT_TOP_MM")?,
            footer_reserve: parse_optional(&lookup, "FOOTER_RESERVE_MM")?,
        };

        let mut layout = LayoutConfig::default();
        layout.geometry = layout.geometry.with_overrides(&overrides);
        if let Some(text) = lookup("FOOTER_TEXT") {
            layout.footer_text = text;
        }
        layout
            .validate()
            .context("Layout configuration from environment is invalid")?;

        let timeout_ms: u64 =
            parse_optional(&lookup, "LAYOUT_TIMEOUT_MS")?.unwrap_or(DEFAULT_LAYOUT_TIMEOUT_MS);

        Ok(Config {
            layout,
            layout_timeout: Duration::from_millis(timeout_ms),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_optional<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.layout_timeout, Duration::from_millis(5_000));
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_geometry_and_footer_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PAGE_HEIGHT_MM", "279.4"),
            ("PAGE_WIDTH_MM", " 215.9 "),
            ("FOOTER_TEXT", "© Acme"),
            ("LAYOUT_TIMEOUT_MS", "250"),
        ]))
        .unwrap();
        assert!((config.layout.geometry.page_height - 279.4).abs() < 1e-4);
        assert!((config.layout.geometry.page_width - 215.9).abs() < 1e-4);
        assert_eq!(config.layout.footer_text, "© Acme");
        assert_eq!(config.layout_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_unparsable_value_names_variable() {
        let err = Config::from_lookup(lookup_from(&[("PAGE_MARGIN_MM", "wide")])).unwrap_err();
        assert!(err.to_string().contains("PAGE_MARGIN_MM"));
    }

    #[test]
    fn test_invalid_geometry_is_rejected_at_startup() {
        let err = Config::from_lookup(lookup_from(&[("PAGE_MARGIN_MM", "120")])).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("Layout configuration from environment is invalid"));
        assert!(chain.contains("Invalid page geometry"));
    }
}
