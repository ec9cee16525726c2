use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable is optional; `.env` is read first if present.
#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
    /// Quiet period before an auto preview re-paginates.
    pub debounce: Duration,
    /// Stylesheet injected into print documents when no `--css` is given.
    pub print_css_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let debounce_ms = match get("PREVIEW_DEBOUNCE_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("PREVIEW_DEBOUNCE_MS must be a whole number of milliseconds")?,
            None => 500,
        };

        Ok(Config {
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            debounce: Duration::from_millis(debounce_ms),
            print_css_path: get("PRINT_CSS_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// Reads the print stylesheet: `override_path` first, then
    /// `PRINT_CSS_PATH`, else no CSS at all.
    pub fn load_css(&self, override_path: Option<&Path>) -> Result<String> {
        match override_path.or(self.print_css_path.as_deref()) {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read stylesheet '{}'", path.display())),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.debounce, Duration::from_millis(500));
        assert!(config.print_css_path.is_none());
    }

    #[test]
    fn test_reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("RUST_LOG", "debug"),
            ("PREVIEW_DEBOUNCE_MS", " 250 "),
            ("PRINT_CSS_PATH", "styles/print.css"),
        ]))
        .unwrap();
        assert_eq!(config.rust_log, "debug");
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert_eq!(config.print_css_path, Some(PathBuf::from("styles/print.css")));
    }

    #[test]
    fn test_rejects_bad_debounce() {
        let err = Config::from_lookup(lookup(&[("PREVIEW_DEBOUNCE_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("PREVIEW_DEBOUNCE_MS"));
    }

    #[test]
    fn test_load_css_prefers_override() {
        let mut env_css = tempfile::NamedTempFile::new().unwrap();
        write!(env_css, "body {{ color: red; }}").unwrap();
        let mut cli_css = tempfile::NamedTempFile::new().unwrap();
        write!(cli_css, "h1 {{ color: blue; }}").unwrap();

        let config = Config {
            rust_log: "info".to_string(),
            debounce: Duration::from_millis(500),
            print_css_path: Some(env_css.path().to_path_buf()),
        };
        assert_eq!(config.load_css(None).unwrap(), "body { color: red; }");
        assert_eq!(
            config.load_css(Some(cli_css.path())).unwrap(),
            "h1 { color: blue; }"
        );
    }

    #[test]
    fn test_load_css_missing_file_has_context() {
        let config = Config::from_lookup(lookup(&[("PRINT_CSS_PATH", "/nonexistent/print.css")]))
            .unwrap();
        let err = config.load_css(None).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/print.css"));
        assert_eq!(Config::from_lookup(lookup(&[])).unwrap().load_css(None).unwrap(), "");
    }
}
