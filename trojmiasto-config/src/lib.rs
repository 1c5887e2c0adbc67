//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Precedence: `TROJMIASTO`-prefixed environment variables win over file
//! values, which win over the built-in defaults. `${VAR}` placeholders in
//! string values are expanded (recursively, with a depth cap) after all
//! sources are merged.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Top-level runtime configuration for the scraper workspace.
#[derive(Debug, Deserialize)]
pub struct TrojmiastoConfig {
    pub version: Option<String>,
    /// Debug mode: enables the response cache and a `debug` log filter
    /// unless `log.level` overrides it.
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub log: LogSettings,
}

/// HTTP transport knobs.
#[derive(Debug, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

/// Where cached responses land when the cache is enabled.
#[derive(Debug, Default, Deserialize)]
pub struct CacheSettings {
    pub dir: Option<PathBuf>,
}

impl CacheSettings {
    /// Explicit directory, else the platform cache dir, else the temp dir.
    pub fn resolved_dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("trojmiastopl")
    }
}

/// Logging output settings, handed to the observability initialiser verbatim.
#[derive(Debug, Default, Deserialize)]
pub struct LogSettings {
    /// Tracing filter directive. When unset, derived from the debug toggle.
    pub level: Option<String>,
    #[serde(default)]
    pub format: LogEncoding,
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub stderr: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogEncoding {
    #[default]
    Text,
    Json,
}

impl TrojmiastoConfig {
    /// Effective tracing filter: explicit `log.level`, else `debug`/`info`
    /// depending on the debug toggle.
    pub fn log_filter(&self) -> String {
        match &self.log.level {
            Some(level) => level.clone(),
            None if self.debug => "debug".to_string(),
            None => "info".to_string(),
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct TrojmiastoConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for TrojmiastoConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TrojmiastoConfigLoader {
    /// Start with sensible defaults: `TROJMIASTO` env overrides on top of
    /// whatever files or snippets get attached.
    ///
    /// ```
    /// use trojmiasto_config::TrojmiastoConfigLoader;
    ///
    /// let config = TrojmiastoConfigLoader::new()
    ///     .with_yaml_str("version: '1'\ndebug: true")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert!(config.debug);
    /// assert_eq!(config.log_filter(), "debug");
    /// ```
    pub fn new() -> Self {
        let builder = Config::builder().add_source(
            Environment::with_prefix("TROJMIASTO")
                .separator("__")
                .try_parsing(true),
        );
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self.builder.add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use trojmiasto_config::TrojmiastoConfigLoader;
    ///
    /// let cfg = TrojmiastoConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// log:
    ///   level: "trojmiasto_http=debug"
    ///   stderr: true
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.log_filter(), "trojmiasto_http=debug");
    /// assert!(cfg.log.stderr);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly
    /// typed config, expanding `${VAR}` placeholders along the way.
    ///
    /// ```
    /// use trojmiasto_config::TrojmiastoConfigLoader;
    ///
    /// unsafe { std::env::set_var("SCRAPER_CACHE", "/tmp/scraper-cache"); }
    ///
    /// let config = TrojmiastoConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// debug: true
    /// cache:
    ///   dir: "${SCRAPER_CACHE}"
    /// "#,
    ///     )
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(
    ///     config.cache.resolved_dir(),
    ///     std::path::PathBuf::from("/tmp/scraper-cache")
    /// );
    ///
    /// unsafe { std::env::remove_var("SCRAPER_CACHE"); }
    /// ```
    pub fn load(self) -> Result<TrojmiastoConfig, ConfigError> {
        let cfg = self.builder.build()?;

        // Merge first, expand after, so env overlays get expanded too.
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: TrojmiastoConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
