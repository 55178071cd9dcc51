//! Engine configuration.
//!
//! [`OrmConfig`] can be built in code or loaded from `config/breakwater.toml`
//! with `BREAKWATER`-prefixed environment variables layered on top via
//! [`OrmConfig::load`].

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Recognized engine options.
#[derive(Debug, Clone, Deserialize)]
pub struct OrmConfig {
    /// Introspect the live catalog and reconcile model schemas against it.
    #[serde(default = "default_true")]
    pub use_database_schema: bool,
    /// Run automatic schema reconciliation on startup paths that opt in.
    #[serde(default)]
    pub enable_automatic_migration: bool,
    /// Automatic migration may create missing tables.
    #[serde(default = "default_true")]
    pub allow_create_table: bool,
    /// Automatic migration may add missing columns.
    #[serde(default = "default_true")]
    pub allow_create_column: bool,
    /// Recognized but unsupported: column type/size drift is never
    /// reconciled. Kept so configurations carrying the flag still load.
    #[serde(default)]
    pub allow_update_column: bool,
    /// Automatic migration may drop columns that exist only in the database.
    #[serde(default)]
    pub allow_drop_column: bool,
    /// Automatic migration may drop tables that exist only in the database.
    #[serde(default)]
    pub allow_drop_table: bool,
    /// Serve repeated identical SELECTs from the in-process result cache.
    #[serde(default)]
    pub enable_ram_cache: bool,
    /// Batch inserts may chunk into multi-row VALUES statements.
    #[serde(default = "default_true")]
    pub list_insert_allow_bulk: bool,
    /// When the multi-row path fails, retry one statement per row.
    #[serde(default = "default_true")]
    pub list_insert_fallback_to_chunks: bool,
    /// Load declared relations eagerly even when not flagged auto-load.
    #[serde(default)]
    pub force_auto_load_nested: bool,
    /// Log every composed statement at debug level.
    #[serde(default)]
    pub print_sql_queries: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OrmConfig {
    fn default() -> Self {
        Self {
            use_database_schema: true,
            enable_automatic_migration: false,
            allow_create_table: true,
            allow_create_column: true,
            allow_update_column: false,
            allow_drop_column: false,
            allow_drop_table: false,
            enable_ram_cache: false,
            list_insert_allow_bulk: true,
            list_insert_fallback_to_chunks: true,
            force_auto_load_nested: false,
            print_sql_queries: false,
        }
    }
}

impl OrmConfig {
    /// Load configuration from `config/breakwater.toml` (optional), with
    /// `BREAKWATER`-prefixed environment variables layered on top.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/breakwater.toml").required(false))
            .add_source(Environment::with_prefix("BREAKWATER").separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // A present-but-unreadable file falls back to env-only.
                if std::path::Path::new("config/breakwater.toml").exists() {
                    log::warn!("failed to load config file, falling back to env: {err}");
                }
                Config::builder()
                    .add_source(Environment::with_prefix("BREAKWATER").separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                        ))
                    })?
            }
        };

        match settings.get::<OrmConfig>("orm") {
            Ok(cfg) => Ok(cfg),
            // Missing section means all defaults.
            Err(ConfigError::NotFound(_)) => Ok(OrmConfig::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "orm configuration could not be loaded from file or environment: {e}"
            ))),
        }
    }
}
