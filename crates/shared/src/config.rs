//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Monthly reporting behaviour.
    #[serde(default)]
    pub reporting: ReportingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted upload size for CSV imports, in bytes.
    #[serde(default = "default_upload_limit")]
    pub upload_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_upload_limit() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upload_limit_bytes: default_upload_limit(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
///
/// Tokens are issued by the identity provider in front of this service;
/// only validation happens here.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for verifying (and, in tests and the seeder, signing) tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: i64,
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

/// How values are carried when a completed report is copied into a new period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarryOverMode {
    /// Keep planned targets, zero `reached` and `target_required`.
    #[default]
    Reset,
    /// Copy every value from the source period.
    Seed,
}

/// Monthly reporting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    /// State given to a newly created monthly report (`pending` or `todo`).
    #[serde(default = "default_initial_report_state")]
    pub initial_report_state: String,
    /// When true, submitted reports wait for a cluster lead to approve them.
    #[serde(default)]
    pub require_approval: bool,
    /// Carry-over policy used by copy-forward.
    #[serde(default)]
    pub carry_over: CarryOverMode,
    /// Upper bound on data rows accepted in one import file.
    #[serde(default = "default_import_max_rows")]
    pub import_max_rows: usize,
}

fn default_initial_report_state() -> String {
    "pending".to_string()
}

fn default_import_max_rows() -> usize {
    5000
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            initial_report_state: default_initial_report_state(),
            require_approval: false,
            carry_over: CarryOverMode::default(),
            import_max_rows: default_import_max_rows(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `REPORTHUB__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("REPORTHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment_uses_defaults() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-no-such-file")),
                ("REPORTHUB__DATABASE__URL", Some("postgres://localhost/rh")),
                ("REPORTHUB__JWT__SECRET", Some("secret")),
                ("REPORTHUB__REPORTING__REQUIRE_APPROVAL", None),
                ("REPORTHUB__REPORTING__CARRY_OVER", None),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/rh");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.jwt.access_token_expiry_secs, 900);
                assert_eq!(config.reporting.initial_report_state, "pending");
                assert!(!config.reporting.require_approval);
                assert_eq!(config.reporting.carry_over, CarryOverMode::Reset);
            },
        );
    }

    #[test]
    fn test_reporting_overrides_from_environment() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-no-such-file")),
                ("REPORTHUB__DATABASE__URL", Some("postgres://localhost/rh")),
                ("REPORTHUB__JWT__SECRET", Some("secret")),
                ("REPORTHUB__REPORTING__REQUIRE_APPROVAL", Some("true")),
                ("REPORTHUB__REPORTING__CARRY_OVER", Some("seed")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert!(config.reporting.require_approval);
                assert_eq!(config.reporting.carry_over, CarryOverMode::Seed);
            },
        );
    }

    #[test]
    fn test_reporting_default() {
        let reporting = ReportingConfig::default();
        assert_eq!(reporting.import_max_rows, 5000);
        assert_eq!(reporting.carry_over, CarryOverMode::Reset);
    }
}
