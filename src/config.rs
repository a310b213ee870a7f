use std::path::Path;
use std::time::Duration;

use config::Config;
use config::Environment;
use config::File;
use config::FileFormat;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::FaqRagError;
use crate::errors::Result;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Environment variable naming an alternate configuration file
pub const CONFIG_PATH_ENV: &str = "FAQRAG_CONFIG";

/// Prefix for `FAQRAG__SECTION__KEY` overrides
const ENV_PREFIX: &str = "FAQRAG";

/// Plain database variables and the prefixed variable each one stands in for
const DB_ENV_VARS: [(&str, &str); 5] = [
    ("DB_HOST", "FAQRAG__DATABASE__HOST"),
    ("DB_PORT", "FAQRAG__DATABASE__PORT"),
    ("DB_NAME", "FAQRAG__DATABASE__NAME"),
    ("DB_USER", "FAQRAG__DATABASE__USER"),
    ("DB_PASSWORD", "FAQRAG__DATABASE__PASSWORD"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
    /// Upper bound in seconds for a single store operation
    pub statement_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Also write daily rolling log files under `logs/`
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Ollama,
    OpenAI,
    /// In-process all-MiniLM-L6-v2 (requires the `local-embeddings` feature)
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            model: "all-minilm".to_string(),
            dimension: crate::embeddings::DEFAULT_EMBEDDING_DIM,
            endpoint: "http://localhost:11434".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub enable_vector_index: bool,
    /// HNSW `m` parameter
    pub hnsw_m: u32,
    /// HNSW `ef_construction` parameter
    pub hnsw_ef_construction: u32,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            enable_vector_index: true,
            hnsw_m: 16,
            hnsw_ef_construction: 64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Base used to resolve relative record and suggestion links
    pub base_url: Option<String>,
    /// In-flight embedding requests during ingestion
    pub concurrency: usize,
    /// Skip records whose content hash is already stored
    pub dedup: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            concurrency: 4,
            dedup: false,
        }
    }
}

/// Database section as read from the sources, before validation.
///
/// Every connection field is optional here so a missing value can be
/// reported by name instead of as a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDatabaseConfig {
    host: Option<String>,
    port: Option<String>,
    name: Option<String>,
    user: Option<String>,
    password: Option<String>,
    max_connections: Option<u32>,
    min_connections: Option<u32>,
    connection_timeout: Option<u64>,
    statement_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAppConfig {
    database: RawDatabaseConfig,
    logging: LoggingConfig,
    embeddings: EmbeddingsConfig,
    performance: PerformanceConfig,
    ingest: IngestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub embeddings: EmbeddingsConfig,
    pub performance: PerformanceConfig,
    pub ingest: IngestConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_sources(Some(path.as_ref()), true, std::env::vars().collect())
    }

    /// Load configuration from the default locations.
    ///
    /// Uses the file named by `FAQRAG_CONFIG` when set (it must exist),
    /// otherwise `config.toml` if present. Environment variables apply on top.
    pub fn load() -> Result<Self> {
        let vars: config::Map<String, String> = std::env::vars().collect();
        match vars.get(CONFIG_PATH_ENV).cloned() {
            Some(path) => Self::from_sources(Some(Path::new(&path)), true, vars),
            None => Self::from_sources(Some(Path::new(DEFAULT_CONFIG_FILE)), false, vars),
        }
    }

    /// Build configuration from an optional file and an explicit variable set.
    ///
    /// Precedence, lowest first: built-in defaults, the file,
    /// `DB_HOST`/`DB_PORT`/`DB_NAME`/`DB_USER`/`DB_PASSWORD`, then `FAQRAG__*`.
    /// Values are kept as strings until deserialization, so `007` stays `007`.
    pub fn from_sources(
        path: Option<&Path>,
        file_required: bool,
        mut vars: config::Map<String, String>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(file_required),
            );
        }

        for (var, prefixed) in DB_ENV_VARS {
            if let Some(value) = vars.get(var).cloned() {
                vars.entry(prefixed.to_string()).or_insert(value);
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .source(Some(vars)),
        );

        let raw: RawAppConfig = builder.build()?.try_deserialize()?;
        Self::validate(raw)
    }

    fn validate(raw: RawAppConfig) -> Result<Self> {
        let db = raw.database;
        let host = required("database.host", db.host)?;
        let port_text = required("database.port", db.port)?;
        let port = port_text.trim().parse::<u16>().map_err(|_| {
            FaqRagError::ConfigError(format!(
                "database.port '{port_text}' is not a valid port number"
            ))
        })?;
        let name = required("database.name", db.name)?;
        let user = required("database.user", db.user)?;
        let password = required("database.password", db.password)?;

        let database = DatabaseConfig {
            host,
            port,
            name,
            user,
            password,
            max_connections: db.max_connections.unwrap_or(5),
            min_connections: db.min_connections.unwrap_or(1),
            connection_timeout: db.connection_timeout.unwrap_or(30),
            statement_timeout_secs: db.statement_timeout_secs.unwrap_or(30),
        };

        if database.statement_timeout_secs == 0 {
            return Err(FaqRagError::ConfigError(
                "database.statement_timeout_secs must be positive".to_string(),
            ));
        }

        if raw.embeddings.dimension == 0 {
            return Err(FaqRagError::ConfigError(
                "embeddings.dimension must be positive".to_string(),
            ));
        }

        if let Some(base) = raw.ingest.base_url.as_deref() {
            url::Url::parse(base).map_err(|e| {
                FaqRagError::ConfigError(format!("ingest.base_url '{base}' is invalid: {e}"))
            })?;
        }

        Ok(Self {
            database,
            logging: raw.logging,
            embeddings: raw.embeddings,
            performance: raw.performance,
            ingest: raw.ingest,
        })
    }

    /// Get max connections for database pool
    pub fn max_connections(&self) -> u32 {
        self.database.max_connections
    }

    /// Get min connections for database pool
    pub fn min_connections(&self) -> u32 {
        self.database.min_connections
    }

    /// Get connection timeout
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.database.connection_timeout)
    }

    /// Get per-operation store timeout
    pub fn statement_timeout(&self) -> Duration {
        Duration::from_secs(self.database.statement_timeout_secs)
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Check if the HNSW vector index is enabled
    pub fn vector_index_enabled(&self) -> bool {
        self.performance.enable_vector_index
    }

    /// Copy of the configuration safe to print or log
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.database.password = "********".to_string();
        if copy.embeddings.api_key.is_some() {
            copy.embeddings.api_key = Some("********".to_string());
        }
        copy
    }
}

fn required(key: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(FaqRagError::ConfigError(format!(
            "{key} is required (set it in {DEFAULT_CONFIG_FILE} or the environment)"
        ))),
    }
}
