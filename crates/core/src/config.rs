//! Configuration management for HR Desk.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults
//! - A YAML config file (`HRDESK_CONFIG` or `.hrdesk/config.yaml`)
//! - Environment variables
//! - Command-line flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding `.hrdesk/` (config file, prompt overrides)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Generation provider (e.g., "ollama")
    pub provider: String,

    /// Generation model identifier
    pub model: String,

    /// Generation endpoint override
    pub llm_endpoint: Option<String>,

    /// Embedding settings for the vector index
    pub embedding: EmbeddingSettings,

    /// Retrieval cascade settings
    pub retrieval: RetrievalSettings,

    /// Upstream snapshot sync settings
    pub sync: SyncSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as JSON
    pub log_json: bool,
}

/// Embedding provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// "trigram" or "ollama"
    pub provider: String,

    pub model: String,

    pub dimensions: usize,

    /// Endpoint for HTTP embedding providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            endpoint: None,
        }
    }
}

/// Retrieval cascade settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Maximum documents returned by a single search
    #[serde(rename = "topK", default = "default_top_k")]
    pub top_k: usize,

    /// Employee documents scanned when joining employees to projects
    #[serde(rename = "joinCandidates", default = "default_join_candidates")]
    pub join_candidates: usize,
}

fn default_top_k() -> usize {
    5
}

fn default_join_candidates() -> usize {
    50
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            join_candidates: default_join_candidates(),
        }
    }
}

/// Upstream snapshot sync settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(rename = "snapshotUrl", default = "default_snapshot_url")]
    pub snapshot_url: String,

    #[serde(rename = "maxAttempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts
    #[serde(rename = "backoffSecs", default = "default_backoff_secs")]
    pub backoff_secs: u64,

    /// Documents upserted in parallel during a bulk sync
    #[serde(rename = "upsertConcurrency", default = "default_upsert_concurrency")]
    pub upsert_concurrency: usize,

    /// How long `chat` waits for its startup sync before answering
    #[serde(rename = "chatWaitSecs", default = "default_chat_wait_secs")]
    pub chat_wait_secs: u64,
}

fn default_snapshot_url() -> String {
    "http://localhost:8080/public/completeRag".to_string()
}

fn default_max_attempts() -> u32 {
    6
}

fn default_backoff_secs() -> u64 {
    5
}

fn default_upsert_concurrency() -> usize {
    4
}

fn default_chat_wait_secs() -> u64 {
    10
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            snapshot_url: default_snapshot_url(),
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff_secs(),
            upsert_concurrency: default_upsert_concurrency(),
            chat_wait_secs: default_chat_wait_secs(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    embedding: Option<EmbeddingSettings>,
    retrieval: Option<RetrievalSettings>,
    sync: Option<SyncSettings>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "ollama".to_string(),
            model: "llama3.2".to_string(),
            llm_endpoint: None,
            embedding: EmbeddingSettings::default(),
            retrieval: RetrievalSettings::default(),
            sync: SyncSettings::default(),
            log_level: None,
            verbose: false,
            no_color: false,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and environment variables.
    ///
    /// Environment variables:
    /// - `HRDESK_WORKSPACE`: directory containing `.hrdesk/`
    /// - `HRDESK_CONFIG`: path to config file
    /// - `HRDESK_PROVIDER`: generation provider
    /// - `HRDESK_MODEL`: generation model
    /// - `HRDESK_LLM_ENDPOINT`: generation endpoint
    /// - `HRDESK_SNAPSHOT_URL`: upstream snapshot endpoint
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use hrdesk_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Snapshot URL: {}", config.sync.snapshot_url);
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("HRDESK_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("HRDESK_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        let config_path = match config.config_file {
            Some(ref cf) => {
                if !cf.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        cf
                    )));
                }
                cf.clone()
            }
            None => config.hrdesk_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        config.apply_env();

        Ok(config)
    }

    /// Environment variables override YAML values.
    fn apply_env(&mut self) {
        if let Ok(provider) = std::env::var("HRDESK_PROVIDER") {
            self.provider = provider;
        }

        if let Ok(model) = std::env::var("HRDESK_MODEL") {
            self.model = model;
        }

        if let Ok(endpoint) = std::env::var("HRDESK_LLM_ENDPOINT") {
            self.llm_endpoint = Some(endpoint);
        }

        if let Ok(url) = std::env::var("HRDESK_SNAPSHOT_URL") {
            self.sync.snapshot_url = url;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.no_color = true;
        }
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }

    fn merge_yaml_str(&self, contents: &str) -> AppResult<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(contents)?;
        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.endpoint.is_some() {
                result.llm_endpoint = llm.endpoint;
            }
        }

        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }

        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }

        if let Some(sync) = config_file.sync {
            result.sync = sync;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.log_json = json;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Flags take precedence over environment variables and the config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
        log_json: bool,
    ) -> AppResult<Self> {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        // An explicit config file given on the command line is re-merged so
        // its values beat the defaults even when HRDESK_CONFIG was unset.
        if let Some(config_file) = config_file {
            self = self.merge_yaml(&config_file)?;
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        if log_json {
            self.log_json = true;
        }

        Ok(self)
    }

    /// Get the path to the .hrdesk directory.
    pub fn hrdesk_dir(&self) -> PathBuf {
        self.workspace.join(".hrdesk")
    }

    /// Directory searched for prompt overrides.
    pub fn prompts_dir(&self) -> PathBuf {
        self.hrdesk_dir().join("prompts")
    }

    /// Validate configuration values.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["ollama"];
        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        let known_embedders = ["trigram", "ollama"];
        if !known_embedders.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                known_embedders.join(", ")
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be greater than zero".to_string(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(AppError::Config(
                "retrieval.topK must be greater than zero".to_string(),
            ));
        }

        if self.sync.max_attempts == 0 {
            return Err(AppError::Config(
                "sync.maxAttempts must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
