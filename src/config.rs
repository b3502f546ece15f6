use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub wikipedia: WikipediaConfig,
    pub llm: LlmConfig,
}

/// Crawl bounds and run parameters. Read once at startup, immutable
/// for the lifetime of a run.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Name of the scientist the BFS starts from.
    pub seed: String,
    /// Maximum BFS distance from the seed. Nodes at this depth are
    /// added as leaves but never expanded.
    pub max_depth: u32,
    /// Maximum number of names processed (visited) in one run.
    pub max_scientists: usize,
    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

impl CrawlConfig {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }
}

fn default_politeness_delay_ms() -> u64 {
    500
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output/influence_graph.json")
}

/// Wikipedia text source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WikipediaConfig {
    /// Wikipedia language edition ("en", "fr", ...).
    #[serde(default = "default_language")]
    pub language: String,
    /// User-Agent sent to the Wikimedia API (required by their policy).
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_user_agent() -> String {
    format!("scigraph/{} (contact@example.org)", env!("CARGO_PKG_VERSION"))
}

/// LLM provider configuration. Providers are tried in cascade order:
/// Groq, then Mistral, then Ollama (always, as last resort), then
/// OpenAI only when nothing else is enabled.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub groq: GroqConfig,
    #[serde(default)]
    pub mistral: MistralConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_groq_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_groq_model")]
    pub model: String,
    #[serde(default = "default_groq_timeout")]
    pub timeout_secs: u64,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key_env: default_groq_key_env(),
            model: default_groq_model(),
            timeout_secs: default_groq_timeout(),
        }
    }
}

fn default_groq_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_groq_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct MistralConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_mistral_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_mistral_url")]
    pub api_url: String,
    #[serde(default = "default_mistral_model")]
    pub model: String,
    #[serde(default = "default_mistral_timeout")]
    pub timeout_secs: u64,
}

impl Default for MistralConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key_env: default_mistral_key_env(),
            api_url: default_mistral_url(),
            model: default_mistral_model(),
            timeout_secs: default_mistral_timeout(),
        }
    }
}

fn default_mistral_key_env() -> String {
    "MISTRAL_API_KEY".to_string()
}

fn default_mistral_url() -> String {
    "https://api.mistral.ai".to_string()
}

fn default_mistral_model() -> String {
    "mistral-small-latest".to_string()
}

fn default_mistral_timeout() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_ollama_url")]
    pub url: String,
    #[serde(default = "default_ollama_model")]
    pub model: String,
    #[serde(default = "default_ollama_timeout")]
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_ollama_url(),
            model: default_ollama_model(),
            timeout_secs: default_ollama_timeout(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_ollama_model() -> String {
    "mistral".to_string()
}

fn default_ollama_timeout() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_timeout")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openai_key_env(),
            model: default_openai_model(),
            timeout_secs: default_openai_timeout(),
        }
    }
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_timeout() -> u64 {
    60
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in SCIGRAPH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("SCIGRAPH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path (CLI `--config` override).
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.crawl.seed.trim().is_empty() {
            anyhow::bail!("crawl.seed must not be empty");
        }

        if self.crawl.max_scientists == 0 {
            anyhow::bail!("crawl.max_scientists must be greater than 0");
        }

        if self.wikipedia.language.trim().is_empty() {
            anyhow::bail!("wikipedia.language must not be empty");
        }

        // Keyed providers that are enabled must have their API key
        // available (either as an environment variable or via .env,
        // already loaded above).
        if self.llm.groq.enabled {
            std::env::var(&self.llm.groq.api_key_env).with_context(|| {
                format!(
                    "Environment variable {} not set. Set it in your .env file or as an environment variable with your Groq API key.",
                    self.llm.groq.api_key_env
                )
            })?;
        }

        if self.llm.mistral.enabled {
            std::env::var(&self.llm.mistral.api_key_env).with_context(|| {
                format!(
                    "Environment variable {} not set. Set it in your .env file or as an environment variable with your Mistral API key.",
                    self.llm.mistral.api_key_env
                )
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    const MINIMAL_CONFIG: &str = r#"
[crawl]
seed = "Albert Einstein"
max_depth = 3
max_scientists = 100

[wikipedia]
language = "en"

[llm.ollama]
enabled = true
"#;

    fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_config_load_minimal() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, MINIMAL_CONFIG);
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.crawl.seed, "Albert Einstein");
        assert_eq!(config.crawl.max_depth, 3);
        assert_eq!(config.crawl.max_scientists, 100);
        // Defaults kick in for omitted fields
        assert_eq!(config.crawl.politeness_delay_ms, 500);
        assert!(config.llm.ollama.enabled);
        assert!(!config.llm.groq.enabled);
        assert_eq!(config.llm.ollama.url, "http://127.0.0.1:11434");
    }

    #[test]
    fn test_config_zero_max_scientists_rejected() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let content = MINIMAL_CONFIG.replace("max_scientists = 100", "max_scientists = 0");
        let path = write_config(&temp_dir, &content);
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("max_scientists"));
    }

    #[test]
    fn test_config_empty_seed_rejected() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let content = MINIMAL_CONFIG.replace("seed = \"Albert Einstein\"", "seed = \"  \"");
        let path = write_config(&temp_dir, &content);
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_config_groq_requires_api_key() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let content = r#"
[crawl]
seed = "Albert Einstein"
max_depth = 3
max_scientists = 100

[wikipedia]

[llm.groq]
enabled = true
api_key_env = "SCIGRAPH_TEST_GROQ_KEY_UNSET"
"#;
        let path = write_config(&temp_dir, content);
        std::env::remove_var("SCIGRAPH_TEST_GROQ_KEY_UNSET");
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("SCIGRAPH_TEST_GROQ_KEY_UNSET"));

        std::env::set_var("SCIGRAPH_TEST_GROQ_KEY_UNSET", "k");
        assert!(Config::load_from(&path).is_ok());
        std::env::remove_var("SCIGRAPH_TEST_GROQ_KEY_UNSET");
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let result = Config::load_from(std::path::Path::new("nonexistent.toml"));
        assert!(result.is_err());
    }
}
