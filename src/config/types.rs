use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub generation: GenerationConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Optional OpenAI-compatible endpoint override. Empty means the SDK default.
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// Populated from OPENAI_API_KEY at load time, never from the file.
    #[serde(skip)]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_extraction_base_url")]
    pub base_url: String,
    #[serde(default = "default_extraction_model")]
    pub model: String,
    /// Populated from GEMINI_API_KEY at load time, never from the file.
    #[serde(skip)]
    pub api_key: String,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_prompts_dir() -> String {
    "prompts".to_string()
}

fn default_generation_model() -> String {
    "gpt-4.1-nano".to_string()
}

fn default_extraction_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_extraction_model() -> String {
    "gemini-2.0-flash".to_string()
}
