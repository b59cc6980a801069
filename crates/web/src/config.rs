use anyhow::{Context, Result};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "docutrace")]
#[command(about = "DocuTrace: verifiable, source-grounded document auditing", long_about = None)]
#[command(version)]
pub struct Config {
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8501)]
    pub port: u16,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "LANGEXTRACT_API_KEY", hide_env_values = true)]
    pub langextract_api_key: Option<String>,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = extractor::GeminiClient::DEFAULT_BASE_URL)]
    pub gemini_base_url: String,

    /// Largest accepted upload, in bytes.
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 50 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// Largest chunk of document text sent to the model in one request, in bytes.
    #[arg(long, env = "MAX_CHAR_BUFFER", default_value_t = extractor::LangExtractor::DEFAULT_MAX_CHAR_BUFFER)]
    pub max_char_buffer: usize,

    /// Most sessions kept in memory at once.
    #[arg(long, env = "MAX_SESSIONS", default_value_t = storage::repository::session::DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,

    /// Seconds an untouched session is kept before it may be evicted.
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = storage::repository::session::DEFAULT_SESSION_TTL_SECS)]
    pub session_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::try_parse().context("Invalid server configuration")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Gemini credential, preferring `GEMINI_API_KEY`. Blank values count as unset.
    pub fn api_key(&self) -> Option<String> {
        [&self.gemini_api_key, &self.langextract_api_key]
            .into_iter()
            .flatten()
            .map(|key| key.trim())
            .find(|key| !key.is_empty())
            .map(str::to_string)
    }
}
