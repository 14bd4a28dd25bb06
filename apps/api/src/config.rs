use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Panics at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Ceiling on agentic loop rounds per chat turn. Product tuning constant.
    pub max_agent_steps: u32,
    /// How many prior messages (newest-first) are replayed to the model as
    /// conversation context. 20 messages = 10 user/assistant rounds.
    pub chat_history_messages: i64,
    /// Thread titles are cut from the first user message at this many chars.
    pub thread_title_max_chars: usize,
    /// TTL for the cached model listing, in seconds.
    pub model_cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", "10")
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            max_agent_steps: env_or("MAX_AGENT_STEPS", "25")
                .parse::<u32>()
                .context("MAX_AGENT_STEPS must be a positive integer")?,
            chat_history_messages: env_or("CHAT_HISTORY_MESSAGES", "20")
                .parse::<i64>()
                .context("CHAT_HISTORY_MESSAGES must be a positive integer")?,
            thread_title_max_chars: env_or("THREAD_TITLE_MAX_CHARS", "64")
                .parse::<usize>()
                .context("THREAD_TITLE_MAX_CHARS must be a positive integer")?,
            model_cache_ttl_secs: env_or("MODEL_CACHE_TTL_SECS", "300")
                .parse::<u64>()
                .context("MODEL_CACHE_TTL_SECS must be a positive integer")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_to_default_when_unset() {
        assert_eq!(env_or("VITAE_TEST_NEVER_SET", "10"), "10");
        assert_eq!(env_or("VITAE_TEST_NEVER_SET", "10").parse::<u32>().unwrap(), 10);
    }
}
