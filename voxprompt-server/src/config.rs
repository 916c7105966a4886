use voxprompt_providers::openai_compatible::UpstreamConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub upstream: UpstreamConfig,
}

impl ServerConfig {
    /// Reads configuration from the environment, with defaults matching the
    /// hosted deployment.
    pub fn from_env() -> Self {
        let upstream = UpstreamConfig {
            base_url: std::env::var("VOXPROMPT_UPSTREAM_BASE_URL")
                .unwrap_or_else(|_| "https://api.deepseek.com/v1".into()),
            api_key: std::env::var("VOXPROMPT_UPSTREAM_API_KEY").unwrap_or_default(),
            model: std::env::var("VOXPROMPT_UPSTREAM_MODEL")
                .unwrap_or_else(|_| "deepseek-chat".into()),
        };

        Self {
            bind: std::env::var("VOXPROMPT_BIND").unwrap_or_else(|_| "127.0.0.1:3000".into()),
            upstream,
        }
    }
}
