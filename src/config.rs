use crate::engine::StalemateRule;

/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server listen port.
    pub port: u16,
    /// Server bind host.
    pub host: String,
    /// Stalemate rule applied to newly created matches.
    pub stalemate_rule: StalemateRule,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let stalemate_rule = match std::env::var("CHESS_STALEMATE_RULE") {
            Ok(raw) => StalemateRule::from_str_loose(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unknown CHESS_STALEMATE_RULE, using default");
                StalemateRule::default()
            }),
            Err(_) => StalemateRule::default(),
        };

        AppConfig {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8082),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            stalemate_rule,
        }
    }

    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: 8082,
            host: "0.0.0.0".to_string(),
            stalemate_rule: StalemateRule::AnyPiece,
        }
    }
}
