use anyhow::{Context, Result, anyhow};
use axum_extra::extract::cookie::Key;
use base64::{Engine as _, engine::general_purpose::STANDARD};

#[derive(Clone)]
pub struct AppConfig {
    pub cookie_key: Key,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let cookie_secret =
            std::env::var("COOKIE_SECRET_BASE64").context("COOKIE_SECRET_BASE64 missing")?;
        let cookie_key = cookie_key_from_secret(&cookie_secret)?;

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            cookie_key,
            cors_allowed_origins,
        })
    }
}

/// Expand the configured secret into the full signing+encryption key.
/// `Key::from` wants 64 raw bytes; deriving instead lets any secret of 32
/// bytes or more work.
fn cookie_key_from_secret(secret: &str) -> Result<Key> {
    let secret_bytes = STANDARD
        .decode(secret.trim())
        .context("invalid COOKIE_SECRET_BASE64")?;
    if secret_bytes.len() < 32 {
        return Err(anyhow!(
            "COOKIE_SECRET_BASE64 must decode to at least 32 bytes"
        ));
    }
    Ok(Key::derive_from(&secret_bytes))
}
