use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

/// Which email backend delivers account notifications.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailProvider {
    Console,
    SendGrid,
}

/// What a failed notification does to the mutation that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPolicy {
    /// Fail the request with an upstream error.
    Strict,
    /// Log a warning and return the mutation result.
    BestEffort,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub provider: EmailProvider,
    pub api_key: Option<String>,
    pub from: String,
    pub api_url: String,
    pub policy: NotificationPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub email: EmailConfig,
}

pub const SENDGRID_API_URL: &str = "https://api.sendgrid.com/v3/mail/send";

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => database_url_from_parts(),
        };
        let db_max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let expires_in = std::env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| "1h".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "account-service".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "account-service-users".into()),
            ttl: parse_expires_in(&expires_in)
                .with_context(|| format!("invalid JWT_EXPIRES_IN: {expires_in}"))?,
        };

        let provider = match std::env::var("EMAIL_PROVIDER")
            .unwrap_or_else(|_| "console".into())
            .to_lowercase()
            .as_str()
        {
            "console" => EmailProvider::Console,
            "sendgrid" => EmailProvider::SendGrid,
            other => anyhow::bail!("unknown EMAIL_PROVIDER: {other}"),
        };
        let api_key = std::env::var("EMAIL_API_KEY").ok();
        if provider == EmailProvider::SendGrid && api_key.is_none() {
            anyhow::bail!("EMAIL_API_KEY must be set when EMAIL_PROVIDER=sendgrid");
        }
        let policy = match std::env::var("NOTIFICATION_POLICY")
            .unwrap_or_else(|_| "strict".into())
            .to_lowercase()
            .as_str()
        {
            "strict" => NotificationPolicy::Strict,
            "best_effort" => NotificationPolicy::BestEffort,
            other => anyhow::bail!("unknown NOTIFICATION_POLICY: {other}"),
        };
        let email = EmailConfig {
            provider,
            api_key,
            from: std::env::var("EMAIL_FROM").unwrap_or_else(|_| "no-reply@example.com".into()),
            api_url: std::env::var("SENDGRID_API_URL").unwrap_or_else(|_| SENDGRID_API_URL.into()),
            policy,
        };

        Ok(Self {
            database_url,
            db_max_connections,
            jwt,
            email,
        })
    }
}

fn database_url_from_parts() -> String {
    let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.into());
    format!(
        "postgres://{}:{}@{}:{}/{}",
        var("DB_USERNAME", "postgres"),
        var("DB_PASSWORD", "postgres"),
        var("DB_HOST", "localhost"),
        var("DB_PORT", "5432"),
        var("DB_NAME", "user_management"),
    )
}

/// Longest token lifetime accepted from configuration.
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Parses token lifetimes such as `90`, `15m`, `12h` or `30d`. A bare number is seconds.
pub fn parse_expires_in(raw: &str) -> anyhow::Result<Duration> {
    let raw = raw.trim();
    let ttl = match raw.parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => humantime::parse_duration(raw)
            .with_context(|| format!("failed to parse duration {raw:?}"))?,
    };
    if ttl.is_zero() {
        anyhow::bail!("token lifetime must be positive");
    }
    if ttl > MAX_TOKEN_TTL {
        anyhow::bail!(
            "token lifetime {} exceeds the maximum of {}",
            humantime::format_duration(ttl),
            humantime::format_duration(MAX_TOKEN_TTL)
        );
    }
    Ok(ttl)
}
