//! Chat-completion client for training reports.
//!
//! Two providers are supported:
//!
//! - **GigaChat**: client-credentials OAuth. The short-lived access token is
//!   kept in a [`CredentialCache`] and only refreshed on a miss (or when the
//!   API rejects it).
//! - **OpenAI**: a static API key used directly as the bearer.
//!
//! Callers that must always answer use [`ask_or_fallback`], which degrades to
//! [`fallback_summary`] when no provider is configured or the request fails.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analytics::{fallback_summary, WorkoutRow};
use crate::clock::{Clock, SystemClock};
use crate::credential_cache::CredentialCache;
use crate::report::SYSTEM_PROMPT;

/// GigaChat OAuth endpoint.
pub const GIGACHAT_OAUTH_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";

/// GigaChat chat-completions endpoint.
pub const GIGACHAT_API_URL: &str = "https://gigachat.devices.sberbank.ru/api/v1/chat/completions";

/// OpenAI chat-completions endpoint.
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default GigaChat OAuth scope (personal API access).
pub const DEFAULT_GIGACHAT_SCOPE: &str = "GIGACHAT_API_PERS";

/// Default GigaChat model.
pub const DEFAULT_GIGACHAT_MODEL: &str = "GigaChat";

/// Default OpenAI model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 500;

/// Errors from the AI provider.
#[derive(Error, Debug)]
pub enum AiError {
    /// No provider credentials configured.
    #[error("AI provider not configured")]
    NotConfigured,

    /// The OAuth exchange failed.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The completion request failed.
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// The response did not have the expected shape.
    #[error("failed to parse response: {0}")]
    ParseError(String),
}

/// Which provider to talk to, with its credentials.
#[derive(Debug, Clone)]
pub enum AiProvider {
    GigaChat {
        client_id: String,
        client_secret: String,
        scope: String,
        model: String,
        /// Extra root certificate (PEM) for the GigaChat endpoints.
        ca_cert: Option<PathBuf>,
    },
    OpenAi {
        api_key: String,
        model: String,
    },
}

impl AiProvider {
    /// Human-readable provider name.
    pub fn name(&self) -> &'static str {
        match self {
            AiProvider::GigaChat { .. } => "GigaChat",
            AiProvider::OpenAi { .. } => "OpenAI",
        }
    }

    fn model(&self) -> &str {
        match self {
            AiProvider::GigaChat { model, .. } | AiProvider::OpenAi { model, .. } => model,
        }
    }
}

/// Chat-completion client with a cached provider token.
pub struct AiClient<C: Clock = SystemClock> {
    http: reqwest::Client,
    provider: AiProvider,
    tokens: CredentialCache<C>,
    oauth_url: String,
    api_url: String,
}

impl AiClient<SystemClock> {
    /// Create a client on the wall clock.
    pub fn new(provider: AiProvider) -> Result<Self, AiError> {
        Self::with_clock(provider, SystemClock)
    }
}

impl<C: Clock> AiClient<C> {
    /// Create a client whose token cache uses `clock`.
    pub fn with_clock(provider: AiProvider, clock: C) -> Result<Self, AiError> {
        let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);

        if let AiProvider::GigaChat {
            ca_cert: Some(path),
            ..
        } = &provider
        {
            let pem = std::fs::read(path).map_err(|e| {
                AiError::AuthFailed(format!("cannot read CA certificate {}: {}", path.display(), e))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem)
                .map_err(|e| AiError::AuthFailed(format!("invalid CA certificate: {}", e)))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        let (oauth_url, api_url) = match provider {
            AiProvider::GigaChat { .. } => (GIGACHAT_OAUTH_URL, GIGACHAT_API_URL),
            AiProvider::OpenAi { .. } => ("", OPENAI_API_URL),
        };

        Ok(Self {
            http,
            provider,
            tokens: CredentialCache::with_clock(clock),
            oauth_url: oauth_url.to_string(),
            api_url: api_url.to_string(),
        })
    }

    /// Point the client at different endpoints (proxies, test servers).
    pub fn with_endpoints(
        mut self,
        oauth_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        self.oauth_url = oauth_url.into();
        self.api_url = api_url.into();
        self
    }

    /// The configured provider.
    pub fn provider(&self) -> &AiProvider {
        &self.provider
    }

    /// The provider token cache.
    pub fn token_cache(&self) -> &CredentialCache<C> {
        &self.tokens
    }

    /// Send a prompt and return the model's reply.
    pub async fn ask(&self, prompt: &str) -> Result<String, AiError> {
        let token = self.bearer().await?;
        let is_gigachat = matches!(self.provider, AiProvider::GigaChat { .. });
        match self.complete(&token, prompt).await {
            Err(AiError::AuthFailed(reason)) if is_gigachat => {
                // Upstream revoked the token before our TTL ran out.
                warn!(reason = %reason, "GigaChat rejected cached token, re-authenticating");
                let fresh = self.authenticate().await?;
                self.tokens.set(fresh.clone());
                self.complete(&fresh, prompt).await
            }
            other => other,
        }
    }

    /// Current bearer token, fetching a fresh one on a cache miss.
    async fn bearer(&self) -> Result<String, AiError> {
        match &self.provider {
            AiProvider::OpenAi { api_key, .. } => Ok(api_key.clone()),
            AiProvider::GigaChat { .. } => {
                if let Some(token) = self.tokens.get() {
                    return Ok(token);
                }
                debug!("No cached GigaChat token, authenticating");
                let token = self.authenticate().await?;
                self.tokens.set(token.clone());
                Ok(token)
            }
        }
    }

    async fn authenticate(&self) -> Result<String, AiError> {
        let AiProvider::GigaChat {
            client_id,
            client_secret,
            scope,
            ..
        } = &self.provider
        else {
            return Err(AiError::NotConfigured);
        };

        let response = self
            .http
            .post(&self.oauth_url)
            .basic_auth(client_id, Some(client_secret))
            .header("Accept", "application/json")
            .header("RqUID", uuid::Uuid::new_v4().to_string())
            .form(&[("scope", scope.as_str())])
            .send()
            .await
            .map_err(|e| AiError::AuthFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::AuthFailed(format!("{}: {}", status, body)));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        let token = parse_access_token(&json)?;
        info!(provider = self.provider.name(), "Obtained fresh access token");
        Ok(token)
    }

    async fn complete(&self, token: &str, prompt: &str) -> Result<String, AiError> {
        let request_body = serde_json::json!({
            "model": self.provider.model(),
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt}
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS
        });

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AiError::AuthFailed(status.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::RequestFailed(format!("{}: {}", status, body)));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        parse_completion(&json)
    }
}

/// Extract `access_token` from an OAuth response.
pub fn parse_access_token(json: &serde_json::Value) -> Result<String, AiError> {
    json["access_token"]
        .as_str()
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .ok_or_else(|| AiError::ParseError("No access_token in response".to_string()))
}

/// Extract the first choice's message content from a completion response.
pub fn parse_completion(json: &serde_json::Value) -> Result<String, AiError> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| AiError::ParseError("No content in response".to_string()))
}

/// Ask the provider, falling back to offline statistics over `rows`.
///
/// Never fails: the bot must answer every request.
pub async fn ask_or_fallback<C: Clock>(
    client: Option<&AiClient<C>>,
    prompt: &str,
    rows: &[WorkoutRow],
) -> String {
    let Some(client) = client else {
        debug!("No AI provider configured, using offline summary");
        return fallback_summary(rows);
    };

    match client.ask(prompt).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!(
                provider = client.provider().name(),
                error = %e,
                "AI request failed, using offline summary"
            );
            fallback_summary(rows)
        }
    }
}
