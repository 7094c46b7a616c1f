//! Bearer token acquisition for the CRM and SARAS.
//!
//! A run asks each [`TokenSource`] for a token once, before its first request,
//! and reuses it until the run ends. There is no refresh or cache across runs.

use std::fmt;

use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::config::Secret;
use crate::egress::EgressFilter;
use crate::error::AuthError;

/// How to obtain a bearer token.
#[derive(Clone)]
pub enum Credentials {
    /// Pre-issued token, used as-is.
    Static(Secret),
    /// OAuth2 client-credentials grant against `token_url`.
    ClientCredentials {
        token_url: String,
        client_id: String,
        client_secret: Secret,
        scope: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(_) => f
                .debug_struct("Static")
                .field("token", &"[REDACTED]")
                .finish(),
            Self::ClientCredentials {
                token_url,
                client_id,
                scope,
                ..
            } => f
                .debug_struct("ClientCredentials")
                .field("token_url", token_url)
                .field("client_id", client_id)
                .field("client_secret", &"[REDACTED]")
                .field("scope", scope)
                .finish(),
        }
    }
}

/// A bearer token valid for the current run.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct TokenSource {
    credentials: Credentials,
    http: reqwest::Client,
    egress: EgressFilter,
}

impl TokenSource {
    pub fn new(credentials: Credentials, http: reqwest::Client, egress: EgressFilter) -> Self {
        Self {
            credentials,
            http,
            egress,
        }
    }

    pub async fn acquire(&self) -> Result<AccessToken, AuthError> {
        match &self.credentials {
            Credentials::Static(token) => Ok(AccessToken::new(token.expose())),
            Credentials::ClientCredentials {
                token_url,
                client_id,
                client_secret,
                scope,
            } => {
                let url = Url::parse(token_url).map_err(|e| AuthError::Request {
                    endpoint: token_url.clone(),
                    message: e.to_string(),
                })?;
                self.egress.check(&url).map_err(AuthError::AccessDenied)?;

                debug!(endpoint = %token_url, "requesting client-credentials token");
                let form = [
                    ("grant_type", "client_credentials"),
                    ("client_id", client_id.as_str()),
                    ("client_secret", client_secret.expose()),
                    ("scope", scope.as_str()),
                ];
                let response = self
                    .http
                    .post(url)
                    .form(&form)
                    .send()
                    .await
                    .map_err(|e| AuthError::Request {
                        endpoint: token_url.clone(),
                        message: e.to_string(),
                    })?;

                let status = response.status();
                if !status.is_success() {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<no body>".to_string());
                    return Err(AuthError::Rejected {
                        endpoint: token_url.clone(),
                        status: status.as_u16(),
                        body,
                    });
                }

                let token: TokenResponse =
                    response.json().await.map_err(|e| AuthError::Request {
                        endpoint: token_url.clone(),
                        message: format!("failed to parse token response: {e}"),
                    })?;
                Ok(AccessToken::new(token.access_token))
            }
        }
    }
}
