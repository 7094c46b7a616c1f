//! Run configuration.
//!
//! # Resolution order
//!
//! 1. `.env` file via `dotenvy` (development only, see [`load_env_file`])
//! 2. optional YAML file (`--config <path>` or `BOOKSYNC_CONFIG`)
//! 3. process environment, which overrides anything from the file
//!
//! Resolution happens once at start-up; the resulting [`AppConfig`] is passed
//! explicitly to everything that needs it.
//!
//! # API pattern
//!
//! [`AppConfig::apply_env_with`] takes a lookup closure so tests can feed a
//! map instead of mutating the real process environment.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize, Serializer};

use crate::auth::Credentials;
use crate::error::ConfigError;

pub const DEFAULT_MAX_RETRIES: u32 = 10;
pub const DEFAULT_NEW_BOOKING_WINDOW_HOURS: u32 = 72;
pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com/";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 300;

const CRM_API_PATH: &str = "/api/data/v9.1/";

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// A credential value. Never printed, in `Debug` or when serialized.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Environment variable names for one service's credentials.
#[derive(Debug, Clone, Copy)]
pub struct AuthKeys {
    pub tenant_id: &'static str,
    pub client_id: &'static str,
    pub client_secret: &'static str,
    pub scope: &'static str,
    pub access_token: &'static str,
}

pub const CRM_AUTH_KEYS: AuthKeys = AuthKeys {
    tenant_id: "CRM_TENANT_ID",
    client_id: "CRM_CLIENT_ID",
    client_secret: "CRM_CLIENT_SECRET",
    scope: "CRM_SCOPE",
    access_token: "CRM_ACCESS_TOKEN",
};

pub const SARAS_AUTH_KEYS: AuthKeys = AuthKeys {
    tenant_id: "AZURE_TENANT_ID",
    client_id: "CBIBOOKING_CLIENT_ID",
    client_secret: "CBIBOOKING_CLIENT_SECRET",
    scope: "CBIBOOKING_SCOPE",
    access_token: "SARAS_ACCESS_TOKEN",
};

/// Either a pre-issued bearer token or client-credentials settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<Secret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<Secret>,
}

impl AuthConfig {
    /// How to obtain a token. A static token wins over client credentials.
    pub fn credentials(&self, authority: &str, keys: &AuthKeys) -> Result<Credentials, ConfigError> {
        if let Some(token) = self.access_token.as_ref().filter(|t| !t.is_empty()) {
            return Ok(Credentials::Static(token.clone()));
        }
        let tenant = required(&self.tenant_id, keys.tenant_id)?;
        let client_id = required(&self.client_id, keys.client_id)?;
        let client_secret = self
            .client_secret
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(keys.client_secret))?;
        let scope = required(&self.scope, keys.scope)?;
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            authority.trim_end_matches('/'),
            tenant
        );
        Ok(Credentials::ClientCredentials {
            token_url,
            client_id,
            client_secret,
            scope,
        })
    }

    fn apply_env_with<F>(&mut self, keys: &AuthKeys, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(keys.tenant_id) {
            self.tenant_id = Some(v);
        }
        if let Some(v) = lookup(keys.client_id) {
            self.client_id = Some(v);
        }
        if let Some(v) = lookup(keys.client_secret) {
            self.client_secret = Some(Secret(v));
        }
        if let Some(v) = lookup(keys.scope) {
            self.scope = Some(v);
        }
        if let Some(v) = lookup(keys.access_token) {
            self.access_token = Some(Secret(v));
        }
    }
}

fn required(value: &Option<String>, key: &'static str) -> Result<String, ConfigError> {
    value
        .clone()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmConfig {
    pub base_url: String,
    pub max_retries: u32,
    pub new_booking_window_hours: u32,
    pub auth: AuthConfig,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            new_booking_window_hours: DEFAULT_NEW_BOOKING_WINDOW_HOURS,
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SarasConfig {
    pub api_url: String,
    pub max_retries: u32,
    pub auth: AuthConfig,
}

impl Default for SarasConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggles {
    pub enable_saras_api_v2: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            enable_saras_api_v2: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub crm: CrmConfig,
    pub saras: SarasConfig,
    pub authority_url: String,
    pub feature_toggles: FeatureToggles,
    pub http_timeout_secs: u64,
    pub sync_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            crm: CrmConfig::default(),
            saras: SarasConfig::default(),
            authority_url: DEFAULT_AUTHORITY_URL.to_string(),
            feature_toggles: FeatureToggles::default(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            sync_interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
        }
    }
}

impl AppConfig {
    /// Read a YAML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Full start-up resolution: `.env`, optional file, environment, validation.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        load_env_file()?;
        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("BOOKSYNC_CONFIG").map(PathBuf::from));
        let mut config = match path {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override values from an environment lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CRM_BASE_URL") {
            self.crm.base_url = v;
        }
        if let Some(v) = lookup("CRM_MAX_RETRIES") {
            self.crm.max_retries = number_or_default(&v, DEFAULT_MAX_RETRIES);
        }
        if let Some(v) = lookup("NEW_BOOKING_WINDOW") {
            self.crm.new_booking_window_hours =
                number_or_default(&v, DEFAULT_NEW_BOOKING_WINDOW_HOURS);
        }
        self.crm.auth.apply_env_with(&CRM_AUTH_KEYS, &lookup);

        if let Some(v) = lookup("SARAS_URL") {
            self.saras.api_url = v;
        }
        if let Some(v) = lookup("SARAS_MAX_RETRIES") {
            self.saras.max_retries = number_or_default(&v, DEFAULT_MAX_RETRIES);
        }
        self.saras.auth.apply_env_with(&SARAS_AUTH_KEYS, &lookup);

        if let Some(v) = lookup("AUTH_AUTHORITY_URL").filter(|v| !v.trim().is_empty()) {
            self.authority_url = v;
        }
        if let Some(v) = lookup("ENABLE_SARAS_API_VERSION_2") {
            self.feature_toggles.enable_saras_api_v2 = v.trim() != "false";
        }
        if let Some(v) = lookup("HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = number_or_default(&v, DEFAULT_HTTP_TIMEOUT_SECS);
        }
        if let Some(v) = lookup("SYNC_INTERVAL_SECS") {
            self.sync_interval_secs = number_or_default(&v, DEFAULT_SYNC_INTERVAL_SECS);
        }
    }

    /// Check every URL parses and both services have usable credentials.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_url("CRM_BASE_URL", &self.crm.base_url)?;
        parse_url("SARAS_URL", &self.saras.api_url)?;
        parse_url("AUTH_AUTHORITY_URL", &self.authority_url)?;
        self.crm_credentials()?;
        self.saras_credentials()?;
        Ok(())
    }

    /// Web API root, e.g. `https://org.crm.dynamics.com/api/data/v9.1/`.
    pub fn crm_api_url(&self) -> Result<Url, ConfigError> {
        let raw = format!("{}{}", self.crm.base_url.trim_end_matches('/'), CRM_API_PATH);
        parse_url("CRM_BASE_URL", &raw)
    }

    /// SARAS root with a trailing slash so `Booking/{ref}` joins under it.
    pub fn saras_api_url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.saras.api_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        parse_url("SARAS_URL", &raw)
    }

    /// Per-request HTTP timeout. Zero means the default, never "fail at once".
    pub fn http_timeout(&self) -> Duration {
        match self.http_timeout_secs {
            0 => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    pub fn authority(&self) -> Result<Url, ConfigError> {
        parse_url("AUTH_AUTHORITY_URL", &self.authority_url)
    }

    pub fn crm_credentials(&self) -> Result<Credentials, ConfigError> {
        self.crm.auth.credentials(&self.authority_url, &CRM_AUTH_KEYS)
    }

    pub fn saras_credentials(&self) -> Result<Credentials, ConfigError> {
        self.saras.auth.credentials(&self.authority_url, &SARAS_AUTH_KEYS)
    }

    /// YAML rendering with every secret replaced.
    pub fn to_redacted_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing(key));
    }
    Url::parse(value).map_err(|_| ConfigError::InvalidUrl {
        key,
        value: value.to_string(),
    })
}

/// Parse a non-negative number, falling back to `default` for empty,
/// unparsable or negative input.
pub fn number_or_default<T>(raw: &str, default: T) -> T
where
    T: TryFrom<u64>,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => T::try_from(n as u64).unwrap_or(default),
        _ => default,
    }
}

/// Load a `.env` file when running outside a deployed environment.
///
/// `BOOKSYNC_ENV_FILE` names an explicit file, which must exist. Otherwise a
/// `.env` in the working directory is read if present, and only when
/// `BOOKSYNC_ENV` is unset or `development`.
pub fn load_env_file() -> Result<(), ConfigError> {
    if let Some(path) = std::env::var_os("BOOKSYNC_ENV_FILE") {
        dotenvy::from_path(PathBuf::from(path))?;
        return Ok(());
    }
    let env = std::env::var("BOOKSYNC_ENV").unwrap_or_default();
    if !(env.is_empty() || env == "development") {
        return Ok(());
    }
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err.into()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
