//! Outbound host allow-list.

use std::collections::BTreeSet;

use reqwest::Url;

use crate::config::AppConfig;
use crate::error::{ConfigError, SyncError};
use crate::telemetry::{self, BusinessEvent};

/// Set of `host:port` pairs the job may call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EgressFilter {
    allowed: BTreeSet<String>,
}

impl EgressFilter {
    pub fn new<'a>(urls: impl IntoIterator<Item = &'a Url>) -> Self {
        Self {
            allowed: urls.into_iter().filter_map(origin).collect(),
        }
    }

    /// Allow the CRM, SARAS and token authority hosts.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let urls = [
            config.crm_api_url()?,
            config.saras_api_url()?,
            config.authority()?,
        ];
        Ok(Self::new(urls.iter()))
    }

    pub fn is_allowed(&self, url: &Url) -> bool {
        origin(url).is_some_and(|o| self.allowed.contains(&o))
    }

    /// Refuse any URL whose host is not on the list.
    pub fn check(&self, url: &Url) -> Result<(), SyncError> {
        if self.is_allowed(url) {
            return Ok(());
        }
        let host = url.host_str().unwrap_or("<none>").to_string();
        telemetry::emit(
            BusinessEvent::NotWhitelistedUrlCall,
            &format!("blocked outbound call to {host}"),
        );
        Err(SyncError::AccessDenied {
            host,
            message: url.to_string(),
        })
    }
}

fn origin(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let port = url.port_or_known_default()?;
    Some(format!("{}:{}", host.to_ascii_lowercase(), port))
}
