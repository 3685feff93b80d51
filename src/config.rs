use std::env;
use std::fmt;

use thiserror::Error;

use crate::signing::SignatureAlgorithm;

const DEFAULT_API_BASE_URL: &str = "https://api.cloudinary.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cloudinary: CloudinaryConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Storage-service account settings. Read once at startup and shared read-only.
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub signature_algorithm: SignatureAlgorithm,
    pub api_base_url: String,
    pub resource_type: String,
}

// The secret stays out of startup logs.
impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("signature_algorithm", &self.signature_algorithm)
            .field("api_base_url", &self.api_base_url)
            .field("resource_type", &self.resource_type)
            .finish()
    }
}

/// Credentials parsed out of `cloudinary://<api_key>:<api_secret>@<cloud_name>`.
#[derive(Debug, Default, PartialEq, Eq)]
struct CloudinaryUrl {
    cloud_name: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
}

impl CloudinaryUrl {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::Invalid {
            name: "CLOUDINARY_URL",
            reason: reason.to_string(),
        };

        let rest = raw
            .trim()
            .strip_prefix("cloudinary://")
            .ok_or_else(|| invalid("expected cloudinary:// scheme"))?;
        // Query parameters carry optional SDK flags we don't use.
        let rest = rest.split('?').next().unwrap_or_default();
        let (credentials, cloud_name) = rest
            .rsplit_once('@')
            .ok_or_else(|| invalid("missing @<cloud_name>"))?;
        let (api_key, api_secret) = credentials
            .split_once(':')
            .ok_or_else(|| invalid("expected <api_key>:<api_secret>"))?;

        Ok(Self {
            cloud_name: non_empty(cloud_name.trim_end_matches('/')),
            api_key: non_empty(api_key),
            api_secret: non_empty(api_secret),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let url = match var("CLOUDINARY_URL") {
            Some(raw) => CloudinaryUrl::parse(&raw)?,
            None => CloudinaryUrl::default(),
        };

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    name: "PORT",
                    reason: e.to_string(),
                }
            })?,
            None => 3000,
        };

        let signature_algorithm = match var("CLOUDINARY_SIGNATURE_ALGORITHM") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                name: "CLOUDINARY_SIGNATURE_ALGORITHM",
                reason,
            })?,
            None => SignatureAlgorithm::default(),
        };

        Ok(Self {
            server: ServerConfig {
                port,
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            },
            cloudinary: CloudinaryConfig {
                cloud_name: var("CLOUDINARY_CLOUD_NAME")
                    .or(url.cloud_name)
                    .ok_or(ConfigError::Missing("CLOUDINARY_CLOUD_NAME"))?,
                api_key: var("CLOUDINARY_API_KEY")
                    .or(url.api_key)
                    .ok_or(ConfigError::Missing("CLOUDINARY_API_KEY"))?,
                api_secret: var("CLOUDINARY_API_SECRET")
                    .or(url.api_secret)
                    .ok_or(ConfigError::Missing("CLOUDINARY_API_SECRET"))?,
                signature_algorithm,
                api_base_url: var("CLOUDINARY_API_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
                resource_type: var("CLOUDINARY_RESOURCE_TYPE")
                    .unwrap_or_else(|| "image".to_string()),
            },
        })
    }
}
