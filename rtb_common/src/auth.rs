//! Authenticated API clients for the Real-time Bidding and Cloud Pub/Sub APIs.
//!
//! Both constructors read the service account key named by `SampleConfig`,
//! ask a `CredentialProvider` for credentials with the API's OAuth2 scope and
//! fetch an access token eagerly, so a bad key or a revoked account fails at
//! startup instead of on the first request. Token signing and refresh belong
//! to the provider.
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::config::SampleConfig;
use crate::error::SampleError;
use crate::result::Result;

/// Version string of the Real-time Bidding v1 API.
pub const REALTIME_BIDDING_V1: &str = "v1";
/// Version used when a sample does not ask for one.
pub const DEFAULT_VERSION: &str = REALTIME_BIDDING_V1;
/// All versions `get_service` accepts.
pub const SUPPORTED_RTB_API_VERSIONS: &[&str] = &[REALTIME_BIDDING_V1];
/// Maximum number of results requested per page by list samples.
pub const MAX_PAGE_SIZE: i64 = 50;

/// OAuth2 scope of the Real-time Bidding API.
pub const REALTIME_BIDDING_SCOPE: &str = "https://www.googleapis.com/auth/realtime-bidding";
/// OAuth2 scope of the Cloud Pub/Sub API.
pub const PUBSUB_SCOPE: &str = "https://www.googleapis.com/auth/pubsub";

const REALTIME_BIDDING_ROOT_URL: &str = "https://realtimebidding.googleapis.com/";
const PUBSUB_ROOT_URL: &str = "https://pubsub.googleapis.com/v1/";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// Supported versions of the Real-time Bidding API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ApiVersion {
    /// `v1`
    #[strum(serialize = "v1")]
    V1,
}

impl ApiVersion {
    /// Parses `version`, rejecting anything not in `SUPPORTED_RTB_API_VERSIONS`.
    pub fn parse(version: &str) -> Result<Self> {
        if !SUPPORTED_RTB_API_VERSIONS.contains(&version) {
            return Err(unsupported_version(version));
        }
        ApiVersion::from_str(version).map_err(|_| unsupported_version(version))
    }
}

fn unsupported_version(version: &str) -> SampleError {
    SampleError::InvalidArgument(format!(
        "Unsupported version ({}) of the Real-Time Bidding API specified!",
        version
    ))
}

/// Contents of a service account JSON key file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    /// Always `service_account` for usable keys.
    #[serde(rename = "type")]
    pub key_type: String,
    /// Project owning the service account.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Id of the private key.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// PEM encoded private key.
    pub private_key: String,
    /// Identity of the service account.
    pub client_email: String,
    #[serde(default)]
    #[allow(missing_docs)]
    pub client_id: Option<String>,
    /// Endpoint tokens are exchanged at.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

// The private key must never end up in logs.
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_type", &self.key_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Reads and checks a key from JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let key: Self = serde_json::from_reader(reader)?;
        key.validate()?;
        Ok(key)
    }

    /// Reads and checks the key stored at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    fn validate(&self) -> Result<()> {
        if self.key_type != SERVICE_ACCOUNT_TYPE {
            return Err(SampleError::Credentials(format!(
                "expected a key of type '{}', found '{}'",
                SERVICE_ACCOUNT_TYPE, self.key_type
            )));
        }
        if self.client_email.trim().is_empty() {
            return Err(SampleError::Credentials(
                "the key has no client_email".to_string(),
            ));
        }
        if self.private_key.trim().is_empty() {
            return Err(SampleError::Credentials(
                "the key has no private_key".to_string(),
            ));
        }
        Ok(())
    }
}

/// Bearer token returned by a credential provider.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Opaque token value.
    pub token: String,
    /// Instant after which the token must not be used.
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Token valid for `seconds` from now.
    pub fn expires_in(token: impl Into<String>, seconds: i64) -> Self {
        Self {
            token: token.into(),
            expires_at: Utc::now() + Duration::seconds(seconds),
        }
    }

    /// Whether the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Credentials authorizing requests for a single OAuth2 scope.
pub trait Credentials: fmt::Debug {
    /// Scope the credentials were created for.
    fn scope(&self) -> &str;

    /// Fetches a fresh access token.
    fn fetch_access_token(&mut self) -> Result<AccessToken>;

    /// Most recently fetched token, if any.
    fn access_token(&self) -> Option<&AccessToken>;
}

/// Creates credentials from a service account key.
pub trait CredentialProvider {
    /// Builds credentials for `key` restricted to `scope`.
    fn make_credentials(&self, key: ServiceAccountKey, scope: &str) -> Result<Box<dyn Credentials>>;
}

/// Application identification sent with requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Application name.
    pub application_name: String,
    /// Application version.
    pub application_version: String,
}

impl From<&SampleConfig> for ClientOptions {
    fn from(config: &SampleConfig) -> Self {
        Self {
            application_name: config.application_name.clone(),
            application_version: config.application_version.clone(),
        }
    }
}

/// Authorized client for the Real-time Bidding API.
#[derive(Debug)]
pub struct RealTimeBiddingService {
    version: ApiVersion,
    client_options: ClientOptions,
    authorization: Box<dyn Credentials>,
}

impl RealTimeBiddingService {
    /// API version in use.
    pub fn version(&self) -> ApiVersion {
        self.version
    }

    /// Base URL of the resources for the selected version.
    pub fn base_url(&self) -> String {
        format!("{}{}/", REALTIME_BIDDING_ROOT_URL, self.version)
    }

    /// Application identification.
    pub fn client_options(&self) -> &ClientOptions {
        &self.client_options
    }

    /// Credentials authorizing requests.
    pub fn authorization(&self) -> &dyn Credentials {
        self.authorization.as_ref()
    }

    /// Mutable credentials, e.g. to refresh the token.
    pub fn authorization_mut(&mut self) -> &mut dyn Credentials {
        self.authorization.as_mut()
    }
}

/// Authorized client for the Cloud Pub/Sub API.
#[derive(Debug)]
pub struct PubsubService {
    client_options: ClientOptions,
    authorization: Box<dyn Credentials>,
}

impl PubsubService {
    /// Base URL of the resources.
    pub fn base_url(&self) -> &str {
        PUBSUB_ROOT_URL
    }

    /// Application identification.
    pub fn client_options(&self) -> &ClientOptions {
        &self.client_options
    }

    /// Credentials authorizing requests.
    pub fn authorization(&self) -> &dyn Credentials {
        self.authorization.as_ref()
    }

    /// Mutable credentials, e.g. to refresh the token.
    pub fn authorization_mut(&mut self) -> &mut dyn Credentials {
        self.authorization.as_mut()
    }
}

/// Handles authentication and initializes the Real-time Bidding client.
///
/// The caller supplies the `CredentialProvider` that signs and exchanges the
/// service account assertion; this crate does not ship one.
pub fn get_service(
    config: &SampleConfig,
    version: &str,
    provider: &dyn CredentialProvider,
) -> Result<RealTimeBiddingService> {
    let version = ApiVersion::parse(version)?;
    let authorization = authorize(config, REALTIME_BIDDING_SCOPE, provider)?;
    info!("Real-time Bidding API {} client ready", version);

    Ok(RealTimeBiddingService {
        version,
        client_options: ClientOptions::from(config),
        authorization,
    })
}

/// Handles authentication and initializes the Cloud Pub/Sub client.
///
/// As with `get_service`, the caller supplies the `CredentialProvider`.
pub fn get_cloud_pub_sub_service(
    config: &SampleConfig,
    provider: &dyn CredentialProvider,
) -> Result<PubsubService> {
    let authorization = authorize(config, PUBSUB_SCOPE, provider)?;
    info!("Cloud Pub/Sub client ready");

    Ok(PubsubService {
        client_options: ClientOptions::from(config),
        authorization,
    })
}

fn authorize(
    config: &SampleConfig,
    scope: &str,
    provider: &dyn CredentialProvider,
) -> Result<Box<dyn Credentials>> {
    debug!("Loading service account key from {}", config.key_file.display());
    let key = ServiceAccountKey::from_file(&config.key_file)?;
    info!("Authenticating as {}", key.client_email);

    let mut credentials = provider.make_credentials(key, scope)?;
    let token = credentials.fetch_access_token()?;
    debug!("Access token for {} expires at {}", scope, token.expires_at);
    Ok(credentials)
}
