//! SAS token cache for device authentication

use edge_shared::{defaults, generate_sas_token, ConnectionString, Credential, SasError};
use std::time::Duration;
use tracing::debug;

pub struct CachedToken {
    token: String,
    expires_at: u64,
}

/// Produces the `Authorization` value for each send
pub enum Authenticator {
    /// Signs tokens locally from a shared access key and renews them
    SharedKey {
        resource_uri: String,
        key: String,
        key_name: Option<String>,
        ttl: Duration,
        cached: Option<CachedToken>,
    },
    /// Token supplied in the connection string, never renewed
    Fixed(String),
}

impl Authenticator {
    pub fn new(connection: &ConnectionString, ttl: Duration) -> Self {
        match &connection.credential {
            Credential::SharedAccessKey { key, key_name } => Authenticator::SharedKey {
                resource_uri: connection.resource_uri(),
                key: key.clone(),
                key_name: key_name.clone(),
                ttl,
                cached: None,
            },
            Credential::SharedAccessSignature(token) => Authenticator::Fixed(token.clone()),
        }
    }

    /// Current token at `now` (Unix seconds), signing a new one if needed
    pub fn token(&mut self, now: u64) -> Result<&str, SasError> {
        match self {
            Authenticator::Fixed(token) => Ok(token.as_str()),
            Authenticator::SharedKey {
                resource_uri,
                key,
                key_name,
                ttl,
                cached,
            } => {
                let entry = match cached
                    .take()
                    .filter(|c| c.expires_at > now + defaults::SAS_RENEWAL_MARGIN_SECS)
                {
                    Some(entry) => entry,
                    None => {
                        let expires_at = now + ttl.as_secs();
                        let token = generate_sas_token(resource_uri, key, key_name.as_deref(), expires_at)?;
                        debug!("Signed new SAS token for {} (expires at {})", resource_uri, expires_at);
                        CachedToken { token, expires_at }
                    }
                };

                Ok(cached.insert(entry).token.as_str())
            }
        }
    }
}
