//! Shared access signature (SAS) tokens
//!
//! Token format:
//! ```text
//! SharedAccessSignature sr=<url(resource)>&sig=<url(base64(hmac))>&se=<expiry>[&skn=<key name>]
//! ```
//! The HMAC-SHA256 is computed over `<url(resource)>\n<expiry>` with the
//! base64-decoded shared access key.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use url::form_urlencoded;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur while signing a token
#[derive(Error, Debug)]
pub enum SasError {
    #[error("Shared access key is not valid base64: {0}")]
    InvalidKey(#[from] base64::DecodeError),

    #[error("Shared access key has an invalid length for HMAC-SHA256")]
    InvalidKeyLength,
}

fn url_encode(input: &str) -> String {
    form_urlencoded::byte_serialize(input.as_bytes()).collect()
}

/// Sign a SAS token for `resource_uri` valid until `expiry` (Unix seconds)
pub fn generate_sas_token(
    resource_uri: &str,
    key: &str,
    key_name: Option<&str>,
    expiry: u64,
) -> Result<String, SasError> {
    let decoded_key = STANDARD.decode(key.trim())?;
    let resource = url_encode(resource_uri);
    let string_to_sign = format!("{}\n{}", resource, expiry);

    let mut mac = HmacSha256::new_from_slice(&decoded_key).map_err(|_| SasError::InvalidKeyLength)?;
    mac.update(string_to_sign.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    let mut token = format!(
        "SharedAccessSignature sr={}&sig={}&se={}",
        resource,
        url_encode(&signature),
        expiry
    );
    if let Some(name) = key_name {
        token.push_str("&skn=");
        token.push_str(&url_encode(name));
    }
    Ok(token)
}
