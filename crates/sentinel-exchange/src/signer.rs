//! HMAC-SHA256 request signing for the futures REST API.
//!
//! Signed endpoints take a `timestamp` (and optional `recvWindow`) parameter
//! and a `signature` computed over the exact query string that is sent.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{SourceError, SourceResult};

type HmacSha256 = Hmac<Sha256>;

/// API credentials.
///
/// The secret is wiped from memory on drop.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: Zeroizing<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: Zeroizing::new(api_secret.into()),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Signs query strings with the account secret.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Lowercase hex HMAC-SHA256 of `query`.
    pub fn sign(&self, query: &str) -> SourceResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.api_secret.as_bytes())
            .map_err(|e| SourceError::Signing(e.to_string()))?;
        mac.update(query.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_matches_published_example() {
        // Example from the exchange API documentation
        let signer = RequestSigner::new(Credentials::new(
            "vmPUZE6mv9SD5VNHk4HlWFsOr6aKE2zvsw0MuIgwCIPy6utIco14y7Ju91duEh8A",
            "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j",
        ));
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";

        assert_eq!(
            signer.sign(query).unwrap(),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("key", "super-secret");
        let printed = format!("{creds:?}");
        assert!(printed.contains("key"));
        assert!(!printed.contains("super-secret"));
    }
}
