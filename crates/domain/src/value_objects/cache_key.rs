//! Cache key value object
//!
//! A cache key is a 128-bit digest of the identifying fields of a simulation,
//! rendered as 32 lowercase hex characters. It doubles as the content file
//! name, so parsing rejects anything that is not plain hex.
//!
//! # Examples
//!
//! ```
//! use domain::{CacheKey, SimulationIdentity};
//!
//! let identity = SimulationIdentity::new(Some(5), Some(2), Some(1), 10);
//! let key = CacheKey::derive(&identity);
//! assert_eq!(key.as_str().len(), 32);
//! assert_eq!(CacheKey::parse(key.as_str()).unwrap(), key);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{errors::DomainError, value_objects::SimulationIdentity};

/// Number of hex characters in a cache key (16 bytes)
pub const KEY_HEX_LEN: usize = 32;

/// Deterministic identifier of a cached simulation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the cache key for a simulation identity
    ///
    /// Hashes the delimited key material with BLAKE3 and keeps the first
    /// 128 bits of the digest. Only the 128-bit width and determinism are
    /// relied on, so BLAKE3 stands in for the MD5 digest of older
    /// deployments. Keys derived by those deployments do not match; their
    /// entries regenerate on first request.
    pub fn derive(identity: &SimulationIdentity) -> Self {
        let hash = blake3::hash(identity.key_material().as_bytes());
        let hex = hash.to_hex();
        Self(hex.as_str()[..KEY_HEX_LEN].to_string())
    }

    /// Parse an externally supplied cache key
    ///
    /// # Errors
    /// Returns an error unless the input is exactly 32 ASCII hex digits.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.len() != KEY_HEX_LEN || !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidCacheKey(s.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CacheKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
