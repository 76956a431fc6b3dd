//! Wallet address identities.

use crate::error::AuthError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of hex digits in an address after the `0x` prefix.
const ADDRESS_HEX_LEN: usize = 40;

/// A wallet address in normalized (lowercase) form.
///
/// Two identities are equal iff their normalized forms are equal, so
/// `0xABC…` and `0xabc…` name the same principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Parse and normalize a claimed address.
    ///
    /// Accepts `0x` or `0X` followed by exactly 40 hex digits in any case.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        if raw.is_empty() {
            return Err(AuthError::InvalidInput(
                "Wallet address is required.".to_string(),
            ));
        }

        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| {
                AuthError::InvalidInput("Wallet address must start with 0x".to_string())
            })?;

        if digits.len() != ADDRESS_HEX_LEN || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AuthError::InvalidInput(format!(
                "Wallet address must be 0x followed by {} hex digits",
                ADDRESS_HEX_LEN
            )));
        }

        Ok(Identity(format!("0x{}", digits.to_ascii_lowercase())))
    }

    /// Build an identity from the 20 raw address bytes.
    pub fn from_address_bytes(bytes: &[u8; 20]) -> Self {
        Identity(format!("0x{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identity {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identity::parse(s)
    }
}
