//! Wallet signature verification.
//!
//! Signatures follow Ethereum `personal_sign` (EIP-191 version `0x45`): the
//! message is prefixed with `"\x19Ethereum Signed Message:\n" + len`, hashed
//! with Keccak-256 and signed with secp256k1. Verification recovers the
//! signer's public key and derives its address. Deciding whether that address
//! is the one claimed is left to the caller.

use super::identity::Identity;
use crate::error::AuthError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};

/// Length of an `r || s || v` signature in bytes.
const SIGNATURE_LEN: usize = 65;

/// Recovers the identity that produced a signature over a message.
pub trait SignatureVerifier: Send + Sync {
    /// Return the identity whose key signed `message`.
    ///
    /// `claimed` is the identity the client asserts; implementations must not
    /// use it to decide the result, only for diagnostics.
    fn verify(
        &self,
        claimed: &Identity,
        message: &str,
        signature: &str,
    ) -> Result<Identity, AuthError>;
}

/// secp256k1 `personal_sign` verifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct EthereumVerifier;

impl SignatureVerifier for EthereumVerifier {
    fn verify(
        &self,
        claimed: &Identity,
        message: &str,
        signature: &str,
    ) -> Result<Identity, AuthError> {
        let recovered = recover_signer(message, signature)?;
        tracing::debug!(claimed = %claimed, recovered = %recovered, "Recovered signer");
        Ok(recovered)
    }
}

/// EIP-191 digest of a `personal_sign` message.
pub fn hash_personal_message(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()).as_bytes());
    hasher.update(message);

    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

/// Derive the address of a secp256k1 public key.
///
/// Last 20 bytes of Keccak-256 over the uncompressed point without its
/// `0x04` tag.
pub fn address_of(key: &VerifyingKey) -> Identity {
    let point = key.as_affine().to_encoded_point(false);
    let hash = Keccak256::digest(&point.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Identity::from_address_bytes(&address)
}

/// Recover the address that signed `message`.
///
/// `signature` is hex (optionally `0x`-prefixed) encoding `r || s || v`, with
/// `v` either 27/28 or a raw recovery id 0/1.
pub fn recover_signer(message: &str, signature: &str) -> Result<Identity, AuthError> {
    let raw = signature
        .strip_prefix("0x")
        .or_else(|| signature.strip_prefix("0X"))
        .unwrap_or(signature);

    let bytes = hex::decode(raw)
        .map_err(|e| AuthError::MalformedSignature(format!("invalid hex: {}", e)))?;

    if bytes.len() != SIGNATURE_LEN {
        return Err(AuthError::MalformedSignature(format!(
            "expected {} bytes, got {}",
            SIGNATURE_LEN,
            bytes.len()
        )));
    }

    let v = bytes[64];
    let recovery_byte = match v {
        27 | 28 => v - 27,
        0 | 1 => v,
        _ => {
            return Err(AuthError::MalformedSignature(format!(
                "invalid recovery byte {}",
                v
            )))
        }
    };
    let recovery_id = RecoveryId::from_byte(recovery_byte).ok_or_else(|| {
        AuthError::MalformedSignature(format!("invalid recovery byte {}", v))
    })?;

    let sig = Signature::from_slice(&bytes[..64])
        .map_err(|e| AuthError::MalformedSignature(format!("invalid r/s: {}", e)))?;

    let digest = hash_personal_message(message.as_bytes());
    let key = VerifyingKey::recover_from_prehash(&digest, &sig, recovery_id)
        .map_err(|e| AuthError::MalformedSignature(format!("recovery failed: {}", e)))?;

    Ok(address_of(&key))
}

/// Produce a `personal_sign` signature, `0x`-prefixed hex with `v` in 27/28.
///
/// This is what a wallet does on the client side; the server only uses it for
/// the `sign` developer command.
pub fn sign_personal_message(key: &SigningKey, message: &str) -> Result<String, k256::ecdsa::Error> {
    let digest = hash_personal_message(message.as_bytes());
    let (sig, recovery_id) = key.sign_prehash_recoverable(&digest)?;

    let mut bytes = Vec::with_capacity(SIGNATURE_LEN);
    bytes.extend_from_slice(&sig.to_bytes());
    bytes.push(recovery_id.to_byte() + 27);
    Ok(format!("0x{}", hex::encode(bytes)))
}

/// Malleated twin of a valid signature: `(r, n - s)` with the recovery
/// parity flipped. Recovers the same key under plain ECDSA.
#[cfg(test)]
pub(crate) fn high_s_twin(signature: &str) -> String {
    let bytes = hex::decode(signature.trim_start_matches("0x")).unwrap();
    let sig = Signature::from_slice(&bytes[..64]).unwrap();
    let (r, s) = sig.split_scalars();

    let twin = Signature::from_scalars(r.to_bytes(), (-*s).to_bytes()).unwrap();
    assert!(twin.normalize_s().is_some(), "twin must be high-s");

    let mut out = twin.to_bytes().to_vec();
    out.push(55 - bytes[64]);
    format!("0x{}", hex::encode(out))
}
