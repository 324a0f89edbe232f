//! Ed25519 key handling, signing, and verification.
//!
//! Keys travel as hex strings: a private key is the 32-byte Ed25519 seed,
//! a public key is the 32-byte compressed verifying key.  Signatures are the
//! raw 64-byte Ed25519 signature.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;

use chainsec_contracts::error::{ChainSecError, ChainSecResult};

const KEY_LEN: usize = 32;

/// Generate a fresh private key from the OS random number generator.
pub fn generate_private_key() -> String {
    let signing_key = SigningKey::generate(&mut OsRng);
    hex::encode(signing_key.to_bytes())
}

/// Derive the hex public key for a hex private key.
///
/// Returns `KeyFormat` when `private_key` is not 32 bytes of hex.
pub fn derive_public_key(private_key: &str) -> ChainSecResult<String> {
    let signing_key = decode_signing_key(private_key)?;
    Ok(hex::encode(signing_key.verifying_key().to_bytes()))
}

/// Sign `payload` under `private_key`.
///
/// Ed25519 is deterministic: the same key and payload always produce the
/// same signature.
pub fn sign(private_key: &str, payload: &[u8]) -> ChainSecResult<Vec<u8>> {
    let signing_key = decode_signing_key(private_key)?;
    Ok(signing_key.sign(payload).to_bytes().to_vec())
}

/// Check `signature` over `payload` under `public_key`.
///
/// Any problem (undecodable key, wrong signature length, mismatch) yields
/// `false`.  This function never panics and never returns an error.
pub fn verify(public_key: &str, payload: &[u8], signature: &[u8]) -> bool {
    let Some(verifying_key) = decode_verifying_key(public_key) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify_strict(payload, &signature).is_ok()
}

fn decode_signing_key(private_key: &str) -> ChainSecResult<SigningKey> {
    let bytes = hex::decode(private_key.trim()).map_err(|e| ChainSecError::KeyFormat {
        reason: format!("private key is not valid hex: {e}"),
    })?;
    let seed: [u8; KEY_LEN] = bytes.as_slice().try_into().map_err(|_| ChainSecError::KeyFormat {
        reason: format!("private key must be {KEY_LEN} bytes, got {}", bytes.len()),
    })?;
    Ok(SigningKey::from_bytes(&seed))
}

fn decode_verifying_key(public_key: &str) -> Option<VerifyingKey> {
    let bytes = hex::decode(public_key.trim()).ok()?;
    let raw: [u8; KEY_LEN] = bytes.as_slice().try_into().ok()?;
    VerifyingKey::from_bytes(&raw).ok()
}
