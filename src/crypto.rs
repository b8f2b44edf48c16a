//! Cryptographic primitives
//!
//! Keccak-256 hashing and secp256k1 public key recovery for 66-byte
//! recoverable signatures.
//!
//! Signature layout:
//! - byte 0: key type tag (`0` = K1)
//! - byte 1: recovery header `v` in `27..=34`, recovery id = `(v - 27) & 3`
//! - bytes 2..66: compact `r || s`

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use tiny_keccak::{Hasher, Keccak};

/// Recoverable signature length (tag + header + r + s)
pub const SIGNATURE_LEN: usize = 66;

/// Uncompressed point without the `0x04` SEC1 tag
pub const UNCOMPRESSED_POINT_LEN: usize = 64;

const K1_KEY_TAG: u8 = 0;
const RECOVERY_HEADER_BASE: u8 = 27;
const RECOVERY_HEADER_MAX: u8 = 34;
/// Header offset marking a compressed public key
const COMPRESSED_FLAG: u8 = 4;

/// Cryptographic errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("Unsupported signature key type: {0}")]
    UnsupportedKeyType(u8),

    #[error("Invalid recovery header: {0}")]
    InvalidRecoveryHeader(u8),

    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Public key recovery failed: {0}")]
    RecoveryFailed(String),

    #[error("Invalid curve point: {0}")]
    InvalidPoint(String),

    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),
}

/// Keccak-256 (the pre-standard padding, not SHA3-256)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut keccak = Keccak::v256();
    keccak.update(data);
    let mut out = [0u8; 32];
    keccak.finalize(&mut out);
    out
}

/// Recover the compressed signer key from a digest and a 66-byte signature
pub fn recover_compressed_key(
    digest: &[u8; 32],
    signature: &[u8; SIGNATURE_LEN],
) -> Result<[u8; 33], CryptoError> {
    if signature[0] != K1_KEY_TAG {
        return Err(CryptoError::UnsupportedKeyType(signature[0]));
    }

    let header = signature[1];
    if !(RECOVERY_HEADER_BASE..=RECOVERY_HEADER_MAX).contains(&header) {
        return Err(CryptoError::InvalidRecoveryHeader(header));
    }

    let recovery_id = RecoveryId::from_i32(((header - RECOVERY_HEADER_BASE) & 3) as i32)
        .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;
    let recoverable = RecoverableSignature::from_compact(&signature[2..], recovery_id)
        .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;

    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(*digest);
    let public_key = secp
        .recover_ecdsa(&message, &recoverable)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))?;

    Ok(public_key.serialize())
}

/// Recover the signer's uncompressed 64-byte public key
pub fn recover_public_key(
    digest: &[u8; 32],
    signature: &[u8; SIGNATURE_LEN],
) -> Result<[u8; UNCOMPRESSED_POINT_LEN], CryptoError> {
    let compressed = recover_compressed_key(digest, signature)?;
    decompress_point(&compressed)
}

/// Expand a compressed secp256k1 point to raw `x || y`
pub fn decompress_point(compressed: &[u8; 33]) -> Result<[u8; UNCOMPRESSED_POINT_LEN], CryptoError> {
    let public_key =
        PublicKey::from_slice(compressed).map_err(|e| CryptoError::InvalidPoint(e.to_string()))?;

    let sec1 = public_key.serialize_uncompressed();
    let mut point = [0u8; UNCOMPRESSED_POINT_LEN];
    point.copy_from_slice(&sec1[1..]);
    Ok(point)
}

/// Sign a digest, producing the 66-byte layout `recover_public_key` accepts
pub fn sign_digest(secret_key: &SecretKey, digest: &[u8; 32]) -> [u8; SIGNATURE_LEN] {
    let secp = Secp256k1::signing_only();
    let message = Message::from_digest(*digest);
    let (recovery_id, compact) = secp
        .sign_ecdsa_recoverable(&message, secret_key)
        .serialize_compact();

    let mut signature = [0u8; SIGNATURE_LEN];
    signature[0] = K1_KEY_TAG;
    signature[1] = RECOVERY_HEADER_BASE + COMPRESSED_FLAG + recovery_id.to_i32() as u8;
    signature[2..].copy_from_slice(&compact);
    signature
}

/// Parse a 32-byte hex secret key (optional `0x` prefix)
pub fn parse_secret_key(hex_str: &str) -> Result<SecretKey, CryptoError> {
    let stripped = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    let bytes = hex::decode(stripped).map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
    SecretKey::from_slice(&bytes).map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))
}

/// Raw 64-byte public key for a secret key
pub fn public_point(secret_key: &SecretKey) -> [u8; UNCOMPRESSED_POINT_LEN] {
    let secp = Secp256k1::signing_only();
    let sec1 = PublicKey::from_secret_key(&secp, secret_key).serialize_uncompressed();
    let mut point = [0u8; UNCOMPRESSED_POINT_LEN];
    point.copy_from_slice(&sec1[1..]);
    point
}
