//! License blob decoding and signature verification.
//!
//! Layout (after base64 decoding):
//! `[2 bytes reserved][signature][JSON payload][1 byte sig length][1 byte version+flags]`
//!
//! The low 3 bits of the final byte are a format marker and must be zero; the
//! version lives in the remaining high bits. Only version 0 is understood.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

use super::features::FeatureSet;
use crate::errors::LicenseError;

const RESERVED_BYTES: usize = 2;
const TRAILER_BYTES: usize = 2;
const FORMAT_MARKER_MASK: u8 = 0b0000_0111;
const VERSION_SHIFT: u8 = 3;
const SUPPORTED_VERSION: u8 = 0;

/// Signed license payload: `{"t": holder, "g": feature bits, "e": expiry}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseClaims {
    /// License holder (organization or person).
    #[serde(rename = "t")]
    pub licensed_to: String,
    /// Granted-feature bitset.
    #[serde(rename = "g")]
    pub granted_features: FeatureSet,
    /// Expiration, Unix epoch milliseconds.
    #[serde(rename = "e")]
    pub expires_at_ms: u64,
}

/// The pieces of a decoded blob, borrowed from the decoded buffer.
struct BlobParts<'a> {
    signature: &'a [u8],
    payload: &'a [u8],
}

/// Decode, verify and parse a license key. Expiry and feature checks are the
/// gate's job; this only establishes that the payload is authentic.
pub fn verify_license_key(key: &str, public_key: &[u8; 32]) -> Result<LicenseClaims, LicenseError> {
    let bytes = STANDARD
        .decode(key.trim())
        .map_err(|e| LicenseError::Malformed(format!("base64 decode failed: {}", e)))?;

    let parts = split_blob(&bytes)?;
    verify_signature(public_key, parts.payload, parts.signature)?;

    serde_json::from_slice(parts.payload).map_err(|e| LicenseError::Corrupt(e.to_string()))
}

fn split_blob(bytes: &[u8]) -> Result<BlobParts<'_>, LicenseError> {
    if bytes.len() < RESERVED_BYTES + TRAILER_BYTES {
        return Err(LicenseError::Malformed(format!(
            "{} bytes is too short for a license",
            bytes.len()
        )));
    }

    let version_and_flags = bytes[bytes.len() - 1];
    if version_and_flags & FORMAT_MARKER_MASK != 0 {
        return Err(LicenseError::Malformed("format marker bits are set".to_string()));
    }
    let version = version_and_flags >> VERSION_SHIFT;
    if version != SUPPORTED_VERSION {
        return Err(LicenseError::UnsupportedVersion(version));
    }

    let sig_len = bytes[bytes.len() - 2] as usize;
    // At least one payload byte must sit between the signature and the trailer.
    if bytes.len() < RESERVED_BYTES + sig_len + 1 + TRAILER_BYTES {
        return Err(LicenseError::Malformed(format!(
            "{} bytes cannot hold a {}-byte signature and a payload",
            bytes.len(),
            sig_len
        )));
    }

    let sig_end = RESERVED_BYTES + sig_len;
    Ok(BlobParts {
        signature: &bytes[RESERVED_BYTES..sig_end],
        payload: &bytes[sig_end..bytes.len() - TRAILER_BYTES],
    })
}

fn verify_signature(public_key: &[u8; 32], message: &[u8], signature: &[u8]) -> Result<(), LicenseError> {
    let verifying_key = VerifyingKey::from_bytes(public_key).map_err(|_| LicenseError::BadSignature)?;
    let sig = Signature::from_slice(signature).map_err(|_| LicenseError::BadSignature)?;
    verifying_key
        .verify(message, &sig)
        .map_err(|_| LicenseError::BadSignature)
}

/// Assemble a version-0 blob from an already-computed signature and payload.
/// Used by license tooling; signing itself happens outside this crate.
pub fn encode_license_blob(signature: &[u8], payload: &[u8]) -> String {
    let mut bytes = Vec::with_capacity(RESERVED_BYTES + signature.len() + payload.len() + TRAILER_BYTES);
    bytes.extend_from_slice(&[0u8; RESERVED_BYTES]);
    bytes.extend_from_slice(signature);
    bytes.extend_from_slice(payload);
    bytes.push(signature.len() as u8);
    bytes.push(SUPPORTED_VERSION << VERSION_SHIFT);
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    fn payload() -> Vec<u8> {
        br#"{"t":"Acme","g":2,"e":4102444800000}"#.to_vec()
    }

    #[test]
    fn verifies_a_well_formed_blob() {
        let key = signing_key();
        let payload = payload();
        let blob = encode_license_blob(&key.sign(&payload).to_bytes(), &payload);

        let claims = verify_license_key(&blob, &key.verifying_key().to_bytes()).unwrap();
        assert_eq!(claims.licensed_to, "Acme");
        assert_eq!(claims.granted_features, FeatureSet(2));
        assert_eq!(claims.expires_at_ms, 4_102_444_800_000);
    }

    #[test]
    fn tampered_payload_fails_signature() {
        let key = signing_key();
        let payload = payload();
        let mut tampered = payload.clone();
        tampered[7] ^= 0x01;
        let blob = encode_license_blob(&key.sign(&payload).to_bytes(), &tampered);

        let err = verify_license_key(&blob, &key.verifying_key().to_bytes()).unwrap_err();
        assert_eq!(err, LicenseError::BadSignature);
    }

    #[test]
    fn format_marker_bits_are_rejected() {
        let mut bytes = vec![0u8; 2];
        bytes.extend_from_slice(&[1u8; 64]);
        bytes.extend_from_slice(b"{}");
        bytes.push(64);
        bytes.push(0b0000_0001);
        let err = verify_license_key(&STANDARD.encode(bytes), &[0u8; 32]).unwrap_err();
        assert!(matches!(err, LicenseError::Malformed(_)));
    }

    #[test]
    fn unknown_version_is_unparseable() {
        let mut bytes = vec![0u8; 2];
        bytes.extend_from_slice(&[1u8; 64]);
        bytes.extend_from_slice(b"{}");
        bytes.push(64);
        bytes.push(1 << VERSION_SHIFT);
        let err = verify_license_key(&STANDARD.encode(bytes), &[0u8; 32]).unwrap_err();
        assert_eq!(err, LicenseError::UnsupportedVersion(1));
    }

    #[test]
    fn signature_length_beyond_buffer_is_malformed() {
        let bytes = vec![0u8, 0, 1, 2, 3, 200, 0];
        let err = verify_license_key(&STANDARD.encode(bytes), &[0u8; 32]).unwrap_err();
        assert!(matches!(err, LicenseError::Malformed(_)));
    }

    #[test]
    fn long_field_names_are_not_a_license_payload() {
        let key = signing_key();
        let payload = br#"{"licensedTo":"Acme","grantedFeatures":2,"expiresAt":4102444800000}"#.to_vec();
        let blob = encode_license_blob(&key.sign(&payload).to_bytes(), &payload);

        let err = verify_license_key(&blob, &key.verifying_key().to_bytes()).unwrap_err();
        assert!(matches!(err, LicenseError::Corrupt(_)));
    }

    #[test]
    fn signed_garbage_is_corrupt_not_bad_signature() {
        let key = signing_key();
        let payload = b"not json".to_vec();
        let blob = encode_license_blob(&key.sign(&payload).to_bytes(), &payload);

        let err = verify_license_key(&blob, &key.verifying_key().to_bytes()).unwrap_err();
        assert!(matches!(err, LicenseError::Corrupt(_)));
    }
}
