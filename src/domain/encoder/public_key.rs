//! Graphene public key strings: `<PREFIX><base58(key || ripemd160(key)[0..4])>`.

use ripemd::{Digest, Ripemd160};
use thiserror::Error;

use crate::constants::{PUBLIC_KEY_CHECKSUM_LENGTH, PUBLIC_KEY_LENGTH};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublicKeyError {
    #[error("public key must start with '{0}'")]
    WrongPrefix(String),
    #[error("public key is not valid base58: {0}")]
    InvalidBase58(String),
    #[error("public key decodes to {0} bytes, expected {expected}", expected = PUBLIC_KEY_LENGTH + PUBLIC_KEY_CHECKSUM_LENGTH)]
    InvalidLength(usize),
    #[error("public key checksum mismatch")]
    ChecksumMismatch,
}

/// Decodes a prefixed public key string and verifies its checksum.
///
/// Returns the 33 byte compressed key. The curve point itself is not validated.
pub fn decode_public_key(
    value: &str,
    prefix: &str,
) -> Result<[u8; PUBLIC_KEY_LENGTH], PublicKeyError> {
    let encoded = value
        .strip_prefix(prefix)
        .ok_or_else(|| PublicKeyError::WrongPrefix(prefix.to_string()))?;
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| PublicKeyError::InvalidBase58(e.to_string()))?;
    if bytes.len() != PUBLIC_KEY_LENGTH + PUBLIC_KEY_CHECKSUM_LENGTH {
        return Err(PublicKeyError::InvalidLength(bytes.len()));
    }

    let (key, checksum) = bytes.split_at(PUBLIC_KEY_LENGTH);
    let digest = Ripemd160::digest(key);
    if digest[..PUBLIC_KEY_CHECKSUM_LENGTH] != *checksum {
        return Err(PublicKeyError::ChecksumMismatch);
    }

    let mut out = [0u8; PUBLIC_KEY_LENGTH];
    out.copy_from_slice(key);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NULL_KEY: &str = "EON1111111111111111111111111111111114T1Anm";

    #[test]
    fn test_decode_null_key() {
        assert_eq!(decode_public_key(NULL_KEY, "EON").unwrap(), [0u8; 33]);
    }

    #[test]
    fn test_decode_key() {
        let key =
            decode_public_key("EON4tw6e36FfsDL3C8YZXGwhpPRYydrvZkSzYtmo7gMxG21UcLQTH", "EON")
                .unwrap();
        assert_eq!(key[0], 2);
        assert_eq!(key[32], 32);
    }

    #[test]
    fn test_wrong_prefix() {
        assert_eq!(
            decode_public_key(NULL_KEY, "BTS"),
            Err(PublicKeyError::WrongPrefix("BTS".to_string()))
        );
    }

    #[test]
    fn test_checksum_mismatch() {
        assert_eq!(
            decode_public_key("EON1111111111111111111111111111111114T1Ann", "EON"),
            Err(PublicKeyError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_invalid_encoding() {
        assert!(matches!(
            decode_public_key("EON0OIl", "EON"),
            Err(PublicKeyError::InvalidBase58(_))
        ));
        assert_eq!(
            decode_public_key("EON1111", "EON"),
            Err(PublicKeyError::InvalidLength(4))
        );
    }
}
