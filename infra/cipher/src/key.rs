use crate::error::CipherError;
use getrandom::fill;
use hkdf::Hkdf;
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of an AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// A 256-bit symmetric key shared between the sending peer and the storing node.
///
/// The key material is wiped from memory when the value is dropped, and `Debug`
/// never prints it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl EncryptionKey {
    /// Generates a fresh random key from the operating system's RNG.
    ///
    /// # Errors
    /// Returns [`CipherError::Internal`] if the OS random source is unavailable.
    pub fn generate() -> Result<Self, CipherError> {
        let mut key = [0u8; KEY_LEN];
        fill(&mut key).map_err(|e| CipherError::Internal {
            message: e.to_string().into(),
            context: Some("System RNG unavailable for key generation".into()),
        })?;
        Ok(Self(key))
    }

    /// Derives a key with HKDF-SHA256.
    ///
    /// # Arguments
    /// * `ikm`: Input keying material (shared secret or passphrase).
    /// * `salt`: Separates keys across deployments.
    /// * `info`: Binds the key to a purpose, e.g. a network name.
    ///
    /// # Errors
    /// Returns [`CipherError::InvalidKey`] if HKDF expansion fails.
    pub fn derive(
        ikm: impl AsRef<[u8]>,
        salt: impl AsRef<[u8]>,
        info: impl AsRef<[u8]>,
    ) -> Result<Self, CipherError> {
        let (_, hk) = Hkdf::<Sha256>::extract(Some(salt.as_ref()), ikm.as_ref());
        let mut key = [0u8; KEY_LEN];

        hk.expand(info.as_ref(), &mut key).map_err(|_| CipherError::InvalidKey {
            message: "HKDF expansion failed".into(),
            context: None,
        })?;

        Ok(Self(key))
    }

    /// Builds a key from raw bytes.
    ///
    /// # Errors
    /// Returns [`CipherError::InvalidKey`] unless exactly [`KEY_LEN`] bytes are supplied.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CipherError> {
        let key: [u8; KEY_LEN] = bytes.try_into().map_err(|_| CipherError::InvalidKey {
            message: format!("Invalid key length {}, must be {KEY_LEN} bytes", bytes.len()).into(),
            context: None,
        })?;
        Ok(Self(key))
    }

    /// Parses a hex-encoded key (64 hex characters).
    ///
    /// # Errors
    /// Returns [`CipherError::InvalidKey`] for malformed hex or a wrong length.
    pub fn from_hex(encoded: &str) -> Result<Self, CipherError> {
        let mut bytes = hex::decode(encoded.trim()).map_err(|e| CipherError::InvalidKey {
            message: e.to_string().into(),
            context: Some("Key is not valid hex".into()),
        })?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    /// Hex-encodes the key.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl From<[u8; KEY_LEN]> for EncryptionKey {
    fn from(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_differ() {
        let a = EncryptionKey::generate().unwrap();
        let b = EncryptionKey::generate().unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn derived_keys_are_stable_and_info_bound() {
        let a = EncryptionKey::derive("secret", "salt", "net-a").unwrap();
        let b = EncryptionKey::derive("secret", "salt", "net-a").unwrap();
        let c = EncryptionKey::derive("secret", "salt", "net-b").unwrap();

        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.as_bytes(), c.as_bytes());
    }

    #[test]
    fn hex_roundtrip() {
        let key = EncryptionKey::generate().unwrap();
        let parsed = EncryptionKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(key.as_bytes(), parsed.as_bytes());
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert!(matches!(
            EncryptionKey::from_slice(&[0u8; 16]),
            Err(CipherError::InvalidKey { .. })
        ));
        assert!(matches!(EncryptionKey::from_hex("abcd"), Err(CipherError::InvalidKey { .. })));
        assert!(matches!(EncryptionKey::from_hex("zz"), Err(CipherError::InvalidKey { .. })));
    }

    #[test]
    fn debug_redacts_material() {
        let key = EncryptionKey::from([7u8; KEY_LEN]);
        assert_eq!(format!("{key:?}"), "EncryptionKey(<redacted>)");
    }
}
