//! Key ids.
//!
//! A key id is the trailing eight octets of a key's fingerprint,
//! conventionally written as sixteen hexadecimal digits.  The all
//! zero key id is the wildcard: it identifies no key in particular
//! and matches every key.

use std::fmt;
use std::str::FromStr;

use crate::Error;
use crate::Result;
use crate::fmt::hex;

/// Holds a key id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyID {
    raw: [u8; 8],
}

impl KeyID {
    /// Creates a key id from eight raw bytes.
    pub fn from_bytes(raw: [u8; 8]) -> Self {
        KeyID { raw }
    }

    /// Returns the wildcard key id.
    pub fn wildcard() -> Self {
        KeyID { raw: [0; 8] }
    }

    /// Returns whether this is the wildcard key id.
    pub fn is_wildcard(&self) -> bool {
        self.raw == [0; 8]
    }

    /// Returns the raw key id bytes.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.raw
    }

    /// Converts the key id to a hexadecimal number.
    pub fn to_hex(&self) -> String {
        hex::encode(self.raw)
    }
}

impl FromStr for KeyID {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 8 {
            return Err(Error::InvalidArgument(
                format!("Expected 16 hex digits, got {}", s.len())).into());
        }
        let mut raw = [0; 8];
        raw.copy_from_slice(&bytes);
        Ok(KeyID { raw })
    }
}

impl fmt::Display for KeyID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for KeyID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("KeyID")
            .field(&self.to_hex())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard() {
        assert!(KeyID::wildcard().is_wildcard());
        assert_eq!(KeyID::wildcard().to_hex(), "0000000000000000");
        assert!(!KeyID::from_bytes([1; 8]).is_wildcard());
    }

    #[test]
    fn from_str() {
        let kid: KeyID = "BBBBBBBBAAAA0000".parse().unwrap();
        assert_eq!(kid.as_bytes(),
                   &[0xbb, 0xbb, 0xbb, 0xbb, 0xaa, 0xaa, 0x00, 0x00]);
        assert!("BBBB".parse::<KeyID>().is_err());
        assert!("not hex digits!".parse::<KeyID>().is_err());
    }
}
