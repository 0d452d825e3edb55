//! String-to-Key transformations.
//!
//! The S2K mechanism expands a passphrase into a symmetric key.  See
//! [Section 3.7 of RFC 4880].
//!
//! [Section 3.7 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-3.7

use std::io::Write;

use crate::Error;
use crate::Result;
use crate::crypto::SessionKey;
use crate::crypto::mem::Password;
use crate::parse::Reader;
use crate::serialize::Serialize;
use crate::types::HashAlgorithm;

/// String-to-Key (S2K) specifiers.
///
/// The salt and iteration count are public parameters; only the
/// passphrase is secret.
#[derive(Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum S2K {
    /// Simply hashes the password.
    Simple {
        /// Hash used for key generation.
        hash: HashAlgorithm,
    },

    /// Hashes the password prefixed with a salt.
    Salted {
        /// Hash used for key generation.
        hash: HashAlgorithm,
        /// Public salt value.
        salt: [u8; 8],
    },

    /// Repeatedly hashes the password with a salt.
    ///
    /// The salt and passphrase are fed to the hash function
    /// repeatedly until `hash_bytes` octets have been processed, but
    /// always at least once in full.
    Iterated {
        /// Hash used for key generation.
        hash: HashAlgorithm,
        /// Public salt value.
        salt: [u8; 8],
        /// Number of octets to hash.
        hash_bytes: u32,
    },
}

impl S2K {
    /// Converts the given password to a key of `key_size` bytes.
    pub fn derive_key(&self, password: &Password, key_size: usize)
        -> Result<SessionKey>
    {
        let hash_algo = match self {
            S2K::Simple { hash }
            | S2K::Salted { hash, .. }
            | S2K::Iterated { hash, .. } => *hash,
        };
        let salt: &[u8] = match self {
            S2K::Simple { .. } => &[],
            S2K::Salted { salt, .. }
            | S2K::Iterated { salt, .. } => &salt[..],
        };

        let data_len = salt.len() + password.len();
        let count = match self {
            S2K::Iterated { hash_bytes, .. } =>
                (*hash_bytes as usize).max(data_len),
            _ => data_len,
        };

        let mut key = Vec::with_capacity(key_size);
        let mut zeros = 0;
        while key.len() < key_size {
            let mut ctx = hash_algo.context()?;

            // Each context after the first is preloaded with one
            // more zero octet, so that the contexts produce
            // independent output.
            ctx.update(vec![0u8; zeros]);
            zeros += 1;

            // Feed the salted password over and over; the last copy
            // is cut off at the count.
            let mut fed = 0;
            while fed < count {
                let todo = count - fed;
                if todo >= data_len {
                    ctx.update(salt);
                    ctx.update(password);
                    fed += data_len;
                } else if todo <= salt.len() {
                    ctx.update(&salt[..todo]);
                    fed = count;
                } else {
                    ctx.update(salt);
                    ctx.update(&password[..todo - salt.len()]);
                    fed = count;
                }
            }

            key.extend_from_slice(&ctx.into_digest());
        }

        key.truncate(key_size);
        Ok(SessionKey::from(key))
    }

    pub(crate) fn parse(r: &mut Reader) -> Result<Self> {
        let typ = r.u8()?;
        let hash: HashAlgorithm = r.u8()?.into();
        match typ {
            0 => Ok(S2K::Simple { hash }),
            1 => {
                let mut salt = [0; 8];
                salt.copy_from_slice(r.take(8)?);
                Ok(S2K::Salted { hash, salt })
            },
            3 => {
                let mut salt = [0; 8];
                salt.copy_from_slice(r.take(8)?);
                let hash_bytes = decode_count(r.u8()?);
                Ok(S2K::Iterated { hash, salt, hash_bytes })
            },
            t => Err(Error::MalformedPacket(
                format!("Unknown S2K type {}", t)).into()),
        }
    }
}

impl Serialize for S2K {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        match self {
            S2K::Simple { hash } =>
                o.write_all(&[0, (*hash).into()])?,
            S2K::Salted { hash, salt } => {
                o.write_all(&[1, (*hash).into()])?;
                o.write_all(salt)?;
            },
            S2K::Iterated { hash, salt, hash_bytes } => {
                o.write_all(&[3, (*hash).into()])?;
                o.write_all(salt)?;
                o.write_all(&[encode_count(*hash_bytes)?])?;
            },
        }
        Ok(())
    }
}

/// Expands the coded iteration count of [Section 3.7.1.3 of RFC
/// 4880].
///
/// [Section 3.7.1.3 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-3.7.1.3
fn decode_count(coded: u8) -> u32 {
    (16 + (coded as u32 & 15)) << ((coded >> 4) + 6)
}

/// Compresses an iteration count into the coded form.
///
/// Only the 256 decodable values are representable.
fn encode_count(count: u32) -> Result<u8> {
    for coded in 0..=255u8 {
        if decode_count(coded) == count {
            return Ok(coded);
        }
    }

    Err(Error::InvalidArgument(
        format!("Iteration count {} is not representable", count)).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coded_counts() {
        assert_eq!(decode_count(0), 1024);
        assert_eq!(decode_count(96), 65536);
        assert_eq!(decode_count(255), 65011712);

        for coded in 0..=255u8 {
            assert_eq!(encode_count(decode_count(coded)).unwrap(), coded);
        }
        assert!(encode_count(1025).is_err());
    }

    #[test]
    fn roundtrip() {
        for s2k in [
            S2K::Simple { hash: HashAlgorithm::SHA1 },
            S2K::Salted { hash: HashAlgorithm::SHA256, salt: [7; 8] },
            S2K::Iterated { hash: HashAlgorithm::SHA1, salt: [1; 8],
                            hash_bytes: 65536 },
        ] {
            let buf = s2k.to_vec().unwrap();
            let s2k_ = S2K::parse(&mut Reader::new(&buf)).unwrap();
            assert_eq!(s2k, s2k_);
        }

        assert!(S2K::parse(&mut Reader::new(&[2, 2])).is_err());
    }

    #[test]
    fn simple_is_plain_hash() {
        let password: Password = "hello".into();
        let s2k = S2K::Simple { hash: HashAlgorithm::SHA1 };

        let key = s2k.derive_key(&password, 16).unwrap();
        let digest = HashAlgorithm::SHA1.digest(b"hello").unwrap();
        assert_eq!(&key[..], &digest[..16]);

        // A key longer than one digest pulls in a second context
        // preloaded with a zero octet.
        let key = s2k.derive_key(&password, 40).unwrap();
        assert_eq!(&key[..20], &digest[..]);
        let second = HashAlgorithm::SHA1.digest(b"\x00hello").unwrap();
        assert_eq!(&key[20..], &second[..]);
    }

    #[test]
    fn salted_prepends_the_salt() {
        let password: Password = "hello".into();
        let salt = *b"saltsalt";
        let s2k = S2K::Salted { hash: HashAlgorithm::SHA1, salt };

        let key = s2k.derive_key(&password, 20).unwrap();
        let digest = HashAlgorithm::SHA1.digest(b"saltsalthello").unwrap();
        assert_eq!(&key[..], &digest[..]);
    }

    #[test]
    fn iterated_repeats_the_input() {
        let password: Password = "hello".into();
        let salt = *b"saltsalt";

        // A count smaller than one full copy still feeds the whole
        // input once.
        let s2k = S2K::Iterated { hash: HashAlgorithm::SHA1, salt,
                                  hash_bytes: 1024 };
        let key = s2k.derive_key(&password, 20).unwrap();

        let mut data = Vec::new();
        while data.len() < 1024 {
            data.extend_from_slice(b"saltsalthello");
        }
        data.truncate(1024);
        let digest = HashAlgorithm::SHA1.digest(&data).unwrap();
        assert_eq!(&key[..], &digest[..]);
    }
}
