//! Public and secret key packets.
//!
//! See [Section 5.5 of RFC 4880] for the layout, and [Section 12.2]
//! for fingerprints and key ids.
//!
//! [Section 5.5 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.5
//! [Section 12.2]: https://tools.ietf.org/html/rfc4880#section-12.2

use std::io::Write;

use crate::Error;
use crate::Fingerprint;
use crate::KeyID;
use crate::Result;
use crate::crypto;
use crate::crypto::mpi;
use crate::crypto::hash::Hash;
use crate::parse::Reader;
use crate::serialize::{Serialize, write_be_u16, write_be_u32};
use crate::types::{HashAlgorithm, PublicKeyAlgorithm};

/// Holds a public or secret key packet.
///
/// A key with secret material serializes as a Secret-Key packet,
/// otherwise as a Public-Key packet.  Secret material is only
/// supported in unencrypted form; keys whose secret parts are
/// protected by a passphrase are rejected when parsing.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Key {
    /// Version of the key packet.  2, 3, and 4 are supported.
    version: u8,
    /// When the key was created.
    creation_time: u32,
    /// Validity period in days, v2/v3 keys only.
    validity_period: u16,
    /// Public key algorithm of this key.
    pk_algo: PublicKeyAlgorithm,
    /// The public MPIs.
    mpis: mpi::PublicKey,
    /// The secret MPIs, if any.
    secret: Option<mpi::SecretKey>,
}

impl Key {
    /// Creates a new key packet.
    pub fn new(version: u8, creation_time: u32,
               pk_algo: PublicKeyAlgorithm, mpis: mpi::PublicKey)
        -> Result<Self>
    {
        if !matches!(version, 2 | 3 | 4) {
            return Err(Error::InvalidArgument(
                format!("Unsupported key version {}", version)).into());
        }

        Ok(Key {
            version,
            creation_time,
            validity_period: 0,
            pk_algo,
            mpis,
            secret: None,
        })
    }

    /// Adds secret key material to this key.
    pub fn with_secret(mut self, secret: mpi::SecretKey) -> Self {
        self.secret = Some(secret);
        self
    }

    /// Returns the key packet's version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the key's creation time in seconds since the epoch.
    pub fn creation_time(&self) -> u32 {
        self.creation_time
    }

    /// Returns the key's public key algorithm.
    pub fn pk_algo(&self) -> PublicKeyAlgorithm {
        self.pk_algo
    }

    /// Returns the key's public MPIs.
    pub fn mpis(&self) -> &mpi::PublicKey {
        &self.mpis
    }

    /// Returns the key's secret MPIs, if any.
    pub fn secret(&self) -> Option<&mpi::SecretKey> {
        self.secret.as_ref()
    }

    /// Returns whether this key carries secret key material.
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Returns the material over which the key's fingerprint is
    /// computed.
    ///
    /// For v4 keys this is the `0x99`-framed canonical key body of
    /// [Section 12.2 of RFC 4880]; for v2 and v3 keys it is the raw
    /// magnitudes of the public MPIs.
    ///
    /// [Section 12.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-12.2
    pub fn fingerprint_material(&self) -> Vec<u8> {
        let mut m = Vec::new();

        if self.version == 4 {
            // The length doesn't include the tag (1 byte) or the
            // length itself (2 bytes).
            let len = (9 - 3) + self.mpis.serialized_len();

            m.push(0x99);
            m.push(((len >> 8) & 0xFF) as u8);
            m.push((len & 0xFF) as u8);

            m.push(4);
            m.push((self.creation_time >> 24) as u8);
            m.push((self.creation_time >> 16) as u8);
            m.push((self.creation_time >> 8) as u8);
            m.push(self.creation_time as u8);
            m.push(self.pk_algo.into());

            self.mpis.serialize(&mut m)
                .expect("writing to a vec does not fail");
        } else {
            for value in self.mpis.values() {
                m.extend_from_slice(value);
            }
        }

        m
    }

    /// Computes the key's fingerprint.
    ///
    /// v4 keys use SHA-1 over the canonical key material, v2 and v3
    /// keys use MD5 over the legacy material.
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        let algo = match self.version {
            4 => HashAlgorithm::SHA1,
            2 | 3 => HashAlgorithm::MD5,
            v => return Err(Error::InvalidOperation(
                format!("Unsupported key version {}", v)).into()),
        };

        let mut ctx = algo.context()?;
        self.hash(&mut ctx);
        Ok(Fingerprint::from_bytes(&ctx.into_digest()))
    }

    /// Computes the key's key id, the trailing half of the
    /// fingerprint.
    pub fn keyid(&self) -> Result<KeyID> {
        Ok(self.fingerprint()?.keyid())
    }

    /// Returns whether this key is identified by the given key id.
    ///
    /// The wildcard key id matches any key.
    pub fn matches_keyid(&self, keyid: &KeyID) -> bool {
        if keyid.is_wildcard() {
            return true;
        }

        match self.keyid() {
            Ok(kid) => &kid == keyid,
            Err(_) => false,
        }
    }

    pub(crate) fn parse(r: &mut Reader, secret: bool) -> Result<Self> {
        let version = r.u8()?;
        let (creation_time, validity_period) = match version {
            4 => (r.u32()?, 0),
            2 | 3 => (r.u32()?, r.u16()?),
            v => return Err(Error::MalformedPacket(
                format!("Unsupported key packet version {}", v)).into()),
        };
        let pk_algo: PublicKeyAlgorithm = r.u8()?.into();
        let mpis = mpi::PublicKey::parse(pk_algo, r)?;

        let secret = if secret {
            let s2k_usage = r.u8()?;
            if s2k_usage != 0 {
                return Err(Error::MalformedPacket(
                    "Encrypted secret key material is not supported"
                        .into()).into());
            }

            let sec = mpi::SecretKey::parse(pk_algo, r)?;
            let expected = r.u16()?;
            let computed = crypto::checksum(&sec.to_vec()?);
            if expected != computed {
                return Err(Error::MalformedPacket(
                    format!("Secret key checksum mismatch: \
                             expected 0x{:04x}, got 0x{:04x}",
                            expected, computed)).into());
            }
            Some(sec)
        } else {
            None
        };

        Ok(Key {
            version,
            creation_time,
            validity_period,
            pk_algo,
            mpis,
            secret,
        })
    }
}

impl Serialize for Key {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        o.write_all(&[self.version])?;
        write_be_u32(o, self.creation_time)?;
        if self.version != 4 {
            write_be_u16(o, self.validity_period)?;
        }
        o.write_all(&[self.pk_algo.into()])?;
        self.mpis.serialize(o)?;

        if let Some(sec) = &self.secret {
            // S2K usage 0: unencrypted secret material followed by
            // the 16-bit checksum.
            o.write_all(&[0])?;
            let sec = sec.to_vec()?;
            o.write_all(&sec)?;
            write_be_u16(o, crypto::checksum(&sec))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::mpi::MPI;
    use crate::parse::Reader;

    fn test_key() -> Key {
        Key::new(4, 1219723547, PublicKeyAlgorithm::RSAEncryptSign,
                 mpi::PublicKey::RSA {
                     e: MPI::new(&[0x01, 0x00, 0x01]),
                     n: MPI::new(&[0xab; 128]),
                 }).unwrap()
    }

    #[test]
    fn roundtrip() {
        let key = test_key();
        let buf = key.to_vec().unwrap();
        let key_ = Key::parse(&mut Reader::new(&buf), false).unwrap();
        assert_eq!(key, key_);
    }

    #[test]
    fn secret_roundtrip_and_checksum() {
        let key = test_key().with_secret(mpi::SecretKey::RSA {
            d: MPI::new(&[0x11; 128]),
            p: MPI::new(&[0x13; 64]),
            q: MPI::new(&[0x17; 64]),
            u: MPI::new(&[0x19; 64]),
        });
        let buf = key.to_vec().unwrap();
        let key_ = Key::parse(&mut Reader::new(&buf), true).unwrap();
        assert_eq!(key, key_);

        // Corrupting the checksum must fail the parse.
        let mut buf = buf;
        let n = buf.len();
        buf[n - 1] ^= 1;
        assert!(Key::parse(&mut Reader::new(&buf), true).is_err());
    }

    #[test]
    fn fingerprint_is_hash_of_material() {
        let key = test_key();
        let material = key.fingerprint_material();
        let digest = HashAlgorithm::SHA1.digest(&material).unwrap();
        assert_eq!(key.fingerprint().unwrap().as_bytes(), &digest[..]);
    }

    #[test]
    fn v3_fingerprint_is_md5() {
        let key = Key::new(3, 1219723547, PublicKeyAlgorithm::RSAEncryptSign,
                           mpi::PublicKey::RSA {
                               e: MPI::new(&[0x01, 0x00, 0x01]),
                               n: MPI::new(&[0xab; 128]),
                           }).unwrap();
        let fp = key.fingerprint().unwrap();
        // MD5, so 128 bits, so 32 hex digits.
        assert_eq!(fp.to_hex().len(), 32);

        let mut material = Vec::new();
        material.extend_from_slice(&[0xab; 128]);
        material.extend_from_slice(&[0x01, 0x00, 0x01]);
        assert_eq!(fp.as_bytes(),
                   &HashAlgorithm::MD5.digest(&material).unwrap()[..]);
    }

    #[test]
    fn wildcard_matches_any_key() {
        let key = test_key();
        assert!(key.matches_keyid(&KeyID::wildcard()));
        assert!(key.matches_keyid(&key.keyid().unwrap()));
        assert!(!key.matches_keyid(&KeyID::from_bytes([1; 8])));
    }
}
