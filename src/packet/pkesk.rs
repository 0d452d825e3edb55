//! Public-key encrypted session key packets.
//!
//! The session key for an encrypted message is transported under
//! each recipient's public key in one of these packets.  See
//! [Section 5.1 of RFC 4880].
//!
//! [Section 5.1 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.1

use std::io::Write;

use crate::Error;
use crate::KeyID;
use crate::Result;
use crate::crypto;
use crate::crypto::SessionKey;
use crate::crypto::asymmetric;
use crate::crypto::mpi;
use crate::packet::Key;
use crate::parse::Reader;
use crate::serialize::Serialize;
use crate::types::{PublicKeyAlgorithm, SymmetricAlgorithm};

/// Holds an asymmetrically encrypted session key.
///
/// The session key is needed to decrypt the actual ciphertext.  See
/// [Section 5.1 of RFC 4880] for details.
///
/// [Section 5.1 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.1
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PKESK {
    /// Packet version. Must be 3.
    version: u8,
    /// Key ID of the key this is encrypted to.
    ///
    /// The wildcard (all zero) key id hides the recipient; every
    /// available key is then a candidate for decryption.
    recipient: KeyID,
    /// Public key algorithm used to encrypt the session key.
    pk_algo: PublicKeyAlgorithm,
    /// The encrypted session key.
    esk: mpi::Ciphertext,
}

impl PKESK {
    /// Creates a new PKESK packet.
    pub fn new(recipient: KeyID, pk_algo: PublicKeyAlgorithm,
               esk: mpi::Ciphertext) -> Self {
        PKESK {
            version: 3,
            recipient,
            pk_algo,
            esk,
        }
    }

    /// Returns the packet's version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the recipient's key id.
    pub fn recipient(&self) -> &KeyID {
        &self.recipient
    }

    /// Returns the public key algorithm used to encrypt the session
    /// key.
    pub fn pk_algo(&self) -> PublicKeyAlgorithm {
        self.pk_algo
    }

    /// Returns the encrypted session key.
    pub fn esk(&self) -> &mpi::Ciphertext {
        &self.esk
    }

    /// Recovers the session key using the given secret key.
    ///
    /// Fails for non-RSA keys, keys without secret material, and
    /// ciphertexts that do not decrypt to a well-formed session key
    /// blob under the key.
    pub fn decrypt(&self, key: &Key)
        -> Result<(SymmetricAlgorithm, SessionKey)>
    {
        use rsa::Pkcs1v15Encrypt;
        use rsa::traits::PublicKeyParts;

        match (key.mpis(), key.secret(), &self.esk) {
            (mpi::PublicKey::RSA { e, n },
             Some(mpi::SecretKey::RSA { d, p, q, .. }),
             mpi::Ciphertext::RSA { c }) => {
                let secret = asymmetric::rsa_private_key(e, n, d, p, q)?;

                // The ciphertext is an integer; restore the leading
                // zeros its MPI form drops.
                let ct = asymmetric::left_pad(c.value(), secret.size())?;
                let blob = secret.decrypt(Pkcs1v15Encrypt, &ct)?;
                crypto::decode_session_key(&blob)
            },

            (_, None, _) => Err(Error::InvalidOperation(
                "Key has no secret material".into()).into()),

            _ => Err(Error::UnsupportedPublicKeyAlgorithm(
                key.pk_algo()).into()),
        }
    }

    pub(crate) fn parse(r: &mut Reader) -> Result<Self> {
        let version = r.u8()?;
        if version != 3 {
            return Err(Error::MalformedPacket(
                format!("Unsupported PKESK version {}", version)).into());
        }

        let mut recipient = [0; 8];
        recipient.copy_from_slice(r.take(8)?);
        let pk_algo: PublicKeyAlgorithm = r.u8()?.into();
        let esk = mpi::Ciphertext::parse(pk_algo, r)?;

        Ok(PKESK {
            version,
            recipient: KeyID::from_bytes(recipient),
            pk_algo,
            esk,
        })
    }
}

impl Serialize for PKESK {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        o.write_all(&[self.version])?;
        o.write_all(self.recipient.as_bytes())?;
        o.write_all(&[self.pk_algo.into()])?;
        self.esk.serialize(o)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::mpi::MPI;

    #[test]
    fn roundtrip() {
        let p = PKESK::new(KeyID::from_bytes([1, 2, 3, 4, 5, 6, 7, 8]),
                           PublicKeyAlgorithm::RSAEncryptSign,
                           mpi::Ciphertext::RSA {
                               c: MPI::new(&[0x99; 64]),
                           });
        let buf = p.to_vec().unwrap();
        let p_ = PKESK::parse(&mut Reader::new(&buf)).unwrap();
        assert_eq!(p, p_);
    }

    #[test]
    fn version_is_checked() {
        assert!(PKESK::parse(&mut Reader::new(
            &[2, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0])).is_err());
    }
}
