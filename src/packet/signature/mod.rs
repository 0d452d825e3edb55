//! Types for signatures.
//!
//! Only version 4 signature packets are supported; version 3
//! signatures are deprecated and rejected when parsing.

use std::io::Write;

use dsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use num_bigint_dig::BigUint;
use rand::{CryptoRng, RngCore};
use rsa::traits::PublicKeyParts;

use crate::Error;
use crate::KeyID;
use crate::Result;
use crate::crypto::asymmetric;
use crate::crypto::hash::{Context, Hash};
use crate::crypto::mpi::{self, MPI};
use crate::packet::Key;
use crate::parse::Reader;
use crate::serialize::{Serialize, write_be_u16};
use crate::types::{HashAlgorithm, PublicKeyAlgorithm, SignatureType};

pub mod subpacket;
pub use subpacket::{SubpacketArea, SubpacketTag};

/// Holds a signature packet.
///
/// See [Section 5.2 of RFC 4880] for details.
///
/// [Section 5.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Signature {
    /// Version of the signature packet. Must be 4.
    version: u8,
    /// Type of signature.
    typ: SignatureType,
    /// Public-key algorithm used for this signature.
    pk_algo: PublicKeyAlgorithm,
    /// Hash algorithm used to compute the signature.
    hash_algo: HashAlgorithm,
    /// Subpackets that are part of the signature.
    hashed_area: SubpacketArea,
    /// Subpackets that are _not_ part of the signature.
    unhashed_area: SubpacketArea,
    /// Upper 16 bits of the signed hash value.
    ///
    /// Freshly created signatures leave this at zero; verifiers must
    /// not rely on it.
    hash_prefix: [u8; 2],
    /// Signature MPIs.
    mpis: mpi::Signature,
}

impl Signature {
    /// Returns a new signature of the given type.
    ///
    /// The algorithm fields are filled in when the signature is
    /// created with [`Signature::sign_hash`].
    pub fn new(typ: SignatureType) -> Self {
        Signature {
            version: 4,
            typ,
            pk_algo: PublicKeyAlgorithm::Unknown(0),
            hash_algo: HashAlgorithm::Unknown(0),
            hashed_area: SubpacketArea::empty(),
            unhashed_area: SubpacketArea::empty(),
            hash_prefix: [0; 2],
            mpis: mpi::Signature::Unknown {
                mpis: Default::default(),
                rest: Default::default(),
            },
        }
    }

    /// Returns the version of the signature packet.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the signature type.
    pub fn typ(&self) -> SignatureType {
        self.typ
    }

    /// Sets the signature type.
    pub fn set_typ(&mut self, typ: SignatureType) {
        self.typ = typ;
    }

    /// Returns the public key algorithm.
    pub fn pk_algo(&self) -> PublicKeyAlgorithm {
        self.pk_algo
    }

    /// Returns the hash algorithm.
    pub fn hash_algo(&self) -> HashAlgorithm {
        self.hash_algo
    }

    /// Returns a reference to the hashed area.
    pub fn hashed_area(&self) -> &SubpacketArea {
        &self.hashed_area
    }

    /// Returns a reference to the unhashed area.
    pub fn unhashed_area(&self) -> &SubpacketArea {
        &self.unhashed_area
    }

    /// Returns the upper 16 bits of the signed hash, as stored in
    /// the packet.
    pub fn hash_prefix(&self) -> &[u8; 2] {
        &self.hash_prefix
    }

    /// Returns the signature MPIs.
    pub fn mpis(&self) -> &mpi::Signature {
        &self.mpis
    }

    /// Records the signature's creation time in the hashed area.
    pub fn set_signature_creation_time(&mut self, time: u32) {
        self.hashed_area.add(SubpacketTag::SignatureCreationTime,
                             &time.to_be_bytes());
    }

    /// Records the issuer's key id in the unhashed area.
    pub fn set_issuer(&mut self, issuer: KeyID) {
        self.unhashed_area.add(SubpacketTag::Issuer, issuer.as_bytes());
    }

    /// Returns the signature's creation time, if any.
    pub fn signature_creation_time(&self) -> Option<u32> {
        self.hashed_area.signature_creation_time()
            .or_else(|| self.unhashed_area.signature_creation_time())
    }

    /// Returns the issuer's key id, if any.
    ///
    /// The hashed area takes precedence over the unhashed area.
    pub fn issuer(&self) -> Option<KeyID> {
        self.hashed_area.issuer()
            .or_else(|| self.unhashed_area.issuer())
    }

    /// Signs the data in `hash` using `signer`.
    ///
    /// `hash` must already contain the signed data; this function
    /// appends the signature trailer, computes the digest, and
    /// produces the signature MPIs.  The signature's public-key
    /// algorithm field is set to the algorithm used by `signer`, the
    /// hash-algorithm field is set to `hash_algo`.
    pub fn sign_hash<R>(mut self, signer: &Key, hash_algo: HashAlgorithm,
                        mut hash: Context, rng: &mut R)
        -> Result<Signature>
        where R: RngCore + CryptoRng,
    {
        use crate::types::PublicKeyAlgorithm::*;

        // Fill out the algorithm fields, then hash the trailer.
        self.pk_algo = signer.pk_algo();
        self.hash_algo = hash_algo;
        self.hash(&mut hash);

        let digest = hash.into_digest();

        let mpis = match (signer.pk_algo(), signer.mpis(), signer.secret()) {
            (RSAEncryptSign,
             mpi::PublicKey::RSA { e, n },
             Some(mpi::SecretKey::RSA { d, p, q, .. }))
            | (RSASign,
               mpi::PublicKey::RSA { e, n },
               Some(mpi::SecretKey::RSA { d, p, q, .. })) => {
                let secret = asymmetric::rsa_private_key(e, n, d, p, q)?;

                // As described in Section 5.2.2 of RFC 4880, the
                // signature is an EMSA-PKCS1-v1_5 encoding of the
                // DigestInfo prefix and the digest.
                let padding = asymmetric::pkcs1v15_padding(hash_algo)?;
                let sig = secret.sign_with_rng(rng, padding, &digest)?;

                mpi::Signature::RSA {
                    s: MPI::new(&sig),
                }
            },

            (DSA,
             mpi::PublicKey::DSA { p, q, g, y },
             Some(mpi::SecretKey::DSA { x })) => {
                let secret = asymmetric::dsa_signing_key(p, q, g, y, x)?;

                // The digest is truncated to the size of q.
                let digest = &digest[..q.value().len().min(digest.len())];
                let sig = secret.sign_prehash(digest)?;

                mpi::Signature::DSA {
                    r: MPI::new(&sig.r().to_bytes_be()),
                    s: MPI::new(&sig.s().to_bytes_be()),
                }
            },

            (_, _, None) =>
                return Err(Error::InvalidOperation(
                    "Key has no secret material".into()).into()),

            (algo, _, _) =>
                return Err(Error::UnsupportedPublicKeyAlgorithm(algo).into()),
        };

        self.mpis = mpis;
        Ok(self)
    }

    /// Verifies the signature against the data in `hash` using
    /// `key`.
    ///
    /// `hash` must already contain the signed data; this function
    /// appends the signature trailer and checks the signature MPIs
    /// against the digest.  Returns whether the signature is valid;
    /// errors are reserved for unsupported algorithms and malformed
    /// keys.
    pub fn verify_hash(&self, key: &Key, mut hash: Context) -> Result<bool> {
        use crate::types::PublicKeyAlgorithm::*;

        self.hash(&mut hash);
        let digest = hash.into_digest();

        match (self.pk_algo, key.mpis(), &self.mpis) {
            (RSAEncryptSign,
             mpi::PublicKey::RSA { e, n },
             mpi::Signature::RSA { s })
            | (RSASign,
               mpi::PublicKey::RSA { e, n },
               mpi::Signature::RSA { s }) => {
                let public = asymmetric::rsa_public_key(e, n)?;

                // The signature is an integer; restore the leading
                // zeros its MPI form drops.
                let sig = asymmetric::left_pad(s.value(), public.size())?;
                let padding = asymmetric::pkcs1v15_padding(self.hash_algo)?;
                Ok(public.verify(padding, &digest, &sig).is_ok())
            },

            (DSA,
             mpi::PublicKey::DSA { p, q, g, y },
             mpi::Signature::DSA { r, s }) => {
                let public = asymmetric::dsa_verifying_key(p, q, g, y)?;

                let digest = &digest[..q.value().len().min(digest.len())];
                let sig = match dsa::Signature::from_components(
                    BigUint::from_bytes_be(r.value()),
                    BigUint::from_bytes_be(s.value())) {
                    Ok(sig) => sig,
                    Err(_) => return Ok(false),
                };
                Ok(public.verify_prehash(digest, &sig).is_ok())
            },

            (algo, _, _) =>
                Err(Error::UnsupportedPublicKeyAlgorithm(algo).into()),
        }
    }

    pub(crate) fn parse(r: &mut Reader) -> Result<Self> {
        let version = r.u8()?;
        if version != 4 {
            return Err(Error::MalformedPacket(
                format!("Unsupported signature packet version {}", version))
                       .into());
        }

        let typ: SignatureType = r.u8()?.into();
        let pk_algo: PublicKeyAlgorithm = r.u8()?.into();
        let hash_algo: HashAlgorithm = r.u8()?.into();

        let hashed_len = r.u16()? as usize;
        let hashed_area =
            SubpacketArea::from_bytes(r.take(hashed_len)?.to_vec());
        let unhashed_len = r.u16()? as usize;
        let unhashed_area =
            SubpacketArea::from_bytes(r.take(unhashed_len)?.to_vec());

        let mut hash_prefix = [0; 2];
        hash_prefix.copy_from_slice(r.take(2)?);

        let mpis = mpi::Signature::parse(pk_algo, r)?;

        Ok(Signature {
            version,
            typ,
            pk_algo,
            hash_algo,
            hashed_area,
            unhashed_area,
            hash_prefix,
            mpis,
        })
    }
}

impl Serialize for Signature {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        o.write_all(&[self.version, self.typ.into(),
                      self.pk_algo.into(), self.hash_algo.into()])?;

        write_be_u16(o, self.hashed_area.as_bytes().len() as u16)?;
        o.write_all(self.hashed_area.as_bytes())?;
        write_be_u16(o, self.unhashed_area.as_bytes().len() as u16)?;
        o.write_all(self.unhashed_area.as_bytes())?;

        o.write_all(&self.hash_prefix)?;
        self.mpis.serialize(o)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signature() -> Signature {
        let mut sig = Signature::new(SignatureType::Binary);
        sig.set_signature_creation_time(1219723547);
        sig.set_issuer(KeyID::from_bytes([8, 7, 6, 5, 4, 3, 2, 1]));
        sig.pk_algo = PublicKeyAlgorithm::RSAEncryptSign;
        sig.hash_algo = HashAlgorithm::SHA256;
        sig.mpis = mpi::Signature::RSA {
            s: MPI::new(&[0x42; 256]),
        };
        sig
    }

    #[test]
    fn roundtrip() {
        let sig = test_signature();
        let buf = sig.to_vec().unwrap();
        let sig_ = Signature::parse(&mut Reader::new(&buf)).unwrap();
        assert_eq!(sig, sig_);
    }

    #[test]
    fn issuer_may_live_in_either_area() {
        let sig = test_signature();
        assert_eq!(sig.issuer(),
                   Some(KeyID::from_bytes([8, 7, 6, 5, 4, 3, 2, 1])));
        assert_eq!(sig.signature_creation_time(), Some(1219723547));

        let mut sig = Signature::new(SignatureType::Binary);
        sig.hashed_area.add(SubpacketTag::Issuer, &[9; 8]);
        assert_eq!(sig.issuer(), Some(KeyID::from_bytes([9; 8])));
    }

    #[test]
    fn version_3_signatures_are_rejected() {
        assert!(Signature::parse(&mut Reader::new(
            &[3, 5, 0x00, 0x48, 0xb3, 0x5c, 0x1b, 0, 0, 0, 0])).is_err());
    }

    #[test]
    fn trailer_covers_the_hashed_area() {
        // Two signatures differing only in their hashed areas must
        // produce different digests over the same content.
        let digest = |sig: &Signature| {
            let mut ctx = HashAlgorithm::SHA256.context().unwrap();
            ctx.update(b"data");
            sig.hash(&mut ctx);
            ctx.into_digest()
        };

        let a = test_signature();
        let mut b = test_signature();
        b.set_signature_creation_time(1);
        assert_ne!(digest(&a), digest(&b));
    }
}
