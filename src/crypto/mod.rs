//! Cryptographic primitives.

use rand::{CryptoRng, RngCore};

pub(crate) mod asymmetric;
pub mod hash;
pub mod mem;
pub mod mpi;
mod s2k;
pub use s2k::S2K;
pub(crate) mod symmetric;

/// Holds a session key.
///
/// The session key is cleared when dropped.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SessionKey(mem::Protected);

impl SessionKey {
    /// Creates a new session key from random bytes.
    pub fn new<R>(rng: &mut R, size: usize) -> Self
        where R: RngCore + CryptoRng,
    {
        let mut sk = vec![0; size];
        rng.fill_bytes(&mut sk);
        Self(sk.into())
    }
}

impl std::ops::Deref for SessionKey {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for SessionKey {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl From<mem::Protected> for SessionKey {
    fn from(v: mem::Protected) -> Self {
        SessionKey(v)
    }
}

impl From<Vec<u8>> for SessionKey {
    fn from(v: Vec<u8>) -> Self {
        SessionKey(v.into())
    }
}

impl From<&[u8]> for SessionKey {
    fn from(v: &[u8]) -> Self {
        SessionKey(v.into())
    }
}

/// Computes the simple 16-bit checksum over a byte sequence.
///
/// This is the sum of all octets, mod 65536.  It is used both by the
/// session key blob inside encrypted session key packets and by the
/// secret key material of an unencrypted secret key packet.  See
/// [Section 5.1 and Section 5.5.3 of RFC 4880].
///
/// [Section 5.1 and Section 5.5.3 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.1
pub(crate) fn checksum(b: &[u8]) -> u16 {
    b.iter().fold(0u16, |acc, &x| acc.wrapping_add(x as u16))
}

/// Encodes a session key blob for transport.
///
/// The blob is the algorithm octet, the raw key, and the 16-bit
/// checksum over the key, as carried inside encrypted session key
/// packets.
pub(crate) fn encode_session_key(algo: crate::types::SymmetricAlgorithm,
                                 sk: &SessionKey) -> mem::Protected
{
    let mut blob = Vec::with_capacity(1 + sk.len() + 2);
    blob.push(algo.into());
    blob.extend_from_slice(sk);
    blob.extend_from_slice(&checksum(sk).to_be_bytes());
    blob.into()
}

/// Decodes a session key blob.
///
/// The inverse of [`encode_session_key`]; the checksum is verified.
pub(crate) fn decode_session_key(blob: &[u8])
    -> crate::Result<(crate::types::SymmetricAlgorithm, SessionKey)>
{
    use crate::Error;

    if blob.len() < 3 {
        return Err(Error::InvalidSessionKey(
            format!("Session key blob too short: {} bytes", blob.len()))
                   .into());
    }

    let algo = crate::types::SymmetricAlgorithm::from(blob[0]);
    let (key, chk) = blob[1..].split_at(blob.len() - 3);
    let expected = u16::from_be_bytes([chk[0], chk[1]]);
    if checksum(key) != expected {
        return Err(Error::InvalidSessionKey(
            "Session key checksum mismatch".into()).into());
    }

    Ok((algo, key.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_sum_mod_65536() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[1, 2, 3]), 6);
        assert_eq!(checksum(&[0xff; 257]), (0xff * 257u32 % 65536) as u16);
    }

    #[test]
    fn session_key_blob_roundtrip() {
        use crate::types::SymmetricAlgorithm;

        let sk: SessionKey = vec![7u8; 16].into();
        let blob = encode_session_key(SymmetricAlgorithm::AES128, &sk);
        assert_eq!(blob.len(), 19);

        let (algo, sk_) = decode_session_key(&blob).unwrap();
        assert_eq!(algo, SymmetricAlgorithm::AES128);
        assert_eq!(sk, sk_);

        // A flipped key byte fails the checksum.
        let mut bad = blob.to_vec();
        bad[1] ^= 1;
        assert!(decode_session_key(&bad).is_err());

        assert!(decode_session_key(&[7, 0]).is_err());
    }

    #[test]
    fn session_key_is_random() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let a = SessionKey::new(&mut rng, 16);
        let b = SessionKey::new(&mut rng, 16);
        assert_eq!(a.len(), 16);
        assert!(a != b);
    }
}
