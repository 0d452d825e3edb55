//! Multi Precision Integers.

use std::fmt;
use std::io::Write;

use crate::Error;
use crate::Result;
use crate::fmt::hex;
use crate::parse::Reader;
use crate::serialize::{Serialize, write_be_u16};
use crate::types::PublicKeyAlgorithm;

/// Holds a single MPI.
///
/// The encoding is canonical: a two-octet big endian bit count
/// followed by the minimal big endian magnitude, as described in
/// [Section 3.2 of RFC 4880].
///
/// [Section 3.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-3.2
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MPI {
    /// Integer value as big-endian.
    value: Box<[u8]>,
}

impl MPI {
    /// Creates a new MPI.
    ///
    /// This function takes care of leading zeros.
    pub fn new(value: &[u8]) -> Self {
        let mut offset = 0;
        for b in value {
            if *b != 0 {
                break;
            }
            offset += 1;
        }

        MPI {
            value: Vec::from(&value[offset..]).into_boxed_slice(),
        }
    }

    /// Returns the length of the MPI in bits.
    pub fn bits(&self) -> usize {
        self.value.len() * 8
            - self.value.get(0).map(|&b| b.leading_zeros() as usize)
                  .unwrap_or(0)
    }

    /// Returns the value of this MPI.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Number of octets the MPI occupies when serialized, including
    /// the two-octet bit count.
    pub fn serialized_len(&self) -> usize {
        2 + self.value.len()
    }

    pub(crate) fn parse(r: &mut Reader) -> Result<Self> {
        let bits = r.u16().map_err(
            |_| anyhow::Error::from(
                Error::MalformedMPI("Truncated bit count".into())))? as usize;
        let value = r.take((bits + 7) / 8).map_err(
            |_| anyhow::Error::from(
                Error::MalformedMPI(format!("Truncated value, {} bits announced", bits))))?;
        Ok(MPI::new(value))
    }
}

impl From<Vec<u8>> for MPI {
    fn from(v: Vec<u8>) -> Self {
        Self::new(&v)
    }
}

impl Serialize for MPI {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        write_be_u16(o, self.bits() as u16)?;
        o.write_all(&self.value)?;
        Ok(())
    }
}

impl fmt::Debug for MPI {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_fmt(format_args!(
            "{} bits: {}", self.bits(), hex::encode(&*self.value)))
    }
}

/// Holds a public key.
///
/// Provides a typed and structured way of storing multiple MPIs in
/// packets.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[non_exhaustive]
pub enum PublicKey {
    /// RSA public key.
    RSA {
        /// Public exponent.
        e: MPI,
        /// Public modulo N = pq.
        n: MPI,
    },

    /// NIST DSA public key.
    DSA {
        /// Prime of the ring Zp.
        p: MPI,
        /// Order of `g` in Zp.
        q: MPI,
        /// Public generator of Zp.
        g: MPI,
        /// Public key g^x mod p.
        y: MPI,
    },

    /// Unknown number of MPIs for an unknown algorithm.
    Unknown {
        /// The successfully parsed MPIs.
        mpis: Box<[MPI]>,
        /// Any data that failed to parse.
        rest: Box<[u8]>,
    },
}

impl PublicKey {
    /// Number of octets all MPIs of this instance occupy when
    /// serialized.
    pub fn serialized_len(&self) -> usize {
        use self::PublicKey::*;
        match self {
            RSA { e, n } =>
                n.serialized_len() + e.serialized_len(),

            DSA { p, q, g, y } =>
                p.serialized_len() + q.serialized_len() +
                g.serialized_len() + y.serialized_len(),

            Unknown { mpis, rest } =>
                mpis.iter().map(|m| m.serialized_len()).sum::<usize>()
                + rest.len(),
        }
    }

    /// Returns the magnitudes of all MPIs, in serialization order.
    pub(crate) fn values(&self) -> Vec<&[u8]> {
        use self::PublicKey::*;
        match self {
            RSA { e, n } => vec![n.value(), e.value()],
            DSA { p, q, g, y } =>
                vec![p.value(), q.value(), g.value(), y.value()],
            Unknown { mpis, rest } => {
                let mut v: Vec<&[u8]> =
                    mpis.iter().map(|m| m.value()).collect();
                v.push(rest);
                v
            },
        }
    }

    pub(crate) fn parse(algo: PublicKeyAlgorithm, r: &mut Reader)
        -> Result<Self>
    {
        use crate::types::PublicKeyAlgorithm::*;
        match algo {
            RSAEncryptSign | RSAEncrypt | RSASign => {
                let n = MPI::parse(r)?;
                let e = MPI::parse(r)?;
                Ok(PublicKey::RSA { e, n })
            },

            DSA => {
                let p = MPI::parse(r)?;
                let q = MPI::parse(r)?;
                let g = MPI::parse(r)?;
                let y = MPI::parse(r)?;
                Ok(PublicKey::DSA { p, q, g, y })
            },

            _ => Ok(PublicKey::Unknown {
                mpis: parse_mpis(r).into(),
                rest: r.rest().into(),
            }),
        }
    }
}

impl Serialize for PublicKey {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        use self::PublicKey::*;
        match self {
            RSA { e, n } => {
                n.serialize(o)?;
                e.serialize(o)?;
            },
            DSA { p, q, g, y } => {
                p.serialize(o)?;
                q.serialize(o)?;
                g.serialize(o)?;
                y.serialize(o)?;
            },
            Unknown { mpis, rest } => {
                for m in mpis.iter() {
                    m.serialize(o)?;
                }
                o.write_all(rest)?;
            },
        }
        Ok(())
    }
}

/// Holds a secret key.
///
/// Provides a typed and structured way of storing multiple MPIs in
/// packets.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[non_exhaustive]
pub enum SecretKey {
    /// RSA secret key.
    RSA {
        /// Secret exponent, inverse of e in Phi(N).
        d: MPI,
        /// First secret prime.
        p: MPI,
        /// Second secret prime.
        q: MPI,
        /// Inverse of p mod q.
        u: MPI,
    },

    /// NIST DSA secret key.
    DSA {
        /// Secret key log_g(y) in Zp.
        x: MPI,
    },

    /// Unknown number of MPIs for an unknown algorithm.
    Unknown {
        /// The successfully parsed MPIs.
        mpis: Box<[MPI]>,
        /// Any data that failed to parse.
        rest: Box<[u8]>,
    },
}

impl SecretKey {
    /// Number of octets all MPIs of this instance occupy when
    /// serialized.
    pub fn serialized_len(&self) -> usize {
        use self::SecretKey::*;
        match self {
            RSA { d, p, q, u } =>
                d.serialized_len() + p.serialized_len() +
                q.serialized_len() + u.serialized_len(),

            DSA { x } => x.serialized_len(),

            Unknown { mpis, rest } =>
                mpis.iter().map(|m| m.serialized_len()).sum::<usize>()
                + rest.len(),
        }
    }

    pub(crate) fn parse(algo: PublicKeyAlgorithm, r: &mut Reader)
        -> Result<Self>
    {
        use crate::types::PublicKeyAlgorithm::*;
        match algo {
            RSAEncryptSign | RSAEncrypt | RSASign => {
                let d = MPI::parse(r)?;
                let p = MPI::parse(r)?;
                let q = MPI::parse(r)?;
                let u = MPI::parse(r)?;
                Ok(SecretKey::RSA { d, p, q, u })
            },

            DSA => Ok(SecretKey::DSA { x: MPI::parse(r)? }),

            _ => Ok(SecretKey::Unknown {
                mpis: parse_mpis(r).into(),
                rest: r.rest().into(),
            }),
        }
    }
}

impl Serialize for SecretKey {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        use self::SecretKey::*;
        match self {
            RSA { d, p, q, u } => {
                d.serialize(o)?;
                p.serialize(o)?;
                q.serialize(o)?;
                u.serialize(o)?;
            },
            DSA { x } => x.serialize(o)?,
            Unknown { mpis, rest } => {
                for m in mpis.iter() {
                    m.serialize(o)?;
                }
                o.write_all(rest)?;
            },
        }
        Ok(())
    }
}

/// Holds a ciphertext.
///
/// Provides a typed and structured way of storing multiple MPIs in
/// encrypted session key packets.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[non_exhaustive]
pub enum Ciphertext {
    /// RSA ciphertext.
    RSA {
        /// m^e mod N.
        c: MPI,
    },

    /// Unknown number of MPIs for an unknown algorithm.
    Unknown {
        /// The successfully parsed MPIs.
        mpis: Box<[MPI]>,
        /// Any data that failed to parse.
        rest: Box<[u8]>,
    },
}

impl Ciphertext {
    pub(crate) fn parse(algo: PublicKeyAlgorithm, r: &mut Reader)
        -> Result<Self>
    {
        use crate::types::PublicKeyAlgorithm::*;
        match algo {
            RSAEncryptSign | RSAEncrypt | RSASign =>
                Ok(Ciphertext::RSA { c: MPI::parse(r)? }),

            _ => Ok(Ciphertext::Unknown {
                mpis: parse_mpis(r).into(),
                rest: r.rest().into(),
            }),
        }
    }
}

impl Serialize for Ciphertext {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        use self::Ciphertext::*;
        match self {
            RSA { c } => c.serialize(o)?,
            Unknown { mpis, rest } => {
                for m in mpis.iter() {
                    m.serialize(o)?;
                }
                o.write_all(rest)?;
            },
        }
        Ok(())
    }
}

/// Holds a signature.
///
/// Provides a typed and structured way of storing multiple MPIs in
/// signature packets.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[non_exhaustive]
pub enum Signature {
    /// RSA signature.
    RSA {
        /// Signature m^d mod N.
        s: MPI,
    },

    /// NIST DSA signature.
    DSA {
        /// `r` value.
        r: MPI,
        /// `s` value.
        s: MPI,
    },

    /// Unknown number of MPIs for an unknown algorithm.
    Unknown {
        /// The successfully parsed MPIs.
        mpis: Box<[MPI]>,
        /// Any data that failed to parse.
        rest: Box<[u8]>,
    },
}

impl Signature {
    pub(crate) fn parse(algo: PublicKeyAlgorithm, r: &mut Reader)
        -> Result<Self>
    {
        use crate::types::PublicKeyAlgorithm::*;
        match algo {
            RSAEncryptSign | RSAEncrypt | RSASign =>
                Ok(Signature::RSA { s: MPI::parse(r)? }),

            DSA => {
                let r_ = MPI::parse(r)?;
                let s = MPI::parse(r)?;
                Ok(Signature::DSA { r: r_, s })
            },

            _ => Ok(Signature::Unknown {
                mpis: parse_mpis(r).into(),
                rest: r.rest().into(),
            }),
        }
    }
}

impl Serialize for Signature {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        use self::Signature::*;
        match self {
            RSA { s } => s.serialize(o)?,
            DSA { r, s } => {
                r.serialize(o)?;
                s.serialize(o)?;
            },
            Unknown { mpis, rest } => {
                for m in mpis.iter() {
                    m.serialize(o)?;
                }
                o.write_all(rest)?;
            },
        }
        Ok(())
    }
}

/// Greedily parses MPIs until the reader is exhausted or the data
/// stops looking like an MPI.
fn parse_mpis(r: &mut Reader) -> Vec<MPI> {
    let mut mpis = Vec::new();
    loop {
        let bits = match r.peek_u16() {
            Some(bits) => bits as usize,
            None => break,
        };
        if r.remaining() < 2 + (bits + 7) / 8 {
            break;
        }
        let _ = r.u16();
        mpis.push(MPI::new(r.take((bits + 7) / 8)
                           .expect("length checked above")));
    }
    mpis
}
