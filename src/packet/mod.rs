//! Packet-related types.
//!
//! OpenPGP messages are sequences of packets.  This module provides
//! one value type per packet kind that this crate processes, and the
//! `Packet` sum over them.  See [Section 4.3 of RFC 4880] for the
//! packet tags.
//!
//! [Section 4.3 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.3

use std::fmt;
use std::io::Write;

use crate::Result;
use crate::serialize::Serialize;

mod key;
pub use key::Key;
pub mod signature;
pub use signature::Signature;
mod literal;
pub use literal::Literal;
mod userid;
pub use userid::UserID;
mod pkesk;
pub use pkesk::PKESK;
mod skesk;
pub use skesk::SKESK;
mod seip;
pub use seip::SEIP;
mod mdc;
pub use mdc::MDC;

/// The OpenPGP packet tags as defined in [Section 4.3 of RFC 4880].
///
/// [Section 4.3 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.3
#[derive(Clone, Copy, PartialEq, Eq, Debug, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Tag {
    /// Reserved packet tag.
    Reserved,
    /// Public-Key Encrypted Session Key Packet.
    PKESK,
    /// Signature Packet.
    Signature,
    /// Symmetric-Key Encrypted Session Key Packet.
    SKESK,
    /// One-Pass Signature Packet.
    OnePassSig,
    /// Secret-Key Packet.
    SecretKey,
    /// Public-Key Packet.
    PublicKey,
    /// Secret-Subkey Packet.
    SecretSubkey,
    /// Compressed Data Packet.
    CompressedData,
    /// Symmetrically Encrypted Data Packet (without integrity
    /// protection).
    SED,
    /// Marker Packet.
    Marker,
    /// Literal Data Packet.
    Literal,
    /// Trust Packet.
    Trust,
    /// User ID Packet.
    UserID,
    /// Public-Subkey Packet.
    PublicSubkey,
    /// User Attribute Packet.
    UserAttribute,
    /// Sym. Encrypted and Integrity Protected Data Packet.
    SEIP,
    /// Modification Detection Code Packet.
    MDC,
    /// Private or experimental packet tag.
    Private(u8),
    /// Unknown packet tag.
    Unknown(u8),
}

impl From<u8> for Tag {
    fn from(u: u8) -> Self {
        use self::Tag::*;
        match u {
            0 => Reserved,
            1 => PKESK,
            2 => Signature,
            3 => SKESK,
            4 => OnePassSig,
            5 => SecretKey,
            6 => PublicKey,
            7 => SecretSubkey,
            8 => CompressedData,
            9 => SED,
            10 => Marker,
            11 => Literal,
            12 => Trust,
            13 => UserID,
            14 => PublicSubkey,
            17 => UserAttribute,
            18 => SEIP,
            19 => MDC,
            60..=63 => Private(u),
            u => Unknown(u),
        }
    }
}

impl From<Tag> for u8 {
    fn from(t: Tag) -> u8 {
        use self::Tag::*;
        match t {
            Reserved => 0,
            PKESK => 1,
            Signature => 2,
            SKESK => 3,
            OnePassSig => 4,
            SecretKey => 5,
            PublicKey => 6,
            SecretSubkey => 7,
            CompressedData => 8,
            SED => 9,
            Marker => 10,
            Literal => 11,
            Trust => 12,
            UserID => 13,
            PublicSubkey => 14,
            UserAttribute => 17,
            SEIP => 18,
            MDC => 19,
            Private(u) => u,
            Unknown(u) => u,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Tag::*;
        match *self {
            Reserved => f.write_str("Reserved - a packet tag MUST NOT have this value"),
            PKESK => f.write_str("Public-Key Encrypted Session Key Packet"),
            Signature => f.write_str("Signature Packet"),
            SKESK => f.write_str("Symmetric-Key Encrypted Session Key Packet"),
            OnePassSig => f.write_str("One-Pass Signature Packet"),
            SecretKey => f.write_str("Secret-Key Packet"),
            PublicKey => f.write_str("Public-Key Packet"),
            SecretSubkey => f.write_str("Secret-Subkey Packet"),
            CompressedData => f.write_str("Compressed Data Packet"),
            SED => f.write_str("Symmetrically Encrypted Data Packet"),
            Marker => f.write_str("Marker Packet"),
            Literal => f.write_str("Literal Data Packet"),
            Trust => f.write_str("Trust Packet"),
            UserID => f.write_str("User ID Packet"),
            PublicSubkey => f.write_str("Public-Subkey Packet"),
            UserAttribute => f.write_str("User Attribute Packet"),
            SEIP => f.write_str("Sym. Encrypted and Integrity Protected Data Packet"),
            MDC => f.write_str("Modification Detection Code Packet"),
            Private(u) =>
                f.write_fmt(format_args!("Private/Experimental Packet {}", u)),
            Unknown(u) =>
                f.write_fmt(format_args!("Unknown Packet {}", u)),
        }
    }
}

/// The OpenPGP packets that this crate processes.
#[derive(Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum Packet {
    /// Public or secret key packet.
    Key(Key),
    /// Signature packet.
    Signature(Signature),
    /// Literal data packet.
    Literal(Literal),
    /// User ID packet.
    UserID(UserID),
    /// Public-key encrypted session key packet.
    PKESK(PKESK),
    /// Symmetric-key encrypted session key packet.
    SKESK(SKESK),
    /// Symmetrically encrypted integrity protected data packet.
    SEIP(SEIP),
    /// Modification detection code packet.
    MDC(MDC),
    /// Packet of a kind this crate does not process.
    ///
    /// The tag and body are preserved so that the packet survives a
    /// parse/serialize round trip.
    Unknown {
        /// The packet's tag.
        tag: Tag,
        /// The packet's body, without the header.
        body: Vec<u8>,
    },
}

impl Packet {
    /// Returns the packet's tag.
    pub fn tag(&self) -> Tag {
        match self {
            Packet::Key(k) if k.has_secret() => Tag::SecretKey,
            Packet::Key(_) => Tag::PublicKey,
            Packet::Signature(_) => Tag::Signature,
            Packet::Literal(_) => Tag::Literal,
            Packet::UserID(_) => Tag::UserID,
            Packet::PKESK(_) => Tag::PKESK,
            Packet::SKESK(_) => Tag::SKESK,
            Packet::SEIP(_) => Tag::SEIP,
            Packet::MDC(_) => Tag::MDC,
            Packet::Unknown { tag, .. } => *tag,
        }
    }

    /// Returns a reference to the key, if this is a key packet.
    pub fn key(&self) -> Option<&Key> {
        match self {
            Packet::Key(k) => Some(k),
            _ => None,
        }
    }

    /// Returns a reference to the signature, if this is a signature
    /// packet.
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            Packet::Signature(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the literal data, if this is a literal
    /// data packet.
    pub fn literal(&self) -> Option<&Literal> {
        match self {
            Packet::Literal(l) => Some(l),
            _ => None,
        }
    }

    /// Returns a reference to the user ID, if this is a user ID
    /// packet.
    pub fn user_id(&self) -> Option<&UserID> {
        match self {
            Packet::UserID(u) => Some(u),
            _ => None,
        }
    }

    /// Returns whether this packet is a key packet.
    pub fn is_key(&self) -> bool {
        matches!(self, Packet::Key(_))
    }

    /// Returns whether this packet is a secret key packet.
    pub fn is_secret_key(&self) -> bool {
        matches!(self, Packet::Key(k) if k.has_secret())
    }

    /// Returns whether a signature over this packet makes sense.
    pub fn is_signable(&self) -> bool {
        matches!(self, Packet::Key(_) | Packet::Literal(_)
                 | Packet::UserID(_))
    }
}

impl From<Key> for Packet {
    fn from(k: Key) -> Self {
        Packet::Key(k)
    }
}

impl From<Signature> for Packet {
    fn from(s: Signature) -> Self {
        Packet::Signature(s)
    }
}

impl From<Literal> for Packet {
    fn from(l: Literal) -> Self {
        Packet::Literal(l)
    }
}

impl From<UserID> for Packet {
    fn from(u: UserID) -> Self {
        Packet::UserID(u)
    }
}

impl From<PKESK> for Packet {
    fn from(p: PKESK) -> Self {
        Packet::PKESK(p)
    }
}

impl From<SKESK> for Packet {
    fn from(s: SKESK) -> Self {
        Packet::SKESK(s)
    }
}

impl From<SEIP> for Packet {
    fn from(s: SEIP) -> Self {
        Packet::SEIP(s)
    }
}

impl From<MDC> for Packet {
    fn from(m: MDC) -> Self {
        Packet::MDC(m)
    }
}

impl Serialize for Packet {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        let body = match self {
            Packet::Key(k) => k.to_vec()?,
            Packet::Signature(s) => s.to_vec()?,
            Packet::Literal(l) => l.to_vec()?,
            Packet::UserID(u) => u.to_vec()?,
            Packet::PKESK(p) => p.to_vec()?,
            Packet::SKESK(s) => s.to_vec()?,
            Packet::SEIP(s) => s.to_vec()?,
            Packet::MDC(m) => m.to_vec()?,
            Packet::Unknown { body, .. } => body.clone(),
        };

        crate::serialize::write_header(o, self.tag(), body.len())?;
        o.write_all(&body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataFormat;

    #[test]
    fn predicates() {
        let literal: Packet = Literal::new(DataFormat::Binary).into();
        assert!(literal.is_signable());
        assert!(!literal.is_key());
        assert!(!literal.is_secret_key());
        assert_eq!(literal.tag(), Tag::Literal);
        assert!(literal.literal().is_some());
        assert!(literal.key().is_none());

        let unknown = Packet::Unknown { tag: Tag::Marker, body: vec![1] };
        assert!(!unknown.is_signable());
        assert_eq!(unknown.tag(), Tag::Marker);
    }

    #[test]
    fn tags_roundtrip() {
        for t in 0..=63u8 {
            assert_eq!(u8::from(Tag::from(t)), t);
        }
    }

    #[test]
    fn unknown_packets_survive_serialization() {
        let p = Packet::Unknown { tag: Tag::Marker, body: b"PGP".to_vec() };
        let buf = p.to_vec().unwrap();
        assert_eq!(buf, vec![0xca, 3, b'P', b'G', b'P']);
        assert_eq!(crate::parse::packets(&buf).unwrap(), vec![p]);
    }
}
