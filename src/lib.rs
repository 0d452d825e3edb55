//! OpenPGP message processing.
//!
//! This crate implements the cryptographic core of an OpenPGP
//! implementation as defined by [RFC 4880]: key fingerprinting,
//! digital signature creation and verification, hybrid (public-key
//! plus symmetric) encryption, and decryption, both asymmetric and
//! passphrase-based.
//!
//! A few features that the OpenPGP community considers to be
//! deprecated have been left out.  Version 3 signature packets are
//! not supported (version 2 and 3 *keys* are, so that their MD5
//! fingerprints can still be computed), and symmetrically encrypted
//! data packets without a modification detection code are rejected
//! rather than decrypted.
//!
//! Non-goals of this crate are ASCII armor, compression, trust
//! computation, and any sort of I/O; callers hand in packet values
//! or raw bytes and get packet values or raw bytes back.
//!
//! [RFC 4880]: https://tools.ietf.org/html/rfc4880

#![warn(missing_docs)]

pub mod fmt;
pub mod crypto;

pub mod packet;
pub use packet::Packet;

pub mod parse;
pub mod serialize;

mod message;
pub use message::Message;

pub mod types;
use crate::types::{
    HashAlgorithm,
    PublicKeyAlgorithm,
    SymmetricAlgorithm,
};

mod fingerprint;
pub use fingerprint::Fingerprint;
mod keyid;
pub use keyid::KeyID;

/// Crate result specialization.
pub type Result<T> = ::std::result::Result<T, anyhow::Error>;

#[derive(thiserror::Error, Debug, Clone)]
/// Errors returned by this module.
///
/// Note: This enum cannot be exhaustively matched to allow future
/// extensions.
#[non_exhaustive]
pub enum Error {
    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid operation.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A malformed packet.
    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    /// Unsupported packet type.
    #[error("Unsupported packet type.  Tag: {0}")]
    UnsupportedPacketType(packet::Tag),

    /// Unsupported hash algorithm identifier.
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(HashAlgorithm),

    /// Unsupported public key algorithm identifier.
    #[error("Unsupported public key algorithm: {0}")]
    UnsupportedPublicKeyAlgorithm(PublicKeyAlgorithm),

    /// Unsupported symmetric key algorithm.
    #[error("Unsupported symmetric algorithm: {0}")]
    UnsupportedSymmetricAlgorithm(SymmetricAlgorithm),

    /// Invalid session key.
    #[error("Invalid session key: {0}")]
    InvalidSessionKey(String),

    /// Malformed MPI.
    #[error("Malformed MPI: {0}")]
    MalformedMPI(String),

    /// Malformed message.
    #[error("Malformed Message: {0}")]
    MalformedMessage(String),

    /// The message's integrity protection failed.
    #[error("Message has been manipulated")]
    ManipulatedMessage,
}
