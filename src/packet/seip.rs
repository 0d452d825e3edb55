//! Symmetrically encrypted integrity protected data packets.
//!
//! An encrypted data packet is a container: its body is the
//! OpenPGP-CFB encryption of an inner message followed by an MDC
//! packet.  See [Section 5.13 of RFC 4880].
//!
//! Version 0 encrypted data packets (without the integrity
//! protection of the MDC) are not supported; parsing one fails
//! explicitly.
//!
//! [Section 5.13 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.13

use std::io::Write;

use crate::Error;
use crate::Result;
use crate::parse::Reader;
use crate::serialize::Serialize;

/// Holds an encrypted data packet.
#[derive(Clone, PartialEq, Eq)]
pub struct SEIP {
    /// The ciphertext: CFB prefix, encrypted message, encrypted MDC
    /// packet.
    body: Vec<u8>,
}

impl SEIP {
    /// Creates a SEIP packet from a ciphertext.
    pub fn new(body: Vec<u8>) -> Self {
        SEIP { body }
    }

    /// This packet is version 1.
    pub fn version(&self) -> u8 {
        1
    }

    /// Returns the ciphertext.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub(crate) fn parse(r: &mut Reader) -> Result<Self> {
        let version = r.u8()?;
        if version != 1 {
            return Err(Error::MalformedPacket(
                format!("Unsupported SEIP version {}, only MDC-protected \
                         version 1 packets are supported", version)).into());
        }
        Ok(SEIP { body: r.rest().to_vec() })
    }
}

impl std::fmt::Debug for SEIP {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("SEIP")
            .field("body", &format!("{} bytes", self.body.len()))
            .finish()
    }
}

impl Serialize for SEIP {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        o.write_all(&[1])?;
        o.write_all(&self.body)?;
        Ok(())
    }
}
