//! Modification detection code packets.
//!
//! The MDC packet holds a SHA-1 digest over the CFB prefix and the
//! plaintext of an integrity protected data packet.  See [Section
//! 5.14 of RFC 4880].
//!
//! [Section 5.14 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.14

use std::io::Write;

use crate::Error;
use crate::Result;
use crate::parse::Reader;
use crate::serialize::Serialize;

/// Holds a modification detection code packet.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MDC {
    /// Our SHA-1 hash.
    digest: [u8; 20],
}

impl MDC {
    /// Creates an MDC packet from a computed digest.
    pub fn new(digest: &[u8]) -> Result<Self> {
        if digest.len() != 20 {
            return Err(Error::InvalidArgument(
                format!("Expected a 20 octet SHA-1 digest, got {}",
                        digest.len())).into());
        }
        let mut d = [0; 20];
        d.copy_from_slice(digest);
        Ok(MDC { digest: d })
    }

    /// Returns the digest.
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    pub(crate) fn parse(r: &mut Reader) -> Result<Self> {
        MDC::new(r.take(20)?)
    }
}

impl Serialize for MDC {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        o.write_all(&self.digest)?;
        Ok(())
    }
}
