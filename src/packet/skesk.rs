//! Symmetric-key encrypted session key packets.
//!
//! A passphrase-protected message carries one of these packets.  If
//! the packet has no encrypted session key of its own, the key
//! derived from the passphrase *is* the message's session key.  See
//! [Section 5.3 of RFC 4880].
//!
//! [Section 5.3 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.3

use std::io::Write;

use crate::Error;
use crate::Result;
use crate::crypto;
use crate::crypto::{S2K, SessionKey};
use crate::crypto::mem::Password;
use crate::crypto::symmetric;
use crate::parse::Reader;
use crate::serialize::Serialize;
use crate::types::SymmetricAlgorithm;

/// Holds a symmetrically encrypted session key.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SKESK {
    /// Packet version. Must be 4.
    version: u8,
    /// Symmetric algorithm the session key is used with.
    sym_algo: SymmetricAlgorithm,
    /// How the passphrase expands into a key.
    s2k: S2K,
    /// The encrypted session key, if any.
    ///
    /// Absent means the S2K-derived key is the session key itself.
    esk: Option<Vec<u8>>,
}

impl SKESK {
    /// Creates a new SKESK packet.
    pub fn new(sym_algo: SymmetricAlgorithm, s2k: S2K,
               esk: Option<Vec<u8>>) -> Self {
        SKESK {
            version: 4,
            sym_algo,
            s2k,
            esk,
        }
    }

    /// Returns the packet's version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the symmetric algorithm.
    pub fn sym_algo(&self) -> SymmetricAlgorithm {
        self.sym_algo
    }

    /// Returns the S2K specifier.
    pub fn s2k(&self) -> &S2K {
        &self.s2k
    }

    /// Returns the encrypted session key, if any.
    pub fn esk(&self) -> Option<&[u8]> {
        self.esk.as_deref()
    }

    /// Derives the key inside this SKESK from `password`.
    ///
    /// Returns a tuple of the symmetric cipher to use with the key
    /// and the key itself.  If the packet has no encrypted session
    /// key, the key derived from the passphrase is the session key.
    pub fn decrypt(&self, password: &Password)
        -> Result<(SymmetricAlgorithm, SessionKey)>
    {
        let key = self.s2k.derive_key(password, self.sym_algo.key_size()?)?;

        match &self.esk {
            None => Ok((self.sym_algo, key)),
            Some(esk) => {
                // The derived key decrypts the session key blob in
                // plain CFB mode, zero IV.
                let cipher = self.sym_algo.cipher(&key)?;
                let blob = symmetric::cfb_decrypt(&*cipher, esk);
                crypto::decode_session_key(&blob)
            },
        }
    }

    pub(crate) fn parse(r: &mut Reader) -> Result<Self> {
        let version = r.u8()?;
        if version != 4 {
            return Err(Error::MalformedPacket(
                format!("Unsupported SKESK version {}", version)).into());
        }

        let sym_algo: SymmetricAlgorithm = r.u8()?.into();
        let s2k = S2K::parse(r)?;
        let rest = r.rest();
        let esk = if rest.is_empty() {
            None
        } else {
            Some(rest.to_vec())
        };

        Ok(SKESK {
            version,
            sym_algo,
            s2k,
            esk,
        })
    }
}

impl Serialize for SKESK {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        o.write_all(&[self.version, self.sym_algo.into()])?;
        self.s2k.serialize(o)?;
        if let Some(esk) = &self.esk {
            o.write_all(esk)?;
        }
        Ok(())
    }
}
