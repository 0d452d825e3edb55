//! Functionality to hash packets, and generate hashes.

use std::io;

use digest::DynDigest;

use crate::Error;
use crate::HashAlgorithm;
use crate::Result;
use crate::packet::Key;
use crate::packet::Literal;
use crate::packet::Signature;
use crate::packet::UserID;

/// Wraps `Sha1CD` to provide `digest::FixedOutputReset`, which the
/// `sha1collisiondetection` crate does not implement on its own, so
/// that it can be used as a `Box<dyn DynDigest>`.
#[derive(Clone, Default)]
struct Sha1CDReset(sha1collisiondetection::Sha1CD);

impl digest::HashMarker for Sha1CDReset {}

impl digest::OutputSizeUser for Sha1CDReset {
    type OutputSize = <sha1collisiondetection::Sha1CD as digest::OutputSizeUser>::OutputSize;
}

impl digest::Update for Sha1CDReset {
    fn update(&mut self, data: &[u8]) {
        digest::Update::update(&mut self.0, data);
    }
}

impl digest::Reset for Sha1CDReset {
    fn reset(&mut self) {
        digest::Reset::reset(&mut self.0);
    }
}

impl digest::FixedOutput for Sha1CDReset {
    fn finalize_into(self, out: &mut digest::Output<Self>) {
        digest::FixedOutput::finalize_into(self.0, out);
    }
}

impl digest::FixedOutputReset for Sha1CDReset {
    fn finalize_into_reset(&mut self, out: &mut digest::Output<Self>) {
        digest::FixedOutput::finalize_into(self.0.clone(), out);
        digest::Reset::reset(&mut self.0);
    }
}

/// State of a hash function.
pub struct Context {
    algo: HashAlgorithm,
    ctx: Box<dyn DynDigest + Send + Sync>,
}

impl Context {
    /// Returns the algorithm.
    pub fn algo(&self) -> HashAlgorithm {
        self.algo
    }

    /// Size of the digest in bytes.
    pub fn digest_size(&self) -> usize {
        self.ctx.output_size()
    }

    /// Writes data into the hash function.
    pub fn update<D: AsRef<[u8]>>(&mut self, data: D) {
        self.ctx.update(data.as_ref());
    }

    /// Finalizes the hash function and writes the digest into the
    /// provided slice.
    ///
    /// Resets the hash function contexts.
    ///
    /// `digest` must be at least `self.digest_size()` bytes large,
    /// otherwise the digest will be truncated.
    pub fn digest<D: AsMut<[u8]>>(&mut self, mut digest: D) {
        let d = self.ctx.finalize_reset();
        let digest = digest.as_mut();
        let n = digest.len().min(d.len());
        digest[..n].copy_from_slice(&d[..n]);
    }

    /// Finalizes the hash function and returns the digest.
    pub fn into_digest(mut self) -> Vec<u8> {
        self.ctx.finalize_reset().into_vec()
    }
}

impl io::Write for Context {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl HashAlgorithm {
    /// Whether this algorithm is supported.
    pub fn is_supported(self) -> bool {
        match self {
            HashAlgorithm::MD5 => true,
            HashAlgorithm::SHA1 => true,
            HashAlgorithm::RipeMD => true,
            HashAlgorithm::SHA224 => true,
            HashAlgorithm::SHA256 => true,
            HashAlgorithm::SHA384 => true,
            HashAlgorithm::SHA512 => true,
            HashAlgorithm::Private(_) => false,
            HashAlgorithm::Unknown(_) => false,
        }
    }

    /// Creates a new hash context for this algorithm.
    ///
    /// # Errors
    ///
    /// Fails with `Error::UnsupportedHashAlgorithm` if this crate
    /// does not support the algorithm.  See
    /// [`HashAlgorithm::is_supported`].
    pub fn context(self) -> Result<Context> {
        let ctx: Box<dyn DynDigest + Send + Sync> = match self {
            HashAlgorithm::MD5 =>
                Box::new(md5::Md5::default()),
            HashAlgorithm::SHA1 =>
                Box::new(Sha1CDReset::default()),
            HashAlgorithm::RipeMD =>
                Box::new(ripemd::Ripemd160::default()),
            HashAlgorithm::SHA224 =>
                Box::new(sha2::Sha224::default()),
            HashAlgorithm::SHA256 =>
                Box::new(sha2::Sha256::default()),
            HashAlgorithm::SHA384 =>
                Box::new(sha2::Sha384::default()),
            HashAlgorithm::SHA512 =>
                Box::new(sha2::Sha512::default()),
            HashAlgorithm::Private(_) | HashAlgorithm::Unknown(_) =>
                return Err(Error::UnsupportedHashAlgorithm(self).into()),
        };

        Ok(Context { algo: self, ctx })
    }

    /// Hashes the given data and returns the digest.
    pub fn digest<D: AsRef<[u8]>>(self, data: D) -> Result<Vec<u8>> {
        let mut ctx = self.context()?;
        ctx.update(data);
        Ok(ctx.into_digest())
    }

    /// Returns the prefix of a serialized `DigestInfo` structure
    /// naming this hash algorithm.
    ///
    /// These are the literal byte tables of [Section 5.2.2 of RFC
    /// 4880], used by the EMSA-PKCS1-v1_5 encoding of RSA
    /// signatures.
    ///
    /// [Section 5.2.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.2
    pub fn pkcs1_digestinfo_prefix(self) -> Result<&'static [u8]> {
        Ok(match self {
            HashAlgorithm::MD5 =>
                &[0x30, 0x20, 0x30, 0x0c, 0x06, 0x08, 0x2a, 0x86,
                  0x48, 0x86, 0xf7, 0x0d, 0x02, 0x05, 0x05, 0x00,
                  0x04, 0x10],
            HashAlgorithm::SHA1 =>
                &[0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e,
                  0x03, 0x02, 0x1a, 0x05, 0x00, 0x04, 0x14],
            HashAlgorithm::RipeMD =>
                &[0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2b, 0x24,
                  0x03, 0x02, 0x01, 0x05, 0x00, 0x04, 0x14],
            HashAlgorithm::SHA224 =>
                &[0x30, 0x2d, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86,
                  0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x04, 0x05,
                  0x00, 0x04, 0x1c],
            HashAlgorithm::SHA256 =>
                &[0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86,
                  0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01, 0x05,
                  0x00, 0x04, 0x20],
            HashAlgorithm::SHA384 =>
                &[0x30, 0x41, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86,
                  0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x02, 0x05,
                  0x00, 0x04, 0x30],
            HashAlgorithm::SHA512 =>
                &[0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86,
                  0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03, 0x05,
                  0x00, 0x04, 0x40],
            HashAlgorithm::Private(_) | HashAlgorithm::Unknown(_) =>
                return Err(Error::UnsupportedHashAlgorithm(self).into()),
        })
    }
}

/// Hashes OpenPGP packets and related types.
pub trait Hash {
    /// Updates the given hash with this object.
    fn hash(&self, hash: &mut Context);
}

impl Hash for UserID {
    /// Update the Hash with a hash of the user id.
    fn hash(&self, hash: &mut Context) {
        let mut header = [0; 5];

        header[0] = 0xB4;
        let len = self.value().len() as u32;
        header[1] = (len >> 24) as u8;
        header[2] = (len >> 16) as u8;
        header[3] = (len >> 8) as u8;
        header[4] = len as u8;

        hash.update(&header[..]);
        hash.update(self.value());
    }
}

impl Hash for Key {
    /// Update the Hash with the key's fingerprint material.
    ///
    /// For v4 keys this is the `0x99`-framed canonical key body of
    /// [Section 12.2 of RFC 4880]; for v2 and v3 keys it is the raw
    /// magnitudes of the public MPIs.
    ///
    /// [Section 12.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-12.2
    fn hash(&self, hash: &mut Context) {
        hash.update(self.fingerprint_material());
    }
}

impl Hash for Signature {
    /// Adds the `Signature`'s trailer to the provided hash context.
    ///
    /// A version 4 signature hashes its header, the hashed subpacket
    /// area, and the final length trailer.  See [Section 5.2.4 of
    /// RFC 4880].
    ///
    /// [Section 5.2.4 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.4
    fn hash(&self, hash: &mut Context) {
        // A version 4 signature packet is laid out as follows:
        //
        //   version - 1 byte                    \
        //   type - 1 byte                        \
        //   pk_algo - 1 byte                      \
        //   hash_algo - 1 byte                      Included in the hash
        //   hashed_area_len - 2 bytes (big endian)/
        //   hashed_area                         _/
        //   ...                                 <- Not included in the hash

        let mut header = [0u8; 6];

        header[0] = 4;
        header[1] = self.typ().into();
        header[2] = self.pk_algo().into();
        header[3] = self.hash_algo().into();

        // The length of the hashed area, as a 16-bit big endian
        // number.
        let len = self.hashed_area().as_bytes().len();
        header[4] = (len >> 8) as u8;
        header[5] = len as u8;

        hash.update(&header[..]);
        hash.update(self.hashed_area().as_bytes());

        // A version 4 signature trailer is:
        //
        //   version - 1 byte
        //   0xFF (constant) - 1 byte
        //   amount - 4 bytes (big endian)
        //
        // The amount field is the amount of hashed from this packet
        // (this excludes the message content, and this trailer).
        let mut trailer = [0u8; 6];

        trailer[0] = 0x4;
        trailer[1] = 0xff;
        let len = header.len() + self.hashed_area().as_bytes().len();
        trailer[2] = (len >> 24) as u8;
        trailer[3] = (len >> 16) as u8;
        trailer[4] = (len >> 8) as u8;
        trailer[5] = len as u8;

        hash.update(&trailer[..]);
    }
}

/// Hashing-related functionality.
impl Signature {
    /// Computes the message digest of a signature over a literal
    /// data packet.
    pub fn literal_hash(&self, literal: &Literal) -> Result<Vec<u8>> {
        let mut h = self.hash_algo().context()?;

        h.update(literal.body());
        self.hash(&mut h);

        Ok(h.into_digest())
    }

    /// Computes the message digest of a certification over the
    /// specified key and user ID.
    pub fn userid_binding_hash(&self, key: &Key, userid: &UserID)
        -> Result<Vec<u8>>
    {
        let mut h = self.hash_algo().context()?;

        key.hash(&mut h);
        userid.hash(&mut h);
        self.hash(&mut h);

        Ok(h.into_digest())
    }
}
