//! Symmetric encryption: block ciphers and the OpenPGP CFB mode.
//!
//! OpenPGP encrypts data in cipher feedback mode with an all-zero
//! initialization vector.  Instead of a transmitted IV, a block of
//! random bytes plus a two-octet repeat of its tail (the "quick
//! check") is prepended to the plaintext.  See [Section 13.9 of RFC
//! 4880].
//!
//! [Section 13.9 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-13.9

use cipher::{BlockEncrypt, KeyInit};
use cipher::generic_array::GenericArray;
use rand::{CryptoRng, RngCore};

use crate::Error;
use crate::Result;
use crate::types::{HashAlgorithm, SymmetricAlgorithm};

/// A keyed block cipher.
///
/// CFB mode only ever uses the forward direction of the block
/// cipher, so a single-block encryption primitive is all the codec
/// needs.
pub(crate) trait Cipher: Send + Sync {
    /// Block size of the cipher in bytes.
    fn block_size(&self) -> usize;

    /// Encrypts a single block in place.
    ///
    /// `block` must be exactly `block_size()` bytes long.
    fn encrypt_block(&self, block: &mut [u8]);
}

impl<C> Cipher for C
    where C: BlockEncrypt + Send + Sync,
{
    fn block_size(&self) -> usize {
        <C as cipher::BlockSizeUser>::block_size()
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        BlockEncrypt::encrypt_block(
            self, GenericArray::from_mut_slice(block));
    }
}

impl SymmetricAlgorithm {
    /// Length of a key for this algorithm in bytes.
    ///
    /// Fails if the algorithm isn't known to OpenPGP.
    pub fn key_size(self) -> Result<usize> {
        match self {
            SymmetricAlgorithm::IDEA => Ok(16),
            SymmetricAlgorithm::TripleDES => Ok(24),
            SymmetricAlgorithm::CAST5 => Ok(16),
            // RFC 4880 allows up to 72 octets, this crate commits to
            // 128-bit Blowfish keys.
            SymmetricAlgorithm::Blowfish => Ok(16),
            SymmetricAlgorithm::AES128 => Ok(16),
            SymmetricAlgorithm::AES192 => Ok(24),
            SymmetricAlgorithm::AES256 => Ok(32),
            SymmetricAlgorithm::Twofish => Ok(32),
            _ => Err(Error::UnsupportedSymmetricAlgorithm(self).into()),
        }
    }

    /// Block size of this algorithm in bytes.
    ///
    /// Fails if the algorithm isn't known to OpenPGP.
    pub fn block_size(self) -> Result<usize> {
        match self {
            SymmetricAlgorithm::IDEA => Ok(8),
            SymmetricAlgorithm::TripleDES => Ok(8),
            SymmetricAlgorithm::CAST5 => Ok(8),
            SymmetricAlgorithm::Blowfish => Ok(8),
            SymmetricAlgorithm::AES128 => Ok(16),
            SymmetricAlgorithm::AES192 => Ok(16),
            SymmetricAlgorithm::AES256 => Ok(16),
            SymmetricAlgorithm::Twofish => Ok(16),
            _ => Err(Error::UnsupportedSymmetricAlgorithm(self).into()),
        }
    }

    /// Whether this algorithm is supported by the cipher factory.
    pub fn is_supported(self) -> bool {
        use crate::types::SymmetricAlgorithm::*;
        matches!(self, AES128 | AES192 | AES256 | Blowfish)
    }

    /// Creates a block cipher keyed with `key`.
    ///
    /// Fails with `Error::UnsupportedSymmetricAlgorithm` for
    /// algorithms the factory does not implement, and with the
    /// underlying cipher's error if the key has the wrong length.
    pub(crate) fn cipher(self, key: &[u8]) -> Result<Box<dyn Cipher>> {
        if key.len() != self.key_size()? {
            return Err(Error::InvalidSessionKey(
                format!("Key length {} does not match {}",
                        key.len(), self)).into());
        }

        match self {
            SymmetricAlgorithm::AES128 =>
                Ok(Box::new(aes::Aes128::new_from_slice(key)?)),
            SymmetricAlgorithm::AES192 =>
                Ok(Box::new(aes::Aes192::new_from_slice(key)?)),
            SymmetricAlgorithm::AES256 =>
                Ok(Box::new(aes::Aes256::new_from_slice(key)?)),
            SymmetricAlgorithm::Blowfish => {
                // Blowfish is generic over the byte order; OpenPGP
                // uses the big endian variant.
                let cipher: blowfish::Blowfish =
                    blowfish::Blowfish::new_from_slice(key)?;
                Ok(Box::new(cipher))
            },
            _ => Err(Error::UnsupportedSymmetricAlgorithm(self).into()),
        }
    }
}

/// The trailing bytes appended to the plaintext before encryption.
pub(crate) enum CfbTrailer {
    /// No trailer.
    None,
    /// A modification detection code packet covering the CFB prefix
    /// and the plaintext.
    Mdc,
}

/// Runs the raw CFB keystream over full blocks, in place.
///
/// The IV is all zeros; `buf`'s length must be a multiple of the
/// block size.
fn cfb_process(cipher: &dyn Cipher, buf: &mut [u8], decrypt: bool) {
    let bs = cipher.block_size();
    debug_assert_eq!(buf.len() % bs, 0);

    let mut fre = vec![0u8; bs];
    for chunk in buf.chunks_mut(bs) {
        cipher.encrypt_block(&mut fre);
        for (i, b) in chunk.iter_mut().enumerate() {
            if decrypt {
                let ct = *b;
                *b ^= fre[i];
                fre[i] = ct;
            } else {
                *b ^= fre[i];
                fre[i] = *b;
            }
        }
    }
}

/// Zero-pads `buf` to a whole number of blocks, runs the keystream,
/// and drops the padding tail again.
///
/// The padding is unconditional: an already aligned buffer gains,
/// and then loses, one full block.
fn cfb_process_padded(cipher: &dyn Cipher, buf: &mut Vec<u8>, decrypt: bool) {
    let bs = cipher.block_size();
    let len = buf.len();
    buf.resize(len + (bs - len % bs), 0);
    cfb_process(cipher, buf, decrypt);
    buf.truncate(len);
}

/// Encrypts `plaintext` in the OpenPGP CFB variant.
///
/// A block of random bytes and the two-octet quick check repeat are
/// prepended; the optional trailer is appended.  Returns the
/// ciphertext, which has the same length as the assembled body.
pub(crate) fn pgp_cfb_encrypt<R>(cipher: &dyn Cipher, rng: &mut R,
                                 plaintext: &[u8], trailer: CfbTrailer)
    -> Result<Vec<u8>>
    where R: RngCore + CryptoRng,
{
    let bs = cipher.block_size();

    let mut body = vec![0u8; bs + 2];
    rng.fill_bytes(&mut body[..bs]);
    body[bs] = body[bs - 2];
    body[bs + 1] = body[bs - 1];

    body.extend_from_slice(plaintext);

    match trailer {
        CfbTrailer::None => (),
        CfbTrailer::Mdc => {
            let mut ctx = HashAlgorithm::SHA1.context()?;
            ctx.update(&body);
            ctx.update([0xd3, 0x14]);
            let digest = ctx.into_digest();

            body.extend_from_slice(&[0xd3, 0x14]);
            body.extend_from_slice(&digest);
        },
    }

    cfb_process_padded(cipher, &mut body, false);
    Ok(body)
}

/// Decrypts an OpenPGP CFB ciphertext.
///
/// Returns the random prefix together with its quick check repeat,
/// and the remaining plaintext.  Callers may validate the quick
/// check; the high-level decryption flow treats the MDC as
/// authoritative instead.
pub(crate) fn pgp_cfb_decrypt(cipher: &dyn Cipher, ciphertext: &[u8])
    -> Result<(Vec<u8>, Vec<u8>)>
{
    let bs = cipher.block_size();
    if ciphertext.len() < bs + 2 {
        return Err(Error::MalformedMessage(
            format!("Ciphertext shorter than the {} byte CFB prefix",
                    bs + 2)).into());
    }

    let mut buf = ciphertext.to_vec();
    cfb_process_padded(cipher, &mut buf, true);

    let rest = buf.split_off(bs + 2);
    Ok((buf, rest))
}

/// Encrypts `data` in plain CFB mode with a zero IV, without prefix
/// handling.
pub(crate) fn cfb_encrypt(cipher: &dyn Cipher, data: &[u8]) -> Vec<u8> {
    let mut buf = data.to_vec();
    cfb_process_padded(cipher, &mut buf, false);
    buf
}

/// Decrypts `data` in plain CFB mode with a zero IV, without prefix
/// handling.
///
/// This is the mode used for the encrypted session key inside a
/// symmetric-key encrypted session key packet.
pub(crate) fn cfb_decrypt(cipher: &dyn Cipher, data: &[u8]) -> Vec<u8> {
    let mut buf = data.to_vec();
    cfb_process_padded(cipher, &mut buf, true);
    buf
}
