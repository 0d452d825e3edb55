//! Messages and the operations on them.
//!
//! A message is an ordered sequence of packets.  This module
//! implements the high-level operations: signing, verification,
//! hybrid encryption, and decryption, both with private keys and
//! with passphrases.

use std::io::Write;

use rand::{CryptoRng, RngCore};

use crate::Error;
use crate::KeyID;
use crate::Packet;
use crate::Result;
use crate::crypto::{self, SessionKey};
use crate::crypto::asymmetric;
use crate::crypto::hash::Hash;
use crate::crypto::mem::Password;
use crate::crypto::mpi::{self, MPI};
use crate::crypto::symmetric::{self, CfbTrailer, Cipher};
use crate::packet::{Key, Literal, PKESK, SEIP, SKESK, Signature};
use crate::parse::{self, Parse};
use crate::serialize::Serialize;
use crate::types::{DataFormat, HashAlgorithm, PublicKeyAlgorithm,
                   SignatureType, SymmetricAlgorithm};

/// Holds an OpenPGP message: an ordered sequence of packets.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    packets: Vec<Packet>,
}

impl Message {
    /// Creates a message from a sequence of packets.
    pub fn from_packets(packets: Vec<Packet>) -> Self {
        Message { packets }
    }

    /// Returns the message's packets.
    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    /// Turns the message into its packets.
    pub fn into_packets(self) -> Vec<Packet> {
        self.packets
    }

    /// Returns the signatures in the message, in order of
    /// appearance.
    pub fn signatures(&self) -> Vec<&Signature> {
        self.packets.iter().filter_map(|p| p.signature()).collect()
    }

    /// Returns the first literal data packet, if any.
    pub fn literal(&self) -> Option<&Literal> {
        self.packets.iter().find_map(|p| p.literal())
    }

    fn first_seip(&self) -> Option<&SEIP> {
        self.packets.iter().find_map(|p| match p {
            Packet::SEIP(s) => Some(s),
            _ => None,
        })
    }

    /// Signs the message.
    ///
    /// The signing key is looked up in `keys` by `signer`.  The
    /// signed target is the message's first literal data packet or,
    /// failing that, a certification over its first key and first
    /// user id.
    ///
    /// If the message already carries a signature packet, its type
    /// and subpackets are used as a template; otherwise a fresh v4
    /// signature with a creation time and issuer subpacket is made.
    pub fn sign<R>(&self, keys: &[Key], hash_algo: HashAlgorithm,
                   signer: &KeyID, creation_time: u32, rng: &mut R)
        -> Result<Signature>
        where R: RngCore + CryptoRng,
    {
        let key = keys.iter().find(|k| k.matches_keyid(signer))
            .ok_or_else(|| Error::InvalidArgument(
                format!("No key matching {}", signer)))?;

        let literal = self.literal();

        let sig = match self.signatures().first() {
            Some(template) => (*template).clone(),
            None => {
                let typ = match literal {
                    Some(l) if l.format() == DataFormat::Binary =>
                        SignatureType::Binary,
                    Some(_) => SignatureType::Text,
                    None => SignatureType::PositiveCertification,
                };

                let mut sig = Signature::new(typ);
                sig.set_signature_creation_time(creation_time);
                sig.set_issuer(key.keyid()?);
                sig
            },
        };

        // Hash the signed data; the trailer is appended by
        // sign_hash.
        let mut ctx = hash_algo.context()?;
        match literal {
            Some(literal) => ctx.update(literal.body()),
            None => {
                // A certification covers the key material and the
                // user id.
                let target = self.packets.iter().find_map(|p| p.key())
                    .ok_or_else(|| Error::InvalidOperation(
                        "Nothing to sign in this message".into()))?;
                let userid = self.packets.iter().find_map(|p| p.user_id())
                    .ok_or_else(|| Error::InvalidOperation(
                        "No user id to certify".into()))?;

                target.hash(&mut ctx);
                userid.hash(&mut ctx);
            },
        }

        sig.sign_hash(key, hash_algo, ctx, rng)
    }

    /// Verifies the signature with the given index.
    ///
    /// All failures, including unsupported algorithms and malformed
    /// packets, map to `false`; use [`Message::verify_signature`] to
    /// distinguish them.
    pub fn verify(&self, keys: &[Key], sig_index: usize) -> bool {
        self.verify_signature(keys, sig_index).unwrap_or(false)
    }

    /// Verifies the signature with the given index.
    ///
    /// The signer is looked up in `keys` by the signature's issuer
    /// key id; a missing signer and a bad signature yield `false`,
    /// unsupported algorithms yield an error.
    pub fn verify_signature(&self, keys: &[Key], sig_index: usize)
        -> Result<bool>
    {
        let signatures = self.signatures();
        let sig = signatures.get(sig_index)
            .ok_or_else(|| Error::InvalidArgument(
                format!("No signature with index {}", sig_index)))?;

        let issuer = match sig.issuer() {
            Some(issuer) => issuer,
            None => return Ok(false),
        };
        let key = match keys.iter().find(|k| k.matches_keyid(&issuer)) {
            Some(key) => key,
            None => return Ok(false),
        };

        let literal = match self.literal() {
            Some(literal) => literal,
            None => return Ok(false),
        };

        let mut ctx = sig.hash_algo().context()?;
        ctx.update(literal.body());
        sig.verify_hash(key, ctx)
    }

    /// Encrypts the message for the given recipients.
    ///
    /// A fresh session key is generated and transported under each
    /// recipient's RSA key; the message itself is wrapped in an
    /// MDC-protected encrypted data packet.  Returns a new message
    /// consisting of one PKESK packet per recipient followed by the
    /// encrypted data.
    pub fn encrypt<R>(&self, recipients: &[Key], algo: SymmetricAlgorithm,
                      rng: &mut R)
        -> Result<Message>
        where R: RngCore + CryptoRng,
    {
        let sk = generate_session_key(rng, algo)?;

        // Wrap the serialized message.
        let cipher = algo.cipher(&sk)?;
        let ciphertext = symmetric::pgp_cfb_encrypt(
            &*cipher, rng, &self.to_vec()?, CfbTrailer::Mdc)?;

        // Encode the session key for transport.
        let blob = crypto::encode_session_key(algo, &sk);

        let mut packets = Vec::with_capacity(recipients.len() + 1);
        for key in recipients {
            match key.mpis() {
                mpi::PublicKey::RSA { e, n } => {
                    let public = asymmetric::rsa_public_key(e, n)?;
                    let ct = public.encrypt(rng, rsa::Pkcs1v15Encrypt,
                                            &blob)?;

                    packets.push(PKESK::new(
                        key.keyid()?,
                        PublicKeyAlgorithm::RSAEncryptSign,
                        mpi::Ciphertext::RSA { c: MPI::new(&ct) }).into());
                },
                _ => return Err(Error::UnsupportedPublicKeyAlgorithm(
                    key.pk_algo()).into()),
            }
        }

        packets.push(SEIP::new(ciphertext).into());
        Ok(Message::from_packets(packets))
    }

    /// Decrypts the message using a private key.
    ///
    /// Every PKESK packet is tried against every matching secret key
    /// in `keys`; the wildcard key id makes every RSA key a
    /// candidate.  Per-candidate failures are skipped silently;
    /// `None` means no combination produced a well-formed message.
    pub fn decrypt_asymmetric(&self, keys: &[Key]) -> Option<Message> {
        let seip = self.first_seip()?;

        for pkesk in self.packets.iter().filter_map(|p| match p {
            Packet::PKESK(p) => Some(p),
            _ => None,
        }) {
            let candidates = keys.iter().filter(
                |k| k.has_secret() && k.pk_algo().is_rsa()
                    && k.matches_keyid(pkesk.recipient()));

            for key in candidates {
                let (algo, sk) = match pkesk.decrypt(key) {
                    Ok(r) => r,
                    Err(_) => continue,
                };
                let cipher = match algo.cipher(&sk) {
                    Ok(c) => c,
                    Err(_) => continue,
                };

                if let Some(message) = decrypt_packet(&*cipher, seip) {
                    return Some(message);
                }
            }
        }

        None
    }

    /// Decrypts the message using a passphrase.
    ///
    /// Every SKESK packet is tried against every passphrase.
    /// Per-candidate failures are skipped silently; `None` means no
    /// combination produced a well-formed message.
    pub fn decrypt_symmetric(&self, passphrases: &[Password])
        -> Option<Message>
    {
        let seip = self.first_seip()?;

        for skesk in self.packets.iter().filter_map(|p| match p {
            Packet::SKESK(s) => Some(s),
            _ => None,
        }) {
            for password in passphrases {
                let (algo, sk) = match skesk.decrypt(password) {
                    Ok(r) => r,
                    Err(_) => continue,
                };
                let cipher = match algo.cipher(&sk) {
                    Ok(c) => c,
                    Err(_) => continue,
                };

                if let Some(message) = decrypt_packet(&*cipher, seip) {
                    return Some(message);
                }
            }
        }

        None
    }
}

impl<'a> Parse<'a, Message> for Message {
    fn from_bytes(data: &'a [u8]) -> Result<Message> {
        Ok(Message { packets: parse::packets(data)? })
    }
}

impl Serialize for Message {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        for p in &self.packets {
            p.serialize(o)?;
        }
        Ok(())
    }
}

/// Generates a session key for the given algorithm.
///
/// Some algorithms have keys the cipher factory rejects; drawing is
/// retried, with a cap to guarantee termination.
fn generate_session_key<R>(rng: &mut R, algo: SymmetricAlgorithm)
    -> Result<SessionKey>
    where R: RngCore + CryptoRng,
{
    let size = algo.key_size()?;
    for _ in 0..1000 {
        let sk = SessionKey::new(rng, size);
        if algo.cipher(&sk).is_ok() {
            return Ok(sk);
        }
    }

    Err(Error::InvalidSessionKey(
        "Could not generate a valid session key in 1000 attempts"
            .into()).into())
}

/// Decrypts an encrypted data packet and verifies its MDC.
///
/// Returns the decoded inner message, or `None` if the ciphertext is
/// malformed, the MDC does not match, or the plaintext fails to
/// decode.
fn decrypt_packet(cipher: &dyn Cipher, seip: &SEIP) -> Option<Message> {
    let (prefix, content) =
        symmetric::pgp_cfb_decrypt(cipher, seip.body()).ok()?;

    // The last 22 octets are the MDC packet: the 0xD3 0x14 header
    // and the 20 octet digest.
    if content.len() < 22 {
        return None;
    }
    let (body, mdc) = content.split_at(content.len() - 22);
    if mdc[..2] != [0xd3, 0x14] {
        return None;
    }

    let mut ctx = HashAlgorithm::SHA1.context().ok()?;
    ctx.update(&prefix);
    ctx.update(body);
    ctx.update([0xd3, 0x14]);
    if !crate::crypto::mem::secure_cmp(&ctx.into_digest(), &mdc[2..]) {
        return None;
    }

    Message::from_bytes(body).ok()
}
