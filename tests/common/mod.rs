//! Key material shared between the integration tests.

#![allow(dead_code)]

use num_bigint_dig::ModInverse;
use rand::{CryptoRng, RngCore};
use rsa::RsaPrivateKey;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};

use openpgp_core::Message;
use openpgp_core::crypto::mpi::{self, MPI};
use openpgp_core::packet::{Key, Literal};
use openpgp_core::types::{DataFormat, PublicKeyAlgorithm};

pub const CREATION_TIME: u32 = 1219723547;

/// Generates a fresh RSA key packet with secret material.
pub fn rsa_key<R>(rng: &mut R, bits: usize) -> Key
    where R: RngCore + CryptoRng,
{
    let private = RsaPrivateKey::new(rng, bits)
        .expect("failed to generate an RSA key");

    let n = MPI::new(&private.n().to_bytes_be());
    let e = MPI::new(&private.e().to_bytes_be());
    let d = MPI::new(&private.d().to_bytes_be());

    let primes = private.primes();
    let (p, q) = (&primes[0], &primes[1]);
    // OpenPGP stores u = p⁻¹ mod q.
    let u = p.mod_inverse(q)
        .expect("primes are coprime")
        .to_biguint()
        .expect("inverse is nonnegative");

    Key::new(4, CREATION_TIME, PublicKeyAlgorithm::RSAEncryptSign,
             mpi::PublicKey::RSA { e, n })
        .unwrap()
        .with_secret(mpi::SecretKey::RSA {
            d,
            p: MPI::new(&p.to_bytes_be()),
            q: MPI::new(&q.to_bytes_be()),
            u: MPI::new(&u.to_bytes_be()),
        })
}

/// Strips the secret material off a key.
pub fn public_part(key: &Key) -> Key {
    Key::new(key.version(), key.creation_time(), key.pk_algo(),
             key.mpis().clone())
        .unwrap()
}

/// Generates a fresh DSA key packet with secret material.
pub fn dsa_key<R>(rng: &mut R) -> Key
    where R: RngCore + CryptoRng,
{
    let components = dsa::Components::generate(
        rng, dsa::KeySize::DSA_1024_160);
    let signing = dsa::SigningKey::generate(rng, components);
    let verifying = signing.verifying_key();
    let components = verifying.components();

    Key::new(4, CREATION_TIME, PublicKeyAlgorithm::DSA,
             mpi::PublicKey::DSA {
                 p: MPI::new(&components.p().to_bytes_be()),
                 q: MPI::new(&components.q().to_bytes_be()),
                 g: MPI::new(&components.g().to_bytes_be()),
                 y: MPI::new(&verifying.y().to_bytes_be()),
             })
        .unwrap()
        .with_secret(mpi::SecretKey::DSA {
            x: MPI::new(&signing.x().to_bytes_be()),
        })
}

/// Builds a one-packet message holding literal data.
pub fn literal_message(format: DataFormat, content: &[u8]) -> Message {
    Message::from_packets(vec![
        Literal::new(format).set_body(content.to_vec()).into(),
    ])
}
