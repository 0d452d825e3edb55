//! Conversion between OpenPGP key material and the asymmetric
//! crypto implementations.

use num_bigint_dig::BigUint;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};

use crate::Error;
use crate::Result;
use crate::crypto::mpi::MPI;
use crate::types::HashAlgorithm;

fn to_biguint(m: &MPI) -> BigUint {
    BigUint::from_bytes_be(m.value())
}

/// Builds an RSA public key from the `e` and `n` MPIs.
pub(crate) fn rsa_public_key(e: &MPI, n: &MPI) -> Result<RsaPublicKey> {
    Ok(RsaPublicKey::new(to_biguint(n), to_biguint(e))?)
}

/// Builds an RSA private key from OpenPGP secret key material.
///
/// OpenPGP's `u` is p⁻¹ mod q, while the RSA implementation's
/// coefficient is the inverse of the *second* prime modulo the
/// first.  Handing the primes over in swapped order keeps the stored
/// `u` consistent with the recomputed coefficient, and the CRT
/// exponents follow the swapped values.
pub(crate) fn rsa_private_key(e: &MPI, n: &MPI, d: &MPI, p: &MPI, q: &MPI)
    -> Result<RsaPrivateKey>
{
    Ok(RsaPrivateKey::from_components(
        to_biguint(n), to_biguint(e), to_biguint(d),
        vec![to_biguint(q), to_biguint(p)])?)
}

/// Builds a DSA verification key.
pub(crate) fn dsa_verifying_key(p: &MPI, q: &MPI, g: &MPI, y: &MPI)
    -> Result<dsa::VerifyingKey>
{
    let components = dsa::Components::from_components(
        to_biguint(p), to_biguint(q), to_biguint(g))?;
    Ok(dsa::VerifyingKey::from_components(components, to_biguint(y))?)
}

/// Builds a DSA signing key.
pub(crate) fn dsa_signing_key(p: &MPI, q: &MPI, g: &MPI, y: &MPI, x: &MPI)
    -> Result<dsa::SigningKey>
{
    let verifying_key = dsa_verifying_key(p, q, g, y)?;
    Ok(dsa::SigningKey::from_components(verifying_key, to_biguint(x))?)
}

/// Returns the EMSA-PKCS1-v1_5 padding scheme for the given hash.
///
/// The `DigestInfo` prefix is the fixed table from [Section 5.2.2 of
/// RFC 4880].
///
/// [Section 5.2.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.2
pub(crate) fn pkcs1v15_padding(hash_algo: HashAlgorithm)
    -> Result<Pkcs1v15Sign>
{
    let prefix = hash_algo.pkcs1_digestinfo_prefix()?;
    // The last octet of the DigestInfo prefix is the digest length.
    let hash_len = *prefix.last().expect("prefix tables are nonempty")
        as usize;

    Ok(Pkcs1v15Sign {
        hash_len: Some(hash_len),
        prefix: prefix.to_vec().into(),
    })
}

/// Pads the big endian value with leading zeros to the given width.
///
/// RSA signatures and ciphertexts are integers; their MPI form drops
/// leading zero octets that the RSA implementation expects to be
/// present.
pub(crate) fn left_pad(value: &[u8], to: usize) -> Result<Vec<u8>> {
    if value.len() > to {
        return Err(Error::MalformedMPI(
            format!("Value of {} octets exceeds the {} octet modulus",
                    value.len(), to)).into());
    }

    let mut padded = vec![0; to - value.len()];
    padded.extend_from_slice(value);
    Ok(padded)
}
