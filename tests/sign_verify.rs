//! Signature creation and verification.

mod common;

use rand::SeedableRng;
use rand::rngs::StdRng;

use openpgp_core::Message;
use openpgp_core::packet::{Literal, Packet, UserID};
use openpgp_core::parse::Parse;
use openpgp_core::serialize::Serialize;
use openpgp_core::types::{DataFormat, HashAlgorithm, PublicKeyAlgorithm,
                          SignatureType};

use common::{CREATION_TIME, dsa_key, literal_message, public_part, rsa_key};

#[test]
fn rsa_sign_verify() {
    let mut rng = StdRng::seed_from_u64(1);
    let key = rsa_key(&mut rng, 2048);
    let keys = [key.clone()];
    let keyid = key.keyid().unwrap();

    let m = literal_message(DataFormat::Text, b"Hello");
    let sig = m.sign(&keys, HashAlgorithm::SHA256, &keyid,
                     CREATION_TIME, &mut rng).unwrap();

    assert_eq!(sig.typ(), SignatureType::Text);
    assert_eq!(sig.pk_algo(), PublicKeyAlgorithm::RSAEncryptSign);
    assert_eq!(sig.hash_algo(), HashAlgorithm::SHA256);
    assert_eq!(sig.issuer(), Some(keyid));
    assert_eq!(sig.signature_creation_time(), Some(CREATION_TIME));
    // The hash head is left at zero on fresh signatures.
    assert_eq!(sig.hash_prefix(), &[0, 0]);

    let mut packets = m.into_packets();
    packets.insert(0, sig.into());
    let signed = Message::from_packets(packets);

    // Verification works with the public part alone.
    assert!(signed.verify(&[public_part(&key)], 0));

    // Flipping one content byte invalidates the signature.
    let mut tampered = signed.clone().into_packets();
    tampered[1] = Packet::Literal(
        Literal::new(DataFormat::Text).set_body(b"hello".to_vec()));
    assert!(!Message::from_packets(tampered).verify(&keys, 0));
}

#[test]
fn signature_survives_serialization() {
    let mut rng = StdRng::seed_from_u64(2);
    let key = rsa_key(&mut rng, 1024);
    let keys = [key.clone()];
    let keyid = key.keyid().unwrap();

    let m = literal_message(DataFormat::Binary, b"payload");
    let sig = m.sign(&keys, HashAlgorithm::SHA1, &keyid,
                     CREATION_TIME, &mut rng).unwrap();
    assert_eq!(sig.typ(), SignatureType::Binary);

    // The signature packet last, so the buffer ends in its MPIs.
    let mut packets = m.into_packets();
    packets.push(sig.into());
    let buf = Message::from_packets(packets).to_vec().unwrap();

    let parsed = Message::from_bytes(&buf).unwrap();
    assert!(parsed.verify(&keys, 0));

    // Flipping any byte of the signature MPIs breaks it.
    let mut tampered = buf.clone();
    let n = tampered.len();
    tampered[n - 1] ^= 0x40;
    let parsed = Message::from_bytes(&tampered).unwrap();
    assert!(!parsed.verify(&keys, 0));
}

#[test]
fn dsa_sign_verify_truncates_the_digest() {
    let mut rng = StdRng::seed_from_u64(3);
    let key = dsa_key(&mut rng);
    let keys = [key.clone()];
    let keyid = key.keyid().unwrap();

    // SHA256 is wider than the 160 bit q; signing must truncate.
    let m = literal_message(DataFormat::Text, b"Hello");
    let sig = m.sign(&keys, HashAlgorithm::SHA256, &keyid,
                     CREATION_TIME, &mut rng).unwrap();
    assert_eq!(sig.pk_algo(), PublicKeyAlgorithm::DSA);

    let mut packets = m.into_packets();
    packets.insert(0, sig.into());
    let signed = Message::from_packets(packets);

    assert!(signed.verify(&keys, 0));

    let mut tampered = signed.clone().into_packets();
    tampered[1] = Packet::Literal(
        Literal::new(DataFormat::Text).set_body(b"Jello".to_vec()));
    assert!(!Message::from_packets(tampered).verify(&keys, 0));
}

#[test]
fn verification_needs_a_matching_key() {
    let mut rng = StdRng::seed_from_u64(4);
    let key = rsa_key(&mut rng, 1024);
    let other = rsa_key(&mut rng, 1024);
    let keys = [key.clone()];
    let keyid = key.keyid().unwrap();

    let m = literal_message(DataFormat::Text, b"Hello");
    let sig = m.sign(&keys, HashAlgorithm::SHA256, &keyid,
                     CREATION_TIME, &mut rng).unwrap();

    let mut packets = m.into_packets();
    packets.insert(0, sig.into());
    let signed = Message::from_packets(packets);

    // No keys, or only unrelated keys: not verifiable.
    assert!(!signed.verify(&[], 0));
    assert!(!signed.verify(&[other], 0));
    // An out of range index is not verifiable either.
    assert!(!signed.verify(&keys, 1));
}

#[test]
fn certification_over_a_user_id() {
    let mut rng = StdRng::seed_from_u64(5);
    let key = rsa_key(&mut rng, 1024);
    let keys = [key.clone()];
    let keyid = key.keyid().unwrap();

    let uid: UserID = "Alice Lovelace <alice@example.org>".into();
    let m = Message::from_packets(vec![
        public_part(&key).into(),
        uid.clone().into(),
    ]);

    let sig = m.sign(&keys, HashAlgorithm::SHA256, &keyid,
                     CREATION_TIME, &mut rng).unwrap();
    assert_eq!(sig.typ(), SignatureType::PositiveCertification);

    // Check the certification digest by hand.
    let digest = sig.userid_binding_hash(&key, &uid).unwrap();
    assert_eq!(digest.len(), 32);

    let mut ctx = HashAlgorithm::SHA256.context().unwrap();
    ctx.update(key.fingerprint_material());
    ctx.update([0xb4]);
    ctx.update((uid.value().len() as u32).to_be_bytes());
    ctx.update(uid.value());
    assert!(sig.verify_hash(&key, ctx).unwrap());
}

#[test]
fn template_signature_is_reused() {
    let mut rng = StdRng::seed_from_u64(6);
    let rsa = rsa_key(&mut rng, 1024);
    let dsa = dsa_key(&mut rng);
    let keys = [rsa.clone(), dsa.clone()];

    // Sign once with RSA, then use the result as a template for a
    // DSA signature over the same message.
    let m = literal_message(DataFormat::Binary, b"data");
    let first = m.sign(&keys, HashAlgorithm::SHA256,
                       &rsa.keyid().unwrap(), CREATION_TIME,
                       &mut rng).unwrap();

    let mut packets = m.clone().into_packets();
    packets.insert(0, first.clone().into());
    let with_template = Message::from_packets(packets);

    let second = with_template.sign(
        &keys, HashAlgorithm::SHA1, &dsa.keyid().unwrap(),
        CREATION_TIME + 1, &mut rng).unwrap();

    // Type and subpackets come from the template, the algorithm
    // fields from the new signer.
    assert_eq!(second.typ(), first.typ());
    assert_eq!(second.hashed_area(), first.hashed_area());
    assert_eq!(second.unhashed_area(), first.unhashed_area());
    assert_eq!(second.pk_algo(), PublicKeyAlgorithm::DSA);
    assert_eq!(second.hash_algo(), HashAlgorithm::SHA1);
}

#[test]
fn signing_requires_secret_material() {
    let mut rng = StdRng::seed_from_u64(7);
    let key = rsa_key(&mut rng, 1024);
    let keyid = key.keyid().unwrap();
    let m = literal_message(DataFormat::Text, b"Hello");

    // Public part only: fatal.
    assert!(m.sign(&[public_part(&key)], HashAlgorithm::SHA256, &keyid,
                   CREATION_TIME, &mut rng).is_err());

    // No key at all: fatal.
    assert!(m.sign(&[], HashAlgorithm::SHA256, &keyid,
                   CREATION_TIME, &mut rng).is_err());

    // Unsupported hash: fatal.
    assert!(m.sign(&[key], HashAlgorithm::Unknown(42), &keyid,
                   CREATION_TIME, &mut rng).is_err());
}

#[test]
fn fingerprints_are_uppercase_hex() {
    let mut rng = StdRng::seed_from_u64(8);

    for key in [rsa_key(&mut rng, 1024), dsa_key(&mut rng)] {
        let fp = key.fingerprint().unwrap();
        let hex = fp.to_hex();
        // SHA-1: 160 bits, 40 digits.
        assert_eq!(hex.len(), 40);
        assert!(hex.chars().all(
            |c| c.is_ascii_digit() || c.is_ascii_uppercase()));

        // The key id is the trailing 16 digits.
        assert_eq!(key.keyid().unwrap().to_hex(), hex[24..]);

        // And the fingerprint is the hash of the material.
        assert_eq!(fp.as_bytes(),
                   &HashAlgorithm::SHA1.digest(
                       key.fingerprint_material()).unwrap()[..]);
    }
}
