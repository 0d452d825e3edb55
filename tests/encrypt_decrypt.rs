//! Hybrid encryption and decryption.

mod common;

use rand::SeedableRng;
use rand::rngs::StdRng;

use openpgp_core::Message;
use openpgp_core::KeyID;
use openpgp_core::packet::{PKESK, Packet, SEIP};
use openpgp_core::parse::Parse;
use openpgp_core::serialize::Serialize;
use openpgp_core::types::{DataFormat, HashAlgorithm, SymmetricAlgorithm};

use common::{CREATION_TIME, dsa_key, literal_message, public_part, rsa_key};

#[test]
fn aes128_roundtrip() {
    let mut rng = StdRng::seed_from_u64(10);
    let key = rsa_key(&mut rng, 1024);

    let m = literal_message(DataFormat::Text, b"attack at dawn");
    let encrypted = m.encrypt(&[public_part(&key)],
                              SymmetricAlgorithm::AES128,
                              &mut rng).unwrap();

    // One PKESK, one SEIP.
    assert_eq!(encrypted.packets().len(), 2);
    match &encrypted.packets()[0] {
        Packet::PKESK(p) => {
            assert_eq!(p.version(), 3);
            assert_eq!(p.recipient(), &key.keyid().unwrap());
        },
        p => panic!("unexpected packet {:?}", p),
    }
    assert!(matches!(&encrypted.packets()[1], Packet::SEIP(_)));

    assert_eq!(encrypted.decrypt_asymmetric(&[key]), Some(m));
}

#[test]
fn all_symmetric_algorithms_roundtrip() {
    let mut rng = StdRng::seed_from_u64(11);
    let key = rsa_key(&mut rng, 1024);

    for algo in [SymmetricAlgorithm::AES128, SymmetricAlgorithm::AES192,
                 SymmetricAlgorithm::AES256,
                 SymmetricAlgorithm::Blowfish] {
        let m = literal_message(DataFormat::Binary, b"attack at dawn");
        let encrypted = m.encrypt(&[public_part(&key)], algo,
                                  &mut rng).unwrap();
        assert_eq!(encrypted.decrypt_asymmetric(&[key.clone()]), Some(m));
    }

    // Enumerated but unimplemented algorithms fail up front.
    let m = literal_message(DataFormat::Binary, b"attack at dawn");
    assert!(m.encrypt(&[public_part(&key)], SymmetricAlgorithm::CAST5,
                      &mut rng).is_err());
}

#[test]
fn encrypted_message_survives_serialization() {
    let mut rng = StdRng::seed_from_u64(12);
    let key = rsa_key(&mut rng, 1024);

    let m = literal_message(DataFormat::Text, b"attack at dawn");
    let encrypted = m.encrypt(&[public_part(&key)],
                              SymmetricAlgorithm::AES256,
                              &mut rng).unwrap();

    let buf = encrypted.to_vec().unwrap();
    let parsed = Message::from_bytes(&buf).unwrap();
    assert_eq!(parsed.decrypt_asymmetric(&[key]), Some(m));
}

#[test]
fn multiple_recipients() {
    let mut rng = StdRng::seed_from_u64(13);
    let keys: Vec<_> = (0..3).map(|_| rsa_key(&mut rng, 1024)).collect();
    let outsider = rsa_key(&mut rng, 1024);

    let recipients: Vec<_> = keys.iter().map(public_part).collect();
    let m = literal_message(DataFormat::Text, b"attack at dawn");
    let encrypted = m.encrypt(&recipients, SymmetricAlgorithm::AES128,
                              &mut rng).unwrap();

    assert_eq!(encrypted.packets().len(), 4);

    // Any single private key suffices.
    for key in &keys {
        assert_eq!(encrypted.decrypt_asymmetric(&[key.clone()]),
                   Some(m.clone()));
    }

    // An unrelated key does not.
    assert_eq!(encrypted.decrypt_asymmetric(&[outsider]), None);
    // Neither does the public material alone.
    assert_eq!(encrypted.decrypt_asymmetric(&recipients), None);
    assert_eq!(encrypted.decrypt_asymmetric(&[]), None);
}

#[test]
fn wildcard_recipient_is_tried_with_every_key() {
    let mut rng = StdRng::seed_from_u64(14);
    let key = rsa_key(&mut rng, 1024);

    let m = literal_message(DataFormat::Text, b"attack at dawn");
    let encrypted = m.encrypt(&[public_part(&key)],
                              SymmetricAlgorithm::AES128,
                              &mut rng).unwrap();

    // Rewrite the PKESK with a wildcard recipient.
    let mut packets = encrypted.into_packets();
    let anonymized = match &packets[0] {
        Packet::PKESK(p) => PKESK::new(KeyID::wildcard(), p.pk_algo(),
                                       p.esk().clone()).into(),
        p => panic!("unexpected packet {:?}", p),
    };
    packets[0] = anonymized;
    let anonymous = Message::from_packets(packets);

    assert_eq!(anonymous.decrypt_asymmetric(&[key]), Some(m));
}

#[test]
fn mdc_tamper_is_rejected() {
    let mut rng = StdRng::seed_from_u64(15);
    let key = rsa_key(&mut rng, 1024);

    let m = literal_message(DataFormat::Text, b"attack at dawn");
    let encrypted = m.encrypt(&[public_part(&key)],
                              SymmetricAlgorithm::AES128,
                              &mut rng).unwrap();

    let tamper_seip = |m: &Message, flip: fn(&mut Vec<u8>)| {
        let mut packets = m.clone().into_packets();
        let tampered = match &packets[1] {
            Packet::SEIP(s) => {
                let mut body = s.body().to_vec();
                flip(&mut body);
                SEIP::new(body).into()
            },
            p => panic!("unexpected packet {:?}", p),
        };
        packets[1] = tampered;
        Message::from_packets(packets)
    };

    // Flip the last byte of the ciphertext, inside the encrypted
    // MDC.
    let tampered = tamper_seip(&encrypted, |body| {
        let n = body.len();
        body[n - 1] ^= 1;
    });
    assert_eq!(tampered.decrypt_asymmetric(&[key.clone()]), None);

    // Flip a byte in the middle, inside the encrypted payload.
    let tampered = tamper_seip(&encrypted, |body| {
        let n = body.len() / 2;
        body[n] ^= 1;
    });
    assert_eq!(tampered.decrypt_asymmetric(&[key]), None);
}

#[test]
fn non_rsa_recipients_are_unsupported() {
    let mut rng = StdRng::seed_from_u64(16);
    let key = dsa_key(&mut rng);

    let m = literal_message(DataFormat::Text, b"attack at dawn");
    assert!(m.encrypt(&[public_part(&key)], SymmetricAlgorithm::AES128,
                      &mut rng).is_err());
}

#[test]
fn sign_then_encrypt_roundtrip() {
    let mut rng = StdRng::seed_from_u64(17);
    let signer = rsa_key(&mut rng, 1024);
    let recipient = rsa_key(&mut rng, 1024);
    let keys = [signer.clone()];

    let m = literal_message(DataFormat::Text, b"attack at dawn");
    let sig = m.sign(&keys, HashAlgorithm::SHA256,
                     &signer.keyid().unwrap(), CREATION_TIME,
                     &mut rng).unwrap();

    let mut packets = m.into_packets();
    packets.insert(0, sig.into());
    let signed = Message::from_packets(packets);

    let encrypted = signed.encrypt(&[public_part(&recipient)],
                                   SymmetricAlgorithm::AES256,
                                   &mut rng).unwrap();

    let decrypted = encrypted.decrypt_asymmetric(&[recipient]).unwrap();
    assert_eq!(decrypted, signed);
    assert!(decrypted.verify(&[public_part(&signer)], 0));
}
