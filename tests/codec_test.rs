//! Tests for text codecs, hashing and signer recovery
//!
//! Covers base-58 decoding, public key strings, hex addresses and the
//! claim message a claimant signs.

mod common;

use common::{account, encode_base58, legacy_key_string, secret_key, test_anchor, Claimant};
use unregd::client::{eth_address_from_secret, sign_claim};
use unregd::codec::{decode_base58, parse_hex_address, parse_public_key, CodecError, KeyType};
use unregd::crypto::{keccak256, public_point, recover_public_key, CryptoError, SIGNATURE_LEN};
use unregd::verifier::{recover_identity, ClaimMessage, TaposAnchor};

const DEV_KEY: &str = "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV";
const DEV_KEY_POINT: &str = "02c0ded2bc1f1305fb0faac5e6c03ee3a1924234985427b6167ca569d13df435cf";

#[test]
fn test_base58_decodes_into_fixed_width() {
    assert_eq!(decode_base58::<2>("5R").unwrap(), [0x01, 0x00]);
    assert_eq!(decode_base58::<4>("z").unwrap(), [0, 0, 0, 57]);
    assert_eq!(decode_base58::<3>("").unwrap(), [0, 0, 0]);
}

#[test]
fn test_base58_rejects_characters_outside_alphabet() {
    for bad in ["0", "O", "I", "l", "+", "é"] {
        let err = decode_base58::<8>(bad).unwrap_err();
        assert!(
            matches!(err, CodecError::InvalidBase58Character(_)),
            "{:?} should be rejected, got {:?}",
            bad,
            err
        );
    }
}

#[test]
fn test_base58_rejects_values_wider_than_target() {
    // 58^2 - 1 = 3363 does not fit in one byte
    let err = decode_base58::<1>("zz").unwrap_err();
    assert_eq!(err, CodecError::Base58OutOfRange(1));
}

#[test]
fn test_base58_agrees_with_encoder() {
    let bytes: Vec<u8> = (1..=37u8).collect();
    let decoded = decode_base58::<37>(&encode_base58(&bytes)).unwrap();
    assert_eq!(decoded.to_vec(), bytes);
}

#[test]
fn test_legacy_public_key_parses_to_known_point() {
    let key = parse_public_key(DEV_KEY).unwrap();

    assert_eq!(key.key_type, KeyType::K1);
    assert_eq!(hex::encode(key.data), DEV_KEY_POINT);
}

#[test]
fn test_r1_public_key_keeps_its_type() {
    let legacy = legacy_key_string(&[0x03; 33]);
    let r1 = format!("PUB_R1_{}", legacy.trim_start_matches("EOS"));

    let key = parse_public_key(&r1).unwrap();
    assert_eq!(key.key_type, KeyType::R1);
    assert_eq!(key.data, [0x03; 33]);
}

#[test]
fn test_public_key_checksum_is_not_verified() {
    // Test keys carry an all-zero checksum
    let text = legacy_key_string(&[0x02; 33]);
    assert_eq!(parse_public_key(&text).unwrap().data, [0x02; 33]);
}

#[test]
fn test_public_key_rejects_unknown_prefix() {
    let err = parse_public_key("PUB_K1_6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV")
        .unwrap_err();
    assert!(matches!(err, CodecError::UnrecognizedPublicKeyFormat(_)));
}

#[test]
fn test_public_key_storage_form_round_trips_through_serde() {
    let key = parse_public_key(DEV_KEY).unwrap();

    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, format!("\"k1:{}\"", DEV_KEY_POINT));

    let back: unregd::codec::PublicKey = serde_json::from_str(&json).unwrap();
    assert_eq!(back, key);
}

#[test]
fn test_hex_address_parsing() {
    let lower = parse_hex_address("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf").unwrap();
    let mixed = parse_hex_address("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf").unwrap();

    assert_eq!(lower, mixed);
    assert_eq!(mixed.to_string(), "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
}

#[test]
fn test_hex_address_rejections() {
    assert!(matches!(
        parse_hex_address("7e5f4552091a69125d5dfcb7b8c2659029395bdf00"),
        Err(CodecError::MissingHexPrefix(_))
    ));
    assert_eq!(
        parse_hex_address("0x7e5f").unwrap_err(),
        CodecError::InvalidAddressLength(4)
    );
    assert_eq!(
        parse_hex_address("0x7e5f4552091a69125d5dfcb7b8c2659029395bdg").unwrap_err(),
        CodecError::InvalidHexCharacter('g')
    );
}

#[test]
fn test_keccak_of_empty_input() {
    assert_eq!(
        hex::encode(keccak256(b"")),
        "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
    );
}

#[test]
fn test_address_of_secret_key_one() {
    let mut bytes = [0u8; 32];
    bytes[31] = 1;
    let secret = secp256k1::SecretKey::from_slice(&bytes).unwrap();

    assert_eq!(
        eth_address_from_secret(&secret).to_string(),
        "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
    );
}

#[test]
fn test_claim_message_text_and_wrapping() {
    let name = account("alice1234512");
    let message = ClaimMessage::new(TaposAnchor::new(7, 42), DEV_KEY, &name);

    let inner = format!("7,42,{},alice1234512", DEV_KEY);
    assert_eq!(message.inner_text(), inner);
    assert_eq!(
        message.wrapped(),
        format!("\x19Ethereum Signed Message:\n{}{}", inner.len(), inner)
    );
    assert_eq!(message.digest(), keccak256(message.wrapped().as_bytes()));
}

#[test]
fn test_anchor_from_block_id() {
    // Block 0x0001e240 (123456); prefix bytes 8..12 read little-endian
    let block_id = "0001e240aabbccdd78563412000000000000000000000000000000000000000a";
    let anchor = TaposAnchor::from_block_id(block_id).unwrap();

    assert_eq!(anchor.ref_block_num, 0xe240);
    assert_eq!(anchor.ref_block_prefix, 0x1234_5678);

    assert!(TaposAnchor::from_block_id("00").is_err());
    assert!(TaposAnchor::from_block_id("zz").is_err());
}

#[test]
fn test_recovery_yields_signer_address() {
    let claimant = Claimant::new(7);
    let name = account("bob123451234");
    let signature = sign_claim(&claimant.secret_key, test_anchor(), DEV_KEY, &name);

    let message = ClaimMessage::new(test_anchor(), DEV_KEY, &name);
    let identity = recover_identity(&message, &signature).unwrap();

    assert_eq!(identity.ethereum_address, claimant.address);
    assert_eq!(signature.len(), SIGNATURE_LEN);
    assert_eq!(signature[0], 0);
    assert!((31..=34).contains(&signature[1]));
}

#[test]
fn test_recovered_point_matches_signer_and_derives_same_address() {
    let claimant = Claimant::new(9);
    let name = account("bob123451234");
    let message = ClaimMessage::new(test_anchor(), DEV_KEY, &name);
    let signature = sign_claim(&claimant.secret_key, test_anchor(), DEV_KEY, &name);

    let point = recover_public_key(&message.digest(), &signature).unwrap();
    assert_eq!(point, public_point(&claimant.secret_key));

    // Derivation is deterministic: recovering twice gives the same identity
    let first = recover_identity(&message, &signature).unwrap();
    let second = recover_identity(&message, &signature).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.decompressed_public_key, point);
}

#[test]
fn test_recovery_over_different_message_yields_different_address() {
    let claimant = Claimant::new(7);
    let name = account("bob123451234");
    let signature = sign_claim(&claimant.secret_key, test_anchor(), DEV_KEY, &name);

    // Same signature, different anchor
    let message = ClaimMessage::new(TaposAnchor::new(1, 1), DEV_KEY, &name);
    match recover_identity(&message, &signature) {
        Ok(identity) => assert_ne!(identity.ethereum_address, claimant.address),
        Err(e) => assert!(matches!(e, CryptoError::RecoveryFailed(_))),
    }
}

#[test]
fn test_recovery_rejects_bad_headers() {
    let name = account("bob123451234");
    let message = ClaimMessage::new(test_anchor(), DEV_KEY, &name);
    let mut signature = sign_claim(&secret_key(3), test_anchor(), DEV_KEY, &name);

    let mut wrong_type = signature;
    wrong_type[0] = 1;
    assert!(matches!(
        recover_identity(&message, &wrong_type),
        Err(CryptoError::UnsupportedKeyType(1))
    ));

    signature[1] = 26;
    assert!(matches!(
        recover_identity(&message, &signature),
        Err(CryptoError::InvalidRecoveryHeader(26))
    ));
}
