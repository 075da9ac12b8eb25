use pasetod_core::key::{Key, KeyKind, Operation};
use pasetod_core::registry::{protocol, Algorithm};
use pasetod_core::version::{Purpose, Version};
use pasetod_core::{PasetoError, ProviderError};
use serde_json::json;

fn junk_key(kind: KeyKind, algorithm: Algorithm, usages: &[Operation]) -> Key {
    Key::new(kind, algorithm, usages, vec![0; 64].into_boxed_slice())
}

#[test]
fn signing_without_a_secret_key_is_rejected_before_crypto() {
    // a verification-only provider holds a public key and nothing else
    let signer = pasetod_v2::PublicProvider::new();
    signer.generate_key().unwrap();

    let public = signer.public_key().unwrap();
    let verifier = pasetod_v2::PublicProvider::with_public_key(Key::new(
        public.kind(),
        public.algorithm(),
        public.usages(),
        public.expose_material().to_vec().into_boxed_slice(),
    ));

    assert_eq!(
        verifier.sign(&json!({ "data": "nope" }), ""),
        Err(PasetoError::Provider(ProviderError::MissingKey))
    );

    // but it verifies what the keyed provider signs
    let token = signer.sign(&json!({ "data": "yep" }), "").unwrap();
    assert!(verifier.verify(&token).is_ok());
}

#[test]
fn a_public_key_in_the_signing_slot_is_rejected() {
    let provider = pasetod_v2::PublicProvider::with_key_pair(
        junk_key(KeyKind::Public, Algorithm::Ed25519, &[Operation::Sign]),
        junk_key(KeyKind::Public, Algorithm::Ed25519, &[Operation::Verify]),
    );

    assert_eq!(
        provider.sign(&json!({}), ""),
        Err(PasetoError::Provider(ProviderError::KeyType))
    );
}

#[test]
fn a_key_for_another_algorithm_is_rejected() {
    // an XChaCha20-Poly1305 key has no business signing v2.public tokens
    let local_algorithm = protocol(Version::V2, Purpose::Local).algorithm;
    let provider = pasetod_v2::PublicProvider::with_key_pair(
        junk_key(KeyKind::Private, local_algorithm, &[Operation::Sign]),
        junk_key(KeyKind::Public, local_algorithm, &[Operation::Verify]),
    );

    assert_eq!(
        provider.sign(&json!({}), ""),
        Err(PasetoError::Provider(ProviderError::KeyAlgorithm))
    );
}

#[test]
fn undeclared_usage_is_rejected() {
    let provider = pasetod_v2::PublicProvider::with_key_pair(
        junk_key(KeyKind::Private, Algorithm::Ed25519, &[]),
        junk_key(KeyKind::Public, Algorithm::Ed25519, &[Operation::Verify]),
    );

    assert_eq!(
        provider.sign(&json!({}), ""),
        Err(PasetoError::Provider(ProviderError::KeyUsage))
    );
}

#[test]
fn verify_without_any_key_is_rejected() {
    let provider = pasetod_v2::PublicProvider::new();
    assert_eq!(
        provider.verify("v2.public.xxxx"),
        Err(PasetoError::Provider(ProviderError::MissingKey))
    );
}

#[test]
fn decrypt_checks_the_key_before_parsing() {
    let provider = pasetod_v4::LocalProvider::new();
    assert_eq!(
        provider.decrypt("not even a token"),
        Err(PasetoError::Provider(ProviderError::MissingKey))
    );
}

#[test]
fn payload_must_be_an_object() {
    let provider = pasetod_v2::PublicProvider::new();
    provider.generate_key().unwrap();

    assert_eq!(
        provider.sign(&json!("a bare string"), ""),
        Err(PasetoError::Provider(ProviderError::PayloadShape))
    );
    assert_eq!(
        provider.sign(&json!([1, 2, 3]), ""),
        Err(PasetoError::Provider(ProviderError::PayloadShape))
    );
}

#[test]
fn generate_key_is_single_assignment() {
    let provider = pasetod_v2::PublicProvider::new();
    provider.generate_key().unwrap();
    assert_eq!(
        provider.generate_key(),
        Err(PasetoError::Provider(ProviderError::KeyAlreadySet))
    );

    let local = pasetod_v2::LocalProvider::new();
    local.generate_key().unwrap();
    assert_eq!(
        local.generate_key(),
        Err(PasetoError::Provider(ProviderError::KeyAlreadySet))
    );
}

#[test]
fn generate_key_refuses_to_replace_a_constructor_key() {
    let provider = pasetod_v2::PublicProvider::with_public_key(junk_key(
        KeyKind::Public,
        Algorithm::Ed25519,
        &[Operation::Verify],
    ));
    assert_eq!(
        provider.generate_key(),
        Err(PasetoError::Provider(ProviderError::KeyAlreadySet))
    );
}

#[test]
fn concurrent_generate_key_sets_exactly_one_key() {
    let provider = pasetod_v2::LocalProvider::new();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| provider.generate_key().is_ok()))
            .collect();
        let successes = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|&ok| ok)
            .count();
        assert_eq!(successes, 1);
    });

    // whichever thread won, the provider works
    let token = provider.encrypt(&json!({ "data": "raced" }), "").unwrap();
    assert!(provider.decrypt(&token).is_ok());
}
