//! Tests for key loading and key id resolution

use super::*;
use crate::errors::TokenError;

#[test]
fn test_load_from_key_directory() {
    let resolver = KeyResolver::load(key_dir()).expect("Failed to load keys");

    assert_eq!(resolver.key_ids().collect::<Vec<_>>(), vec!["0", "1"]);
    assert!(resolver.key_dir().is_some());
}

#[test]
fn test_load_from_missing_directory_fails() {
    let missing = std::env::temp_dir().join(format!("sk-missing-{}", uuid::Uuid::new_v4()));

    match KeyResolver::load(&missing) {
        Err(TokenError::KeyLoadError { path, message }) => {
            assert!(path.ends_with("rsa_private_key"), "unexpected path {path}");
            assert!(message.contains("Failed to read key file"));
        }
        other => panic!("expected KeyLoadError, got {other:?}"),
    }
}

#[test]
fn test_load_reports_the_invalid_file() {
    let dir = std::env::temp_dir().join(format!("sk-keys-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("rsa_private_key"), RSA_PRIVATE_KEY).unwrap();
    std::fs::write(dir.join("cert_private_key"), CERT_PRIVATE_KEY).unwrap();
    std::fs::write(dir.join("rsa_public_key"), RSA_PUBLIC_KEY).unwrap();
    std::fs::write(
        dir.join("certificate"),
        "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n",
    )
    .unwrap();

    let err = KeyResolver::load(&dir).unwrap_err();
    std::fs::remove_dir_all(&dir).ok();

    match err {
        TokenError::KeyLoadError { path, message } => {
            assert!(path.ends_with("certificate"), "unexpected path {path}");
            assert!(message.contains("Invalid certificate"));
        }
        other => panic!("expected KeyLoadError, got {other:?}"),
    }
}

#[test]
fn test_from_pem_strings_rejects_swapped_files() {
    // A certificate where a bare public key is expected
    let result =
        KeyResolver::from_pem_strings(RSA_PRIVATE_KEY, CERTIFICATE, CERT_PRIVATE_KEY, CERTIFICATE);
    assert!(matches!(result, Err(TokenError::KeyLoadError { ref path, .. }) if path == "rsa_public_key"));

    // A bare public key where a certificate is expected
    let result =
        KeyResolver::from_pem_strings(RSA_PRIVATE_KEY, RSA_PUBLIC_KEY, CERT_PRIVATE_KEY, RSA_PUBLIC_KEY);
    assert!(matches!(result, Err(TokenError::KeyLoadError { ref path, .. }) if path == "certificate"));
}

#[test]
fn test_in_memory_resolver_has_no_directory() {
    let resolver = test_resolver();
    assert!(resolver.key_dir().is_none());
}

fn load_error_path(result: Result<KeyResolver, TokenError>) -> String {
    match result {
        Err(TokenError::KeyLoadError { path, .. }) => path,
        Err(other) => panic!("expected KeyLoadError, got {other:?}"),
        Ok(_) => panic!("invalid key material was accepted"),
    }
}

#[test]
fn test_garbage_der_keys_fail_at_load() {
    let path = load_error_path(KeyResolver::from_bytes(
        &[0x30, 0x03, 0x02, 0x01, 0x00],
        RSA_PUBLIC_KEY.as_bytes(),
        CERT_PRIVATE_KEY.as_bytes(),
        CERTIFICATE.as_bytes(),
    ));
    assert_eq!(path, "rsa_private_key");

    let path = load_error_path(KeyResolver::from_bytes(
        RSA_PRIVATE_KEY.as_bytes(),
        b"not a key at all",
        CERT_PRIVATE_KEY.as_bytes(),
        CERTIFICATE.as_bytes(),
    ));
    assert_eq!(path, "rsa_public_key");
}

#[test]
fn test_mismatched_key_pairs_fail_at_load() {
    // Private keys swapped between the two pairs
    let path = load_error_path(KeyResolver::from_pem_strings(
        CERT_PRIVATE_KEY,
        RSA_PUBLIC_KEY,
        RSA_PRIVATE_KEY,
        CERTIFICATE,
    ));
    assert_eq!(path, "rsa_public_key");

    let path = load_error_path(KeyResolver::from_pem_strings(
        RSA_PRIVATE_KEY,
        RSA_PUBLIC_KEY,
        RSA_PRIVATE_KEY,
        CERTIFICATE,
    ));
    assert_eq!(path, "certificate");
}

#[test]
fn test_unknown_key_id() {
    let resolver = test_resolver();

    assert!(resolver.signing_key("0").is_ok());
    assert!(resolver.verification_key("1").is_ok());
    assert_eq!(
        resolver.signing_key("2").err(),
        Some(TokenError::UnknownKeyId { kid: "2".to_string() })
    );
    assert_eq!(
        resolver.verification_key("").err(),
        Some(TokenError::UnknownKeyId { kid: String::new() })
    );
}

#[test]
fn test_der_encoded_keys() {
    let resolver = KeyResolver::from_bytes(
        include_bytes!("../../../../tests/fixtures/rsa_private_key.der"),
        include_bytes!("../../../../tests/fixtures/rsa_public_key.der"),
        CERT_PRIVATE_KEY.as_bytes(),
        include_bytes!("../../../../tests/fixtures/certificate.der"),
    )
    .expect("DER keys should load");
    let service = TokenService::new(resolver);

    for kid in ["0", "1"] {
        let claims = crate::domain::entities::TokenDetails::new("der", kid, 1);
        let token = service.issue(&claims).expect("issue");
        let verified = service
            .verify::<crate::domain::entities::TokenDetails>(&format!("Bearer {}", token))
            .expect("verify");
        assert_eq!(verified.claims().sub, "der");
    }
}
