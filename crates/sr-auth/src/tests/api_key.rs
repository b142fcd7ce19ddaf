use crate::{ApiKeyValidator, AuthError};

fn validator() -> ApiKeyValidator {
    ApiKeyValidator::new(Some("super-secret".to_string()), "test")
}

#[test]
fn given_matching_key_when_verify_then_ok() {
    assert!(validator().verify(Some("super-secret")).is_ok());
}

#[test]
fn given_wrong_key_when_verify_then_invalid() {
    let result = validator().verify(Some("not-the-secret"));
    assert!(matches!(result, Err(AuthError::InvalidKey { .. })));
}

#[test]
fn given_no_key_when_verify_then_missing() {
    let result = validator().verify(None);
    assert!(matches!(result, Err(AuthError::MissingKey { .. })));
}

#[test]
fn given_unconfigured_validator_when_verify_then_not_configured() {
    let validator = ApiKeyValidator::new(None, "test");
    let result = validator.verify(Some("anything"));
    assert!(matches!(result, Err(AuthError::NotConfigured { .. })));
}

#[test]
fn given_empty_configured_key_when_verify_then_not_configured() {
    // An empty string in config is treated the same as unset.
    let validator = ApiKeyValidator::new(Some(String::new()), "test");
    let result = validator.verify(Some(""));
    assert!(matches!(result, Err(AuthError::NotConfigured { .. })));
}

#[test]
fn given_prefix_of_key_when_verify_then_invalid() {
    let result = validator().verify(Some("super"));
    assert!(matches!(result, Err(AuthError::InvalidKey { .. })));
}

#[test]
fn test_is_configured() {
    assert!(validator().is_configured());
    assert!(!ApiKeyValidator::new(None, "test").is_configured());
    assert!(!ApiKeyValidator::new(Some(String::new()), "test").is_configured());
}
