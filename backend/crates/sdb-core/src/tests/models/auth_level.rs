use crate::{AuthLevel, CoreError};

use std::str::FromStr;

#[test]
fn test_auth_level_as_str() {
    assert_eq!(AuthLevel::No.as_str(), "none");
    assert_eq!(AuthLevel::Root.as_str(), "root");
    assert_eq!(AuthLevel::Namespace.as_str(), "namespace");
    assert_eq!(AuthLevel::Database.as_str(), "database");
    assert_eq!(AuthLevel::Scope.as_str(), "scope");
}

#[test]
fn test_auth_level_from_str() {
    assert_eq!(AuthLevel::from_str("none").unwrap(), AuthLevel::No);
    assert_eq!(AuthLevel::from_str("scope").unwrap(), AuthLevel::Scope);
    assert!(AuthLevel::from_str("admin").is_err());
}

#[test]
fn test_auth_level_default_is_unauthenticated() {
    assert_eq!(AuthLevel::default(), AuthLevel::No);
    assert!(!AuthLevel::default().is_authenticated());
    assert!(AuthLevel::Database.is_authenticated());
}

#[test]
fn test_auth_level_serializes_as_snake_case() {
    assert_eq!(serde_json::to_string(&AuthLevel::No).unwrap(), "\"none\"");
    assert_eq!(
        serde_json::to_string(&AuthLevel::Namespace).unwrap(),
        "\"namespace\""
    );
}

#[test]
fn test_auth_level_from_str_reports_rejected_value() {
    let err = AuthLevel::from_str("admin").unwrap_err();

    assert!(matches!(err, CoreError::InvalidAuthLevel { ref value, .. } if value == "admin"));
}
