use crate::{Identity, Thing};

use std::str::FromStr;

#[test]
fn test_thing_display() {
    assert_eq!(Thing::new("user", "tobie").to_string(), "user:tobie");
}

#[test]
fn test_thing_from_str_splits_on_first_colon() {
    let thing = Thing::from_str("session:a:b").unwrap();
    assert_eq!(thing.tb, "session");
    assert_eq!(thing.id, "a:b");
}

#[test]
fn test_thing_from_str_rejects_missing_parts() {
    assert!(Thing::from_str("user").is_err());
    assert!(Thing::from_str(":id").is_err());
    assert!(Thing::from_str("user:").is_err());
}

#[test]
fn test_identity_thing_round_trips_through_json() {
    let identity = Identity::from(Thing::new("user", "1"));
    let json = serde_json::to_value(&identity).unwrap();
    assert_eq!(json, serde_json::json!("user:1"));
    assert_eq!(serde_json::from_value::<Identity>(json).unwrap(), identity);
}

#[test]
fn test_identity_record_binds_as_itself() {
    let record = serde_json::json!({ "id": "user:1", "name": "Tobie" });
    let identity = Identity::Record(record.clone());
    assert_eq!(identity.to_value(), record);
    assert!(identity.as_thing().is_none());
}
