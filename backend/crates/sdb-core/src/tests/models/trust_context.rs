use crate::{AuthLevel, TenantScope, TrustContext};

#[test]
fn test_new_context_is_unauthenticated_and_unscoped() {
    let ctx = TrustContext::new();
    assert_eq!(ctx.kind, AuthLevel::No);
    assert_eq!(ctx.possible, TenantScope::default());
    assert_eq!(ctx.selected, TenantScope::default());
    assert!(ctx.scope.is_none());
    assert!(ctx.identity.is_none());
}

#[test]
fn test_grant_root_widens_possible_scope() {
    let mut ctx = TrustContext::new();
    ctx.select_namespace("acme");
    ctx.grant_root();
    assert_eq!(ctx.kind, AuthLevel::Root);
    assert_eq!(ctx.possible, TenantScope::new("*", "*"));
    assert_eq!(ctx.selected.ns, "acme");
}

#[test]
fn test_database_context_pins_both_scopes() {
    let ctx = TrustContext::database("acme", "sales");
    assert_eq!(ctx.kind, AuthLevel::Database);
    assert_eq!(ctx.possible, TenantScope::new("acme", "sales"));
    assert_eq!(ctx.selected, TenantScope::new("acme", "sales"));
}

#[test]
fn test_serialized_context_omits_unset_scope_fields() {
    let json = serde_json::to_value(TrustContext::new()).unwrap();
    assert_eq!(json["kind"], "none");
    assert!(json.get("scope").is_none());
    assert!(json.get("identity").is_none());
}
