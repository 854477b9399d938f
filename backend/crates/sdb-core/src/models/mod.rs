pub mod auth_level;
pub mod identity;
pub mod tenant_scope;
pub mod thing;
pub mod trust_context;
