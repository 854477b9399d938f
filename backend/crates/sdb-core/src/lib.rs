pub mod error;
pub mod models;

pub use error::{CoreError, ErrorLocation, Result};
pub use models::auth_level::AuthLevel;
pub use models::identity::Identity;
pub use models::tenant_scope::{ANY, TenantScope};
pub use models::thing::Thing;
pub use models::trust_context::TrustContext;

#[cfg(test)]
mod tests;
