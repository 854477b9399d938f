pub mod api;
pub mod app_state;
pub mod error;
pub mod health;
pub mod logger;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::error::{ApiError, Result as ApiResult};
pub use api::extractors::trust::Trust;
pub use app_state::AppState;
pub use error::ServerError;
pub use routes::build_router;
