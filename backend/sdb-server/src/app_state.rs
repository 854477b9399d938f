use sdb_auth::Authenticator;

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Authenticator,
}

impl AppState {
    pub fn new(authenticator: Authenticator) -> Self {
        Self { authenticator }
    }
}
