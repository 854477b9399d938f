use crate::api::extractors::trust::Trust;

use sdb_core::TrustContext;

use axum::Json;

/// GET /session - the trust context this request was resolved to
pub async fn session(Trust(ctx): Trust) -> Json<TrustContext> {
    Json(ctx)
}
