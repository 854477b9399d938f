use crate::Trust;

use sdb_core::{AuthLevel, TrustContext};

use axum::{body::Body, extract::FromRequestParts, http::Request};

#[tokio::test]
async fn given_context_in_extensions_when_extracted_then_returned() {
    let mut request = Request::builder().body(Body::empty()).unwrap();
    request
        .extensions_mut()
        .insert(TrustContext::database("acme", "sales"));

    let (mut parts, _body) = request.into_parts();
    let result = Trust::from_request_parts(&mut parts, &()).await;

    let Trust(ctx) = result.ok().unwrap();
    assert_eq!(ctx.kind, AuthLevel::Database);
    assert_eq!(ctx.selected.ns, "acme");
}

#[tokio::test]
async fn given_no_context_when_extracted_then_internal_error() {
    let request = Request::builder().body(Body::empty()).unwrap();

    let (mut parts, _body) = request.into_parts();
    let result = Trust::from_request_parts(&mut parts, &()).await;

    let error = result.err().unwrap();
    assert_eq!(error.error_code(), "INTERNAL_ERROR");
}
