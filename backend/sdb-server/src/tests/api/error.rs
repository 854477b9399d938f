use crate::ApiError;

use sdb_auth::AuthError;

use std::net::IpAddr;
use std::panic::Location;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use error_location::ErrorLocation;
use http_body_util::BodyExt;

async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn given_invalid_credentials_when_rendered_then_401_with_generic_message() {
    let error = ApiError::from(AuthError::InvalidCredentials {
        location: ErrorLocation::from(Location::caller()),
    });

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "INVALID_CREDENTIALS");
    assert_eq!(json["error"]["message"], "Invalid authentication details");
}

#[tokio::test]
async fn given_forbidden_ip_when_rendered_then_403() {
    let ip: IpAddr = "192.168.1.5".parse().unwrap();
    let error = ApiError::from(AuthError::forbidden_ip(
        Some(ip),
        ErrorLocation::from(Location::caller()),
    ));

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"]["code"], "FORBIDDEN_IP");
}

#[tokio::test]
async fn given_malformed_token_when_rendered_then_message_hides_detail() {
    let error = ApiError::from(AuthError::MalformedToken {
        message: "claims: {\"NS\":\"acme\"}".into(),
        location: ErrorLocation::from(Location::caller()),
    });

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "MALFORMED_TOKEN");
    assert!(!json["error"]["message"].as_str().unwrap().contains("acme"));
}

#[tokio::test]
async fn given_internal_error_when_rendered_then_500() {
    let error = ApiError::internal("catalog unavailable");

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"]["message"], "Internal server error");
}
