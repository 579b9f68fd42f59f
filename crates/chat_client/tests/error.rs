use chat_client::error::{error_for_status, parse_error_message};
use chat_protocol::ChatErrorKind;
use reqwest::StatusCode;

#[test]
fn auth_statuses_map_to_invalid_api_key() {
    for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
        let error = error_for_status(status).expect("auth status maps to an error");
        assert_eq!(error.kind, ChatErrorKind::InvalidApiKey);
    }
}

#[test]
fn not_found_maps_to_model_not_found() {
    let error = error_for_status(StatusCode::NOT_FOUND).expect("404 maps to an error");
    assert_eq!(error.kind, ChatErrorKind::ModelNotFound);
}

#[test]
fn too_many_requests_maps_to_rate_limited() {
    let error = error_for_status(StatusCode::TOO_MANY_REQUESTS).expect("429 maps to an error");
    assert_eq!(error.kind, ChatErrorKind::RateLimited);
}

#[test]
fn other_statuses_defer_to_body_parsing() {
    assert!(error_for_status(StatusCode::OK).is_none());
    assert!(error_for_status(StatusCode::BAD_REQUEST).is_none());
    assert!(error_for_status(StatusCode::INTERNAL_SERVER_ERROR).is_none());
}

#[test]
fn server_error_message_is_extracted_from_body() {
    let message = parse_error_message(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"error":{"message":"model overloaded"}}"#,
    );
    assert_eq!(message, "model overloaded");
}

#[test]
fn missing_or_blank_message_falls_back_to_status() {
    assert_eq!(
        parse_error_message(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":{}}"#),
        "Request failed: 500"
    );
    assert_eq!(
        parse_error_message(
            StatusCode::BAD_GATEWAY,
            r#"{"error":{"message":"   "}}"#
        ),
        "Request failed: 502"
    );
    assert_eq!(
        parse_error_message(StatusCode::BAD_GATEWAY, ""),
        "Request failed: 502"
    );
}
