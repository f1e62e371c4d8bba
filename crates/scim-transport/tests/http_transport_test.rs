//! Integration tests for HttpScimTransport against a mock SCIM server.

use reqwest::Client;
use scim_core::DirectoryError;
use scim_transport::{
    HttpScimTransport, Method, RequestContext, ScimRequest, ScimTransport, ScimTransportExt, SCIM_CONTENT_TYPE,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const TOKEN: &str = "dapi-test-token";

fn transport(server: &MockServer) -> HttpScimTransport {
    HttpScimTransport::with_client(Client::new(), &server.uri(), TOKEN)
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(rename = "userName")]
    user_name: String,
}

#[tokio::test]
async fn test_get_sends_auth_and_decodes_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/preview/scim/v2/Me"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(header("accept", SCIM_CONTENT_TYPE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"userName": "me@example.com"})))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = RequestContext::background();
    let me: Named = transport(&server)
        .scim::<Value, _>(&ctx, Method::GET, "/preview/scim/v2/Me", None)
        .await
        .expect("request failed");

    assert_eq!(me.user_name, "me@example.com");
}

#[tokio::test]
async fn test_post_sends_scim_json_body() {
    let server = MockServer::start().await;
    let body = json!({"userName": "new@example.com", "active": true});
    Mock::given(method("POST"))
        .and(path("/preview/scim/v2/Users"))
        .and(header("content-type", SCIM_CONTENT_TYPE))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "7", "userName": "new@example.com"})))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = RequestContext::background();
    let created: Value = transport(&server)
        .scim(&ctx, Method::POST, "/preview/scim/v2/Users", Some(&body))
        .await
        .expect("request failed");

    assert_eq!(created["id"], "7");
}

#[tokio::test]
async fn test_get_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/preview/scim/v2/Users"))
        .and(query_param("filter", "userName eq 'a@example.com'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Resources": []})))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = RequestContext::background();
    let request = ScimRequest::new(Method::GET, "/preview/scim/v2/Users").with_query("filter", "userName eq 'a@example.com'");
    let body = transport(&server).execute(&ctx, request).await.expect("request failed");

    assert_eq!(body, Some(json!({"Resources": []})));
}

#[tokio::test]
async fn test_no_content_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/preview/scim/v2/Users/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = RequestContext::background();
    let body = transport(&server)
        .execute(&ctx, ScimRequest::new(Method::DELETE, "/preview/scim/v2/Users/42"))
        .await
        .expect("request failed");

    assert!(body.is_none());
}

#[tokio::test]
async fn test_delete_sends_no_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/preview/scim/v2/Users/42"))
        .respond_with(|req: &Request| {
            if req.body.is_empty() {
                ResponseTemplate::new(204)
            } else {
                ResponseTemplate::new(400)
            }
        })
        .expect(1)
        .mount(&server)
        .await;

    let ctx = RequestContext::background();
    transport(&server)
        .scim_void::<Value>(&ctx, Method::DELETE, "/preview/scim/v2/Users/42", None)
        .await
        .expect("request failed");
}

#[tokio::test]
async fn test_scim_error_body_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/preview/scim/v2/Users"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
            "detail": "User with username dup@example.com already exists.",
            "scimType": "uniqueness",
            "status": "409"
        })))
        .mount(&server)
        .await;

    let ctx = RequestContext::background();
    let err = transport(&server)
        .scim_void(&ctx, Method::POST, "/preview/scim/v2/Users", Some(&json!({"userName": "dup@example.com"})))
        .await
        .unwrap_err();

    match err {
        DirectoryError::Conflict(message) => {
            assert!(message.contains("already exists"));
            assert!(message.contains("uniqueness"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_status_codes_are_classified() {
    let server = MockServer::start().await;
    for (status, user) in [(401, "401"), (403, "403"), (404, "404"), (500, "500")] {
        Mock::given(method("GET"))
            .and(path(format!("/preview/scim/v2/Users/{}", user)))
            .respond_with(ResponseTemplate::new(status).set_body_string("failure"))
            .mount(&server)
            .await;
    }

    let ctx = RequestContext::background();
    let transport = transport(&server);
    let get = |id: &'static str| {
        let transport = &transport;
        let ctx = &ctx;
        async move {
            transport
                .execute(ctx, ScimRequest::new(Method::GET, format!("/preview/scim/v2/Users/{}", id)))
                .await
                .unwrap_err()
        }
    };

    assert!(matches!(get("401").await, DirectoryError::Unauthorized(_)));
    assert!(matches!(get("403").await, DirectoryError::Forbidden(_)));
    assert!(matches!(get("404").await, DirectoryError::NotFound(_)));
    assert!(matches!(
        get("500").await,
        DirectoryError::Remote { status: 500, ref message } if message == "failure"
    ));
}

#[tokio::test]
async fn test_cancelled_context_does_not_wait_for_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/preview/scim/v2/Me"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let ctx = RequestContext::new(token.clone());
    let transport = transport(&server);

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let started = std::time::Instant::now();
    let err = transport
        .execute(&ctx, ScimRequest::new(Method::GET, "/preview/scim/v2/Me"))
        .await
        .unwrap_err();
    canceller.await.unwrap();

    assert!(matches!(err, DirectoryError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_deadline_yields_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/preview/scim/v2/Me"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let ctx = RequestContext::background().with_timeout(Duration::from_millis(50));
    let err = transport(&server)
        .execute(&ctx, ScimRequest::new(Method::GET, "/preview/scim/v2/Me"))
        .await
        .unwrap_err();

    assert!(matches!(err, DirectoryError::Timeout(_)));
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/preview/scim/v2/Me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let ctx = RequestContext::background();
    let err = transport(&server)
        .execute(&ctx, ScimRequest::new(Method::GET, "/preview/scim/v2/Me"))
        .await
        .unwrap_err();

    assert!(matches!(err, DirectoryError::Decode(_)));
}
