//! ClientSecretCredential behavior against a mock token endpoint.

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use azvm::auth::{ClientSecretCredential, TokenCredential};

const SCOPE: &str = "https://management.azure.com/.default";

fn credential_for(server: &MockServer) -> ClientSecretCredential {
    ClientSecretCredential::new("my-tenant", "my-client", "my-secret")
        .unwrap()
        .with_authority_host(server.uri())
}

#[tokio::test]
async fn client_credentials_grant_is_posted_to_the_tenant_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/my-tenant/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=my-client"))
        .and(body_string_contains("client_secret=my-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "issued-token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = credential_for(&server)
        .get_token(&[SCOPE])
        .await
        .unwrap();

    assert_eq!(token.secret(), "issued-token");
    assert!(token.expires_on() > chrono::Utc::now());
}

#[tokio::test]
async fn token_endpoint_rejection_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/my-tenant/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = credential_for(&server)
        .get_token(&[SCOPE])
        .await
        .unwrap_err();

    assert!(err.is_authentication());
    assert!(err.to_string().contains("invalid_client"));
    assert!(err.to_string().contains("AADSTS7000215"));
}

#[tokio::test]
async fn malformed_token_response_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/my-tenant/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let err = credential_for(&server)
        .get_token(&[SCOPE])
        .await
        .unwrap_err();

    assert!(err.is_authentication());
}
