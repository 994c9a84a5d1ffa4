//! AWS Secrets Manager store against a mock endpoint

use aws_sdk_secretsmanager::config::{BehaviorVersion, Credentials, Region};
use github_to_jira::config::{AwsSecretStore, SecretStore, SyncConfig};
use github_to_jira::handle;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AMZ_JSON: &str = "application/x-amz-json-1.1";

fn aws_store(server: &MockServer) -> AwsSecretStore {
    let config = aws_sdk_secretsmanager::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .endpoint_url(server.uri())
        .build();
    AwsSecretStore::new(aws_sdk_secretsmanager::Client::from_conf(config))
}

async fn mount_secret(server: &MockServer, secret_id: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(header("x-amz-target", "secretsmanager.GetSecretValue"))
        .and(body_partial_json(json!({"SecretId": secret_id})))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_reads_secret_string() {
    let server = MockServer::start().await;
    let payload = json!({"gh_token": "gh", "jira_token": "jt"}).to_string();
    mount_secret(
        &server,
        "cloud_team_jira_login",
        ResponseTemplate::new(200).set_body_raw(
            json!({
                "ARN": "arn:aws:secretsmanager:us-east-1:123456789012:secret:cloud_team_jira_login",
                "Name": "cloud_team_jira_login",
                "SecretString": payload
            })
            .to_string(),
            AMZ_JSON,
        ),
    )
    .await;

    let secret = aws_store(&server)
        .get_secret_string("cloud_team_jira_login")
        .await
        .unwrap();

    assert_eq!(secret.as_deref(), Some(payload.as_str()));
}

#[tokio::test]
async fn test_unknown_secret_is_absent() {
    let server = MockServer::start().await;
    mount_secret(
        &server,
        "missing",
        ResponseTemplate::new(400)
            .insert_header("x-amzn-errortype", "ResourceNotFoundException")
            .set_body_raw(
                json!({
                    "__type": "ResourceNotFoundException",
                    "message": "Secrets Manager can't find the specified secret."
                })
                .to_string(),
                AMZ_JSON,
            ),
    )
    .await;

    let secret = aws_store(&server).get_secret_string("missing").await.unwrap();
    assert_eq!(secret, None);
}

#[tokio::test]
async fn test_access_denied_is_remote_error() {
    let server = MockServer::start().await;
    mount_secret(
        &server,
        "locked",
        ResponseTemplate::new(400)
            .insert_header("x-amzn-errortype", "AccessDeniedException")
            .set_body_raw(
                json!({"__type": "AccessDeniedException", "message": "not allowed"}).to_string(),
                AMZ_JSON,
            ),
    )
    .await;

    let err = aws_store(&server).get_secret_string("locked").await.unwrap_err();
    assert!(err.is_remote());
    assert!(err.to_string().contains("locked"));
}

#[tokio::test]
async fn test_binary_only_secret_fails_credential_loading() {
    let server = MockServer::start().await;
    mount_secret(
        &server,
        "binary_login",
        ResponseTemplate::new(200).set_body_raw(
            json!({"Name": "binary_login", "SecretBinary": "e30="}).to_string(),
            AMZ_JSON,
        ),
    )
    .await;

    let err = handle(&SyncConfig::default(), &aws_store(&server), Some("binary_login"))
        .await
        .unwrap_err();

    assert!(err.is_config());
    assert!(err
        .to_string()
        .contains("Secret 'binary_login' has no string payload"));
}
