//! Integration tests for the JobLlama HTTP client

#![cfg(feature = "client")]

use jobllama_http::client::{
    AuthenticatedClient, ClientError, PublicClient, TokenStore, TypedClientBuilder,
};
use jobllama_http::types::{
    AvailabilityField, CreateJobFlowRequest, JobFlowSource, JobFlowStatus, ListParams,
    ResumeStatus, TokenPair,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resume_json(id: &str) -> Value {
    json!({
        "id": id,
        "user_id": "user-1",
        "file_id": "file-1",
        "filename": "cv.pdf",
        "status": "active",
        "created_at": "2024-05-01T10:00:00Z",
        "scoring": {
            "education_score": 7.5,
            "experience_score": 8.0,
            "language_score": 6.0,
            "sections_score": 9.0,
            "timeline_score": 5.5,
            "total_score": 7.2
        }
    })
}

fn page_json(list: Vec<Value>) -> Value {
    let total = list.len();
    json!({
        "list": list,
        "pagination": {"total": total, "currentPage": 1, "perPage": 10}
    })
}

fn signed_in_client(server: &MockServer) -> AuthenticatedClient {
    let tokens = TokenStore::in_memory();
    tokens
        .store_pair(&TokenPair {
            access_token: "access-1".into(),
            refresh_token: "refresh-1".into(),
        })
        .unwrap();
    PublicClient::new(server.uri()).unwrap().authenticate(tokens)
}

#[tokio::test]
async fn test_client_builder() {
    let client = TypedClientBuilder::new()
        .base_url("http://localhost:3001/api/")
        .build_public();

    assert!(client.is_ok());
    let client = client.unwrap();
    assert_eq!(client.base_url(), "http://localhost:3001/api");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = TypedClientBuilder::new().build_public();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_sign_in_stores_tokens() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .and(body_json(json!({"login": "ada", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "message": "ok"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PublicClient::new(mock_server.uri())
        .unwrap()
        .authenticate(TokenStore::in_memory());
    assert!(!client.has_session());

    let response = client.sign_in("ada", "hunter2").await.unwrap();
    assert_eq!(response.message.as_deref(), Some("ok"));
    assert!(client.has_session());
    assert_eq!(client.tokens().refresh_token().as_deref(), Some("refresh-1"));

    client.sign_out().unwrap();
    assert!(!client.has_session());
    assert_eq!(client.tokens().refresh_token(), None);
}

#[tokio::test]
async fn test_sign_up_stores_tokens() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "username": "ada",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "access_token": "access-new",
            "refresh_token": "refresh-new"
        })))
        .mount(&mock_server)
        .await;

    let client = PublicClient::new(mock_server.uri())
        .unwrap()
        .authenticate(TokenStore::in_memory());
    client
        .sign_up("ada@example.com", "ada", "hunter2")
        .await
        .unwrap();

    assert_eq!(client.tokens().access_token().as_deref(), Some("access-new"));
}

#[tokio::test]
async fn test_check_availability() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/check-availability"))
        .and(body_json(json!({"field": "username", "value": "ada"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_available": false,
            "message": "Username is taken"
        })))
        .mount(&mock_server)
        .await;

    let client = PublicClient::new(mock_server.uri()).unwrap();
    let response = client
        .check_availability(AvailabilityField::Username, "ada")
        .await
        .unwrap();

    assert!(!response.is_available);
    assert_eq!(response.message.as_deref(), Some("Username is taken"));
}

#[tokio::test]
async fn test_public_client_never_refreshes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let result = client.to_public().sign_in("ada", "wrong").await;
    assert!(matches!(result, Err(ClientError::AuthenticationFailed(_))));

    // Nor does a failed sign-in through the authenticated surface touch the session
    let result = client.sign_in("ada", "wrong").await;
    assert!(matches!(result, Err(ClientError::AuthenticationFailed(_))));
    assert_eq!(client.tokens().access_token().as_deref(), Some("access-1"));
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/resumes/list"))
        .and(header("authorization", "Bearer access-1"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "5"))
        .and(query_param("status", "archived"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_json(vec![resume_json("r-1")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let params = ListParams::new(2, 5).with_status(ResumeStatus::Archived);
    let page = client.list_resumes(&params).await.unwrap();

    assert_eq!(page.list.len(), 1);
    assert_eq!(page.list[0].filename, "cv.pdf");
    assert_eq!(page.list[0].scoring.unwrap().total, 7.2);
}

#[tokio::test]
async fn test_non_auth_errors_are_returned_as_is() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cover-letters/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such letter"))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/job-queries/q-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);

    let result = client.get_cover_letter("missing").await;
    assert!(matches!(result, Err(ClientError::NotFound(message)) if message == "no such letter"));

    let result = client.delete_job_query("q-1").await;
    assert!(matches!(
        result,
        Err(ClientError::ServerError { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_download_returns_raw_bytes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/resumes/r-1/download"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let bytes = client.download_resume("r-1").await.unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.7");
}

#[tokio::test]
async fn test_upload_rejects_unsupported_types_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/resumes/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let result = client
        .upload_resume("cv.txt", "text/plain", "hello".into())
        .await;
    assert!(matches!(result, Err(ClientError::Validation(_))));
}

#[tokio::test]
async fn test_status_updates_send_status_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/job-flow/f-1/status"))
        .and(body_json(json!({"status": "paused"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/resumes/r-1/status"))
        .and(body_json(json!({"status": "archived"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    client
        .update_job_flow_status("f-1", JobFlowStatus::Paused)
        .await
        .unwrap();
    client
        .update_resume_status("r-1", ResumeStatus::Archived)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_job_flow() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job-flow"))
        .and(body_json(json!({
            "resume_id": "r-1",
            "cover_letter_id": "c-1",
            "job_query_id": "q-1",
            "source": "linkedin",
            "status": "active"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "f-1",
            "user_id": "user-1",
            "source": "linkedin",
            "status": "active",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z",
            "resume": {"id": "r-1", "filename": "cv.pdf"},
            "cover_letter": {"id": "c-1", "name": "Default"},
            "job_query": {"id": "q-1", "name": "Rust", "query": "rust AND remote"}
        })))
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let flow = client
        .create_job_flow(&CreateJobFlowRequest {
            resume_id: "r-1".into(),
            cover_letter_id: "c-1".into(),
            job_query_id: "q-1".into(),
            source: JobFlowSource::Linkedin,
            status: JobFlowStatus::Active,
        })
        .await
        .unwrap();

    assert_eq!(flow.id, "f-1");
    assert_eq!(flow.job_query.query, "rust AND remote");
}

#[tokio::test]
async fn test_generate_job_query_keywords() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job-queries/generate"))
        .and(body_json(json!({"resume_id": "r-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "keywords": {
                "job_titles": ["Backend Engineer"],
                "required_skills": ["Rust", "PostgreSQL"],
                "work_arrangements": ["remote"],
                "positions": ["senior"],
                "exclude_words": ["intern"]
            }
        })))
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let response = client.generate_job_query_keywords("r-1").await.unwrap();
    assert_eq!(response.keywords.required_skills, vec!["Rust", "PostgreSQL"]);
}

#[tokio::test]
async fn test_undecodable_body_is_a_serialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/job-queries/q-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let result = client.get_job_query("q-1").await;
    assert!(matches!(result, Err(ClientError::Serialization(_))));
}
