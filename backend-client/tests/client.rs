use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use studybuddy_backend_client::BackendClient;
use studybuddy_settings::MemorySettings;
use studybuddy_settings::SettingsStore;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

fn client_with_token(server: &MockServer, token: Option<&str>) -> BackendClient {
    let settings = Arc::new(MemorySettings::new());
    if let Some(token) = token {
        settings.set_auth_token(token);
    }
    BackendClient::new(server.uri(), settings).unwrap()
}

#[tokio::test]
async fn search_parses_recommended_and_all_groups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/groups/search"))
        .and(query_param("q", "Analízis"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recommended_group": {
                "id": 2,
                "name": "Analízis Study Group #2",
                "subject": "Analízis",
                "member_count": 3,
                "same_interest_members": 2
            },
            "all_groups": [
                {
                    "id": 1,
                    "name": "Analízis Study Group #1",
                    "subject": "Analízis",
                    "description": "Heti két alkalom",
                    "member_count": 6
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("test-token"));
    let response = client.search_groups("Analízis").await.unwrap();

    assert_eq!(response.all_groups.len(), 1);
    assert_eq!(response.all_groups[0].member_count, 6);
    let recommended = response.recommended_group.unwrap();
    assert_eq!(recommended.id, 2);
    assert_eq!(recommended.same_interest_members, 2);
}

#[tokio::test]
async fn join_posts_group_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groups/join"))
        .and(body_json(json!({"group_id": 42})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"message": "Sikeresen csatlakoztál a csoporthoz!"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("test-token"));
    client.join_group(42).await.unwrap();
}

#[tokio::test]
async fn join_rejection_surfaces_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groups/join"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Már van tanulócsoportod ehhez a tárgyhoz.",
            "subject": "Analízis"
        })))
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("test-token"));
    let err = client.join_group(1).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(
        err.to_string()
            .contains("Már van tanulócsoportod ehhez a tárgyhoz.")
    );
}

#[tokio::test]
async fn message_spelling_of_error_envelope_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Érvénytelen token"})),
        )
        .mount(&server)
        .await;

    let client = client_with_token(&server, None);
    let err = client.profile().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Érvénytelen token"));
}

#[tokio::test]
async fn login_persists_token_for_later_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(
            json!({"email": "a@elte.hu", "password": "titok"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Sikeres bejelentkezés!",
            "token": "fresh-token"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/groups/my-groups"))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"groups": []})))
        .expect(1)
        .mount(&server)
        .await;

    let settings = Arc::new(MemorySettings::new());
    let client = BackendClient::new(server.uri(), settings.clone()).unwrap();

    let auth = client.login("a@elte.hu", "titok").await.unwrap();
    assert_eq!(auth.token, "fresh-token");
    assert_eq!(settings.auth_token().as_deref(), Some("fresh-token"));

    let groups = client.my_groups().await.unwrap();
    assert!(groups.groups.is_empty());
}

#[tokio::test]
async fn logout_clears_the_stored_session() {
    let server = MockServer::start().await;
    let settings = Arc::new(MemorySettings::new());
    settings.set_auth_token("stale");
    let client = BackendClient::new(server.uri(), settings.clone()).unwrap();

    client.logout();

    assert_eq!(settings.auth_token(), None);
}

#[tokio::test]
async fn unread_counts_deserialize_into_ordered_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/groups/unread-counts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"3": 1, "1": 4})))
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("test-token"));
    let counts = client.unread_post_counts().await.unwrap();

    assert_eq!(counts.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(counts.get(&1), Some(&4));
}

#[tokio::test]
async fn mark_posts_read_hits_the_group_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groups/9/read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("test-token"));
    client.mark_posts_read(9).await.unwrap();
}

#[tokio::test]
async fn members_roster_parses_sparse_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/groups/5/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Kiss Anna", "email": "anna@elte.hu", "major": "Informatika"},
            {"id": 2}
        ])))
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("test-token"));
    let members = client.group_members(5).await.unwrap();

    assert_eq!(members.len(), 2);
    assert_eq!(members[0].name.as_deref(), Some("Kiss Anna"));
    assert_eq!(members[1].name, None);
}
