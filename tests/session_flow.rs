//! End-to-end session scenarios against a mock backend.

mod common;

use aquaview::api::water_quality;
use aquaview::auth::AuthEvent;
use aquaview::ApiError;
use common::{client, forge_with_exp, profile_json, token_json};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn login_authenticates_with_a_single_request() {
    let server = MockServer::start().await;
    let c = client(&server);

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_json(&forge_with_exp(3600), true)),
        )
        .expect(1)
        .mount(&server)
        .await;
    // The profile arrives inside the login response; /auth/me must stay cold.
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(true)))
        .expect(0)
        .mount(&server)
        .await;

    c.session.login("admin", "x").await.unwrap();
    assert!(c.session.is_authenticated());
    assert!(c.session.is_admin());
}

#[tokio::test]
async fn rejected_login_is_a_form_error_not_a_session_event() {
    let server = MockServer::start().await;
    let c = client(&server);
    let mut events = c.transport.events().subscribe();

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = c.session.login("admin", "wrong").await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(
        c.session.form_error().as_deref(),
        Some("Invalid username or password")
    );
    // No "session expired" notice and no forced redirect for a bad login.
    assert!(c.notifier.messages().is_empty());
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn rejected_authenticated_call_logs_the_session_out() {
    let server = MockServer::start().await;
    let c = client(&server);

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_json(&forge_with_exp(3600), true)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/water-quality/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    c.session.login("admin", "x").await.unwrap();
    let mut events = c.transport.events().subscribe();

    let result = water_quality::list(&c.transport, &Default::default()).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));

    // The credential is gone without any intervening login attempt.
    assert!(!c.session.is_authenticated());
    assert!(c.transport.credential_store().get().is_none());
    assert_eq!(events.try_recv().unwrap(), AuthEvent::SessionExpired);
}

#[tokio::test]
async fn concurrent_401s_clear_once_and_redirect_once() {
    let server = MockServer::start().await;
    let c = client(&server);
    c.transport.credential_store().set(&forge_with_exp(3600));
    let mut events = c.transport.events().subscribe();

    Mock::given(method("GET"))
        .and(path("/api/v1/water-quality/"))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(50)))
        .mount(&server)
        .await;

    let query = Default::default();
    let (a, b) = tokio::join!(
        water_quality::list(&c.transport, &query),
        water_quality::list(&c.transport, &query),
    );
    assert!(a.is_err() && b.is_err());

    // Exactly one expiry notice and one forced-redirect event, not two.
    let expiry_notices = c
        .notifier
        .messages()
        .iter()
        .filter(|m| m.contains("Session expired"))
        .count();
    assert_eq!(expiry_notices, 1);
    assert_eq!(events.try_recv().unwrap(), AuthEvent::SessionExpired);
    assert!(events.try_recv().is_err());
    assert!(c.transport.credential_store().get().is_none());
}

#[tokio::test]
async fn stale_401_cannot_clobber_a_fresh_login() {
    let server = MockServer::start().await;
    let c = client(&server);
    c.transport.credential_store().set(&forge_with_exp(3600));

    // The doomed request answers slowly; a fresh login lands meanwhile.
    Mock::given(method("GET"))
        .and(path("/api/v1/water-quality/"))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;
    let fresh_token = forge_with_exp(7200);
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json(&fresh_token, true)))
        .mount(&server)
        .await;

    let slow = tokio::spawn({
        let transport = c.transport.clone();
        async move { water_quality::list(&transport, &Default::default()).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    c.session.login("admin", "x").await.unwrap();

    let result = slow.await.unwrap();
    assert!(matches!(result, Err(ApiError::Unauthorized)));

    // The stale rejection must not discard the credential minted after it.
    assert_eq!(
        c.transport.credential_store().get().as_deref(),
        Some(fresh_token.as_str())
    );
    assert!(c.session.is_authenticated());
    assert!(!c.notifier.messages().iter().any(|m| m.contains("Session expired")));
}

#[tokio::test]
async fn logout_clears_state_and_revokes_server_side() {
    let server = MockServer::start().await;
    let c = client(&server);

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_json(&forge_with_exp(3600), false)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "bye"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    c.session.login("user", "x").await.unwrap();
    c.session.logout().await;

    assert!(!c.session.is_authenticated());
    assert!(c.transport.credential_store().get().is_none());
}

#[tokio::test]
async fn credential_survives_restart_and_rehydrates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(true)))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::TempDir::new().unwrap();
    let config = aquaview::Config {
        api_url: server.uri(),
        storage_dir: Some(tmp.path().to_path_buf()),
    };

    // First run stores a credential.
    {
        let (transport, _session) =
            aquaview::bootstrap(&config, common::Recorder::new()).unwrap();
        transport.credential_store().set(&forge_with_exp(3600));
    }

    // Second run finds it on disk and hydrates the identity from it.
    let (_transport, session) = aquaview::bootstrap(&config, common::Recorder::new()).unwrap();
    session.initialize().await.unwrap();
    assert!(session.is_authenticated());
    assert!(session.is_admin());
}
