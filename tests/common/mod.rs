//! Shared scaffolding for the integration suites.
#![allow(dead_code)]

use aquaview::auth::Session;
use aquaview::notify::{Notice, Notifier};
use aquaview::{Config, Transport};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::MockServer;

/// Notifier that records every user-visible notice.
pub struct Recorder {
    notices: parking_lot::Mutex<Vec<Notice>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            notices: parking_lot::Mutex::new(Vec::new()),
        })
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices.lock().iter().map(|n| n.message.clone()).collect()
    }
}

impl Notifier for Recorder {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

/// A fully wired client pointed at a mock backend, with scratch storage.
pub struct TestClient {
    pub _tmp: TempDir,
    pub transport: Arc<Transport>,
    pub session: Arc<Session>,
    pub notifier: Arc<Recorder>,
}

pub fn client(server: &MockServer) -> TestClient {
    let tmp = TempDir::new().unwrap();
    let config = Config {
        api_url: server.uri(),
        storage_dir: Some(tmp.path().to_path_buf()),
    };
    let notifier = Recorder::new();
    let (transport, session) = aquaview::bootstrap(&config, notifier.clone()).unwrap();
    TestClient {
        _tmp: tmp,
        transport,
        session,
        notifier,
    }
}

/// Forge an unsigned JWT-shaped token expiring `offset_secs` from now.
pub fn forge_with_exp(offset_secs: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let exp = chrono::Utc::now().timestamp() + offset_secs;
    let body = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp},"sub":"1"}}"#).as_bytes());
    format!("{header}.{body}.sig")
}

pub fn profile_json(is_admin: bool) -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "username": "admin",
        "email": "admin@example.org",
        "full_name": "Site Admin",
        "is_active": true,
        "is_admin": is_admin,
        "created_at": "2024-03-01T08:00:00",
        "updated_at": "2024-03-01T08:00:00",
        "last_login": null
    })
}

pub fn token_json(token: &str, is_admin: bool) -> serde_json::Value {
    serde_json::json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": 3600,
        "user": profile_json(is_admin)
    })
}
