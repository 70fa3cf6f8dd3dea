#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{Local, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use timeclock::app::AppContext;
use timeclock::config::Config;
use timeclock::db::storage::KvStore;
use timeclock::models::user::Credentials;
use timeclock::nav::View;

pub const EMAIL: &str = "a@b.com";
pub const PASSWORD: &str = "secret1";

/// The binary, isolated in `home` and shielded from the caller's environment.
pub fn tc(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("timeclock");
    cmd.env("TIMECLOCK_HOME", home)
        .env_remove("TIMECLOCK_API_URL")
        .env_remove("TIMECLOCK_PASSWORD")
        .env_remove("TIMECLOCK_LOG");
    cmd
}

pub fn temp_home() -> TempDir {
    tempfile::tempdir().expect("temp home")
}

/// Signed JWT for `EMAIL` expiring `secs` from now. The client never
/// checks the signature.
pub fn token_valid_for(secs: i64) -> String {
    encode(
        &Header::default(),
        &json!({ "sub": EMAIL, "exp": Utc::now().timestamp() + secs }),
        &EncodingKey::from_secret(b"test-secret"),
    )
    .expect("encode token")
}

pub fn signin_body(token: &str) -> Value {
    json!({
        "token": token,
        "type": "Bearer",
        "id": 7,
        "email": EMAIL,
        "firstName": "A",
        "lastName": "B",
        "roles": ["ROLE_EMPLOYEE"]
    })
}

pub fn summary_json(status: &str, arrival: Option<&str>) -> Value {
    json!({
        "arrivalTime": arrival,
        "departureTime": null,
        "breakTime": "00:00",
        "workingTime": "00:00",
        "flexTime": "00:00",
        "status": status,
        "isWorking": status == "Working",
        "isOnBreak": status == "Break"
    })
}

/// A server-side booking dated today.
pub fn entry_json(id: i64, time: &str, record_type: &str, location: &str) -> Value {
    json!({
        "id": id,
        "date": Local::now().date_naive().format("%Y-%m-%d").to_string(),
        "time": time,
        "recordType": record_type,
        "locationType": location,
        "terminal": "cli",
        "notes": null,
        "isManual": false
    })
}

pub fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

pub async fn mount_signin(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(signin_body(token)))
        .mount(server)
        .await;
}

/// Context against `server` with in-memory storage.
pub fn context(server: &MockServer) -> AppContext {
    context_with(server, KvStore::in_memory().expect("kv"))
}

/// Context against `server` over prepared storage.
pub fn context_with(server: &MockServer, storage: KvStore) -> AppContext {
    let cfg = Config {
        api_base_url: api_url(server),
        ..Config::default()
    };
    AppContext::new(cfg, storage, View::Login).expect("context")
}

pub fn credentials() -> Credentials {
    Credentials {
        email: EMAIL.into(),
        password: PASSWORD.into(),
    }
}

/// Context already logged in through a mocked sign-in.
pub async fn logged_in(server: &MockServer) -> AppContext {
    mount_signin(server, &token_valid_for(3600)).await;
    let mut ctx = context(server);
    ctx.login(&credentials()).await.expect("login");
    ctx
}
