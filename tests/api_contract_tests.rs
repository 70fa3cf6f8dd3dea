//! Contract tests of the client core against a mocked time-tracking API:
//! request construction, response classification, the authorization gate
//! and the optimistic booking flow.

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use timeclock::api::ApiClient;
use timeclock::db::log::load_log;
use timeclock::db::storage::{KvStore, REDIRECT_KEY, SESSION_KEY, WORK_STATUS_KEY};
use timeclock::errors::{AppError, ErrorKind, INVALID_RESPONSE_FORMAT};
use timeclock::models::location::LocationType;
use timeclock::models::protocol_entry::EntryId;
use timeclock::models::record_type::RecordType;
use timeclock::models::session::Session;
use timeclock::models::user::SignupRequest;
use timeclock::models::work_status::WorkStatus;
use timeclock::nav::View;
use timeclock::workstatus::WorkStatusStore;
use timeclock::workstatus::machine::Intent;

mod common;
use common::*;

async fn mount_get(server: &MockServer, p: &str, body: serde_json::Value, times: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path(p))
        .respond_with(ResponseTemplate::new(200).set_body_json(body));
    match times {
        Some(n) => mock.up_to_n_times(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

// ── Session ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_populates_session() {
    let server = MockServer::start().await;
    let token = token_valid_for(3600);

    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .and(body_json(json!({ "email": EMAIL, "password": PASSWORD })))
        .respond_with(ResponseTemplate::new(200).set_body_json(signin_body(&token)))
        .expect(1)
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let outcome = ctx.login(&credentials()).await.expect("login");

    assert_eq!(outcome.full_name, "A B");
    assert_eq!(outcome.roles, vec!["ROLE_EMPLOYEE".to_string()]);
    assert!(outcome.redirect_to.is_none());
    assert!(ctx.is_authenticated());
    assert_eq!(ctx.session().full_name().as_deref(), Some("A B"));
    assert_eq!(ctx.navigator().current(), View::Dashboard);

    let stored: Session = ctx.storage().get(SESSION_KEY).unwrap().expect("persisted");
    assert_eq!(stored.token.as_deref(), Some(token.as_str()));
}

#[tokio::test]
async fn bad_credentials_leave_storage_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })))
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let err = ctx.login(&credentials()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(!ctx.is_authenticated());
    assert!(ctx.storage().get::<Session>(SESSION_KEY).unwrap().is_none());
    // Login is an auth view: no redirect is recorded
    assert!(ctx.storage().get::<String>(REDIRECT_KEY).unwrap().is_none());
}

#[tokio::test]
async fn expired_token_from_server_is_rejected() {
    let server = MockServer::start().await;
    mount_signin(&server, &token_valid_for(-60)).await;

    let mut ctx = context(&server);
    let err = ctx.login(&credentials()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == INVALID_RESPONSE_FORMAT));
    assert!(!ctx.is_authenticated());
}

#[tokio::test]
async fn logout_clears_session_even_when_server_fails() {
    let server = MockServer::start().await;
    let mut ctx = logged_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    ctx.logout().await.expect("logout");
    assert!(!ctx.is_authenticated());
    assert!(ctx.storage().get::<Session>(SESSION_KEY).unwrap().is_none());
    assert_eq!(ctx.navigator().current(), View::Login);
}

#[tokio::test]
async fn me_refreshes_stored_user() {
    let server = MockServer::start().await;
    let mut ctx = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "email": EMAIL, "firstName": "Anna", "lastName": "B", "roles": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = ctx.me().await.expect("me");
    assert_eq!(user.full_name(), "Anna B");
    // Second call is served from the query cache
    ctx.me().await.expect("cached me");
    assert_eq!(ctx.session().full_name().as_deref(), Some("Anna B"));
}

// ── Response classification ──────────────────────────────────────────────

#[tokio::test]
async fn timeout_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/timetrack/summary/today"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(summary_json("Not Started", None))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(&api_url(&server), Duration::from_millis(200)).unwrap();
    let err = client.time_records().summary_today().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn schema_mismatch_is_invalid_response_format() {
    let server = MockServer::start().await;
    mount_get(&server, "/api/timetrack/summary/today", json!({ "unexpected": true }), None).await;

    let client = ApiClient::new(&api_url(&server), Duration::from_secs(5)).unwrap();
    let err = client.time_records().summary_today().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), format!("Validation error: {INVALID_RESPONSE_FORMAT}"));
}

#[tokio::test]
async fn business_rejection_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/timetrack/time-records/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Time record not found" })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&api_url(&server), Duration::from_secs(5)).unwrap();
    let err = client.time_records().delete(9).await.unwrap_err();
    match err {
        AppError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Time record not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ── Authorization gate ───────────────────────────────────────────────────

#[tokio::test]
async fn unauthorized_clears_session_and_redirects_back_after_login() {
    let server = MockServer::start().await;
    let mut ctx = logged_in(&server).await;

    mount_get(&server, "/api/timetrack/summary/today", summary_json("Working", Some("08:00")), None).await;
    mount_get(
        &server,
        "/api/timetrack/time-records/today",
        json!([entry_json(5, "08:00:00", "CLOCK_IN", "OFFICE")]),
        None,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/timetrack/time-records/my-records"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    ctx.refresh_today().await.expect("refresh");
    assert!(ctx.storage().get::<WorkStatusStore>(WORK_STATUS_KEY).unwrap().is_some());

    let day = chrono::Local::now().date_naive();
    let err = ctx.my_records(day, day).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
    assert!(!ctx.is_authenticated());
    assert!(ctx.storage().get::<Session>(SESSION_KEY).unwrap().is_none());
    assert!(ctx.storage().get::<WorkStatusStore>(WORK_STATUS_KEY).unwrap().is_none());
    assert!(ctx.work().protocol().is_empty());
    assert_eq!(ctx.navigator().current(), View::Unauthorized);
    assert_eq!(
        ctx.storage().get::<String>(REDIRECT_KEY).unwrap().as_deref(),
        Some("/protocol")
    );

    let outcome = ctx.login(&credentials()).await.expect("second login");
    assert_eq!(outcome.redirect_to.as_deref(), Some("/protocol"));
    assert!(ctx.storage().get::<String>(REDIRECT_KEY).unwrap().is_none());
}

#[tokio::test]
async fn forbidden_response_navigates_away_and_keeps_session() {
    let server = MockServer::start().await;
    let mut ctx = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/timetrack/time-records/my-records"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let day = chrono::Local::now().date_naive();
    let err = ctx.my_records(day, day).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(ctx.navigator().current(), View::Forbidden);
    assert!(ctx.is_authenticated());
    assert!(ctx.storage().get::<Session>(SESSION_KEY).unwrap().is_some());
    assert!(ctx.storage().get::<String>(REDIRECT_KEY).unwrap().is_none());
}

#[tokio::test]
async fn commands_require_a_session() {
    let server = MockServer::start().await;
    let mut ctx = context(&server);

    let err = ctx.book(Intent::ClockIn, None, None).await.unwrap_err();
    assert!(matches!(err, AppError::NotAuthenticated));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

// ── Booking flow ─────────────────────────────────────────────────────────

#[tokio::test]
async fn clock_in_from_not_started_books_once_and_reconciles() {
    let server = MockServer::start().await;
    let token = token_valid_for(3600);
    mount_signin(&server, &token).await;

    mount_get(&server, "/api/timetrack/summary/today", summary_json("Not Started", None), Some(1)).await;
    mount_get(&server, "/api/timetrack/time-records/today", json!([]), Some(1)).await;

    Mock::given(method("POST"))
        .and(path("/api/timetrack/time-records/time-bookings/clock-in"))
        .and(header("Authorization", format!("Bearer {token}").as_str()))
        .and(body_partial_json(json!({ "locationType": "OFFICE", "terminal": "cli" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(entry_json(101, "08:00:00", "CLOCK_IN", "OFFICE")),
        )
        .expect(1)
        .mount(&server)
        .await;

    mount_get(&server, "/api/timetrack/summary/today", summary_json("Working", Some("08:00")), None).await;
    mount_get(
        &server,
        "/api/timetrack/time-records/today",
        json!([entry_json(101, "08:00:00", "CLOCK_IN", "OFFICE")]),
        None,
    )
    .await;

    let mut ctx = context(&server);
    ctx.login(&credentials()).await.expect("login");

    let outcome = ctx
        .book(Intent::ClockIn, Some(LocationType::Office), None)
        .await
        .expect("clock in");

    assert!(outcome.refetch_error.is_none());
    assert_eq!(outcome.entry.id, EntryId::Server(101));

    let work = ctx.work();
    assert_eq!(work.status(), WorkStatus::Working);
    assert!(work.summary().is_working);
    assert!(!work.summary().is_on_break);
    assert_eq!(work.summary().arrival_time.as_deref(), Some("08:00"));
    assert_eq!(work.protocol().len(), 1);
    assert_eq!(work.protocol()[0].record_type, RecordType::ClockIn);
    assert_eq!(work.pending_local(), 0);

    let log = load_log(ctx.storage().conn()).unwrap();
    assert!(log.iter().any(|r| r.operation == "book" && r.target == "CLOCK_IN"));
}

#[tokio::test]
async fn failed_booking_is_rolled_back() {
    let server = MockServer::start().await;
    let mut ctx = logged_in(&server).await;

    mount_get(&server, "/api/timetrack/summary/today", summary_json("Not Started", None), None).await;
    mount_get(&server, "/api/timetrack/time-records/today", json!([]), None).await;
    Mock::given(method("POST"))
        .and(path("/api/timetrack/time-records/time-bookings/clock-in"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "message": "Already clocked in" })))
        .expect(1)
        .mount(&server)
        .await;

    let err = ctx
        .book(Intent::ClockIn, Some(LocationType::Home), Some("early".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Api { status: 409, .. }));
    let work = ctx.work();
    assert_eq!(work.status(), WorkStatus::NotStarted);
    assert!(work.summary().arrival_time.is_none());
    assert!(work.protocol().is_empty());

    let log = load_log(ctx.storage().conn()).unwrap();
    assert!(log.iter().any(|r| r.operation == "book_failed"));
}

#[tokio::test]
async fn invalid_transition_never_reaches_the_server() {
    let server = MockServer::start().await;
    let mut ctx = logged_in(&server).await;

    mount_get(&server, "/api/timetrack/summary/today", summary_json("Not Started", None), None).await;
    mount_get(&server, "/api/timetrack/time-records/today", json!([]), None).await;
    Mock::given(method("POST"))
        .and(path("/api/timetrack/time-records/time-bookings/break-start"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = ctx.book(Intent::StartBreak, None, None).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidTransition {
            from: WorkStatus::NotStarted,
            intent: Intent::StartBreak
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Business);
}

// ── Queries and other mutations ──────────────────────────────────────────

#[tokio::test]
async fn my_records_sends_range_and_is_cached() {
    let server = MockServer::start().await;
    let mut ctx = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/timetrack/time-records/my-records"))
        .and(query_param("startDate", "2025-03-01"))
        .and(query_param("endDate", "2025-03-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 2, "date": "2025-03-03", "time": "17:00:00",
              "recordType": "CLOCK_OUT", "locationType": "OFFICE" },
            { "id": 1, "date": "2025-03-03", "time": "08:30:00",
              "recordType": "CLOCK_IN", "locationType": "OFFICE" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let start = chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let end = chrono::NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();

    let entries = ctx.my_records(start, end).await.expect("records");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, EntryId::Server(1));

    let again = ctx.my_records(start, end).await.expect("cached");
    assert_eq!(again, entries);
}

#[tokio::test]
async fn delete_removes_entry_and_refetches() {
    let server = MockServer::start().await;
    let mut ctx = logged_in(&server).await;

    mount_get(&server, "/api/timetrack/summary/today", summary_json("Working", Some("08:00")), None).await;
    mount_get(
        &server,
        "/api/timetrack/time-records/today",
        json!([entry_json(5, "08:00:00", "CLOCK_IN", "OFFICE")]),
        Some(1),
    )
    .await;
    mount_get(&server, "/api/timetrack/time-records/today", json!([]), None).await;
    Mock::given(method("DELETE"))
        .and(path("/api/timetrack/time-records/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    ctx.refresh_today().await.expect("refresh");
    assert_eq!(ctx.work().protocol().len(), 1);

    ctx.delete_record(5).await.expect("delete");
    assert!(ctx.work().protocol().is_empty());
}

#[tokio::test]
async fn update_notes_patches_record() {
    let server = MockServer::start().await;
    let mut ctx = logged_in(&server).await;

    let mut updated = entry_json(5, "08:00:00", "CLOCK_IN", "OFFICE");
    updated["notes"] = json!("train late");

    mount_get(&server, "/api/timetrack/summary/today", summary_json("Working", Some("08:00")), None).await;
    mount_get(
        &server,
        "/api/timetrack/time-records/today",
        json!([entry_json(5, "08:00:00", "CLOCK_IN", "OFFICE")]),
        Some(1),
    )
    .await;
    mount_get(&server, "/api/timetrack/time-records/today", json!([updated.clone()]), None).await;
    Mock::given(method("PATCH"))
        .and(path("/api/timetrack/time-records/5/notes"))
        .and(body_json(json!({ "notes": "train late" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&server)
        .await;

    ctx.refresh_today().await.expect("refresh");
    let entry = ctx.update_notes(5, "train late").await.expect("notes");
    assert_eq!(entry.notes.as_deref(), Some("train late"));
    assert_eq!(ctx.work().protocol().len(), 1);
    assert_eq!(ctx.work().protocol()[0].notes.as_deref(), Some("train late"));
}

#[tokio::test]
async fn notes_update_leaves_a_previous_day_snapshot_alone() {
    let server = MockServer::start().await;
    mount_signin(&server, &token_valid_for(3600)).await;

    let yesterday = (chrono::Local::now().date_naive() - chrono::Duration::days(1))
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let mut snapshot = WorkStatusStore::new();
    snapshot
        .apply(Intent::ClockIn, LocationType::Office, "cli", None, yesterday)
        .expect("seed snapshot");
    let kv = KvStore::in_memory().expect("kv");
    kv.set(WORK_STATUS_KEY, &snapshot).expect("store snapshot");

    let mut ctx = context_with(&server, kv);
    ctx.login(&credentials()).await.expect("login");

    Mock::given(method("PATCH"))
        .and(path("/api/timetrack/time-records/5/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entry_json(5, "08:00:00", "CLOCK_IN", "OFFICE")))
        .expect(1)
        .mount(&server)
        .await;

    ctx.update_notes(5, "late").await.expect("notes");

    assert_eq!(ctx.work(), &snapshot);
    let stored = ctx.storage().get::<WorkStatusStore>(WORK_STATUS_KEY).unwrap();
    assert_eq!(stored.as_ref(), Some(&snapshot));
}

#[tokio::test]
async fn signup_posts_registration_without_logging_in() {
    let server = MockServer::start().await;
    let mut ctx = context(&server);

    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(body_json(json!({
            "email": "new@b.com",
            "password": "secret1",
            "firstName": "New",
            "lastName": "Hire"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "User registered successfully!" })))
        .expect(1)
        .mount(&server)
        .await;

    let message = ctx
        .signup(&SignupRequest {
            email: "new@b.com".into(),
            password: "secret1".into(),
            first_name: "New".into(),
            last_name: "Hire".into(),
        })
        .await
        .expect("signup");

    assert_eq!(message, "User registered successfully!");
    assert!(!ctx.is_authenticated());
    assert!(ctx.storage().get::<Session>(SESSION_KEY).unwrap().is_none());
    let log = load_log(ctx.storage().conn()).unwrap();
    assert!(log.iter().any(|r| r.operation == "signup" && r.target == "new@b.com"));
}

#[tokio::test]
async fn signup_with_taken_email_reports_server_message() {
    let server = MockServer::start().await;
    let mut ctx = context(&server);

    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "Email is already in use!" })))
        .mount(&server)
        .await;

    let err = ctx
        .signup(&SignupRequest {
            email: EMAIL.into(),
            password: PASSWORD.into(),
            first_name: "A".into(),
            last_name: "B".into(),
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Email is already in use!"));
    assert_eq!(ctx.navigator().current(), View::Signup);
}

#[tokio::test]
async fn current_status_is_fetched_once_and_cached() {
    let server = MockServer::start().await;
    let mut ctx = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/timetrack/status/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Break",
            "isWorking": false,
            "isOnBreak": true,
            "lastRecordType": "BREAK_START",
            "lastRecordTime": "12:01"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let status = ctx.current_status().await.expect("status");
    assert_eq!(status.status, WorkStatus::Break);
    assert!(status.is_on_break);
    assert_eq!(status.last_record_type, Some(RecordType::BreakStart));

    let again = ctx.current_status().await.expect("cached");
    assert_eq!(again, status);
}
