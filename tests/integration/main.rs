//! End-to-end tests against an in-process stub of the Journal Borrowing API

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{
    extract::Query,
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};

mod account;
mod admin_screens;

use journal_portal::{
    models::borrow::CreateBorrowRequest, repository::stats::ReportKind, session::SessionStore,
    AppConfig, AppError, FailureKind, Portal,
};

fn ok(data: Value) -> Json<Value> {
    Json(json!({"code": 200, "data": data, "message": "success"}))
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("journal-portal-it-{}-{}", name, std::process::id()))
}

fn config_for(base_url: &str, name: &str) -> AppConfig {
    let dir = scratch_dir(name);
    let mut config = AppConfig::for_base_url(base_url);
    config.session.path = dir.join("session.json");
    config.export.dir = dir;
    config
}

fn portal_with(base_url: &str, name: &str, tweak: impl FnOnce(&mut AppConfig)) -> Portal {
    let mut config = config_for(base_url, name);
    tweak(&mut config);
    Portal::new(config).unwrap()
}

fn portal(base_url: &str, name: &str) -> Portal {
    portal_with(base_url, name, |_| {})
}

/// Router whose every route counts the request and answers 404
fn counting(router: Router) -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = router.fallback(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            axum::http::StatusCode::NOT_FOUND
        }
    });
    (router, hits)
}

fn overdue_record(id: i64) -> Value {
    json!({
        "id": id,
        "teacherName": format!("Teacher {}", id),
        "journalName": "Acta Physica",
        "startDate": "2024-01-01",
        "endDate": "2024-02-01",
        "status": "overdue"
    })
}

#[tokio::test]
async fn test_create_borrow_posts_body_and_refetches_once() {
    let bodies = Arc::new(Mutex::new(Vec::<Value>::new()));
    let list_calls = Arc::new(AtomicUsize::new(0));

    let seen = bodies.clone();
    let calls = list_calls.clone();
    let router = Router::new()
        .route(
            "/api/borrow/teacher/create",
            post(move |Json(body): Json<Value>| {
                let seen = seen.clone();
                async move {
                    seen.lock().unwrap().push(body);
                    ok(Value::Null)
                }
            }),
        )
        .route(
            "/api/borrow/teacher/list",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(params.get("teacherId").map(String::as_str), Some("7"));
                    ok(json!([
                        {"id": 1, "teacherId": 7, "journalId": 3, "journalName": "Nature",
                         "startDate": "2024-03-01", "endDate": "2024-03-31", "status": "borrowed"},
                        {"id": 2, "teacherId": 7, "journalId": 4, "journalName": "Science",
                         "startDate": "2024-01-01", "endDate": "2024-01-31", "status": "returned"}
                    ]))
                }
            }),
        );
    let portal = portal(&serve(router).await, "create");

    let request = CreateBorrowRequest::new(7, 3, 30).unwrap();
    portal.services.borrows.create(request).await.unwrap();

    assert_eq!(
        *bodies.lock().unwrap(),
        vec![json!({"teacherId": 7, "journalId": 3, "borrowDays": 30})]
    );
    assert_eq!(list_calls.load(Ordering::SeqCst), 1);

    let current = portal.services.borrows.current_records().await;
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].id, 1);
}

#[tokio::test]
async fn test_business_code_surfaces_backend_message() {
    let router = Router::new().route(
        "/api/journal/journals",
        get(|| async { Json(json!({"code": 500, "data": null, "message": "Journal index is rebuilding"})) }),
    );
    let portal = portal(&serve(router).await, "business");

    let err = portal
        .services
        .catalog
        .search(Default::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Business);
    assert_eq!(err.user_message(), "Journal index is rebuilding");

    let table = portal.services.catalog.render().await.to_string();
    assert!(table.contains("Journal index is rebuilding"));
}

#[tokio::test]
async fn test_unknown_endpoint_uses_canned_404_text() {
    let portal = portal(&serve(Router::new()).await, "not-found");

    let err = portal.services.teachers.get_teacher(1).await.unwrap_err();
    assert!(matches!(err, AppError::Http { status: 404, .. }));
    assert_eq!(err.user_message(), "The requested endpoint does not exist");
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let router = Router::new().route(
        "/api/admin/statistics/summary",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            ok(json!({"totalJournals": 1}))
        }),
    );
    let base_url = serve(router).await;
    let portal = portal_with(&base_url, "timeout", |c| c.api.timeout_ms = 200);

    let err = portal.services.stats.admin_summary().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Timeout);
}

#[tokio::test]
async fn test_concurrent_batch_notice_sends_one_request() {
    let notice_calls = Arc::new(AtomicUsize::new(0));
    let received = Arc::new(Mutex::new(Vec::<Value>::new()));

    let calls = notice_calls.clone();
    let seen = received.clone();
    let router = Router::new()
        .route(
            "/api/borrow/admin/overdue/list",
            get(|| async { ok(json!({"list": [overdue_record(5), overdue_record(6)], "total": 2})) }),
        )
        .route(
            "/api/borrow/admin/overdue/batch-notice",
            post(move |Json(body): Json<Value>| {
                let calls = calls.clone();
                let seen = seen.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    seen.lock().unwrap().push(body);
                    tokio::time::sleep(Duration::from_millis(300)).await;
                    ok(json!({
                        "success": 1,
                        "failed": 1,
                        "failList": [{"borrowId": 6, "reason": "no phone number"}]
                    }))
                }
            }),
        );
    let portal = portal(&serve(router).await, "batch");
    let overdue = &portal.services.overdue;

    overdue.load_page(1).await.unwrap();
    overdue.select_all().await;

    let (first, second) = tokio::join!(overdue.send_batch(), overdue.send_batch());
    let report = first.unwrap();
    assert!(matches!(second, Err(AppError::Busy)));

    assert_eq!(notice_calls.load(Ordering::SeqCst), 1);
    assert_eq!(*received.lock().unwrap(), vec![json!({"borrowIds": [5, 6]})]);
    assert_eq!(
        report.summary(),
        "Batch notice finished.\nSent: 1\nFailed: 1\n6: no phone number"
    );
    assert!(overdue.selected_ids().await.is_empty());
    assert!(!overdue.is_sending());
}

#[tokio::test]
async fn test_stale_overdue_page_is_discarded() {
    let router = Router::new().route(
        "/api/borrow/admin/overdue/list",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            let page: i64 = params.get("pageNum").and_then(|p| p.parse().ok()).unwrap_or(1);
            if page == 1 {
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
            ok(json!({"list": [overdue_record(page * 100)], "total": 30}))
        }),
    );
    let portal = portal(&serve(router).await, "stale");
    let overdue = &portal.services.overdue;

    let (slow, fast) = tokio::join!(overdue.load_page(1), overdue.load_page(2));
    slow.unwrap();
    fast.unwrap();

    let records = overdue.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 200);
}

#[tokio::test]
async fn test_teacher_login_persists_session_and_cookie() {
    let seen_headers = Arc::new(Mutex::new(Vec::<HeaderMap>::new()));

    let seen = seen_headers.clone();
    let router = Router::new()
        .route(
            "/api/auth/teacher/login",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body, json!({"id": "T2024001", "name": "Wang Fang", "phone": "13800138000"}));
                (
                    [(header::SET_COOKIE, "JSESSIONID=abc123; Path=/; HttpOnly")],
                    ok(json!({"id": 12, "name": "Wang Fang", "department": "Physics", "token": "tok-1"})),
                )
            }),
        )
        .route(
            "/api/teacher/borrow/statistics",
            get(move |headers: HeaderMap| {
                let seen = seen.clone();
                async move {
                    seen.lock().unwrap().push(headers);
                    ok(json!({"currentBorrowCount": "2", "maxBorrowCount": "5"}))
                }
            }),
        );
    let base_url = serve(router).await;
    let portal = portal(&base_url, "login");
    let session_path = portal.config.session.path.clone();
    let _ = tokio::fs::remove_file(&session_path).await;

    let profile = portal
        .services
        .auth
        .login_teacher(" T2024001 ", "Wang Fang", "13800138000")
        .await
        .unwrap();
    assert_eq!(profile.id, 12);

    let saved = SessionStore::new(session_path.clone()).load().await.unwrap();
    assert_eq!(saved.token.as_deref(), Some("tok-1"));
    assert_eq!(saved.cookie.as_deref(), Some("JSESSIONID=abc123"));
    assert_eq!(saved.teacher_id(), Some(12));

    let stats = portal.services.stats.teacher_stats(12).await.unwrap();
    assert_eq!(stats.remaining_quota(), 3);
    {
        let headers = seen_headers.lock().unwrap();
        assert_eq!(headers[0].get(header::AUTHORIZATION).unwrap(), "Bearer tok-1");
        assert_eq!(headers[0].get(header::COOKIE).unwrap(), "JSESSIONID=abc123");
    }

    // A fresh process picks the identity back up from disk
    let mut config = AppConfig::for_base_url(&base_url);
    config.session.path = session_path.clone();
    let restored = Portal::connect(config).await.unwrap();
    assert_eq!(restored.services.auth.require_teacher().await.unwrap().name, "Wang Fang");
    assert!(restored.services.auth.require_admin().await.is_err());

    restored.services.auth.logout().await.unwrap();
    assert!(!session_path.exists());
}

#[tokio::test]
async fn test_report_download_writes_file() {
    let payload: Vec<u8> = vec![0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
    let body = payload.clone();
    let router = Router::new()
        .route(
            "/api/report/export/overdue",
            get(move || {
                let body = body.clone();
                async move {
                    (
                        [(
                            header::CONTENT_TYPE,
                            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                        )],
                        body,
                    )
                }
            }),
        )
        .route(
            "/api/report/export/borrow",
            get(|| async { Json(json!({"code": 500, "message": "No borrow records to export"})) }),
        );
    let portal = portal(&serve(router).await, "report");
    let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

    let path = portal
        .services
        .reports
        .download_report(ReportKind::Overdue, today, None)
        .await
        .unwrap();
    assert!(path.ends_with("overdue-report-20240310.xlsx"));
    assert_eq!(tokio::fs::read(&path).await.unwrap(), payload);

    let err = portal
        .services
        .reports
        .download_report(ReportKind::Borrow, today, None)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "No borrow records to export");
}
