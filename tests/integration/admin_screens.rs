//! Journal, teacher and statistics screens against the stub backend

use std::{
    collections::HashMap,
    sync::{atomic::Ordering, Arc, Mutex},
    time::Duration,
};

use axum::{extract::Query, routing::get, Router};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use journal_portal::{
    models::{
        enums::{JournalStatus, TeacherStatus},
        journal::{JournalForm, JournalQuery},
        teacher::TeacherForm,
    },
    AppError, FailureKind,
};

use super::{counting, ok, portal, serve};

fn journal_form() -> JournalForm {
    JournalForm {
        id: None,
        name: "Acta Physica".into(),
        issn: "0567-7718".into(),
        category: "Physics".into(),
        publisher: "Science Press".into(),
        publish_date: "2024-01-01".into(),
        issue_number: None,
        total_quantity: 3,
        available_quantity: 5,
        status: JournalStatus::Available,
        description: None,
    }
}

fn teacher_form() -> TeacherForm {
    TeacherForm {
        id: None,
        name: "Zhang Wei".into(),
        department: "Mathematics".into(),
        email: "zhang@school.edu".into(),
        phone: "13800138000".into(),
        max_borrow: 21,
        status: TeacherStatus::Active,
    }
}

#[tokio::test]
async fn test_invalid_forms_never_reach_the_backend() {
    let (router, hits) = counting(Router::new());
    let portal = portal(&serve(router).await, "invalid-forms");

    let err = assert_err!(portal.services.catalog.create_journal(journal_form()).await);
    assert_eq!(err.kind(), FailureKind::Validation);
    assert!(err
        .user_message()
        .contains("Available quantity cannot exceed total quantity"));

    let err = assert_err!(portal.services.teachers.create_teacher(teacher_form()).await);
    assert_eq!(err.user_message(), "Max borrow must be between 1 and 20");

    let err = assert_err!(portal.services.teachers.search_by_phone("12345").await);
    assert_eq!(err.kind(), FailureKind::Validation);

    assert_err!(portal.services.catalog.delete_journal(0).await);
    assert_err!(portal.services.stats.teacher_stats(0).await);

    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_stale_journal_search_is_dropped() {
    let router = Router::new().route(
        "/api/journal/journals",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            if params.get("keyword").map(String::as_str) == Some("physics") {
                tokio::time::sleep(Duration::from_millis(300)).await;
                return ok(json!({"list": [{"id": 1, "name": "Acta Physica"}], "total": 1}));
            }
            ok(json!({"list": [{"id": 2, "name": "Chemical Reviews"}], "total": 1}))
        }),
    );
    let portal = portal(&serve(router).await, "stale-search");
    let catalog = &portal.services.catalog;

    let slow = JournalQuery {
        keyword: Some(" physics ".into()),
        ..Default::default()
    };
    let fast = JournalQuery {
        keyword: Some("chemistry".into()),
        ..Default::default()
    };
    let (slow, fast) = tokio::join!(catalog.search(slow), catalog.search(fast));

    let ids = |journals: Vec<journal_portal::models::Journal>| {
        journals.into_iter().map(|j| j.id).collect::<Vec<_>>()
    };
    assert_eq!(ids(assert_ok!(fast)), vec![2]);
    assert_eq!(ids(assert_ok!(slow)), vec![2]);

    let table = catalog.render().await;
    let rows: Vec<i64> = table.data_rows().filter_map(|r| r.record_id).collect();
    assert_eq!(rows, vec![2]);
}

#[tokio::test]
async fn test_teacher_export_walks_every_page() {
    let sizes = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen = sizes.clone();
    let router = Router::new().route(
        "/api/teacher/admin/list",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let seen = seen.clone();
            async move {
                seen.lock()
                    .unwrap()
                    .push(params.get("pageSize").cloned().unwrap_or_default());
                let list = match params.get("pageNum").map(String::as_str) {
                    Some("1") => json!([
                        {"id": 1, "name": "Li Lei", "department": "Physics"},
                        {"id": 2, "name": "Han Meimei", "department": "Chemistry"}
                    ]),
                    _ => json!([{"id": 3, "name": "Wang Fang", "department": "Physics"}]),
                };
                ok(json!({"list": list, "total": 101}))
            }
        }),
    );
    let portal = portal(&serve(router).await, "teacher-export");

    let teachers = assert_ok!(portal.services.teachers.list_all().await);
    let ids: Vec<i64> = teachers.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(*sizes.lock().unwrap(), vec!["100", "100"]);
}

#[tokio::test]
async fn test_department_counts_sorted_largest_first() {
    let router = Router::new().route(
        "/api/admin/statistics/department-teachers",
        get(|| async {
            ok(json!([
                {"name": "Mathematics", "count": "2"},
                {"department": "Physics", "value": 5},
                {"name": "Art", "count": 2}
            ]))
        }),
    );
    let portal = portal(&serve(router).await, "departments");

    let rows = assert_ok!(portal.services.stats.department_teachers().await);
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Physics", "Art", "Mathematics"]);
    assert_eq!(rows[0].count, 5);
}

#[tokio::test]
async fn test_missing_teacher_reports_http_error() {
    let (router, hits) = counting(Router::new());
    let portal = portal(&serve(router).await, "missing-teacher");

    let err = assert_err!(portal.services.teachers.delete_teacher(42).await);
    assert!(matches!(err, AppError::Http { status: 404, .. }));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
