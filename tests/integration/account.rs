//! Session lifecycle, system settings and the teacher's own profile

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};

use journal_portal::{
    models::{
        session::{Session, TeacherProfile},
        settings::{BorrowSettings, ProfileForm, SettingsUpdate},
    },
    session::SessionStore,
    FailureKind, Portal,
};

use super::{config_for, counting, ok, serve};

/// Portal restored from a saved teacher session
async fn teacher_portal(base_url: &str, name: &str) -> Portal {
    let config = config_for(base_url, name);
    let session = Session {
        token: Some("tok-12".into()),
        teacher_info: Some(TeacherProfile {
            id: 12,
            name: "Wang Fang".into(),
            department: Some("Physics".into()),
            ..Default::default()
        }),
        ..Default::default()
    };
    SessionStore::new(config.session.path.clone())
        .save(&session)
        .await
        .unwrap();
    Portal::connect(config).await.unwrap()
}

#[tokio::test]
async fn test_logout_clears_session_when_backend_fails() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let calls = attempts.clone();
    let router = Router::new().route(
        "/api/auth/logout",
        post(move || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }),
    );
    let portal = teacher_portal(&serve(router).await, "logout-failure").await;
    let session_path = portal.config.session.path.clone();
    assert!(session_path.exists());

    assert_ok!(portal.services.auth.logout().await);

    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert!(!session_path.exists());
    let err = assert_err!(portal.services.auth.require_teacher().await);
    assert_eq!(err.kind(), FailureKind::Session);
}

#[tokio::test]
async fn test_settings_section_is_saved_then_refetched() {
    let stored = Arc::new(Mutex::new(json!({"systemName": "Library", "borrowDuration": 30})));
    let puts = Arc::new(Mutex::new(Vec::<Value>::new()));
    let gets = Arc::new(AtomicUsize::new(0));

    let (read, write, seen, fetches) = (stored.clone(), stored.clone(), puts.clone(), gets.clone());
    let router = Router::new().route(
        "/api/settings",
        get(move || {
            let read = read.clone();
            let fetches = fetches.clone();
            async move {
                fetches.fetch_add(1, Ordering::SeqCst);
                let current = read.lock().unwrap().clone();
                ok(current)
            }
        })
        .put(move |Json(body): Json<Value>| {
            let write = write.clone();
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(body.clone());
                if let (Some(current), Some(fields)) =
                    (write.lock().unwrap().as_object_mut(), body.as_object())
                {
                    current.extend(fields.clone());
                }
                ok(Value::Null)
            }
        }),
    );
    let portal = super::portal(&serve(router).await, "settings-save");
    let settings = &portal.services.settings;

    let update = SettingsUpdate::Borrow(BorrowSettings {
        borrow_duration: 60,
        max_borrow_count: 8,
        overdue_fine: 0.25,
    });
    let saved = assert_ok!(settings.update_system_settings(update).await);

    assert_eq!(
        *puts.lock().unwrap(),
        vec![json!({"borrowDuration": 60, "maxBorrowCount": 8, "overdueFine": 0.25})]
    );
    assert_eq!(gets.load(Ordering::SeqCst), 1);
    assert_eq!(saved.system_name, "Library");
    assert_eq!(saved.borrow_duration, 60);
    assert_eq!(saved.max_borrow_count, 8);
    assert_eq!(saved.notice_time, "09:00");
}

#[tokio::test]
async fn test_invalid_settings_are_not_sent() {
    let (router, hits) = counting(Router::new());
    let portal = super::portal(&serve(router).await, "settings-invalid");

    let update = SettingsUpdate::Borrow(BorrowSettings {
        borrow_duration: 30,
        max_borrow_count: 21,
        overdue_fine: 0.5,
    });
    let err = assert_err!(portal.services.settings.update_system_settings(update).await);
    assert_eq!(err.user_message(), "Max borrow count must be between 1 and 20");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_profile_update_refreshes_saved_identity() {
    let bodies = Arc::new(Mutex::new(Vec::<Value>::new()));
    let seen = bodies.clone();
    let router = Router::new()
        .route(
            "/api/teacher/info",
            get(|| async {
                ok(json!({"id": "12", "name": "Wang Fang", "email": "wang@school.edu",
                          "phone": "13800138000", "department": "Physics"}))
            }),
        )
        .route(
            "/api/teacher/update",
            post(move |Json(body): Json<Value>| {
                let seen = seen.clone();
                async move {
                    seen.lock().unwrap().push(body);
                    ok(Value::Null)
                }
            }),
        );
    let portal = teacher_portal(&serve(router).await, "profile").await;
    let settings = &portal.services.settings;

    let info = assert_ok!(settings.teacher_info().await);
    let form = ProfileForm {
        name: " Wang Fang ".into(),
        department: Some("Applied Physics".into()),
        title: Some("Lecturer".into()),
        ..ProfileForm::from_info(&info)
    };
    let updated = assert_ok!(settings.update_profile(form).await);
    assert_eq!(updated.department.as_deref(), Some("Applied Physics"));

    assert_eq!(
        *bodies.lock().unwrap(),
        vec![json!({
            "id": 12,
            "name": "Wang Fang",
            "email": "wang@school.edu",
            "phone": "13800138000",
            "department": "Applied Physics",
            "title": "Lecturer"
        })]
    );
    let saved = assert_ok!(portal.services.auth.require_teacher().await);
    assert_eq!(saved.department.as_deref(), Some("Applied Physics"));
    assert_eq!(saved.email.as_deref(), Some("wang@school.edu"));
}

#[tokio::test]
async fn test_password_change_outcomes() {
    let router = Router::new().route(
        "/api/teacher/change-password",
        post(|Json(body): Json<Value>| async move {
            assert!(body.get("confirmPassword").is_none());
            if body["currentPassword"] == "wrong-one" {
                return ok(json!({"success": false, "message": "Current password is incorrect"}));
            }
            ok(json!({"success": true}))
        }),
    );
    let portal = teacher_portal(&serve(router).await, "password").await;
    let session_path = portal.config.session.path.clone();
    let settings = &portal.services.settings;

    let err = assert_err!(settings.change_password("secret1", "secret22", "secret23").await);
    assert_eq!(err.kind(), FailureKind::Validation);

    let err = assert_err!(settings.change_password("wrong-one", "secret22", "secret22").await);
    assert_eq!(err.kind(), FailureKind::Business);
    assert_eq!(err.user_message(), "Current password is incorrect");
    assert!(session_path.exists());

    assert_ok!(settings.change_password("secret1", "secret22", "secret22").await);
    assert!(!session_path.exists());
}
