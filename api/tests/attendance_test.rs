mod helpers;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;

use api::auth::generate_jwt;
use db::models::{
    class_session::Model as ClassModel,
    class_slot::{SlotSpec, Weekday},
    course::Model as CourseModel,
    unit::Model as UnitModel,
    user::{Model as UserModel, Role},
};

use helpers::make_test_app;

struct TestCtx {
    teacher_token: String,
    student_token: String,
    student_a: UserModel,
    student_b: UserModel,
    class_id: i64,
}

async fn setup(db: &DatabaseConnection) -> TestCtx {
    let course = CourseModel::create(db, "BSc Computer Science", None)
        .await
        .unwrap();
    let unit = UnitModel::create(db, course.id, "ALG214", "Algorithms")
        .await
        .unwrap();
    let teacher = UserModel::create(db, "teach", "teach@test.com", Role::Teacher)
        .await
        .unwrap();
    let student_a = UserModel::create(db, "stud_a", "a@test.com", Role::Student)
        .await
        .unwrap();
    let student_b = UserModel::create(db, "stud_b", "b@test.com", Role::Student)
        .await
        .unwrap();

    let class = ClassModel::create_checked(
        db,
        unit.id,
        teacher.id,
        "Algorithms A",
        2026,
        1,
        &[SlotSpec {
            day: Weekday::Monday,
            time: "08:00 AM - 10:00 AM".to_string(),
        }],
        &[student_a.id, student_b.id],
    )
    .await
    .unwrap();

    let (teacher_token, _) = generate_jwt(teacher.id, Role::Teacher);
    let (student_token, _) = generate_jwt(student_a.id, Role::Student);

    TestCtx {
        teacher_token,
        student_token,
        student_a,
        student_b,
        class_id: class.id,
    }
}

fn mark_request(class_id: i64, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/classes/{class_id}/attendance"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn marking_returns_the_full_listing() {
    let (app, db) = make_test_app().await;
    let ctx = setup(&db).await;

    let response = app
        .oneshot(mark_request(
            ctx.class_id,
            &ctx.teacher_token,
            json!({
                "date": "2026-03-02",
                "topic": "Sorting",
                "entries": [
                    {"student_id": ctx.student_a.id, "status": "present"},
                    {"student_id": ctx.student_b.id, "status": "absent"}
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let records = json["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["topic"], "Sorting");
    assert_eq!(records[0]["entries"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn remarking_a_date_replaces_its_entries() {
    let (app, db) = make_test_app().await;
    let ctx = setup(&db).await;

    let response = app
        .clone()
        .oneshot(mark_request(
            ctx.class_id,
            &ctx.teacher_token,
            json!({
                "date": "2026-03-02",
                "topic": "Sorting",
                "entries": [{"student_id": ctx.student_a.id, "status": "present"}]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(mark_request(
            ctx.class_id,
            &ctx.teacher_token,
            json!({
                "date": "2026-03-02",
                "topic": "Searching",
                "entries": [{"student_id": ctx.student_b.id, "status": "absent"}]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let records = json["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    // topic of the existing record is kept
    assert_eq!(records[0]["topic"], "Sorting");
    let entries = records[0]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["student_id"], ctx.student_b.id);
    assert_eq!(entries[0]["status"], "absent");
}

#[tokio::test]
async fn unknown_class_is_not_found() {
    let (app, db) = make_test_app().await;
    let ctx = setup(&db).await;

    let response = app
        .oneshot(mark_request(
            999,
            &ctx.teacher_token,
            json!({
                "date": "2026-03-02",
                "topic": "Sorting",
                "entries": [{"student_id": ctx.student_a.id, "status": "present"}]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn students_cannot_mark_attendance() {
    let (app, db) = make_test_app().await;
    let ctx = setup(&db).await;

    let response = app
        .oneshot(mark_request(
            ctx.class_id,
            &ctx.student_token,
            json!({
                "date": "2026-03-02",
                "topic": "Sorting",
                "entries": [{"student_id": ctx.student_a.id, "status": "present"}]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
