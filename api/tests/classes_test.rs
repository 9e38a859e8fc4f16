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
    course::Model as CourseModel,
    unit::Model as UnitModel,
    user::{Model as UserModel, Role},
};

use helpers::make_test_app;

struct TestCtx {
    teacher: UserModel,
    teacher_token: String,
    student: UserModel,
    student_token: String,
    unit_id: i64,
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
    let student = UserModel::create(db, "stud", "stud@test.com", Role::Student)
        .await
        .unwrap();
    let (teacher_token, _) = generate_jwt(teacher.id, Role::Teacher);
    let (student_token, _) = generate_jwt(student.id, Role::Student);

    TestCtx {
        teacher,
        teacher_token,
        student,
        student_token,
        unit_id: unit.id,
    }
}

fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn class_payload(ctx: &TestCtx, name: &str, day: &str, time: &str) -> Value {
    json!({
        "unit_id": ctx.unit_id,
        "teacher_id": ctx.teacher.id,
        "name": name,
        "year": 2026,
        "semester": 1,
        "slots": [{"day": day, "time": time}],
        "student_ids": [ctx.student.id]
    })
}

#[tokio::test]
async fn teacher_creates_class_with_slots_and_roster() {
    let (app, db) = make_test_app().await;
    let ctx = setup(&db).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/classes",
            &ctx.teacher_token,
            class_payload(&ctx, "Algorithms A", "monday", "08:00 AM - 10:00 AM"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["name"], "Algorithms A");
    assert_eq!(json["data"]["slots"][0]["day"], "monday");
    assert_eq!(json["data"]["students"][0], ctx.student.id);
}

#[tokio::test]
async fn slot_collision_is_a_bad_request() {
    let (app, db) = make_test_app().await;
    let ctx = setup(&db).await;
    let other_teacher = UserModel::create(&db, "teach2", "teach2@test.com", Role::Teacher)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/classes",
            &ctx.teacher_token,
            class_payload(&ctx, "Algorithms A", "monday", "08:00 AM - 10:00 AM"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut payload = class_payload(&ctx, "Algorithms B", "monday", "08:00 AM - 10:00 AM");
    payload["teacher_id"] = json!(other_teacher.id);
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/classes",
            &ctx.teacher_token,
            payload,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("already has a schedule")
    );
}

#[tokio::test]
async fn student_cannot_create_a_class() {
    let (app, db) = make_test_app().await;
    let ctx = setup(&db).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/classes",
            &ctx.student_token,
            class_payload(&ctx, "Algorithms A", "monday", "08:00 AM - 10:00 AM"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn students_can_list_and_filter_classes() {
    let (app, db) = make_test_app().await;
    let ctx = setup(&db).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/classes",
            &ctx.teacher_token,
            class_payload(&ctx, "Algorithms A", "monday", "08:00 AM - 10:00 AM"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/classes?year=2026&semester=1&search=Algo")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", ctx.student_token),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/classes?semester=2")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", ctx.student_token),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn update_preserves_roster_and_delete_removes_class() {
    let (app, db) = make_test_app().await;
    let ctx = setup(&db).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/classes",
            &ctx.teacher_token,
            class_payload(&ctx, "Algorithms A", "monday", "08:00 AM - 10:00 AM"),
        ))
        .await
        .unwrap();
    let created = body_json(response).await;
    let class_id = created["data"]["id"].as_i64().unwrap();

    let newcomer = UserModel::create(&db, "stud2", "stud2@test.com", Role::Student)
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/classes/{class_id}"),
            &ctx.teacher_token,
            json!({"name": "Algorithms A (moved)", "student_ids": [newcomer.id]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Algorithms A (moved)");
    assert_eq!(json["data"]["students"].as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/classes/{class_id}"))
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", ctx.teacher_token),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/classes/{class_id}"))
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", ctx.teacher_token),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
