mod helpers;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use api::auth::generate_jwt;
use db::models::user::{Model as UserModel, Role};

use helpers::make_test_app;

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

#[tokio::test]
async fn admin_can_register_users_in_bulk() {
    let (app, db) = make_test_app().await;
    let admin = UserModel::create(&db, "admin", "admin@test.com", Role::Admin)
        .await
        .unwrap();
    let (token, _) = generate_jwt(admin.id, Role::Admin);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/bulk",
            &token,
            json!({
                "users": [
                    {"username": "alice", "email": "alice@test.com", "role": "student"},
                    {"username": "bob", "email": "bob@test.com", "role": "teacher"}
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"][0]["user_code"], "ST001");
    assert_eq!(json["data"][1]["user_code"], "TC001");
}

#[tokio::test]
async fn teacher_cannot_register_users() {
    let (app, db) = make_test_app().await;
    let teacher = UserModel::create(&db, "teach", "teach@test.com", Role::Teacher)
        .await
        .unwrap();
    let (token, _) = generate_jwt(teacher.id, Role::Teacher);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/bulk",
            &token,
            json!({"users": [{"username": "x", "email": "x@test.com", "role": "student"}]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn registration_requires_authentication() {
    let (app, _db) = make_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/bulk")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"users\": []}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_fails_the_whole_batch() {
    let (app, db) = make_test_app().await;
    let admin = UserModel::create(&db, "admin", "admin@test.com", Role::Admin)
        .await
        .unwrap();
    UserModel::create(&db, "alice", "alice@test.com", Role::Student)
        .await
        .unwrap();
    let (token, _) = generate_jwt(admin.id, Role::Admin);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/bulk",
            &token,
            json!({
                "users": [
                    {"username": "bob", "email": "bob@test.com", "role": "student"},
                    {"username": "alice2", "email": "alice@test.com", "role": "student"}
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // no partial insert
    assert!(
        db::models::user::Model::get_by_role(&db, Role::Student)
            .await
            .unwrap()
            .iter()
            .all(|u| u.username != "bob")
    );
}

#[tokio::test]
async fn teacher_lists_users_filtered_by_role() {
    let (app, db) = make_test_app().await;
    let teacher = UserModel::create(&db, "teach", "teach@test.com", Role::Teacher)
        .await
        .unwrap();
    UserModel::create(&db, "alice", "alice@test.com", Role::Student)
        .await
        .unwrap();
    UserModel::create(&db, "bob", "bob@test.com", Role::Student)
        .await
        .unwrap();
    let (token, _) = generate_jwt(teacher.id, Role::Teacher);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/users?role=student")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let users = json["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u["role"] == "student"));

    // unfiltered listing includes the teacher too
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/users")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    // the directory is staff-level
    let alice = db::models::user::Model::get_by_role(&db, Role::Student)
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap();
    let (student_token, _) = generate_jwt(alice.id, Role::Student);
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/users")
                .header(header::AUTHORIZATION, format!("Bearer {student_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn fetch_user_by_id() {
    let (app, db) = make_test_app().await;
    let student = UserModel::create(&db, "alice", "alice@test.com", Role::Student)
        .await
        .unwrap();
    let (token, _) = generate_jwt(student.id, Role::Student);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/users/{}", student.id))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "alice");

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/users/999")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
