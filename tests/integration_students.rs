mod common;

use axum::http::StatusCode;
use common::{
    authed_json_request, authed_request, bearer_token, generate_valid_cpf, get_request,
    insert_student, json_request, response_json, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student(pool: PgPool) {
    let app = setup_test_app(pool);
    let auth = bearer_token("staff-1");
    let cpf = generate_valid_cpf();

    let request = authed_json_request(
        "POST",
        "/api/students",
        &auth,
        json!({
            "name": "Maria",
            "email": "maria@test.com",
            "cpf": cpf,
            "birth_date": "2001-03-14",
            "phone": "11912345678"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["name"], "Maria");
    assert_eq!(body["cpf"], cpf);
    assert_eq!(body["birth_date"], "2001-03-14");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_requires_auth(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let request = json_request(
        "POST",
        "/api/students",
        json!({
            "name": "Maria",
            "email": "maria@test.com",
            "cpf": generate_valid_cpf(),
            "birth_date": "2001-03-14",
            "phone": "11912345678"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::count_rows(&pool, "students").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_reports_every_failing_field(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let auth = bearer_token("staff-1");

    let request = authed_json_request(
        "POST",
        "/api/students",
        &auth,
        json!({
            "name": "Maria Silva2",
            "email": "not-an-email",
            "cpf": "11111111111",
            "birth_date": "2001-03-14",
            "phone": "1191234567"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    let fields = body["fields"].as_object().unwrap();
    assert!(fields.contains_key("name"));
    assert!(fields.contains_key("email"));
    assert!(fields.contains_key("cpf"));
    assert!(fields.contains_key("phone"));
    assert_eq!(common::count_rows(&pool, "students").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_duplicate_cpf_rejected(pool: PgPool) {
    let cpf = generate_valid_cpf();
    insert_student(&pool, "Maria", &cpf).await;

    let app = setup_test_app(pool.clone());
    let auth = bearer_token("staff-1");

    let request = authed_json_request(
        "POST",
        "/api/students",
        &auth,
        json!({
            "name": "Joana",
            "email": "joana@test.com",
            "cpf": cpf,
            "birth_date": "2002-06-01",
            "phone": "21987654321"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert!(body["fields"].as_object().unwrap().contains_key("cpf"));
    assert_eq!(common::count_rows(&pool, "students").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_student_v2_shape_omits_sensitive_fields(pool: PgPool) {
    let id = insert_student(&pool, "Maria", &generate_valid_cpf()).await;

    let app = setup_test_app(pool);
    let auth = bearer_token("staff-1");

    let request = authed_request("GET", &format!("/api/students/{id}?version=v2"), &auth);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let object = body.as_object().unwrap();
    assert_eq!(object["name"], "Maria");
    assert!(!object.contains_key("cpf"));
    assert!(!object.contains_key("birth_date"));

    // unknown version tokens fall back to the full shape
    let request = authed_request("GET", &format!("/api/students/{id}?version=v9"), &auth);
    let response = app.oneshot(request).await.unwrap();
    let body = response_json(response).await;
    assert!(body.as_object().unwrap().contains_key("cpf"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_students_search_matches_name_and_cpf(pool: PgPool) {
    let cpf_maria = generate_valid_cpf();
    insert_student(&pool, "Maria", &cpf_maria).await;
    insert_student(&pool, "Joana", &generate_valid_cpf()).await;

    let app = setup_test_app(pool);
    let auth = bearer_token("staff-1");

    let request = authed_request("GET", "/api/students?search=mar", &auth);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], "Maria");
    assert_eq!(body["meta"]["total"], 1);

    let request = authed_request("GET", &format!("/api/students?search={cpf_maria}"), &auth);
    let response = app.oneshot(request).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["cpf"], cpf_maria);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_students_ordering_and_pagination(pool: PgPool) {
    insert_student(&pool, "Carla", &generate_valid_cpf()).await;
    insert_student(&pool, "Ana", &generate_valid_cpf()).await;
    insert_student(&pool, "Bruna", &generate_valid_cpf()).await;

    let app = setup_test_app(pool);
    let auth = bearer_token("staff-1");

    let request = authed_request("GET", "/api/students?ordering=name", &auth);
    let response = app.clone().oneshot(request).await.unwrap();
    let body = response_json(response).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ana", "Bruna", "Carla"]);

    let request = authed_request("GET", "/api/students?ordering=-name&limit=2", &auth);
    let response = app.oneshot(request).await.unwrap();
    let body = response_json(response).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Carla", "Bruna"]);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["has_more"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_students_requires_auth(pool: PgPool) {
    let app = setup_test_app(pool);
    let response = app.oneshot(get_request("/api/students")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_student_replaces_every_field(pool: PgPool) {
    let id = insert_student(&pool, "Maria", &generate_valid_cpf()).await;

    let app = setup_test_app(pool);
    let auth = bearer_token("staff-1");
    let new_cpf = generate_valid_cpf();

    let request = authed_json_request(
        "PUT",
        &format!("/api/students/{id}"),
        &auth,
        json!({
            "name": "Mariana",
            "email": "mariana@test.com",
            "cpf": new_cpf,
            "birth_date": "1999-12-31",
            "phone": "21987654321"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["id"].as_i64().unwrap(), id);
    assert_eq!(body["name"], "Mariana");
    assert_eq!(body["cpf"], new_cpf);
    assert_eq!(body["birth_date"], "1999-12-31");
    assert_eq!(body["phone"], "21987654321");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_missing_student_is_not_found(pool: PgPool) {
    let app = setup_test_app(pool);
    let auth = bearer_token("staff-1");

    let request = authed_json_request(
        "PUT",
        "/api/students/9999",
        &auth,
        json!({
            "name": "Maria",
            "email": "maria@test.com",
            "cpf": generate_valid_cpf(),
            "birth_date": "2001-03-14",
            "phone": "11912345678"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_student(pool: PgPool) {
    let id = insert_student(&pool, "Maria", &generate_valid_cpf()).await;

    let app = setup_test_app(pool.clone());
    let auth = bearer_token("staff-1");

    let request = authed_request("DELETE", &format!("/api/students/{id}"), &auth);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = authed_request("GET", &format!("/api/students/{id}"), &auth);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
