use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::body::Body;
use axum::http::{Request, header};
use escola_api::config::cors::CorsConfig;
use escola_api::config::jwt::JwtConfig;
use escola_api::config::throttle::ThrottleConfig;
use escola_api::router::init_router;
use escola_api::state::AppState;
use escola_api::throttle::Throttles;
use escola_api::utils::jwt::create_access_token;
use escola_api::validators::cpf_check_digits;
use http_body_util::BodyExt;
use sqlx::PgPool;

/// Build the app with a fresh throttle state so quota tests never bleed
/// into each other.
pub fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        throttles: Arc::new(Throttles::new(&ThrottleConfig::default())),
    };
    init_router(state)
}

/// Mint a bearer token for the given subject. Accounts are provisioned
/// outside this API, so tests sign tokens directly.
#[allow(dead_code)]
pub fn bearer_token(subject: &str) -> String {
    dotenvy::dotenv().ok();
    let token = create_access_token(
        subject,
        &format!("{subject}@test.com"),
        &JwtConfig::from_env(),
    )
    .unwrap();
    format!("Bearer {token}")
}

static NEXT_CPF_BASE: AtomicU64 = AtomicU64::new(104_729);

/// Generate a distinct CPF with correct check digits per call.
#[allow(dead_code)]
pub fn generate_valid_cpf() -> String {
    let mut value = NEXT_CPF_BASE.fetch_add(1, Ordering::Relaxed);
    let mut base = [0u8; 9];
    for slot in base.iter_mut().rev() {
        *slot = (value % 10) as u8;
        value /= 10;
    }
    let (first, second) = cpf_check_digits(&base);

    let mut cpf: String = base.iter().map(|&d| char::from(b'0' + d)).collect();
    cpf.push(char::from(b'0' + first));
    cpf.push(char::from(b'0' + second));
    cpf
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[allow(dead_code)]
pub fn authed_json_request(
    method: &str,
    uri: &str,
    auth: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, auth)
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[allow(dead_code)]
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn authed_request(method: &str, uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, auth)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[allow(dead_code)]
pub async fn insert_student(pool: &PgPool, name: &str, cpf: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO students (name, email, cpf, birth_date, phone)
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(name)
    .bind(format!("{}@test.com", name.to_lowercase()))
    .bind(cpf)
    .bind(chrono::NaiveDate::from_ymd_opt(2001, 3, 14).unwrap())
    .bind("11912345678")
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn insert_course(pool: &PgPool, code: &str, description: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO courses (code, description, level)
         VALUES ($1, $2, 'B') RETURNING id",
    )
    .bind(code)
    .bind(description)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn insert_enrollment(
    pool: &PgPool,
    student_id: i64,
    course_id: i64,
    period: &str,
) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO enrollments (student_id, course_id, period)
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(student_id)
    .bind(course_id)
    .bind(period)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
