//! End-to-end tests against a running Postgres instance.
//!
//! Each test spawns the app on a random port with its own freshly migrated
//! database. Marked `#[ignore]` so the default suite runs without a server;
//! run with `cargo test -- --ignored` when Postgres is available.

use mflix::configuration::{get_configuration, DatabaseSettings};
use mflix::startup::run;
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool, Row};
use std::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();
    let connection_pool = configure_database(&configuration.database).await;

    let server = run(listener, connection_pool.clone(), configuration.jwt.clone())
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
    }
}

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    connection_pool
}

async fn signup(client: &reqwest::Client, address: &str, email: &str) -> reqwest::Response {
    client
        .post(&format!("{}/auth/signup", address))
        .json(&json!({
            "name": "Ann",
            "email": email,
            "password": "pw123"
        }))
        .send()
        .await
        .expect("Failed to execute request.")
}

async fn login(
    client: &reqwest::Client,
    address: &str,
    email: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(&format!("{}/auth/login", address))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to execute request.")
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn signup_returns_201_and_persists_the_user() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = signup(&client, &app.address, "ann@x.com").await;
    assert_eq!(201, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.get("access_token").is_some());
    assert!(body.get("refresh_token").is_some());

    let user = sqlx::query("SELECT email, name FROM users WHERE email = 'ann@x.com'")
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch created user");
    assert_eq!(user.get::<String, _>("name"), "Ann");

    // Signup must not open a session
    let sessions = sqlx::query("SELECT user_id FROM sessions")
        .fetch_all(&app.db_pool)
        .await
        .expect("Failed to query sessions");
    assert!(sessions.is_empty());
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn signup_returns_409_for_a_duplicate_email_any_case() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    assert_eq!(201, signup(&client, &app.address, "ann@x.com").await.status());

    let response = signup(&client, &app.address, "ANN@X.COM").await;
    assert_eq!(409, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "DUPLICATE_USER");
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn login_returns_404_for_an_unknown_email() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = login(&client, &app.address, "ghost@x.com", "pw123").await;

    assert_eq!(404, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "USER_NOT_FOUND");
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn two_logins_leave_exactly_one_session_row() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    signup(&client, &app.address, "ann@x.com").await;
    login(&client, &app.address, "ann@x.com", "pw123").await;
    let second: Value = login(&client, &app.address, "ann@x.com", "pw123")
        .await
        .json()
        .await
        .expect("Failed to parse response");

    let sessions = sqlx::query("SELECT refresh_token FROM sessions")
        .fetch_all(&app.db_pool)
        .await
        .expect("Failed to query sessions");

    assert_eq!(sessions.len(), 1);
    assert_eq!(
        sessions[0].get::<String, _>("refresh_token"),
        second["refresh_token"].as_str().unwrap()
    );
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn full_token_lifecycle_over_http() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // signup -> 201
    assert_eq!(201, signup(&client, &app.address, "ann@x.com").await.status());

    // wrong password -> 401
    let response = login(&client, &app.address, "ann@x.com", "wrong").await;
    assert_eq!(401, response.status().as_u16());

    // login -> 200 with both tokens
    let response = login(&client, &app.address, "ann@x.com", "pw123").await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();
    let access_token = body["access_token"].as_str().unwrap().to_string();

    // access token works on the protected route
    let response = client
        .get(&format!("{}/auth/me", &app.address))
        .bearer_auth(&access_token)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let me: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(me["email"], "ann@x.com");

    // refresh -> 200 with a rotated pair
    let response = client
        .post(&format!("{}/auth/refresh", &app.address))
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let rotated: Value = response.json().await.expect("Failed to parse response");
    let rotated_refresh = rotated["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(rotated_refresh, refresh_token);

    // the rotated-out token is rejected
    let response = client
        .post(&format!("{}/auth/refresh", &app.address))
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, response.status().as_u16());

    // logout -> 200, session gone
    let response = client
        .post(&format!("{}/auth/logout", &app.address))
        .json(&json!({ "refresh_token": rotated_refresh }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    // refresh after logout -> 401 SESSION_NOT_FOUND
    let response = client
        .post(&format!("{}/auth/refresh", &app.address))
        .json(&json!({ "refresh_token": rotated_refresh }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn protected_route_rejects_missing_and_invalid_tokens() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/auth/me", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, response.status().as_u16());

    let response = client
        .get(&format!("{}/auth/me", &app.address))
        .bearer_auth("not.a.token")
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, response.status().as_u16());
}
