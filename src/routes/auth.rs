/// Authentication Routes
///
/// Thin adapters over the session manager: deserialize the request, call one
/// operation, map the result to a response. Token delivery to the browser
/// happens here as scoped http-only cookies; the session manager itself never
/// touches HTTP types.

use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    web, HttpRequest, HttpResponse,
};
use serde::{Deserialize, Serialize};

use crate::auth::{Claims, SessionManager, TokenPair};
use crate::error::{AppError, AuthError};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: String,
}

/// POST /auth/signup
///
/// Register a new user. Returns 201 with a token pair; no session record is
/// created until the first login.
///
/// # Errors
/// - 409: email already registered (case-insensitive)
/// - 500: internal server error
pub async fn signup(
    form: web::Json<SignupRequest>,
    manager: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let pair = manager
        .signup(&form.name, &form.email, &form.password)
        .await?;

    Ok(token_response(HttpResponse::Created(), &pair, &manager))
}

/// POST /auth/login
///
/// Authenticate with email and password. On success the user's session is
/// created or rotated and both tokens are returned, also as cookies.
///
/// # Errors
/// - 404: no user with this email
/// - 401: wrong password
/// - 500: internal server error
pub async fn login(
    form: web::Json<LoginRequest>,
    manager: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let pair = manager.login(&form.email, &form.password).await?;

    Ok(token_response(HttpResponse::Ok(), &pair, &manager))
}

/// POST /auth/refresh
///
/// Exchange the current refresh token (cookie or JSON body) for a new token
/// pair. The old refresh token is rotated out and unusable afterwards.
///
/// # Errors
/// - 401: token not on file, invalid, or expired
/// - 500: internal server error
pub async fn refresh(
    req: HttpRequest,
    form: Option<web::Json<RefreshRequest>>,
    manager: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let token = extract_refresh_token(&req, form)?;
    let pair = manager.refresh(&token).await?;

    Ok(token_response(HttpResponse::Ok(), &pair, &manager))
}

/// POST /auth/logout
///
/// Delete the session the refresh token belongs to and clear both cookies.
/// Access tokens already issued stay valid until their own expiry.
///
/// # Errors
/// - 401: no session holds this token, or the token does not verify
/// - 404: token subject matches no user
pub async fn logout(
    req: HttpRequest,
    form: Option<web::Json<RefreshRequest>>,
    manager: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let token = extract_refresh_token(&req, form)?;
    manager.logout(&token).await?;

    Ok(HttpResponse::Ok()
        .cookie(expired_cookie("access_token"))
        .cookie(expired_cookie("refresh_token"))
        .json(serde_json::json!({ "message": "Session closed" })))
}

/// GET /auth/me
///
/// Current authenticated user. Claims are injected by the access-token guard.
///
/// # Errors
/// - 401: missing or invalid access token (handled by the guard)
/// - 404: token subject matches no user
pub async fn current_user(
    claims: web::ReqData<Claims>,
    manager: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let user = manager.current_user(&claims.sub).await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        id: user.id.to_string(),
        email: user.email,
        name: user.name,
        created_at: user.created_at.to_rfc3339(),
    }))
}

fn extract_refresh_token(
    req: &HttpRequest,
    form: Option<web::Json<RefreshRequest>>,
) -> Result<String, AppError> {
    if let Some(cookie) = req.cookie("refresh_token") {
        return Ok(cookie.value().to_string());
    }
    form.map(|f| f.refresh_token.clone())
        .ok_or_else(|| AuthError::MissingToken.into())
}

fn token_response(
    mut builder: actix_web::HttpResponseBuilder,
    pair: &TokenPair,
    manager: &SessionManager,
) -> HttpResponse {
    let access_expiry = manager.codec().access_token_expiry();
    let refresh_expiry = manager.codec().refresh_token_expiry();

    builder
        .cookie(token_cookie("access_token", &pair.access_token, access_expiry))
        .cookie(token_cookie(
            "refresh_token",
            &pair.refresh_token,
            refresh_expiry,
        ))
        .json(AuthResponse {
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
            token_type: "Bearer".to_string(),
            expires_in: access_expiry,
        })
}

fn token_cookie<'a>(name: &'a str, value: &'a str, max_age_seconds: i64) -> Cookie<'a> {
    Cookie::build(name, value)
        .http_only(true)
        .secure(true)
        .path("/")
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

fn expired_cookie(name: &str) -> Cookie<'_> {
    Cookie::build(name, "")
        .http_only(true)
        .secure(true)
        .path("/")
        .same_site(SameSite::Strict)
        .max_age(Duration::ZERO)
        .finish()
}
