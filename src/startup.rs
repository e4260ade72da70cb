use actix_web::{web, App, HttpServer};
use actix_web::dev::Server;
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::{SessionManager, TokenCodec};
use crate::configuration::JwtSettings;
use crate::middleware::{AccessTokenGuard, RequestLogging};
use crate::routes::{current_user, health_check, login, logout, refresh, signup};
use crate::store::PgCredentialStore;

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    jwt_config: JwtSettings,
) -> Result<Server, std::io::Error> {
    let codec = TokenCodec::new(jwt_config);
    let store = Arc::new(PgCredentialStore::new(connection));
    let manager = web::Data::new(SessionManager::new(store, codec.clone()));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestLogging)
            .app_data(manager.clone())
            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/auth/signup", web::post().to(signup))
            .route("/auth/login", web::post().to(login))
            .route("/auth/refresh", web::post().to(refresh))
            .route("/auth/logout", web::post().to(logout))
            // Routes requiring a valid access token
            .service(
                web::scope("/auth")
                    .wrap(AccessTokenGuard::new(codec.clone()))
                    .route("/me", web::get().to(current_user)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
