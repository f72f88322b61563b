#![allow(async_fn_in_trait)]

mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;
mod privilege;
mod request;
mod response;

use actix_web::web::{delete, get, post, put, resource, scope, Data};
use actix_web::{App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::database::postgres::PgSqlxManager;
use crate::impls::tokener::jwt::JWT;
use crate::middlewares::jwt::JWTMiddleware;
use crate::privilege::casbin::CasbinGuard;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_env().context("failed to load configuration")?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await.context("failed to run migrations")?;
        log::info!("database schema is up to date");
    }
    let guard = Data::new(CasbinGuard::new().await.context("failed to load role policies")?);
    let manager = Data::new(PgSqlxManager::new(pool));
    let jwt = JWT::new(config.jwt_secret.as_bytes().to_vec());
    let bind = (config.bind_addr.clone(), config.port);
    let config = Data::new(config);
    log::info!("listening on {}:{}", bind.0, bind.1);
    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(manager.clone())
            .app_data(guard.clone())
            .app_data(config.clone())
            .app_data(Data::new(jwt.clone()))
            .service(resource("signup").route(post().to(handlers::auth::signup)))
            .service(resource("login").route(post().to(handlers::auth::login)))
            .service(
                scope("")
                    .wrap(JWTMiddleware::new(jwt.clone()))
                    .service(
                        resource("me")
                            .route(get().to(handlers::user::me))
                            .route(put().to(handlers::user::update_profile)),
                    )
                    .service(
                        scope("users")
                            .route("", get().to(handlers::user::list))
                            .route("{user_id}/role", put().to(handlers::user::set_role))
                            .route("{user_id}/active", put().to(handlers::user::set_active)),
                    )
                    .service(
                        scope("events")
                            .route("", get().to(handlers::event::list))
                            .route("", post().to(handlers::event::create))
                            .service(
                                scope("{event_id}")
                                    .route("", get().to(handlers::event::detail))
                                    .route("", put().to(handlers::event::update))
                                    .route("", delete().to(handlers::event::delete))
                                    .route("status", put().to(handlers::event::set_status))
                                    .route("registrations", get().to(handlers::event::registrations))
                                    .route("feedback", get().to(handlers::feedback::list))
                                    .route("feedback", post().to(handlers::feedback::submit)),
                            ),
                    )
                    .service(
                        scope("registrations")
                            .route("", post().to(handlers::registration::register))
                            .route("mine", get().to(handlers::registration::mine))
                            .route("{registration_id}", delete().to(handlers::registration::cancel))
                            .route("{registration_id}/status", put().to(handlers::registration::set_status)),
                    )
                    .service(
                        scope("suggestions")
                            .route("", get().to(handlers::suggestion::list))
                            .route("", post().to(handlers::suggestion::create))
                            .service(
                                scope("{suggestion_id}")
                                    .route("", get().to(handlers::suggestion::detail))
                                    .route("", delete().to(handlers::suggestion::delete))
                                    .route("status", put().to(handlers::suggestion::set_status))
                                    .route("vote", post().to(handlers::suggestion::cast_vote))
                                    .route("vote", delete().to(handlers::suggestion::remove_vote))
                                    .route("comments", post().to(handlers::suggestion::add_comment)),
                            ),
                    )
                    .service(
                        scope("admin")
                            .route("dashboard", get().to(handlers::dashboard::stats))
                            .route("reconcile", post().to(handlers::dashboard::reconcile)),
                    ),
            )
    })
    .bind(bind)?
    .run()
    .await?;
    Ok(())
}
