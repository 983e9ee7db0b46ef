use crate::application::auth_service::AuthService;
use crate::application::follow_service::FollowService;
use crate::application::post_service::PostService;
use crate::infrastructure::cache::PageCache;
use crate::infrastructure::config::AppConfig;
use crate::presentation::handlers;
use crate::presentation::middleware::{
    CachePage, IdentityMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Everything the request handlers need, assembled once at startup (and once
/// per test) — there is no ambient state beyond this and the database.
#[derive(Clone)]
pub struct AppContext {
    pub auth: AuthService,
    pub posts: PostService,
    pub follows: FollowService,
    pub cache: PageCache,
}

/// Registers app data and every API route. Shared between the real server
/// and the integration tests so both exercise the same router.
pub fn api_services(ctx: AppContext) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg| {
        cfg.app_data(web::Data::new(ctx.auth.clone()))
            .app_data(web::Data::new(ctx.posts.clone()))
            .app_data(web::Data::new(ctx.follows.clone()))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health))
                    .service(handlers::auth::scope())
                    .service(handlers::post::group_posts)
                    .service(handlers::post::post_detail)
                    .service(handlers::post::create_post)
                    .service(handlers::post::edit_post_form)
                    .service(handlers::post::edit_post)
                    .service(handlers::post::add_comment)
                    .service(handlers::profile::follow_feed)
                    .service(handlers::profile::profile_follow)
                    .service(handlers::profile::profile_unfollow)
                    .service(handlers::profile::profile)
                    .service(
                        web::resource("/")
                            .wrap(CachePage::new(ctx.cache.clone()))
                            .route(web::get().to(handlers::post::index)),
                    ),
            );
    }
}

pub async fn start_server(config: AppConfig, ctx: AppContext) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);
    let keys = ctx.auth.keys().clone();
    let services = api_services(ctx);

    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || {
        let cors = build_cors(&config);

        App::new()
            .wrap(IdentityMiddleware::new(keys.clone()))
            .wrap(Logger::default())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .configure(services.clone())
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
