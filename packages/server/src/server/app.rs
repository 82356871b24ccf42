//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use telegram::{TelegramOptions, TelegramService};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use unsplash_client::UnsplashClient;

use crate::config::Config;
use crate::domains::blog::PgBlogStore;
use crate::kernel::{
    GeminiAI, PublishingSettings, ServerDeps, TelegramAdapter, UnsplashAdapter,
};
use crate::server::middleware::{admin_auth_middleware, trigger_auth_middleware};
use crate::server::routes::{
    admin_create_portfolio_handler, admin_create_service_handler, admin_delete_portfolio_handler,
    admin_delete_service_handler, admin_list_clients_handler, admin_list_orders_handler,
    admin_list_portfolio_handler, admin_list_services_handler, admin_update_client_handler,
    admin_update_order_handler, admin_update_portfolio_handler, admin_update_service_handler,
    create_order_handler, explain_handler, generate_daily_posts_handler, get_blog_post_handler,
    get_portfolio_item_handler, get_service_handler, health_handler, list_blog_posts_handler,
    list_featured_portfolio_handler, list_portfolio_handler, list_services_handler,
    publish_scheduled_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
}

/// Wire the production implementations of every infrastructure trait.
pub fn build_server_deps(pool: PgPool, config: &Config) -> ServerDeps {
    let ai = GeminiAI::new(config.gemini_api_key.clone(), config.gemini_model.clone());

    let unsplash = Arc::new(UnsplashClient::new(config.unsplash_access_key.clone()));

    // A missing token is reported on first send, not at startup.
    let telegram = Arc::new(TelegramService::new(TelegramOptions {
        bot_token: config.telegram_bot_token.clone().unwrap_or_default(),
    }));

    ServerDeps::new(
        Arc::new(PgBlogStore::new(pool)),
        Arc::new(ai),
        Arc::new(UnsplashAdapter::new(unsplash)),
        Arc::new(TelegramAdapter::new(telegram)),
        PublishingSettings {
            schedule_mode: config.blog_schedule_mode,
            site_url: config.site_url.clone(),
            blog_channel_id: config.telegram_channel_id.clone(),
            admin_channel_id: config.telegram_admin_channel_id.clone(),
        },
    )
}

/// Build the Axum application router
///
/// Trigger routes sit behind the shared-secret guard when `trigger_secret`
/// is set. Admin routes need `admin_token` and are closed without it.
/// Everything else is public.
pub fn build_app(
    state: AppState,
    trigger_secret: Option<String>,
    admin_token: Option<String>,
) -> Router {
    let secret: Option<Arc<str>> = trigger_secret.map(Arc::from);
    let admin_token: Option<Arc<str>> = admin_token.map(Arc::from);

    let triggers = Router::new()
        .route(
            "/api/blog/generate-daily-posts",
            post(generate_daily_posts_handler),
        )
        .route("/api/blog/publish-scheduled", post(publish_scheduled_handler))
        .route_layer(middleware::from_fn(move |req, next| {
            trigger_auth_middleware(secret.clone(), req, next)
        }));

    let admin = Router::new()
        .route("/api/admin/orders", get(admin_list_orders_handler))
        .route("/api/admin/orders/:id", patch(admin_update_order_handler))
        .route(
            "/api/admin/services",
            get(admin_list_services_handler).post(admin_create_service_handler),
        )
        .route(
            "/api/admin/services/:id",
            patch(admin_update_service_handler).delete(admin_delete_service_handler),
        )
        .route("/api/admin/clients", get(admin_list_clients_handler))
        .route("/api/admin/clients/:id", patch(admin_update_client_handler))
        .route(
            "/api/admin/portfolio",
            get(admin_list_portfolio_handler).post(admin_create_portfolio_handler),
        )
        .route(
            "/api/admin/portfolio/:id",
            patch(admin_update_portfolio_handler).delete(admin_delete_portfolio_handler),
        )
        .route("/api/admin/generate-blog", post(generate_daily_posts_handler))
        .route_layer(middleware::from_fn(move |req, next| {
            admin_auth_middleware(admin_token.clone(), req, next)
        }));

    // CORS configuration - public site and admin are served from other origins
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/blog", get(list_blog_posts_handler))
        .route("/api/blog/:slug", get(get_blog_post_handler))
        .route("/api/services", get(list_services_handler))
        .route("/api/services/:id", get(get_service_handler))
        .route("/api/ai/explain", post(explain_handler))
        .route("/api/orders", post(create_order_handler))
        .route("/api/portfolio", get(list_portfolio_handler))
        .route("/api/portfolio/featured", get(list_featured_portfolio_handler))
        .route("/api/portfolio/:id", get(get_portfolio_item_handler))
        .merge(triggers)
        .merge(admin)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
