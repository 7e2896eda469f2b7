use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::shared::app_state::AppState;
use crate::system::auth::middleware::{require_admin, require_auth, require_staff};
use crate::{handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route("/api/system/auth/login", post(system::handlers::auth::login))
        .route("/api/system/auth/refresh", post(system::handlers::auth::refresh))
        .route("/api/system/auth/logout", post(system::handlers::auth::logout))
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn_with_state(state.clone(), require_auth)),
        )
        // ========================================
        // SYSTEM USERS (ADMIN)
        // ========================================
        .route(
            "/api/system/users",
            get(system::handlers::users::list)
                .post(system::handlers::users::create)
                .layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        .route(
            "/api/system/users/:id",
            get(system::handlers::users::get_by_id)
                .put(system::handlers::users::update)
                .layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        .route(
            "/api/system/users/:id/deactivate",
            post(system::handlers::users::deactivate)
                .layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        // ========================================
        // ADMIN TABLES
        // ========================================
        .route(
            "/api/agents",
            get(handlers::a001_agent::list_all)
                .post(handlers::a001_agent::create)
                .layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        .route(
            "/api/agents/:id",
            get(handlers::a001_agent::get_by_id)
                .layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        .route(
            "/api/inventory",
            get(handlers::a003_inventory_item::list_all)
                .post(handlers::a003_inventory_item::create)
                .layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        // ========================================
        // ADMIN + AGENT
        // ========================================
        .route(
            "/api/customers",
            get(handlers::a002_customer::list_all)
                .post(handlers::a002_customer::create)
                .layer(middleware::from_fn_with_state(state.clone(), require_staff)),
        )
        .route(
            "/api/customers/:id",
            get(handlers::a002_customer::get_by_id)
                .layer(middleware::from_fn_with_state(state.clone(), require_staff)),
        )
        .route(
            "/api/leads",
            get(handlers::a004_lead::list_all)
                .post(handlers::a004_lead::create)
                .layer(middleware::from_fn_with_state(state.clone(), require_staff)),
        )
        .route(
            "/api/leads/:id/convert",
            post(handlers::a004_lead::convert)
                .layer(middleware::from_fn_with_state(state.clone(), require_staff)),
        )
        // ========================================
        // ANY SIGNED-IN ROLE
        // ========================================
        // UseCase u501: Record payment (клиент платит только за себя)
        .route(
            "/api/payments/preview",
            post(handlers::u501_record_payment::preview)
                .layer(middleware::from_fn_with_state(state.clone(), require_auth)),
        )
        .route(
            "/api/payments",
            post(handlers::u501_record_payment::record)
                .layer(middleware::from_fn_with_state(state.clone(), require_auth)),
        )
        .route(
            "/api/tokens",
            get(handlers::a005_token::list_all)
                .layer(middleware::from_fn_with_state(state.clone(), require_auth)),
        )
        .route(
            "/api/dashboard/summary",
            get(handlers::d400_portal_summary::summary)
                .layer(middleware::from_fn_with_state(state.clone(), require_auth)),
        );

    router.with_state(state)
}
