use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use shared::token::{OsRandomProvider, TokenProvider};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    access_requests, brand_kits, businesses, health, invitations, members, users,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// Source of invitation and share-link tokens. Injected so tests can pin
    /// the byte stream.
    pub token_provider: Arc<dyn TokenProvider>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    create_app_with_token_provider(config, pool, Arc::new(OsRandomProvider))
}

pub fn create_app_with_token_provider(
    config: Config,
    pool: PgPool,
    token_provider: Arc<dyn TokenProvider>,
) -> Router {
    let config = Arc::new(config);

    // Rate limiting is enabled when rate_limit_per_minute > 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        token_provider,
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (require JWT authentication)
    // Middleware order: auth runs first, then rate limiting (keyed by user)
    let protected_routes = Router::new()
        // User profile
        .route("/api/v1/me", get(users::get_me))
        .route("/api/v1/me", put(users::update_me))
        // Businesses
        .route("/api/v1/businesses", post(businesses::create_business))
        .route("/api/v1/businesses", get(businesses::list_businesses))
        .route(
            "/api/v1/businesses/:business_id",
            get(businesses::get_business),
        )
        .route(
            "/api/v1/businesses/:business_id",
            put(businesses::update_business),
        )
        .route(
            "/api/v1/businesses/:business_id",
            delete(businesses::delete_business),
        )
        .route(
            "/api/v1/businesses/:business_id/permissions",
            get(businesses::get_permissions),
        )
        // Team management
        .route(
            "/api/v1/businesses/:business_id/members",
            get(members::list_members),
        )
        .route(
            "/api/v1/businesses/:business_id/members/:user_id",
            put(members::update_member_role),
        )
        .route(
            "/api/v1/businesses/:business_id/members/:user_id",
            delete(members::remove_member),
        )
        // Invitations (team side)
        .route(
            "/api/v1/businesses/:business_id/invitations",
            post(invitations::create_invitation),
        )
        .route(
            "/api/v1/businesses/:business_id/invitations",
            get(invitations::list_invitations),
        )
        .route(
            "/api/v1/businesses/:business_id/invitations/:invitation_id",
            delete(invitations::revoke_invitation),
        )
        // Invitation acceptance binds the caller's email to the invite
        .route(
            "/api/v1/invitations/:token/accept",
            post(invitations::accept_invitation),
        )
        // Access requests
        .route(
            "/api/v1/businesses/:business_id/access-requests",
            post(access_requests::create_access_request),
        )
        .route(
            "/api/v1/businesses/:business_id/access-requests",
            get(access_requests::list_access_requests),
        )
        .route(
            "/api/v1/access-requests/:request_id/approve",
            post(access_requests::approve_access_request),
        )
        .route(
            "/api/v1/access-requests/:request_id/reject",
            post(access_requests::reject_access_request),
        )
        .route(
            "/api/v1/access-requests/:request_id",
            delete(access_requests::withdraw_access_request),
        )
        // Brand kits
        .route(
            "/api/v1/businesses/:business_id/brand-kit",
            get(brand_kits::get_brand_kit),
        )
        .route(
            "/api/v1/businesses/:business_id/brand-kit",
            put(brand_kits::upsert_brand_kit),
        )
        .route(
            "/api/v1/businesses/:business_id/brand-kit/share",
            post(brand_kits::share_brand_kit),
        )
        .route(
            "/api/v1/businesses/:business_id/brand-kit/share",
            delete(brand_kits::unshare_brand_kit),
        )
        // Rate limiting runs after auth (needs the user ID from auth)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        // Auth runs first (outermost layer = runs first)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        // Token-addressed invitation flow for the acceptance page
        .route("/api/v1/invitations/:token", get(invitations::get_invitation))
        .route(
            "/api/v1/invitations/:token/decline",
            post(invitations::decline_invitation),
        )
        // Public brand kit view
        .route(
            "/api/v1/shared/:share_token",
            get(brand_kits::get_shared_brand_kit),
        );

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
