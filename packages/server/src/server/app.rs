//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use wigal::{WigalOptions, WigalService};

use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::kernel::{BaseSmsProvider, PostgresOtpStore, ServerDeps, WigalAdapter};
use crate::server::middleware::{jwt_auth_middleware, require_admin};
use crate::server::routes::{
    delete_otp_record_handler, delete_otp_records_handler, health_handler,
    list_otp_records_handler, purge_expired_otp_records_handler, send_otp_handler,
    send_sms_handler, verify_otp_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// Router options that vary between deployments and tests
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
    pub rate_limit_enabled: bool,
}

impl AppOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            allowed_origins: config.allowed_origins.clone(),
            rate_limit_enabled: config.rate_limit_enabled,
        }
    }
}

/// Wire the production dependencies from configuration.
///
/// Missing Wigal credentials do not stop the server: dev mode never needs
/// them, and prod requests fail with a configuration error naming what is
/// missing.
pub fn build_server_deps(config: &Config, pool: PgPool) -> ServerDeps {
    let sms_provider = WigalOptions::new(config.wigal_api_key.clone(), config.wigal_username.clone())
        .map(|options| {
            let options = options
                .with_api_url(config.wigal_api_url.clone())
                .with_sender_id(config.wigal_sender_id.clone());
            let service = Arc::new(WigalService::new(options));
            Arc::new(WigalAdapter::new(service)) as Arc<dyn BaseSmsProvider>
        })
        .map_err(|e| match e {
            wigal::WigalError::MissingCredentials { missing } => missing,
            _ => Vec::new(),
        });

    if let Err(missing) = &sms_provider {
        warn!(missing = ?missing, "Wigal credentials not configured, prod OTP requests will fail");
    }

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    ServerDeps::new(
        Arc::new(PostgresOtpStore::new(pool)),
        sms_provider,
        config.otp_mode,
        jwt_service,
        config.admin_phone_numbers.clone(),
    )
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, options: AppOptions) -> Router {
    let jwt_service = deps.jwt_service.clone();
    let app_state = AppState {
        deps: Arc::new(deps),
    };

    let mut otp_routes = Router::new()
        .route("/otp/send", post(send_otp_handler))
        .route("/otp/verify", post(verify_otp_handler));

    // OTP endpoints: 10 requests per second per IP with bursts of 20
    if options.rate_limit_enabled {
        let rate_limit_config = GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .use_headers() // Extract IP from X-Forwarded-For header
            .finish();

        match rate_limit_config {
            Some(config) => {
                otp_routes = otp_routes.layer(GovernorLayer {
                    config: Arc::new(config),
                });
            }
            None => warn!("Invalid rate limit configuration, OTP routes are not rate limited"),
        }
    }

    let admin_routes = Router::new()
        .route("/admin/otp", get(list_otp_records_handler))
        .route("/admin/otp/:id", delete(delete_otp_record_handler))
        .route("/admin/otp/delete", post(delete_otp_records_handler))
        .route(
            "/admin/otp/purge-expired",
            post(purge_expired_otp_records_handler),
        )
        .route("/sms/send", post(send_sms_handler))
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .merge(otp_routes)
        .merge(admin_routes)
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(cors_layer(&options.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}
