use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::booking::proof::MAX_PROOF_BYTES;
use crate::handlers::{admin, auth, bookings, content, public};
use crate::middleware::auth::{auth_middleware, optional_auth_middleware, require_admin};
use crate::middleware::rate_limit::create_public_governor;
use crate::AppState;

/// Multipart bodies carry one image plus form fields.
const UPLOAD_BODY_LIMIT: usize = MAX_PROOF_BYTES + 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    // IP-based governor for everything reachable without an admin token
    let public_governor = create_public_governor();

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        .layer(public_governor.clone());

    let public_routes = Router::new()
        .route("/services", get(public::list_services))
        .route("/gallery", get(public::list_gallery))
        .route("/payment-info", get(public::payment_info))
        .merge(
            Router::new()
                .route("/bookings", post(bookings::submit_booking))
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    optional_auth_middleware,
                )),
        )
        .layer(public_governor);

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        // Booking moderation
        .route("/bookings", get(admin::list_bookings))
        .route("/bookings/stats", get(admin::booking_stats))
        .route(
            "/bookings/{id}",
            get(admin::get_booking).delete(admin::delete_booking),
        )
        .route("/bookings/{id}/proof", get(admin::booking_proof))
        .route("/bookings/{id}/status", put(admin::update_booking_status))
        // Services
        .route(
            "/services",
            get(content::list_services).post(content::create_service),
        )
        .route(
            "/services/{id}",
            put(content::update_service).delete(content::delete_service),
        )
        .route("/services/{id}/active", put(content::set_service_active))
        // Gallery
        .route(
            "/gallery",
            get(content::list_gallery).post(content::create_gallery_item),
        )
        .route(
            "/gallery/{id}",
            put(content::update_gallery_item).delete(content::delete_gallery_item),
        )
        .route("/gallery/{id}/active", put(content::set_gallery_active))
        // Images
        .route(
            "/uploads/{bucket}",
            post(content::upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let storage_dir = state.config.storage_dir.clone();

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", public_routes)
        .nest("/api/admin", admin_routes)
        .nest_service("/storage", ServeDir::new(storage_dir))
        .with_state(state)
}
