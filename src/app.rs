use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::routes_plan;
use crate::routes_plans;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let api = Router::new()
        // previews
        .route("/plan/parse", post(routes_plan::parse))
        .route("/plan/validate", post(routes_plan::validate_plan))
        .route("/plan/schedule", post(routes_plan::schedule))
        // stored plans
        .route("/plans", get(routes_plans::list_plans).post(routes_plans::create_plan))
        .route("/plans/:id", get(routes_plans::get_plan))
        .route("/plans/:id/apply", post(routes_plans::apply_plan))
        .route("/timeline", get(routes_plans::get_timeline))
        // settings
        .route(
            "/settings",
            get(routes_plans::get_settings).put(routes_plans::put_settings),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}
