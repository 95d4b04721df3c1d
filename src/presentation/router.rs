use crate::infrastructure::config::HttpConfig;
use crate::infrastructure::state::AppState;
use crate::presentation::handlers;
use crate::presentation::middleware::{cors::cors_layer, rate_limit::rate_limit_layer};
use crate::presentation::openapi::ApiDoc;
use crate::presentation::routes;
use axum::{Router, routing::get};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn app(state: AppState, http: &HttpConfig) -> anyhow::Result<Router> {
    let rate_limit = rate_limit_layer(http.rate_limit_per_minute)?;

    Ok(Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1/auth", routes::auth::routes(rate_limit))
        .nest("/api/v1/users", routes::users::routes())
        .nest("/api/v1/admin", routes::admin::routes(state.clone()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&http.cors_allowed_origins)?)
        .with_state(state))
}
