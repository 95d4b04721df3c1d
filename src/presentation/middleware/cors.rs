use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

/// CORS policy from a comma-separated origin list; empty or `*` allows any origin
pub fn cors_layer(allowed_origins: &str) -> anyhow::Result<CorsLayer> {
    let allowed_origins = allowed_origins.trim();

    if allowed_origins.is_empty() || allowed_origins == "*" {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(|s| s.trim().parse())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}
