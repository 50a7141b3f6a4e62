//! Composite Solver HTTP Server

use axum::{
    extract::{Json, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use composite_solver::prelude::*;

/// Listening address, read from `HOST` and `PORT`
#[derive(Debug, Clone)]
struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("PORT") {
            Ok(port) => port.parse()?,
            Err(_) => 8086,
        };
        Ok(Self { host, port })
    }

    fn addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct RootResponse {
    message: String,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<T>,
}

async fn root() -> impl IntoResponse {
    Json(RootResponse {
        message: "Composite Solver API".to_string(),
    })
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Parse the request body, run the calculation and map errors to status codes
fn respond<I, T, F>(version: &str, body: serde_json::Value, compute: F) -> impl IntoResponse
where
    I: DeserializeOwned,
    T: Serialize,
    F: FnOnce(&I, ApiVersion) -> CompositeResult<T>,
{
    let outcome = version.parse::<ApiVersion>().and_then(|version| {
        let input: I = serde_json::from_value(body)?;
        compute(&input, version)
    });

    match outcome {
        Ok(results) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                error: None,
                results: Some(results),
            }),
        ),
        Err(e) => {
            let status = if e.is_input_error() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            log::warn!("request failed ({status}): {e}");
            (
                status,
                Json(ApiResponse {
                    success: false,
                    error: Some(e.to_string()),
                    results: None,
                }),
            )
        }
    }
}

async fn lamina_engineering_constants(
    Path(version): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    respond(&version, body, |input: &LaminaInput, v| {
        compute_lamina_engineering_constants(input, &v.conventions())
    })
}

async fn laminate_plate_properties(
    Path(version): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    respond(&version, body, |input: &StackInput, v| {
        compute_laminate_plate_properties(input, &v.conventions())
    })
}

async fn laminate_3d_properties(
    Path(version): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    respond(&version, body, |input: &StackInput, v| {
        compute_laminate_3d_properties(input, &v.conventions())
    })
}

async fn udfrc_properties(
    Path(version): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    respond(&version, body, |input: &UdfrcInput, v| {
        compute_udfrc_models(
            input,
            &v.micromechanics_models(),
            v.conventions().conditioning_tolerance,
        )
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ServerConfig::from_env()?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(
            "/api/:version/lamina-engineering-constants",
            post(lamina_engineering_constants),
        )
        .route(
            "/api/:version/laminate-plate-properties",
            post(laminate_plate_properties),
        )
        .route(
            "/api/:version/laminate-3d-properties",
            post(laminate_3d_properties),
        )
        .route("/api/:version/udfrc-properties", post(udfrc_properties))
        .layer(cors);

    let addr = config.addr()?;
    println!("Composite Solver Server listening on http://{}", addr);
    println!("  Health check: GET  /health");
    println!("  Lamina:       POST /api/{{v1,v2}}/lamina-engineering-constants");
    println!("  Plate:        POST /api/{{v1,v2}}/laminate-plate-properties");
    println!("  3D:           POST /api/{{v1,v2}}/laminate-3d-properties");
    println!("  UDFRC:        POST /api/{{v1,v2}}/udfrc-properties");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
