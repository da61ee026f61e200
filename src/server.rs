use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use draco_codec::prelude::ConfigType;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::codec::Codec;
use crate::pipeline::{self, GeoData};

pub const DEFAULT_MESH_PATH: &str = "build/compressed_mesh.drc";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Compressed mesh read on every request.
    pub mesh_path: PathBuf,
    /// Port on localhost.
    pub port: u16,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            mesh_path: PathBuf::from(DEFAULT_MESH_PATH),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoDataResponse {
    pub geo_data: GeoData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

struct AppState<C> {
    codec: Arc<C>,
    mesh_path: Arc<PathBuf>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            codec: Arc::clone(&self.codec),
            mesh_path: Arc::clone(&self.mesh_path),
        }
    }
}

/// Builds the router with its single route, `GET /`.
pub fn router<C>(codec: C, mesh_path: PathBuf) -> Router
    where C: Codec + Send + Sync + 'static
{
    let state = AppState {
        codec: Arc::new(codec),
        mesh_path: Arc::new(mesh_path),
    };
    Router::new()
        .route("/", get(get_geo_data::<C>))
        .with_state(state)
}

async fn get_geo_data<C>(State(state): State<AppState<C>>) -> Response
    where C: Codec + Send + Sync + 'static
{
    match pipeline::load_geo_data(state.codec.as_ref(), &state.mesh_path).await {
        Ok(geo_data) => Json(GeoDataResponse { geo_data }).into_response(),
        Err(err) => err.into_response(),
    }
}

impl IntoResponse for pipeline::Err {
    fn into_response(self) -> Response {
        warn!(error = %self, "request failed");
        let body = ErrorResponse { error: self.to_string() };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Binds to the configured port on localhost and serves until the process exits.
pub async fn serve<C>(codec: C, cfg: Config) -> std::io::Result<()>
    where C: Codec + Send + Sync + 'static
{
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, cfg.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(mesh = %cfg.mesh_path.display(), "Server is running on http://localhost:{}", listener.local_addr()?.port());
    axum::serve(listener, router(codec, cfg.mesh_path)).await
}
