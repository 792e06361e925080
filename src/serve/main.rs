//! Export API server.
//!
//! Serves the generated per-list GeoJSON files to mapping frontends:
//! a sorted listing plus individual FeatureCollection documents.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Serve exported GeoJSON files over HTTP")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Directory holding the exported .geojson files
    #[arg(long, default_value = "output/geojson")]
    data_dir: PathBuf,
}

/// Application state shared across handlers
struct AppState {
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Placemark Export API");
    info!("Serving GeoJSON from {}", args.data_dir.display());

    let state = Arc::new(AppState {
        data_dir: args.data_dir,
    });

    // Build router
    let app = Router::new()
        .route("/lists", get(list_handler))
        .route("/lists/{name}", get(fetch_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Enumerate exported GeoJSON files, sorted alphabetically
async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    if !state.data_dir.exists() {
        return Err((
            StatusCode::NOT_FOUND,
            "Data directory not found".to_string(),
        ));
    }

    let mut entries = tokio::fs::read_dir(&state.data_dir).await.map_err(|e| {
        tracing::error!("Failed to read data dir: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
    {
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(".geojson") {
                files.push(name.to_string());
            }
        }
    }

    files.sort();
    Ok(Json(files))
}

/// Fetch one exported FeatureCollection by filename
async fn fetch_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // Only bare .geojson filenames are addressable
    if name.contains('/') || name.contains("..") || !name.ends_with(".geojson") {
        return Err((StatusCode::BAD_REQUEST, "Invalid file name".to_string()));
    }

    let path = state.data_dir.join(&name);
    let body = tokio::fs::read(&path)
        .await
        .map_err(|_| (StatusCode::NOT_FOUND, format!("No such list file: {}", name)))?;

    Ok(([(header::CONTENT_TYPE, "application/geo+json")], body))
}
