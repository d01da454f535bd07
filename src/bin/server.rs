use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use cabinet_planner::{
    CabinetSpec, CutPiece, Error, LayoutResult, PackingResult, Plan, SheetStock,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

type ApiError = (StatusCode, Json<Vec<Error>>);

fn bad_request(errors: Vec<Error>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(errors))
}

#[derive(Deserialize, Serialize)]
struct PackRequest {
    pieces: Vec<CutPiece>,
    #[serde(default)]
    stock: SheetStock,
}

#[derive(Deserialize, Serialize)]
struct PlanRequest {
    cabinet: CabinetSpec,
    #[serde(default)]
    stock: SheetStock,
}

async fn layout(Json(spec): Json<CabinetSpec>) -> Result<Json<LayoutResult>, ApiError> {
    tracing::info!(
        body = serde_json::to_string(&spec).unwrap_or_default(),
        "POST /layout"
    );

    let result = cabinet_planner::resolve_and_build(&spec)
        .into_result()
        .map_err(bad_request)?;
    Ok(Json(result))
}

async fn pack(Json(req): Json<PackRequest>) -> Result<Json<PackingResult>, ApiError> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /pack"
    );

    let result = cabinet_planner::pack(&req.pieces, &req.stock).map_err(|e| bad_request(vec![e]))?;
    Ok(Json(result))
}

async fn plan(Json(req): Json<PlanRequest>) -> Result<Json<Plan>, ApiError> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /plan"
    );

    let plan = cabinet_planner::plan(&req.cabinet, &req.stock).map_err(bad_request)?;
    Ok(Json(plan))
}

#[tokio::main]
async fn main() {
    let _sentry = sentry::init((
        std::env::var("SENTRY_DSN").ok(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/layout", post(layout))
        .route("/pack", post(pack))
        .route("/plan", post(plan))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
