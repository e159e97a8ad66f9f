use crate::db;
use crate::errors::Error;
use crate::metrics::{API_FAILURES_TOTAL, INGEST_LATENCY_SECONDS, READINGS_TOTAL};
use crate::model::{IncomingReading, StoredReading};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::MySqlPool;
use std::time::Instant;
use tracing::{debug, error};

#[derive(Debug, Clone)]
struct AppState {
    pool: MySqlPool,
}

pub fn create_router(pool: MySqlPool) -> Router {
    let state = AppState { pool };

    Router::new()
        .route("/", get(index_page))
        .route("/admin", get(admin_page))
        .route("/api/enviar", post(enviar))
        .route("/api/datos", get(datos))
        .with_state(state)
}

async fn index_page() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

async fn admin_page() -> Html<&'static str> {
    Html(include_str!("../static/admin.html"))
}

async fn enviar(
    State(state): State<AppState>,
    Json(reading): Json<IncomingReading>,
) -> Result<impl IntoResponse, AppError> {
    debug!("reading received from {}", reading.id_vaca);

    let start = Instant::now();
    let mut conn = db::acquire_with_retry(&state.pool).await?;
    db::insert_reading(&mut conn, &reading).await?;

    INGEST_LATENCY_SECONDS.observe(start.elapsed().as_secs_f64());
    READINGS_TOTAL.inc();

    Ok((StatusCode::CREATED, Json(json!({"status": "ok"}))))
}

async fn datos(State(state): State<AppState>) -> Result<Json<Vec<StoredReading>>, AppError> {
    let mut conn = db::acquire_with_retry(&state.pool).await?;
    let rows = db::latest_readings(&mut conn).await?;
    Ok(Json(rows))
}

struct AppError(Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("API error: {}", self.0);
        API_FAILURES_TOTAL.inc();
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": self.0.to_string()})),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
