//! HTTP front end: the URL form and a JSON endpoint over the same pipeline.
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | `GET` | `/` | empty form |
//! | `POST` | `/` | result page, or the form again with "Invalid YouTube URL" |
//! | `GET` | `/api/report?url=` | report JSON, or `422` with an error object |

use crate::outputs::html::{INVALID_URL_MESSAGE, render_index, render_report};
use crate::pipeline::Pipeline;
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::{info, instrument, warn};

/// The single field submitted by the form and the JSON endpoint.
#[derive(Debug, Deserialize)]
pub struct UrlForm {
    pub url: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

async fn index() -> Html<String> {
    Html(render_index(None, None))
}

#[instrument(level = "info", skip_all, fields(url = %form.url))]
async fn submit(State(pipeline): State<Pipeline>, Form(form): Form<UrlForm>) -> Html<String> {
    match pipeline.report(&form.url).await {
        Ok(report) => Html(render_report(&report)),
        Err(e) => {
            warn!(error = %e, "Rendering form with error");
            Html(render_index(Some(INVALID_URL_MESSAGE), Some(&form.url)))
        }
    }
}

#[instrument(level = "info", skip_all, fields(url = %query.url))]
async fn api_report(State(pipeline): State<Pipeline>, Query(query): Query<UrlForm>) -> Response {
    match pipeline.report(&query.url).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            warn!(error = %e, "Report request rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: INVALID_URL_MESSAGE.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Build the router around a ready pipeline.
pub fn create_router(pipeline: Pipeline) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/api/report", get(api_report))
        .with_state(pipeline)
}

/// Bind `addr` and serve until the process receives Ctrl-C.
pub async fn serve(pipeline: Pipeline, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, create_router(pipeline))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
}
