//! HTTP endpoints.
//!
//! - `/`         : landing page
//! - `/healthz`  : liveness
//! - `/readyz`   : readiness (503 when draining)
//! - metrics path: upstream samples + self-metrics, text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::app_state::AppState;
use crate::obs::exposition::{Exposition, CONTENT_TYPE};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let path = &state.settings().metrics_path;
    Html(format!(
        "<html>\n\
         <head><title>GitHub Exporter</title></head>\n\
         <body>\n\
         <h1>GitHub Prometheus Metrics Exporter</h1>\n\
         <p><a href='{path}'>Metrics</a></p>\n\
         </body>\n\
         </html>\n"
    ))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_draining() {
        (StatusCode::SERVICE_UNAVAILABLE, "draining")
    } else {
        (StatusCode::OK, "ready")
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let mut exposition = Exposition::new();
    state.collector().collect(&mut exposition).await;

    let mut body = String::new();
    exposition.render(&mut body);
    state.metrics().render(&mut body);

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}
