use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::pipeline::{self, char_count, PipelineOptions};
use crate::server::AppState;
use crate::utils::ProxyError;

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translations: Vec<String>,
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.metrics.snapshot().await;
    let mut body = serde_json::to_value(&snapshot).unwrap_or_else(|_| json!({}));
    body["rate"] = json!({
        "perCallMaxChars": state.config.limits.max_call_chars,
        "cooldownPerIpMs": state.config.cooldown.per_ip_ms,
        "cooldownGlobalMs": state.config.cooldown.global_ms,
        "batchInterDelayMs": state.config.limits.inter_batch_delay_ms,
        "maxTotalChars": state.config.limits.max_total_chars,
    });
    Json(body)
}

pub async fn translate(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    let ip = client_ip(&headers, addr);
    let started = Instant::now();
    let request_id = Uuid::new_v4();

    if let Err(secs) = state.cooldown.check(&ip).await {
        state.metrics.note(&ip, 429, 0, 0).await;
        let body = Json(json!({ "error": format!("Too many requests. Cooldown {secs}s.") }));
        return with_retry_after((StatusCode::TOO_MANY_REQUESTS, body).into_response(), secs);
    }

    let texts = match parse_texts(&payload) {
        Some(texts) if !texts.is_empty() => texts,
        _ => {
            state.metrics.note(&ip, 400, 0, 0).await;
            return bad_request("texts must be a non-empty array");
        }
    };

    let target_lang = match payload.get("targetLang").and_then(Value::as_str) {
        Some(lang) if !lang.trim().is_empty() => lang.to_string(),
        _ => {
            state.metrics.note(&ip, 400, 0, 0).await;
            return bad_request("targetLang is required");
        }
    };

    let limits = &state.config.limits;
    let total_chars: usize = texts.iter().map(|t| char_count(t)).sum();
    if limits.max_total_chars > 0 && total_chars > limits.max_total_chars {
        state.metrics.note(&ip, 413, 0, total_chars).await;
        let body = Json(json!({
            "error": "Total input too large",
            "limit": limits.max_total_chars,
        }));
        return (StatusCode::PAYLOAD_TOO_LARGE, body).into_response();
    }

    let options = PipelineOptions {
        max_call_chars: limits.max_call_chars,
        inter_batch_delay: Duration::from_millis(limits.inter_batch_delay_ms),
    };

    let client = state.client.clone();
    let outcome = pipeline::translate_texts(&texts, &target_lang, &options, move |batch, lang| {
        let client = client.clone();
        async move { client.translate_batch(&batch, &lang).await }
    })
    .await;

    match outcome {
        Ok(outcome) => {
            state
                .metrics
                .note(&ip, 200, outcome.batch_count as u64, total_chars)
                .await;
            tracing::info!(
                request_id = %request_id,
                ip = %ip,
                texts = texts.len(),
                chars = total_chars,
                items = outcome.item_count,
                batches = outcome.batch_count,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "translate request served"
            );
            Json(TranslateResponse {
                translations: outcome.translations,
            })
            .into_response()
        }
        Err(err) => {
            let status = error_status(&err);
            state.metrics.note(&ip, status.as_u16(), 0, total_chars).await;
            tracing::warn!(
                request_id = %request_id,
                ip = %ip,
                status = status.as_u16(),
                error = %err,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "translate request failed"
            );
            error_response(status, err)
        }
    }
}

// Original input strings coerce the way the JS proxy did: null becomes the
// empty string, other scalars their JSON rendering.
fn parse_texts(payload: &Value) -> Option<Vec<String>> {
    let array = payload.get("texts")?.as_array()?;
    Some(
        array
            .iter()
            .map(|value| match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect(),
    )
}

fn client_ip(headers: &HeaderMap, addr: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}

fn error_status(err: &ProxyError) -> StatusCode {
    match err {
        ProxyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ProxyError::BatchCountMismatch { .. } => StatusCode::BAD_GATEWAY,
        ProxyError::Upstream { status, .. } => status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        ProxyError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, err: ProxyError) -> Response {
    let message = match &err {
        ProxyError::BatchCountMismatch { .. } => {
            "translation count mismatch in batch".to_string()
        }
        ProxyError::Upstream { message, .. } => message.clone(),
        other => other.to_string(),
    };
    let response = (status, Json(json!({ "error": message }))).into_response();
    match err.retry_after() {
        Some(secs) => with_retry_after(response, secs),
        None => response,
    }
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn with_retry_after(mut response: Response, secs: u64) -> Response {
    if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}
