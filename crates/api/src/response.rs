//! Success envelopes.

use axum::{Json, http::StatusCode};
use plantara_shared::types::{PageMeta, PageResponse};
use serde::Serialize;

/// `{ "success": true, "data": ... }`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always true.
    pub success: bool,
    /// Payload.
    pub data: T,
}

/// `{ "success": true, "data": [...], "meta": {...} }`
#[derive(Debug, Serialize)]
pub struct ListEnvelope<T> {
    /// Always true.
    pub success: bool,
    /// Items on this page.
    pub data: Vec<T>,
    /// Paging information.
    pub meta: PageMeta,
}

/// 200 with `data`.
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

/// 201 with `data`.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, ok(data))
}

/// 200 with one page of results.
pub fn page<T: Serialize>(page: PageResponse<T>) -> Json<ListEnvelope<T>> {
    Json(ListEnvelope {
        success: true,
        data: page.data,
        meta: page.meta,
    })
}

/// 200 with `{ "success": true, "message": ... }`.
pub fn message(text: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true, "message": text }))
}
