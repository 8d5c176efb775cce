//! HTTP handlers for the five RPC methods (§6).
//!
//! Each handler is a thin translation: decode the request, call the
//! matching `Allocator` method, map the result (or `AllocatorError`) to a
//! status code and an `ApiResponse` envelope. `Set` additionally triggers a
//! write dump on success, per §6.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use tracing::warn;

use crate::core::error::AllocatorError;
use crate::diagnostics;
use crate::types::{RegionId, TypeTag};

use super::dto::{ApiResponse, CreateRequest, CreateResponse, GetRequest, GetResponse, RefCountRequest, SetRequest};
use super::AppState;

/// Maps an `AllocatorError` to the status code the transport reports it
/// under (§7).
fn status_code(error: AllocatorError) -> StatusCode {
    match error {
        AllocatorError::OutOfMemory => StatusCode::INSUFFICIENT_STORAGE,
        AllocatorError::NotFound => StatusCode::NOT_FOUND,
        AllocatorError::UnknownType | AllocatorError::BadEncoding | AllocatorError::ZeroSize => {
            StatusCode::BAD_REQUEST
        }
        AllocatorError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
    }
}

fn error_response<T>(error: AllocatorError) -> (StatusCode, Json<ApiResponse<T>>) {
    (status_code(error), Json(ApiResponse::err(error.to_string())))
}

/// `POST /api/v1/regions` — `Create`.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateRequest>,
) -> (StatusCode, Json<ApiResponse<CreateResponse>>) {
    let type_tag = match TypeTag::from_wire(&request.type_tag) {
        Ok(type_tag) => type_tag,
        Err(error) => return error_response(error),
    };

    match state.allocator.allocate(type_tag, request.size) {
        Ok(id) => (StatusCode::CREATED, Json(ApiResponse::ok(CreateResponse { id: id.0 }))),
        Err(error) => error_response(error),
    }
}

/// `POST /api/v1/regions/set` — `Set`.
pub async fn set(
    State(state): State<AppState>,
    Json(request): Json<SetRequest>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    match state.allocator.write(RegionId(request.id), &request.value) {
        Ok(()) => {
            if let Err(error) = diagnostics::write_set_dump(&state.dump_folder, &state.allocator.snapshot()) {
                warn!(%error, "failed to write dump after Set");
            }
            (StatusCode::OK, Json(ApiResponse::ok(())))
        }
        Err(error) => error_response(error),
    }
}

/// `POST /api/v1/regions/get` — `Get`.
pub async fn get(
    State(state): State<AppState>,
    Json(request): Json<GetRequest>,
) -> (StatusCode, Json<ApiResponse<GetResponse>>) {
    match state.allocator.read(RegionId(request.id)) {
        Ok((_, value)) => (StatusCode::OK, Json(ApiResponse::ok(GetResponse { value }))),
        Err(error) => error_response(error),
    }
}

/// `POST /api/v1/regions/increase-ref-count` — `IncreaseRefCount`. Never
/// fails; a no-op on an unknown id (§7).
pub async fn increase_ref_count(
    State(state): State<AppState>,
    Json(request): Json<RefCountRequest>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    state.allocator.inc_ref(RegionId(request.id));
    (StatusCode::OK, Json(ApiResponse::ok(())))
}

/// `POST /api/v1/regions/decrease-ref-count` — `DecreaseRefCount`. Never
/// fails; a no-op on an unknown id (§7).
pub async fn decrease_ref_count(
    State(state): State<AppState>,
    Json(request): Json<RefCountRequest>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    state.allocator.dec_ref(RegionId(request.id));
    (StatusCode::OK, Json(ApiResponse::ok(())))
}

/// `GET /api/v1/health` — liveness probe, following this codebase's usual
/// health endpoint shape.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping_matches_error_taxonomy() {
        assert_eq!(status_code(AllocatorError::OutOfMemory), StatusCode::INSUFFICIENT_STORAGE);
        assert_eq!(status_code(AllocatorError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_code(AllocatorError::UnknownType), StatusCode::BAD_REQUEST);
        assert_eq!(status_code(AllocatorError::BadEncoding), StatusCode::BAD_REQUEST);
        assert_eq!(status_code(AllocatorError::ZeroSize), StatusCode::BAD_REQUEST);
        assert_eq!(status_code(AllocatorError::TooLarge), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
