//! 健康检查

use axum::extract::State;
use serde_json::{json, Value};

use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /health，检查数据库连通性
pub async fn health(State(state): State<AppState>) -> ApiResult<ApiResponse<Value>> {
    state.db.ping().await?;

    Ok(ApiResponse::ok(json!({
        "status": "healthy",
        "database": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    })))
}
