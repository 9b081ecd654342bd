//! 应用状态

use std::sync::Arc;

use hospital_database::DatabasePool;

use crate::metrics::HttpMetrics;

/// 各处理器共享的状态
#[derive(Clone)]
pub struct AppState {
    pub db: DatabasePool,
    pub metrics: Arc<HttpMetrics>,
    /// `pageSize` 上限
    pub max_page_size: i64,
}

impl AppState {
    pub fn new(db: DatabasePool, metrics: Arc<HttpMetrics>, max_page_size: i64) -> Self {
        Self {
            db,
            metrics,
            max_page_size,
        }
    }
}
