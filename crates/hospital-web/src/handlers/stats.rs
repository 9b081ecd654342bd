//! 统计处理器
//!
//! 日期格式先于存在性检查校验；实体不存在时不做聚合。

use axum::extract::{Path, Query, State};
use hospital_core::{DepartmentStats, DoctorWorkload, HospitalError, RevenueReport};
use hospital_database::queries::{department, doctor};
use hospital_database::stats;

use crate::dto::DateRangeQuery;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /department/:id/stats，返回单元素列表
pub async fn department_stats(
    State(state): State<AppState>,
    Path(dept_id): Path<i32>,
    Query(range): Query<DateRangeQuery>,
) -> ApiResult<ApiResponse<Vec<DepartmentStats>>> {
    let window = range.window()?;

    let mut conn = state.db.acquire().await?;
    let dept = department::find_by_id(&mut conn, dept_id)
        .await?
        .ok_or_else(|| HospitalError::not_found("DEPT_NOT_FOUND", format!("DeptID {dept_id} 未找到")))?;

    let row = stats::department_stats(&mut conn, &dept, &window).await?;
    Ok(ApiResponse::ok(vec![row]))
}

/// GET /report/revenue
pub async fn revenue_report(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> ApiResult<ApiResponse<RevenueReport>> {
    let window = range.window()?;

    let mut conn = state.db.acquire().await?;
    let report = stats::revenue_report(&mut conn, &window).await?;
    Ok(ApiResponse::ok(report))
}

/// GET /doctor/:id/workload
pub async fn doctor_workload(
    State(state): State<AppState>,
    Path(doctor_id): Path<i32>,
    Query(range): Query<DateRangeQuery>,
) -> ApiResult<ApiResponse<DoctorWorkload>> {
    let window = range.window()?;

    let mut conn = state.db.acquire().await?;
    let found = doctor::find_by_id(&mut conn, doctor_id)
        .await?
        .ok_or_else(|| HospitalError::not_found("DOCTOR_NOT_FOUND", "医生不存在"))?;

    let workload = stats::doctor_workload(&mut conn, &found, &window).await?;
    Ok(ApiResponse::ok(workload))
}
