//! 科室处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use hospital_core::{Department, DepartmentDetail, DepartmentSummary, HospitalError, Page};
use hospital_database::queries::department;
use serde_json::json;
use tracing::{info, warn};

use super::DEFAULT_PAGE_SIZE;
use crate::dto::{CreateDepartment, PageParams, UpdateDepartment};
use crate::extract::JsonBody;
use crate::response::{no_content, ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /department
pub async fn create_department(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateDepartment>,
) -> ApiResult<ApiResponse<Department>> {
    let new = body.validate()?;

    let mut tx = state.db.begin().await?;
    let created = department::insert(&mut tx, &new).await?;
    tx.commit().await?;

    info!(dept_id = created.dept_id, dept_name = %created.dept_name, "Department created");
    Ok(ApiResponse::created(created))
}

/// GET /department
pub async fn list_departments(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<ApiResponse<Page<DepartmentSummary>>> {
    let pagination = params.pagination(DEFAULT_PAGE_SIZE, state.max_page_size)?;

    let mut conn = state.db.acquire().await?;
    let page = department::list(&mut conn, pagination).await?;
    Ok(ApiResponse::ok(page))
}

/// GET /department/:id
pub async fn get_department(
    State(state): State<AppState>,
    Path(dept_id): Path<i32>,
) -> ApiResult<ApiResponse<DepartmentDetail>> {
    let mut conn = state.db.acquire().await?;
    let detail = department::detail(&mut conn, dept_id)
        .await?
        .ok_or_else(|| HospitalError::not_found("DEPT_NOT_FOUND", "科室不存在"))?;
    Ok(ApiResponse::ok(detail))
}

/// PUT /department/:id
pub async fn update_department(
    State(state): State<AppState>,
    Path(dept_id): Path<i32>,
    JsonBody(body): JsonBody<UpdateDepartment>,
) -> ApiResult<ApiResponse<Department>> {
    let changes = body.changes()?;

    let mut tx = state.db.begin().await?;
    let updated = department::update(&mut tx, dept_id, &changes)
        .await?
        .ok_or_else(|| HospitalError::not_found("DEPT_NOT_EXIST", "科室ID不存在"))?;
    tx.commit().await?;

    info!(dept_id, "Department updated");
    Ok(ApiResponse::ok(updated))
}

/// DELETE /department/:id
pub async fn delete_department(
    State(state): State<AppState>,
    Path(dept_id): Path<i32>,
) -> ApiResult<StatusCode> {
    let mut tx = state.db.begin().await?;
    if department::find_by_id(&mut tx, dept_id).await?.is_none() {
        return Err(HospitalError::not_found("DEPT_NOT_FOUND", "科室不存在").into());
    }

    let (doctors, wards) = department::count_related(&mut tx, dept_id).await?;
    if doctors > 0 || wards > 0 {
        warn!(dept_id, doctors, wards, "Department still has related records");
        return Err(HospitalError::HasRelatedRecords {
            code: "HAS_RELATED_RECORDS",
            message: "存在关联的医生或病房，不可删除".to_string(),
            details: json!({"relatedDoctors": doctors, "relatedWards": wards}),
        }
        .into());
    }

    department::delete(&mut tx, dept_id).await?;
    tx.commit().await?;

    info!(dept_id, "Department deleted");
    Ok(no_content())
}
