//! 病房处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use hospital_core::{HospitalError, Page, Ward, WardDetail};
use hospital_database::queries::{department, ward};
use serde_json::json;
use sqlx::PgConnection;
use tracing::{info, warn};

use super::DEFAULT_PAGE_SIZE;
use crate::dto::{CreateWard, UpdateWard, WardQuery};
use crate::extract::JsonBody;
use crate::response::{no_content, ApiResponse, ApiResult};
use crate::state::AppState;

fn ward_not_found() -> HospitalError {
    HospitalError::not_found("WARD_NOT_FOUND", "病房不存在")
}

async fn load_detail(conn: &mut PgConnection, ward_id: i32) -> ApiResult<WardDetail> {
    let found = ward::find_by_id(conn, ward_id)
        .await?
        .ok_or_else(ward_not_found)?;
    let beds = ward::bed_status(conn, ward_id).await?;
    Ok(WardDetail::new(found, beds))
}

/// POST /ward
pub async fn create_ward(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateWard>,
) -> ApiResult<ApiResponse<Ward>> {
    let new = body.validate()?;

    let mut tx = state.db.begin().await?;
    let dept = department::find_by_id(&mut tx, new.dept_id)
        .await?
        .ok_or_else(|| HospitalError::not_found("DEPT_NOT_FOUND", "指定科室不存在"))?;

    let ward_id = ward::insert(&mut tx, &new).await?;
    tx.commit().await?;

    info!(ward_id, dept_id = dept.dept_id, "Ward created");
    Ok(ApiResponse::created(Ward {
        ward_id,
        ward_name: new.ward_name,
        floor: Some(new.floor),
        capacity: new.capacity,
        dept_id: dept.dept_id,
        dept_name: dept.dept_name,
    }))
}

/// GET /ward
pub async fn list_wards(
    State(state): State<AppState>,
    Query(params): Query<WardQuery>,
) -> ApiResult<ApiResponse<Page<Ward>>> {
    let pagination = params
        .paging
        .pagination(DEFAULT_PAGE_SIZE, state.max_page_size)?;

    let mut conn = state.db.acquire().await?;
    let page = ward::list(&mut conn, params.filter(), pagination).await?;
    Ok(ApiResponse::ok(page))
}

/// GET /ward/:id，含实时床位占用
pub async fn get_ward(
    State(state): State<AppState>,
    Path(ward_id): Path<i32>,
) -> ApiResult<ApiResponse<WardDetail>> {
    let mut conn = state.db.acquire().await?;
    let detail = load_detail(&mut conn, ward_id).await?;
    Ok(ApiResponse::ok(detail))
}

/// PUT /ward/:id，容量不能低于当前在院人数
pub async fn update_ward(
    State(state): State<AppState>,
    Path(ward_id): Path<i32>,
    JsonBody(body): JsonBody<UpdateWard>,
) -> ApiResult<ApiResponse<WardDetail>> {
    let changes = body.changes()?;

    let mut tx = state.db.begin().await?;
    if ward::lock(&mut tx, ward_id).await?.is_none() {
        return Err(ward_not_found().into());
    }
    if let Some(dept_id) = changes.dept_id {
        if department::find_by_id(&mut tx, dept_id).await?.is_none() {
            return Err(HospitalError::not_found("DEPT_NOT_FOUND", "指定科室不存在").into());
        }
    }
    if let Some(capacity) = changes.capacity {
        let occupied = ward::count_active(&mut tx, ward_id).await?;
        if i64::from(capacity) < occupied {
            warn!(ward_id, capacity, occupied, "Capacity below occupancy");
            return Err(HospitalError::bad_request(
                "CAPACITY_BELOW_OCCUPANCY",
                format!("床位容量不能小于当前在院人数{occupied}"),
            )
            .into());
        }
    }

    ward::update(&mut tx, ward_id, &changes).await?;
    let detail = load_detail(&mut tx, ward_id).await?;
    tx.commit().await?;

    info!(ward_id, "Ward updated");
    Ok(ApiResponse::ok(detail))
}

/// DELETE /ward/:id，存在住院记录时不可删除
pub async fn delete_ward(
    State(state): State<AppState>,
    Path(ward_id): Path<i32>,
) -> ApiResult<StatusCode> {
    let mut tx = state.db.begin().await?;
    if ward::lock(&mut tx, ward_id).await?.is_none() {
        return Err(ward_not_found().into());
    }

    let admissions = ward::count_admissions(&mut tx, ward_id).await?;
    if admissions > 0 {
        warn!(ward_id, admissions, "Ward still has admission records");
        return Err(HospitalError::HasRelatedRecords {
            code: "HAS_ADMISSION_RECORDS",
            message: "存在关联的住院记录，不可删除".to_string(),
            details: json!({"relatedAdmissions": admissions}),
        }
        .into());
    }

    ward::delete(&mut tx, ward_id).await?;
    tx.commit().await?;

    info!(ward_id, "Ward deleted");
    Ok(no_content())
}
