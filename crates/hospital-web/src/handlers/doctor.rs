//! 医生处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use hospital_core::{Doctor, HospitalError, Page};
use hospital_database::queries::{department, doctor};
use hospital_database::NewDoctor;
use serde_json::json;
use tracing::{info, warn};

use super::DEFAULT_PAGE_SIZE;
use crate::dto::{CreateDoctor, DoctorQuery, UpdateDoctor};
use crate::extract::JsonBody;
use crate::response::{no_content, ApiResponse, ApiResult};
use crate::state::AppState;

fn doctor_not_found() -> HospitalError {
    HospitalError::not_found("DOCTOR_NOT_FOUND", "医生不存在")
}

/// POST /doctor，按科室名称关联科室
pub async fn create_doctor(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateDoctor>,
) -> ApiResult<ApiResponse<Doctor>> {
    let draft = body.validate()?;

    let mut tx = state.db.begin().await?;
    let dept = department::find_by_name(&mut tx, &draft.dept_name)
        .await?
        .ok_or_else(|| HospitalError::not_found("DEPT_NOT_EXIST", "指定科室不存在"))?;

    let new = NewDoctor {
        name: draft.name,
        dept_id: dept.dept_id,
        title: draft.title,
        phone: draft.phone,
    };
    let doctor_id = doctor::insert(&mut tx, &new).await?;
    tx.commit().await?;

    info!(doctor_id, dept_id = dept.dept_id, "Doctor created");
    Ok(ApiResponse::created(Doctor {
        doctor_id,
        name: new.name,
        dept_id: dept.dept_id,
        dept_name: dept.dept_name,
        title: new.title,
        phone: new.phone,
    }))
}

/// GET /doctor
pub async fn list_doctors(
    State(state): State<AppState>,
    Query(params): Query<DoctorQuery>,
) -> ApiResult<ApiResponse<Page<Doctor>>> {
    let pagination = params
        .paging
        .pagination(DEFAULT_PAGE_SIZE, state.max_page_size)?;

    let mut conn = state.db.acquire().await?;
    let page = doctor::list(&mut conn, params.filter(), pagination).await?;
    Ok(ApiResponse::ok(page))
}

/// GET /doctor/:id
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<i32>,
) -> ApiResult<ApiResponse<Doctor>> {
    let mut conn = state.db.acquire().await?;
    let found = doctor::find_by_id(&mut conn, doctor_id)
        .await?
        .ok_or_else(doctor_not_found)?;
    Ok(ApiResponse::ok(found))
}

/// PUT /doctor/:id
pub async fn update_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<i32>,
    JsonBody(body): JsonBody<UpdateDoctor>,
) -> ApiResult<ApiResponse<Doctor>> {
    let changes = body.changes()?;

    let mut tx = state.db.begin().await?;
    if !doctor::exists(&mut tx, doctor_id).await? {
        return Err(doctor_not_found().into());
    }
    if let Some(dept_id) = changes.dept_id {
        if department::find_by_id(&mut tx, dept_id).await?.is_none() {
            return Err(HospitalError::not_found("DEPT_NOT_EXIST", "科室不存在").into());
        }
    }

    doctor::update(&mut tx, doctor_id, &changes).await?;
    let updated = doctor::find_by_id(&mut tx, doctor_id)
        .await?
        .ok_or_else(doctor_not_found)?;
    tx.commit().await?;

    info!(doctor_id, "Doctor updated");
    Ok(ApiResponse::ok(updated))
}

/// DELETE /doctor/:id
pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<i32>,
) -> ApiResult<StatusCode> {
    let mut tx = state.db.begin().await?;
    if !doctor::exists(&mut tx, doctor_id).await? {
        return Err(doctor_not_found().into());
    }

    let visits = doctor::count_visits(&mut tx, doctor_id).await?;
    if visits > 0 {
        warn!(doctor_id, visits, "Doctor still has visit records");
        return Err(HospitalError::HasRelatedRecords {
            code: "HAS_VISIT_RECORDS",
            message: "存在关联就诊记录，不可删除".to_string(),
            details: json!({"relatedVisits": visits}),
        }
        .into());
    }

    doctor::delete(&mut tx, doctor_id).await?;
    tx.commit().await?;

    info!(doctor_id, "Doctor deleted");
    Ok(no_content())
}
