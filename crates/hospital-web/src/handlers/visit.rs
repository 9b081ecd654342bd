//! 就诊处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use hospital_core::validation::{FieldError, Validator};
use hospital_core::{HospitalError, Page, Visit, VisitSummary};
use hospital_database::queries::{admission, doctor, patient, visit};
use tracing::info;

use super::DEFAULT_PAGE_SIZE;
use crate::dto::{CreateVisit, UpdatePrescription, VisitQuery};
use crate::extract::JsonBody;
use crate::response::{no_content, ApiResponse, ApiResult};
use crate::state::AppState;

fn visit_not_found() -> HospitalError {
    HospitalError::not_found("VISIT_NOT_FOUND", "就诊记录不存在")
}

/// POST /visit
///
/// 格式错误先于引用检查返回；患者、医生、住院记录不存在时作为字段错误一并返回。
pub async fn create_visit(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateVisit>,
) -> ApiResult<ApiResponse<Visit>> {
    let new = body.validate()?;

    let mut tx = state.db.begin().await?;
    let mut v = Validator::new();
    if !patient::exists(&mut tx, new.patient_id).await? {
        v.push(FieldError::invalid("PatientID", "指定的患者不存在"));
    }
    if !doctor::exists(&mut tx, new.doctor_id).await? {
        v.push(FieldError::invalid("DoctorID", "指定的医生不存在"));
    }
    if let Some(admission_id) = new.admission_id {
        if !admission::exists(&mut tx, admission_id).await? {
            v.push(FieldError::invalid("AdmissionID", "指定的入院记录不存在"));
        }
    }
    v.finish()?;

    let created = visit::insert(&mut tx, &new).await?;
    tx.commit().await?;

    info!(visit_id = created.visit_id, patient_id = created.patient_id, "Visit created");
    Ok(ApiResponse::created(created))
}

/// GET /visit
pub async fn list_visits(
    State(state): State<AppState>,
    Query(params): Query<VisitQuery>,
) -> ApiResult<ApiResponse<Page<VisitSummary>>> {
    let pagination = params
        .paging
        .pagination(DEFAULT_PAGE_SIZE, state.max_page_size)?;
    let filter = params.filter()?;

    let mut conn = state.db.acquire().await?;
    let page = visit::list(&mut conn, filter, pagination).await?;
    Ok(ApiResponse::ok(page))
}

/// GET /visit/:id
pub async fn get_visit(
    State(state): State<AppState>,
    Path(visit_id): Path<i32>,
) -> ApiResult<ApiResponse<Visit>> {
    let mut conn = state.db.acquire().await?;
    let found = visit::find_by_id(&mut conn, visit_id)
        .await?
        .ok_or_else(visit_not_found)?;
    Ok(ApiResponse::ok(found))
}

/// PUT /visit/:id/prescription
pub async fn update_prescription(
    State(state): State<AppState>,
    Path(visit_id): Path<i32>,
    JsonBody(body): JsonBody<UpdatePrescription>,
) -> ApiResult<ApiResponse<Visit>> {
    let prescription = body.prescription()?;

    let mut tx = state.db.begin().await?;
    let updated = visit::update_prescription(&mut tx, visit_id, &prescription)
        .await?
        .ok_or_else(visit_not_found)?;
    tx.commit().await?;

    info!(visit_id, "Prescription updated");
    Ok(ApiResponse::ok(updated))
}

/// DELETE /visit/:id
pub async fn delete_visit(
    State(state): State<AppState>,
    Path(visit_id): Path<i32>,
) -> ApiResult<StatusCode> {
    let mut tx = state.db.begin().await?;
    if !visit::delete(&mut tx, visit_id).await? {
        return Err(visit_not_found().into());
    }
    tx.commit().await?;

    info!(visit_id, "Visit deleted");
    Ok(no_content())
}
