//! 患者处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use hospital_core::{HospitalError, Page, Patient, PatientSummary};
use hospital_database::queries::patient;
use serde_json::json;
use tracing::{info, warn};

use super::PATIENT_PAGE_SIZE;
use crate::dto::{CreatePatient, PatientQuery, UpdatePatient};
use crate::extract::JsonBody;
use crate::response::{no_content, ApiResponse, ApiResult};
use crate::state::AppState;

fn patient_not_found() -> HospitalError {
    HospitalError::not_found("PATIENT_NOT_FOUND", "患者不存在")
}

/// POST /patient，身份证号重复返回 409
pub async fn create_patient(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePatient>,
) -> ApiResult<ApiResponse<Patient>> {
    let new = body.validate()?;

    let mut tx = state.db.begin().await?;
    let created = patient::insert(&mut tx, &new).await?;
    tx.commit().await?;

    info!(patient_id = created.patient_id, "Patient created");
    Ok(ApiResponse::created(created))
}

/// GET /patient，列表不返回身份证号
pub async fn list_patients(
    State(state): State<AppState>,
    Query(params): Query<PatientQuery>,
) -> ApiResult<ApiResponse<Page<PatientSummary>>> {
    let pagination = params
        .paging
        .pagination(PATIENT_PAGE_SIZE, state.max_page_size)?;

    let mut conn = state.db.acquire().await?;
    let page = patient::list(&mut conn, params.name_filter(), pagination).await?;
    Ok(ApiResponse::ok(page))
}

/// GET /patient/:id
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<i32>,
) -> ApiResult<ApiResponse<Patient>> {
    let mut conn = state.db.acquire().await?;
    let found = patient::find_by_id(&mut conn, patient_id)
        .await?
        .ok_or_else(patient_not_found)?;
    Ok(ApiResponse::ok(found))
}

/// PUT /patient/:id
pub async fn update_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<i32>,
    JsonBody(body): JsonBody<UpdatePatient>,
) -> ApiResult<ApiResponse<Patient>> {
    let changes = body.changes()?;

    let mut tx = state.db.begin().await?;
    let updated = patient::update(&mut tx, patient_id, &changes)
        .await?
        .ok_or_else(patient_not_found)?;
    tx.commit().await?;

    info!(patient_id, "Patient updated");
    Ok(ApiResponse::ok(updated))
}

/// DELETE /patient/:id
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<i32>,
) -> ApiResult<StatusCode> {
    let mut tx = state.db.begin().await?;
    if !patient::exists(&mut tx, patient_id).await? {
        return Err(patient_not_found().into());
    }

    let (visits, admissions) = patient::count_related(&mut tx, patient_id).await?;
    if visits > 0 || admissions > 0 {
        warn!(patient_id, visits, admissions, "Patient still has related records");
        return Err(HospitalError::HasRelatedRecords {
            code: "HAS_RELATED_RECORDS",
            message: "存在关联的就诊或住院记录，不可删除".to_string(),
            details: json!({"relatedVisits": visits, "relatedAdmissions": admissions}),
        }
        .into());
    }

    patient::delete(&mut tx, patient_id).await?;
    tx.commit().await?;

    info!(patient_id, "Patient deleted");
    Ok(no_content())
}
