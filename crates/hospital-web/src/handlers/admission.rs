//! 住院处理器

use axum::extract::{Path, Query, State};
use hospital_core::{ActiveAdmission, Admission, HospitalError, Page};
use hospital_database::queries::{admission, visit, ward};
use tracing::{info, warn};

use super::DEFAULT_PAGE_SIZE;
use crate::dto::{ActiveAdmissionQuery, CreateAdmission, Discharge};
use crate::extract::JsonBody;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

fn admission_not_found(admission_id: i32) -> HospitalError {
    HospitalError::not_found(
        "ADMISSION_NOT_FOUND",
        format!("AdmissionID {admission_id} 未找到"),
    )
}

fn visit_already_admitted(visit_id: i32) -> HospitalError {
    HospitalError::bad_request(
        "VISIT_ALREADY_ADMITTED",
        format!("就诊记录 {visit_id} 已关联其他住院记录"),
    )
}

/// POST /admission
///
/// 锁定病房行后检查容量与床位，指定 `VisitID` 时在同一事务内关联就诊。
pub async fn create_admission(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateAdmission>,
) -> ApiResult<ApiResponse<Admission>> {
    let (new, visit_id) = body.validate()?;

    let mut tx = state.db.begin().await?;
    let locked = ward::lock(&mut tx, new.ward_id)
        .await?
        .ok_or_else(|| HospitalError::not_found("WARD_NOT_FOUND", "病房不存在"))?;

    let occupied = ward::count_active(&mut tx, locked.ward_id).await?;
    if occupied >= i64::from(locked.capacity) {
        warn!(ward_id = locked.ward_id, occupied, capacity = locked.capacity, "Ward is full");
        return Err(HospitalError::bad_request("WARD_FULL", "病房床位已满").into());
    }
    if ward::bed_occupied(&mut tx, locked.ward_id, &new.bed_no).await? {
        warn!(ward_id = locked.ward_id, bed_no = %new.bed_no, "Bed is occupied");
        return Err(HospitalError::bad_request(
            "BED_OCCUPIED",
            format!("床位 {} 已被占用", new.bed_no),
        )
        .into());
    }
    if let Some(visit_id) = visit_id {
        let linked = visit::find_by_id(&mut tx, visit_id)
            .await?
            .ok_or_else(|| HospitalError::not_found("VISIT_NOT_FOUND", "就诊记录不存在"))?;
        if let Some(existing) = linked.admission_id {
            warn!(visit_id, admission_id = existing, "Visit already linked to an admission");
            return Err(visit_already_admitted(visit_id).into());
        }
    }

    let admission_id = admission::insert(&mut tx, &new).await?;
    if let Some(visit_id) = visit_id {
        if !admission::link_visit(&mut tx, visit_id, admission_id).await? {
            return Err(visit_already_admitted(visit_id).into());
        }
    }
    let created = admission::find_by_id(&mut tx, admission_id)
        .await?
        .ok_or_else(|| admission_not_found(admission_id))?;
    tx.commit().await?;

    info!(admission_id, ward_id = created.ward_id, "Patient admitted");
    Ok(ApiResponse::created(created))
}

/// GET /admission/:id
pub async fn get_admission(
    State(state): State<AppState>,
    Path(admission_id): Path<i32>,
) -> ApiResult<ApiResponse<Admission>> {
    let mut conn = state.db.acquire().await?;
    let found = admission::find_by_id(&mut conn, admission_id)
        .await?
        .ok_or_else(|| admission_not_found(admission_id))?;
    Ok(ApiResponse::ok(found))
}

/// PUT /admission/:id/discharge
pub async fn discharge_admission(
    State(state): State<AppState>,
    Path(admission_id): Path<i32>,
    JsonBody(body): JsonBody<Discharge>,
) -> ApiResult<ApiResponse<Admission>> {
    let discharge_date = body.date()?;

    let mut tx = state.db.begin().await?;
    let current = admission::find_by_id(&mut tx, admission_id)
        .await?
        .ok_or_else(|| admission_not_found(admission_id))?;

    let already_discharged =
        || HospitalError::bad_request("ALREADY_DISCHARGED", "该住院记录已办理出院");
    if !current.is_active() {
        return Err(already_discharged().into());
    }
    if discharge_date < current.admission_date {
        return Err(HospitalError::bad_request(
            "INVALID_DISCHARGE_DATE",
            "DischargeDate 不能早于 AdmissionDate",
        )
        .into());
    }

    if !admission::discharge(&mut tx, admission_id, discharge_date).await? {
        return Err(already_discharged().into());
    }
    let updated = admission::find_by_id(&mut tx, admission_id)
        .await?
        .ok_or_else(|| admission_not_found(admission_id))?;
    tx.commit().await?;

    info!(admission_id, %discharge_date, "Patient discharged");
    Ok(ApiResponse::ok(updated))
}

/// GET /admission/active
pub async fn list_active_admissions(
    State(state): State<AppState>,
    Query(params): Query<ActiveAdmissionQuery>,
) -> ApiResult<ApiResponse<Page<ActiveAdmission>>> {
    let pagination = params
        .paging
        .pagination(DEFAULT_PAGE_SIZE, state.max_page_size)?;

    let mut conn = state.db.acquire().await?;
    let page = admission::list_active(&mut conn, params.filter(), pagination).await?;
    Ok(ApiResponse::ok(page))
}
