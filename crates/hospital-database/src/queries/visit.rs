//! 就诊相关操作

use hospital_core::utils::{DateWindow, Pagination};
use hospital_core::{Page, Result, Visit, VisitSummary};
use sqlx::PgConnection;

use crate::filter::{Filter, ListQuery};
use crate::models::{DbVisit, DbVisitSummary, NewVisit};

const VISIT_COLUMNS: &str = "visit_id, patient_id, doctor_id, admission_id, visit_date, \
     complaint, diagnosis, prescription, fee";

/// 就诊列表过滤条件
#[derive(Debug, Clone, Copy, Default)]
pub struct VisitFilter {
    pub patient_id: Option<i32>,
    pub doctor_id: Option<i32>,
    pub window: DateWindow,
}

pub async fn find_by_id(conn: &mut PgConnection, visit_id: i32) -> Result<Option<Visit>> {
    let row = sqlx::query_as::<_, DbVisit>(&format!(
        "SELECT {VISIT_COLUMNS} FROM visits WHERE visit_id = $1"
    ))
    .bind(visit_id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Visit::from))
}

/// 分页查询就诊记录，附带患者与医生姓名
pub async fn list(
    conn: &mut PgConnection,
    filter: VisitFilter,
    pagination: Pagination,
) -> Result<Page<VisitSummary>> {
    let page = ListQuery::new(
        "v.visit_id, v.patient_id, v.doctor_id, v.admission_id, v.visit_date, \
         v.complaint, v.diagnosis, v.prescription, v.fee, \
         p.name AS patient_name, doc.name AS doctor_name",
        "visits v JOIN patients p ON p.patient_id = v.patient_id \
         JOIN doctors doc ON doc.doctor_id = v.doctor_id",
    )
    .filter_opt(filter.patient_id, |id| Filter::Eq("v.patient_id", id))
    .filter_opt(filter.doctor_id, |id| Filter::Eq("v.doctor_id", id))
    .filter_opt(filter.window.start, |d| Filter::OnOrAfter("v.visit_date", d))
    .filter_opt(filter.window.end, |d| Filter::OnOrBefore("v.visit_date", d))
    .order_by("v.visit_id")
    .fetch_page::<DbVisitSummary>(conn, pagination)
    .await?;

    Ok(page.map(VisitSummary::from))
}

/// 创建就诊记录
pub async fn insert(conn: &mut PgConnection, new: &NewVisit) -> Result<Visit> {
    let row = sqlx::query_as::<_, DbVisit>(&format!(
        r#"
        INSERT INTO visits (patient_id, doctor_id, admission_id, visit_date,
                            complaint, diagnosis, prescription, fee)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {VISIT_COLUMNS}
        "#
    ))
    .bind(new.patient_id)
    .bind(new.doctor_id)
    .bind(new.admission_id)
    .bind(new.visit_date)
    .bind(&new.complaint)
    .bind(&new.diagnosis)
    .bind(&new.prescription)
    .bind(new.fee)
    .fetch_one(conn)
    .await?;

    Ok(row.into())
}

/// 更新处方
pub async fn update_prescription(
    conn: &mut PgConnection,
    visit_id: i32,
    prescription: &str,
) -> Result<Option<Visit>> {
    let row = sqlx::query_as::<_, DbVisit>(&format!(
        "UPDATE visits SET prescription = $1 WHERE visit_id = $2 RETURNING {VISIT_COLUMNS}"
    ))
    .bind(prescription)
    .bind(visit_id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Visit::from))
}

pub async fn delete(conn: &mut PgConnection, visit_id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM visits WHERE visit_id = $1")
        .bind(visit_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
