//! 住院相关操作
//!
//! 住院记录本身不保存患者，患者取自引用该记录的最早一次就诊。

use chrono::NaiveDate;
use hospital_core::utils::Pagination;
use hospital_core::{ActiveAdmission, Admission, Page, Result};
use sqlx::PgConnection;

use crate::filter::{Filter, ListQuery};
use crate::models::{DbActiveAdmission, DbAdmission, NewAdmission};

const FIRST_VISIT_JOIN: &str = r#"
    LEFT JOIN LATERAL (
        SELECT v.visit_id, v.patient_id FROM visits v
        WHERE v.admission_id = a.admission_id
        ORDER BY v.visit_id
        LIMIT 1
    ) fv ON TRUE
    LEFT JOIN patients p ON p.patient_id = fv.patient_id
"#;

/// 在院列表过滤条件
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveFilter {
    pub ward_id: Option<i32>,
    pub dept_id: Option<i32>,
}

pub async fn find_by_id(conn: &mut PgConnection, admission_id: i32) -> Result<Option<Admission>> {
    let row = sqlx::query_as::<_, DbAdmission>(&format!(
        r#"
        SELECT a.admission_id, a.ward_id, fv.visit_id, fv.patient_id, p.name AS patient_name,
               a.bed_no, a.admission_date, a.discharge_date, a.admission_reason
        FROM admissions a
        {FIRST_VISIT_JOIN}
        WHERE a.admission_id = $1
        "#
    ))
    .bind(admission_id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Admission::from))
}

pub async fn exists(conn: &mut PgConnection, admission_id: i32) -> Result<bool> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM admissions WHERE admission_id = $1)")
            .bind(admission_id)
            .fetch_one(conn)
            .await?;
    Ok(exists)
}

/// 创建住院记录，返回新ID
pub async fn insert(conn: &mut PgConnection, new: &NewAdmission) -> Result<i32> {
    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO admissions (ward_id, bed_no, admission_date, admission_reason)
        VALUES ($1, $2, $3, $4)
        RETURNING admission_id
        "#,
    )
    .bind(new.ward_id)
    .bind(&new.bed_no)
    .bind(new.admission_date)
    .bind(&new.admission_reason)
    .fetch_one(conn)
    .await?;

    Ok(id)
}

/// 将尚未关联住院的就诊关联到住院记录
pub async fn link_visit(conn: &mut PgConnection, visit_id: i32, admission_id: i32) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE visits SET admission_id = $1 WHERE visit_id = $2 AND admission_id IS NULL",
    )
    .bind(admission_id)
    .bind(visit_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 办理出院
pub async fn discharge(
    conn: &mut PgConnection,
    admission_id: i32,
    discharge_date: NaiveDate,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE admissions SET discharge_date = $1 WHERE admission_id = $2 AND discharge_date IS NULL",
    )
    .bind(discharge_date)
    .bind(admission_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 分页查询在院患者
pub async fn list_active(
    conn: &mut PgConnection,
    filter: ActiveFilter,
    pagination: Pagination,
) -> Result<Page<ActiveAdmission>> {
    const SELECT: &str = "a.admission_id, fv.patient_id, p.name AS patient_name, \
         a.ward_id, w.ward_name, a.bed_no, a.admission_date";
    const FROM: &str = "admissions a JOIN wards w ON w.ward_id = a.ward_id \
         LEFT JOIN LATERAL (SELECT v.visit_id, v.patient_id FROM visits v \
         WHERE v.admission_id = a.admission_id ORDER BY v.visit_id LIMIT 1) fv ON TRUE \
         LEFT JOIN patients p ON p.patient_id = fv.patient_id";

    let page = ListQuery::new(SELECT, FROM)
        .count_from("admissions a JOIN wards w ON w.ward_id = a.ward_id")
        .filter(Filter::IsNull("a.discharge_date"))
        .filter_opt(filter.ward_id, |id| Filter::Eq("a.ward_id", id))
        .filter_opt(filter.dept_id, |id| Filter::Eq("w.dept_id", id))
        .order_by("a.admission_id")
        .fetch_page::<DbActiveAdmission>(conn, pagination)
        .await?;

    Ok(page.map(ActiveAdmission::from))
}
