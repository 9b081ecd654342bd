//! 病房相关操作

use hospital_core::utils::Pagination;
use hospital_core::{BedStatus, Page, Result, Ward, WardBrief};
use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::filter::{Filter, ListQuery};
use crate::models::{DbBedStatus, DbWard, NewWard, WardChanges};

const WARD_COLUMNS: &str = "w.ward_id, w.ward_name, w.floor, w.capacity, w.dept_id, d.dept_name";
const WARD_FROM: &str = "wards w JOIN departments d ON d.dept_id = w.dept_id";

/// 病房列表过滤条件
#[derive(Debug, Clone, Copy, Default)]
pub struct WardFilter {
    pub dept_id: Option<i32>,
    pub floor: Option<i32>,
}

pub async fn find_by_id(conn: &mut PgConnection, ward_id: i32) -> Result<Option<Ward>> {
    let row = sqlx::query_as::<_, DbWard>(&format!(
        "SELECT {WARD_COLUMNS} FROM {WARD_FROM} WHERE w.ward_id = $1"
    ))
    .bind(ward_id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Ward::from))
}

/// 锁定病房行直到事务结束，串行化同一病房的入院
pub async fn lock(conn: &mut PgConnection, ward_id: i32) -> Result<Option<Ward>> {
    let row = sqlx::query_as::<_, DbWard>(&format!(
        "SELECT {WARD_COLUMNS} FROM {WARD_FROM} WHERE w.ward_id = $1 FOR UPDATE OF w"
    ))
    .bind(ward_id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Ward::from))
}

pub async fn list(
    conn: &mut PgConnection,
    filter: WardFilter,
    pagination: Pagination,
) -> Result<Page<Ward>> {
    let page = ListQuery::new(WARD_COLUMNS, WARD_FROM)
        .filter_opt(filter.dept_id, |id| Filter::Eq("w.dept_id", id))
        .filter_opt(filter.floor, |f| Filter::Eq("w.floor", f))
        .order_by("w.ward_id")
        .fetch_page::<DbWard>(conn, pagination)
        .await?;

    Ok(page.map(Ward::from))
}

/// 科室下的全部病房
pub async fn list_by_department(conn: &mut PgConnection, dept_id: i32) -> Result<Vec<WardBrief>> {
    let rows = sqlx::query_as::<_, DbWard>(&format!(
        "SELECT {WARD_COLUMNS} FROM {WARD_FROM} WHERE w.dept_id = $1 ORDER BY w.ward_id"
    ))
    .bind(dept_id)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(WardBrief::from).collect())
}

/// 创建病房，返回新ID
pub async fn insert(conn: &mut PgConnection, new: &NewWard) -> Result<i32> {
    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO wards (ward_name, floor, capacity, dept_id)
        VALUES ($1, $2, $3, $4)
        RETURNING ward_id
        "#,
    )
    .bind(&new.ward_name)
    .bind(new.floor)
    .bind(new.capacity)
    .bind(new.dept_id)
    .fetch_one(conn)
    .await?;

    Ok(id)
}

/// 更新病房，仅修改出现的字段
pub async fn update(conn: &mut PgConnection, ward_id: i32, changes: &WardChanges) -> Result<bool> {
    if *changes == WardChanges::default() {
        return Ok(find_by_id(conn, ward_id).await?.is_some());
    }

    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE wards SET ");
    let mut set = qb.separated(", ");
    if let Some(name) = &changes.ward_name {
        set.push("ward_name = ").push_bind_unseparated(name.clone());
    }
    if let Some(floor) = changes.floor {
        set.push("floor = ").push_bind_unseparated(floor);
    }
    if let Some(capacity) = changes.capacity {
        set.push("capacity = ").push_bind_unseparated(capacity);
    }
    if let Some(dept_id) = changes.dept_id {
        set.push("dept_id = ").push_bind_unseparated(dept_id);
    }
    qb.push(" WHERE ward_id = ").push_bind(ward_id);

    let result = qb.build().execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

/// 在院床位，患者取自关联的最早一次就诊
pub async fn bed_status(conn: &mut PgConnection, ward_id: i32) -> Result<Vec<BedStatus>> {
    let rows = sqlx::query_as::<_, DbBedStatus>(
        r#"
        SELECT a.admission_id, a.bed_no, fv.patient_id, p.name AS patient_name
        FROM admissions a
        LEFT JOIN LATERAL (
            SELECT v.patient_id FROM visits v
            WHERE v.admission_id = a.admission_id
            ORDER BY v.visit_id
            LIMIT 1
        ) fv ON TRUE
        LEFT JOIN patients p ON p.patient_id = fv.patient_id
        WHERE a.ward_id = $1 AND a.discharge_date IS NULL
        ORDER BY a.bed_no, a.admission_id
        "#,
    )
    .bind(ward_id)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(BedStatus::from).collect())
}

/// 在院人数
pub async fn count_active(conn: &mut PgConnection, ward_id: i32) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM admissions WHERE ward_id = $1 AND discharge_date IS NULL",
    )
    .bind(ward_id)
    .fetch_one(conn)
    .await?;
    Ok(count)
}

/// 床位是否已被在院患者占用
pub async fn bed_occupied(conn: &mut PgConnection, ward_id: i32, bed_no: &str) -> Result<bool> {
    let occupied: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM admissions
            WHERE ward_id = $1 AND bed_no = $2 AND discharge_date IS NULL
        )
        "#,
    )
    .bind(ward_id)
    .bind(bed_no)
    .fetch_one(conn)
    .await?;
    Ok(occupied)
}

/// 全部住院记录数（含已出院）
pub async fn count_admissions(conn: &mut PgConnection, ward_id: i32) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admissions WHERE ward_id = $1")
        .bind(ward_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

pub async fn delete(conn: &mut PgConnection, ward_id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM wards WHERE ward_id = $1")
        .bind(ward_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
