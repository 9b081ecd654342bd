//! 医生相关操作

use hospital_core::utils::Pagination;
use hospital_core::{Doctor, DoctorBrief, Page, Result};
use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::filter::{Filter, ListQuery};
use crate::models::{DbDoctor, DoctorChanges, NewDoctor};

const DOCTOR_COLUMNS: &str = "doc.doctor_id, doc.name, doc.dept_id, dp.dept_name, doc.title, doc.phone";
const DOCTOR_FROM: &str = "doctors doc JOIN departments dp ON dp.dept_id = doc.dept_id";

/// 医生列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct DoctorFilter {
    pub dept_id: Option<i32>,
    pub title: Option<String>,
}

/// 根据ID查找医生，联查科室名称
pub async fn find_by_id(conn: &mut PgConnection, doctor_id: i32) -> Result<Option<Doctor>> {
    let row = sqlx::query_as::<_, DbDoctor>(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM {DOCTOR_FROM} WHERE doc.doctor_id = $1"
    ))
    .bind(doctor_id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Doctor::from))
}

pub async fn exists(conn: &mut PgConnection, doctor_id: i32) -> Result<bool> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM doctors WHERE doctor_id = $1)")
            .bind(doctor_id)
            .fetch_one(conn)
            .await?;
    Ok(exists)
}

/// 分页查询医生，可按科室和职称过滤
pub async fn list(
    conn: &mut PgConnection,
    filter: DoctorFilter,
    pagination: Pagination,
) -> Result<Page<Doctor>> {
    let page = ListQuery::new(DOCTOR_COLUMNS, DOCTOR_FROM)
        .filter_opt(filter.dept_id, |id| Filter::Eq("doc.dept_id", id))
        .filter_opt(filter.title, |t| Filter::Contains("doc.title", t))
        .order_by("doc.doctor_id")
        .fetch_page::<DbDoctor>(conn, pagination)
        .await?;

    Ok(page.map(Doctor::from))
}

/// 科室下的全部医生
pub async fn list_by_department(conn: &mut PgConnection, dept_id: i32) -> Result<Vec<DoctorBrief>> {
    let rows = sqlx::query_as::<_, DbDoctor>(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM {DOCTOR_FROM} WHERE doc.dept_id = $1 ORDER BY doc.doctor_id"
    ))
    .bind(dept_id)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(DoctorBrief::from).collect())
}

/// 创建医生，返回新ID
pub async fn insert(conn: &mut PgConnection, new: &NewDoctor) -> Result<i32> {
    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO doctors (name, dept_id, title, phone)
        VALUES ($1, $2, $3, $4)
        RETURNING doctor_id
        "#,
    )
    .bind(&new.name)
    .bind(new.dept_id)
    .bind(&new.title)
    .bind(&new.phone)
    .fetch_one(conn)
    .await?;

    Ok(id)
}

/// 更新医生，仅修改出现的字段
pub async fn update(conn: &mut PgConnection, doctor_id: i32, changes: &DoctorChanges) -> Result<bool> {
    if *changes == DoctorChanges::default() {
        return exists(conn, doctor_id).await;
    }

    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE doctors SET ");
    let mut set = qb.separated(", ");
    if let Some(name) = &changes.name {
        set.push("name = ").push_bind_unseparated(name.clone());
    }
    if let Some(dept_id) = changes.dept_id {
        set.push("dept_id = ").push_bind_unseparated(dept_id);
    }
    if let Some(title) = &changes.title {
        set.push("title = ").push_bind_unseparated(title.clone());
    }
    if let Some(phone) = &changes.phone {
        set.push("phone = ").push_bind_unseparated(phone.clone());
    }
    qb.push(" WHERE doctor_id = ").push_bind(doctor_id);

    let result = qb.build().execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

/// 关联的就诊记录数
pub async fn count_visits(conn: &mut PgConnection, doctor_id: i32) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits WHERE doctor_id = $1")
        .bind(doctor_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

pub async fn delete(conn: &mut PgConnection, doctor_id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM doctors WHERE doctor_id = $1")
        .bind(doctor_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
