//! 科室相关操作

use hospital_core::utils::Pagination;
use hospital_core::{Department, DepartmentDetail, DepartmentSummary, Page, Result};
use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::filter::ListQuery;
use crate::models::{DbDepartment, DbDepartmentSummary, DepartmentChanges, NewDepartment};
use crate::queries::{doctor, ward};

/// 根据ID查找科室
pub async fn find_by_id(conn: &mut PgConnection, dept_id: i32) -> Result<Option<Department>> {
    let row = sqlx::query_as::<_, DbDepartment>(
        "SELECT dept_id, dept_name, location FROM departments WHERE dept_id = $1",
    )
    .bind(dept_id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Department::from))
}

/// 根据名称查找科室
pub async fn find_by_name(conn: &mut PgConnection, dept_name: &str) -> Result<Option<Department>> {
    let row = sqlx::query_as::<_, DbDepartment>(
        "SELECT dept_id, dept_name, location FROM departments WHERE dept_name = $1",
    )
    .bind(dept_name)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Department::from))
}

/// 分页列出科室及医生数量
pub async fn list(conn: &mut PgConnection, pagination: Pagination) -> Result<Page<DepartmentSummary>> {
    let page = ListQuery::new(
        "d.dept_id, d.dept_name, d.location, COUNT(doc.doctor_id) AS doctor_no",
        "departments d LEFT JOIN doctors doc ON doc.dept_id = d.dept_id",
    )
    .count_from("departments d")
    .group_by("d.dept_id")
    .order_by("d.dept_id")
    .fetch_page::<DbDepartmentSummary>(conn, pagination)
    .await?;

    Ok(page.map(DepartmentSummary::from))
}

/// 科室详情，包含病房和医生
pub async fn detail(conn: &mut PgConnection, dept_id: i32) -> Result<Option<DepartmentDetail>> {
    let Some(department) = find_by_id(conn, dept_id).await? else {
        return Ok(None);
    };
    let wards = ward::list_by_department(conn, dept_id).await?;
    let doctors = doctor::list_by_department(conn, dept_id).await?;

    Ok(Some(DepartmentDetail {
        department,
        wards,
        doctors,
    }))
}

/// 创建科室，名称唯一由数据库约束保证
pub async fn insert(conn: &mut PgConnection, new: &NewDepartment) -> Result<Department> {
    let row = sqlx::query_as::<_, DbDepartment>(
        r#"
        INSERT INTO departments (dept_name, location)
        VALUES ($1, $2)
        RETURNING dept_id, dept_name, location
        "#,
    )
    .bind(&new.dept_name)
    .bind(&new.location)
    .fetch_one(conn)
    .await?;

    Ok(row.into())
}

/// 更新科室，仅修改出现的字段
pub async fn update(
    conn: &mut PgConnection,
    dept_id: i32,
    changes: &DepartmentChanges,
) -> Result<Option<Department>> {
    if *changes == DepartmentChanges::default() {
        return find_by_id(conn, dept_id).await;
    }

    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE departments SET ");
    let mut set = qb.separated(", ");
    if let Some(name) = &changes.dept_name {
        set.push("dept_name = ").push_bind_unseparated(name.clone());
    }
    if let Some(location) = &changes.location {
        set.push("location = ").push_bind_unseparated(location.clone());
    }
    qb.push(" WHERE dept_id = ").push_bind(dept_id);
    qb.push(" RETURNING dept_id, dept_name, location");

    let row = qb
        .build_query_as::<DbDepartment>()
        .fetch_optional(conn)
        .await?;

    Ok(row.map(Department::from))
}

/// 统计关联的医生与病房数量
pub async fn count_related(conn: &mut PgConnection, dept_id: i32) -> Result<(i64, i64)> {
    let counts: (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM doctors WHERE dept_id = $1),
            (SELECT COUNT(*) FROM wards WHERE dept_id = $1)
        "#,
    )
    .bind(dept_id)
    .fetch_one(conn)
    .await?;

    Ok(counts)
}

pub async fn delete(conn: &mut PgConnection, dept_id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM departments WHERE dept_id = $1")
        .bind(dept_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
