//! 患者相关操作

use hospital_core::utils::Pagination;
use hospital_core::{Page, Patient, PatientSummary, Result};
use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::filter::{Filter, ListQuery};
use crate::models::{DbPatient, NewPatient, PatientChanges};

const PATIENT_COLUMNS: &str = "p.patient_id, p.name, p.gender, p.birth_date, p.identity_no, p.phone";

pub async fn find_by_id(conn: &mut PgConnection, patient_id: i32) -> Result<Option<Patient>> {
    let row = sqlx::query_as::<_, DbPatient>(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients p WHERE p.patient_id = $1"
    ))
    .bind(patient_id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Patient::from))
}

pub async fn exists(conn: &mut PgConnection, patient_id: i32) -> Result<bool> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM patients WHERE patient_id = $1)")
            .bind(patient_id)
            .fetch_one(conn)
            .await?;
    Ok(exists)
}

/// 分页查询患者，按姓名包含匹配，最新登记的在前
pub async fn list(
    conn: &mut PgConnection,
    name: Option<String>,
    pagination: Pagination,
) -> Result<Page<PatientSummary>> {
    let page = ListQuery::new(PATIENT_COLUMNS, "patients p")
        .filter_opt(name, |n| Filter::Contains("p.name", n))
        .order_by("p.patient_id DESC")
        .fetch_page::<DbPatient>(conn, pagination)
        .await?;

    Ok(page.map(|row| Patient::from(row).into()))
}

/// 创建患者，身份证号唯一由数据库约束保证
pub async fn insert(conn: &mut PgConnection, new: &NewPatient) -> Result<Patient> {
    let row = sqlx::query_as::<_, DbPatient>(
        r#"
        INSERT INTO patients (name, gender, birth_date, identity_no, phone)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING patient_id, name, gender, birth_date, identity_no, phone
        "#,
    )
    .bind(&new.name)
    .bind(new.gender.as_str())
    .bind(new.birth_date)
    .bind(&new.identity_no)
    .bind(&new.phone)
    .fetch_one(conn)
    .await?;

    Ok(row.into())
}

/// 更新患者，仅修改出现的字段
pub async fn update(
    conn: &mut PgConnection,
    patient_id: i32,
    changes: &PatientChanges,
) -> Result<Option<Patient>> {
    if *changes == PatientChanges::default() {
        return find_by_id(conn, patient_id).await;
    }

    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE patients SET ");
    let mut set = qb.separated(", ");
    if let Some(name) = &changes.name {
        set.push("name = ").push_bind_unseparated(name.clone());
    }
    if let Some(gender) = changes.gender {
        set.push("gender = ").push_bind_unseparated(gender.as_str());
    }
    if let Some(birth_date) = changes.birth_date {
        set.push("birth_date = ").push_bind_unseparated(birth_date);
    }
    if let Some(phone) = &changes.phone {
        set.push("phone = ").push_bind_unseparated(phone.clone());
    }
    qb.push(" WHERE patient_id = ").push_bind(patient_id);
    qb.push(" RETURNING patient_id, name, gender, birth_date, identity_no, phone");

    let row = qb.build_query_as::<DbPatient>().fetch_optional(conn).await?;

    Ok(row.map(Patient::from))
}

/// 统计关联的就诊记录数与住院记录数
pub async fn count_related(conn: &mut PgConnection, patient_id: i32) -> Result<(i64, i64)> {
    let counts: (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COUNT(DISTINCT admission_id)
        FROM visits
        WHERE patient_id = $1
        "#,
    )
    .bind(patient_id)
    .fetch_one(conn)
    .await?;

    Ok(counts)
}

pub async fn delete(conn: &mut PgConnection, patient_id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM patients WHERE patient_id = $1")
        .bind(patient_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
