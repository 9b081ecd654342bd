//! 建表与索引
//!
//! 所有主键使用数据库自增标识列，应用层不再计算ID。

use hospital_core::error::{UQ_DEPT_NAME, UQ_IDENTITY_NO};
use hospital_core::Result;
use tracing::info;

use crate::connection::DatabasePool;

fn table_statements() -> Vec<String> {
    vec![
        // 科室表
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS departments (
                dept_id INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                dept_name VARCHAR(255) NOT NULL,
                location VARCHAR(255),
                CONSTRAINT {UQ_DEPT_NAME} UNIQUE (dept_name)
            )
        "#
        ),
        // 医生表
        r#"
            CREATE TABLE IF NOT EXISTS doctors (
                doctor_id INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                dept_id INTEGER NOT NULL REFERENCES departments(dept_id),
                title VARCHAR(255),
                phone VARCHAR(50)
            )
        "#
        .to_string(),
        // 患者表
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS patients (
                patient_id INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                gender VARCHAR(50),
                birth_date DATE,
                identity_no VARCHAR(255) NOT NULL,
                phone VARCHAR(50),
                CONSTRAINT {UQ_IDENTITY_NO} UNIQUE (identity_no)
            )
        "#
        ),
        // 病房表
        r#"
            CREATE TABLE IF NOT EXISTS wards (
                ward_id INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                ward_name VARCHAR(255) NOT NULL,
                floor INTEGER,
                capacity INTEGER NOT NULL CHECK (capacity > 0),
                dept_id INTEGER NOT NULL REFERENCES departments(dept_id)
            )
        "#
        .to_string(),
        // 住院表
        r#"
            CREATE TABLE IF NOT EXISTS admissions (
                admission_id INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                ward_id INTEGER NOT NULL REFERENCES wards(ward_id),
                bed_no VARCHAR(50) NOT NULL,
                admission_date DATE NOT NULL,
                discharge_date DATE,
                admission_reason TEXT,
                CHECK (discharge_date IS NULL OR discharge_date >= admission_date)
            )
        "#
        .to_string(),
        // 就诊表
        r#"
            CREATE TABLE IF NOT EXISTS visits (
                visit_id INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                patient_id INTEGER NOT NULL REFERENCES patients(patient_id),
                doctor_id INTEGER NOT NULL REFERENCES doctors(doctor_id),
                admission_id INTEGER REFERENCES admissions(admission_id),
                visit_date DATE NOT NULL,
                complaint TEXT,
                diagnosis TEXT,
                prescription TEXT,
                fee NUMERIC(10, 2) NOT NULL DEFAULT 0 CHECK (fee >= 0)
            )
        "#
        .to_string(),
    ]
}

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_doctors_dept_id ON doctors(dept_id)",
    "CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name)",
    "CREATE INDEX IF NOT EXISTS idx_wards_dept_id ON wards(dept_id)",
    "CREATE INDEX IF NOT EXISTS idx_admissions_ward_id ON admissions(ward_id)",
    "CREATE INDEX IF NOT EXISTS idx_admissions_active ON admissions(ward_id) WHERE discharge_date IS NULL",
    "CREATE INDEX IF NOT EXISTS idx_visits_patient_id ON visits(patient_id)",
    "CREATE INDEX IF NOT EXISTS idx_visits_doctor_id ON visits(doctor_id)",
    "CREATE INDEX IF NOT EXISTS idx_visits_admission_id ON visits(admission_id)",
    "CREATE INDEX IF NOT EXISTS idx_visits_visit_date ON visits(visit_date)",
];

/// 创建数据库表
pub async fn create_tables(db: &DatabasePool) -> Result<()> {
    let pool = db.pool();

    for statement in table_statements() {
        sqlx::query(&statement).execute(pool).await?;
    }

    // 创建索引以优化查询性能
    for index_sql in INDEXES {
        sqlx::query(index_sql).execute(pool).await?;
    }

    info!("Database tables created successfully");
    Ok(())
}
