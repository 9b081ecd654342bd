//! 数据库模型

use chrono::NaiveDate;
use hospital_core::models::*;
use rust_decimal::Decimal;
use sqlx::FromRow;

// 数据库表模型 - 使用FromRow trait用于SQL查询

/// 科室表
#[derive(Debug, FromRow)]
pub struct DbDepartment {
    pub dept_id: i32,
    pub dept_name: String,
    pub location: Option<String>,
}

impl From<DbDepartment> for Department {
    fn from(row: DbDepartment) -> Self {
        Department {
            dept_id: row.dept_id,
            dept_name: row.dept_name,
            location: row.location,
        }
    }
}

/// 科室列表行，附带医生计数
#[derive(Debug, FromRow)]
pub struct DbDepartmentSummary {
    pub dept_id: i32,
    pub dept_name: String,
    pub location: Option<String>,
    pub doctor_no: i64,
}

impl From<DbDepartmentSummary> for DepartmentSummary {
    fn from(row: DbDepartmentSummary) -> Self {
        DepartmentSummary {
            department: Department {
                dept_id: row.dept_id,
                dept_name: row.dept_name,
                location: row.location,
            },
            doctor_no: row.doctor_no,
        }
    }
}

/// 医生表联查科室名称
#[derive(Debug, FromRow)]
pub struct DbDoctor {
    pub doctor_id: i32,
    pub name: String,
    pub dept_id: i32,
    pub dept_name: String,
    pub title: Option<String>,
    pub phone: Option<String>,
}

impl From<DbDoctor> for Doctor {
    fn from(row: DbDoctor) -> Self {
        Doctor {
            doctor_id: row.doctor_id,
            name: row.name,
            dept_id: row.dept_id,
            dept_name: row.dept_name,
            title: row.title,
            phone: row.phone,
        }
    }
}

impl From<DbDoctor> for DoctorBrief {
    fn from(row: DbDoctor) -> Self {
        DoctorBrief {
            doctor_id: row.doctor_id,
            name: row.name,
            title: row.title,
            phone: row.phone,
        }
    }
}

/// 患者表
#[derive(Debug, FromRow)]
pub struct DbPatient {
    pub patient_id: i32,
    pub name: String,
    pub gender: Option<String>, // 存储为字符串，转换为Gender枚举
    pub birth_date: Option<NaiveDate>,
    pub identity_no: String,
    pub phone: Option<String>,
}

impl From<DbPatient> for Patient {
    fn from(row: DbPatient) -> Self {
        Patient {
            patient_id: row.patient_id,
            name: row.name,
            gender: row.gender.and_then(|g| g.parse().ok()),
            birth_date: row.birth_date,
            identity_no: row.identity_no,
            phone: row.phone,
        }
    }
}

/// 病房表联查科室名称
#[derive(Debug, FromRow)]
pub struct DbWard {
    pub ward_id: i32,
    pub ward_name: String,
    pub floor: Option<i32>,
    pub capacity: i32,
    pub dept_id: i32,
    pub dept_name: String,
}

impl From<DbWard> for Ward {
    fn from(row: DbWard) -> Self {
        Ward {
            ward_id: row.ward_id,
            ward_name: row.ward_name,
            floor: row.floor,
            capacity: row.capacity,
            dept_id: row.dept_id,
            dept_name: row.dept_name,
        }
    }
}

impl From<DbWard> for WardBrief {
    fn from(row: DbWard) -> Self {
        WardBrief {
            ward_id: row.ward_id,
            ward_name: row.ward_name,
            floor: row.floor,
            capacity: row.capacity,
        }
    }
}

/// 床位占用行
#[derive(Debug, FromRow)]
pub struct DbBedStatus {
    pub admission_id: i32,
    pub bed_no: String,
    pub patient_id: Option<i32>,
    pub patient_name: Option<String>,
}

impl From<DbBedStatus> for BedStatus {
    fn from(row: DbBedStatus) -> Self {
        BedStatus {
            admission_id: row.admission_id,
            bed_no: row.bed_no,
            patient_id: row.patient_id,
            patient_name: row.patient_name.unwrap_or_else(|| "未知".to_string()),
        }
    }
}

/// 住院表，联查首个关联就诊与患者
#[derive(Debug, FromRow)]
pub struct DbAdmission {
    pub admission_id: i32,
    pub ward_id: i32,
    pub visit_id: Option<i32>,
    pub patient_id: Option<i32>,
    pub patient_name: Option<String>,
    pub bed_no: String,
    pub admission_date: NaiveDate,
    pub discharge_date: Option<NaiveDate>,
    pub admission_reason: Option<String>,
}

impl From<DbAdmission> for Admission {
    fn from(row: DbAdmission) -> Self {
        Admission {
            admission_id: row.admission_id,
            ward_id: row.ward_id,
            visit_id: row.visit_id,
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            bed_no: row.bed_no,
            admission_date: row.admission_date,
            discharge_date: row.discharge_date,
            admission_reason: row.admission_reason,
        }
    }
}

/// 在院患者行
#[derive(Debug, FromRow)]
pub struct DbActiveAdmission {
    pub admission_id: i32,
    pub patient_id: Option<i32>,
    pub patient_name: Option<String>,
    pub ward_id: i32,
    pub ward_name: String,
    pub bed_no: String,
    pub admission_date: NaiveDate,
}

impl From<DbActiveAdmission> for ActiveAdmission {
    fn from(row: DbActiveAdmission) -> Self {
        ActiveAdmission {
            admission_id: row.admission_id,
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            ward_id: row.ward_id,
            ward_name: row.ward_name,
            bed_no: row.bed_no,
            admission_date: row.admission_date,
        }
    }
}

/// 就诊表
#[derive(Debug, FromRow)]
pub struct DbVisit {
    pub visit_id: i32,
    pub patient_id: i32,
    pub doctor_id: i32,
    pub admission_id: Option<i32>,
    pub visit_date: NaiveDate,
    pub complaint: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub fee: Decimal,
}

impl From<DbVisit> for Visit {
    fn from(row: DbVisit) -> Self {
        Visit {
            visit_id: row.visit_id,
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            admission_id: row.admission_id,
            visit_date: row.visit_date,
            complaint: row.complaint,
            diagnosis: row.diagnosis,
            prescription: row.prescription,
            fee: row.fee,
        }
    }
}

/// 就诊列表行，附带患者与医生姓名
#[derive(Debug, FromRow)]
pub struct DbVisitSummary {
    #[sqlx(flatten)]
    pub visit: DbVisit,
    pub patient_name: String,
    pub doctor_name: String,
}

impl From<DbVisitSummary> for VisitSummary {
    fn from(row: DbVisitSummary) -> Self {
        VisitSummary {
            visit: row.visit.into(),
            patient_name: row.patient_name,
            doctor_name: row.doctor_name,
        }
    }
}

// 插入模型 - 用于创建新记录

/// 新科室
#[derive(Debug, Clone, PartialEq)]
pub struct NewDepartment {
    pub dept_name: String,
    pub location: Option<String>,
}

/// 新医生
#[derive(Debug, Clone, PartialEq)]
pub struct NewDoctor {
    pub name: String,
    pub dept_id: i32,
    pub title: Option<String>,
    pub phone: Option<String>,
}

/// 新患者
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub name: String,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub identity_no: String,
    pub phone: Option<String>,
}

/// 新病房
#[derive(Debug, Clone, PartialEq)]
pub struct NewWard {
    pub ward_name: String,
    pub floor: i32,
    pub capacity: i32,
    pub dept_id: i32,
}

/// 新住院记录
#[derive(Debug, Clone, PartialEq)]
pub struct NewAdmission {
    pub ward_id: i32,
    pub bed_no: String,
    pub admission_date: NaiveDate,
    pub admission_reason: String,
}

/// 新就诊记录
#[derive(Debug, Clone, PartialEq)]
pub struct NewVisit {
    pub patient_id: i32,
    pub doctor_id: i32,
    pub admission_id: Option<i32>,
    pub visit_date: NaiveDate,
    pub complaint: String,
    pub diagnosis: String,
    pub prescription: String,
    pub fee: Decimal,
}

// 更新模型 - 仅包含请求中出现的字段

/// 科室更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepartmentChanges {
    pub dept_name: Option<String>,
    pub location: Option<Option<String>>,
}

/// 医生更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorChanges {
    pub name: Option<String>,
    pub dept_id: Option<i32>,
    pub title: Option<Option<String>>,
    pub phone: Option<Option<String>>,
}

/// 患者更新，身份证号不可修改
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientChanges {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub phone: Option<Option<String>>,
}

/// 病房更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WardChanges {
    pub ward_name: Option<String>,
    pub floor: Option<i32>,
    pub capacity: Option<i32>,
    pub dept_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_gender_mapping() {
        let row = DbPatient {
            patient_id: 1,
            name: "李四".into(),
            gender: Some("女".into()),
            birth_date: None,
            identity_no: "110101199001011234".into(),
            phone: None,
        };
        assert_eq!(Patient::from(row).gender, Some(Gender::Female));

        let row = DbPatient {
            patient_id: 2,
            name: "王五".into(),
            gender: Some("unknown".into()),
            birth_date: None,
            identity_no: "110101199001011235".into(),
            phone: None,
        };
        assert_eq!(Patient::from(row).gender, None);
    }

    #[test]
    fn test_bed_status_unknown_patient() {
        let row = DbBedStatus {
            admission_id: 3,
            bed_no: "12".into(),
            patient_id: None,
            patient_name: None,
        };
        let bed = BedStatus::from(row);
        assert_eq!(bed.patient_name, "未知");
    }
}
