//! 核心数据模型定义
//!
//! 字段名按照前端约定的 JSON 契约序列化（`DeptID`、`pageSize` 等）。

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 性别，存储与传输均使用中文
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "男")]
    Male,
    #[serde(rename = "女")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "男" => Ok(Gender::Male),
            "女" => Ok(Gender::Female),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

/// 科室
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(rename = "DeptID")]
    pub dept_id: i32,
    #[serde(rename = "DeptName")]
    pub dept_name: String,
    #[serde(rename = "Location")]
    pub location: Option<String>,
}

/// 科室列表项，附带医生数量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentSummary {
    #[serde(flatten)]
    pub department: Department,
    #[serde(rename = "DoctorNo")]
    pub doctor_no: i64,
}

/// 科室详情下的病房
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardBrief {
    #[serde(rename = "WardID")]
    pub ward_id: i32,
    #[serde(rename = "WardName")]
    pub ward_name: String,
    #[serde(rename = "Floor")]
    pub floor: Option<i32>,
    #[serde(rename = "Capacity")]
    pub capacity: i32,
}

/// 科室详情下的医生
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorBrief {
    #[serde(rename = "DoctorID")]
    pub doctor_id: i32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Phone")]
    pub phone: Option<String>,
}

/// 科室详情
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentDetail {
    #[serde(flatten)]
    pub department: Department,
    #[serde(rename = "Wards")]
    pub wards: Vec<WardBrief>,
    #[serde(rename = "Doctors")]
    pub doctors: Vec<DoctorBrief>,
}

/// 医生，附带所属科室名称
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Doctor {
    #[serde(rename = "DoctorID")]
    pub doctor_id: i32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "DeptID")]
    pub dept_id: i32,
    #[serde(rename = "DeptName")]
    pub dept_name: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Phone")]
    pub phone: Option<String>,
}

/// 患者
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patient {
    #[serde(rename = "PatientID")]
    pub patient_id: i32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Gender")]
    pub gender: Option<Gender>,
    #[serde(rename = "BirthDate")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "IdentityNo")]
    pub identity_no: String,
    #[serde(rename = "Phone")]
    pub phone: Option<String>,
}

/// 患者列表项，不含身份证号
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientSummary {
    #[serde(rename = "PatientID")]
    pub patient_id: i32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Gender")]
    pub gender: Option<Gender>,
    #[serde(rename = "BirthDate")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "Phone")]
    pub phone: Option<String>,
}

impl From<Patient> for PatientSummary {
    fn from(p: Patient) -> Self {
        Self {
            patient_id: p.patient_id,
            name: p.name,
            gender: p.gender,
            birth_date: p.birth_date,
            phone: p.phone,
        }
    }
}

/// 病房，附带所属科室名称
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ward {
    #[serde(rename = "WardID")]
    pub ward_id: i32,
    #[serde(rename = "WardName")]
    pub ward_name: String,
    #[serde(rename = "Floor")]
    pub floor: Option<i32>,
    #[serde(rename = "Capacity")]
    pub capacity: i32,
    #[serde(rename = "DeptID")]
    pub dept_id: i32,
    #[serde(rename = "DeptName")]
    pub dept_name: String,
}

/// 床位占用情况
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BedStatus {
    #[serde(rename = "AdmissionID")]
    pub admission_id: i32,
    #[serde(rename = "BedNo")]
    pub bed_no: String,
    #[serde(rename = "PatientID")]
    pub patient_id: Option<i32>,
    #[serde(rename = "PatientName")]
    pub patient_name: String,
}

/// 病房详情，含实时床位占用
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardDetail {
    #[serde(flatten)]
    pub ward: Ward,
    #[serde(rename = "OccupiedBeds")]
    pub occupied_beds: i64,
    #[serde(rename = "AvailableBeds")]
    pub available_beds: i64,
    #[serde(rename = "BedStatus")]
    pub bed_status: Vec<BedStatus>,
}

impl WardDetail {
    pub fn new(ward: Ward, bed_status: Vec<BedStatus>) -> Self {
        let occupied_beds = bed_status.len() as i64;
        let available_beds = (i64::from(ward.capacity) - occupied_beds).max(0);
        Self {
            ward,
            occupied_beds,
            available_beds,
            bed_status,
        }
    }
}

/// 住院记录
///
/// 患者通过引用该住院记录的就诊关联；`VisitID` 为最早的关联就诊。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Admission {
    #[serde(rename = "AdmissionID")]
    pub admission_id: i32,
    #[serde(rename = "WardID")]
    pub ward_id: i32,
    #[serde(rename = "VisitID")]
    pub visit_id: Option<i32>,
    #[serde(rename = "PatientID")]
    pub patient_id: Option<i32>,
    #[serde(rename = "PatientName")]
    pub patient_name: Option<String>,
    #[serde(rename = "BedNo")]
    pub bed_no: String,
    #[serde(rename = "AdmissionDate")]
    pub admission_date: NaiveDate,
    #[serde(rename = "DischargeDate")]
    pub discharge_date: Option<NaiveDate>,
    #[serde(rename = "AdmissionReason")]
    pub admission_reason: Option<String>,
}

impl Admission {
    /// 未出院即为在院
    pub fn is_active(&self) -> bool {
        self.discharge_date.is_none()
    }
}

/// 在院患者列表项
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveAdmission {
    #[serde(rename = "AdmissionID")]
    pub admission_id: i32,
    #[serde(rename = "PatientID")]
    pub patient_id: Option<i32>,
    #[serde(rename = "PatientName")]
    pub patient_name: Option<String>,
    #[serde(rename = "WardID")]
    pub ward_id: i32,
    #[serde(rename = "WardName")]
    pub ward_name: String,
    #[serde(rename = "BedNo")]
    pub bed_no: String,
    #[serde(rename = "AdmissionDate")]
    pub admission_date: NaiveDate,
}

/// 就诊记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Visit {
    #[serde(rename = "VisitID")]
    pub visit_id: i32,
    #[serde(rename = "PatientID")]
    pub patient_id: i32,
    #[serde(rename = "DoctorID")]
    pub doctor_id: i32,
    #[serde(rename = "AdmissionID")]
    pub admission_id: Option<i32>,
    #[serde(rename = "VisitDate")]
    pub visit_date: NaiveDate,
    #[serde(rename = "Complaint")]
    pub complaint: Option<String>,
    #[serde(rename = "Diagnosis")]
    pub diagnosis: Option<String>,
    #[serde(rename = "Prescription")]
    pub prescription: Option<String>,
    #[serde(rename = "Fee", with = "rust_decimal::serde::float")]
    pub fee: Decimal,
}

/// 就诊列表项，附带患者与医生姓名
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitSummary {
    #[serde(flatten)]
    pub visit: Visit,
    #[serde(rename = "PatientName")]
    pub patient_name: String,
    #[serde(rename = "DoctorName")]
    pub doctor_name: String,
}

/// 科室统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentStats {
    #[serde(rename = "DeptID")]
    pub dept_id: i32,
    #[serde(rename = "DeptName")]
    pub dept_name: String,
    #[serde(rename = "outpatientCount")]
    pub outpatient_count: i64,
    #[serde(rename = "inpatientCount")]
    pub inpatient_count: i64,
    /// 截断为整数元
    #[serde(rename = "totalRevenue")]
    pub total_revenue: i64,
}

/// 按月收入
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePeriod {
    #[serde(rename = "Period")]
    pub period: String,
    #[serde(rename = "Revenue", with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

/// 收入报表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueReport {
    /// 截断为整数元
    #[serde(rename = "Total")]
    pub total: i64,
    #[serde(rename = "Details")]
    pub details: Vec<RevenuePeriod>,
}

/// 医生工作量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorWorkload {
    #[serde(rename = "DoctorID")]
    pub doctor_id: i32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "visitCount")]
    pub visit_count: i64,
    #[serde(rename = "admissionCount")]
    pub admission_count: i64,
    #[serde(rename = "totalPatients")]
    pub total_patients: i64,
}

/// 分页结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub total: i64,
    pub page: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
    pub list: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            list: self.list.into_iter().map(f).collect(),
        }
    }
}

/// 金额统计值截断为整数
pub fn truncate_amount(amount: Decimal) -> i64 {
    use rust_decimal::prelude::ToPrimitive;
    amount.trunc().to_i64().unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gender_round_trip() {
        assert_eq!("男".parse::<Gender>().unwrap(), Gender::Male);
        assert!("male".parse::<Gender>().is_err());
        assert_eq!(serde_json::to_value(Gender::Female).unwrap(), json!("女"));
    }

    #[test]
    fn test_visit_serialization() {
        let visit = Visit {
            visit_id: 1,
            patient_id: 2,
            doctor_id: 3,
            admission_id: None,
            visit_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            complaint: Some("头痛".into()),
            diagnosis: Some("偏头痛".into()),
            prescription: Some("布洛芬".into()),
            fee: Decimal::new(4550, 2),
        };
        let value = serde_json::to_value(&visit).unwrap();
        assert_eq!(value["VisitDate"], json!("2024-01-05"));
        assert_eq!(value["Fee"], json!(45.5));
        assert_eq!(value["AdmissionID"], json!(null));
    }

    #[test]
    fn test_flattened_summary() {
        let summary = DepartmentSummary {
            department: Department {
                dept_id: 1,
                dept_name: "内科".into(),
                location: Some("A栋".into()),
            },
            doctor_no: 4,
        };
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"DeptID": 1, "DeptName": "内科", "Location": "A栋", "DoctorNo": 4})
        );
    }

    #[test]
    fn test_ward_detail_occupancy() {
        let ward = Ward {
            ward_id: 1,
            ward_name: "一病区".into(),
            floor: Some(3),
            capacity: 2,
            dept_id: 1,
            dept_name: "内科".into(),
        };
        let detail = WardDetail::new(ward.clone(), vec![]);
        assert_eq!(detail.occupied_beds, 0);
        assert_eq!(detail.available_beds, 2);

        let bed = BedStatus {
            admission_id: 7,
            bed_no: "01".into(),
            patient_id: None,
            patient_name: "未知".into(),
        };
        let detail = WardDetail::new(ward, vec![bed]);
        assert_eq!(detail.available_beds, 1);
    }

    #[test]
    fn test_truncate_amount() {
        assert_eq!(truncate_amount(Decimal::new(19999, 2)), 199);
        assert_eq!(truncate_amount(Decimal::ZERO), 0);
    }

    #[test]
    fn test_page_serialization() {
        let page = Page {
            total: 5,
            page: 1,
            page_size: 2,
            list: vec![1, 2],
        };
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({"total": 5, "page": 1, "pageSize": 2, "list": [1, 2]})
        );
    }
}
