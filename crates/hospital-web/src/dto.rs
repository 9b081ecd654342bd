//! 请求数据结构与校验
//!
//! 请求体字段统一接收为 [`Scalar`]，兼容字符串和数字两种写法。创建请求收集全部字段错误，
//! 更新请求只校验出现的字段，遇到第一个错误即返回。

use chrono::NaiveDate;
use hospital_core::utils::{parse_query_int, DateWindow, Pagination};
use hospital_core::validation::{self as rules, FieldError, Scalar, Validator};
use hospital_core::validation::{NAME_MAX_LEN, TEXT_MAX_LEN};
use hospital_core::Result;
use hospital_database::{
    DepartmentChanges, DoctorChanges, NewAdmission, NewDepartment, NewPatient, NewVisit, NewWard,
    PatientChanges, WardChanges,
};
use serde::Deserialize;

/// 床号最大长度
const BED_NO_MAX_LEN: usize = 50;
/// 医生联系电话最大长度
const DOCTOR_PHONE_MAX_LEN: usize = 50;

/// 不限长度的必填文本（主诉、诊断、处方、入院原因）
fn required_note(field: &str, value: Option<&Scalar>, label: &str) -> std::result::Result<String, FieldError> {
    rules::required_text(field, value, label, usize::MAX)
}

fn optional_integer(
    field: &str,
    value: Option<&Scalar>,
    label: &str,
) -> std::result::Result<Option<i32>, FieldError> {
    match value {
        None => Ok(None),
        Some(v) => rules::integer(field, Some(v), label).map(Some),
    }
}

/// 字段出现时才校验
fn present<T>(
    value: &Option<Scalar>,
    rule: impl FnOnce(Option<&Scalar>) -> std::result::Result<T, FieldError>,
) -> std::result::Result<Option<T>, FieldError> {
    value.as_ref().map(|v| rule(Some(v))).transpose()
}

fn with_code(err: FieldError, code: &str) -> FieldError {
    FieldError {
        code: code.to_string(),
        ..err
    }
}

// ---------------------------------------------------------------- 科室

#[derive(Debug, Default, Deserialize)]
pub struct CreateDepartment {
    #[serde(rename = "DeptName")]
    pub dept_name: Option<Scalar>,
    #[serde(rename = "Location")]
    pub location: Option<Scalar>,
}

impl CreateDepartment {
    pub fn validate(&self) -> Result<NewDepartment> {
        let mut v = Validator::new();
        let dept_name = v.check(rules::required_text(
            "DeptName",
            self.dept_name.as_ref(),
            "科室名称",
            NAME_MAX_LEN,
        ));
        let location = v.check(rules::optional_text(
            "Location",
            self.location.as_ref(),
            "科室位置",
            TEXT_MAX_LEN,
        ));

        match (dept_name, location) {
            (Some(dept_name), Some(location)) => Ok(NewDepartment { dept_name, location }),
            _ => Err(v.into_error()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDepartment {
    #[serde(rename = "DeptName")]
    pub dept_name: Option<Scalar>,
    #[serde(rename = "Location")]
    pub location: Option<Scalar>,
}

impl UpdateDepartment {
    pub fn changes(&self) -> std::result::Result<DepartmentChanges, FieldError> {
        Ok(DepartmentChanges {
            dept_name: present(&self.dept_name, |v| {
                rules::required_text("DeptName", v, "科室名称", NAME_MAX_LEN)
            })?,
            location: present(&self.location, |v| {
                rules::optional_text("Location", v, "科室位置", TEXT_MAX_LEN)
            })?,
        })
    }
}

// ---------------------------------------------------------------- 医生

/// 通过科室名称指定所属科室
#[derive(Debug, Default, Deserialize)]
pub struct CreateDoctor {
    #[serde(rename = "Name")]
    pub name: Option<Scalar>,
    #[serde(rename = "DeptName")]
    pub dept_name: Option<Scalar>,
    #[serde(rename = "Title")]
    pub title: Option<Scalar>,
    #[serde(rename = "Phone")]
    pub phone: Option<Scalar>,
}

/// 校验通过、尚未解析科室的医生
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorDraft {
    pub name: String,
    pub dept_name: String,
    pub title: Option<String>,
    pub phone: Option<String>,
}

impl CreateDoctor {
    pub fn validate(&self) -> Result<DoctorDraft> {
        let mut v = Validator::new();
        let name = v.check(rules::required_text("Name", self.name.as_ref(), "姓名", NAME_MAX_LEN));
        let dept_name = v.check(rules::required_text(
            "DeptName",
            self.dept_name.as_ref(),
            "科室名称",
            NAME_MAX_LEN,
        ));
        let title = v.check(rules::optional_text("Title", self.title.as_ref(), "职称", TEXT_MAX_LEN));
        let phone = v.check(rules::optional_text(
            "Phone",
            self.phone.as_ref(),
            "联系电话",
            DOCTOR_PHONE_MAX_LEN,
        ));

        match (name, dept_name, title, phone) {
            (Some(name), Some(dept_name), Some(title), Some(phone)) => Ok(DoctorDraft {
                name,
                dept_name,
                title,
                phone,
            }),
            _ => Err(v.into_error()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDoctor {
    #[serde(rename = "Name")]
    pub name: Option<Scalar>,
    #[serde(rename = "DeptID")]
    pub dept_id: Option<Scalar>,
    #[serde(rename = "Title")]
    pub title: Option<Scalar>,
    #[serde(rename = "Phone")]
    pub phone: Option<Scalar>,
}

impl UpdateDoctor {
    pub fn changes(&self) -> std::result::Result<DoctorChanges, FieldError> {
        Ok(DoctorChanges {
            name: present(&self.name, |v| rules::required_text("Name", v, "姓名", NAME_MAX_LEN))?,
            dept_id: present(&self.dept_id, |v| rules::integer("DeptID", v, "科室ID"))?,
            title: present(&self.title, |v| rules::optional_text("Title", v, "职称", TEXT_MAX_LEN))?,
            phone: present(&self.phone, |v| {
                rules::optional_text("Phone", v, "联系电话", DOCTOR_PHONE_MAX_LEN)
            })?,
        })
    }
}

// ---------------------------------------------------------------- 患者

#[derive(Debug, Default, Deserialize)]
pub struct CreatePatient {
    #[serde(rename = "Name")]
    pub name: Option<Scalar>,
    #[serde(rename = "Gender")]
    pub gender: Option<Scalar>,
    #[serde(rename = "BirthDate")]
    pub birth_date: Option<Scalar>,
    #[serde(rename = "IdentityNo")]
    pub identity_no: Option<Scalar>,
    #[serde(rename = "Phone")]
    pub phone: Option<Scalar>,
}

impl CreatePatient {
    pub fn validate(&self) -> Result<NewPatient> {
        let mut v = Validator::new();
        let name = v.check(rules::required_text("Name", self.name.as_ref(), "姓名", NAME_MAX_LEN));
        let gender = v.check(rules::gender("Gender", self.gender.as_ref()));
        let identity_no = v.check(rules::identity_no("IdentityNo", self.identity_no.as_ref()));
        let birth_date = v.check(rules::optional_date("BirthDate", self.birth_date.as_ref(), "出生日期"));
        let phone = v.check(rules::phone("Phone", self.phone.as_ref()));

        match (name, gender, identity_no, birth_date, phone) {
            (Some(name), Some(gender), Some(identity_no), Some(birth_date), Some(phone)) => {
                Ok(NewPatient {
                    name,
                    gender,
                    birth_date,
                    identity_no,
                    phone,
                })
            }
            _ => Err(v.into_error()),
        }
    }
}

/// 身份证号不可修改，请求中出现时忽略
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePatient {
    #[serde(rename = "Name")]
    pub name: Option<Scalar>,
    #[serde(rename = "Gender")]
    pub gender: Option<Scalar>,
    #[serde(rename = "BirthDate")]
    pub birth_date: Option<Scalar>,
    #[serde(rename = "Phone")]
    pub phone: Option<Scalar>,
}

impl UpdatePatient {
    pub fn changes(&self) -> std::result::Result<PatientChanges, FieldError> {
        Ok(PatientChanges {
            name: present(&self.name, |v| rules::required_text("Name", v, "姓名", NAME_MAX_LEN))?,
            gender: present(&self.gender, |v| rules::gender("Gender", v))?,
            birth_date: present(&self.birth_date, |v| {
                rules::optional_date("BirthDate", v, "出生日期")
                    .map_err(|e| with_code(e, "INVALID_DATE_FORMAT"))
            })?,
            phone: present(&self.phone, |v| rules::phone("Phone", v))?,
        })
    }
}

// ---------------------------------------------------------------- 病房

#[derive(Debug, Default, Deserialize)]
pub struct CreateWard {
    #[serde(rename = "WardName")]
    pub ward_name: Option<Scalar>,
    #[serde(rename = "Floor")]
    pub floor: Option<Scalar>,
    #[serde(rename = "Capacity")]
    pub capacity: Option<Scalar>,
    #[serde(rename = "DeptID")]
    pub dept_id: Option<Scalar>,
}

impl CreateWard {
    pub fn validate(&self) -> Result<NewWard> {
        let mut v = Validator::new();
        let ward_name = v.check(rules::required_text(
            "WardName",
            self.ward_name.as_ref(),
            "病房名称",
            NAME_MAX_LEN,
        ));
        let floor = v.check(rules::integer("Floor", self.floor.as_ref(), "楼层"));
        let capacity = v.check(rules::positive_integer("Capacity", self.capacity.as_ref(), "床位容量"));
        let dept_id = v.check(rules::integer("DeptID", self.dept_id.as_ref(), "科室ID"));

        match (ward_name, floor, capacity, dept_id) {
            (Some(ward_name), Some(floor), Some(capacity), Some(dept_id)) => Ok(NewWard {
                ward_name,
                floor,
                capacity,
                dept_id,
            }),
            _ => Err(v.into_error()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateWard {
    #[serde(rename = "WardName")]
    pub ward_name: Option<Scalar>,
    #[serde(rename = "Floor")]
    pub floor: Option<Scalar>,
    #[serde(rename = "Capacity")]
    pub capacity: Option<Scalar>,
    #[serde(rename = "DeptID")]
    pub dept_id: Option<Scalar>,
}

impl UpdateWard {
    pub fn changes(&self) -> std::result::Result<WardChanges, FieldError> {
        Ok(WardChanges {
            ward_name: present(&self.ward_name, |v| {
                rules::required_text("WardName", v, "病房名称", NAME_MAX_LEN)
            })?,
            floor: present(&self.floor, |v| rules::integer("Floor", v, "楼层"))?,
            capacity: present(&self.capacity, |v| rules::positive_integer("Capacity", v, "床位容量"))?,
            dept_id: present(&self.dept_id, |v| rules::integer("DeptID", v, "科室ID"))?,
        })
    }
}

// ---------------------------------------------------------------- 住院

#[derive(Debug, Default, Deserialize)]
pub struct CreateAdmission {
    #[serde(rename = "WardID")]
    pub ward_id: Option<Scalar>,
    #[serde(rename = "BedNo")]
    pub bed_no: Option<Scalar>,
    #[serde(rename = "AdmissionDate")]
    pub admission_date: Option<Scalar>,
    #[serde(rename = "AdmissionReason")]
    pub admission_reason: Option<Scalar>,
    #[serde(rename = "VisitID")]
    pub visit_id: Option<Scalar>,
}

impl CreateAdmission {
    /// 返回新住院记录与需要关联的就诊ID
    pub fn validate(&self) -> Result<(NewAdmission, Option<i32>)> {
        let mut v = Validator::new();
        let ward_id = v.check(rules::integer("WardID", self.ward_id.as_ref(), "病区ID"));
        let bed_no = v.check(rules::required_text(
            "BedNo",
            self.bed_no.as_ref(),
            "床号",
            BED_NO_MAX_LEN,
        ));
        let admission_date = v.check(rules::required_date(
            "AdmissionDate",
            self.admission_date.as_ref(),
            "入院日期",
        ));
        let admission_reason = v.check(required_note(
            "AdmissionReason",
            self.admission_reason.as_ref(),
            "入院原因",
        ));
        let visit_id = v.check(optional_integer("VisitID", self.visit_id.as_ref(), "就诊ID"));

        match (ward_id, bed_no, admission_date, admission_reason, visit_id) {
            (Some(ward_id), Some(bed_no), Some(admission_date), Some(admission_reason), Some(visit_id)) => {
                Ok((
                    NewAdmission {
                        ward_id,
                        bed_no,
                        admission_date,
                        admission_reason,
                    },
                    visit_id,
                ))
            }
            _ => Err(v.into_error()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Discharge {
    #[serde(rename = "DischargeDate")]
    pub discharge_date: Option<Scalar>,
}

impl Discharge {
    pub fn date(&self) -> std::result::Result<NaiveDate, FieldError> {
        if self.discharge_date.is_none() {
            return Err(FieldError::new(
                "DischargeDate",
                "INVALID_DISCHARGE_DATE",
                "DischargeDate 参数是必需的",
            ));
        }
        rules::required_date("DischargeDate", self.discharge_date.as_ref(), "出院日期")
            .map_err(|e| with_code(e, "INVALID_DATE_FORMAT"))
    }
}

// ---------------------------------------------------------------- 就诊

#[derive(Debug, Default, Deserialize)]
pub struct CreateVisit {
    #[serde(rename = "PatientID")]
    pub patient_id: Option<Scalar>,
    #[serde(rename = "DoctorID")]
    pub doctor_id: Option<Scalar>,
    #[serde(rename = "AdmissionID")]
    pub admission_id: Option<Scalar>,
    #[serde(rename = "VisitDate")]
    pub visit_date: Option<Scalar>,
    #[serde(rename = "Complaint")]
    pub complaint: Option<Scalar>,
    #[serde(rename = "Diagnosis")]
    pub diagnosis: Option<Scalar>,
    #[serde(rename = "Prescription")]
    pub prescription: Option<Scalar>,
    #[serde(rename = "Fee")]
    pub fee: Option<Scalar>,
}

impl CreateVisit {
    /// 仅做格式校验，引用记录是否存在由处理器检查
    pub fn validate(&self) -> Result<NewVisit> {
        let mut v = Validator::new();
        let patient_id = v.check(rules::integer("PatientID", self.patient_id.as_ref(), "患者ID"));
        let doctor_id = v.check(rules::integer("DoctorID", self.doctor_id.as_ref(), "医生ID"));
        let admission_id =
            v.check(optional_integer("AdmissionID", self.admission_id.as_ref(), "入院ID"));
        let visit_date = v.check(rules::required_date(
            "VisitDate",
            self.visit_date.as_ref(),
            "就诊日期",
        ));
        let complaint = v.check(required_note("Complaint", self.complaint.as_ref(), "主诉"));
        let diagnosis = v.check(required_note("Diagnosis", self.diagnosis.as_ref(), "诊断"));
        let prescription = v.check(required_note("Prescription", self.prescription.as_ref(), "处方"));
        let fee = v.check(rules::fee("Fee", self.fee.as_ref()));

        match (
            patient_id,
            doctor_id,
            admission_id,
            visit_date,
            complaint,
            diagnosis,
            prescription,
            fee,
        ) {
            (
                Some(patient_id),
                Some(doctor_id),
                Some(admission_id),
                Some(visit_date),
                Some(complaint),
                Some(diagnosis),
                Some(prescription),
                Some(fee),
            ) => Ok(NewVisit {
                patient_id,
                doctor_id,
                admission_id,
                visit_date,
                complaint,
                diagnosis,
                prescription,
                fee,
            }),
            _ => Err(v.into_error()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePrescription {
    #[serde(rename = "Prescription")]
    pub prescription: Option<Scalar>,
}

impl UpdatePrescription {
    pub fn prescription(&self) -> std::result::Result<String, FieldError> {
        required_note("Prescription", self.prescription.as_ref(), "处方")
    }
}

// ---------------------------------------------------------------- 查询参数

fn query_id(value: &Option<String>) -> Option<i32> {
    parse_query_int(value.as_deref()).and_then(|n| i32::try_from(n).ok())
}

fn query_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 分页参数，非整数值按未提供处理
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

impl PageParams {
    pub fn pagination(&self, default_size: i64, max_size: i64) -> Result<Pagination> {
        Pagination::from_query(
            self.page.as_deref(),
            self.page_size.as_deref(),
            default_size,
            max_size,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DoctorQuery {
    #[serde(flatten)]
    pub paging: PageParams,
    #[serde(rename = "deptId")]
    pub dept_id: Option<String>,
    pub title: Option<String>,
}

impl DoctorQuery {
    pub fn filter(&self) -> hospital_database::queries::doctor::DoctorFilter {
        hospital_database::queries::doctor::DoctorFilter {
            dept_id: query_id(&self.dept_id),
            title: query_text(&self.title),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PatientQuery {
    #[serde(flatten)]
    pub paging: PageParams,
    pub surname: Option<String>,
    pub name: Option<String>,
}

impl PatientQuery {
    /// `surname` 优先，`name` 为别名
    pub fn name_filter(&self) -> Option<String> {
        query_text(&self.surname).or_else(|| query_text(&self.name))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WardQuery {
    #[serde(flatten)]
    pub paging: PageParams,
    #[serde(rename = "deptId")]
    pub dept_id: Option<String>,
    pub floor: Option<String>,
}

impl WardQuery {
    pub fn filter(&self) -> hospital_database::queries::ward::WardFilter {
        hospital_database::queries::ward::WardFilter {
            dept_id: query_id(&self.dept_id),
            floor: query_id(&self.floor),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ActiveAdmissionQuery {
    #[serde(flatten)]
    pub paging: PageParams,
    #[serde(rename = "wardId")]
    pub ward_id: Option<String>,
    #[serde(rename = "DeptId")]
    pub dept_id_legacy: Option<String>,
    #[serde(rename = "deptId")]
    pub dept_id: Option<String>,
}

impl ActiveAdmissionQuery {
    pub fn filter(&self) -> hospital_database::queries::admission::ActiveFilter {
        hospital_database::queries::admission::ActiveFilter {
            ward_id: query_id(&self.ward_id),
            dept_id: query_id(&self.dept_id_legacy).or_else(|| query_id(&self.dept_id)),
        }
    }
}

/// 统计接口与就诊列表共用的日期窗口
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

impl DateRangeQuery {
    pub fn window(&self) -> Result<DateWindow> {
        DateWindow::from_query(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct VisitQuery {
    #[serde(flatten)]
    pub paging: PageParams,
    #[serde(rename = "patientId")]
    pub patient_id: Option<String>,
    #[serde(rename = "doctorId")]
    pub doctor_id: Option<String>,
    #[serde(flatten)]
    pub range: DateRangeQuery,
}

impl VisitQuery {
    pub fn filter(&self) -> Result<hospital_database::queries::visit::VisitFilter> {
        Ok(hospital_database::queries::visit::VisitFilter {
            patient_id: query_id(&self.patient_id),
            doctor_id: query_id(&self.doctor_id),
            window: self.range.window()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hospital_core::{Gender, HospitalError};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn from_json<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    fn field_names(err: HospitalError) -> Vec<String> {
        match err {
            HospitalError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_create_ward_collects_all_errors() {
        let body: CreateWard = from_json(json!({"WardName": "", "Floor": "三", "Capacity": 0}));
        assert_eq!(
            field_names(body.validate().unwrap_err()),
            vec!["WardName", "Floor", "Capacity", "DeptID"]
        );

        let body: CreateWard =
            from_json(json!({"WardName": "一病区", "Floor": "3", "Capacity": 20, "DeptID": 1}));
        let ward = body.validate().unwrap();
        assert_eq!(ward.floor, 3);
        assert_eq!(ward.capacity, 20);
    }

    #[test]
    fn test_create_patient() {
        let body: CreatePatient = from_json(json!({
            "Name": " 张三 ",
            "Gender": "男",
            "IdentityNo": "110101199001011234",
            "BirthDate": "1990-01-01",
            "Phone": "13800138000"
        }));
        let patient = body.validate().unwrap();
        assert_eq!(patient.name, "张三");
        assert_eq!(patient.gender, Gender::Male);
        assert_eq!(patient.birth_date, NaiveDate::from_ymd_opt(1990, 1, 1));

        let body: CreatePatient = from_json(json!({"Name": "李四", "Gender": "F", "IdentityNo": "123"}));
        assert_eq!(
            field_names(body.validate().unwrap_err()),
            vec!["Gender", "IdentityNo"]
        );
    }

    #[test]
    fn test_update_patient_is_fail_fast() {
        let body: UpdatePatient = from_json(json!({"Gender": "X", "Phone": "123"}));
        assert_eq!(body.changes().unwrap_err().code, "INVALID_GENDER");

        let body: UpdatePatient = from_json(json!({"BirthDate": "1990/01/01"}));
        assert_eq!(body.changes().unwrap_err().code, "INVALID_DATE_FORMAT");

        let body: UpdatePatient = from_json(json!({"Phone": ""}));
        let changes = body.changes().unwrap();
        assert_eq!(changes.phone, Some(None));
        assert_eq!(changes.name, None);
    }

    #[test]
    fn test_update_department_name_code() {
        let body: UpdateDepartment = from_json(json!({"DeptName": "  "}));
        let err = body.changes().unwrap_err();
        assert_eq!(err.code, "INVALID_DEPTNAME");
        assert_eq!(err.message, "科室名称不能为空");
    }

    #[test]
    fn test_create_visit() {
        let body: CreateVisit = from_json(json!({
            "PatientID": 1,
            "DoctorID": "2",
            "VisitDate": "2024-01-05",
            "Complaint": "头痛",
            "Diagnosis": "偏头痛",
            "Prescription": "布洛芬",
            "Fee": "45.50"
        }));
        let visit = body.validate().unwrap();
        assert_eq!(visit.doctor_id, 2);
        assert_eq!(visit.admission_id, None);
        assert_eq!(visit.fee, Decimal::new(4550, 2));

        let body: CreateVisit = from_json(json!({"PatientID": 1, "AdmissionID": "x", "Fee": -1}));
        assert_eq!(
            field_names(body.validate().unwrap_err()),
            vec!["DoctorID", "AdmissionID", "VisitDate", "Complaint", "Diagnosis", "Prescription", "Fee"]
        );
    }

    #[test]
    fn test_create_admission_with_visit() {
        let body: CreateAdmission = from_json(json!({
            "WardID": 1,
            "BedNo": "12",
            "AdmissionDate": "2024-01-10",
            "AdmissionReason": "肺炎",
            "VisitID": 5
        }));
        let (admission, visit_id) = body.validate().unwrap();
        assert_eq!(admission.bed_no, "12");
        assert_eq!(visit_id, Some(5));
    }

    #[test]
    fn test_discharge_date() {
        let body: Discharge = from_json(json!({"DischargeDate": "2024-01-20"}));
        assert_eq!(body.date().unwrap(), NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());

        let body: Discharge = from_json(json!({"Other": 1}));
        assert_eq!(body.date().unwrap_err().code, "INVALID_DISCHARGE_DATE");

        let body: Discharge = from_json(json!({"DischargeDate": "20-01-2024"}));
        assert_eq!(body.date().unwrap_err().code, "INVALID_DATE_FORMAT");
    }

    #[test]
    fn test_query_params() {
        let query = ActiveAdmissionQuery {
            ward_id: Some("3".into()),
            dept_id: Some("7".into()),
            ..Default::default()
        };
        let filter = query.filter();
        assert_eq!(filter.ward_id, Some(3));
        assert_eq!(filter.dept_id, Some(7));

        let query = PatientQuery {
            name: Some(" 王 ".into()),
            ..Default::default()
        };
        assert_eq!(query.name_filter(), Some("王".to_string()));

        let query = WardQuery {
            floor: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(query.filter().floor, None);
    }
}
