mod support;

use axum::http::StatusCode;
use serde_json::{json, Value};
use support::TestApp;

macro_rules! test_app {
    () => {
        match TestApp::new().await? {
            Some(app) => app,
            None => return Ok(()),
        }
    };
}

async fn seed_department(app: &TestApp, name: &str) -> anyhow::Result<i64> {
    app.create(
        "/department",
        json!({"DeptName": name, "Location": "门诊楼2层"}),
        "DeptID",
    )
    .await
}

async fn seed_doctor(app: &TestApp, dept_name: &str) -> anyhow::Result<i64> {
    app.create(
        "/doctor",
        json!({"Name": "李医生", "DeptName": dept_name, "Title": "主任医师", "Phone": "010-1234"}),
        "DoctorID",
    )
    .await
}

async fn seed_patient(app: &TestApp, identity_no: &str) -> anyhow::Result<i64> {
    app.create(
        "/patient",
        json!({
            "Name": "张三",
            "Gender": "男",
            "BirthDate": "1990-05-01",
            "IdentityNo": identity_no,
            "Phone": "13800138000"
        }),
        "PatientID",
    )
    .await
}

async fn seed_visit(
    app: &TestApp,
    patient_id: i64,
    doctor_id: i64,
    date: &str,
    fee: f64,
) -> anyhow::Result<i64> {
    app.create(
        "/visit",
        json!({
            "PatientID": patient_id,
            "DoctorID": doctor_id,
            "VisitDate": date,
            "Complaint": "头痛",
            "Diagnosis": "偏头痛",
            "Prescription": "布洛芬",
            "Fee": fee
        }),
        "VisitID",
    )
    .await
}

#[tokio::test]
async fn patient_create_get_and_duplicate_identity() -> anyhow::Result<()> {
    let app = test_app!();

    let patient_id = seed_patient(&app, "110101199005011234").await?;

    let (status, body) = app.get(&format!("/patient/{patient_id}")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);
    assert_eq!(body["data"]["Name"], "张三");
    assert_eq!(body["data"]["BirthDate"], "1990-05-01");
    assert_eq!(body["data"]["IdentityNo"], "110101199005011234");

    let (status, body) = app
        .post(
            "/patient",
            json!({"Name": "李四", "Gender": "女", "IdentityNo": "110101199005011234"}),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "DUPLICATE_IDENTITY_NO");

    let (status, body) = app.get("/patient/999999").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "PATIENT_NOT_FOUND");

    app.cleanup().await
}

#[tokio::test]
async fn department_list_counts_doctors() -> anyhow::Result<()> {
    let app = test_app!();

    seed_department(&app, "内科").await?;
    seed_department(&app, "外科").await?;
    seed_department(&app, "儿科").await?;
    seed_doctor(&app, "内科").await?;
    seed_doctor(&app, "内科").await?;

    let (status, body) = app.get("/department?page=1&pageSize=2").await?;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total"], 3);
    assert_eq!(data["page"], 1);
    assert_eq!(data["pageSize"], 2);
    let list = data["list"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["DeptName"], "内科");
    assert_eq!(list[0]["DoctorNo"], 2);
    assert_eq!(list[1]["DoctorNo"], 0);

    let (status, body) = app.post("/department", json!({"DeptName": "内科"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "DUPLICATE_DEPARTMENT");

    app.cleanup().await
}

#[tokio::test]
async fn doctor_with_visits_cannot_be_deleted() -> anyhow::Result<()> {
    let app = test_app!();

    seed_department(&app, "内科").await?;
    let doctor_id = seed_doctor(&app, "内科").await?;
    let patient_id = seed_patient(&app, "110101199005011234").await?;
    seed_visit(&app, patient_id, doctor_id, "2024-01-10", 50.0).await?;

    let (status, body) = app.delete(&format!("/doctor/{doctor_id}")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "HAS_VISIT_RECORDS");
    assert_eq!(body["details"]["relatedVisits"], 1);

    let (status, body) = app.delete(&format!("/patient/{patient_id}")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "HAS_RELATED_RECORDS");

    let (status, _) = app.get(&format!("/doctor/{doctor_id}")).await?;
    assert_eq!(status, StatusCode::OK);

    app.cleanup().await
}

#[tokio::test]
async fn visit_references_are_checked() -> anyhow::Result<()> {
    let app = test_app!();

    let (status, body) = app
        .post(
            "/visit",
            json!({
                "PatientID": 41,
                "DoctorID": 42,
                "VisitDate": "2024-01-10",
                "Complaint": "咳嗽",
                "Diagnosis": "感冒",
                "Prescription": "多喝水",
                "Fee": 30
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "PARAM_VALIDATION_FAILED");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["PatientID", "DoctorID"]);

    app.cleanup().await
}

#[tokio::test]
async fn admission_lifecycle() -> anyhow::Result<()> {
    let app = test_app!();

    let dept_id = seed_department(&app, "内科").await?;
    let doctor_id = seed_doctor(&app, "内科").await?;
    let patient_id = seed_patient(&app, "110101199005011234").await?;
    let visit_id = seed_visit(&app, patient_id, doctor_id, "2024-03-01", 80.0).await?;
    let ward_id = app
        .create(
            "/ward",
            json!({"WardName": "一病区", "Floor": 3, "Capacity": 2, "DeptID": dept_id}),
            "WardID",
        )
        .await?;

    let (status, body) = app
        .post(
            "/admission",
            json!({
                "WardID": ward_id,
                "BedNo": "A-01",
                "AdmissionDate": "2024-03-01",
                "AdmissionReason": "观察",
                "VisitID": visit_id
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let admission_id = body["data"]["AdmissionID"].as_i64().unwrap();
    assert_eq!(body["data"]["PatientID"], patient_id);
    assert_eq!(body["data"]["PatientName"], "张三");
    assert_eq!(body["data"]["DischargeDate"], Value::Null);

    // 同一床位不能重复入住
    let (status, body) = app
        .post(
            "/admission",
            json!({
                "WardID": ward_id,
                "BedNo": "A-01",
                "AdmissionDate": "2024-03-02",
                "AdmissionReason": "观察"
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BED_OCCUPIED");

    let (status, body) = app.get(&format!("/ward/{ward_id}")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["OccupiedBeds"], 1);
    assert_eq!(body["data"]["AvailableBeds"], 1);
    assert_eq!(body["data"]["BedStatus"][0]["BedNo"], "A-01");
    assert_eq!(body["data"]["BedStatus"][0]["PatientName"], "张三");

    let (status, body) = app
        .get(&format!("/admission/active?DeptId={dept_id}"))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["list"][0]["WardName"], "一病区");

    let discharge = format!("/admission/{admission_id}/discharge");
    let (status, body) = app
        .put(&discharge, json!({"DischargeDate": "2024-02-28"}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_DISCHARGE_DATE");

    let (status, body) = app
        .put(&discharge, json!({"DischargeDate": "2024-03-05"}))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["DischargeDate"], "2024-03-05");

    let (status, body) = app
        .put(&discharge, json!({"DischargeDate": "2024-03-06"}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ALREADY_DISCHARGED");

    let (_, body) = app.get("/admission/active").await?;
    assert_eq!(body["data"]["total"], 0);

    // 病房仍有住院记录，不能删除
    let (status, body) = app.delete(&format!("/ward/{ward_id}")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "HAS_ADMISSION_RECORDS");

    app.cleanup().await
}

#[tokio::test]
async fn statistics_over_a_month() -> anyhow::Result<()> {
    let app = test_app!();

    let dept_id = seed_department(&app, "内科").await?;
    let doctor_id = seed_doctor(&app, "内科").await?;
    let patient_id = seed_patient(&app, "110101199005011234").await?;
    seed_visit(&app, patient_id, doctor_id, "2024-01-05", 100.5).await?;
    seed_visit(&app, patient_id, doctor_id, "2024-01-20", 50.25).await?;
    seed_visit(&app, patient_id, doctor_id, "2024-02-03", 20.0).await?;

    let (status, body) = app
        .get(&format!(
            "/department/{dept_id}/stats?startDate=2024-01-01&endDate=2024-01-31"
        ))
        .await?;
    assert_eq!(status, StatusCode::OK);
    let row = &body["data"][0];
    assert_eq!(row["DeptName"], "内科");
    assert_eq!(row["outpatientCount"], 2);
    assert_eq!(row["inpatientCount"], 0);
    assert_eq!(row["totalRevenue"], 150);

    let (status, body) = app.get("/report/revenue").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["Total"], 170);
    let details = body["data"]["Details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["Period"], "2024-01");
    assert_eq!(details[0]["Revenue"], 150.75);
    assert_eq!(details[1]["Period"], "2024-02");

    let (status, body) = app
        .get(&format!("/doctor/{doctor_id}/workload?startDate=2024-01-01"))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["visitCount"], 3);
    assert_eq!(body["data"]["admissionCount"], 0);
    assert_eq!(body["data"]["totalPatients"], 1);

    let (status, body) = app.get("/department/999999/stats").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "DEPT_NOT_FOUND");

    app.cleanup().await
}

async fn seed_ward(app: &TestApp, dept_id: i64, capacity: i64) -> anyhow::Result<i64> {
    app.create(
        "/ward",
        json!({"WardName": "二病区", "Floor": 4, "Capacity": capacity, "DeptID": dept_id}),
        "WardID",
    )
    .await
}

async fn admit(
    app: &TestApp,
    ward_id: i64,
    bed_no: &str,
    date: &str,
    visit_id: Option<i64>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut body = json!({
        "WardID": ward_id,
        "BedNo": bed_no,
        "AdmissionDate": date,
        "AdmissionReason": "观察"
    });
    if let Some(visit_id) = visit_id {
        body["VisitID"] = json!(visit_id);
    }
    app.post("/admission", body).await
}

#[tokio::test]
async fn new_ward_reports_all_beds_free() -> anyhow::Result<()> {
    let app = test_app!();

    let dept_id = seed_department(&app, "骨科").await?;
    let (status, created) = app
        .post(
            "/ward",
            json!({"WardName": "三病区", "Floor": 5, "Capacity": 3, "DeptID": dept_id}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let ward_id = created["data"]["WardID"].as_i64().unwrap();

    let (status, body) = app.get(&format!("/ward/{ward_id}")).await?;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    for field in ["WardID", "WardName", "Floor", "Capacity", "DeptID", "DeptName"] {
        assert_eq!(data[field], created["data"][field], "{field}");
    }
    assert_eq!(data["DeptName"], "骨科");
    assert_eq!(data["OccupiedBeds"], 0);
    assert_eq!(data["AvailableBeds"], 3);
    assert_eq!(data["BedStatus"], json!([]));

    app.cleanup().await
}

#[tokio::test]
async fn inpatient_count_uses_active_admissions_in_window() -> anyhow::Result<()> {
    let app = test_app!();

    let dept_id = seed_department(&app, "内科").await?;
    let ward_id = seed_ward(&app, dept_id, 5).await?;

    let (status, _) = admit(&app, ward_id, "B-01", "2024-01-10", None).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = admit(&app, ward_id, "B-02", "2024-01-12", None).await?;
    assert_eq!(status, StatusCode::CREATED);
    let discharged = body["data"]["AdmissionID"].as_i64().unwrap();
    let (status, _) = app
        .put(
            &format!("/admission/{discharged}/discharge"),
            json!({"DischargeDate": "2024-01-20"}),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = admit(&app, ward_id, "B-03", "2024-02-05", None).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .get(&format!(
            "/department/{dept_id}/stats?startDate=2024-01-01&endDate=2024-01-31"
        ))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["inpatientCount"], 1);
    assert_eq!(body["data"][0]["outpatientCount"], 0);

    let (_, body) = app.get(&format!("/department/{dept_id}/stats")).await?;
    assert_eq!(body["data"][0]["inpatientCount"], 2);

    app.cleanup().await
}

#[tokio::test]
async fn linked_visit_cannot_start_second_admission() -> anyhow::Result<()> {
    let app = test_app!();

    let dept_id = seed_department(&app, "内科").await?;
    let doctor_id = seed_doctor(&app, "内科").await?;
    let patient_id = seed_patient(&app, "110101199005011234").await?;
    let visit_id = seed_visit(&app, patient_id, doctor_id, "2024-03-01", 80.0).await?;
    let ward_id = seed_ward(&app, dept_id, 4).await?;

    let (status, first) = admit(&app, ward_id, "C-01", "2024-03-01", Some(visit_id)).await?;
    assert_eq!(status, StatusCode::CREATED);
    let first_id = first["data"]["AdmissionID"].as_i64().unwrap();

    let (status, body) = admit(&app, ward_id, "C-02", "2024-03-02", Some(visit_id)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VISIT_ALREADY_ADMITTED");

    // 第一次住院仍然保留患者信息，且失败的请求没有留下住院记录
    let (_, body) = app.get(&format!("/admission/{first_id}")).await?;
    assert_eq!(body["data"]["VisitID"], visit_id);
    assert_eq!(body["data"]["PatientID"], patient_id);

    let (_, body) = app.get(&format!("/ward/{ward_id}")).await?;
    assert_eq!(body["data"]["OccupiedBeds"], 1);

    app.cleanup().await
}
