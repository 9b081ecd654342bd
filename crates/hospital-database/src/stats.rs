//! 统计聚合
//!
//! 日期窗口缺失的一端不限；金额合计截断为整数元。

use hospital_core::utils::DateWindow;
use hospital_core::{
    truncate_amount, Department, DepartmentStats, Doctor, DoctorWorkload, Result, RevenuePeriod,
    RevenueReport,
};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, Postgres, QueryBuilder};
use tracing::debug;

use crate::filter::{push_filters, Filter};

#[derive(Debug, FromRow)]
struct DbRevenuePeriod {
    period: String,
    revenue: Decimal,
}

fn window_filters(column: &'static str, window: &DateWindow, filters: &mut Vec<Filter>) {
    if let Some(start) = window.start {
        filters.push(Filter::OnOrAfter(column, start));
    }
    if let Some(end) = window.end {
        filters.push(Filter::OnOrBefore(column, end));
    }
}

/// 门诊人次与收入：科室医生的就诊
fn outpatient_query(dept_id: i32, window: &DateWindow) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT COUNT(*), COALESCE(SUM(v.fee), 0) FROM visits v \
         JOIN doctors doc ON doc.doctor_id = v.doctor_id",
    );
    let mut filters = vec![Filter::Eq("doc.dept_id", dept_id)];
    window_filters("v.visit_date", window, &mut filters);
    push_filters(&mut qb, &filters);
    qb
}

/// 住院人数：科室病房中仍在院的住院记录
fn inpatient_query(dept_id: i32, window: &DateWindow) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT COUNT(*) FROM admissions a JOIN wards w ON w.ward_id = a.ward_id",
    );
    let mut filters = vec![
        Filter::Eq("w.dept_id", dept_id),
        Filter::IsNull("a.discharge_date"),
    ];
    window_filters("a.admission_date", window, &mut filters);
    push_filters(&mut qb, &filters);
    qb
}

fn revenue_query(window: &DateWindow) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT TO_CHAR(DATE_TRUNC('month', v.visit_date), 'YYYY-MM') AS period, \
         SUM(v.fee) AS revenue FROM visits v",
    );
    let mut filters = Vec::new();
    window_filters("v.visit_date", window, &mut filters);
    push_filters(&mut qb, &filters);
    qb.push(" GROUP BY 1 ORDER BY 1");
    qb
}

fn workload_query(doctor_id: i32, window: &DateWindow) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT COUNT(*), COUNT(DISTINCT v.admission_id), COUNT(DISTINCT v.patient_id) \
         FROM visits v",
    );
    let mut filters = vec![Filter::Eq("v.doctor_id", doctor_id)];
    window_filters("v.visit_date", window, &mut filters);
    push_filters(&mut qb, &filters);
    qb
}

/// 科室统计，调用方需先确认科室存在
pub async fn department_stats(
    conn: &mut PgConnection,
    department: &Department,
    window: &DateWindow,
) -> Result<DepartmentStats> {
    let mut outpatient = outpatient_query(department.dept_id, window);
    let (outpatient_count, revenue) = outpatient
        .build_query_as::<(i64, Decimal)>()
        .fetch_one(&mut *conn)
        .await?;

    let mut inpatient = inpatient_query(department.dept_id, window);
    let inpatient_count: i64 = inpatient
        .build_query_scalar::<i64>()
        .fetch_one(&mut *conn)
        .await?;

    debug!(dept_id = department.dept_id, outpatient_count, inpatient_count, "department stats");

    Ok(DepartmentStats {
        dept_id: department.dept_id,
        dept_name: department.dept_name.clone(),
        outpatient_count,
        inpatient_count,
        total_revenue: truncate_amount(revenue),
    })
}

/// 按月汇总就诊收入
pub async fn revenue_report(conn: &mut PgConnection, window: &DateWindow) -> Result<RevenueReport> {
    let mut qb = revenue_query(window);
    let rows: Vec<DbRevenuePeriod> = qb
        .build_query_as::<DbRevenuePeriod>()
        .fetch_all(&mut *conn)
        .await?;

    let total: Decimal = rows.iter().map(|r| r.revenue).sum();
    let details = rows
        .into_iter()
        .map(|r| RevenuePeriod {
            period: r.period,
            revenue: r.revenue,
        })
        .collect();

    Ok(RevenueReport {
        total: truncate_amount(total),
        details,
    })
}

/// 医生工作量，调用方需先确认医生存在
pub async fn doctor_workload(
    conn: &mut PgConnection,
    doctor: &Doctor,
    window: &DateWindow,
) -> Result<DoctorWorkload> {
    let mut qb = workload_query(doctor.doctor_id, window);
    let (visit_count, admission_count, total_patients) = qb
        .build_query_as::<(i64, i64, i64)>()
        .fetch_one(&mut *conn)
        .await?;

    Ok(DoctorWorkload {
        doctor_id: doctor.doctor_id,
        name: doctor.name.clone(),
        visit_count,
        admission_count,
        total_patients,
    })
}
