//! Web服务器

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post, put},
    Router,
};
use hospital_core::Result;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use uuid::Uuid;

use crate::handlers::{admission, department, doctor, patient, stats, system, visit, ward};
use crate::metrics::{metrics_handler, track_metrics, HttpMetrics};
use crate::state::AppState;

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, state: AppState, cors_allow_any: bool) -> Self {
        let app = create_app(state, cors_allow_any);
        Self { addr, app }
    }

    pub async fn run(self) -> Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Web server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// 构建路由及全局中间件
pub fn create_app(state: AppState, cors_allow_any: bool) -> Router {
    let metrics: Arc<HttpMetrics> = state.metrics.clone();

    let cors = if cors_allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = Uuid::new_v4();
        tracing::info_span!(
            "request",
            %request_id,
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    Router::new()
        // 健康检查与指标
        .route("/health", get(system::health))
        .route("/metrics", get(metrics_handler))
        // 业务路由
        .merge(api_routes())
        .route_layer(middleware::from_fn_with_state(metrics, track_metrics))
        // 全局中间件
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // 科室
        .route(
            "/department",
            post(department::create_department).get(department::list_departments),
        )
        .route(
            "/department/:id",
            get(department::get_department)
                .put(department::update_department)
                .delete(department::delete_department),
        )
        .route("/department/:id/stats", get(stats::department_stats))
        // 医生
        .route("/doctor", post(doctor::create_doctor).get(doctor::list_doctors))
        .route(
            "/doctor/:id",
            get(doctor::get_doctor)
                .put(doctor::update_doctor)
                .delete(doctor::delete_doctor),
        )
        .route("/doctor/:id/workload", get(stats::doctor_workload))
        // 患者
        .route("/patient", post(patient::create_patient).get(patient::list_patients))
        .route(
            "/patient/:id",
            get(patient::get_patient)
                .put(patient::update_patient)
                .delete(patient::delete_patient),
        )
        // 病房
        .route("/ward", post(ward::create_ward).get(ward::list_wards))
        .route(
            "/ward/:id",
            get(ward::get_ward)
                .put(ward::update_ward)
                .delete(ward::delete_ward),
        )
        // 住院
        .route("/admission", post(admission::create_admission))
        .route("/admission/active", get(admission::list_active_admissions))
        .route("/admission/:id", get(admission::get_admission))
        .route("/admission/:id/discharge", put(admission::discharge_admission))
        // 就诊
        .route("/visit", post(visit::create_visit).get(visit::list_visits))
        .route("/visit/:id", get(visit::get_visit).delete(visit::delete_visit))
        .route("/visit/:id/prescription", put(visit::update_prescription))
        // 统计
        .route("/report/revenue", get(stats::revenue_report))
}
