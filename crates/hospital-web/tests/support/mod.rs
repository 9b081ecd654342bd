//! 集成测试支撑：每个测试独立的 schema 与连接池
//!
//! 需要设置 `HOSPITAL_TEST_DATABASE_URL`，未设置时测试直接跳过。

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context as _;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use hospital_database::{create_tables, DatabasePool};
use hospital_web::{create_app, AppState, HttpMetrics};
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::Connection as _;
use tower::ServiceExt as _;
use uuid::Uuid;

pub const DATABASE_URL_ENV: &str = "HOSPITAL_TEST_DATABASE_URL";

pub struct TestApp {
    pub router: Router,
    db: DatabasePool,
    schema: String,
    admin_database_url: String,
}

impl TestApp {
    /// 未配置测试数据库时返回 `None`
    pub async fn new() -> anyhow::Result<Option<Self>> {
        let Ok(admin_database_url) = std::env::var(DATABASE_URL_ENV) else {
            eprintln!("{DATABASE_URL_ENV} not set, skipping");
            return Ok(None);
        };

        let schema = format!("test_{}", Uuid::new_v4().simple());
        let mut admin_conn = sqlx::PgConnection::connect(&admin_database_url)
            .await
            .context("connect admin db for schema create")?;
        sqlx::query(&format!(r#"CREATE SCHEMA "{}""#, schema))
            .execute(&mut admin_conn)
            .await
            .context("create test schema")?;

        let options = PgConnectOptions::from_str(&admin_database_url)
            .context("parse database url")?
            .options([("search_path", schema.as_str())]);
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .context("connect test pool")?;

        let db = DatabasePool::from_pool(pool);
        create_tables(&db).await.context("create tables")?;

        let metrics = Arc::new(HttpMetrics::new()?);
        let router = create_app(AppState::new(db.clone(), metrics, 100), true);

        Ok(Some(Self {
            router,
            db,
            schema,
            admin_database_url,
        }))
    }

    pub async fn cleanup(self) -> anyhow::Result<()> {
        self.db.close().await;

        let mut admin_conn = sqlx::PgConnection::connect(&self.admin_database_url)
            .await
            .context("connect admin db for schema drop")?;
        sqlx::query(&format!(r#"DROP SCHEMA "{}" CASCADE"#, self.schema))
            .execute(&mut admin_conn)
            .await
            .context("drop test schema")?;

        Ok(())
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json)?)
            }
            None => Body::empty(),
        };
        let request = builder.body(body).context("build request")?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("router call")?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read body")?;

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("parse response json")?
        };
        Ok((status, json))
    }

    pub async fn get(&self, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.request(Method::DELETE, uri, None).await
    }

    /// 创建并返回新记录的ID字段
    pub async fn create(&self, uri: &str, body: Value, id_field: &str) -> anyhow::Result<i64> {
        let (status, json) = self.post(uri, body).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "POST {uri} returned {status}: {json}");
        json["data"][id_field]
            .as_i64()
            .with_context(|| format!("missing {id_field} in {json}"))
    }
}
