//! 医院管理服务器主程序

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use hospital_admin::{init_logging, HospitalConfig};
use hospital_database::{create_tables, DatabasePool};
use hospital_web::{AppState, HttpMetrics, WebServer};
use tracing::info;

/// 医院管理服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "hospital-server")]
#[command(about = "医院管理系统 REST 服务器")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 监听主机，覆盖配置文件
    #[arg(long)]
    host: Option<String>,

    /// 监听端口，覆盖配置文件
    #[arg(short, long)]
    port: Option<u16>,

    /// 日志级别，覆盖配置文件
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = HospitalConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging)?;
    info!("启动医院管理服务器...");

    let addr = config.server.socket_addr()?;
    let db = DatabasePool::connect(&config.database.pool_settings())
        .await
        .context("Failed to connect to database")?;

    if config.database.auto_migrate {
        create_tables(&db).await.context("Failed to create tables")?;
    }

    let metrics = Arc::new(HttpMetrics::new()?);
    let state = AppState::new(db.clone(), metrics, config.web.max_page_size);

    info!("服务器配置:");
    info!("  监听地址: {}", addr);
    info!("  分页上限: {}", config.web.max_page_size);

    WebServer::new(addr, state, config.web.cors_allow_any)
        .run()
        .await?;

    db.close().await;
    Ok(())
}
