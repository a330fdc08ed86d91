//! 用户服务主入口

use anyhow::Context;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use user_service::{
    auth::PasswordHasher,
    config::AppConfig,
    db,
    handlers::health,
    middleware::AppState,
    routes,
    services::{CityService, UserService},
    telemetry,
};

/// 管理命令读取密码的环境变量
const ADMIN_PASSWORD_ENV: &str = "APP_ADMIN_PASSWORD";

enum Command {
    Serve,
    CreateAdmin {
        first_name: String,
        last_name: String,
        email: String,
    },
    CreateCity {
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().skip(1).collect();

    let command = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] => Command::Serve,
        ["--version"] => {
            println!("user-service {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        ["--help"] => {
            print_help();
            return Ok(());
        }
        ["create-admin", first_name, last_name, email] => Command::CreateAdmin {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        },
        ["create-city", name] => Command::CreateCity {
            name: name.to_string(),
        },
        _ => {
            eprintln!("未知参数: {}", args.join(" "));
            print_help();
            std::process::exit(1);
        }
    };

    // 加载 .env 文件（开发环境）
    // 生产环境应该直接设置环境变量，不依赖 .env 文件
    dotenv::from_filename(".env.local").ok();
    dotenv::dotenv().ok();

    health::set_start_time();

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config);

    // 3. 数据库连接池 + 迁移
    let db_pool = db::create_pool(&config.database).await?;
    db::run_migrations(&db_pool).await?;

    tracing::info!("Database initialized");

    match command {
        Command::Serve => serve(config, db_pool).await,
        Command::CreateAdmin {
            first_name,
            last_name,
            email,
        } => {
            let password = read_admin_password()?;
            let hasher = PasswordHasher::from_config(&config.security)?;
            let user = UserService::new(db_pool, hasher)
                .create_admin(&first_name, &last_name, &email, password)
                .await?;

            println!("Admin created: id={} email={}", user.id, user.email);
            Ok(())
        }
        Command::CreateCity { name } => {
            let city = CityService::new(db_pool).create_city(&name).await?;

            println!("City created: id={} name={}", city.id, city.name);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, db_pool: sqlx::PgPool) -> anyhow::Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "User service starting...");

    // 4. 构建应用状态
    let app_state = Arc::new(AppState::new(config.clone(), db_pool)?);

    // 5. 构建路由
    let app = routes::create_router(app_state);

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(addr = %addr, "Server listening");

    // 7. 优雅关闭：收到信号后最多等待 graceful_shutdown_timeout_secs
    let (signal_tx, mut signal_rx) = tokio::sync::watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signal_tx.send(true);
        })
        .into_future();

    let timeout_secs = config.server.graceful_shutdown_timeout_secs;
    let force_exit = async move {
        if signal_rx.wait_for(|received| *received).await.is_ok() {
            tokio::time::sleep(Duration::from_secs(timeout_secs)).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result?,
        _ = force_exit => {
            tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        }
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }
}

/// 密码优先取环境变量，否则从标准输入读取一行
fn read_admin_password() -> anyhow::Result<String> {
    if let Ok(password) = std::env::var(ADMIN_PASSWORD_ENV) {
        if !password.is_empty() {
            return Ok(password);
        }
    }

    eprintln!("Password:");
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }

    Ok(password)
}

/// 打印帮助信息
fn print_help() {
    println!("user-service {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: user-service [命令]");
    println!();
    println!("命令:");
    println!("  (无)                                    启动 HTTP 服务");
    println!("  create-admin <名> <姓> <邮箱>           创建管理员（密码取自 {} 或标准输入）", ADMIN_PASSWORD_ENV);
    println!("  create-city <名称>                      创建城市");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  所有配置通过 APP_ 前缀的环境变量完成，例如 APP_SECURITY__SECRET_KEY");
    println!("  可用选项请参考 .env.example");
}
