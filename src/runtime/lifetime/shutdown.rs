use std::future::Future;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info};

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// 等待 Ctrl+C，然后优雅停止 HTTP 服务器
pub async fn listen_for_shutdown(handle: ServerHandle) {
    wait_for_signal(signal::ctrl_c()).await;
    info!("Shutdown signal received, stopping server...");

    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), handle.stop(true)).await {
        Ok(()) => info!("Server stopped gracefully"),
        Err(_) => error!(
            "Graceful shutdown timed out after {} seconds",
            SHUTDOWN_TIMEOUT_SECS
        ),
    }
}

/// 信号注册失败时永远挂起，服务器继续运行
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!(
            "Failed to listen for Ctrl+C: {}. Server keeps running without signal handling",
            e
        );
        std::future::pending::<()>().await;
    }
}
