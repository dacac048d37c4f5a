use crate::storage::Storage;
use crate::utils::{Clock, SystemClock};
use std::sync::Arc;
use tracing::{info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub clock: Arc<dyn Clock>,
}

/// 启动时先关闭一次已过期的问卷
async fn close_overdue_surveys(storage: &Arc<dyn Storage>, clock: &Arc<dyn Clock>) {
    match storage.sweep_overdue(clock.now()).await {
        Ok(0) => {}
        Ok(closed) => info!("Closed {} overdue surveys at startup", closed),
        Err(e) => warn!("Failed to close overdue surveys at startup: {}", e),
    }
}

/// 准备服务器启动的上下文
/// 包括存储与时钟
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    close_overdue_surveys(&storage, &clock).await;

    StartupContext { storage, clock }
}
