pub mod features;
pub mod server;
pub mod shared;

use features::receipts::{ReceiptService, ReceiptStore};
use log::info;
use server::ReceiptServer;
use shared::config::{
    initialize_logging_system, load_environment_variables, EnvironmentConfig, ServerConfig,
};
use shared::errors::AppResult;
use std::sync::Arc;

/// サーバーを起動し、Ctrl-Cを受信するまでリクエストを処理する
pub async fn run() -> AppResult<()> {
    // 環境変数を読み込み（.envファイルがある場合）
    let env_file = load_environment_variables();

    // ログシステムを初期化
    let env_config = EnvironmentConfig::from_env();
    initialize_logging_system(&env_config);

    match env_file {
        Some(file) => info!("{file}ファイルを読み込みました"),
        None => log::warn!("環境変数ファイルが見つかりません。直接設定された環境変数を使用します。"),
    }

    info!("アプリケーション初期化を開始します...");

    let config = ServerConfig::from_env()?;
    let service = ReceiptService::new(Arc::new(ReceiptStore::new()));
    let server = ReceiptServer::bind(config.socket_addr(), service).await?;

    info!("アプリケーション初期化が完了しました");

    server.serve(shutdown_signal()).await?;

    info!("サーバーを停止しました");
    Ok(())
}

/// Ctrl-Cの受信を待つ
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("シグナルハンドラーの登録に失敗しました: {e}");
        // 待機できない場合は停止せずに処理を継続する
        std::future::pending::<()>().await;
    }
}
