use crate::features::receipts::handlers::handle_request;
use crate::features::receipts::ReceiptService;
use crate::shared::errors::AppResult;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};

/// 領収書ポイントHTTPサーバー
pub struct ReceiptServer {
    /// 待ち受け中のリスナー
    listener: TcpListener,
    /// リクエスト処理に使うサービス
    service: ReceiptService,
}

impl ReceiptServer {
    /// 指定アドレスで待ち受けを開始する
    ///
    /// # 引数
    /// * `addr` - 待ち受けアドレス（ポート0の場合は空きポートを割り当てる）
    /// * `service` - 領収書サービス
    pub async fn bind(addr: SocketAddr, service: ReceiptService) -> AppResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        log::info!("サーバーを開始しました: http://{}", listener.local_addr()?);

        Ok(Self { listener, service })
    }

    /// 実際に待ち受けているアドレスを取得する
    pub fn local_addr(&self) -> AppResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// `shutdown`が完了するまで接続を受け付ける
    ///
    /// 接続ごとにタスクを生成して処理する
    pub async fn serve<F>(self, shutdown: F) -> AppResult<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        log::debug!("接続を受け付けました: {peer}");
                        let service = self.service.clone();
                        tokio::spawn(async move {
                            handle_connection(stream, service).await;
                        });
                    }
                    Err(e) => {
                        log::error!("接続受け入れエラー: {e}");
                        return Err(e.into());
                    }
                },
                _ = &mut shutdown => {
                    log::info!("シャットダウン要求を受信しました。新規接続の受け付けを停止します");
                    return Ok(());
                }
            }
        }
    }
}

/// TCP接続を処理する
async fn handle_connection(stream: TcpStream, service: ReceiptService) {
    let io = TokioIo::new(stream);

    let http_service = service_fn(move |req| handle_request(req, service.clone()));

    if let Err(err) = http1::Builder::new().serve_connection(io, http_service).await {
        log::error!("HTTP接続処理エラー: {err}");
    }
}
