use crate::features::receipts::models::{ProcessReceiptResponse, Receipt, ReceiptPointsResponse};
use crate::features::receipts::service::ReceiptService;
use crate::shared::errors::{AppError, AppResult, ErrorSeverity};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::convert::Infallible;
use std::error::Error as StdError;

/// 疎通確認用エンドポイントの応答本文
pub const TEST_HANDLER_MESSAGE: &str = "Test handler is working!";

const RECEIPTS_PREFIX: &str = "/receipts/";
const POINTS_SUFFIX: &str = "/points";

/// 受け付けるリクエストボディの最大バイト数
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// HTTPリクエストを処理する
///
/// # ルーティング
/// - `POST /receipts/process` - 領収書を処理してIDを返す
/// - `GET /receipts/{id}/points` - ポイントを返す
/// - `GET /test` - 疎通確認
/// - その他 - 404
pub async fn handle_request<B>(
    req: Request<B>,
    service: ReceiptService,
) -> Result<Response<String>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    log::debug!("リクエストを受信: {} {}", req.method(), req.uri());

    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = match (&method, path.as_str()) {
        (&Method::GET, "/test") => {
            text_response(StatusCode::OK, TEST_HANDLER_MESSAGE.to_string())
        }
        (&Method::POST, "/receipts/process") => match process_receipt(req, &service).await {
            Ok(body) => json_response(&body),
            Err(e) => error_response(e),
        },
        (&Method::GET, path) => match points_path_id(path) {
            Some(id) => match receipt_points(id, &service) {
                Ok(body) => json_response(&body),
                Err(e) => error_response(e),
            },
            None => route_not_found(&method, path),
        },
        (method, path) => route_not_found(method, path),
    };

    Ok(response)
}

fn route_not_found(method: &Method, path: &str) -> Response<String> {
    log::debug!("未対応のリクエスト: {method} {path}");
    text_response(StatusCode::NOT_FOUND, "Not Found".to_string())
}

/// `POST /receipts/process`
async fn process_receipt<B>(
    req: Request<B>,
    service: &ReceiptService,
) -> AppResult<ProcessReceiptResponse>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    log::info!("領収書を処理しています...");

    let body = Limited::new(req.into_body(), MAX_BODY_BYTES);
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            return Err(AppError::PayloadTooLarge(MAX_BODY_BYTES));
        }
        Err(e) => {
            // ボディの読み込み失敗はデコード失敗として扱う
            let message = format!("リクエストボディの読み込みに失敗しました: {e}");
            return Err(AppError::Decode(serde::de::Error::custom(message)));
        }
    };

    let receipt: Receipt = serde_json::from_slice(&bytes)?;
    let id = service.process(receipt)?;

    Ok(ProcessReceiptResponse { id })
}

/// `GET /receipts/{id}/points`
fn receipt_points(id: &str, service: &ReceiptService) -> AppResult<ReceiptPointsResponse> {
    log::info!("ポイントを取得しています: id={id}");

    let points = service.points(id)?;
    Ok(ReceiptPointsResponse { points })
}

/// `/receipts/{id}/points` 形式のパスからIDを取り出す
///
/// IDが空、または`/`を含む場合はNone
fn points_path_id(path: &str) -> Option<&str> {
    path.strip_prefix(RECEIPTS_PREFIX)?
        .strip_suffix(POINTS_SUFFIX)
        .filter(|id| !id.is_empty() && !id.contains('/'))
}

fn text_response(status: StatusCode, body: String) -> Response<String> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

fn json_response<T: Serialize>(body: &T) -> Response<String> {
    match serde_json::to_string(body) {
        Ok(json) => {
            let mut response = Response::new(json);
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(e) => {
            log::error!("レスポンスのシリアライズに失敗しました: {e}");
            text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            )
        }
    }
}

fn error_response(error: AppError) -> Response<String> {
    match error.severity() {
        ErrorSeverity::Low => log::warn!("リクエストを拒否しました: {error}"),
        ErrorSeverity::Medium | ErrorSeverity::High => log::error!("リクエスト処理エラー: {error}"),
    }

    text_response(error.status_code(), error.user_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::receipts::store::ReceiptStore;
    use crate::shared::errors::{INVALID_RECEIPT_MESSAGE, RECEIPT_NOT_FOUND_MESSAGE};
    use http_body_util::Full;
    use hyper::body::Bytes;
    use std::sync::Arc;

    const TARGET_RECEIPT: &str = r#"{
        "retailer": "Target",
        "purchaseDate": "2022-01-01",
        "purchaseTime": "13:01",
        "items": [
            {"shortDescription": "Mountain Dew 12PK", "price": "6.49"},
            {"shortDescription": "Emils Cheese Pizza", "price": "12.25"},
            {"shortDescription": "Knorr Creamy Chicken", "price": "1.26"},
            {"shortDescription": "Doritos Nacho Cheese", "price": "3.35"},
            {"shortDescription": "   Klarbrunn 12-PK 12 FL OZ  ", "price": "12.00"}
        ],
        "total": "35.35"
    }"#;

    fn service() -> ReceiptService {
        ReceiptService::new(Arc::new(ReceiptStore::new()))
    }

    fn request(method: Method, uri: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn send(
        service: &ReceiptService,
        method: Method,
        uri: &str,
        body: &str,
    ) -> Response<String> {
        handle_request(request(method, uri, body), service.clone())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_process_then_get_points() {
        let service = service();

        let response = send(&service, Method::POST, "/receipts/process", TARGET_RECEIPT).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let created: ProcessReceiptResponse = serde_json::from_str(response.body()).unwrap();
        assert!(!created.id.is_empty());

        let uri = format!("/receipts/{}/points", created.id);
        let response = send(&service, Method::GET, &uri, "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let points: ReceiptPointsResponse = serde_json::from_str(response.body()).unwrap();
        assert_eq!(points.points, 28);
    }

    #[tokio::test]
    async fn test_process_empty_receipt() {
        let response = send(&service(), Method::POST, "/receipts/process", "{}").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body(), INVALID_RECEIPT_MESSAGE);
    }

    #[tokio::test]
    async fn test_process_receipt_missing_fields() {
        let body = r#"{"retailer": "Target"}"#;
        let response = send(&service(), Method::POST, "/receipts/process", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body(), INVALID_RECEIPT_MESSAGE);
    }

    #[tokio::test]
    async fn test_process_invalid_json() {
        let response = send(&service(), Method::POST, "/receipts/process", "{invalid_json}").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_ne!(response.body(), INVALID_RECEIPT_MESSAGE);
        assert!(!response.body().is_empty());
    }

    #[tokio::test]
    async fn test_process_oversized_body() {
        let service = service();
        let body = format!(r#"{{"retailer": "{}"}}"#, "a".repeat(MAX_BODY_BYTES));

        let response = send(&service, Method::POST, "/receipts/process", &body).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        // 上限ちょうどまでは通常どおり処理される
        let padded = format!("{TARGET_RECEIPT}{}", " ".repeat(MAX_BODY_BYTES.saturating_sub(TARGET_RECEIPT.len())));
        let response = send(&service, Method::POST, "/receipts/process", &padded).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_points_unknown_id() {
        let response = send(&service(), Method::GET, "/receipts/nonexistent/points", "").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.body(), RECEIPT_NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_test_handler() {
        let response = send(&service(), Method::GET, "/test", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), TEST_HANDLER_MESSAGE);
    }

    #[tokio::test]
    async fn test_unknown_routes() {
        let service = service();
        for (method, uri) in [
            (Method::GET, "/receipts/process"),
            (Method::GET, "/receipts//points"),
            (Method::GET, "/receipts/a/b/points"),
            (Method::DELETE, "/receipts/abc/points"),
            (Method::GET, "/unknown"),
        ] {
            let response = send(&service, method, uri, "").await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[test]
    fn test_points_path_id() {
        assert_eq!(points_path_id("/receipts/abc-123/points"), Some("abc-123"));
        assert_eq!(points_path_id("/receipts//points"), None);
        assert_eq!(points_path_id("/receipts/a/b/points"), None);
        assert_eq!(points_path_id("/receipts/abc"), None);
        assert_eq!(points_path_id("/other/abc/points"), None);
    }
}
