use crate::features::receipts::validation::ValidationError;
use hyper::StatusCode;
use thiserror::Error;

/// 領収書バリデーション失敗時にクライアントへ返す固定メッセージ
pub const INVALID_RECEIPT_MESSAGE: &str = "Invalid receipt: missing required fields";

/// 領収書が見つからない場合にクライアントへ返すメッセージ
pub const RECEIPT_NOT_FOUND_MESSAGE: &str = "receipt not found";

/// アプリケーション全体で使用される統一エラー型
#[derive(Debug, Error)]
pub enum AppError {
    /// リクエストボディのJSON解析エラー
    #[error("JSON解析エラー: {0}")]
    Decode(#[from] serde_json::Error),

    /// リクエストボディが上限サイズを超えた
    #[error("リクエストボディが大きすぎます: 上限 {0} バイト")]
    PayloadTooLarge(usize),

    /// バリデーション関連のエラー
    #[error("バリデーションエラー: {0}")]
    Validation(#[from] ValidationError),

    /// リソースが見つからない場合のエラー
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 設定関連のエラー
    #[error("設定エラー: {0}")]
    Configuration(String),

    /// I/O関連のエラー
    #[error("I/Oエラー: {0}")]
    Io(#[from] std::io::Error),

    /// 並行処理関連のエラー
    #[error("並行処理エラー: {0}")]
    Concurrency(String),
}

/// エラーの重要度を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 低重要度（ユーザー入力エラーなど）
    Low,
    /// 中重要度（I/Oエラーなど）
    Medium,
    /// 高重要度（設定エラー・ロック破損など）
    High,
}

impl AppError {
    /// クライアントに返すメッセージを取得
    ///
    /// # 戻り値
    /// レスポンスボディに書き込むエラーメッセージ
    pub fn user_message(&self) -> String {
        match self {
            AppError::Decode(e) => e.to_string(),
            AppError::PayloadTooLarge(_) => "request body too large".to_string(),
            AppError::Validation(_) => INVALID_RECEIPT_MESSAGE.to_string(),
            AppError::NotFound(_) => RECEIPT_NOT_FOUND_MESSAGE.to_string(),
            AppError::Configuration(_) => "設定エラーが発生しました".to_string(),
            AppError::Io(_) => "I/O処理でエラーが発生しました".to_string(),
            AppError::Concurrency(_) => "並行処理でエラーが発生しました".to_string(),
        }
    }

    /// エラーに対応するHTTPステータスコードを取得
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Decode(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_) | AppError::Io(_) | AppError::Concurrency(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// エラーの重要度を取得
    ///
    /// # 戻り値
    /// エラーの重要度レベル
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Decode(_) => ErrorSeverity::Low,
            AppError::PayloadTooLarge(_) => ErrorSeverity::Low,
            AppError::Validation(_) => ErrorSeverity::Low,
            AppError::NotFound(_) => ErrorSeverity::Low,
            AppError::Configuration(_) => ErrorSeverity::High,
            AppError::Io(_) => ErrorSeverity::Medium,
            AppError::Concurrency(_) => ErrorSeverity::High,
        }
    }

    /// リソース未発見エラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `resource` - 見つからなかったリソースの識別子
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        AppError::NotFound(resource.into())
    }

    /// 設定エラーを作成するヘルパー関数
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// 並行処理エラーを作成するヘルパー関数
    pub fn concurrency<S: Into<String>>(message: S) -> Self {
        AppError::Concurrency(message.into())
    }
}

/// Result型のエイリアス（アプリケーション全体で使用）
pub type AppResult<T> = Result<T, AppError>;
