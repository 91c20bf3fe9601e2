// 領収書機能モジュール

pub mod handlers;
pub mod models;
pub mod points;
pub mod service;
pub mod store;
pub mod validation;

// 公開インターフェース
pub use models::{Item, ProcessReceiptResponse, Receipt, ReceiptPointsResponse, ScoreRecord};
pub use points::{score, score_breakdown, PointsBreakdown};
pub use service::ReceiptService;
pub use store::ReceiptStore;
pub use validation::{validate, ValidationError};
