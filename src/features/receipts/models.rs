// 領収書機能のデータモデル

use serde::{Deserialize, Serialize};

/// 領収書の購入品目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub short_description: String,
    pub price: String, // 10進数の文字列表現（例: "6.49"）
}

/// 領収書
///
/// 欠落したフィールドは空文字列・空配列としてデコードされ、
/// 必須チェックはバリデーション側で行う
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Receipt {
    pub retailer: String,
    pub purchase_date: String, // YYYY-MM-DD
    pub purchase_time: String, // HH:MM（24時間表記）
    pub items: Vec<Item>,
    pub total: String,
}

/// 保存済みの領収書とそのポイント
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub id: String,
    pub receipt: Receipt,
    pub points: u64,
}

/// `POST /receipts/process` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessReceiptResponse {
    pub id: String,
}

/// `GET /receipts/{id}/points` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptPointsResponse {
    pub points: u64,
}

impl Item {
    pub fn new(short_description: &str, price: &str) -> Self {
        Self {
            short_description: short_description.to_string(),
            price: price.to_string(),
        }
    }
}
