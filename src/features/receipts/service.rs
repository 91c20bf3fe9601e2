use crate::features::receipts::models::Receipt;
use crate::features::receipts::points;
use crate::features::receipts::store::ReceiptStore;
use crate::features::receipts::validation;
use crate::shared::errors::AppResult;
use std::sync::Arc;

/// 領収書の処理（検証・ポイント計算・保存）とポイント照会を行うサービス
#[derive(Debug, Clone)]
pub struct ReceiptService {
    store: Arc<ReceiptStore>,
}

impl ReceiptService {
    /// 新しいReceiptServiceを作成する
    ///
    /// # 引数
    /// * `store` - 共有する領収書ストア
    pub fn new(store: Arc<ReceiptStore>) -> Self {
        Self { store }
    }

    /// 領収書を処理してIDを発行する
    ///
    /// # 引数
    /// * `receipt` - デコード済みの領収書
    ///
    /// # 戻り値
    /// 発行したID、または必須項目が欠けている場合はバリデーションエラー
    pub fn process(&self, receipt: Receipt) -> AppResult<String> {
        validation::validate(&receipt)?;

        let points = points::score(&receipt);
        let id = self.store.insert(receipt, points)?;

        log::info!("領収書を処理しました: id={id}, points={points}");
        Ok(id)
    }

    /// IDに対応するポイントを取得する
    pub fn points(&self, id: &str) -> AppResult<u64> {
        self.store.lookup(id)
    }
}
