use crate::features::receipts::models::{Receipt, ScoreRecord};
use crate::shared::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// 処理済み領収書のインメモリストア
///
/// 内部のマップは単一のロックで保護され、呼び出し側には複製のみを返す。
/// 更新・削除の操作は持たない
#[derive(Debug, Default)]
pub struct ReceiptStore {
    records: Mutex<HashMap<String, ScoreRecord>>,
}

impl ReceiptStore {
    /// 空のストアを作成する
    pub fn new() -> Self {
        Self::default()
    }

    /// 領収書とポイントを保存する
    ///
    /// # 引数
    /// * `receipt` - 検証済みの領収書
    /// * `points` - 計算済みのポイント
    ///
    /// # 戻り値
    /// 新しく発行したID（UUID v4）
    pub fn insert(&self, receipt: Receipt, points: u64) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        let record = ScoreRecord {
            id: id.clone(),
            receipt,
            points,
        };

        self.lock()?.insert(id.clone(), record);
        log::debug!("領収書を保存しました: id={id}, points={points}");

        Ok(id)
    }

    /// IDに対応するポイントを取得する
    ///
    /// # 戻り値
    /// ポイント、または未登録のIDの場合はNotFoundエラー
    pub fn lookup(&self, id: &str) -> AppResult<u64> {
        self.get(id).map(|record| record.points)
    }

    /// IDに対応する保存済みレコードの複製を取得する
    pub fn get(&self, id: &str) -> AppResult<ScoreRecord> {
        self.lock()?
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(id))
    }

    /// 保存済みレコード数
    pub fn len(&self) -> AppResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, HashMap<String, ScoreRecord>>> {
        self.records
            .lock()
            .map_err(|e| AppError::concurrency(format!("ストアのロック取得失敗: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::receipts::models::Item;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn sample_receipt(retailer: &str) -> Receipt {
        Receipt {
            retailer: retailer.to_string(),
            purchase_date: "2022-01-01".to_string(),
            purchase_time: "13:01".to_string(),
            items: vec![Item::new("Mountain Dew 12PK", "6.49")],
            total: "6.49".to_string(),
        }
    }

    #[test]
    fn test_insert_then_lookup() {
        let store = ReceiptStore::new();
        assert!(store.is_empty().unwrap());

        let id = store.insert(sample_receipt("Target"), 28).unwrap();
        assert_eq!(store.lookup(&id).unwrap(), 28);
        assert_eq!(store.len().unwrap(), 1);

        let record = store.get(&id).unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.receipt, sample_receipt("Target"));
        assert_eq!(record.points, 28);
    }

    #[test]
    fn test_lookup_unknown_id_is_not_found() {
        let store = ReceiptStore::new();
        store.insert(sample_receipt("Target"), 28).unwrap();

        let error = store.lookup("00000000-0000-0000-0000-000000000000").unwrap_err();
        assert!(matches!(error, AppError::NotFound(_)));
        assert!(matches!(store.get(""), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_ids_are_unique() {
        let store = ReceiptStore::new();
        let ids: HashSet<String> = (0..100)
            .map(|points| store.insert(sample_receipt("Target"), points).unwrap())
            .collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_stores_are_isolated() {
        let first = ReceiptStore::new();
        let second = ReceiptStore::new();

        let id = first.insert(sample_receipt("Target"), 28).unwrap();
        assert!(matches!(second.lookup(&id), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_concurrent_inserts() {
        let store = Arc::new(ReceiptStore::new());

        let handles: Vec<_> = (0..10u64)
            .map(|points| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let id = store.insert(sample_receipt("Target"), points).unwrap();
                    (id, points)
                })
            })
            .collect();

        let results: Vec<(String, u64)> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let ids: HashSet<&String> = results.iter().map(|(id, _)| id).collect();
        assert_eq!(ids.len(), 10);

        for (id, points) in &results {
            assert_eq!(store.lookup(id).unwrap(), *points);
        }
    }
}
