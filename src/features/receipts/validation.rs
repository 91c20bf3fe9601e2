use crate::features::receipts::models::Receipt;
use thiserror::Error;

/// 領収書のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 必須フィールドが空
    #[error("必須項目が入力されていません: {0}")]
    MissingField(&'static str),
}

/// 領収書の必須フィールドを検証する
///
/// # 引数
/// * `receipt` - デコード済みの領収書
///
/// # 戻り値
/// すべての必須項目が揃っている場合はOk(())、最初に見つかった欠落項目をエラーとして返す
///
/// # バリデーション規則
/// - retailer, purchaseDate, purchaseTime, total が空文字列でないこと
/// - items が1件以上あること
///
/// 日付・時刻・金額の形式は検証しない（ポイント計算側で0点として扱う）
pub fn validate(receipt: &Receipt) -> Result<(), ValidationError> {
    let required = [
        ("retailer", &receipt.retailer),
        ("purchaseDate", &receipt.purchase_date),
        ("purchaseTime", &receipt.purchase_time),
    ];

    for (field, value) in required {
        validate_required_field(value, field)?;
    }

    if receipt.items.is_empty() {
        return Err(ValidationError::MissingField("items"));
    }

    validate_required_field(&receipt.total, "total")
}

fn validate_required_field(text: &str, field: &'static str) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::receipts::models::Item;

    fn complete_receipt() -> Receipt {
        Receipt {
            retailer: "Target".to_string(),
            purchase_date: "2022-01-01".to_string(),
            purchase_time: "13:01".to_string(),
            items: vec![Item::new("Mountain Dew 12PK", "6.49")],
            total: "6.49".to_string(),
        }
    }

    #[test]
    fn test_complete_receipt_is_valid() {
        assert_eq!(validate(&complete_receipt()), Ok(()));
    }

    #[test]
    fn test_empty_receipt_is_rejected() {
        assert_eq!(
            validate(&Receipt::default()),
            Err(ValidationError::MissingField("retailer"))
        );
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        let mut receipt = complete_receipt();
        receipt.purchase_date.clear();
        assert_eq!(
            validate(&receipt),
            Err(ValidationError::MissingField("purchaseDate"))
        );

        let mut receipt = complete_receipt();
        receipt.purchase_time.clear();
        assert_eq!(
            validate(&receipt),
            Err(ValidationError::MissingField("purchaseTime"))
        );

        let mut receipt = complete_receipt();
        receipt.items.clear();
        assert_eq!(validate(&receipt), Err(ValidationError::MissingField("items")));

        let mut receipt = complete_receipt();
        receipt.total.clear();
        assert_eq!(validate(&receipt), Err(ValidationError::MissingField("total")));
    }

    #[test]
    fn test_malformed_values_are_not_validated() {
        // 形式の誤りはポイント計算で吸収される
        let mut receipt = complete_receipt();
        receipt.purchase_date = "not-a-date".to_string();
        receipt.purchase_time = "25:99".to_string();
        receipt.total = "abc".to_string();
        receipt.items = vec![Item::new("", "")];
        assert_eq!(validate(&receipt), Ok(()));
    }
}
