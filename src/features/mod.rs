/// 機能別モジュール
///
/// 各機能モジュールは、その機能に関連するコード（モデル、ビジネスロジック、ストア、ハンドラー）
/// を含む自己完結型のユニットです。
pub mod receipts;
