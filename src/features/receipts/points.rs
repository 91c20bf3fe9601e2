// ポイント計算ルール
//
// 各ルールは独立して評価され、入力を解析できない場合はエラーにせず0点を返す。

use crate::features::receipts::models::{Item, Receipt};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

/// ASCII英数字のみにマッチする正規表現
static ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new("[a-zA-Z0-9]").expect("英数字パターンは常に有効"));

/// 購入日の形式（年4桁・月日2桁固定）
static PURCHASE_DATE_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("日付パターンは常に有効")
});

/// 購入時刻の形式（時は1〜2桁、分は2桁固定）
static PURCHASE_TIME_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,2}:[0-9]{2}$").expect("時刻パターンは常に有効"));

const ROUND_DOLLAR_POINTS: u64 = 50;
const QUARTER_MULTIPLE_POINTS: u64 = 25;
const POINTS_PER_ITEM_PAIR: u64 = 5;
const DESCRIPTION_LENGTH_MULTIPLE: usize = 3;
const DESCRIPTION_PRICE_MULTIPLIER: f64 = 0.2;
const ODD_DAY_POINTS: u64 = 6;
const AFTERNOON_POINTS: u64 = 10;
const AFTERNOON_START_HOUR: u32 = 14;
const AFTERNOON_END_HOUR: u32 = 16;

/// ルールごとの獲得ポイント内訳
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointsBreakdown {
    /// ルール1: 店舗名の英数字1文字につき1点
    pub retailer_name: u64,
    /// ルール2: 合計金額が端数なしの場合50点
    pub round_dollar_total: u64,
    /// ルール3: 合計金額が0.25の倍数の場合25点
    pub quarter_multiple_total: u64,
    /// ルール4: 品目2件につき5点
    pub item_pairs: u64,
    /// ルール5: 品目説明の英数字数が3の倍数の場合、価格×0.2の切り上げ
    pub item_descriptions: u64,
    /// ルール6: 購入日が奇数日の場合6点
    pub odd_purchase_day: u64,
    /// ルール7: 購入時刻が14:00以降16:00未満の場合10点
    pub afternoon_purchase: u64,
}

impl PointsBreakdown {
    /// 全ルールの合計ポイント
    pub fn total(&self) -> u64 {
        [
            self.retailer_name,
            self.round_dollar_total,
            self.quarter_multiple_total,
            self.item_pairs,
            self.item_descriptions,
            self.odd_purchase_day,
            self.afternoon_purchase,
        ]
        .into_iter()
        .fold(0, u64::saturating_add)
    }
}

/// 領収書のポイントを計算する
///
/// # 引数
/// * `receipt` - 領収書（バリデーションの有無は問わない）
///
/// # 戻り値
/// 7つのルールの合計ポイント
pub fn score(receipt: &Receipt) -> u64 {
    score_breakdown(receipt).total()
}

/// 領収書のポイントをルールごとに計算する
pub fn score_breakdown(receipt: &Receipt) -> PointsBreakdown {
    let breakdown = PointsBreakdown {
        retailer_name: retailer_name_points(&receipt.retailer),
        round_dollar_total: round_dollar_points(&receipt.total),
        quarter_multiple_total: quarter_multiple_points(&receipt.total),
        item_pairs: item_pair_points(&receipt.items),
        item_descriptions: item_description_points(&receipt.items),
        odd_purchase_day: odd_day_points(&receipt.purchase_date),
        afternoon_purchase: afternoon_points(&receipt.purchase_time),
    };

    log::debug!("ポイント内訳: {breakdown:?}");
    breakdown
}

/// ASCII英数字の文字数を数える
fn alphanumeric_count(text: &str) -> usize {
    ALPHANUMERIC.find_iter(text).count()
}

/// 10進数の文字列を解析する（失敗時はNone）
fn parse_decimal(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

fn retailer_name_points(retailer: &str) -> u64 {
    alphanumeric_count(retailer) as u64
}

fn round_dollar_points(total: &str) -> u64 {
    match parse_decimal(total) {
        Some(amount) if amount % 1.0 == 0.0 => ROUND_DOLLAR_POINTS,
        _ => 0,
    }
}

fn quarter_multiple_points(total: &str) -> u64 {
    match parse_decimal(total) {
        Some(amount) if amount % 0.25 == 0.0 => QUARTER_MULTIPLE_POINTS,
        _ => 0,
    }
}

fn item_pair_points(items: &[Item]) -> u64 {
    (items.len() / 2) as u64 * POINTS_PER_ITEM_PAIR
}

fn item_description_points(items: &[Item]) -> u64 {
    items
        .iter()
        .map(item_description_bonus)
        .fold(0, u64::saturating_add)
}

/// 品目1件分のルール5ポイント
///
/// 説明文は前後の空白を除去してから英数字を数える。
/// 負の価格や非有限値からは0点とする
fn item_description_bonus(item: &Item) -> u64 {
    let trimmed = item.short_description.trim();
    let cleaned_length = alphanumeric_count(trimmed);

    if cleaned_length % DESCRIPTION_LENGTH_MULTIPLE != 0 {
        return 0;
    }

    let Some(price) = parse_decimal(&item.price) else {
        return 0;
    };

    let bonus = (price * DESCRIPTION_PRICE_MULTIPLIER).ceil();
    log::trace!(
        "品目: {trimmed:?}, 英数字数: {cleaned_length}, 価格: {price}, 加算: {bonus}"
    );

    if bonus.is_finite() && bonus > 0.0 {
        bonus as u64
    } else {
        0
    }
}

/// chronoは桁数の不足や先頭の空白を許容するため、先に形式を固定幅で確認する
fn odd_day_points(purchase_date: &str) -> u64 {
    if !PURCHASE_DATE_FORMAT.is_match(purchase_date) {
        return 0;
    }

    match NaiveDate::parse_from_str(purchase_date, "%Y-%m-%d") {
        Ok(date) if date.day() % 2 == 1 => ODD_DAY_POINTS,
        _ => 0,
    }
}

fn afternoon_points(purchase_time: &str) -> u64 {
    if !PURCHASE_TIME_FORMAT.is_match(purchase_time) {
        return 0;
    }

    match NaiveTime::parse_from_str(purchase_time, "%H:%M") {
        Ok(time) if (AFTERNOON_START_HOUR..AFTERNOON_END_HOUR).contains(&time.hour()) => {
            AFTERNOON_POINTS
        }
        _ => 0,
    }
}
