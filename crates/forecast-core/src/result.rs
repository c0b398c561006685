//! 預測結果模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 預測結果（每個物料一筆）
///
/// `None` 代表「沒有預測」，與「預測為 0」區分。套件專屬欄位在單件上為 `None`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// 物料ID
    pub item_id: String,

    /// 下次收貨日期
    pub next_receipt_date: Option<NaiveDate>,

    /// 下次收貨數量
    pub next_receipt_quantity: Option<Decimal>,

    /// 可組裝套數（僅套件）
    pub available_kit_quantity: Option<u64>,

    /// 所有子件是否至少足夠一套（僅套件）
    pub all_components_in_stock: Option<bool>,
}

impl ForecastResult {
    /// 創建單件預測結果
    pub fn simple_part(
        item_id: impl Into<String>,
        next_receipt_date: Option<NaiveDate>,
        next_receipt_quantity: Option<Decimal>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            next_receipt_date,
            next_receipt_quantity,
            available_kit_quantity: None,
            all_components_in_stock: None,
        }
    }

    /// 創建套件預測結果
    pub fn kit(
        item_id: impl Into<String>,
        next_receipt_date: Option<NaiveDate>,
        next_receipt_quantity: Option<Decimal>,
        available_kit_quantity: u64,
        all_components_in_stock: bool,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            next_receipt_date,
            next_receipt_quantity,
            available_kit_quantity: Some(available_kit_quantity),
            all_components_in_stock: Some(all_components_in_stock),
        }
    }

    pub fn is_kit(&self) -> bool {
        self.available_kit_quantity.is_some()
    }

    /// 是否有收貨日期預測
    pub fn has_forecast(&self) -> bool {
        self.next_receipt_date.is_some()
    }
}
