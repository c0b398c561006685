//! 批次彙總

use chrono::NaiveDate;
use forecast_core::inventory::add_quantity;
use forecast_core::{ForecastError, InboundLot, LotSource, Result};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 單一子件的進貨彙總
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentSupply {
    /// 在途進貨數量合計
    pub inbound_qty: Decimal,
    /// 採購訂單數量合計
    pub purchase_order_qty: Decimal,
    /// 最早在途進貨日期
    pub earliest_inbound_date: Option<NaiveDate>,
    /// 最早採購訂單日期
    pub earliest_purchase_order_date: Option<NaiveDate>,
}

impl ComponentSupply {
    /// 從批次列表彙總
    ///
    /// 數量合計溢出時回傳驗證錯誤。
    pub fn from_lots(lots: &[InboundLot]) -> Result<Self> {
        let mut supply = Self::default();

        for lot in lots {
            match lot.source {
                LotSource::InboundShipment => {
                    supply.inbound_qty =
                        add_quantity(supply.inbound_qty, lot.quantity_or_zero(), &lot.item_id)?;
                    supply.earliest_inbound_date =
                        earliest(supply.earliest_inbound_date, lot.expected_date);
                }
                LotSource::PurchaseOrder => {
                    supply.purchase_order_qty = add_quantity(
                        supply.purchase_order_qty,
                        lot.quantity_or_zero(),
                        &lot.item_id,
                    )?;
                    supply.earliest_purchase_order_date =
                        earliest(supply.earliest_purchase_order_date, lot.expected_date);
                }
            }
        }

        Ok(supply)
    }

    /// 進貨與採購合計數量
    pub fn total_incoming(&self) -> Result<Decimal> {
        self.inbound_qty
            .checked_add(self.purchase_order_qty)
            .ok_or_else(|| {
                ForecastError::validation(format!(
                    "進貨合計溢出: {} + {}",
                    self.inbound_qty, self.purchase_order_qty
                ))
            })
    }

    /// 最早預計到貨日：有在途進貨時只看進貨單，否則看採購訂單
    pub fn earliest_expected_date(&self) -> Option<NaiveDate> {
        self.earliest_inbound_date
            .or(self.earliest_purchase_order_date)
    }
}

fn earliest(current: Option<NaiveDate>, candidate: NaiveDate) -> Option<NaiveDate> {
    Some(match current {
        Some(date) => date.min(candidate),
        None => candidate,
    })
}

/// 按物料分組批次
pub fn group_lots_by_item(lots: &[InboundLot]) -> HashMap<String, Vec<InboundLot>> {
    let mut grouped = HashMap::new();
    for lot in lots {
        grouped
            .entry(lot.item_id.clone())
            .or_insert_with(Vec::new)
            .push(lot.clone());
    }
    grouped
}

/// 驗證批次屬於指定物料且數量合法
pub fn validate_lots_for(item_id: &str, lots: &[InboundLot]) -> Result<()> {
    for lot in lots {
        lot.validate()?;
        if lot.item_id != item_id {
            return Err(ForecastError::validation(format!(
                "批次屬於物料 {}，不屬於 {}",
                lot.item_id, item_id
            )));
        }
    }
    Ok(())
}

/// 向下取整的比例（數量 / 每套用量）
pub fn floor_ratio(quantity: Decimal, per_unit: Decimal) -> Result<Decimal> {
    if per_unit <= Decimal::ZERO {
        return Err(ForecastError::validation(format!(
            "每套用量必須大於 0，實際 {}",
            per_unit
        )));
    }
    quantity
        .checked_div(per_unit)
        .map(|ratio| ratio.floor())
        .ok_or_else(|| ForecastError::validation(format!("數量溢出: {} / {}", quantity, per_unit)))
}
