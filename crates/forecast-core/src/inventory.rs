//! 庫存模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{ForecastError, Result};

/// 庫存水位（單一地點，已扣除分配量）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevel {
    /// 物料ID
    pub item_id: String,

    /// 可用庫存
    pub quantity_available: Decimal,

    /// 倉庫/地點
    pub location_id: Option<String>,
}

impl StockLevel {
    /// 創建新的庫存記錄
    pub fn new(item_id: impl Into<String>, quantity_available: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            quantity_available,
            location_id: None,
        }
    }

    /// 從現有庫存與已分配數量計算可用庫存
    ///
    /// 分配量超過現有量時可用庫存為 0，不會出現負數。
    pub fn from_on_hand(
        item_id: impl Into<String>,
        on_hand_qty: Decimal,
        allocated_qty: Decimal,
    ) -> Self {
        let available = (on_hand_qty - allocated_qty).max(Decimal::ZERO);
        Self::new(item_id, available)
    }

    /// 建構器模式：設置地點
    pub fn with_location_id(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    /// 是否足夠指定數量
    pub fn covers(&self, quantity: Decimal) -> bool {
        self.quantity_available >= quantity
    }

    /// 驗證庫存記錄
    pub fn validate(&self) -> Result<()> {
        if self.item_id.trim().is_empty() {
            return Err(ForecastError::validation("庫存記錄缺少物料ID"));
        }
        if self.quantity_available < Decimal::ZERO {
            return Err(ForecastError::validation(format!(
                "物料 {} 的可用庫存為負數: {}",
                self.item_id, self.quantity_available
            )));
        }
        Ok(())
    }
}

/// 數量相加，溢出時回傳驗證錯誤
pub fn add_quantity(total: Decimal, quantity: Decimal, item_id: &str) -> Result<Decimal> {
    total.checked_add(quantity).ok_or_else(|| {
        ForecastError::validation(format!(
            "物料 {} 數量合計溢出: {} + {}",
            item_id, total, quantity
        ))
    })
}

/// 建立庫存映射，同一物料多筆記錄時數量相加
pub fn stock_map(levels: &[StockLevel]) -> Result<HashMap<String, Decimal>> {
    let mut map: HashMap<String, Decimal> = HashMap::new();
    for level in levels {
        let total = map.entry(level.item_id.clone()).or_insert(Decimal::ZERO);
        *total = add_quantity(*total, level.quantity_available, &level.item_id)?;
    }
    Ok(map)
}
