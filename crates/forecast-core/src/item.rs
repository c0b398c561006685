//! 物料模型（單件與套件）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{ForecastError, Result};

/// 套件組成項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitComponent {
    /// 子件物料ID
    pub component_id: String,

    /// 每套所需數量（必須大於 0）
    pub required_qty_per_kit: Decimal,
}

impl KitComponent {
    pub fn new(component_id: impl Into<String>, required_qty_per_kit: Decimal) -> Self {
        Self {
            component_id: component_id.into(),
            required_qty_per_kit,
        }
    }
}

/// 物料類型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// 單件：直接依進貨批次預測
    SimplePart,
    /// 套件：依子件庫存與用量比例計算（子件順序保留）
    Kit { components: Vec<KitComponent> },
}

/// 物料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// 物料ID
    pub item_id: String,

    /// 物料類型
    pub kind: ItemKind,

    /// 無批次資料時使用的預設收貨數量
    pub default_receipt_qty: Option<Decimal>,
}

impl Item {
    /// 創建單件物料
    pub fn simple_part(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            kind: ItemKind::SimplePart,
            default_receipt_qty: None,
        }
    }

    /// 創建套件物料
    pub fn kit(item_id: impl Into<String>, components: Vec<KitComponent>) -> Self {
        Self {
            item_id: item_id.into(),
            kind: ItemKind::Kit { components },
            default_receipt_qty: None,
        }
    }

    /// 建構器模式：設置預設收貨數量
    pub fn with_default_receipt_qty(mut self, qty: Decimal) -> Self {
        self.default_receipt_qty = Some(qty);
        self
    }

    pub fn is_kit(&self) -> bool {
        matches!(self.kind, ItemKind::Kit { .. })
    }

    /// 套件子件（單件回傳空切片）
    pub fn components(&self) -> &[KitComponent] {
        match &self.kind {
            ItemKind::Kit { components } => components,
            ItemKind::SimplePart => &[],
        }
    }

    /// 驗證物料本身的結構
    pub fn validate(&self) -> Result<()> {
        if self.item_id.trim().is_empty() {
            return Err(ForecastError::validation("物料ID不可為空"));
        }

        if let Some(qty) = self.default_receipt_qty {
            if qty < Decimal::ZERO {
                return Err(ForecastError::validation(format!(
                    "物料 {} 的預設收貨數量為負數: {}",
                    self.item_id, qty
                )));
            }
        }

        validate_components(&self.item_id, self.components())
    }
}

/// 驗證套件子件：ID 不可為空、不可重複、用量必須大於 0
pub fn validate_components(kit_id: &str, components: &[KitComponent]) -> Result<()> {
    let mut seen = HashSet::new();

    for component in components {
        if component.component_id.trim().is_empty() {
            return Err(ForecastError::validation(format!(
                "套件 {} 含有空白的子件ID",
                kit_id
            )));
        }

        if component.required_qty_per_kit <= Decimal::ZERO {
            return Err(ForecastError::validation(format!(
                "套件 {} 的子件 {} 用量必須大於 0，實際 {}",
                kit_id, component.component_id, component.required_qty_per_kit
            )));
        }

        if !seen.insert(component.component_id.as_str()) {
            return Err(ForecastError::validation(format!(
                "套件 {} 的子件 {} 重複",
                kit_id, component.component_id
            )));
        }
    }

    Ok(())
}
