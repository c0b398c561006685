//! 進貨批次模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ForecastError, Result};

/// 批次來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LotSource {
    /// 在途進貨單（Inbound Shipment）
    InboundShipment,
    /// 採購訂單行
    PurchaseOrder,
}

/// 進貨單狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    /// 待出貨
    ToBeShipped,
    /// 在途
    InTransit,
    /// 部分收貨
    PartiallyReceived,
    /// 已收貨
    Received,
    /// 已關閉
    Closed,
}

impl ShipmentStatus {
    /// 預設的未結狀態過濾條件
    pub fn open_statuses() -> Vec<ShipmentStatus> {
        vec![
            ShipmentStatus::ToBeShipped,
            ShipmentStatus::InTransit,
            ShipmentStatus::PartiallyReceived,
        ]
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, ShipmentStatus::Received | ShipmentStatus::Closed)
    }
}

/// 進貨批次：某物料的一次預計補貨事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundLot {
    /// 批次ID
    pub id: Uuid,

    /// 批次來源
    pub source: LotSource,

    /// 物料ID
    pub item_id: String,

    /// 預計到貨日期
    pub expected_date: NaiveDate,

    /// 預計數量（None 表示來源未提供數量）
    pub expected_quantity: Option<Decimal>,

    /// 進貨單狀態（僅進貨單批次有）
    pub shipment_status: Option<ShipmentStatus>,

    /// 來源單據
    pub source_ref: Option<String>,
}

impl InboundLot {
    /// 創建新的批次
    pub fn new(
        item_id: impl Into<String>,
        source: LotSource,
        expected_date: NaiveDate,
        expected_quantity: Option<Decimal>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            item_id: item_id.into(),
            expected_date,
            expected_quantity,
            shipment_status: None,
            source_ref: None,
        }
    }

    /// 創建在途進貨批次
    pub fn inbound_shipment(
        item_id: impl Into<String>,
        expected_date: NaiveDate,
        expected_quantity: Decimal,
    ) -> Self {
        Self::new(
            item_id,
            LotSource::InboundShipment,
            expected_date,
            Some(expected_quantity),
        )
        .with_shipment_status(ShipmentStatus::InTransit)
    }

    /// 創建採購訂單批次
    pub fn purchase_order(
        item_id: impl Into<String>,
        expected_date: NaiveDate,
        expected_quantity: Decimal,
    ) -> Self {
        Self::new(
            item_id,
            LotSource::PurchaseOrder,
            expected_date,
            Some(expected_quantity),
        )
    }

    /// 建構器模式：設置進貨單狀態
    pub fn with_shipment_status(mut self, status: ShipmentStatus) -> Self {
        self.shipment_status = Some(status);
        self
    }

    /// 建構器模式：設置來源單據
    pub fn with_source_ref(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }

    pub fn is_inbound_shipment(&self) -> bool {
        self.source == LotSource::InboundShipment
    }

    pub fn is_purchase_order(&self) -> bool {
        self.source == LotSource::PurchaseOrder
    }

    /// 數量（未提供時視為 0，用於彙總）
    pub fn quantity_or_zero(&self) -> Decimal {
        self.expected_quantity.unwrap_or(Decimal::ZERO)
    }

    /// 驗證批次
    pub fn validate(&self) -> Result<()> {
        if self.item_id.trim().is_empty() {
            return Err(ForecastError::validation("批次缺少物料ID"));
        }

        if let Some(qty) = self.expected_quantity {
            if qty < Decimal::ZERO {
                return Err(ForecastError::validation(format!(
                    "物料 {} 的批次數量為負數: {}",
                    self.item_id, qty
                )));
            }
        }

        Ok(())
    }
}
