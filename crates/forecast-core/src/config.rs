//! 預測配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::WorkCalendar;
use crate::lot::{LotSource, ShipmentStatus};
use crate::{ForecastError, Result};

/// 收貨預測參數配置
///
/// 各項天數為業務常數，預設值沿用現行收貨規則。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// 在途進貨單的提前期（天）
    pub inbound_lead_time_days: u32,

    /// 採購訂單的提前期（天）
    pub purchase_order_lead_time_days: u32,

    /// 無任何批次時的預設時界（天）
    pub fallback_horizon_days: u32,

    /// 進貨單查詢的回溯天數
    pub inbound_lookback_days: u32,

    /// 採購訂單查詢的回溯天數
    pub purchase_order_lookback_days: u32,

    /// 套件缺料時的保守預計數量
    pub incomplete_kit_receipt_qty: Decimal,

    /// 庫存地點
    pub location_id: Option<String>,

    /// 進貨單狀態過濾條件
    pub inbound_status_filter: Vec<ShipmentStatus>,

    /// 收貨日曆
    pub calendar: WorkCalendar,
}

impl ForecastConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            inbound_lead_time_days: 10,
            purchase_order_lead_time_days: 45,
            fallback_horizon_days: 90,
            inbound_lookback_days: 10,
            purchase_order_lookback_days: 45,
            incomplete_kit_receipt_qty: Decimal::ONE,
            location_id: None,
            inbound_status_filter: ShipmentStatus::open_statuses(),
            calendar: WorkCalendar::default(),
        }
    }

    /// 從 JSON 載入配置，未提供的欄位使用預設值
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ForecastError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置進貨單提前期
    pub fn with_inbound_lead_time(mut self, days: u32) -> Self {
        self.inbound_lead_time_days = days;
        self
    }

    /// 建構器模式：設置採購訂單提前期
    pub fn with_purchase_order_lead_time(mut self, days: u32) -> Self {
        self.purchase_order_lead_time_days = days;
        self
    }

    /// 建構器模式：設置預設時界
    pub fn with_fallback_horizon(mut self, days: u32) -> Self {
        self.fallback_horizon_days = days;
        self
    }

    /// 建構器模式：設置庫存地點
    pub fn with_location_id(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    /// 建構器模式：設置進貨單狀態過濾
    pub fn with_inbound_status_filter(mut self, statuses: Vec<ShipmentStatus>) -> Self {
        self.inbound_status_filter = statuses;
        self
    }

    /// 建構器模式：設置收貨日曆
    pub fn with_calendar(mut self, calendar: WorkCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// 依批次來源取得提前期
    pub fn lead_time_for(&self, source: LotSource) -> u32 {
        match source {
            LotSource::InboundShipment => self.inbound_lead_time_days,
            LotSource::PurchaseOrder => self.purchase_order_lead_time_days,
        }
    }

    /// 依批次來源取得查詢回溯天數
    pub fn lookback_for(&self, source: LotSource) -> u32 {
        match source {
            LotSource::InboundShipment => self.inbound_lookback_days,
            LotSource::PurchaseOrder => self.purchase_order_lookback_days,
        }
    }

    /// 驗證配置
    pub fn validate(&self) -> Result<()> {
        if self.incomplete_kit_receipt_qty < Decimal::ZERO {
            return Err(ForecastError::Config(format!(
                "缺料套件預計數量不可為負數: {}",
                self.incomplete_kit_receipt_qty
            )));
        }
        self.calendar.validate()
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self::new()
    }
}
