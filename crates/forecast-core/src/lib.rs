//! # Forecast Core
//!
//! 收貨預測的核心資料模型與類型定義

pub mod calendar;
pub mod config;
pub mod inventory;
pub mod item;
pub mod lot;
pub mod memory;
pub mod result;
pub mod source;

// Re-export 主要類型
pub use calendar::{roll_forward_weekend, WorkCalendar};
pub use config::ForecastConfig;
pub use inventory::StockLevel;
pub use item::{Item, ItemKind, KitComponent};
pub use lot::{InboundLot, LotSource, ShipmentStatus};
pub use memory::{MemoryErpStore, PurchaseOrderLine, ShipmentLine};
pub use result::ForecastResult;
pub use source::{ForecastSink, InboundShipmentSource, PurchaseOrderSource, StockSource};

/// 預測錯誤類型
///
/// 查無資料（DataUnavailable）不屬於錯誤，一律以哨兵值或預設規則處理。
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("輸入驗證失敗: {0}")]
    Validation(String),

    #[error("資料來源讀取失敗: {0}")]
    Source(String),

    #[error("寫回物料 {item_id} 失敗: {message}")]
    Sink { item_id: String, message: String },

    #[error("日期溢出: {0}")]
    DateOverflow(String),

    #[error("配置錯誤: {0}")]
    Config(String),
}

impl ForecastError {
    /// 建立驗證錯誤
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// 是否為輸入驗證錯誤
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
