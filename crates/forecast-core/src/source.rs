//! 外部資料介面
//!
//! 讀取進貨單、採購訂單、庫存，以及寫回預測結果。實作由 ERP 串接層提供。

use chrono::NaiveDate;

use crate::{ForecastResult, InboundLot, Result, ShipmentStatus, StockLevel};

/// 在途進貨單來源
pub trait InboundShipmentSource {
    /// 取得未結進貨批次（依狀態過濾，僅含 `as_of` 回溯期內的日期）
    fn fetch_inbound_shipment_lots(
        &self,
        item_ids: &[String],
        status_filter: &[ShipmentStatus],
        as_of: NaiveDate,
    ) -> Result<Vec<InboundLot>>;
}

/// 採購訂單來源
pub trait PurchaseOrderSource {
    /// 取得未結採購訂單行（數量為未收數量，僅含 `as_of` 回溯期內的日期）
    fn fetch_purchase_order_lots(
        &self,
        item_ids: &[String],
        as_of: NaiveDate,
    ) -> Result<Vec<InboundLot>>;
}

/// 庫存來源
pub trait StockSource {
    /// 取得指定地點的可用庫存
    fn fetch_stock_levels(
        &self,
        item_ids: &[String],
        location_id: Option<&str>,
    ) -> Result<Vec<StockLevel>>;
}

/// 預測結果寫回
pub trait ForecastSink {
    fn write_forecast_result(&mut self, item_id: &str, result: &ForecastResult) -> Result<()>;
}
