//! 記憶體資料來源
//!
//! 以記憶體資料模擬 ERP 的進貨單、採購訂單與庫存查詢，並保存寫回結果。
//! 查詢條件與 ERP 搜尋一致：進貨單依狀態與回溯期過濾，採購訂單只取尚有未收數量的行。

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::lot::{InboundLot, LotSource, ShipmentStatus};
use crate::source::{ForecastSink, InboundShipmentSource, PurchaseOrderSource, StockSource};
use crate::{ForecastConfig, ForecastError, ForecastResult, Result, StockLevel};

/// 進貨單行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentLine {
    pub shipment_ref: String,
    pub item_id: String,
    pub status: ShipmentStatus,
    pub expected_date: NaiveDate,
    pub expected_quantity: Option<Decimal>,
}

/// 採購訂單行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    pub po_ref: String,
    pub item_id: String,
    pub expected_date: NaiveDate,
    pub ordered_qty: Decimal,
    pub received_qty: Decimal,
}

impl PurchaseOrderLine {
    /// 未收數量（訂購 - 已收）
    pub fn remaining_qty(&self) -> Decimal {
        (self.ordered_qty - self.received_qty).max(Decimal::ZERO)
    }
}

/// 記憶體 ERP 資料存放
///
/// 回溯期以每次查詢傳入的基準日計算，同一份資料可供不同日期的批次重複使用。
#[derive(Debug, Clone)]
pub struct MemoryErpStore {
    inbound_lookback_days: u32,
    purchase_order_lookback_days: u32,
    shipments: Vec<ShipmentLine>,
    purchase_orders: Vec<PurchaseOrderLine>,
    stock: Vec<StockLevel>,
    written: BTreeMap<String, ForecastResult>,
    failing_writes: HashSet<String>,
}

impl MemoryErpStore {
    /// 創建資料存放，回溯期取自配置
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            inbound_lookback_days: config.lookback_for(LotSource::InboundShipment),
            purchase_order_lookback_days: config.lookback_for(LotSource::PurchaseOrder),
            shipments: Vec::new(),
            purchase_orders: Vec::new(),
            stock: Vec::new(),
            written: BTreeMap::new(),
            failing_writes: HashSet::new(),
        }
    }

    pub fn add_shipment_line(&mut self, line: ShipmentLine) {
        self.shipments.push(line);
    }

    pub fn add_purchase_order_line(&mut self, line: PurchaseOrderLine) {
        self.purchase_orders.push(line);
    }

    pub fn add_stock_level(&mut self, level: StockLevel) {
        self.stock.push(level);
    }

    /// 指定物料寫回時失敗（模擬 ERP 儲存錯誤）
    pub fn fail_writes_for(&mut self, item_id: impl Into<String>) {
        self.failing_writes.insert(item_id.into());
    }

    /// 已寫回的結果
    pub fn written(&self, item_id: &str) -> Option<&ForecastResult> {
        self.written.get(item_id)
    }

    pub fn written_count(&self) -> usize {
        self.written.len()
    }

    fn cutoff(as_of: NaiveDate, lookback_days: u32) -> NaiveDate {
        as_of
            .checked_sub_days(Days::new(u64::from(lookback_days)))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl InboundShipmentSource for MemoryErpStore {
    fn fetch_inbound_shipment_lots(
        &self,
        item_ids: &[String],
        status_filter: &[ShipmentStatus],
        as_of: NaiveDate,
    ) -> Result<Vec<InboundLot>> {
        let cutoff = Self::cutoff(as_of, self.inbound_lookback_days);

        Ok(self
            .shipments
            .iter()
            .filter(|line| item_ids.contains(&line.item_id))
            .filter(|line| status_filter.contains(&line.status))
            .filter(|line| line.expected_date >= cutoff)
            .map(|line| {
                InboundLot::new(
                    line.item_id.clone(),
                    LotSource::InboundShipment,
                    line.expected_date,
                    line.expected_quantity,
                )
                .with_shipment_status(line.status)
                .with_source_ref(line.shipment_ref.clone())
            })
            .collect())
    }
}

impl PurchaseOrderSource for MemoryErpStore {
    fn fetch_purchase_order_lots(
        &self,
        item_ids: &[String],
        as_of: NaiveDate,
    ) -> Result<Vec<InboundLot>> {
        let cutoff = Self::cutoff(as_of, self.purchase_order_lookback_days);

        Ok(self
            .purchase_orders
            .iter()
            .filter(|line| item_ids.contains(&line.item_id))
            .filter(|line| line.expected_date >= cutoff)
            .filter(|line| line.remaining_qty() > Decimal::ZERO)
            .map(|line| {
                InboundLot::purchase_order(
                    line.item_id.clone(),
                    line.expected_date,
                    line.remaining_qty(),
                )
                .with_source_ref(line.po_ref.clone())
            })
            .collect())
    }
}

impl StockSource for MemoryErpStore {
    fn fetch_stock_levels(
        &self,
        item_ids: &[String],
        location_id: Option<&str>,
    ) -> Result<Vec<StockLevel>> {
        Ok(self
            .stock
            .iter()
            .filter(|level| item_ids.contains(&level.item_id))
            .filter(|level| match location_id {
                Some(location) => level.location_id.as_deref() == Some(location),
                None => true,
            })
            .cloned()
            .collect())
    }
}

impl ForecastSink for MemoryErpStore {
    fn write_forecast_result(&mut self, item_id: &str, result: &ForecastResult) -> Result<()> {
        if self.failing_writes.contains(item_id) {
            return Err(ForecastError::Sink {
                item_id: item_id.to_string(),
                message: "記錄已被鎖定".to_string(),
            });
        }
        self.written.insert(item_id.to_string(), result.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store() -> MemoryErpStore {
        MemoryErpStore::new(&ForecastConfig::default())
    }

    #[test]
    fn test_inbound_lookback_and_status_filter() {
        let mut store = store();
        store.add_shipment_line(ShipmentLine {
            shipment_ref: "IS-1".to_string(),
            item_id: "A".to_string(),
            status: ShipmentStatus::InTransit,
            expected_date: date(2024, 5, 10), // 剛好 10 天前
            expected_quantity: Some(Decimal::from(5)),
        });
        store.add_shipment_line(ShipmentLine {
            shipment_ref: "IS-2".to_string(),
            item_id: "A".to_string(),
            status: ShipmentStatus::InTransit,
            expected_date: date(2024, 5, 9), // 超出回溯期
            expected_quantity: Some(Decimal::from(5)),
        });
        store.add_shipment_line(ShipmentLine {
            shipment_ref: "IS-3".to_string(),
            item_id: "A".to_string(),
            status: ShipmentStatus::Received,
            expected_date: date(2024, 5, 25),
            expected_quantity: Some(Decimal::from(5)),
        });

        let lots = store
            .fetch_inbound_shipment_lots(
                &["A".to_string()],
                &ShipmentStatus::open_statuses(),
                date(2024, 5, 20),
            )
            .unwrap();

        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].source_ref.as_deref(), Some("IS-1"));
        assert!(lots[0].is_inbound_shipment());
    }

    #[test]
    fn test_purchase_order_remaining_quantity() {
        let mut store = store();
        store.add_purchase_order_line(PurchaseOrderLine {
            po_ref: "PO-1".to_string(),
            item_id: "B".to_string(),
            expected_date: date(2024, 6, 1),
            ordered_qty: Decimal::from(100),
            received_qty: Decimal::from(40),
        });
        store.add_purchase_order_line(PurchaseOrderLine {
            po_ref: "PO-2".to_string(),
            item_id: "B".to_string(),
            expected_date: date(2024, 6, 1),
            ordered_qty: Decimal::from(10),
            received_qty: Decimal::from(10),
        });

        let lots = store
            .fetch_purchase_order_lots(&["B".to_string()], date(2024, 5, 20))
            .unwrap();

        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].expected_quantity, Some(Decimal::from(60)));
    }

    #[test]
    fn test_lookback_follows_query_date() {
        let mut store = store();
        store.add_shipment_line(ShipmentLine {
            shipment_ref: "IS-1".to_string(),
            item_id: "A".to_string(),
            status: ShipmentStatus::InTransit,
            expected_date: date(2024, 5, 10),
            expected_quantity: Some(Decimal::from(5)),
        });
        store.add_purchase_order_line(PurchaseOrderLine {
            po_ref: "PO-1".to_string(),
            item_id: "A".to_string(),
            expected_date: date(2024, 4, 5),
            ordered_qty: Decimal::from(10),
            received_qty: Decimal::ZERO,
        });
        let ids = ["A".to_string()];
        let statuses = ShipmentStatus::open_statuses();

        // 2024-05-20：進貨單剛好 10 天前，採購單剛好 45 天前
        let may_20 = date(2024, 5, 20);
        assert_eq!(store.fetch_inbound_shipment_lots(&ids, &statuses, may_20).unwrap().len(), 1);
        assert_eq!(store.fetch_purchase_order_lots(&ids, may_20).unwrap().len(), 1);

        // 同一份資料，次日查詢兩者都超出回溯期
        let may_21 = date(2024, 5, 21);
        assert!(store.fetch_inbound_shipment_lots(&ids, &statuses, may_21).unwrap().is_empty());
        assert!(store.fetch_purchase_order_lots(&ids, may_21).unwrap().is_empty());
    }

    #[test]
    fn test_stock_location_filter() {
        let mut store = store();
        store.add_stock_level(StockLevel::new("C", Decimal::from(3)).with_location_id("WH-1"));
        store.add_stock_level(StockLevel::new("C", Decimal::from(8)).with_location_id("WH-2"));

        let levels = store
            .fetch_stock_levels(&["C".to_string()], Some("WH-2"))
            .unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].quantity_available, Decimal::from(8));

        let all = store.fetch_stock_levels(&["C".to_string()], None).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_write_back_and_failure() {
        let mut store = store();
        store.fail_writes_for("LOCKED");

        let result = ForecastResult::simple_part("OK", None, None);
        assert!(store.write_forecast_result("OK", &result).is_ok());
        assert!(store.write_forecast_result("LOCKED", &result).is_err());

        assert_eq!(store.written_count(), 1);
        assert_eq!(store.written("OK"), Some(&result));
    }
}
