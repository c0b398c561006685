//! 預測批次執行
//!
//! 從外部來源讀取資料、執行引擎並寫回結果。讀取失敗中止整批；寫回失敗逐筆記錄，不影響其他物料。

use chrono::NaiveDate;
use forecast_core::{
    ForecastError, ForecastResult, ForecastSink, InboundShipmentSource, Item, PurchaseOrderSource,
    StockSource,
};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::engine::ForecastEngine;
use crate::{CatalogForecast, ForecastWarning};

/// 寫回失敗記錄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub item_id: String,
    pub message: String,
}

/// 批次執行報告
#[derive(Debug, Clone)]
pub struct RunReport {
    /// 執行ID
    pub run_id: Uuid,

    /// 預測基準日
    pub today: NaiveDate,

    /// 預測結果
    pub results: Vec<ForecastResult>,

    /// 警告信息
    pub warnings: Vec<ForecastWarning>,

    /// 成功寫回筆數
    pub written_count: usize,

    /// 寫回失敗
    pub write_failures: Vec<WriteFailure>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl RunReport {
    /// 全部寫回成功
    pub fn is_clean(&self) -> bool {
        self.write_failures.is_empty()
    }
}

/// 預測批次執行器
pub struct ForecastRunner {
    engine: ForecastEngine,
}

impl ForecastRunner {
    pub fn new(engine: ForecastEngine) -> Self {
        Self { engine }
    }

    /// 讀取資料並預測（不寫回）
    pub fn fetch_and_forecast<S>(
        &self,
        catalog: &[Item],
        source: &S,
        today: NaiveDate,
    ) -> forecast_core::Result<CatalogForecast>
    where
        S: InboundShipmentSource + PurchaseOrderSource + StockSource,
    {
        let config = self.engine.config();
        let item_ids = Self::required_item_ids(catalog);
        tracing::debug!("查詢物料 {} 筆", item_ids.len());

        let mut lots =
            source.fetch_inbound_shipment_lots(&item_ids, &config.inbound_status_filter, today)?;
        let inbound_count = lots.len();
        lots.extend(source.fetch_purchase_order_lots(&item_ids, today)?);
        let stock = source.fetch_stock_levels(&item_ids, config.location_id.as_deref())?;

        tracing::debug!(
            "讀取完成：進貨批次 {} 筆，採購批次 {} 筆，庫存 {} 筆",
            inbound_count,
            lots.len() - inbound_count,
            stock.len()
        );

        self.engine.forecast_catalog(catalog, &lots, &stock, today)
    }

    /// 寫回預測結果
    pub fn write_back<K: ForecastSink>(
        &self,
        results: &[ForecastResult],
        sink: &mut K,
    ) -> (usize, Vec<WriteFailure>) {
        let mut written = 0;
        let mut failures = Vec::new();

        for result in results {
            match sink.write_forecast_result(&result.item_id, result) {
                Ok(()) => written += 1,
                Err(err) => {
                    tracing::warn!("物料 {} 寫回失敗: {}", result.item_id, err);
                    let message = match err {
                        ForecastError::Sink { message, .. } => message,
                        other => other.to_string(),
                    };
                    failures.push(WriteFailure {
                        item_id: result.item_id.clone(),
                        message,
                    });
                }
            }
        }

        (written, failures)
    }

    /// 完整執行：讀取、預測、寫回
    pub fn run<E>(
        &self,
        catalog: &[Item],
        erp: &mut E,
        today: NaiveDate,
    ) -> forecast_core::Result<RunReport>
    where
        E: InboundShipmentSource + PurchaseOrderSource + StockSource + ForecastSink,
    {
        let run_id = Uuid::new_v4();
        let start_time = std::time::Instant::now();
        tracing::info!("預測批次 {} 開始，基準日 {}", run_id, today);

        let forecast = self.fetch_and_forecast(catalog, &*erp, today)?;
        let (written_count, write_failures) = self.write_back(&forecast.results, erp);

        tracing::info!(
            "預測批次 {} 完成，寫回 {} 筆，失敗 {} 筆，耗時 {:?}",
            run_id,
            written_count,
            write_failures.len(),
            start_time.elapsed()
        );

        Ok(RunReport {
            run_id,
            today,
            results: forecast.results,
            warnings: forecast.warnings,
            written_count,
            write_failures,
            calculation_time_ms: Some(start_time.elapsed().as_millis()),
        })
    }

    /// 需要查詢的物料：單件本身與套件子件（排序去重）
    fn required_item_ids(catalog: &[Item]) -> Vec<String> {
        let mut ids = BTreeSet::new();
        for item in catalog {
            if item.is_kit() {
                for component in item.components() {
                    ids.insert(component.component_id.clone());
                }
            } else {
                ids.insert(item.item_id.clone());
            }
        }
        ids.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_core::{ForecastConfig, InboundLot, KitComponent, ShipmentStatus, StockLevel};
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// 讀取失敗的來源
    struct BrokenSource;

    impl InboundShipmentSource for BrokenSource {
        fn fetch_inbound_shipment_lots(
            &self,
            _item_ids: &[String],
            _status_filter: &[ShipmentStatus],
            _as_of: NaiveDate,
        ) -> forecast_core::Result<Vec<InboundLot>> {
            Err(ForecastError::Source("連線逾時".to_string()))
        }
    }

    impl PurchaseOrderSource for BrokenSource {
        fn fetch_purchase_order_lots(
            &self,
            _item_ids: &[String],
            _as_of: NaiveDate,
        ) -> forecast_core::Result<Vec<InboundLot>> {
            Ok(Vec::new())
        }
    }

    impl StockSource for BrokenSource {
        fn fetch_stock_levels(
            &self,
            _item_ids: &[String],
            _location_id: Option<&str>,
        ) -> forecast_core::Result<Vec<StockLevel>> {
            Ok(Vec::new())
        }
    }

    fn runner() -> ForecastRunner {
        ForecastRunner::new(ForecastEngine::new(ForecastConfig::default()).unwrap())
    }

    #[test]
    fn test_required_item_ids() {
        let catalog = vec![
            Item::simple_part("B"),
            Item::kit(
                "KIT",
                vec![
                    KitComponent::new("C", Decimal::ONE),
                    KitComponent::new("B", Decimal::ONE),
                ],
            ),
        ];

        assert_eq!(
            ForecastRunner::required_item_ids(&catalog),
            vec!["B".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn test_source_failure_aborts_run() {
        let err = runner()
            .fetch_and_forecast(&[Item::simple_part("A")], &BrokenSource, date(2024, 5, 20))
            .unwrap_err();

        assert!(matches!(err, ForecastError::Source(_)));
    }

    #[test]
    fn test_write_back_collects_failures() {
        struct RecordingSink {
            written: Vec<String>,
        }

        impl ForecastSink for RecordingSink {
            fn write_forecast_result(
                &mut self,
                item_id: &str,
                _result: &ForecastResult,
            ) -> forecast_core::Result<()> {
                if item_id == "BAD" {
                    return Err(ForecastError::Sink {
                        item_id: item_id.to_string(),
                        message: "欄位唯讀".to_string(),
                    });
                }
                self.written.push(item_id.to_string());
                Ok(())
            }
        }

        let results = vec![
            ForecastResult::simple_part("A", None, None),
            ForecastResult::simple_part("BAD", None, None),
            ForecastResult::simple_part("C", None, None),
        ];
        let mut sink = RecordingSink { written: Vec::new() };

        let (written, failures) = runner().write_back(&results, &mut sink);

        assert_eq!(written, 2);
        assert_eq!(sink.written, vec!["A".to_string(), "C".to_string()]);
        assert_eq!(
            failures,
            vec![WriteFailure {
                item_id: "BAD".to_string(),
                message: "欄位唯讀".to_string(),
            }]
        );
    }
}
