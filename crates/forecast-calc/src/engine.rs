//! 收貨預測主引擎

use chrono::NaiveDate;
use forecast_core::inventory::stock_map;
use forecast_core::{
    ForecastConfig, ForecastError, ForecastResult, InboundLot, Item, ItemKind, KitComponent,
    StockLevel,
};
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

use crate::aggregation::group_lots_by_item;
use crate::kit::KitForecaster;
use crate::simple_part::SimplePartForecaster;
use crate::{CatalogForecast, ForecastWarning};

/// 收貨預測引擎
///
/// 不持有任何可變狀態，同樣的輸入與 `today` 必定得到相同結果。
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

impl ForecastEngine {
    /// 創建新的預測引擎
    pub fn new(config: ForecastConfig) -> forecast_core::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 單件預測
    pub fn forecast_simple_part(
        &self,
        item_id: &str,
        lots: &[InboundLot],
        today: NaiveDate,
        default_qty: Option<Decimal>,
    ) -> forecast_core::Result<ForecastResult> {
        SimplePartForecaster::forecast(item_id, lots, today, default_qty, &self.config)
    }

    /// 套件預測
    pub fn forecast_kit(
        &self,
        kit_id: &str,
        components: &[KitComponent],
        stock_levels: &[StockLevel],
        lots_by_component: &HashMap<String, Vec<InboundLot>>,
        today: NaiveDate,
    ) -> forecast_core::Result<ForecastResult> {
        for level in stock_levels {
            level.validate()?;
        }
        let stock = stock_map(stock_levels)?;
        KitForecaster::forecast(
            kit_id,
            components,
            &stock,
            lots_by_component,
            today,
            &self.config,
        )
    }

    /// 整批物料預測
    ///
    /// 先驗證整份目錄與資料列，再平行計算每個物料；結果依目錄順序回傳。
    pub fn forecast_catalog(
        &self,
        catalog: &[Item],
        lots: &[InboundLot],
        stock_levels: &[StockLevel],
        today: NaiveDate,
    ) -> forecast_core::Result<CatalogForecast> {
        tracing::info!(
            "開始收貨預測：物料 {} 筆，批次 {} 筆，庫存 {} 筆",
            catalog.len(),
            lots.len(),
            stock_levels.len()
        );

        // Step 1: 驗證輸入
        tracing::debug!("Step 1: 驗證輸入");
        Self::validate_catalog(catalog)?;
        for lot in lots {
            lot.validate()?;
        }
        for level in stock_levels {
            level.validate()?;
        }

        // Step 2: 按物料分組
        tracing::debug!("Step 2: 物料分組");
        let grouped_lots = group_lots_by_item(lots);
        let stock = stock_map(stock_levels)?;

        // Step 3: 逐物料預測（平行）
        tracing::debug!("Step 3: 逐物料預測");
        let per_item = catalog
            .par_iter()
            .map(|item| self.forecast_item(item, &grouped_lots, &stock, today))
            .collect::<forecast_core::Result<Vec<_>>>()?;

        let mut forecast = CatalogForecast::empty();
        for (result, warnings) in per_item {
            forecast.results.push(result);
            for warning in warnings {
                forecast.add_warning(warning);
            }
        }

        tracing::info!(
            "收貨預測完成：結果 {} 筆，警告 {} 筆",
            forecast.results.len(),
            forecast.warnings.len()
        );

        Ok(forecast)
    }

    fn forecast_item(
        &self,
        item: &Item,
        grouped_lots: &HashMap<String, Vec<InboundLot>>,
        stock: &HashMap<String, Decimal>,
        today: NaiveDate,
    ) -> forecast_core::Result<(ForecastResult, Vec<ForecastWarning>)> {
        let mut warnings = Vec::new();

        let result = match &item.kind {
            ItemKind::SimplePart => {
                let lots = grouped_lots
                    .get(&item.item_id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);

                if lots.is_empty() {
                    warnings.push(ForecastWarning::info(
                        item.item_id.clone(),
                        "無進貨或採購批次，使用預設時界".to_string(),
                    ));
                }

                SimplePartForecaster::forecast(
                    &item.item_id,
                    lots,
                    today,
                    item.default_receipt_qty,
                    &self.config,
                )?
            }
            ItemKind::Kit { components } => {
                let analysis = KitForecaster::analyze(
                    &item.item_id,
                    components,
                    stock,
                    grouped_lots,
                    today,
                    &self.config,
                )?;

                if components.is_empty() {
                    warnings.push(ForecastWarning::warning(
                        item.item_id.clone(),
                        "套件沒有任何子件".to_string(),
                    ));
                }

                for component in analysis.shortfalls_without_supply() {
                    warnings.push(ForecastWarning::warning(
                        item.item_id.clone(),
                        format!("子件 {} 缺料且無任何進貨批次", component.component_id),
                    ));
                }

                analysis.result
            }
        };

        Ok((result, warnings))
    }

    /// 驗證目錄：物料結構合法且ID不重複
    fn validate_catalog(catalog: &[Item]) -> forecast_core::Result<()> {
        let mut seen = HashSet::new();
        for item in catalog {
            item.validate()?;
            if !seen.insert(item.item_id.as_str()) {
                return Err(ForecastError::validation(format!(
                    "物料 {} 在目錄中重複",
                    item.item_id
                )));
            }
        }
        Ok(())
    }

    /// 獲取配置引用
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WarningSeverity;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn engine() -> ForecastEngine {
        ForecastEngine::new(ForecastConfig::default()).unwrap()
    }

    #[test]
    fn test_catalog_preserves_order_and_kinds() {
        let catalog = vec![
            Item::simple_part("SKU-100"),
            Item::kit(
                "KIT-1",
                vec![
                    KitComponent::new("A", Decimal::from(2)),
                    KitComponent::new("B", Decimal::from(3)),
                ],
            ),
            Item::simple_part("SKU-200").with_default_receipt_qty(Decimal::from(24)),
        ];
        let lots = vec![InboundLot::inbound_shipment(
            "SKU-100",
            date(2024, 6, 7),
            Decimal::from(50),
        )];
        let stock = vec![
            StockLevel::new("A", Decimal::from(10)),
            StockLevel::new("B", Decimal::from(6)),
        ];

        let forecast = engine()
            .forecast_catalog(&catalog, &lots, &stock, date(2024, 5, 20))
            .unwrap();

        let ids: Vec<_> = forecast.results.iter().map(|r| r.item_id.as_str()).collect();
        assert_eq!(ids, vec!["SKU-100", "KIT-1", "SKU-200"]);

        let sku = forecast.result_for("SKU-100").unwrap();
        assert_eq!(sku.next_receipt_date, Some(date(2024, 6, 17)));

        let kit = forecast.result_for("KIT-1").unwrap();
        assert_eq!(kit.available_kit_quantity, Some(2));

        let fallback = forecast.result_for("SKU-200").unwrap();
        assert_eq!(fallback.next_receipt_date, Some(date(2024, 8, 18)));
        assert_eq!(fallback.next_receipt_quantity, Some(Decimal::from(24)));

        assert_eq!(forecast.warnings.len(), 1);
        assert_eq!(forecast.warnings[0].item_id, "SKU-200");
        assert_eq!(forecast.warnings[0].severity, WarningSeverity::Info);
    }

    #[test]
    fn test_duplicate_catalog_item_rejected() {
        let catalog = vec![Item::simple_part("SKU-1"), Item::simple_part("SKU-1")];
        let err = engine()
            .forecast_catalog(&catalog, &[], &[], date(2024, 5, 20))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_negative_stock_rejected() {
        let catalog = vec![Item::kit("KIT-1", vec![KitComponent::new("A", Decimal::ONE)])];
        let stock = vec![StockLevel::new("A", Decimal::from(-3))];

        assert!(engine()
            .forecast_catalog(&catalog, &[], &stock, date(2024, 5, 20))
            .is_err());
    }

    #[test]
    fn test_quantity_overflow_is_validation_error() {
        let catalog = vec![Item::kit("KIT-1", vec![KitComponent::new("A", Decimal::ONE)])];
        let lots = vec![
            InboundLot::inbound_shipment("A", date(2024, 6, 3), Decimal::MAX),
            InboundLot::purchase_order("A", date(2024, 7, 1), Decimal::MAX),
        ];
        let stock = vec![StockLevel::new("A", Decimal::from(5))];

        let err = engine()
            .forecast_catalog(&catalog, &lots, &stock, date(2024, 5, 20))
            .unwrap_err();
        assert!(err.is_validation());

        // 重複庫存列相加溢出
        let stock = vec![
            StockLevel::new("A", Decimal::MAX),
            StockLevel::new("A", Decimal::MAX),
        ];
        let err = engine()
            .forecast_catalog(&catalog, &[], &stock, date(2024, 5, 20))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_kit_warnings() {
        let catalog = vec![
            Item::kit("EMPTY", vec![]),
            Item::kit("SHORT", vec![KitComponent::new("Z", Decimal::ONE)]),
        ];

        let forecast = engine()
            .forecast_catalog(&catalog, &[], &[], date(2024, 5, 20))
            .unwrap();

        assert_eq!(forecast.warnings.len(), 2);
        assert!(forecast
            .warnings
            .iter()
            .all(|w| w.severity == WarningSeverity::Warning));
    }

    #[test]
    fn test_forecast_kit_with_stock_levels() {
        let components = vec![
            KitComponent::new("X", Decimal::ONE),
            KitComponent::new("Y", Decimal::ONE),
        ];
        let stock = vec![
            StockLevel::new("X", Decimal::ZERO),
            StockLevel::new("Y", Decimal::from(5)),
        ];
        let lots = group_lots_by_item(&[InboundLot::inbound_shipment(
            "X",
            date(2024, 7, 1),
            Decimal::from(3),
        )]);

        let result = engine()
            .forecast_kit("KIT-9", &components, &stock, &lots, date(2024, 5, 20))
            .unwrap();

        assert_eq!(result.next_receipt_date, Some(date(2024, 7, 1)));
        assert_eq!(result.available_kit_quantity, Some(0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ForecastConfig::default().with_calendar(
            forecast_core::WorkCalendar::new().with_working_days([false; 7]),
        );
        assert!(ForecastEngine::new(config).is_err());
    }
}
