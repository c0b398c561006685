//! 單件收貨預測

use chrono::NaiveDate;
use forecast_core::{ForecastConfig, ForecastResult, InboundLot, Result};
use rust_decimal::Decimal;

use crate::aggregation::validate_lots_for;
use crate::lead_time::LeadTimeCalculator;

/// 單件預測器
pub struct SimplePartForecaster;

impl SimplePartForecaster {
    /// 計算單件的下次收貨日期與數量
    ///
    /// 批次選擇順序：
    /// 1. 有在途進貨單時取日期最晚的一筆（同日取最後提供的），加進貨提前期
    /// 2. 否則取日期最早的採購訂單（同日取最先提供的），加採購提前期
    /// 3. 都沒有時為今天 + 預設時界，數量用 `default_qty`
    pub fn forecast(
        item_id: &str,
        lots: &[InboundLot],
        today: NaiveDate,
        default_qty: Option<Decimal>,
        config: &ForecastConfig,
    ) -> Result<ForecastResult> {
        validate_lots_for(item_id, lots)?;

        let Some(selected) = Self::select_lot(lots) else {
            tracing::debug!("物料 {} 無任何進貨批次，使用預設時界", item_id);
            let fallback = LeadTimeCalculator::fallback_date(today, config)?;
            return Ok(ForecastResult::simple_part(item_id, Some(fallback), default_qty));
        };

        let receipt_date = LeadTimeCalculator::calculate_receipt_date(
            selected.expected_date,
            selected.source,
            today,
            config,
        )?;

        tracing::debug!(
            "物料 {} 選用 {:?} 批次 {} → 收貨日 {}",
            item_id,
            selected.source,
            selected.expected_date,
            receipt_date
        );

        Ok(ForecastResult::simple_part(
            item_id,
            Some(receipt_date),
            selected.expected_quantity.or(default_qty),
        ))
    }

    /// 選出代表批次
    pub fn select_lot(lots: &[InboundLot]) -> Option<&InboundLot> {
        lots.iter()
            .filter(|lot| lot.is_inbound_shipment())
            .max_by_key(|lot| lot.expected_date)
            .or_else(|| {
                lots.iter()
                    .filter(|lot| lot.is_purchase_order())
                    .min_by_key(|lot| lot.expected_date)
            })
    }
}
