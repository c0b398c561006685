//! 套件可用量與收貨預測

use chrono::NaiveDate;
use forecast_core::item::validate_components;
use forecast_core::{
    ForecastConfig, ForecastError, ForecastResult, InboundLot, KitComponent, Result,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::aggregation::{floor_ratio, validate_lots_for, ComponentSupply};
use crate::lead_time::LeadTimeCalculator;

/// 單一子件的可用量明細
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentAvailability {
    pub component_id: String,
    /// 每套用量
    pub required_qty_per_kit: Decimal,
    /// 可用庫存（查無庫存記錄為 0）
    pub quantity_available: Decimal,
    /// 現有庫存可組套數
    pub possible_kits: Decimal,
    /// 進貨彙總
    pub supply: ComponentSupply,
    /// 進貨可再組套數
    pub incoming_kits: Decimal,
}

impl ComponentAvailability {
    /// 庫存不足一套
    pub fn is_short(&self) -> bool {
        self.quantity_available < self.required_qty_per_kit
    }
}

/// 套件分析結果
#[derive(Debug, Clone)]
pub struct KitAnalysis {
    pub result: ForecastResult,
    /// 子件明細（依套件子件順序）
    pub components: Vec<ComponentAvailability>,
}

impl KitAnalysis {
    /// 缺料且沒有任何進貨批次的子件
    pub fn shortfalls_without_supply(&self) -> Vec<&ComponentAvailability> {
        self.components
            .iter()
            .filter(|c| c.is_short() && c.supply.earliest_expected_date().is_none())
            .collect()
    }
}

/// 套件預測器
pub struct KitForecaster;

impl KitForecaster {
    /// 計算套件預測結果
    pub fn forecast(
        kit_id: &str,
        components: &[KitComponent],
        stock: &HashMap<String, Decimal>,
        lots_by_component: &HashMap<String, Vec<InboundLot>>,
        today: NaiveDate,
        config: &ForecastConfig,
    ) -> Result<ForecastResult> {
        Ok(Self::analyze(kit_id, components, stock, lots_by_component, today, config)?.result)
    }

    /// 計算套件預測結果並保留子件明細
    ///
    /// 依序執行：可組套數 → 是否全部有料 → 日期與數量。
    pub fn analyze(
        kit_id: &str,
        components: &[KitComponent],
        stock: &HashMap<String, Decimal>,
        lots_by_component: &HashMap<String, Vec<InboundLot>>,
        today: NaiveDate,
        config: &ForecastConfig,
    ) -> Result<KitAnalysis> {
        validate_components(kit_id, components)?;

        // Step 1: 可組套數
        let availability = Self::component_availability(components, stock, lots_by_component)?;
        let available_kits = availability
            .iter()
            .map(|c| c.possible_kits)
            .min()
            .unwrap_or(Decimal::ZERO);

        // Step 2: 每個子件至少足夠一套
        let all_in_stock = !availability.is_empty() && availability.iter().all(|c| !c.is_short());

        // Step 3: 日期與數量
        let result = if all_in_stock {
            let receipt_date = LeadTimeCalculator::next_business_day(today, config)?;
            let incoming_kits = availability
                .iter()
                .map(|c| c.incoming_kits)
                .min()
                .unwrap_or(Decimal::ZERO);

            tracing::debug!(
                "套件 {} 全部有料：可組 {} 套，進貨可再組 {} 套",
                kit_id,
                available_kits,
                incoming_kits
            );

            ForecastResult::kit(
                kit_id,
                Some(receipt_date),
                Some(incoming_kits),
                to_kit_count(kit_id, available_kits)?,
                true,
            )
        } else if availability.is_empty() {
            tracing::debug!("套件 {} 沒有子件", kit_id);
            ForecastResult::kit(kit_id, None, None, 0, false)
        } else {
            let latest_shortfall_date = availability
                .iter()
                .filter(|c| c.is_short())
                .filter_map(|c| c.supply.earliest_expected_date())
                .max();

            let receipt_date = latest_shortfall_date
                .map(|date| config.calendar.roll_forward(date))
                .transpose()?;

            tracing::debug!(
                "套件 {} 缺料，預計補齊日 {:?}",
                kit_id,
                receipt_date
            );

            ForecastResult::kit(
                kit_id,
                receipt_date,
                Some(config.incomplete_kit_receipt_qty),
                0,
                false,
            )
        };

        Ok(KitAnalysis {
            result,
            components: availability,
        })
    }

    fn component_availability(
        components: &[KitComponent],
        stock: &HashMap<String, Decimal>,
        lots_by_component: &HashMap<String, Vec<InboundLot>>,
    ) -> Result<Vec<ComponentAvailability>> {
        components
            .iter()
            .map(|component| {
                let id = component.component_id.as_str();
                let required = component.required_qty_per_kit;
                let quantity_available = stock.get(id).copied().unwrap_or(Decimal::ZERO);

                let lots = lots_by_component
                    .get(id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                validate_lots_for(id, lots)?;
                let supply = ComponentSupply::from_lots(lots)?;

                Ok(ComponentAvailability {
                    component_id: id.to_string(),
                    required_qty_per_kit: required,
                    quantity_available,
                    possible_kits: floor_ratio(quantity_available, required)?,
                    incoming_kits: floor_ratio(supply.total_incoming()?, required)?,
                    supply,
                })
            })
            .collect()
    }
}

/// 可組套數轉為整數，超出 u64 範圍時回傳驗證錯誤
fn to_kit_count(kit_id: &str, kits: Decimal) -> Result<u64> {
    if kits <= Decimal::ZERO {
        return Ok(0);
    }
    kits.to_u64().ok_or_else(|| {
        ForecastError::validation(format!("套件 {} 可組套數超出範圍: {}", kit_id, kits))
    })
}
