//! 交期計算

use chrono::NaiveDate;
use forecast_core::{ForecastConfig, LotSource, Result};

/// 交期計算器
pub struct LeadTimeCalculator;

impl LeadTimeCalculator {
    /// 計算預計收貨日期
    ///
    /// 批次日期加上來源對應的提前期；早於今天時以今天計，再順延週末。
    pub fn calculate_receipt_date(
        lot_date: NaiveDate,
        source: LotSource,
        today: NaiveDate,
        config: &ForecastConfig,
    ) -> Result<NaiveDate> {
        let shifted = config
            .calendar
            .add_days(lot_date, config.lead_time_for(source))?;
        config.calendar.roll_forward(shifted.max(today))
    }

    /// 無任何批次時的預設日期（今天 + 預設時界，不順延）
    pub fn fallback_date(today: NaiveDate, config: &ForecastConfig) -> Result<NaiveDate> {
        config.calendar.add_days(today, config.fallback_horizon_days)
    }

    /// 今天起最近的收貨日
    pub fn next_business_day(today: NaiveDate, config: &ForecastConfig) -> Result<NaiveDate> {
        config.calendar.roll_forward(today)
    }
}
