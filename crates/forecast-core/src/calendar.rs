//! 收貨日曆模型

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::{ForecastError, Result};

/// 將週末日期順延到下週一（週六 +2、週日 +1，平日不變）
pub fn roll_forward_weekend(date: NaiveDate) -> Result<NaiveDate> {
    let shift = match date.weekday() {
        Weekday::Sat => 2,
        Weekday::Sun => 1,
        _ => 0,
    };
    date.checked_add_days(Days::new(shift))
        .ok_or_else(|| ForecastError::DateOverflow(format!("{} 順延 {} 天", date, shift)))
}

/// 收貨工作日曆
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCalendar {
    /// 工作日（週一到週日，true表示可收貨）
    /// 索引 0 = 週一, 1 = 週二, ..., 6 = 週日
    pub working_days: [bool; 7],
}

impl WorkCalendar {
    /// 創建新的工作日曆（預設週一到週五為工作日）
    pub fn new() -> Self {
        Self {
            working_days: [true, true, true, true, true, false, false],
        }
    }

    /// 建構器模式：設置工作日
    pub fn with_working_days(mut self, working_days: [bool; 7]) -> Self {
        self.working_days = working_days;
        self
    }

    /// 檢查至少有一個工作日
    pub fn validate(&self) -> Result<()> {
        if self.working_days.iter().any(|&working| working) {
            Ok(())
        } else {
            Err(ForecastError::Config("日曆沒有任何工作日".to_string()))
        }
    }

    /// 檢查是否為工作日
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        let weekday_index = date.weekday().num_days_from_monday() as usize;
        self.working_days[weekday_index]
    }

    /// 順延到最近的工作日（本身是工作日則不變）
    pub fn roll_forward(&self, date: NaiveDate) -> Result<NaiveDate> {
        self.validate()?;

        let mut current = date;
        while !self.is_working_day(current) {
            current = current
                .succ_opt()
                .ok_or_else(|| ForecastError::DateOverflow(current.to_string()))?;
        }
        Ok(current)
    }

    /// 加上日曆天數（非工作日天數）
    pub fn add_days(&self, date: NaiveDate, days: u32) -> Result<NaiveDate> {
        date.checked_add_days(Days::new(u64::from(days)))
            .ok_or_else(|| ForecastError::DateOverflow(format!("{} + {} 天", date, days)))
    }

    /// 加上日曆天數後順延到工作日
    pub fn offset_and_roll(&self, date: NaiveDate, days: u32) -> Result<NaiveDate> {
        let shifted = self.add_days(date, days)?;
        self.roll_forward(shifted)
    }
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::new()
    }
}
