//! # Receipt Forecast Engine
//!
//! 收貨日期與套件可用量預測引擎

pub mod aggregation;
pub mod engine;
pub mod kit;
pub mod lead_time;
pub mod runner;
pub mod simple_part;

// Re-export 主要類型
pub use aggregation::ComponentSupply;
pub use engine::ForecastEngine;
pub use kit::{ComponentAvailability, KitAnalysis, KitForecaster};
pub use lead_time::LeadTimeCalculator;
pub use runner::{ForecastRunner, RunReport, WriteFailure};
pub use simple_part::SimplePartForecaster;

/// 整批物料的預測結果
#[derive(Debug, Clone)]
pub struct CatalogForecast {
    /// 預測結果（依目錄順序）
    pub results: Vec<forecast_core::ForecastResult>,

    /// 警告信息
    pub warnings: Vec<ForecastWarning>,
}

impl CatalogForecast {
    /// 創建空的預測結果
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: ForecastWarning) {
        self.warnings.push(warning);
    }

    /// 依物料ID查找結果
    pub fn result_for(&self, item_id: &str) -> Option<&forecast_core::ForecastResult> {
        self.results.iter().find(|r| r.item_id == item_id)
    }
}

/// 預測警告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastWarning {
    pub item_id: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl ForecastWarning {
    pub fn new(item_id: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            item_id,
            message,
            severity,
        }
    }

    pub fn info(item_id: String, message: String) -> Self {
        Self::new(item_id, message, WarningSeverity::Info)
    }

    pub fn warning(item_id: String, message: String) -> Self {
        Self::new(item_id, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Info,
    Warning,
}
