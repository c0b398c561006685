//! # Receipt Forecast
//!
//! 收貨日期與套件可用量預測
//!
//! ```
//! use chrono::NaiveDate;
//! use receipt_forecast::{ForecastConfig, ForecastEngine, InboundLot};
//! use rust_decimal::Decimal;
//!
//! let engine = ForecastEngine::new(ForecastConfig::default()).unwrap();
//! let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
//! let lots = vec![InboundLot::inbound_shipment(
//!     "SKU-100",
//!     NaiveDate::from_ymd_opt(2024, 6, 7).unwrap(),
//!     Decimal::from(50),
//! )];
//!
//! let result = engine.forecast_simple_part("SKU-100", &lots, today, None).unwrap();
//! assert_eq!(result.next_receipt_date, NaiveDate::from_ymd_opt(2024, 6, 17));
//! ```

pub use forecast_calc::{
    CatalogForecast, ComponentAvailability, ForecastEngine, ForecastRunner, ForecastWarning,
    KitAnalysis, RunReport, WarningSeverity, WriteFailure,
};
pub use forecast_core::{
    roll_forward_weekend, ForecastConfig, ForecastError, ForecastResult, ForecastSink,
    InboundLot, InboundShipmentSource, Item, ItemKind, KitComponent, LotSource, MemoryErpStore,
    PurchaseOrderLine, PurchaseOrderSource, Result, ShipmentLine, ShipmentStatus, StockLevel,
    StockSource, WorkCalendar,
};
