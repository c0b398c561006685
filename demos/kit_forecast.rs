//! 套件與單件收貨預測示例
//!
//! 執行：`RUST_LOG=debug cargo run --example kit_forecast`

use chrono::NaiveDate;
use receipt_forecast::{
    ForecastConfig, ForecastEngine, ForecastRunner, Item, KitComponent, MemoryErpStore,
    PurchaseOrderLine, ShipmentLine, ShipmentStatus, StockLevel,
};
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();

    println!("=== 收貨預測示例 ===\n");

    let today = NaiveDate::from_ymd_opt(2024, 5, 20).ok_or_else(|| anyhow::anyhow!("無效日期"))?;
    let config = ForecastConfig::from_json_str(r#"{ "location_id": "WH-MAIN" }"#)?;

    // 建立 ERP 資料
    let mut erp = MemoryErpStore::new(&config);
    erp.add_stock_level(StockLevel::new("FRAME", Decimal::from(12)).with_location_id("WH-MAIN"));
    erp.add_stock_level(StockLevel::new("WHEEL", Decimal::from(1)).with_location_id("WH-MAIN"));
    erp.add_shipment_line(ShipmentLine {
        shipment_ref: "IS-1001".to_string(),
        item_id: "WHEEL".to_string(),
        status: ShipmentStatus::InTransit,
        expected_date: NaiveDate::from_ymd_opt(2024, 6, 7).ok_or_else(|| anyhow::anyhow!("無效日期"))?,
        expected_quantity: Some(Decimal::from(40)),
    });
    erp.add_purchase_order_line(PurchaseOrderLine {
        po_ref: "PO-2001".to_string(),
        item_id: "SADDLE".to_string(),
        expected_date: NaiveDate::from_ymd_opt(2024, 6, 24).ok_or_else(|| anyhow::anyhow!("無效日期"))?,
        ordered_qty: Decimal::from(100),
        received_qty: Decimal::from(30),
    });

    let catalog = vec![
        Item::kit(
            "BIKE-KIT",
            vec![
                KitComponent::new("FRAME", Decimal::ONE),
                KitComponent::new("WHEEL", Decimal::from(2)),
            ],
        ),
        Item::simple_part("WHEEL"),
        Item::simple_part("SADDLE"),
        Item::simple_part("BELL").with_default_receipt_qty(Decimal::from(10)),
    ];

    let runner = ForecastRunner::new(ForecastEngine::new(config)?);
    let report = runner.run(&catalog, &mut erp, today)?;

    println!("批次 {}（基準日 {}）", report.run_id, report.today);
    for result in &report.results {
        println!(
            "  - 物料: {}, 收貨日: {:?}, 數量: {:?}, 可組套數: {:?}, 全部有料: {:?}",
            result.item_id,
            result.next_receipt_date,
            result.next_receipt_quantity,
            result.available_kit_quantity,
            result.all_components_in_stock
        );
    }

    for warning in &report.warnings {
        println!("  [{:?}] {}: {}", warning.severity, warning.item_id, warning.message);
    }

    println!(
        "\n寫回 {} 筆，失敗 {} 筆",
        report.written_count,
        report.write_failures.len()
    );

    Ok(())
}
