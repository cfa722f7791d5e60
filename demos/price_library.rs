//! 單價資料庫範例：補單價、學習新條目、比較毛利

use fitout::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== 單價資料庫範例 ===\n");

    let mut library = PriceLibrary::system_default();
    println!("系統預設資料庫: {} 筆", library.len());

    // 只填了名稱與數量的草稿報價
    let draft = vec![
        item("Tủ bếp dưới", "", "MDF An Cường", 4, 0),
        item("Tủ áo", "m2", "MDF An Cường", 9, 2_900_000),
        item("Bản lề", "cái", "", 24, 0),
        item("Rèm vải", "m2", "", 12, 0),
    ];

    let outcome =
        library.apply_prices(&draft, PricingMode::FillMissingOnly, DEFAULT_COST_FALLBACK_RATIO)?;
    println!("\n補單價: {} / {} 筆", outcome.matched, draft.len());
    for item in &outcome.items {
        println!(
            "  - {} ({}): {} × {} = {}",
            item.name, item.unit, item.quantity, item.unit_price, item.total_price
        );
    }

    // 手動報價的項目存回資料庫
    let custom = vec![item("Rèm vải", "m2", "Vải bố", 12, 450_000)];
    let added = library.learn_from(&custom);
    println!("\n新增 {} 筆條目，資料庫現有 {} 筆", added, library.len());

    let repriced = library.apply_prices(
        &outcome.items,
        PricingMode::FillMissingOnly,
        DEFAULT_COST_FALLBACK_RATIO,
    )?;
    let (margins, total) = QuotationMargin::for_items(&repriced.items, DEFAULT_COST_FALLBACK_RATIO);

    println!("\n毛利:");
    for margin in &margins {
        let flag = if margin.is_healthy() { "✓" } else { "⚠" };
        println!("  {} {}: {}%", flag, margin.name, margin.margin_percent.round_dp(1));
    }
    println!("整體: 營收 {}，毛利 {}%", total.revenue, total.margin_percent.round_dp(1));

    println!("\n資料庫 JSON（前 2 筆）:");
    println!("{}", serde_json::to_string_pretty(&library.entries()[..2])?);

    Ok(())
}

fn item(name: &str, unit: &str, material: &str, quantity: i64, unit_price: i64) -> LineItem {
    LineItem::new(
        name.to_string(),
        unit.to_string(),
        Decimal::from(quantity),
        Decimal::from(unit_price),
    )
    .with_material(material.to_string())
}
