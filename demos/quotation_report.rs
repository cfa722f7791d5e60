//! # 公寓報價成本估算範例
//!
//! 這個範例展示完整的估算流程：
//! - 報價：兩房公寓（臥室、客廳、廚房）
//! - 設定：全域生產定額 + 專案自訂工資
//! - 輸出：材料用量、人工、損益、毛利與工期

use chrono::NaiveDate;
use fitout::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("🏠 ===== 公寓報價成本估算範例 =====");
    println!();

    // ========== 1. 建立報價 ==========
    println!("📝 步驟 1: 建立報價項目");
    let project = create_apartment();
    for room in &project.rooms {
        println!("   ✓ {}: {} 項，{}", room.name, room.items.len(), room.total_price());
    }
    println!("   報價總額: {}", project.total_price());
    println!();

    // ========== 2. 生產定額 ==========
    println!("⚙️  步驟 2: 全域生產定額");
    let global = ProductionSettings::default()
        .with_sheet_price(Decimal::from(880_000))
        .with_waste_factor(Decimal::new(115, 2));
    println!("   ✓ 板材單價 {}，損耗係數 {}", global.sheet_price, global.waste_factor);
    println!();

    // ========== 3. 計算 ==========
    println!("🚀 步驟 3: 執行估算");
    let report = compute_project_report(&project, &global);
    let breakdown = &report.breakdown;
    println!();

    // ========== 4. 材料 ==========
    println!("🪵 步驟 4: 材料用量");
    for (material, stat) in &breakdown.industrial_materials {
        println!(
            "   {}: 面積 {} m2，{} 張（訂購 {} 張），{}",
            material,
            stat.total_area.round_dp(2),
            stat.sheets.round_dp(2),
            stat.sheets_to_order(),
            stat.estimated_cost.round_dp(0)
        );
    }
    for (material, stat) in &breakdown.natural_materials {
        println!(
            "   {}: 面積 {} m2，{} m3，{}",
            material,
            stat.total_area.round_dp(2),
            stat.volume_m3.round_dp(3),
            stat.estimated_cost.round_dp(0)
        );
    }
    for line in &breakdown.accessories {
        println!("   配件 {} × {}: {}", line.name, line.quantity, line.estimated_cost);
    }
    println!(
        "   封邊 {} m，塗裝 {} m2",
        breakdown.costs.edge_meters, breakdown.costs.painted_area
    );
    println!();

    // ========== 5. 損益 ==========
    println!("📊 步驟 5: 損益");
    println!("----------------------------------------");
    let pnl = &breakdown.profit_and_loss;
    println!("材料成本:   {}", breakdown.costs.material_total().round_dp(0));
    println!(
        "人工:       {} 工日，{}",
        breakdown.labor.total_man_days.round_dp(1),
        breakdown.labor.labor_cost.round_dp(0)
    );
    println!("廠務費:     {}", breakdown.labor.overhead_cost.round_dp(0));
    println!("專案費用:   {}", pnl.project_overhead);
    println!("總成本:     {}", pnl.total_cost.round_dp(0));
    println!("營收:       {}", pnl.total_revenue);
    println!("淨利:       {}", pnl.net_profit.round_dp(0));
    println!("利潤率:     {}%", pnl.profit_margin.round_dp(2));
    println!();

    if !breakdown.warnings.is_empty() {
        println!("⚠️  估算訊息:");
        for warning in &breakdown.warnings {
            println!("  - [{:?}] {}: {}", warning.severity, warning.subject, warning.message);
        }
        println!();
    }

    // ========== 6. 毛利 ==========
    println!("💰 步驟 6: 毛利檢視（健康值 {}%）", HEALTHY_MARGIN_PERCENT);
    for room in &report.margin.rooms {
        println!("   {}: {}%", room.room_name, room.margin_percent.round_dp(1));
    }
    for item in report.margin.thin_margin_items() {
        println!("   ⚠ {} 毛利偏低: {}%", item.name, item.margin_percent.round_dp(1));
    }
    println!();

    // ========== 7. 工期 ==========
    println!("📅 步驟 7: 施工工期");
    let calendar = WorkCalendar::new("WORKSHOP".to_string())
        .with_holidays(vec![NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()]);
    let start = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
    let schedule = ScheduleEstimator::new()
        .with_calendar(calendar)
        .estimate_project(&project, start)?;
    println!(
        "   總工期 {} 天：{} 至 {}",
        schedule.total_days, schedule.start_date, schedule.end_date
    );
    for stage in &schedule.stages {
        println!(
            "   - {} ({} 天): {} → {}",
            stage.name, stage.duration_days, stage.start_date, stage.end_date
        );
    }
    println!();

    println!("📄 JSON 輸出:");
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!();

    println!("✅ 估算完成！");

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

/// 兩房公寓報價
fn create_apartment() -> Project {
    let bedroom = Room::new("Phòng ngủ master".to_string(), RoomType::MasterBedroom)
        .with_items(vec![
            item("Tủ áo cánh lùa", "m2", "MDF An Cường", 8, 2_600_000),
            item("Giường ngủ", "cái", "MDF An Cường", 1, 5_500_000),
            item("Tab đầu giường", "cái", "MDF An Cường", 2, 1_200_000),
            item("Bản lề giảm chấn", "cái", "Inox 304", 16, 45_000),
        ]);

    let living = Room::new("Phòng khách".to_string(), RoomType::LivingRoom).with_items(vec![
        item("Kệ tivi", "md", "Gỗ óc chó", 3, 4_500_000),
        item("Vách ốp trang trí", "m2", "Gỗ Sồi", 6, 2_200_000),
        item("Sofa da (Văng)", "cái", "Da công nghiệp", 1, 9_500_000)
            .with_source(ItemSource::Outsourced)
            .with_cost_price(Decimal::from(7_000_000)),
    ]);

    let kitchen = Room::new("Bếp".to_string(), RoomType::Kitchen).with_items(vec![
        item("Tủ bếp dưới", "md", "MDF chống ẩm", 4, 3_200_000),
        item("Tủ bếp trên", "md", "MDF chống ẩm", 4, 2_800_000),
        item("Đá bàn bếp", "md", "Đá nhân tạo", 4, 1_600_000)
            .with_source(ItemSource::Outsourced),
        item("Tay nắm âm", "bộ", "Nhôm", 12, 85_000),
    ]);

    Project::new("Căn hộ Vinhomes".to_string())
        .with_room(bedroom)
        .with_room(living)
        .with_room(kitchen)
        .with_financials(ProjectFinancials {
            transport_cost: Decimal::from(1_500_000),
            design_fee: Decimal::from(5_000_000),
            commission: Decimal::from(2_000_000),
            ..Default::default()
        })
        .with_production_settings(PartialProductionSettings {
            worker_daily_wage: Some(Decimal::from(800_000)),
            ..Default::default()
        })
}
