//! 成本彙總

use fitout_core::{saturating_sum, Overflow, ProductionSettings};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::MaterialLedger;

/// 各項成本
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBuckets {
    /// 工業板材成本
    pub industrial: Decimal,
    /// 天然木料成本
    pub natural_wood: Decimal,
    /// 封邊總長（延米，已向上取整）
    pub edge_meters: Decimal,
    pub edge_banding: Decimal,
    /// 需塗裝面積
    pub painted_area: Decimal,
    pub finishing: Decimal,
    /// 耗材（膠、釘、螺絲）
    pub consumables: Decimal,
    pub accessories: Decimal,
    pub outsourced: Decimal,
}

impl CostBuckets {
    /// 從材料帳計算各項成本；超出範圍的值取極值並記入 `overflow`
    pub fn aggregate(
        ledger: &MaterialLedger,
        settings: &ProductionSettings,
        overflow: &mut Overflow,
    ) -> Self {
        let industrial = overflow.sum(ledger.industrial.values().map(|m| m.estimated_cost));
        let natural_wood = overflow.sum(ledger.natural.values().map(|m| m.estimated_cost));
        let accessories = overflow.sum(ledger.accessories.iter().map(|a| a.estimated_cost));

        let edge_meters = overflow
            .mul(ledger.total_industrial_sheets, settings.edge_per_sheet_ratio)
            .ceil();
        let wood = overflow.add(industrial, natural_wood);
        let consumables = overflow.mul(wood, settings.consumable_ratio);
        let consumables = overflow.div(consumables, Decimal::ONE_HUNDRED);

        Self {
            industrial,
            natural_wood,
            edge_meters,
            edge_banding: overflow.mul(edge_meters, settings.edge_banding_price_per_m),
            painted_area: ledger.total_painted_area,
            finishing: overflow.mul(ledger.total_painted_area, settings.paint_cost_per_m2),
            consumables,
            accessories,
            outsourced: ledger.outsourced_cost,
        }
    }

    /// 材料相關成本合計（不含人工與廠務費）
    pub fn material_total(&self) -> Decimal {
        saturating_sum(self.amounts())
    }

    /// 計入材料合計的各項金額
    pub fn amounts(&self) -> [Decimal; 7] {
        [
            self.industrial,
            self.natural_wood,
            self.accessories,
            self.edge_banding,
            self.consumables,
            self.finishing,
            self.outsourced,
        ]
    }
}
