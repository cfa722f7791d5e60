//! 人工與廠務費估算

use fitout_core::{EstimationConstants, Overflow, ProductionSettings};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::MaterialLedger;

/// 人工估算結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborEstimate {
    pub industrial_production_days: Decimal,
    pub industrial_installation_days: Decimal,
    /// 天然木料換算的等效板材張數
    pub natural_equivalent_sheets: Decimal,
    pub natural_production_days: Decimal,
    pub natural_installation_days: Decimal,
    /// 總工日（向上取整）
    pub total_man_days: Decimal,
    pub labor_cost: Decimal,
    /// 廠務費等效張數（未取整）
    pub overhead_equivalent_sheets: Decimal,
    pub overhead_cost: Decimal,
}

impl LaborEstimate {
    pub fn estimate(
        ledger: &MaterialLedger,
        settings: &ProductionSettings,
        constants: &EstimationConstants,
        overflow: &mut Overflow,
    ) -> Self {
        let industrial_sheets = ledger.total_industrial_sheets;
        let industrial_production_days =
            overflow.mul(industrial_sheets, settings.production_days_per_sheet);
        let industrial_installation_days =
            overflow.mul(industrial_sheets, settings.installation_days_per_sheet);

        let natural_area = overflow.mul(ledger.total_natural_area(), settings.material_coefficient);
        let natural_equivalent_sheets = overflow.div(natural_area, settings.sheet_area());
        let natural_production_days = [
            settings.production_days_per_sheet,
            constants.natural_production_complexity,
        ]
        .into_iter()
        .fold(natural_equivalent_sheets, |days, factor| overflow.mul(days, factor));
        let natural_installation_days = [
            settings.installation_days_per_sheet,
            constants.natural_installation_factor,
        ]
        .into_iter()
        .fold(natural_equivalent_sheets, |days, factor| overflow.mul(days, factor));

        let total_man_days = overflow
            .sum([
                industrial_production_days,
                industrial_installation_days,
                natural_production_days,
                natural_installation_days,
            ])
            .ceil();

        let weighted_natural =
            overflow.mul(natural_equivalent_sheets, constants.natural_overhead_weight);
        let overhead_equivalent_sheets = overflow.add(industrial_sheets, weighted_natural);

        Self {
            industrial_production_days,
            industrial_installation_days,
            natural_equivalent_sheets,
            natural_production_days,
            natural_installation_days,
            total_man_days,
            labor_cost: overflow.mul(total_man_days, settings.worker_daily_wage),
            overhead_equivalent_sheets,
            overhead_cost: overflow.mul(
                overhead_equivalent_sheets.ceil(),
                settings.overhead_per_sheet,
            ),
        }
    }

    /// 人工 + 廠務費
    pub fn total_cost(&self) -> Decimal {
        self.labor_cost.saturating_add(self.overhead_cost)
    }
}
