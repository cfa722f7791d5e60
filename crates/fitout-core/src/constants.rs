//! 估算常數
//!
//! 面積換算、結構係數、工時難度係數等經驗值，依在地市場調校。
//! 配件單價上限屬於分類規則，見 `rules`。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 成本估算比例預設值（未知成本 = 銷售單價 × 0.7）
pub const DEFAULT_COST_FALLBACK_RATIO: Decimal = Decimal::from_parts(7, 0, 0, false, 1);

/// 估算常數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EstimationConstants {
    /// 未知成本時的估算比例
    pub cost_fallback_ratio: Decimal,

    /// 延米換算面積（家具平均深度，m）
    pub linear_to_area: Decimal,

    /// 計件項目每件預設面積（m2）
    pub generic_area_per_unit: Decimal,

    /// 天然木料板厚（m）
    pub natural_wood_thickness: Decimal,

    /// 天然木料結構係數（框架等非可見面）
    pub natural_wood_structure_factor: Decimal,

    /// 塗裝面積係數（邊、背面）
    pub painted_surface_factor: Decimal,

    /// 天然木料生產工時難度係數
    pub natural_production_complexity: Decimal,

    /// 天然木料安裝工時係數
    pub natural_installation_factor: Decimal,

    /// 天然木料廠務費權重
    pub natural_overhead_weight: Decimal,
}

impl Default for EstimationConstants {
    fn default() -> Self {
        Self {
            cost_fallback_ratio: DEFAULT_COST_FALLBACK_RATIO,
            linear_to_area: Decimal::new(6, 1),
            generic_area_per_unit: Decimal::new(15, 1),
            natural_wood_thickness: Decimal::new(2, 2),
            natural_wood_structure_factor: Decimal::new(25, 1),
            painted_surface_factor: Decimal::new(15, 1),
            natural_production_complexity: Decimal::new(35, 1),
            natural_installation_factor: Decimal::new(15, 1),
            natural_overhead_weight: Decimal::from(2),
        }
    }
}

impl EstimationConstants {
    /// 建構器模式：設置成本估算比例
    pub fn with_cost_fallback_ratio(mut self, ratio: Decimal) -> Self {
        self.cost_fallback_ratio = ratio;
        self
    }
}
