//! 材料用量估算
//!
//! 把已分類項目的申報數量換算成實際材料：工業板材張數、天然木料體積、
//! 塗裝面積。張數一律保留小數累加，只在顯示或計價時才向上取整。

use std::collections::BTreeMap;

use fitout_core::{
    saturating_sum, EstimationConstants, ItemCategory, ItemText, KeywordValue, Overflow,
    ProductionSettings, RuleSet,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ClassifiedItem;

/// 面積的推算依據
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaBasis {
    /// 單位即面積（m2）
    Area,
    /// 延米 × 平均深度
    Linear,
    /// 依名稱的固定面積（床、床頭櫃、桌）
    NamedCount,
    /// 計件 × 每件預設面積
    GenericCount,
}

/// 面積估算結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaEstimate {
    pub area: Decimal,
    pub basis: AreaBasis,
}

/// 工業板材統計（依材料名稱）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustrialMaterialStat {
    /// 成品面積
    pub total_area: Decimal,
    /// 板材張數（未取整）
    pub sheets: Decimal,
    pub estimated_cost: Decimal,
}

impl IndustrialMaterialStat {
    /// 實際訂購張數
    pub fn sheets_to_order(&self) -> Decimal {
        self.sheets.ceil()
    }
}

/// 天然木料統計（依材料名稱）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaturalMaterialStat {
    pub total_area: Decimal,
    pub volume_m3: Decimal,
    pub estimated_cost: Decimal,
}

/// 配件明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryLine {
    pub item_id: Uuid,
    pub name: String,
    pub quantity: Decimal,
    pub estimated_cost: Decimal,
}

/// 單一項目的材料用量（每個項目只落入一種）
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialUsage {
    Outsourced {
        cost: Decimal,
    },
    /// 成本 = 有效單位成本 × 數量；未知成本時僅在總價 = 數量 × 單價 時等於 總價 × 比例
    Accessory(AccessoryLine),
    Natural {
        material: String,
        area: Decimal,
        volume_m3: Decimal,
        cost: Decimal,
        painted_area: Decimal,
    },
    Industrial {
        material: String,
        area: Decimal,
        sheets: Decimal,
        cost: Decimal,
        painted_area: Decimal,
    },
}

impl MaterialUsage {
    /// 該項目計入其成本分類的基礎材料成本
    pub fn base_cost(&self) -> Decimal {
        match self {
            MaterialUsage::Outsourced { cost } => *cost,
            MaterialUsage::Accessory(line) => line.estimated_cost,
            MaterialUsage::Natural { cost, .. } | MaterialUsage::Industrial { cost, .. } => *cost,
        }
    }

    pub fn category(&self) -> ItemCategory {
        match self {
            MaterialUsage::Outsourced { .. } => ItemCategory::Outsourced,
            MaterialUsage::Accessory(_) => ItemCategory::Accessory,
            MaterialUsage::Natural { .. } => ItemCategory::NaturalWood,
            MaterialUsage::Industrial { .. } => ItemCategory::Industrial,
        }
    }
}

/// 材料帳（單次 fold 的累加結果）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialLedger {
    pub industrial: BTreeMap<String, IndustrialMaterialStat>,
    pub natural: BTreeMap<String, NaturalMaterialStat>,
    pub accessories: Vec<AccessoryLine>,
    pub outsourced_cost: Decimal,
    /// 工業板材總張數（未取整）
    pub total_industrial_sheets: Decimal,
    /// 需塗裝面積（已含邊、背面係數）
    pub total_painted_area: Decimal,
    /// 用量或成本超出可表示範圍、已取極值的項目
    pub overflowed_items: Vec<Uuid>,
    /// 累加時的溢出記錄
    pub overflow: Overflow,
}

impl MaterialLedger {
    /// 記入單一項目的用量
    pub fn record(&mut self, usage: MaterialUsage) {
        let overflow = &mut self.overflow;
        match usage {
            MaterialUsage::Outsourced { cost } => {
                self.outsourced_cost = overflow.add(self.outsourced_cost, cost);
            }
            MaterialUsage::Accessory(line) => {
                self.accessories.push(line);
            }
            MaterialUsage::Natural {
                material,
                area,
                volume_m3,
                cost,
                painted_area,
            } => {
                let stat = self.natural.entry(material).or_default();
                stat.total_area = overflow.add(stat.total_area, area);
                stat.volume_m3 = overflow.add(stat.volume_m3, volume_m3);
                stat.estimated_cost = overflow.add(stat.estimated_cost, cost);
                self.total_painted_area = overflow.add(self.total_painted_area, painted_area);
            }
            MaterialUsage::Industrial {
                material,
                area,
                sheets,
                cost,
                painted_area,
            } => {
                let stat = self.industrial.entry(material).or_default();
                stat.total_area = overflow.add(stat.total_area, area);
                stat.sheets = overflow.add(stat.sheets, sheets);
                stat.estimated_cost = overflow.add(stat.estimated_cost, cost);
                self.total_industrial_sheets = overflow.add(self.total_industrial_sheets, sheets);
                self.total_painted_area = overflow.add(self.total_painted_area, painted_area);
            }
        }
    }

    pub fn industrial_cost(&self) -> Decimal {
        saturating_sum(self.industrial.values().map(|m| m.estimated_cost))
    }

    pub fn natural_cost(&self) -> Decimal {
        saturating_sum(self.natural.values().map(|m| m.estimated_cost))
    }

    pub fn accessory_cost(&self) -> Decimal {
        saturating_sum(self.accessories.iter().map(|a| a.estimated_cost))
    }

    /// 天然木料總面積
    pub fn total_natural_area(&self) -> Decimal {
        saturating_sum(self.natural.values().map(|m| m.total_area))
    }
}

/// 材料用量估算器
pub struct QuantityEstimator<'a> {
    settings: &'a ProductionSettings,
    constants: &'a EstimationConstants,
    rules: &'a RuleSet,
}

impl<'a> QuantityEstimator<'a> {
    /// `settings` 必須已補齊預設值（見 [`ProductionSettings::resolved`]）
    pub fn new(
        settings: &'a ProductionSettings,
        constants: &'a EstimationConstants,
        rules: &'a RuleSet,
    ) -> Self {
        Self {
            settings,
            constants,
            rules,
        }
    }

    /// 依單位與名稱推算成品面積
    pub fn area(&self, text: &ItemText, quantity: Decimal) -> AreaEstimate {
        self.area_with(text, quantity, &mut Overflow::new())
    }

    fn area_with(
        &self,
        text: &ItemText,
        quantity: Decimal,
        overflow: &mut Overflow,
    ) -> AreaEstimate {
        let unit_is = |units: &[String]| units.iter().any(|u| text.unit.contains(u.as_str()));

        if unit_is(&self.rules.area_units) {
            return AreaEstimate {
                area: quantity,
                basis: AreaBasis::Area,
            };
        }
        if unit_is(&self.rules.linear_units) {
            return AreaEstimate {
                area: overflow.mul(quantity, self.constants.linear_to_area),
                basis: AreaBasis::Linear,
            };
        }

        match KeywordValue::lookup(&self.rules.count_unit_areas, &text.name) {
            Some(area) => AreaEstimate {
                area,
                basis: AreaBasis::NamedCount,
            },
            None => AreaEstimate {
                area: overflow.mul(quantity, self.constants.generic_area_per_unit),
                basis: AreaBasis::GenericCount,
            },
        }
    }

    /// 板材展開係數（依名稱覆寫，否則使用設定值）
    pub fn sheet_coefficient(&self, text: &ItemText) -> Decimal {
        KeywordValue::lookup(&self.rules.sheet_coefficients, &text.name)
            .unwrap_or(self.settings.material_coefficient)
    }

    /// 工業板材張數 = 面積 × 展開係數 × 損耗 / 單張面積
    pub fn industrial_sheets(&self, text: &ItemText, area: Decimal) -> Decimal {
        self.industrial_sheets_with(text, area, &mut Overflow::new())
    }

    fn industrial_sheets_with(
        &self,
        text: &ItemText,
        area: Decimal,
        overflow: &mut Overflow,
    ) -> Decimal {
        let expanded_area = overflow.mul(area, self.sheet_coefficient(text));
        let wasted_area = overflow.mul(expanded_area, self.settings.waste_factor);
        overflow.div(wasted_area, self.settings.sheet_area())
    }

    /// 天然木料體積（m3）= 面積 × 結構係數 × 板厚 × 損耗
    pub fn natural_volume(&self, area: Decimal) -> Decimal {
        self.natural_volume_with(area, &mut Overflow::new())
    }

    fn natural_volume_with(&self, area: Decimal, overflow: &mut Overflow) -> Decimal {
        [
            self.constants.natural_wood_structure_factor,
            self.constants.natural_wood_thickness,
            self.settings.natural_wood_waste_factor,
        ]
        .into_iter()
        .fold(area, |volume, factor| overflow.mul(volume, factor))
    }

    fn painted_area(
        &self,
        classified: &ClassifiedItem<'_>,
        area: Decimal,
        overflow: &mut Overflow,
    ) -> Decimal {
        if self
            .rules
            .requires_painted_finish(&classified.text, classified.category)
        {
            overflow.mul(area, self.constants.painted_surface_factor)
        } else {
            Decimal::ZERO
        }
    }

    fn material_name(&self, classified: &ClassifiedItem<'_>, default: &str) -> String {
        let label = classified.item.material_label.trim();
        if label.is_empty() {
            default.to_string()
        } else {
            label.to_string()
        }
    }

    /// 估算單一項目的用量
    pub fn estimate(&self, classified: &ClassifiedItem<'_>) -> MaterialUsage {
        self.estimate_checked(classified).0
    }

    /// 估算單一項目的用量，並回報途中是否溢出（溢出的值已取極值）
    pub fn estimate_checked(&self, classified: &ClassifiedItem<'_>) -> (MaterialUsage, bool) {
        let item = classified.item;
        let ratio = self.constants.cost_fallback_ratio;
        let mut overflow = Overflow::new();

        let usage = match classified.category {
            ItemCategory::Outsourced => MaterialUsage::Outsourced {
                cost: overflow.mul(item.effective_unit_cost(ratio), item.quantity),
            },
            ItemCategory::Accessory => MaterialUsage::Accessory(AccessoryLine {
                item_id: item.id,
                name: item.name.clone(),
                quantity: item.quantity,
                estimated_cost: overflow.mul(item.effective_unit_cost(ratio), item.quantity),
            }),
            ItemCategory::NaturalWood => {
                let area = self.area_with(&classified.text, item.quantity, &mut overflow).area;
                let volume_m3 = self.natural_volume_with(area, &mut overflow);
                MaterialUsage::Natural {
                    material: self.material_name(classified, &self.rules.default_natural_material),
                    area,
                    volume_m3,
                    cost: overflow.mul(volume_m3, self.settings.natural_wood_price_per_m3),
                    painted_area: self.painted_area(classified, area, &mut overflow),
                }
            }
            ItemCategory::Industrial => {
                let area = self.area_with(&classified.text, item.quantity, &mut overflow).area;
                let sheets = self.industrial_sheets_with(&classified.text, area, &mut overflow);
                MaterialUsage::Industrial {
                    material: self
                        .material_name(classified, &self.rules.default_industrial_material),
                    area,
                    sheets,
                    cost: overflow.mul(sheets, self.settings.sheet_price),
                    painted_area: self.painted_area(classified, area, &mut overflow),
                }
            }
        };

        (usage, overflow.occurred())
    }

    /// 對所有已分類項目做單次 fold
    pub fn accumulate(&self, classified: &[ClassifiedItem<'_>]) -> MaterialLedger {
        classified
            .iter()
            .fold(MaterialLedger::default(), |mut ledger, item| {
                let (usage, overflowed) = self.estimate_checked(item);
                if overflowed {
                    ledger.overflowed_items.push(item.item.id);
                }
                ledger.record(usage);
                ledger
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Classifier;
    use fitout_core::{ItemSource, LineItem};
    use proptest::prelude::*;
    use rstest::rstest;

    fn item(name: &str, unit: &str, material: &str, quantity: i64, unit_price: i64) -> LineItem {
        LineItem::new(
            name.to_string(),
            unit.to_string(),
            Decimal::from(quantity),
            Decimal::from(unit_price),
        )
        .with_material(material.to_string())
    }

    fn ledger_for(items: &[LineItem]) -> MaterialLedger {
        let settings = ProductionSettings::default();
        let constants = EstimationConstants::default();
        let rules = RuleSet::standard();
        let classified = Classifier::new(&rules).classify_all(items);
        QuantityEstimator::new(&settings, &constants, &rules).accumulate(&classified)
    }

    #[rstest]
    #[case("Tủ áo", "m2", 10, "10", AreaBasis::Area)]
    #[case("Tủ bếp dưới", "md", 5, "3", AreaBasis::Linear)]
    #[case("Giường ngủ", "cái", 2, "3.5", AreaBasis::NamedCount)]
    #[case("Tab 2 ngăn kéo", "cái", 2, "0.5", AreaBasis::NamedCount)]
    #[case("Tab đầu giường", "cái", 1, "3.5", AreaBasis::NamedCount)]
    #[case("Bàn trang điểm", "cái", 1, "1.5", AreaBasis::NamedCount)]
    #[case("Tủ giày", "cái", 3, "4.5", AreaBasis::GenericCount)]
    #[case("Tủ giày", "tấm", 2, "3", AreaBasis::GenericCount)]
    fn test_area_derivation(
        #[case] name: &str,
        #[case] unit: &str,
        #[case] quantity: i64,
        #[case] expected: &str,
        #[case] basis: AreaBasis,
    ) {
        let settings = ProductionSettings::default();
        let constants = EstimationConstants::default();
        let rules = RuleSet::standard();
        let estimator = QuantityEstimator::new(&settings, &constants, &rules);

        let text = ItemText::new(name, unit, "", Decimal::ZERO);
        let estimate = estimator.area(&text, Decimal::from(quantity));

        assert_eq!(estimate.area, expected.parse::<Decimal>().unwrap());
        assert_eq!(estimate.basis, basis);
    }

    #[rstest]
    #[case("Vách ốp tường", "1.1")]
    #[case("Sàn gỗ", "1.1")]
    #[case("Giường ngủ", "2")]
    #[case("Bàn làm việc", "2")]
    #[case("Kệ tivi", "2.5")]
    #[case("Tủ áo", "4.2")]
    fn test_sheet_coefficient(#[case] name: &str, #[case] expected: &str) {
        let settings = ProductionSettings::default();
        let constants = EstimationConstants::default();
        let rules = RuleSet::standard();
        let estimator = QuantityEstimator::new(&settings, &constants, &rules);

        let text = ItemText::new(name, "m2", "", Decimal::ZERO);
        assert_eq!(estimator.sheet_coefficient(&text), expected.parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_industrial_sheets() {
        let ledger = ledger_for(&[item("Tủ áo", "m2", "MDF An Cường", 10, 2_600_000)]);

        // (10 × 4.2 × 1.2) / 2.9768 ≈ 16.93
        let stat = &ledger.industrial["MDF An Cường"];
        assert_eq!(stat.total_area, Decimal::from(10));
        assert_eq!(stat.sheets.round_dp(2), Decimal::new(1693, 2));
        assert_eq!(stat.sheets_to_order(), Decimal::from(17));
        assert_eq!(stat.estimated_cost, stat.sheets * Decimal::from(850_000));
        assert_eq!(ledger.total_industrial_sheets, stat.sheets);
        assert_eq!(ledger.total_painted_area, Decimal::ZERO);
    }

    #[test]
    fn test_natural_wood_volume() {
        let ledger = ledger_for(&[item("Kệ sách", "md", "Gỗ Sồi", 5, 3_000_000)]);

        let stat = &ledger.natural["Gỗ Sồi"];
        assert_eq!(stat.total_area, Decimal::from(3));
        assert_eq!(stat.volume_m3, Decimal::new(225, 3));
        assert_eq!(stat.estimated_cost, Decimal::from(4_050_000));
        // 天然木料一律塗裝：3 × 1.5
        assert_eq!(ledger.total_painted_area, Decimal::new(45, 1));
        assert_eq!(ledger.total_industrial_sheets, Decimal::ZERO);
    }

    #[test]
    fn test_painted_industrial_finish() {
        let ledger = ledger_for(&[item("Tủ bếp trên", "md", "Acrylic An Cường", 4, 3_500_000)]);

        // 面積 2.4 × 1.5
        assert_eq!(ledger.total_painted_area, Decimal::new(36, 1));
        assert!(ledger.industrial.contains_key("Acrylic An Cường"));
    }

    #[test]
    fn test_blank_material_uses_default_names() {
        let ledger = ledger_for(&[
            item("Tủ áo", "m2", "  ", 2, 2_600_000),
            item("Tủ áo", "m2", "", 3, 2_600_000),
        ]);

        assert_eq!(ledger.industrial.len(), 1);
        assert_eq!(ledger.industrial["MDF Melamine"].total_area, Decimal::from(5));
    }

    #[test]
    fn test_accessory_and_outsourced_costs() {
        let ledger = ledger_for(&[
            item("Bản lề giảm chấn", "cái", "Inox 304", 50, 45_000),
            item("Sofa da", "cái", "Da", 1, 9_500_000)
                .with_source(ItemSource::Outsourced)
                .with_cost_price(Decimal::from(6_000_000)),
            item("Rèm vải", "md", "Vải", 10, 1_600_000).with_source(ItemSource::Outsourced),
        ]);

        assert_eq!(ledger.accessories.len(), 1);
        assert_eq!(ledger.accessory_cost(), Decimal::from(1_575_000));
        // 6,000,000 + 1,600,000 × 0.7 × 10
        assert_eq!(ledger.outsourced_cost, Decimal::from(17_200_000));
        assert!(ledger.industrial.is_empty());
        assert!(ledger.natural.is_empty());
    }

    #[test]
    fn test_zero_quantity_contributes_nothing() {
        let ledger = ledger_for(&[
            item("Tủ áo", "m2", "MDF", 0, 2_600_000),
            item("Bản lề", "cái", "Inox", 0, 45_000),
        ]);

        assert_eq!(ledger.total_industrial_sheets, Decimal::ZERO);
        assert_eq!(ledger.industrial_cost(), Decimal::ZERO);
        assert_eq!(ledger.accessory_cost(), Decimal::ZERO);
    }

    #[test]
    fn test_materials_keyed_by_name() {
        let ledger = ledger_for(&[
            item("Tủ áo", "m2", "MDF An Cường", 10, 2_600_000),
            item("Vách ốp", "m2", "MDF An Cường", 5, 1_400_000),
            item("Tủ lavabo", "md", "Nhựa Picomat", 2, 3_800_000),
        ]);

        let names: Vec<_> = ledger.industrial.keys().cloned().collect();
        assert_eq!(names, vec!["MDF An Cường", "Nhựa Picomat"]);
        assert_eq!(ledger.industrial["MDF An Cường"].total_area, Decimal::from(15));
        assert_eq!(
            ledger.total_industrial_sheets,
            ledger.industrial.values().map(|m| m.sheets).sum::<Decimal>()
        );
    }

    fn sample(index: usize, quantity: i64) -> LineItem {
        match index {
            0 => item("Tủ áo", "m2", "MDF An Cường", quantity, 2_600_000),
            1 => item("Kệ sách", "md", "Gỗ Sồi", quantity, 3_000_000),
            2 => item("Bản lề", "cái", "Inox", quantity, 45_000),
            3 => item("Giường ngủ", "cái", "MDF", quantity, 5_500_000),
            _ => item("Sofa", "cái", "Da", quantity, 9_500_000).with_source(ItemSource::Outsourced),
        }
    }

    fn huge(index: usize) -> LineItem {
        let mut item = sample(index, 1);
        item.set_quantity(Decimal::from_i128_with_scale(10_i128.pow(25), 0));
        item
    }

    #[rstest]
    #[case(0, true)]
    #[case(1, true)]
    #[case(2, true)]
    #[case(3, false)]
    #[case(4, true)]
    fn test_huge_quantity_saturates_cost(#[case] index: usize, #[case] overflows: bool) {
        let settings = ProductionSettings::default();
        let constants = EstimationConstants::default();
        let rules = RuleSet::standard();
        let estimator = QuantityEstimator::new(&settings, &constants, &rules);

        let items = [huge(index)];
        let classified = Classifier::new(&rules).classify_all(&items);
        let (usage, overflowed) = estimator.estimate_checked(&classified[0]);

        assert_eq!(overflowed, overflows);
        if overflows {
            assert_eq!(usage.base_cost(), Decimal::MAX);
        } else {
            // 床依名稱取固定面積，與數量無關
            assert!(usage.base_cost() < Decimal::from(10_000_000));
        }
    }

    #[test]
    fn test_ledger_lists_overflowed_items() {
        let items = [huge(0), sample(2, 10), huge(0)];
        let ledger = ledger_for(&items);

        assert_eq!(ledger.overflowed_items, vec![items[0].id, items[2].id]);
        assert_eq!(ledger.industrial["MDF An Cường"].estimated_cost, Decimal::MAX);
        assert!(ledger.overflow.occurred());
        assert_eq!(ledger.accessory_cost(), Decimal::from(315_000));
    }

    proptest! {
        #[test]
        fn prop_base_cost_never_decreases_with_quantity(
            index in 0usize..5,
            quantity in 0i64..500,
            extra in 1i64..500,
        ) {
            let settings = ProductionSettings::default();
            let constants = EstimationConstants::default();
            let rules = RuleSet::standard();
            let classifier = Classifier::new(&rules);
            let estimator = QuantityEstimator::new(&settings, &constants, &rules);

            let small = [sample(index, quantity)];
            let large = [sample(index, quantity + extra)];
            let small = estimator.estimate(&classifier.classify_all(&small)[0]);
            let large = estimator.estimate(&classifier.classify_all(&large)[0]);

            prop_assert_eq!(small.category(), large.category());
            prop_assert!(large.base_cost() >= small.base_cost());
        }
    }
}
