//! 分類規則模型
//!
//! 以關鍵字判斷報價項目屬於哪一種成本模型。規則是可序列化的資料（有版本號），
//! 可由 JSON 載入與修改；依序比對，第一條命中的規則決定分類。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{FitoutError, LineItem};

/// 成本模型分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// 外購成品
    Outsourced,
    /// 五金配件
    Accessory,
    /// 天然木料
    NaturalWood,
    /// 工業板材
    Industrial,
}

/// 分類用的項目文字（已轉小寫）
#[derive(Debug, Clone, PartialEq)]
pub struct ItemText {
    pub name: String,
    pub unit: String,
    pub material: String,
    pub unit_price: Decimal,
}

impl ItemText {
    /// 從報價項目擷取
    pub fn from_item(item: &LineItem) -> Self {
        Self::new(&item.name, &item.unit, &item.material_label, item.unit_price)
    }

    pub fn new(name: &str, unit: &str, material: &str, unit_price: Decimal) -> Self {
        Self {
            name: name.to_lowercase(),
            unit: unit.to_lowercase(),
            material: material.to_lowercase(),
            unit_price,
        }
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| text.contains(k.as_str()))
}

/// 判斷條件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    /// 名稱包含任一關鍵字
    NameContains(Vec<String>),
    /// 單位包含任一關鍵字
    UnitContains(Vec<String>),
    /// 材料包含任一關鍵字
    MaterialContains(Vec<String>),
    /// 單價低於門檻
    UnitPriceBelow(Decimal),
    /// 任一條件成立
    AnyOf(Vec<Predicate>),
    /// 全部條件成立
    AllOf(Vec<Predicate>),
}

impl Predicate {
    /// 比對項目文字
    pub fn matches(&self, text: &ItemText) -> bool {
        self.evaluate(text, true)
    }

    /// 比對項目文字，但忽略單價條件（用於找出因高單價而未歸入配件的項目）
    pub fn matches_ignoring_price(&self, text: &ItemText) -> bool {
        self.evaluate(text, false)
    }

    fn evaluate(&self, text: &ItemText, check_price: bool) -> bool {
        match self {
            Predicate::NameContains(keywords) => contains_any(&text.name, keywords),
            Predicate::UnitContains(keywords) => contains_any(&text.unit, keywords),
            Predicate::MaterialContains(keywords) => contains_any(&text.material, keywords),
            Predicate::UnitPriceBelow(threshold) => !check_price || text.unit_price < *threshold,
            Predicate::AnyOf(predicates) => {
                predicates.iter().any(|p| p.evaluate(text, check_price))
            }
            Predicate::AllOf(predicates) => {
                predicates.iter().all(|p| p.evaluate(text, check_price))
            }
        }
    }

    fn normalize(&mut self) {
        match self {
            Predicate::NameContains(keywords)
            | Predicate::UnitContains(keywords)
            | Predicate::MaterialContains(keywords) => {
                for keyword in keywords.iter_mut() {
                    *keyword = keyword.trim().to_lowercase();
                }
            }
            Predicate::UnitPriceBelow(_) => {}
            Predicate::AnyOf(predicates) | Predicate::AllOf(predicates) => {
                predicates.iter_mut().for_each(Predicate::normalize);
            }
        }
    }

    fn validate(&self) -> crate::Result<()> {
        match self {
            Predicate::NameContains(keywords)
            | Predicate::UnitContains(keywords)
            | Predicate::MaterialContains(keywords) => {
                if keywords.is_empty() || keywords.iter().any(|k| k.is_empty()) {
                    return Err(FitoutError::InvalidRuleSet("關鍵字列表不可為空".to_string()));
                }
                Ok(())
            }
            Predicate::UnitPriceBelow(threshold) => {
                if *threshold <= Decimal::ZERO {
                    return Err(FitoutError::InvalidRuleSet(format!(
                        "單價門檻必須大於 0: {}",
                        threshold
                    )));
                }
                Ok(())
            }
            Predicate::AnyOf(predicates) | Predicate::AllOf(predicates) => {
                if predicates.is_empty() {
                    return Err(FitoutError::InvalidRuleSet("組合條件不可為空".to_string()));
                }
                predicates.iter().try_for_each(Predicate::validate)
            }
        }
    }
}

/// 分類規則
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub predicate: Predicate,
    pub category: ItemCategory,
}

/// 關鍵字對應數值（名稱含關鍵字時採用該值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordValue {
    pub keywords: Vec<String>,
    pub value: Decimal,
}

impl KeywordValue {
    pub fn new(keywords: &[&str], value: Decimal) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            value,
        }
    }

    /// 依序找出第一個命中的數值
    pub fn lookup(table: &[KeywordValue], text: &str) -> Option<Decimal> {
        table
            .iter()
            .find(|entry| contains_any(text, &entry.keywords))
            .map(|entry| entry.value)
    }
}

/// 分類規則集
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    /// 規則版本
    pub version: u32,

    /// 生產項目的分類規則（依序比對）
    pub rules: Vec<ClassificationRule>,

    /// 無規則命中時的分類
    pub fallback: ItemCategory,

    /// 需要塗裝的材料（天然木料一律塗裝）
    pub painted_finish: Predicate,

    /// 面積單位關鍵字（數量即面積）
    pub area_units: Vec<String>,

    /// 延米單位關鍵字
    pub linear_units: Vec<String>,

    /// 計件項目依名稱估算的固定面積（m2）
    pub count_unit_areas: Vec<KeywordValue>,

    /// 依名稱覆寫板材展開係數
    pub sheet_coefficients: Vec<KeywordValue>,

    /// 材料名稱空白時的工業板材名稱
    pub default_industrial_material: String,

    /// 材料名稱空白時的天然木料名稱
    pub default_natural_material: String,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleSet {
    /// 標準規則（越南市場）
    pub fn standard() -> Self {
        Self::standard_with_threshold(Decimal::from(2_000_000))
    }

    /// 標準規則，自訂配件單價上限
    pub fn standard_with_threshold(accessory_price_threshold: Decimal) -> Self {
        let accessory = Predicate::AllOf(vec![
            Predicate::AnyOf(vec![
                Predicate::NameContains(words(&["bản lề", "ray", "tay nắm", "phụ kiện"])),
                Predicate::UnitContains(words(&["bộ", "chiếc", "cái"])),
            ]),
            Predicate::UnitPriceBelow(accessory_price_threshold),
        ]);
        let natural_wood =
            Predicate::MaterialContains(words(&["sồi", "óc chó", "gõ", "tự nhiên", "xoan"]));

        Self {
            version: 1,
            rules: vec![
                ClassificationRule {
                    predicate: accessory,
                    category: ItemCategory::Accessory,
                },
                ClassificationRule {
                    predicate: natural_wood,
                    category: ItemCategory::NaturalWood,
                },
            ],
            fallback: ItemCategory::Industrial,
            painted_finish: Predicate::MaterialContains(words(&[
                "sơn", "acrylic", "inchem", "bệt",
            ])),
            area_units: words(&["m2"]),
            linear_units: words(&["md"]),
            count_unit_areas: vec![
                KeywordValue::new(&["giường"], Decimal::new(35, 1)),
                KeywordValue::new(&["tab"], Decimal::new(5, 1)),
                KeywordValue::new(&["bàn"], Decimal::new(15, 1)),
            ],
            sheet_coefficients: vec![
                KeywordValue::new(&["vách", "sàn", "trần"], Decimal::new(11, 1)),
                KeywordValue::new(&["giường", "bàn"], Decimal::from(2)),
                KeywordValue::new(&["kệ"], Decimal::new(25, 1)),
            ],
            default_industrial_material: "MDF Melamine".to_string(),
            default_natural_material: "Gỗ Tự Nhiên".to_string(),
        }
    }

    /// 從 JSON 載入（關鍵字轉小寫並檢查）
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let mut rules: RuleSet = serde_json::from_str(json)?;
        rules.normalize();
        rules.validate()?;
        Ok(rules)
    }

    /// 輸出為 JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 關鍵字統一轉小寫、去空白
    pub fn normalize(&mut self) {
        for rule in &mut self.rules {
            rule.predicate.normalize();
        }
        self.painted_finish.normalize();
        for list in [&mut self.area_units, &mut self.linear_units] {
            for unit in list.iter_mut() {
                *unit = unit.trim().to_lowercase();
            }
        }
        for entry in self
            .count_unit_areas
            .iter_mut()
            .chain(self.sheet_coefficients.iter_mut())
        {
            for keyword in entry.keywords.iter_mut() {
                *keyword = keyword.trim().to_lowercase();
            }
        }
    }

    /// 檢查規則集是否可用
    pub fn validate(&self) -> crate::Result<()> {
        if self.version == 0 {
            return Err(FitoutError::InvalidRuleSet("版本號必須大於 0".to_string()));
        }

        for rule in &self.rules {
            if rule.category == ItemCategory::Outsourced {
                return Err(FitoutError::InvalidRuleSet(
                    "外購分類由項目來源決定，不可作為規則結果".to_string(),
                ));
            }
            rule.predicate.validate()?;
        }

        if self.fallback == ItemCategory::Outsourced {
            return Err(FitoutError::InvalidRuleSet(
                "預設分類不可為外購".to_string(),
            ));
        }

        self.painted_finish.validate()?;

        for entry in self.count_unit_areas.iter().chain(self.sheet_coefficients.iter()) {
            if entry.keywords.is_empty() || entry.keywords.iter().any(|k| k.is_empty()) {
                return Err(FitoutError::InvalidRuleSet("關鍵字列表不可為空".to_string()));
            }
            if entry.value <= Decimal::ZERO {
                return Err(FitoutError::InvalidRuleSet(format!(
                    "關鍵字 {:?} 的數值必須大於 0",
                    entry.keywords
                )));
            }
        }

        Ok(())
    }

    /// 依序比對規則，返回第一個命中的分類
    pub fn categorize(&self, text: &ItemText) -> ItemCategory {
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(text))
            .map(|rule| rule.category)
            .unwrap_or(self.fallback)
    }

    /// 是否為五金類項目但因單價過高未歸入配件
    pub fn is_priced_out_accessory(&self, text: &ItemText, category: ItemCategory) -> bool {
        category != ItemCategory::Accessory
            && self.rules.iter().any(|rule| {
                rule.category == ItemCategory::Accessory
                    && !rule.predicate.matches(text)
                    && rule.predicate.matches_ignoring_price(text)
            })
    }

    /// 材料是否需要塗裝
    pub fn requires_painted_finish(&self, text: &ItemText, category: ItemCategory) -> bool {
        category == ItemCategory::NaturalWood || self.painted_finish.matches(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn text(name: &str, unit: &str, material: &str, price: i64) -> ItemText {
        ItemText::new(name, unit, material, Decimal::from(price))
    }

    #[test]
    fn test_standard_rules_are_valid() {
        let rules = RuleSet::standard();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.version, 1);
    }

    #[rstest]
    // 單位為 cái 且單價低：配件（即使材料是天然木）
    #[case("Nút gỗ", "cái", "Gỗ Sồi", 50_000, ItemCategory::Accessory)]
    // 名稱大小寫不影響
    #[case("BẢN LỀ giảm chấn", "", "Inox 304", 45_000, ItemCategory::Accessory)]
    #[case("Tủ áo", "m2", "Gỗ Óc Chó", 6_000_000, ItemCategory::NaturalWood)]
    #[case("Tủ áo", "m2", "", 2_600_000, ItemCategory::Industrial)]
    fn test_categorize_first_match_wins(
        #[case] name: &str,
        #[case] unit: &str,
        #[case] material: &str,
        #[case] price: i64,
        #[case] expected: ItemCategory,
    ) {
        let rules = RuleSet::standard();
        assert_eq!(rules.categorize(&text(name, unit, material, price)), expected);
    }

    #[test]
    fn test_priced_out_accessory() {
        let rules = RuleSet::standard();

        let premium = text("Tay nắm thiết kế", "cái", "Đồng", 2_500_000);
        let category = rules.categorize(&premium);
        assert_eq!(category, ItemCategory::Industrial);
        assert!(rules.is_priced_out_accessory(&premium, category));

        let cabinet = text("Tủ áo", "m2", "MDF", 2_600_000);
        let category = rules.categorize(&cabinet);
        assert!(!rules.is_priced_out_accessory(&cabinet, category));
    }

    #[test]
    fn test_custom_threshold() {
        let rules = RuleSet::standard_with_threshold(Decimal::from(3_000_000));
        assert_eq!(
            rules.categorize(&text("Tay nắm thiết kế", "cái", "Đồng", 2_500_000)),
            ItemCategory::Accessory
        );
    }

    #[test]
    fn test_painted_finish() {
        let rules = RuleSet::standard();

        let acrylic = text("Tủ bếp", "md", "Acrylic An Cường", 3_500_000);
        assert!(rules.requires_painted_finish(&acrylic, ItemCategory::Industrial));

        let melamine = text("Tủ bếp", "md", "MDF An Cường", 2_800_000);
        assert!(!rules.requires_painted_finish(&melamine, ItemCategory::Industrial));
        assert!(rules.requires_painted_finish(&melamine, ItemCategory::NaturalWood));
    }

    #[test]
    fn test_keyword_lookup_order() {
        let rules = RuleSet::standard();

        // "bàn" 與 "giường" 同時出現時取表中第一個命中
        assert_eq!(
            KeywordValue::lookup(&rules.count_unit_areas, "giường kèm bàn"),
            Some(Decimal::new(35, 1))
        );
        assert_eq!(
            KeywordValue::lookup(&rules.sheet_coefficients, "kệ sách"),
            Some(Decimal::new(25, 1))
        );
        assert_eq!(KeywordValue::lookup(&rules.sheet_coefficients, "tủ áo"), None);
    }

    #[test]
    fn test_json_round_trip_normalizes_keywords() {
        let mut rules = RuleSet::standard();
        rules.version = 2;
        rules.painted_finish = Predicate::MaterialContains(vec![" PU ".to_string()]);

        let json = rules.to_json().unwrap();
        let loaded = RuleSet::from_json(&json).unwrap();

        assert_eq!(loaded.version, 2);
        assert_eq!(loaded.painted_finish, Predicate::MaterialContains(vec!["pu".to_string()]));
    }

    #[test]
    fn test_invalid_rule_sets() {
        let mut rules = RuleSet::standard();
        rules.version = 0;
        assert!(matches!(rules.validate(), Err(FitoutError::InvalidRuleSet(_))));

        let mut rules = RuleSet::standard();
        rules.rules.push(ClassificationRule {
            predicate: Predicate::NameContains(vec![]),
            category: ItemCategory::Industrial,
        });
        assert!(rules.validate().is_err());

        let mut rules = RuleSet::standard();
        rules.fallback = ItemCategory::Outsourced;
        assert!(rules.validate().is_err());

        let mut rules = RuleSet::standard();
        rules.sheet_coefficients.push(KeywordValue::new(&["tủ"], Decimal::ZERO));
        assert!(rules.validate().is_err());

        assert!(RuleSet::from_json("{}").is_err());
    }
}
