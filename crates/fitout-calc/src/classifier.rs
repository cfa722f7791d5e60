//! 項目分類

use fitout_core::{ItemCategory, ItemText, LineItem, RuleSet};

/// 已分類的報價項目
#[derive(Debug, Clone)]
pub struct ClassifiedItem<'a> {
    pub item: &'a LineItem,
    pub text: ItemText,
    pub category: ItemCategory,
}

/// 分類器
///
/// 外購項目一律歸入外購，不進入規則比對；
/// 生產項目依規則集依序比對，未命中時歸入預設分類（工業板材）。
pub struct Classifier<'r> {
    rules: &'r RuleSet,
}

impl<'r> Classifier<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// 分類單一項目
    pub fn classify(&self, item: &LineItem) -> ItemCategory {
        self.classify_text(item, &ItemText::from_item(item))
    }

    fn classify_text(&self, item: &LineItem, text: &ItemText) -> ItemCategory {
        if item.is_outsourced() {
            return ItemCategory::Outsourced;
        }
        self.rules.categorize(text)
    }

    /// 分類所有項目（保持原順序）
    pub fn classify_all<'a>(&self, items: &'a [LineItem]) -> Vec<ClassifiedItem<'a>> {
        items
            .iter()
            .map(|item| {
                let text = ItemText::from_item(item);
                let category = self.classify_text(item, &text);
                ClassifiedItem {
                    item,
                    text,
                    category,
                }
            })
            .collect()
    }

    /// 五金類名稱/單位但單價超過配件上限的生產項目
    pub fn is_priced_out_accessory(&self, classified: &ClassifiedItem<'_>) -> bool {
        classified.category != ItemCategory::Outsourced
            && self
                .rules
                .is_priced_out_accessory(&classified.text, classified.category)
    }

    /// 是否需要塗裝
    pub fn requires_painted_finish(&self, classified: &ClassifiedItem<'_>) -> bool {
        self.rules
            .requires_painted_finish(&classified.text, classified.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitout_core::ItemSource;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn item(name: &str, unit: &str, material: &str, unit_price: i64) -> LineItem {
        LineItem::new(
            name.to_string(),
            unit.to_string(),
            Decimal::from(1),
            Decimal::from(unit_price),
        )
        .with_material(material.to_string())
    }

    #[rstest]
    #[case("Bản lề giảm chấn", "cái", "Inox 304", 45_000, ItemCategory::Accessory)]
    #[case("Ray bi 3 tầng", "", "Thép", 150_000, ItemCategory::Accessory)]
    #[case("Tay nắm tủ", "md", "Nhôm", 80_000, ItemCategory::Accessory)]
    #[case("Phụ kiện tủ bếp", "m2", "", 1_999_999, ItemCategory::Accessory)]
    #[case("Đợt gỗ trang trí", "cái", "MDF An Cường", 450_000, ItemCategory::Accessory)]
    #[case("Giường ngủ", "bộ", "Gỗ Sồi", 1_500_000, ItemCategory::Accessory)]
    #[case("Tay nắm thiết kế", "cái", "Đồng", 2_000_000, ItemCategory::Industrial)]
    #[case("Giường ngủ (MDF)", "cái", "MDF An Cường", 5_500_000, ItemCategory::Industrial)]
    #[case("Tủ áo", "m2", "Gỗ Sồi", 6_000_000, ItemCategory::NaturalWood)]
    #[case("Bàn ăn", "cái", "Óc chó Bắc Mỹ", 25_000_000, ItemCategory::NaturalWood)]
    #[case("Cửa", "m2", "Gõ đỏ", 5_000_000, ItemCategory::NaturalWood)]
    #[case("Kệ sách", "md", "Gỗ tự nhiên", 3_000_000, ItemCategory::NaturalWood)]
    #[case("Tủ rượu", "md", "Xoan đào", 4_000_000, ItemCategory::NaturalWood)]
    #[case("Tủ áo", "m2", "MDF An Cường", 2_600_000, ItemCategory::Industrial)]
    #[case("Tủ áo", "m2", "", 2_600_000, ItemCategory::Industrial)]
    #[case("", "", "", 0, ItemCategory::Industrial)]
    fn test_classify_produced(
        #[case] name: &str,
        #[case] unit: &str,
        #[case] material: &str,
        #[case] unit_price: i64,
        #[case] expected: ItemCategory,
    ) {
        let rules = RuleSet::standard();
        let classifier = Classifier::new(&rules);

        assert_eq!(classifier.classify(&item(name, unit, material, unit_price)), expected);
    }

    #[test]
    fn test_blank_name_is_still_classified() {
        let rules = RuleSet::standard();
        let classifier = Classifier::new(&rules);

        // 名稱空白但單位為 cái：仍依規則歸入配件
        let unnamed = item("", "cái", "", 30_000);
        assert_eq!(classifier.classify(&unnamed), ItemCategory::Accessory);

        let blank = item("", "", "", 3_000_000);
        assert_eq!(classifier.classify(&blank), ItemCategory::Industrial);
    }

    #[test]
    fn test_outsourced_skips_rules() {
        let rules = RuleSet::standard();
        let classifier = Classifier::new(&rules);

        let hinge = item("Bản lề", "cái", "Inox", 45_000).with_source(ItemSource::Outsourced);
        assert_eq!(classifier.classify(&hinge), ItemCategory::Outsourced);

        let sofa = item("Sofa da", "cái", "Gỗ sồi", 9_500_000).with_source(ItemSource::Outsourced);
        assert_eq!(classifier.classify(&sofa), ItemCategory::Outsourced);
    }

    #[test]
    fn test_classify_all_keeps_order() {
        let rules = RuleSet::standard();
        let classifier = Classifier::new(&rules);

        let items = vec![
            item("Tủ áo", "m2", "MDF", 2_600_000),
            item("Bản lề", "cái", "Inox", 45_000),
            item("Tủ áo", "m2", "Gỗ Sồi", 6_000_000),
        ];
        let classified = classifier.classify_all(&items);

        let categories: Vec<_> = classified.iter().map(|c| c.category).collect();
        assert_eq!(
            categories,
            vec![
                ItemCategory::Industrial,
                ItemCategory::Accessory,
                ItemCategory::NaturalWood
            ]
        );
        assert_eq!(classified[1].item.id, items[1].id);
    }

    #[test]
    fn test_priced_out_accessory_and_finish() {
        let rules = RuleSet::standard();
        let classifier = Classifier::new(&rules);

        let items = vec![
            item("Tay nắm thiết kế", "cái", "Đồng", 2_500_000),
            item("Tủ bếp", "md", "Acrylic", 3_500_000),
            item("Tay nắm", "cái", "Đồng", 2_500_000).with_source(ItemSource::Outsourced),
        ];
        let classified = classifier.classify_all(&items);

        assert!(classifier.is_priced_out_accessory(&classified[0]));
        assert!(!classifier.requires_painted_finish(&classified[0]));
        assert!(!classifier.is_priced_out_accessory(&classified[1]));
        assert!(classifier.requires_painted_finish(&classified[1]));
        assert!(!classifier.is_priced_out_accessory(&classified[2]));
    }
}
