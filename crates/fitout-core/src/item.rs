//! 報價項目模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 項目來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSource {
    /// 自行生產（計算板材/人工）
    #[default]
    Produced,
    /// 外購成品（只計成本）
    Outsourced,
}

/// 報價項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// 項目ID
    pub id: Uuid,

    /// 項目名稱
    #[serde(rename = "itemName")]
    pub name: String,

    /// 技術/材料描述
    #[serde(default)]
    pub description: String,

    /// 主要材料名稱
    #[serde(rename = "material", default)]
    pub material_label: String,

    /// 單位（m2、md、cái、bộ...）
    #[serde(default)]
    pub unit: String,

    /// 數量
    pub quantity: Decimal,

    /// 銷售單價
    pub unit_price: Decimal,

    /// 銷售總價（= 數量 × 單價，由呼叫端維護）
    pub total_price: Decimal,

    /// 已知成本單價（未設定或 ≤ 0 時使用估算比例）
    #[serde(default)]
    pub cost_price: Option<Decimal>,

    /// 來源
    #[serde(default)]
    pub source: ItemSource,

    /// 備註
    #[serde(default)]
    pub note: Option<String>,
}

impl LineItem {
    /// 創建新的報價項目（總價依數量 × 單價計算）
    pub fn new(name: String, unit: String, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description: String::new(),
            material_label: String::new(),
            unit,
            quantity,
            unit_price,
            total_price: quantity.saturating_mul(unit_price),
            cost_price: None,
            source: ItemSource::Produced,
            note: None,
        }
    }

    /// 建構器模式：設置材料
    pub fn with_material(mut self, material: String) -> Self {
        self.material_label = material;
        self
    }

    /// 建構器模式：設置描述
    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    /// 建構器模式：設置成本單價
    pub fn with_cost_price(mut self, cost_price: Decimal) -> Self {
        self.cost_price = Some(cost_price);
        self
    }

    /// 建構器模式：設置來源
    pub fn with_source(mut self, source: ItemSource) -> Self {
        self.source = source;
        self
    }

    /// 建構器模式：設置備註
    pub fn with_note(mut self, note: String) -> Self {
        self.note = Some(note);
        self
    }

    /// 檢查是否為外購項目
    pub fn is_outsourced(&self) -> bool {
        self.source == ItemSource::Outsourced
    }

    /// 有效的成本單價（大於 0 才視為已設定）
    pub fn known_cost_price(&self) -> Option<Decimal> {
        self.cost_price.filter(|c| *c > Decimal::ZERO)
    }

    /// 成本單價：已知成本優先，否則以銷售單價 × 比例估算
    ///
    /// 所有需要項目成本的地方（配件、外購、利潤報表）都必須經過這裡，
    /// 確保同一項目在各報表中的成本一致。
    pub fn effective_unit_cost(&self, fallback_ratio: Decimal) -> Decimal {
        self.known_cost_price()
            .unwrap_or_else(|| self.unit_price.saturating_mul(fallback_ratio))
    }

    /// 項目總成本 = 成本單價 × 數量
    ///
    /// 未知成本時為 單價 × 比例 × 數量，在 `total_price = quantity × unit_price`
    /// 成立時等於 總價 × 比例。溢出時取極值。
    pub fn effective_total_cost(&self, fallback_ratio: Decimal) -> Decimal {
        self.effective_unit_cost(fallback_ratio).saturating_mul(self.quantity)
    }

    /// 修改數量並重算總價
    pub fn set_quantity(&mut self, quantity: Decimal) {
        self.quantity = quantity;
        self.total_price = quantity.saturating_mul(self.unit_price);
    }

    /// 修改單價並重算總價；成本未設定時以比例補上
    pub fn set_unit_price(&mut self, unit_price: Decimal, fallback_ratio: Decimal) {
        self.unit_price = unit_price;
        self.total_price = self.quantity.saturating_mul(unit_price);
        if self.known_cost_price().is_none() {
            self.cost_price = Some(unit_price.saturating_mul(fallback_ratio));
        }
    }

    /// 修改總價；數量不為 0 且結果可表示時反推單價
    pub fn set_total_price(&mut self, total_price: Decimal) {
        self.total_price = total_price;
        if let Some(unit_price) = total_price.checked_div(self.quantity) {
            self.unit_price = unit_price;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio() -> Decimal {
        Decimal::new(7, 1)
    }

    #[test]
    fn test_create_line_item() {
        let item = LineItem::new(
            "Tủ áo".to_string(),
            "m2".to_string(),
            Decimal::from(10),
            Decimal::from(2_600_000),
        );

        assert_eq!(item.total_price, Decimal::from(26_000_000));
        assert_eq!(item.source, ItemSource::Produced);
        assert!(item.cost_price.is_none());
        assert!(!item.is_outsourced());
    }

    #[test]
    fn test_line_item_builder() {
        let item = LineItem::new(
            "Sofa da".to_string(),
            "cái".to_string(),
            Decimal::from(1),
            Decimal::from(9_500_000),
        )
        .with_material("Da công nghiệp".to_string())
        .with_cost_price(Decimal::from(6_000_000))
        .with_source(ItemSource::Outsourced)
        .with_note("Giao sau".to_string());

        assert_eq!(item.material_label, "Da công nghiệp");
        assert_eq!(item.cost_price, Some(Decimal::from(6_000_000)));
        assert!(item.is_outsourced());
        assert_eq!(item.note.as_deref(), Some("Giao sau"));
    }

    #[test]
    fn test_effective_cost_fallback() {
        let item = LineItem::new(
            "Bản lề".to_string(),
            "cái".to_string(),
            Decimal::from(50),
            Decimal::from(45_000),
        );

        // 未設定成本：45,000 × 0.7 = 31,500
        assert_eq!(item.effective_unit_cost(ratio()), Decimal::from(31_500));
        assert_eq!(item.effective_total_cost(ratio()), Decimal::from(1_575_000));

        // 成本為 0 視同未設定
        let zero_cost = item.clone().with_cost_price(Decimal::ZERO);
        assert_eq!(zero_cost.effective_unit_cost(ratio()), Decimal::from(31_500));

        let known = item.with_cost_price(Decimal::from(20_000));
        assert_eq!(known.effective_total_cost(ratio()), Decimal::from(1_000_000));
    }

    #[test]
    fn test_edit_keeps_total_price() {
        let mut item = LineItem::new(
            "Kệ tivi".to_string(),
            "md".to_string(),
            Decimal::from(2),
            Decimal::from(2_200_000),
        );

        item.set_quantity(Decimal::from(3));
        assert_eq!(item.total_price, Decimal::from(6_600_000));

        item.set_unit_price(Decimal::from(2_000_000), ratio());
        assert_eq!(item.total_price, Decimal::from(6_000_000));
        assert_eq!(item.cost_price, Some(Decimal::from(1_400_000)));

        // 已有成本時不覆寫
        item.set_unit_price(Decimal::from(2_500_000), ratio());
        assert_eq!(item.cost_price, Some(Decimal::from(1_400_000)));

        item.set_total_price(Decimal::from(9_000_000));
        assert_eq!(item.unit_price, Decimal::from(3_000_000));
    }

    #[test]
    fn test_set_total_price_with_zero_quantity() {
        let mut item = LineItem::new(
            "Rèm vải".to_string(),
            "md".to_string(),
            Decimal::ZERO,
            Decimal::from(1_600_000),
        );

        item.set_total_price(Decimal::from(500_000));
        assert_eq!(item.total_price, Decimal::from(500_000));
        assert_eq!(item.unit_price, Decimal::from(1_600_000));
    }

    #[test]
    fn test_deserialize_application_json() {
        let json = r#"{
            "id": "4f6c2d43-5b0e-4a56-9d8e-0c9d1f1a2b3c",
            "itemName": "Tủ bếp dưới",
            "material": "MDF An Cường",
            "unit": "md",
            "quantity": 4,
            "unitPrice": 3200000,
            "totalPrice": 12800000,
            "source": "outsourced"
        }"#;

        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.name, "Tủ bếp dưới");
        assert_eq!(item.material_label, "MDF An Cường");
        assert_eq!(item.description, "");
        assert_eq!(item.quantity, Decimal::from(4));
        assert!(item.is_outsourced());
        assert!(item.cost_price.is_none());
    }

    #[test]
    fn test_fallback_cost_follows_unit_price() {
        // 匯入的總價與 數量 × 單價 不一致
        let json = r#"{
            "id": "0b6f3a52-7c1d-4e8f-a2b4-5d6e7f8a9b0c",
            "itemName": "Tủ bếp dưới",
            "unit": "md",
            "quantity": 4,
            "unitPrice": 3200000,
            "totalPrice": 12000000
        }"#;
        let item: LineItem = serde_json::from_str(json).unwrap();

        // 3,200,000 × 0.7 × 4，而非 12,000,000 × 0.7
        assert_eq!(item.effective_total_cost(ratio()), Decimal::from(8_960_000));

        let mut consistent = item.clone();
        consistent.set_quantity(Decimal::from(4));
        assert_eq!(
            consistent.effective_total_cost(ratio()),
            consistent.total_price * ratio()
        );
    }

    #[test]
    fn test_huge_values_saturate() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(25), 0);
        let mut item = LineItem::new(
            "Tủ áo".to_string(),
            "m2".to_string(),
            huge,
            Decimal::from(2_600_000),
        );

        assert_eq!(item.total_price, Decimal::MAX);
        assert_eq!(item.effective_total_cost(ratio()), Decimal::MAX);

        // 反推單價溢出時保留原單價
        item.quantity = Decimal::new(1, 28);
        item.set_total_price(Decimal::MAX);
        assert_eq!(item.unit_price, Decimal::from(2_600_000));
    }
}
