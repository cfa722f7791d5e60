//! 單價資料庫模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 單價資料庫項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeItem {
    pub id: Uuid,

    #[serde(rename = "itemName")]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub material: String,

    pub unit_price: Decimal,

    #[serde(default)]
    pub unit: String,
}

impl KnowledgeItem {
    /// 創建新的資料庫項目
    pub fn new(name: String, material: String, unit: String, unit_price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description: String::new(),
            material,
            unit_price,
            unit,
        }
    }

    /// 建構器模式：設置描述
    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    /// 系統預設單價資料庫
    pub fn system_defaults() -> Vec<KnowledgeItem> {
        #[rustfmt::skip]
        const DEFAULTS: &[(&str, &str, &str, &str, i64)] = &[
            ("Tủ áo (Cánh mở)", "Thùng MDF chống ẩm, cánh Melamine", "MDF An Cường", "m2", 2_600_000),
            ("Tủ áo (Cánh lùa)", "Thùng MDF chống ẩm, cánh lùa Melamine", "MDF An Cường", "m2", 2_800_000),
            ("Tủ áo (Cánh kính)", "Thùng MDF, Cánh kính khung nhôm nhập khẩu", "Kính cường lực", "m2", 4_200_000),
            ("Giường ngủ (Bọc nỉ)", "Giường bọc nỉ/da đầu giường, thang dát gỗ", "MDF + Nỉ/Da", "cái", 7_500_000),
            ("Giường ngủ (MDF)", "Giường gỗ công nghiệp, đầu giường melamine", "MDF An Cường", "cái", 5_500_000),
            ("Tab đầu giường", "Tab 2 ngăn kéo, ray bi", "MDF An Cường", "cái", 1_200_000),
            ("Bàn trang điểm", "Bàn treo hoặc chân gỗ, gương led", "MDF An Cường", "cái", 3_200_000),
            ("Bàn làm việc", "Bàn chân sắt hoặc gỗ, có hộc tủ", "MDF + Sắt", "md", 2_800_000),
            ("Kệ Tivi (Treo tường)", "Kệ treo tường đơn giản", "MDF An Cường", "md", 2_200_000),
            ("Vách ốp tường", "Vách ốp melamine phẳng", "MDF An Cường", "m2", 1_400_000),
            ("Vách nan gỗ", "Vách nan sóng trang trí", "Nhựa giả gỗ", "m2", 1_800_000),
            ("Tủ bếp trên", "Thùng MDF, cánh Melamine/Laminate", "MDF An Cường", "md", 2_800_000),
            ("Tủ bếp dưới", "Thùng MDF, cánh Melamine/Laminate", "MDF An Cường", "md", 3_200_000),
            ("Tủ bếp trên (Acrylic)", "Thùng MDF, cánh Acrylic bóng gương", "Acrylic An Cường", "md", 3_500_000),
            ("Tủ bếp dưới (Acrylic)", "Thùng MDF, cánh Acrylic bóng gương", "Acrylic An Cường", "md", 4_200_000),
            ("Đá bàn bếp", "Đá kim sa trung hoặc trắng vân mây", "Đá nhân tạo", "md", 1_600_000),
            ("Kính ốp bếp", "Kính cường lực sơn màu 8mm", "Kính cường lực", "md", 1_100_000),
            ("Sofa da (Văng)", "Sofa văng dài 2.2m-2.4m", "Da công nghiệp", "cái", 9_500_000),
            ("Bàn trà", "Bàn trà mặt đá, chân sắt sơn tĩnh điện", "Đá + Sắt", "cái", 3_500_000),
            ("Bàn ăn (6 ghế)", "Bàn mặt đá ceramic, 6 ghế bọc da", "Đá + Da", "bộ", 16_000_000),
            ("Tủ giày", "Tủ giày kịch trần, cánh mở", "MDF An Cường", "m2", 2_600_000),
            ("Vách kính tắm", "Vách kính cường lực 10mm, phụ kiện inox 304", "Kính + Inox", "m2", 1_800_000),
            ("Tủ Lavabo", "Tủ nhựa Picomat chịu nước", "Nhựa Picomat", "md", 3_800_000),
            ("Sàn gỗ", "Sàn gỗ công nghiệp Malaysia 12mm", "Gỗ CN", "m2", 550_000),
            ("Trần thạch cao", "Khung xương Vĩnh Tường, tấm Gyproc", "Thạch cao", "m2", 260_000),
            ("Rèm vải", "Rèm vải 2 lớp (Voan + Vải)", "Vải polyester", "md", 1_600_000),
            ("Đợt gỗ trang trí", "Đợt gỗ treo tường", "MDF An Cường", "cái", 450_000),
            ("Gương soi", "Gương dán tường hoặc treo", "Gương Bỉ", "m2", 1_500_000),
            ("Phụ kiện bản lề", "Bản lề giảm chấn inox 304", "Inox 304", "cái", 45_000),
            ("Phụ kiện ray ngăn kéo", "Ray bi 3 tầng giảm chấn", "Thép sơn tĩnh điện", "bộ", 150_000),
        ];

        DEFAULTS
            .iter()
            .map(|(name, description, material, unit, price)| {
                KnowledgeItem::new(
                    name.to_string(),
                    material.to_string(),
                    unit.to_string(),
                    Decimal::from(*price),
                )
                .with_description(description.to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_defaults() {
        let library = KnowledgeItem::system_defaults();

        assert_eq!(library.len(), 30);
        assert!(library.iter().all(|k| k.unit_price > Decimal::ZERO));

        let hinge = library.iter().find(|k| k.name == "Phụ kiện bản lề").unwrap();
        assert_eq!(hinge.unit_price, Decimal::from(45_000));
        assert_eq!(hinge.unit, "cái");
    }
}
