//! 生產定額配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 生產定額（估算依據）
///
/// 每個專案一份；專案未設定時使用系統全域設定。
/// 任何欄位缺漏或 ≤ 0 時，估算前以 [`ProductionSettings::resolved`] 逐欄補上系統預設值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSettings {
    // --- 工業板材 ---
    /// 板材單價（MDF 17mm 貼 Melamine）
    pub sheet_price: Decimal,

    /// 板材寬度（m）
    pub sheet_width: Decimal,

    /// 板材長度（m）
    pub sheet_height: Decimal,

    /// 裁切損耗係數（1.2 = 20%）
    pub waste_factor: Decimal,

    /// 封邊條單價（每延米，含膠）
    pub edge_banding_price_per_m: Decimal,

    /// 每張板材平均需封邊長度（延米）
    pub edge_per_sheet_ratio: Decimal,

    /// 展開係數（板材展開面積 / 成品面積）
    pub material_coefficient: Decimal,

    // --- 天然木料 ---
    /// 天然木料單價（每立方米）
    pub natural_wood_price_per_m3: Decimal,

    /// 天然木料損耗係數
    pub natural_wood_waste_factor: Decimal,

    // --- 人工與工廠 ---
    /// 工人日薪
    pub worker_daily_wage: Decimal,

    /// 每張板材生產工日（裁切、封邊、鑽孔）
    pub production_days_per_sheet: Decimal,

    /// 每張板材安裝工日
    pub installation_days_per_sheet: Decimal,

    /// 配件成本佔板材成本比例（%）
    pub accessory_ratio: Decimal,

    /// 耗材（膠、釘、螺絲）佔材料成本比例（%）
    pub consumable_ratio: Decimal,

    /// 每張板材分攤的工廠管理費（水電、折舊、租金）
    pub overhead_per_sheet: Decimal,

    /// 塗裝/特殊表面處理單價（每 m2）
    pub paint_cost_per_m2: Decimal,
}

impl Default for ProductionSettings {
    fn default() -> Self {
        Self {
            sheet_price: Decimal::from(850_000),
            sheet_width: Decimal::new(122, 2),
            sheet_height: Decimal::new(244, 2),
            waste_factor: Decimal::new(12, 1),
            edge_banding_price_per_m: Decimal::from(3_500),
            edge_per_sheet_ratio: Decimal::from(28),
            material_coefficient: Decimal::new(42, 1),
            natural_wood_price_per_m3: Decimal::from(18_000_000),
            natural_wood_waste_factor: Decimal::new(15, 1),
            worker_daily_wage: Decimal::from(750_000),
            production_days_per_sheet: Decimal::new(35, 2),
            installation_days_per_sheet: Decimal::new(25, 2),
            accessory_ratio: Decimal::from(15),
            consumable_ratio: Decimal::from(8),
            overhead_per_sheet: Decimal::from(150_000),
            paint_cost_per_m2: Decimal::from(350_000),
        }
    }
}

impl ProductionSettings {
    /// 建構器模式：設置板材單價
    pub fn with_sheet_price(mut self, price: Decimal) -> Self {
        self.sheet_price = price;
        self
    }

    /// 建構器模式：設置板材尺寸
    pub fn with_sheet_size(mut self, width: Decimal, height: Decimal) -> Self {
        self.sheet_width = width;
        self.sheet_height = height;
        self
    }

    /// 建構器模式：設置裁切損耗係數
    pub fn with_waste_factor(mut self, factor: Decimal) -> Self {
        self.waste_factor = factor;
        self
    }

    /// 建構器模式：設置展開係數
    pub fn with_material_coefficient(mut self, coefficient: Decimal) -> Self {
        self.material_coefficient = coefficient;
        self
    }

    /// 建構器模式：設置天然木料單價與損耗
    pub fn with_natural_wood(mut self, price_per_m3: Decimal, waste_factor: Decimal) -> Self {
        self.natural_wood_price_per_m3 = price_per_m3;
        self.natural_wood_waste_factor = waste_factor;
        self
    }

    /// 建構器模式：設置工人日薪
    pub fn with_worker_daily_wage(mut self, wage: Decimal) -> Self {
        self.worker_daily_wage = wage;
        self
    }

    /// 建構器模式：設置每張板材生產/安裝工日
    pub fn with_days_per_sheet(mut self, production: Decimal, installation: Decimal) -> Self {
        self.production_days_per_sheet = production;
        self.installation_days_per_sheet = installation;
        self
    }

    /// 建構器模式：設置封邊條單價與每張板材封邊長度
    pub fn with_edge_banding(mut self, price_per_m: Decimal, per_sheet: Decimal) -> Self {
        self.edge_banding_price_per_m = price_per_m;
        self.edge_per_sheet_ratio = per_sheet;
        self
    }

    /// 建構器模式：設置耗材比例（%）
    pub fn with_consumable_ratio(mut self, ratio: Decimal) -> Self {
        self.consumable_ratio = ratio;
        self
    }

    /// 建構器模式：設置工廠管理費
    pub fn with_overhead_per_sheet(mut self, overhead: Decimal) -> Self {
        self.overhead_per_sheet = overhead;
        self
    }

    /// 建構器模式：設置塗裝單價
    pub fn with_paint_cost_per_m2(mut self, cost: Decimal) -> Self {
        self.paint_cost_per_m2 = cost;
        self
    }

    /// 單張板材面積（m2）
    pub fn sheet_area(&self) -> Decimal {
        self.sheet_width.saturating_mul(self.sheet_height)
    }

    /// 補上缺漏欄位，返回可直接估算的設定及被替換為預設值的欄位名
    pub fn resolved(&self) -> (ProductionSettings, Vec<&'static str>) {
        PartialProductionSettings::from(self).resolve()
    }
}

/// 部分生產定額（來自專案或 JSON 設定，欄位可缺漏）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialProductionSettings {
    pub sheet_price: Option<Decimal>,
    pub sheet_width: Option<Decimal>,
    pub sheet_height: Option<Decimal>,
    pub waste_factor: Option<Decimal>,
    pub edge_banding_price_per_m: Option<Decimal>,
    pub edge_per_sheet_ratio: Option<Decimal>,
    pub material_coefficient: Option<Decimal>,
    pub natural_wood_price_per_m3: Option<Decimal>,
    pub natural_wood_waste_factor: Option<Decimal>,
    pub worker_daily_wage: Option<Decimal>,
    pub production_days_per_sheet: Option<Decimal>,
    pub installation_days_per_sheet: Option<Decimal>,
    pub accessory_ratio: Option<Decimal>,
    pub consumable_ratio: Option<Decimal>,
    pub overhead_per_sheet: Option<Decimal>,
    pub paint_cost_per_m2: Option<Decimal>,
}

/// 取有效值（> 0），否則回退預設值並記錄欄位名
fn pick(
    value: Option<Decimal>,
    default: Decimal,
    field: &'static str,
    defaulted: &mut Vec<&'static str>,
) -> Decimal {
    match value {
        Some(v) if v > Decimal::ZERO => v,
        _ => {
            defaulted.push(field);
            default
        }
    }
}

/// 上層值有效（> 0）時覆蓋下層
fn layer(top: Option<Decimal>, base: Option<Decimal>) -> Option<Decimal> {
    top.filter(|v| *v > Decimal::ZERO).or(base)
}

impl PartialProductionSettings {
    /// 從 JSON 載入
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 疊加在基礎設定之上（例如專案設定疊加在全域設定上）
    pub fn merge_over(&self, base: &PartialProductionSettings) -> PartialProductionSettings {
        PartialProductionSettings {
            sheet_price: layer(self.sheet_price, base.sheet_price),
            sheet_width: layer(self.sheet_width, base.sheet_width),
            sheet_height: layer(self.sheet_height, base.sheet_height),
            waste_factor: layer(self.waste_factor, base.waste_factor),
            edge_banding_price_per_m: layer(
                self.edge_banding_price_per_m,
                base.edge_banding_price_per_m,
            ),
            edge_per_sheet_ratio: layer(self.edge_per_sheet_ratio, base.edge_per_sheet_ratio),
            material_coefficient: layer(self.material_coefficient, base.material_coefficient),
            natural_wood_price_per_m3: layer(
                self.natural_wood_price_per_m3,
                base.natural_wood_price_per_m3,
            ),
            natural_wood_waste_factor: layer(
                self.natural_wood_waste_factor,
                base.natural_wood_waste_factor,
            ),
            worker_daily_wage: layer(self.worker_daily_wage, base.worker_daily_wage),
            production_days_per_sheet: layer(
                self.production_days_per_sheet,
                base.production_days_per_sheet,
            ),
            installation_days_per_sheet: layer(
                self.installation_days_per_sheet,
                base.installation_days_per_sheet,
            ),
            accessory_ratio: layer(self.accessory_ratio, base.accessory_ratio),
            consumable_ratio: layer(self.consumable_ratio, base.consumable_ratio),
            overhead_per_sheet: layer(self.overhead_per_sheet, base.overhead_per_sheet),
            paint_cost_per_m2: layer(self.paint_cost_per_m2, base.paint_cost_per_m2),
        }
    }

    /// 逐欄補上系統預設值
    pub fn resolve(&self) -> (ProductionSettings, Vec<&'static str>) {
        let d = ProductionSettings::default();
        let mut defaulted = Vec::new();
        let settings = ProductionSettings {
            sheet_price: pick(self.sheet_price, d.sheet_price, "sheetPrice", &mut defaulted),
            sheet_width: pick(self.sheet_width, d.sheet_width, "sheetWidth", &mut defaulted),
            sheet_height: pick(self.sheet_height, d.sheet_height, "sheetHeight", &mut defaulted),
            waste_factor: pick(self.waste_factor, d.waste_factor, "wasteFactor", &mut defaulted),
            edge_banding_price_per_m: pick(
                self.edge_banding_price_per_m,
                d.edge_banding_price_per_m,
                "edgeBandingPricePerM",
                &mut defaulted,
            ),
            edge_per_sheet_ratio: pick(
                self.edge_per_sheet_ratio,
                d.edge_per_sheet_ratio,
                "edgePerSheetRatio",
                &mut defaulted,
            ),
            material_coefficient: pick(
                self.material_coefficient,
                d.material_coefficient,
                "materialCoefficient",
                &mut defaulted,
            ),
            natural_wood_price_per_m3: pick(
                self.natural_wood_price_per_m3,
                d.natural_wood_price_per_m3,
                "naturalWoodPricePerM3",
                &mut defaulted,
            ),
            natural_wood_waste_factor: pick(
                self.natural_wood_waste_factor,
                d.natural_wood_waste_factor,
                "naturalWoodWasteFactor",
                &mut defaulted,
            ),
            worker_daily_wage: pick(
                self.worker_daily_wage,
                d.worker_daily_wage,
                "workerDailyWage",
                &mut defaulted,
            ),
            production_days_per_sheet: pick(
                self.production_days_per_sheet,
                d.production_days_per_sheet,
                "productionDaysPerSheet",
                &mut defaulted,
            ),
            installation_days_per_sheet: pick(
                self.installation_days_per_sheet,
                d.installation_days_per_sheet,
                "installationDaysPerSheet",
                &mut defaulted,
            ),
            accessory_ratio: pick(
                self.accessory_ratio,
                d.accessory_ratio,
                "accessoryRatio",
                &mut defaulted,
            ),
            consumable_ratio: pick(
                self.consumable_ratio,
                d.consumable_ratio,
                "consumableRatio",
                &mut defaulted,
            ),
            overhead_per_sheet: pick(
                self.overhead_per_sheet,
                d.overhead_per_sheet,
                "overheadPerSheet",
                &mut defaulted,
            ),
            paint_cost_per_m2: pick(
                self.paint_cost_per_m2,
                d.paint_cost_per_m2,
                "paintCostPerM2",
                &mut defaulted,
            ),
        };

        (settings, defaulted)
    }
}

impl From<&ProductionSettings> for PartialProductionSettings {
    fn from(s: &ProductionSettings) -> Self {
        Self {
            sheet_price: Some(s.sheet_price),
            sheet_width: Some(s.sheet_width),
            sheet_height: Some(s.sheet_height),
            waste_factor: Some(s.waste_factor),
            edge_banding_price_per_m: Some(s.edge_banding_price_per_m),
            edge_per_sheet_ratio: Some(s.edge_per_sheet_ratio),
            material_coefficient: Some(s.material_coefficient),
            natural_wood_price_per_m3: Some(s.natural_wood_price_per_m3),
            natural_wood_waste_factor: Some(s.natural_wood_waste_factor),
            worker_daily_wage: Some(s.worker_daily_wage),
            production_days_per_sheet: Some(s.production_days_per_sheet),
            installation_days_per_sheet: Some(s.installation_days_per_sheet),
            accessory_ratio: Some(s.accessory_ratio),
            consumable_ratio: Some(s.consumable_ratio),
            overhead_per_sheet: Some(s.overhead_per_sheet),
            paint_cost_per_m2: Some(s.paint_cost_per_m2),
        }
    }
}
