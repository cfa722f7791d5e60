//! # Fitout Calculation Engine
//!
//! 資源與成本估算引擎：分類 → 材料用量 → 成本彙總 → 人工 → 損益

pub mod calculator;
pub mod classifier;
pub mod costing;
pub mod labor;
pub mod margin;
pub mod pnl;
pub mod pricing;
pub mod quantity;
pub mod schedule;

use std::collections::BTreeMap;

use fitout_core::{saturating_sum, ItemCategory, ProductionSettings};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Re-export 主要類型
pub use calculator::{
    compute_portfolio, compute_project_report, compute_resource_report, ProjectReport,
    ResourceCalculator,
};
pub use classifier::{ClassifiedItem, Classifier};
pub use costing::CostBuckets;
pub use labor::LaborEstimate;
pub use margin::{ItemMargin, QuotationMargin, RoomMargin, HEALTHY_MARGIN_PERCENT};
pub use pnl::ProfitAndLoss;
pub use pricing::{PriceLibrary, PricingMode, PricingOutcome};
pub use quantity::{
    AccessoryLine, AreaBasis, AreaEstimate, IndustrialMaterialStat, MaterialLedger,
    MaterialUsage, NaturalMaterialStat, QuantityEstimator,
};
pub use schedule::{ScheduleEstimate, ScheduleEstimator, StagePlan};

/// 成本明細報告（每次計算重新產生）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdownReport {
    /// 使用的分類規則版本
    pub rule_set_version: u32,

    /// 實際使用的生產定額（已補預設值）
    pub settings: ProductionSettings,

    /// 工業板材（依材料名稱）
    pub industrial_materials: BTreeMap<String, IndustrialMaterialStat>,

    /// 天然木料（依材料名稱）
    pub natural_materials: BTreeMap<String, NaturalMaterialStat>,

    /// 配件明細
    pub accessories: Vec<AccessoryLine>,

    /// 工業板材總張數（未取整）
    pub total_industrial_sheets: Decimal,

    /// 天然木料總面積
    pub total_natural_area: Decimal,

    /// 各項成本
    pub costs: CostBuckets,

    /// 人工與廠務費
    pub labor: LaborEstimate,

    /// 損益
    pub profit_and_loss: ProfitAndLoss,

    /// 各分類項目數
    pub category_counts: BTreeMap<ItemCategory, usize>,

    /// 估算警告
    pub warnings: Vec<EstimationWarning>,
}

impl CostBreakdownReport {
    /// 需訂購的板材張數（各材料分別向上取整後加總）
    pub fn sheets_to_order(&self) -> Decimal {
        saturating_sum(
            self.industrial_materials
                .values()
                .map(IndustrialMaterialStat::sheets_to_order),
        )
    }

    /// 是否有任何警告等級的訊息
    pub fn has_warnings(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.severity == WarningSeverity::Warning)
    }
}

/// 估算警告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationWarning {
    /// 相關對象（設定欄位或項目名稱）
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl EstimationWarning {
    pub fn new(subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject,
            message,
            severity,
        }
    }

    pub fn info(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Info)
    }

    pub fn warning(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Info,
    Warning,
}
