//! # Fitout
//!
//! 室內裝修報價的資源與成本估算
//!
//! - [`fitout_core`]：報價項目、生產定額、分類規則、專案等資料模型
//! - [`fitout_calc`]：分類 → 材料用量 → 成本彙總 → 人工 → 損益的估算引擎

pub use fitout_calc;
pub use fitout_core;

pub use rust_decimal::Decimal;

/// 常用類型
pub mod prelude {
    pub use fitout_calc::{
        compute_portfolio, compute_project_report, compute_resource_report, CostBreakdownReport,
        EstimationWarning, PriceLibrary, PricingMode, ProjectReport, QuotationMargin,
        ResourceCalculator, ScheduleEstimator, WarningSeverity, HEALTHY_MARGIN_PERCENT,
    };
    pub use fitout_core::{
        EstimationConstants, FitoutError, ItemCategory, ItemSource, KnowledgeItem, LineItem,
        PartialProductionSettings, ProductionSettings, Project, ProjectFinancials, Room, RoomType,
        RuleSet, WorkCalendar, DEFAULT_COST_FALLBACK_RATIO,
    };
    pub use rust_decimal::Decimal;
}
