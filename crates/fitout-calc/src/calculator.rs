//! 資源估算主計算器

use std::collections::BTreeMap;

use fitout_core::{
    EstimationConstants, ItemCategory, LineItem, PartialProductionSettings, ProductionSettings,
    Project, ProjectFinancials, RuleSet,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    pnl, Classifier, CostBreakdownReport, CostBuckets, EstimationWarning, LaborEstimate,
    ProfitAndLoss, QuantityEstimator, QuotationMargin,
};

/// 資源估算計算器
///
/// 純計算：不做 I/O、不保留狀態，相同輸入必得相同報告。
pub struct ResourceCalculator {
    /// 生產定額（可缺漏，計算時逐欄補預設值）
    settings: PartialProductionSettings,

    /// 估算常數
    constants: EstimationConstants,

    /// 分類規則
    rules: RuleSet,
}

impl ResourceCalculator {
    /// 創建新的計算器
    pub fn new(settings: ProductionSettings) -> Self {
        Self::from_partial(PartialProductionSettings::from(&settings))
    }

    /// 從部分設定創建（例如 JSON 載入或專案疊加後的設定）
    pub fn from_partial(settings: PartialProductionSettings) -> Self {
        Self {
            settings,
            constants: EstimationConstants::default(),
            rules: RuleSet::standard(),
        }
    }

    /// 專案設定疊加在全域設定上
    pub fn for_project(project: &Project, global: &ProductionSettings) -> Self {
        Self::from_partial(project.layered_settings(global))
    }

    /// 建構器模式：設置估算常數
    pub fn with_constants(mut self, constants: EstimationConstants) -> Self {
        self.constants = constants;
        self
    }

    /// 建構器模式：設置分類規則
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn constants(&self) -> &EstimationConstants {
        &self.constants
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// 主估算入口
    pub fn calculate(
        &self,
        items: &[LineItem],
        financials: &ProjectFinancials,
    ) -> CostBreakdownReport {
        tracing::info!(
            "開始資源估算：項目 {} 筆，規則版本 {}",
            items.len(),
            self.rules.version
        );

        let mut warnings = Vec::new();

        // Step 1: 補齊生產定額
        let (settings, defaulted) = self.settings.resolve();
        if !defaulted.is_empty() {
            tracing::debug!("使用系統預設值的欄位: {:?}", defaulted);
        }
        for field in defaulted {
            warnings.push(EstimationWarning::info(
                field.to_string(),
                "未設定或不大於 0，使用系統預設值".to_string(),
            ));
        }

        // Step 2: 分類
        tracing::debug!("Step 2: 項目分類");
        let classifier = Classifier::new(&self.rules);
        let classified = classifier.classify_all(items);

        let mut category_counts: BTreeMap<ItemCategory, usize> = BTreeMap::new();
        for entry in &classified {
            *category_counts.entry(entry.category).or_insert(0) += 1;

            if entry.category != ItemCategory::Outsourced && entry.item.name.trim().is_empty() {
                warnings.push(EstimationWarning::info(
                    entry.item.id.to_string(),
                    format!("項目名稱空白，依單位/材料歸入 {:?}", entry.category),
                ));
            }
            if classifier.is_priced_out_accessory(entry) {
                warnings.push(EstimationWarning::warning(
                    entry.item.name.clone(),
                    format!(
                        "五金類項目單價 {} 超過配件上限，改以工業板材估算",
                        entry.item.unit_price
                    ),
                ));
            }
        }
        tracing::debug!("分類結果: {:?}", category_counts);

        // Step 3: 材料用量
        tracing::debug!("Step 3: 材料用量估算");
        let estimator = QuantityEstimator::new(&settings, &self.constants, &self.rules);
        let ledger = estimator.accumulate(&classified);
        tracing::debug!(
            "工業板材 {} 張，天然木料 {} m2",
            ledger.total_industrial_sheets,
            ledger.total_natural_area()
        );

        for entry in classified
            .iter()
            .filter(|e| ledger.overflowed_items.contains(&e.item.id))
        {
            tracing::warn!("項目 {} 的用量或成本超出可表示範圍", entry.item.id);
            warnings.push(EstimationWarning::warning(
                entry.item.name.clone(),
                format!(
                    "數量 {} 或單價 {} 過大，用量或成本已取上限值",
                    entry.item.quantity, entry.item.unit_price
                ),
            ));
        }

        // Step 4: 成本彙總
        let mut overflow = ledger.overflow;
        let costs = CostBuckets::aggregate(&ledger, &settings, &mut overflow);

        // Step 5: 人工與廠務費
        let labor = LaborEstimate::estimate(&ledger, &settings, &self.constants, &mut overflow);
        tracing::debug!("總工日: {}", labor.total_man_days);

        // Step 6: 損益
        let profit_and_loss = ProfitAndLoss::summarize(
            &costs,
            &labor,
            financials,
            pnl::total_revenue(items),
            &mut overflow,
        );
        if overflow.occurred() {
            warnings.push(EstimationWarning::warning(
                "total".to_string(),
                "合計超出可表示範圍，成本與損益已取上限值".to_string(),
            ));
        }

        let total_natural_area = ledger.total_natural_area();
        let report = CostBreakdownReport {
            rule_set_version: self.rules.version,
            settings,
            industrial_materials: ledger.industrial,
            natural_materials: ledger.natural,
            accessories: ledger.accessories,
            total_industrial_sheets: ledger.total_industrial_sheets,
            total_natural_area,
            costs,
            labor,
            profit_and_loss,
            category_counts,
            warnings,
        };

        tracing::info!(
            "資源估算完成：總成本 {}，淨利 {}，利潤率 {}%",
            report.profit_and_loss.total_cost,
            report.profit_and_loss.net_profit,
            report.profit_and_loss.profit_margin.round_dp(2)
        );

        report
    }
}

/// 以預設常數與標準規則計算成本明細
pub fn compute_resource_report(
    items: &[LineItem],
    settings: &ProductionSettings,
    financials: &ProjectFinancials,
) -> CostBreakdownReport {
    ResourceCalculator::new(settings.clone()).calculate(items, financials)
}

/// 專案報告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub project_id: Uuid,
    pub project_name: String,
    pub breakdown: CostBreakdownReport,
    pub margin: QuotationMargin,
}

/// 計算單一專案（專案設定 → 全域設定 → 系統預設）
pub fn compute_project_report(project: &Project, global: &ProductionSettings) -> ProjectReport {
    let calculator = ResourceCalculator::for_project(project, global);
    let breakdown = calculator.calculate(&project.all_items(), &project.financials_or_default());
    let margin = QuotationMargin::for_project(project, calculator.constants().cost_fallback_ratio);

    ProjectReport {
        project_id: project.id,
        project_name: project.name.clone(),
        breakdown,
        margin,
    }
}

/// 平行計算多個專案，結果順序與輸入一致
pub fn compute_portfolio(projects: &[Project], global: &ProductionSettings) -> Vec<ProjectReport> {
    tracing::info!("批次估算 {} 個專案", projects.len());

    projects
        .par_iter()
        .map(|project| compute_project_report(project, global))
        .collect()
}
