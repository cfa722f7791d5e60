//! 損益彙總

use fitout_core::{saturating_sum, LineItem, Overflow, ProjectFinancials};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CostBuckets, LaborEstimate};

/// 損益
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitAndLoss {
    /// 直接生產成本（材料 + 人工 + 廠務費 + 外購）
    pub direct_production_cost: Decimal,
    /// 專案費用（運輸、安裝、設計、勘測、佣金、其他）
    pub project_overhead: Decimal,
    pub total_cost: Decimal,
    pub total_revenue: Decimal,
    pub net_profit: Decimal,
    /// 利潤率（%），營收為 0 時為 0
    pub profit_margin: Decimal,
}

impl ProfitAndLoss {
    pub fn summarize(
        costs: &CostBuckets,
        labor: &LaborEstimate,
        financials: &ProjectFinancials,
        total_revenue: Decimal,
        overflow: &mut Overflow,
    ) -> Self {
        let material_total = overflow.sum(costs.amounts());
        let labor_total = overflow.add(labor.labor_cost, labor.overhead_cost);
        let direct_production_cost = overflow.add(material_total, labor_total);
        let project_overhead = overflow.sum(financials.amounts());
        let total_cost = overflow.add(direct_production_cost, project_overhead);
        let net_profit = overflow.sub(total_revenue, total_cost);

        Self {
            direct_production_cost,
            project_overhead,
            total_cost,
            total_revenue,
            net_profit,
            profit_margin: margin_percent(net_profit, total_revenue),
        }
    }
}

/// 營收 = 所有項目總價（不分來源與分類）
pub fn total_revenue(items: &[LineItem]) -> Decimal {
    saturating_sum(items.iter().map(|i| i.total_price))
}

/// 利潤率（%）；營收為 0 時返回 0，超出範圍時取極值
pub fn margin_percent(profit: Decimal, revenue: Decimal) -> Decimal {
    let mut overflow = Overflow::new();
    let ratio = overflow.div(profit, revenue);
    overflow.mul(ratio, Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitout_core::ItemSource;

    #[test]
    fn test_margin_zero_revenue() {
        assert_eq!(margin_percent(Decimal::from(-500_000), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(
            margin_percent(Decimal::from(250), Decimal::from(1_000)),
            Decimal::from(25)
        );
    }

    #[test]
    fn test_revenue_ignores_source() {
        let items = vec![
            LineItem::new(
                "Tủ áo".to_string(),
                "m2".to_string(),
                Decimal::from(10),
                Decimal::from(2_600_000),
            ),
            LineItem::new(
                "Sofa".to_string(),
                "cái".to_string(),
                Decimal::ONE,
                Decimal::from(9_500_000),
            )
            .with_source(ItemSource::Outsourced),
        ];

        assert_eq!(total_revenue(&items), Decimal::from(35_500_000));
    }

    #[test]
    fn test_only_project_overhead() {
        let financials = ProjectFinancials {
            transport_cost: Decimal::from(2_000_000),
            design_fee: Decimal::from(3_000_000),
            ..Default::default()
        };

        let pnl = ProfitAndLoss::summarize(
            &CostBuckets::default(),
            &LaborEstimate::default(),
            &financials,
            Decimal::ZERO,
            &mut Overflow::new(),
        );

        assert_eq!(pnl.direct_production_cost, Decimal::ZERO);
        assert_eq!(pnl.project_overhead, Decimal::from(5_000_000));
        assert_eq!(pnl.net_profit, Decimal::from(-5_000_000));
        assert_eq!(pnl.profit_margin, Decimal::ZERO);
    }

    #[test]
    fn test_summarize() {
        let costs = CostBuckets {
            industrial: Decimal::from(10_000_000),
            accessories: Decimal::from(1_000_000),
            ..Default::default()
        };
        let labor = LaborEstimate {
            labor_cost: Decimal::from(3_000_000),
            overhead_cost: Decimal::from(1_000_000),
            ..Default::default()
        };

        let pnl = ProfitAndLoss::summarize(
            &costs,
            &labor,
            &ProjectFinancials::default(),
            Decimal::from(20_000_000),
            &mut Overflow::new(),
        );

        assert_eq!(pnl.direct_production_cost, Decimal::from(15_000_000));
        assert_eq!(pnl.total_cost, Decimal::from(15_000_000));
        assert_eq!(pnl.net_profit, Decimal::from(5_000_000));
        assert_eq!(pnl.profit_margin, Decimal::from(25));
    }

    #[test]
    fn test_margin_on_tiny_revenue_saturates() {
        assert_eq!(margin_percent(Decimal::MAX, Decimal::new(1, 28)), Decimal::MAX);
        assert_eq!(margin_percent(Decimal::MIN, Decimal::new(1, 28)), Decimal::MIN);
    }

    #[test]
    fn test_saturated_cost_gives_minimum_profit() {
        let costs = CostBuckets {
            industrial: Decimal::MAX,
            ..Default::default()
        };
        let labor = LaborEstimate {
            labor_cost: Decimal::from(3_000_000),
            ..Default::default()
        };

        let mut overflow = Overflow::new();
        let pnl = ProfitAndLoss::summarize(
            &costs,
            &labor,
            &ProjectFinancials::default(),
            Decimal::from(20_000_000),
            &mut overflow,
        );

        assert!(overflow.occurred());
        assert_eq!(pnl.total_cost, Decimal::MAX);
        assert_eq!(pnl.net_profit, Decimal::from(20_000_000) - Decimal::MAX);
        assert!(pnl.profit_margin < Decimal::ZERO);
    }
}
