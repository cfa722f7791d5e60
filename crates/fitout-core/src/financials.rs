//! 專案財務費用模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::saturating_sum;

/// 專案層級費用（不經估算，直接加總）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectFinancials {
    /// 運輸費
    pub transport_cost: Decimal,
    /// 安裝費（外包或獎金）
    pub installation_cost: Decimal,
    /// 設計費
    pub design_fee: Decimal,
    /// 丈量費
    pub survey_fee: Decimal,
    /// 介紹佣金
    pub commission: Decimal,
    /// 其他費用
    pub other_costs: Decimal,
}

impl ProjectFinancials {
    /// 各項費用合計（溢出時取極值）
    pub fn total(&self) -> Decimal {
        saturating_sum(self.amounts())
    }

    pub fn amounts(&self) -> [Decimal; 6] {
        [
            self.transport_cost,
            self.installation_cost,
            self.design_fee,
            self.survey_fee,
            self.commission,
            self.other_costs,
        ]
    }
}
