//! 施工工期估算
//!
//! 總工期 = 基本天數 + ceil(合約金額 / 每日產值) + 緩衝天數；合約金額 ≤ 0 時為 0。
//! 各階段天數 = max(1, round(總工期 × 階段權重))，總工期為 0 時各階段皆為 0。

use chrono::NaiveDate;
use fitout_core::{FitoutError, Project, ProjectStage, StageStatus, WorkCalendar};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 預設階段權重（對應預設九個施工階段）
const DEFAULT_STAGE_WEIGHTS: [Decimal; 9] = [
    Decimal::from_parts(5, 0, 0, false, 2),
    Decimal::from_parts(15, 0, 0, false, 2),
    Decimal::from_parts(5, 0, 0, false, 2),
    Decimal::from_parts(5, 0, 0, false, 2),
    Decimal::from_parts(10, 0, 0, false, 2),
    Decimal::from_parts(15, 0, 0, false, 2),
    Decimal::from_parts(20, 0, 0, false, 2),
    Decimal::from_parts(5, 0, 0, false, 2),
    Decimal::from_parts(20, 0, 0, false, 2),
];

fn to_days(value: Decimal) -> u32 {
    value.to_u32().unwrap_or(u32::MAX)
}

/// 單一階段排程
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagePlan {
    pub stage_id: Uuid,
    pub name: String,
    pub status: StageStatus,
    pub duration_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// 工期估算結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEstimate {
    pub total_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub stages: Vec<StagePlan>,
}

impl ScheduleEstimate {
    /// 第一個未完成的階段
    pub fn current_stage(&self) -> Option<&StagePlan> {
        self.stages
            .iter()
            .find(|s| s.status != StageStatus::Completed)
    }
}

/// 工期估算器
#[derive(Debug, Clone)]
pub struct ScheduleEstimator {
    /// 施工日曆（預設每天都算工作日）
    calendar: WorkCalendar,

    /// 基本天數（準備、丈量）
    base_days: u32,

    /// 每個生產日對應的合約金額
    value_per_day: Decimal,

    /// 緩衝天數
    buffer_days: u32,

    /// 階段權重；超出列表的階段使用 `fallback_weight`
    stage_weights: Vec<Decimal>,
    fallback_weight: Decimal,
}

impl Default for ScheduleEstimator {
    fn default() -> Self {
        Self {
            calendar: WorkCalendar::fallback_calendar(),
            base_days: 5,
            value_per_day: Decimal::from(15_000_000),
            buffer_days: 2,
            stage_weights: DEFAULT_STAGE_WEIGHTS.to_vec(),
            fallback_weight: Decimal::new(1, 1),
        }
    }
}

impl ScheduleEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置施工日曆
    pub fn with_calendar(mut self, calendar: WorkCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// 建構器模式：設置階段權重
    pub fn with_stage_weights(mut self, weights: Vec<Decimal>) -> Self {
        self.stage_weights = weights;
        self
    }

    /// 總工期（天）
    pub fn total_days(&self, contract_value: Decimal) -> u32 {
        if contract_value <= Decimal::ZERO {
            return 0;
        }
        let production_days = to_days((contract_value / self.value_per_day).ceil());
        self.base_days
            .saturating_add(production_days)
            .saturating_add(self.buffer_days)
    }

    /// 第 `index` 個階段的天數
    pub fn stage_days(&self, total_days: u32, index: usize) -> u32 {
        if total_days == 0 {
            return 0;
        }
        let weight = self
            .stage_weights
            .get(index)
            .copied()
            .unwrap_or(self.fallback_weight);
        let days = (Decimal::from(total_days) * weight)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        to_days(days).max(1)
    }

    /// 估算工期；階段依序排在起始日之後
    pub fn estimate(
        &self,
        contract_value: Decimal,
        stages: &[ProjectStage],
        start_date: NaiveDate,
    ) -> fitout_core::Result<ScheduleEstimate> {
        let advance = |from: NaiveDate, days: u32| {
            self.calendar.add_working_days(from, days).ok_or_else(|| {
                FitoutError::InvalidCalendar(format!(
                    "日曆 {} 無法從 {} 往後推算 {} 天",
                    self.calendar.calendar_id, from, days
                ))
            })
        };

        let total_days = self.total_days(contract_value);
        let end_date = advance(start_date, total_days)?;

        let mut cursor = start_date;
        let mut plans = Vec::with_capacity(stages.len());
        for (index, stage) in stages.iter().enumerate() {
            let duration_days = self.stage_days(total_days, index);
            let stage_end = advance(cursor, duration_days)?;
            plans.push(StagePlan {
                stage_id: stage.id,
                name: stage.name.clone(),
                status: stage.status,
                duration_days,
                start_date: cursor,
                end_date: stage_end,
            });
            cursor = stage_end;
        }

        tracing::debug!(
            "工期估算：合約金額 {}，總工期 {} 天，{} 至 {}",
            contract_value,
            total_days,
            start_date,
            end_date
        );

        Ok(ScheduleEstimate {
            total_days,
            start_date,
            end_date,
            stages: plans,
        })
    }

    /// 以專案報價總額與階段估算
    pub fn estimate_project(
        &self,
        project: &Project,
        start_date: NaiveDate,
    ) -> fitout_core::Result<ScheduleEstimate> {
        self.estimate(project.total_price(), &project.stages, start_date)
    }
}
