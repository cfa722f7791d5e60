//! # Fitout Core
//!
//! 報價估算核心資料模型與類型定義

pub mod arith;
pub mod calendar;
pub mod constants;
pub mod financials;
pub mod item;
pub mod knowledge;
pub mod project;
pub mod rules;
pub mod settings;

// Re-export 主要類型
pub use arith::{saturating_sum, Overflow};
pub use calendar::WorkCalendar;
pub use constants::{EstimationConstants, DEFAULT_COST_FALLBACK_RATIO};
pub use financials::ProjectFinancials;
pub use item::{ItemSource, LineItem};
pub use knowledge::KnowledgeItem;
pub use project::{Project, ProjectStage, Room, RoomType, StageStatus, DEFAULT_STAGE_NAMES};
pub use rules::{ClassificationRule, ItemCategory, ItemText, KeywordValue, Predicate, RuleSet};
pub use settings::{PartialProductionSettings, ProductionSettings};

/// 報價估算錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum FitoutError {
    #[error("無效的施工日曆: {0}")]
    InvalidCalendar(String),

    #[error("無效的分類規則: {0}")]
    InvalidRuleSet(String),

    #[error("單價資料庫為空")]
    EmptyKnowledgeBase,

    #[error("JSON 解析錯誤: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FitoutError>;
