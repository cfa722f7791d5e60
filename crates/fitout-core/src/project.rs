//! 專案、房間與施工階段模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    saturating_sum, LineItem, PartialProductionSettings, ProductionSettings, ProjectFinancials,
};

/// 預設施工階段
pub const DEFAULT_STAGE_NAMES: [&str; 9] = [
    "Khảo sát đo đạc",
    "Lên bản vẽ sản xuất",
    "Thống nhất lại",
    "Làm file CNC",
    "Chuyển xuống xưởng cắt CNC",
    "Dán cạnh",
    "Sơn bả",
    "Bọc hàng",
    "Lắp đặt",
];

/// 房間類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    #[serde(rename = "Phòng Khách")]
    LivingRoom,
    #[serde(rename = "Phòng Bếp")]
    Kitchen,
    #[serde(rename = "Phòng Ngủ Master")]
    MasterBedroom,
    #[serde(rename = "Phòng Ngủ Con")]
    KidBedroom,
    #[serde(rename = "Phòng Tắm")]
    Bathroom,
    #[serde(rename = "Phòng Làm Việc")]
    Office,
    #[serde(rename = "Khác")]
    Other,
}

/// 房間
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Room {
    /// 創建新的房間
    pub fn new(name: String, room_type: RoomType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            room_type,
            items: Vec::new(),
        }
    }

    /// 建構器模式：設置報價項目
    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = items;
        self
    }

    /// 添加報價項目
    pub fn add_item(&mut self, item: LineItem) {
        self.items.push(item);
    }

    /// 房間報價合計
    pub fn total_price(&self) -> Decimal {
        saturating_sum(self.items.iter().map(|i| i.total_price))
    }
}

/// 階段狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl StageStatus {
    /// 下一個狀態（完成後回到待辦）
    pub fn next(self) -> Self {
        match self {
            StageStatus::Pending => StageStatus::InProgress,
            StageStatus::InProgress => StageStatus::Completed,
            StageStatus::Completed => StageStatus::Pending,
        }
    }
}

/// 施工階段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStage {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub status: StageStatus,
}

impl ProjectStage {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            status: StageStatus::Pending,
        }
    }

    /// 預設階段列表
    pub fn defaults() -> Vec<ProjectStage> {
        DEFAULT_STAGE_NAMES
            .iter()
            .map(|name| ProjectStage::new(name.to_string()))
            .collect()
    }
}

/// 專案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub stages: Vec<ProjectStage>,
    /// 專案自訂生產定額（未設定時使用全域設定）
    #[serde(default)]
    pub production_settings: Option<PartialProductionSettings>,
    #[serde(default)]
    pub financials: Option<ProjectFinancials>,
}

impl Project {
    /// 創建新的專案（含預設施工階段）
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description: None,
            rooms: Vec::new(),
            stages: ProjectStage::defaults(),
            production_settings: None,
            financials: None,
        }
    }

    /// 建構器模式：添加房間
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// 建構器模式：設置專案生產定額
    pub fn with_production_settings(mut self, settings: PartialProductionSettings) -> Self {
        self.production_settings = Some(settings);
        self
    }

    /// 建構器模式：設置專案費用
    pub fn with_financials(mut self, financials: ProjectFinancials) -> Self {
        self.financials = Some(financials);
        self
    }

    /// 所有房間的報價項目（攤平）
    pub fn all_items(&self) -> Vec<LineItem> {
        self.rooms
            .iter()
            .flat_map(|r| r.items.iter().cloned())
            .collect()
    }

    /// 專案報價合計
    pub fn total_price(&self) -> Decimal {
        saturating_sum(self.rooms.iter().map(Room::total_price))
    }

    /// 專案費用（未設定時全部為 0）
    pub fn financials_or_default(&self) -> ProjectFinancials {
        self.financials.clone().unwrap_or_default()
    }

    /// 專案設定疊加在全域設定上（尚未補系統預設值）
    pub fn layered_settings(&self, global: &ProductionSettings) -> PartialProductionSettings {
        let global = PartialProductionSettings::from(global);
        match &self.production_settings {
            Some(own) => own.merge_over(&global),
            None => global,
        }
    }

    /// 有效生產定額：專案設定 → 全域設定 → 系統預設
    pub fn effective_settings(
        &self,
        global: &ProductionSettings,
    ) -> (ProductionSettings, Vec<&'static str>) {
        self.layered_settings(global).resolve()
    }

    /// 推進階段狀態，找不到階段時返回 None
    pub fn advance_stage(&mut self, stage_id: Uuid) -> Option<StageStatus> {
        let stage = self.stages.iter_mut().find(|s| s.id == stage_id)?;
        stage.status = stage.status.next();
        Some(stage.status)
    }

    /// 已完成階段比例（0-100）
    pub fn progress_percent(&self) -> Decimal {
        if self.stages.is_empty() {
            return Decimal::ZERO;
        }
        let completed = self
            .stages
            .iter()
            .filter(|s| s.status == StageStatus::Completed)
            .count();
        Decimal::from(completed as u64) * Decimal::ONE_HUNDRED
            / Decimal::from(self.stages.len() as u64)
    }
}
