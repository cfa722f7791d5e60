//! 工廠日曆模型

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// 工廠/施工日曆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendar {
    /// 工作日（索引 0 = 週一, ..., 6 = 週日，true 表示工作日）
    pub working_days: [bool; 7],

    /// 休假日列表（已排序、不重複）
    #[serde(deserialize_with = "sorted_holidays")]
    holidays: Vec<NaiveDate>,

    /// 日曆ID
    pub calendar_id: String,
}

impl WorkCalendar {
    /// 創建新的日曆（預設週一到週六為工作日）
    pub fn new(calendar_id: String) -> Self {
        Self {
            working_days: [true, true, true, true, true, true, false],
            holidays: Vec::new(),
            calendar_id,
        }
    }

    /// 創建 24/7 日曆（每天都是工作日，等同按日曆天計算）
    pub fn new_24_7(calendar_id: String) -> Self {
        Self {
            working_days: [true; 7],
            holidays: Vec::new(),
            calendar_id,
        }
    }

    /// 降級日曆（未提供工廠排班時使用）
    pub fn fallback_calendar() -> Self {
        Self::new_24_7("FALLBACK-24/7".to_string())
    }

    /// 建構器模式：設置工作日
    pub fn with_working_days(mut self, working_days: [bool; 7]) -> Self {
        self.working_days = working_days;
        self
    }

    /// 建構器模式：設置休假日
    pub fn with_holidays(mut self, mut holidays: Vec<NaiveDate>) -> Self {
        holidays.sort();
        holidays.dedup();
        self.holidays = holidays;
        self
    }

    pub fn holidays(&self) -> &[NaiveDate] {
        &self.holidays
    }

    /// 添加休假日
    pub fn add_holiday(&mut self, date: NaiveDate) {
        if let Err(pos) = self.holidays.binary_search(&date) {
            self.holidays.insert(pos, date);
        }
    }

    /// 檢查是否為工作日
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        if self.holidays.binary_search(&date).is_ok() {
            return false;
        }
        let weekday_index = date.weekday().num_days_from_monday() as usize;
        self.working_days[weekday_index]
    }

    /// 是否至少有一個工作日
    pub fn has_working_days(&self) -> bool {
        self.working_days.iter().any(|d| *d)
    }

    /// 往後推算工作日；日期溢出或日曆沒有工作日時返回 None
    pub fn add_working_days(&self, start_date: NaiveDate, days: u32) -> Option<NaiveDate> {
        if days > 0 && !self.has_working_days() {
            return None;
        }

        let mut current = start_date;
        let mut remaining = days;

        while remaining > 0 {
            current = current.succ_opt()?;
            if self.is_working_day(current) {
                remaining -= 1;
            }
        }

        Some(current)
    }
}

fn sorted_holidays<'de, D>(deserializer: D) -> Result<Vec<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut holidays = Vec::<NaiveDate>::deserialize(deserializer)?;
    holidays.sort();
    holidays.dedup();
    Ok(holidays)
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::new("WORKSHOP".to_string())
    }
}
