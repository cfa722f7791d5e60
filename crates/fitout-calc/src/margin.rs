//! 報價毛利檢視
//!
//! 內部成本一律經 [`LineItem::effective_total_cost`] 推算，
//! 與成本明細報告中的配件、外購成本一致。

use fitout_core::{saturating_sum, LineItem, Project, Room};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pnl::margin_percent;

/// 毛利率達此值（%）視為健康
pub const HEALTHY_MARGIN_PERCENT: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// 單一項目毛利
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMargin {
    pub item_id: Uuid,
    pub name: String,
    pub revenue: Decimal,
    pub internal_cost: Decimal,
    pub profit: Decimal,
    pub margin_percent: Decimal,
}

impl ItemMargin {
    pub fn for_item(item: &LineItem, fallback_ratio: Decimal) -> Self {
        let internal_cost = item.effective_total_cost(fallback_ratio);
        let profit = item.total_price.saturating_sub(internal_cost);
        Self {
            item_id: item.id,
            name: item.name.clone(),
            revenue: item.total_price,
            internal_cost,
            profit,
            margin_percent: margin_percent(profit, item.total_price),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.margin_percent >= HEALTHY_MARGIN_PERCENT
    }
}

/// 房間毛利
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMargin {
    pub room_id: Uuid,
    pub room_name: String,
    pub items: Vec<ItemMargin>,
    pub revenue: Decimal,
    pub internal_cost: Decimal,
    pub profit: Decimal,
    pub margin_percent: Decimal,
}

impl RoomMargin {
    pub fn for_room(room: &Room, fallback_ratio: Decimal) -> Self {
        let items: Vec<ItemMargin> = room
            .items
            .iter()
            .map(|item| ItemMargin::for_item(item, fallback_ratio))
            .collect();
        let (revenue, internal_cost) = totals(&items);
        let profit = revenue.saturating_sub(internal_cost);

        Self {
            room_id: room.id,
            room_name: room.name.clone(),
            items,
            revenue,
            internal_cost,
            profit,
            margin_percent: margin_percent(profit, revenue),
        }
    }
}

fn totals(items: &[ItemMargin]) -> (Decimal, Decimal) {
    items.iter().fold((Decimal::ZERO, Decimal::ZERO), |(rev, cost), m| {
        (rev.saturating_add(m.revenue), cost.saturating_add(m.internal_cost))
    })
}

/// 整份報價毛利
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationMargin {
    pub rooms: Vec<RoomMargin>,
    pub revenue: Decimal,
    pub internal_cost: Decimal,
    pub profit: Decimal,
    pub margin_percent: Decimal,
}

impl QuotationMargin {
    /// 依房間彙總專案毛利
    pub fn for_project(project: &Project, fallback_ratio: Decimal) -> Self {
        let rooms: Vec<RoomMargin> = project
            .rooms
            .iter()
            .map(|room| RoomMargin::for_room(room, fallback_ratio))
            .collect();
        let revenue = saturating_sum(rooms.iter().map(|r| r.revenue));
        let internal_cost = saturating_sum(rooms.iter().map(|r| r.internal_cost));

        Self::from_parts(rooms, revenue, internal_cost)
    }

    /// 不分房間的項目列表
    pub fn for_items(items: &[LineItem], fallback_ratio: Decimal) -> (Vec<ItemMargin>, Self) {
        let margins: Vec<ItemMargin> = items
            .iter()
            .map(|item| ItemMargin::for_item(item, fallback_ratio))
            .collect();
        let (revenue, internal_cost) = totals(&margins);

        (margins, Self::from_parts(Vec::new(), revenue, internal_cost))
    }

    fn from_parts(rooms: Vec<RoomMargin>, revenue: Decimal, internal_cost: Decimal) -> Self {
        let profit = revenue.saturating_sub(internal_cost);
        Self {
            rooms,
            revenue,
            internal_cost,
            profit,
            margin_percent: margin_percent(profit, revenue),
        }
    }

    /// 毛利率低於健康值的項目
    pub fn thin_margin_items(&self) -> impl Iterator<Item = &ItemMargin> {
        self.rooms
            .iter()
            .flat_map(|r| r.items.iter())
            .filter(|m| !m.is_healthy())
    }
}
