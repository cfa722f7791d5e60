//! 單價資料庫比對
//!
//! 比對順序：名稱 + 材料完全相同 → 名稱完全相同 → 名稱互相包含
//! （依材料相似度、再依資料庫名稱長度排序）。比對前去空白、轉小寫。

use fitout_core::{FitoutError, KnowledgeItem, LineItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 套用單價的模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// 全部覆寫
    OverwriteAll,
    /// 只填單價為 0 的項目
    FillMissingOnly,
}

/// 套用結果
#[derive(Debug, Clone, PartialEq)]
pub struct PricingOutcome {
    pub items: Vec<LineItem>,
    /// 成功套用單價的項目數
    pub matched: usize,
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// 材料相似度：完全相同 2，互相包含 1，其餘 0
fn material_score(item_material: &str, library_material: &str) -> u8 {
    if item_material.is_empty() || library_material.is_empty() {
        return 0;
    }
    if item_material == library_material {
        2
    } else if item_material.contains(library_material) || library_material.contains(item_material)
    {
        1
    } else {
        0
    }
}

/// 單價資料庫
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceLibrary {
    entries: Vec<KnowledgeItem>,
}

impl PriceLibrary {
    pub fn new(entries: Vec<KnowledgeItem>) -> Self {
        Self { entries }
    }

    /// 系統預設資料庫
    pub fn system_default() -> Self {
        Self::new(KnowledgeItem::system_defaults())
    }

    pub fn entries(&self) -> &[KnowledgeItem] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 為項目找出最合適的資料庫條目
    pub fn find_best_match(&self, name: &str, material: &str) -> Option<&KnowledgeItem> {
        let name = normalize(name);
        if name.is_empty() {
            return None;
        }
        let material = normalize(material);

        if let Some(exact) = self
            .entries
            .iter()
            .find(|k| normalize(&k.name) == name && normalize(&k.material) == material)
        {
            return Some(exact);
        }

        if let Some(by_name) = self.entries.iter().find(|k| normalize(&k.name) == name) {
            return Some(by_name);
        }

        let mut candidates: Vec<&KnowledgeItem> = self
            .entries
            .iter()
            .filter(|k| {
                let library_name = normalize(&k.name);
                !library_name.is_empty()
                    && (name.contains(library_name.as_str())
                        || library_name.contains(name.as_str()))
            })
            .collect();

        // sort_by 為穩定排序，同分時保留資料庫順序
        candidates.sort_by(|a, b| {
            let score_a = material_score(&material, &normalize(&a.material));
            let score_b = material_score(&material, &normalize(&b.material));
            score_b
                .cmp(&score_a)
                .then_with(|| b.name.chars().count().cmp(&a.name.chars().count()))
        });

        candidates.into_iter().next()
    }

    /// 依資料庫更新項目單價
    pub fn apply_prices(
        &self,
        items: &[LineItem],
        mode: PricingMode,
        fallback_ratio: Decimal,
    ) -> fitout_core::Result<PricingOutcome> {
        if self.entries.is_empty() {
            return Err(FitoutError::EmptyKnowledgeBase);
        }

        let mut matched = 0;
        let items: Vec<LineItem> = items
            .iter()
            .map(|item| {
                if mode == PricingMode::FillMissingOnly && item.unit_price > Decimal::ZERO {
                    return item.clone();
                }

                match self.find_best_match(&item.name, &item.material_label) {
                    Some(entry) if entry.unit_price > Decimal::ZERO => {
                        matched += 1;
                        let mut priced = item.clone();
                        priced.unit_price = entry.unit_price;
                        if !entry.unit.is_empty() {
                            priced.unit = entry.unit.clone();
                        }
                        priced.total_price = priced.quantity.saturating_mul(entry.unit_price);
                        priced.cost_price = Some(entry.unit_price.saturating_mul(fallback_ratio));
                        priced
                    }
                    _ => item.clone(),
                }
            })
            .collect();

        tracing::debug!("單價資料庫比對：{} 筆項目套用單價", matched);

        Ok(PricingOutcome { items, matched })
    }

    /// 把已有單價的項目存入資料庫，略過名稱、材料與單價都相同的條目；返回新增筆數
    pub fn learn_from(&mut self, items: &[LineItem]) -> usize {
        let mut added = 0;
        for item in items.iter().filter(|i| i.unit_price > Decimal::ZERO) {
            let name = item.name.to_lowercase();
            let material = item.material_label.to_lowercase();
            let exists = self.entries.iter().any(|k| {
                k.name.to_lowercase() == name
                    && k.material.to_lowercase() == material
                    && k.unit_price == item.unit_price
            });
            if !exists {
                self.entries.push(
                    KnowledgeItem::new(
                        item.name.clone(),
                        item.material_label.clone(),
                        item.unit.clone(),
                        item.unit_price,
                    )
                    .with_description(item.description.clone()),
                );
                added += 1;
            }
        }
        added
    }
}
