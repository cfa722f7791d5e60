//! 飽和算術
//!
//! 數量與金額可能大到超出 `Decimal` 的表示範圍。估算不可中途失敗：
//! 溢出時取同號極值，並由 [`Overflow`] 記下曾經溢出。

use rust_decimal::Decimal;

/// 溢出記錄
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overflow {
    occurred: bool,
}

fn saturate(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

impl Overflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否發生過溢出
    pub fn occurred(&self) -> bool {
        self.occurred
    }

    /// 合併另一份記錄
    pub fn absorb(&mut self, other: Overflow) {
        self.occurred |= other.occurred;
    }

    pub fn mul(&mut self, a: Decimal, b: Decimal) -> Decimal {
        a.checked_mul(b).unwrap_or_else(|| {
            self.occurred = true;
            a.saturating_mul(b)
        })
    }

    pub fn add(&mut self, a: Decimal, b: Decimal) -> Decimal {
        a.checked_add(b).unwrap_or_else(|| {
            self.occurred = true;
            a.saturating_add(b)
        })
    }

    pub fn sub(&mut self, a: Decimal, b: Decimal) -> Decimal {
        a.checked_sub(b).unwrap_or_else(|| {
            self.occurred = true;
            a.saturating_sub(b)
        })
    }

    /// 除數為 0 時返回 0
    pub fn div(&mut self, a: Decimal, b: Decimal) -> Decimal {
        if b.is_zero() {
            return Decimal::ZERO;
        }
        a.checked_div(b).unwrap_or_else(|| {
            self.occurred = true;
            saturate(a.is_sign_negative() != b.is_sign_negative())
        })
    }

    pub fn sum<I: IntoIterator<Item = Decimal>>(&mut self, values: I) -> Decimal {
        values
            .into_iter()
            .fold(Decimal::ZERO, |total, value| self.add(total, value))
    }
}

/// 不需記錄溢出時的飽和加總
pub fn saturating_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |total, value| total.saturating_add(value))
}
