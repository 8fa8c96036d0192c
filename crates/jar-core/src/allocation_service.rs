//! Conversion between percentage allocations and monetary amounts.
//!
//! Money paths use integer arithmetic only. Shares round half-up, which is
//! the same as half-away-from-zero because every input is non-negative.

use std::cmp::Reverse;

use jar_domain::{Jar, RoundingPolicy};

use crate::CoreError;

/// Upper bound of a complete allocation.
pub const FULL_ALLOCATION: u32 = 100;

/// Pure helpers over a slice of jars. Never touches anything but its arguments.
pub struct PercentageAllocator;

impl PercentageAllocator {
    /// `round(percent / 100 * total)`.
    pub fn share_of(percent: u8, total_balance: u64) -> u64 {
        let scaled = u128::from(percent) * u128::from(total_balance);
        ((scaled + 50) / 100) as u64
    }

    /// `round(amount / total * 100)` clamped to `0..=100`; non-positive
    /// amounts yield 0. Callers must handle `total_balance == 0` themselves.
    pub fn percent_of(amount: i64, total_balance: u64) -> u8 {
        if amount <= 0 || total_balance == 0 {
            return 0;
        }
        let numerator = u128::from(amount.unsigned_abs()) * 200 + u128::from(total_balance);
        let rounded = numerator / (2 * u128::from(total_balance));
        rounded.min(u128::from(FULL_ALLOCATION)) as u8
    }

    /// Amounts each jar would hold at `total_balance`, in slice order.
    ///
    /// `LargestRemainder` only kicks in for a complete (100%) allocation;
    /// partial allocations fall back to per-jar rounding.
    pub fn amounts_for(jars: &[Jar], total_balance: u64, policy: RoundingPolicy) -> Vec<u64> {
        match policy {
            RoundingPolicy::LargestRemainder if Self::is_fully_allocated(jars) => {
                Self::largest_remainder(jars, total_balance)
            }
            _ => jars
                .iter()
                .map(|jar| Self::share_of(jar.percent, total_balance))
                .collect(),
        }
    }

    /// Writes derived amounts into every jar. Percentages are left untouched.
    pub fn derive_amounts(jars: &mut [Jar], total_balance: u64, policy: RoundingPolicy) {
        let amounts = Self::amounts_for(jars, total_balance, policy);
        for (jar, amount) in jars.iter_mut().zip(amounts) {
            jar.amount = amount;
        }
    }

    /// Inverse direction: recomputes each percentage from the jar's amount.
    /// A zero total leaves the percentages unchanged.
    ///
    /// Rounded shares can overshoot 100% (six equal balances give 17% each),
    /// so any excess is taken back one point at a time from the largest jar,
    /// earliest first. Returns the number of points trimmed.
    pub fn derive_percentages_from_balances(jars: &mut [Jar], total_balance: u64) -> u32 {
        if total_balance == 0 {
            return 0;
        }
        for jar in jars.iter_mut() {
            let amount = i64::try_from(jar.amount).unwrap_or(i64::MAX);
            jar.percent = Self::percent_of(amount, total_balance);
        }
        Self::trim_excess(jars)
    }

    /// Points by which the allocation exceeds 100%.
    pub fn over_allocated_percent(jars: &[Jar]) -> u32 {
        Self::total_percent(jars).saturating_sub(FULL_ALLOCATION)
    }

    /// Clamps a proposed percentage for the jar at `edited_index` so the
    /// allocation can never exceed 100%. Under-allocation is allowed.
    pub fn clamp_edit(jars: &[Jar], edited_index: usize, raw_value: f64) -> Result<u8, CoreError> {
        if edited_index >= jars.len() {
            return Err(CoreError::JarIndexOutOfRange {
                index: edited_index,
                len: jars.len(),
            });
        }
        let others: u32 = jars
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != edited_index)
            .map(|(_, jar)| u32::from(jar.percent))
            .sum();
        let max_allowed = FULL_ALLOCATION.saturating_sub(others) as f64;
        let proposed = if raw_value.is_nan() {
            0.0
        } else {
            raw_value.round()
        };
        Ok(proposed.clamp(0.0, max_allowed) as u8)
    }

    /// Reads a percentage typed into a text box: every non-digit is dropped,
    /// and nothing left reads as 0.
    pub fn parse_percent_input(text: &str) -> f64 {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        digits.parse::<f64>().unwrap_or(0.0)
    }

    /// Rounds and clamps a percentage received from outside to `0..=100`.
    /// Returns the value and whether it had to be clamped.
    pub fn normalize_percent(value: f64) -> (u8, bool) {
        if !value.is_finite() {
            return (0, true);
        }
        let rounded = value.round();
        let clamped = rounded.clamp(0.0, f64::from(FULL_ALLOCATION));
        (clamped as u8, clamped != rounded)
    }

    pub fn total_percent(jars: &[Jar]) -> u32 {
        jars.iter().map(|jar| u32::from(jar.percent)).sum()
    }

    pub fn unallocated_percent(jars: &[Jar]) -> u32 {
        FULL_ALLOCATION.saturating_sub(Self::total_percent(jars))
    }

    pub fn is_fully_allocated(jars: &[Jar]) -> bool {
        Self::total_percent(jars) == FULL_ALLOCATION
    }

    fn trim_excess(jars: &mut [Jar]) -> u32 {
        let excess = Self::over_allocated_percent(jars);
        for _ in 0..excess {
            let largest = (0..jars.len()).max_by_key(|&index| (jars[index].percent, Reverse(index)));
            match largest {
                Some(index) if jars[index].percent > 0 => jars[index].percent -= 1,
                _ => break,
            }
        }
        excess
    }

    fn largest_remainder(jars: &[Jar], total_balance: u64) -> Vec<u64> {
        let total = u128::from(total_balance);
        let mut amounts = Vec::with_capacity(jars.len());
        let mut remainders = Vec::with_capacity(jars.len());
        for (index, jar) in jars.iter().enumerate() {
            let scaled = u128::from(jar.percent) * total;
            amounts.push((scaled / 100) as u64);
            remainders.push((index, scaled % 100));
        }
        let assigned: u64 = amounts.iter().sum();
        let shortfall = total_balance.saturating_sub(assigned) as usize;
        // Stable sort keeps slice order for equal remainders.
        remainders.sort_by(|a, b| b.1.cmp(&a.1));
        for (index, _) in remainders.into_iter().take(shortfall) {
            amounts[index] += 1;
        }
        amounts
    }
}

#[cfg(test)]
mod tests {
    use jar_domain::{default_percentages, JarState};

    use super::*;

    fn jars_with(percentages: [u8; 6]) -> Vec<Jar> {
        let mut state = JarState::default();
        for (jar, percent) in state.jars.iter_mut().zip(percentages) {
            jar.percent = percent;
        }
        state.jars
    }

    #[test]
    fn share_rounds_half_up() {
        assert_eq!(PercentageAllocator::share_of(55, 1_000_000), 550_000);
        assert_eq!(PercentageAllocator::share_of(5, 10), 1);
        assert_eq!(PercentageAllocator::share_of(15, 10), 2);
        assert_eq!(PercentageAllocator::share_of(0, 999), 0);
    }

    #[test]
    fn derives_amounts_for_default_allocation() {
        let mut jars = jars_with([55, 10, 10, 5, 5, 15]);
        PercentageAllocator::derive_amounts(&mut jars, 1_000_000, RoundingPolicy::PerJar);
        let amounts: Vec<u64> = jars.iter().map(|jar| jar.amount).collect();
        assert_eq!(
            amounts,
            vec![550_000, 100_000, 100_000, 50_000, 50_000, 150_000]
        );
        assert_eq!(amounts.iter().sum::<u64>(), 1_000_000);
    }

    #[test]
    fn per_jar_rounding_keeps_drift() {
        let mut jars = jars_with([55, 10, 10, 5, 5, 15]);
        PercentageAllocator::derive_amounts(&mut jars, 10, RoundingPolicy::PerJar);
        let sum: u64 = jars.iter().map(|jar| jar.amount).sum();
        // 5.5 + 1 + 1 + 0.5 + 0.5 + 1.5 rounds to 6 + 1 + 1 + 1 + 1 + 2.
        assert_eq!(sum, 12);
    }

    #[test]
    fn largest_remainder_reconciles_exactly() {
        let mut jars = jars_with([55, 10, 10, 5, 5, 15]);
        PercentageAllocator::derive_amounts(&mut jars, 10, RoundingPolicy::LargestRemainder);
        let amounts: Vec<u64> = jars.iter().map(|jar| jar.amount).collect();
        assert_eq!(amounts.iter().sum::<u64>(), 10);
        assert_eq!(amounts, vec![6, 1, 1, 1, 0, 1]);
    }

    #[test]
    fn largest_remainder_falls_back_for_partial_allocations() {
        let jars = jars_with([50, 0, 0, 0, 0, 5]);
        let amounts = PercentageAllocator::amounts_for(&jars, 11, RoundingPolicy::LargestRemainder);
        assert_eq!(amounts, vec![6, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn zero_balance_yields_zero_amounts() {
        let mut jars = jars_with([55, 10, 10, 5, 5, 15]);
        PercentageAllocator::derive_amounts(&mut jars, 0, RoundingPolicy::PerJar);
        assert!(jars.iter().all(|jar| jar.amount == 0));
    }

    #[test]
    fn percentages_from_balances_clamp_negative_and_excess() {
        assert_eq!(PercentageAllocator::percent_of(-500, 1_000), 0);
        assert_eq!(PercentageAllocator::percent_of(2_000, 1_000), 100);
        assert_eq!(PercentageAllocator::percent_of(125, 1_000), 13);
        assert_eq!(PercentageAllocator::percent_of(124, 1_000), 12);
    }

    #[test]
    fn zero_total_leaves_percentages_unchanged() {
        let mut jars = jars_with([55, 10, 10, 5, 5, 15]);
        for jar in jars.iter_mut() {
            jar.amount = 7;
        }
        PercentageAllocator::derive_percentages_from_balances(&mut jars, 0);
        assert_eq!(jars[0].percent, 55);
    }

    #[test]
    fn rounded_balance_shares_never_exceed_full_allocation() {
        let mut jars = jars_with([0; 6]);
        for jar in jars.iter_mut() {
            jar.amount = 100;
        }
        let trimmed = PercentageAllocator::derive_percentages_from_balances(&mut jars, 600);
        let percentages: Vec<u8> = jars.iter().map(|jar| jar.percent).collect();
        assert_eq!(trimmed, 2);
        assert_eq!(percentages, vec![16, 16, 17, 17, 17, 17]);
        assert_eq!(PercentageAllocator::total_percent(&jars), 100);
        assert_eq!(PercentageAllocator::over_allocated_percent(&jars), 0);
    }

    #[test]
    fn balances_above_total_are_trimmed_to_full_allocation() {
        let mut jars = jars_with([0; 6]);
        jars[1].amount = 900;
        jars[4].amount = 800;
        let trimmed = PercentageAllocator::derive_percentages_from_balances(&mut jars, 1_000);
        assert_eq!(trimmed, 70);
        assert_eq!(jars[1].percent, 50);
        assert_eq!(jars[4].percent, 50);
        assert_eq!(PercentageAllocator::total_percent(&jars), 100);
    }

    #[test]
    fn clamp_edit_caps_at_remaining_share() {
        let jars = jars_with([40, 10, 10, 10, 10, 10]);
        assert_eq!(PercentageAllocator::clamp_edit(&jars, 0, 90.0).unwrap(), 50);
        assert_eq!(PercentageAllocator::clamp_edit(&jars, 0, 12.4).unwrap(), 12);
        assert_eq!(PercentageAllocator::clamp_edit(&jars, 0, -3.0).unwrap(), 0);
        assert_eq!(PercentageAllocator::clamp_edit(&jars, 0, f64::NAN).unwrap(), 0);
    }

    #[test]
    fn clamp_edit_rejects_unknown_index() {
        let jars = jars_with([55, 10, 10, 5, 5, 15]);
        let err = PercentageAllocator::clamp_edit(&jars, 6, 10.0).unwrap_err();
        assert!(matches!(err, CoreError::JarIndexOutOfRange { index: 6, len: 6 }));
    }

    #[test]
    fn text_input_drops_non_digits() {
        assert_eq!(PercentageAllocator::parse_percent_input("4a5%"), 45.0);
        assert_eq!(PercentageAllocator::parse_percent_input(""), 0.0);
        assert_eq!(PercentageAllocator::parse_percent_input("-12"), 12.0);
    }

    #[test]
    fn normalize_percent_reports_clamping() {
        assert_eq!(PercentageAllocator::normalize_percent(54.6), (55, false));
        assert_eq!(PercentageAllocator::normalize_percent(130.0), (100, true));
        assert_eq!(PercentageAllocator::normalize_percent(-1.0), (0, true));
        assert_eq!(PercentageAllocator::normalize_percent(f64::INFINITY), (0, true));
    }

    #[test]
    fn allocation_totals() {
        let jars = jars_with([50, 10, 10, 5, 5, 15]);
        assert_eq!(PercentageAllocator::total_percent(&jars), 95);
        assert_eq!(PercentageAllocator::unallocated_percent(&jars), 5);
        assert!(!PercentageAllocator::is_fully_allocated(&jars));
        assert_eq!(default_percentages().iter().map(|(_, p)| u32::from(p)).sum::<u32>(), 100);
    }
}
