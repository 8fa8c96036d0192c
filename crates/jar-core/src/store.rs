//! The authoritative in-memory jar allocation state.
//!
//! Remote data replaces whole field sets and re-derives the complementary
//! ones; local edits only ever touch percentages, through
//! [`PercentageAllocator::clamp_edit`], so the allocation never observably
//! exceeds 100%.

use std::fmt;

use tracing::{debug, warn};

use jar_domain::{
    default_percentages, ArcSegment, CategoryValues, DisplayOrder, Jar, JarCategory, JarState,
    RoundingPolicy, UpdateJarPercentagesRequest, DEFAULT_TOTAL_BALANCE,
};

use crate::{allocation_service::PercentageAllocator, arc_service::DEFAULT_JAR_COLORS, CoreError};

/// Overlapping lifecycle flags. Remote syncs set their flag; local edits set
/// `has_unsaved_edits` until the next commit, revert, or percentage sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreFlags {
    pub percentages_synced: bool,
    pub balances_synced: bool,
    pub has_unsaved_edits: bool,
}

/// Coarse summary of [`StoreFlags`] for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePhase {
    DefaultAllocation,
    SyncedFromProfile,
    SyncedFromBalance,
    Synced,
    EditingLocally,
}

impl fmt::Display for StorePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StorePhase::DefaultAllocation => "default allocation",
            StorePhase::SyncedFromProfile => "synced from profile",
            StorePhase::SyncedFromBalance => "synced from balance",
            StorePhase::Synced => "synced",
            StorePhase::EditingLocally => "editing locally",
        };
        f.write_str(label)
    }
}

/// Result of [`JarStateStore::commit_edits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitSummary {
    pub total_percent: u32,
    pub allocated_amount: u64,
    pub fully_allocated: bool,
    pub had_unsaved_edits: bool,
}

/// Single source of truth for jar percentages, amounts, and total balance.
#[derive(Debug, Clone)]
pub struct JarStateStore {
    state: JarState,
    policy: RoundingPolicy,
    flags: StoreFlags,
    committed: CategoryValues<u8>,
    minor_units: u8,
}

impl JarStateStore {
    /// Default allocation (55/10/10/5/5/15) over the placeholder balance.
    pub fn new(policy: RoundingPolicy) -> Self {
        Self::with_state(JarState::default(), policy)
    }

    /// Default allocation with a caller-chosen display order and balance.
    pub fn with_order(order: &DisplayOrder, total_balance: u64, policy: RoundingPolicy) -> Self {
        Self::with_state(
            JarState::new(order, default_percentages(), total_balance),
            policy,
        )
    }

    fn with_state(mut state: JarState, policy: RoundingPolicy) -> Self {
        PercentageAllocator::derive_amounts(&mut state.jars, state.total_balance, policy);
        let committed = state.percentages();
        Self {
            state,
            policy,
            flags: StoreFlags::default(),
            committed,
            minor_units: 0,
        }
    }

    /// Sets how many decimal places backend balances carry over into the
    /// integer amounts (0 for VND, 2 for USD).
    pub fn with_minor_units(mut self, minor_units: u8) -> Self {
        self.minor_units = minor_units;
        self
    }

    pub fn minor_units(&self) -> u8 {
        self.minor_units
    }

    pub fn state(&self) -> &JarState {
        &self.state
    }

    pub fn jars(&self) -> &[Jar] {
        &self.state.jars
    }

    pub fn jar(&self, category: JarCategory) -> Option<&Jar> {
        self.state.jar(category)
    }

    pub fn total_balance(&self) -> u64 {
        self.state.total_balance
    }

    pub fn policy(&self) -> RoundingPolicy {
        self.policy
    }

    pub fn flags(&self) -> StoreFlags {
        self.flags
    }

    pub fn phase(&self) -> StorePhase {
        let flags = self.flags;
        if flags.has_unsaved_edits {
            return StorePhase::EditingLocally;
        }
        match (flags.percentages_synced, flags.balances_synced) {
            (true, true) => StorePhase::Synced,
            (true, false) => StorePhase::SyncedFromProfile,
            (false, true) => StorePhase::SyncedFromBalance,
            (false, false) => StorePhase::DefaultAllocation,
        }
    }

    pub fn total_percent(&self) -> u32 {
        PercentageAllocator::total_percent(self.jars())
    }

    pub fn unallocated_percent(&self) -> u32 {
        PercentageAllocator::unallocated_percent(self.jars())
    }

    pub fn is_fully_allocated(&self) -> bool {
        PercentageAllocator::is_fully_allocated(self.jars())
    }

    /// Points above 100%. Only a remote allocation can cause this.
    pub fn over_allocated_percent(&self) -> u32 {
        PercentageAllocator::over_allocated_percent(self.jars())
    }

    pub fn allocated_amount(&self) -> u64 {
        self.state.allocated_amount()
    }

    /// Position of `category` in display order.
    pub fn index_of(&self, category: JarCategory) -> Option<usize> {
        self.jars().iter().position(|jar| jar.category == category)
    }

    /// Switches rounding policy and re-derives amounts.
    pub fn set_policy(&mut self, policy: RoundingPolicy) {
        self.policy = policy;
        self.rederive_amounts();
    }

    /// Sets the baseline balance and re-derives every amount.
    pub fn set_total_balance(&mut self, total_balance: u64) {
        debug!(total_balance, "setting total balance");
        self.state.total_balance = total_balance;
        self.rederive_amounts();
    }

    /// Replaces every percentage with the persisted allocation. Pending local
    /// edits are discarded.
    pub fn set_percentages_from_remote(&mut self, percentages: &CategoryValues<u8>) {
        for jar in self.state.jars.iter_mut() {
            jar.percent = percentages.get(jar.category).min(100);
        }
        let total = self.total_percent();
        if total != 100 {
            warn!(total, "remote allocation does not total 100%");
        }
        self.rederive_amounts();
        self.committed = self.state.percentages();
        self.flags.percentages_synced = true;
        self.flags.has_unsaved_edits = false;
        debug!(total, "applied remote percentages");
    }

    /// Replaces every jar amount and the total balance, then recomputes the
    /// percentages from them. Negative jar balances are stored as zero. A
    /// negative total is rejected and leaves the store untouched. Rounded
    /// percentages that overshoot 100% are trimmed back to 100%.
    pub fn set_balances_from_remote(
        &mut self,
        balances: &CategoryValues<i64>,
        total_balance: i64,
    ) -> Result<(), CoreError> {
        let total = u64::try_from(total_balance)
            .map_err(|_| CoreError::NegativeBalance(total_balance))?;
        for jar in self.state.jars.iter_mut() {
            let balance = balances.get(jar.category);
            if balance < 0 {
                warn!(jar = %jar.category, balance, "negative jar balance stored as zero");
            }
            jar.amount = u64::try_from(balance).unwrap_or(0);
        }
        self.state.total_balance = total;
        let trimmed =
            PercentageAllocator::derive_percentages_from_balances(&mut self.state.jars, total);
        if trimmed > 0 {
            warn!(trimmed, "balance shares exceeded 100%; trimmed the largest jars");
        }
        self.committed = self.state.percentages();
        self.flags.balances_synced = true;
        self.flags.has_unsaved_edits = false;
        debug!(total_balance = total, "applied remote balances");
        Ok(())
    }

    /// Applies a user edit to the jar at `index` (display order). The value is
    /// clamped so the allocation stays within 100%; amounts are not
    /// re-derived until [`commit_edits`](Self::commit_edits).
    pub fn edit_percent(&mut self, index: usize, raw_value: f64) -> Result<u8, CoreError> {
        let percent = PercentageAllocator::clamp_edit(self.jars(), index, raw_value)?;
        let jar = &mut self.state.jars[index];
        if jar.percent != percent {
            debug!(jar = %jar.category, from = jar.percent, to = percent, "edited percentage");
        }
        jar.percent = percent;
        self.flags.has_unsaved_edits = true;
        Ok(percent)
    }

    /// Text-box variant of [`edit_percent`](Self::edit_percent).
    pub fn edit_percent_text(&mut self, index: usize, text: &str) -> Result<u8, CoreError> {
        self.edit_percent(index, PercentageAllocator::parse_percent_input(text))
    }

    pub fn edit_category_percent(
        &mut self,
        category: JarCategory,
        raw_value: f64,
    ) -> Result<u8, CoreError> {
        let index = self
            .index_of(category)
            .ok_or_else(|| CoreError::UnknownJar(category.to_string()))?;
        self.edit_percent(index, raw_value)
    }

    /// Amounts the current (possibly uncommitted) percentages would produce.
    pub fn preview_amounts(&self) -> Vec<u64> {
        PercentageAllocator::amounts_for(self.jars(), self.state.total_balance, self.policy)
    }

    /// Re-derives amounts from the edited percentages and the last known
    /// balance. Never fails.
    pub fn commit_edits(&mut self) -> CommitSummary {
        let had_unsaved_edits = self.flags.has_unsaved_edits;
        self.rederive_amounts();
        self.committed = self.state.percentages();
        self.flags.has_unsaved_edits = false;
        let summary = CommitSummary {
            total_percent: self.total_percent(),
            allocated_amount: self.allocated_amount(),
            fully_allocated: self.is_fully_allocated(),
            had_unsaved_edits,
        };
        debug!(
            total_percent = summary.total_percent,
            allocated = summary.allocated_amount,
            "committed allocation"
        );
        summary
    }

    /// Drops unsaved edits, restoring the last committed or synced percentages.
    pub fn revert_edits(&mut self) {
        if !self.flags.has_unsaved_edits {
            return;
        }
        for jar in self.state.jars.iter_mut() {
            jar.percent = self.committed.get(jar.category);
        }
        self.flags.has_unsaved_edits = false;
        debug!("reverted unsaved edits");
    }

    /// Body for the profile-update call. Only a complete allocation may be saved.
    pub fn update_request(&self) -> Result<UpdateJarPercentagesRequest, CoreError> {
        let total = self.total_percent();
        if total != 100 {
            return Err(CoreError::AllocationIncomplete { total });
        }
        Ok(UpdateJarPercentagesRequest::from(self.state.percentages()))
    }

    /// Chart segments in display order. Colours cycle through `palette`, or the
    /// built-in jar palette when it is empty.
    pub fn segments(&self, palette: &[String]) -> Vec<ArcSegment> {
        self.jars()
            .iter()
            .enumerate()
            .map(|(index, jar)| {
                let color = if palette.is_empty() {
                    DEFAULT_JAR_COLORS[index % DEFAULT_JAR_COLORS.len()].to_string()
                } else {
                    palette[index % palette.len()].clone()
                };
                ArcSegment::new(f64::from(jar.percent), color)
            })
            .collect()
    }

    fn rederive_amounts(&mut self) {
        PercentageAllocator::derive_amounts(
            &mut self.state.jars,
            self.state.total_balance,
            self.policy,
        );
    }
}

impl Default for JarStateStore {
    fn default() -> Self {
        Self::with_order(
            &DisplayOrder::default(),
            DEFAULT_TOTAL_BALANCE,
            RoundingPolicy::default(),
        )
    }
}
