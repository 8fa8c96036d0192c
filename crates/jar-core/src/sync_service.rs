//! Applies backend results to the store.
//!
//! Every operation validates the response before touching the store, and
//! then applies it as one replace. A failed fetch leaves the store as it was.

use tracing::{info, warn};

use jar_domain::{ApiResponse, Balance, JarInfo, UpdateJarPercentagesRequest};

use crate::{
    allocation_service::PercentageAllocator,
    error::{CoreError, RemoteError},
    store::{CommitSummary, JarStateStore},
};

/// The profile/balance backend as seen by the store. Implemented by the
/// transport layer; tests and the CLI supply their own.
pub trait JarRemote {
    fn fetch_jar_info(&self) -> Result<ApiResponse<JarInfo>, RemoteError>;
    fn fetch_balance(&self) -> Result<ApiResponse<Balance>, RemoteError>;
    fn update_jar_percentages(
        &self,
        request: &UpdateJarPercentagesRequest,
    ) -> Result<ApiResponse<JarInfo>, RemoteError>;
}

pub struct SyncService;

impl SyncService {
    /// Applies a persisted allocation. Percentages are rounded and clamped
    /// to `0..=100`.
    pub fn apply_jar_info(
        store: &mut JarStateStore,
        response: ApiResponse<JarInfo>,
    ) -> Result<(), CoreError> {
        let info = unwrap_response(response)?;
        let percentages = info.percentages().map(|category, value| {
            let (percent, clamped) = PercentageAllocator::normalize_percent(value);
            if clamped {
                warn!(jar = %category, value, "remote percentage out of range; clamped");
            }
            percent
        });
        store.set_percentages_from_remote(&percentages);
        Ok(())
    }

    /// Applies per-jar balances, scaled to the store's minor units.
    pub fn apply_balance(
        store: &mut JarStateStore,
        response: ApiResponse<Balance>,
    ) -> Result<(), CoreError> {
        let balance = unwrap_response(response)?;
        let minor_units = store.minor_units();
        store.set_balances_from_remote(&balance.balances(minor_units), balance.total(minor_units))
    }

    /// Fetches the allocation, then the balances, applying each on success.
    pub fn refresh(store: &mut JarStateStore, remote: &dyn JarRemote) -> Result<(), CoreError> {
        let jar_info = remote.fetch_jar_info()?;
        Self::apply_jar_info(store, jar_info)?;
        let balance = remote.fetch_balance()?;
        Self::apply_balance(store, balance)?;
        info!(total_balance = store.total_balance(), "jar state refreshed");
        Ok(())
    }

    /// Persists the current allocation and commits it locally once the
    /// backend accepts it. Incomplete allocations are refused up front.
    pub fn save(
        store: &mut JarStateStore,
        remote: &dyn JarRemote,
    ) -> Result<CommitSummary, CoreError> {
        let request = store.update_request()?;
        let response = remote.update_jar_percentages(&request)?;
        if !response.is_success() {
            return Err(rejected(&response).into());
        }
        let summary = store.commit_edits();
        info!(total_percent = summary.total_percent, "jar allocation saved");
        Ok(summary)
    }
}

fn unwrap_response<T>(response: ApiResponse<T>) -> Result<T, CoreError> {
    if !response.is_success() {
        return Err(rejected(&response).into());
    }
    response
        .result
        .ok_or_else(|| CoreError::from(RemoteError::EmptyResult))
}

fn rejected<T>(response: &ApiResponse<T>) -> RemoteError {
    RemoteError::Rejected {
        code: response.code,
        message: response.message.clone().unwrap_or_default(),
    }
}
