//! Stable, public-facing helpers that wrap the store and renderer.
//!
//! Frontends (CLI, FFI) rely on this surface instead of the full service API.

use jar_domain::{ChartGeometry, JarCategory, RingChart, RoundingPolicy};

use crate::{arc_service::ArcGeometryRenderer, store::JarStateStore, CoreError};

/// Flat view of one jar for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiJarView {
    pub category: JarCategory,
    pub id: u8,
    pub label: String,
    pub percent: u8,
    pub amount: u64,
}

/// Snapshot of the whole allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiJarSummary {
    pub total_balance: u64,
    pub total_percent: u32,
    pub allocated_amount: u64,
    pub has_unsaved_edits: bool,
    pub jars: Vec<ApiJarView>,
}

/// Creates a store holding the default allocation.
pub fn api_create_store(policy: RoundingPolicy) -> JarStateStore {
    JarStateStore::new(policy)
}

/// Applies a user edit and returns the percentage actually stored.
pub fn api_edit_percent(
    store: &mut JarStateStore,
    index: usize,
    raw_value: f64,
) -> Result<u8, CoreError> {
    store.edit_percent(index, raw_value)
}

pub fn api_jar_summary(store: &JarStateStore) -> ApiJarSummary {
    ApiJarSummary {
        total_balance: store.total_balance(),
        total_percent: store.total_percent(),
        allocated_amount: store.allocated_amount(),
        has_unsaved_edits: store.flags().has_unsaved_edits,
        jars: store
            .jars()
            .iter()
            .map(|jar| ApiJarView {
                category: jar.category,
                id: jar.id(),
                label: jar.label.clone(),
                percent: jar.percent,
                amount: jar.amount,
            })
            .collect(),
    }
}

/// Ring chart for the store's current percentages.
pub fn api_ring_chart(
    store: &JarStateStore,
    palette: &[String],
    geometry: ChartGeometry,
) -> RingChart {
    ArcGeometryRenderer::build_arc_paths(&store.segments(palette), geometry)
}
