use std::cell::RefCell;

use crate::{
    api_create_store, api_edit_percent, api_jar_summary, api_ring_chart, CoreError, JarRemote,
    JarStateStore, RemoteError, StorePhase, SyncService,
};
use jar_domain::{
    ApiResponse, Balance, ChartGeometry, JarCategory, JarInfo, RoundingPolicy,
    UpdateJarPercentagesRequest,
};

fn jar_info(percentages: [f64; 6]) -> JarInfo {
    JarInfo {
        user_id: "user-1".into(),
        necessities_percentage: percentages[0],
        education_percentage: percentages[1],
        savings_percentage: percentages[2],
        entertainment_percentage: percentages[3],
        giving_percentage: percentages[4],
        investment_percentage: percentages[5],
    }
}

fn balance(amounts: [f64; 6], total: f64) -> Balance {
    Balance {
        id: "balance-1".into(),
        user_id: "user-1".into(),
        necessities_balance: amounts[0],
        education_balance: amounts[1],
        savings_balance: amounts[2],
        entertainment_balance: amounts[3],
        giving_balance: amounts[4],
        investment_balance: amounts[5],
        total_balance: total,
        created_at: None,
        updated_at: None,
    }
}

struct FakeRemote {
    jar_info: JarInfo,
    balance: Balance,
    fail_balance: bool,
    reject_update: bool,
    saved: RefCell<Vec<UpdateJarPercentagesRequest>>,
}

impl FakeRemote {
    fn new() -> Self {
        Self {
            jar_info: jar_info([50.0, 10.0, 10.0, 10.0, 5.0, 15.0]),
            balance: balance(
                [1_000_000.0, 200_000.0, 200_000.0, 200_000.0, 100_000.0, 300_000.0],
                2_000_000.0,
            ),
            fail_balance: false,
            reject_update: false,
            saved: RefCell::new(Vec::new()),
        }
    }
}

impl JarRemote for FakeRemote {
    fn fetch_jar_info(&self) -> Result<ApiResponse<JarInfo>, RemoteError> {
        Ok(ApiResponse::success(self.jar_info.clone()))
    }

    fn fetch_balance(&self) -> Result<ApiResponse<Balance>, RemoteError> {
        if self.fail_balance {
            return Err(RemoteError::Transport("connection reset".into()));
        }
        Ok(ApiResponse::success(self.balance.clone()))
    }

    fn update_jar_percentages(
        &self,
        request: &UpdateJarPercentagesRequest,
    ) -> Result<ApiResponse<JarInfo>, RemoteError> {
        if self.reject_update {
            return Ok(ApiResponse {
                code: 4004,
                message: Some("jar division not found".into()),
                result: None,
            });
        }
        self.saved.borrow_mut().push(*request);
        Ok(ApiResponse::success(JarInfo::from(*request)))
    }
}

#[test]
fn refresh_applies_profile_then_balance() {
    let remote = FakeRemote::new();
    let mut store = JarStateStore::default();

    SyncService::refresh(&mut store, &remote).expect("refresh");

    assert_eq!(store.phase(), StorePhase::Synced);
    assert_eq!(store.total_balance(), 2_000_000);
    let percents: Vec<u8> = store.jars().iter().map(|jar| jar.percent).collect();
    assert_eq!(percents, vec![50, 10, 10, 10, 5, 15]);
    assert_eq!(store.jar(JarCategory::Necessities).unwrap().amount, 1_000_000);
}

#[test]
fn failed_balance_fetch_keeps_previous_balances() {
    let mut remote = FakeRemote::new();
    remote.fail_balance = true;
    let mut store = JarStateStore::default();

    let err = SyncService::refresh(&mut store, &remote).expect_err("balance fetch fails");
    assert!(matches!(err, CoreError::Remote(RemoteError::Transport(_))));
    assert_eq!(store.total_balance(), 1_000_000);
    assert_eq!(store.phase(), StorePhase::SyncedFromProfile);
}

#[test]
fn rejected_envelope_does_not_mutate() {
    let mut store = JarStateStore::default();
    let before = store.state().clone();
    let response = ApiResponse {
        code: 5000,
        message: Some("server error".into()),
        result: Some(jar_info([0.0; 6])),
    };

    let err = SyncService::apply_jar_info(&mut store, response).expect_err("rejected");
    assert!(err.to_string().contains("5000"));
    assert_eq!(store.state(), &before);
}

#[test]
fn empty_result_is_an_error() {
    let mut store = JarStateStore::default();
    let response: ApiResponse<Balance> = ApiResponse {
        code: 1000,
        message: None,
        result: None,
    };
    let err = SyncService::apply_balance(&mut store, response).expect_err("no result");
    assert!(matches!(err, CoreError::Remote(RemoteError::EmptyResult)));
}

#[test]
fn out_of_range_remote_percentages_are_clamped() {
    let mut store = JarStateStore::default();
    SyncService::apply_jar_info(
        &mut store,
        ApiResponse::success(jar_info([120.0, -5.0, 10.4, 0.0, 0.0, 0.0])),
    )
    .expect("apply");
    let percents: Vec<u8> = store.jars().iter().map(|jar| jar.percent).collect();
    assert_eq!(percents, vec![100, 0, 10, 0, 0, 0]);
}

#[test]
fn negative_remote_total_is_rejected() {
    let mut store = JarStateStore::default();
    let err = SyncService::apply_balance(
        &mut store,
        ApiResponse::success(balance([0.0; 6], -10.0)),
    )
    .expect_err("negative total");
    assert!(matches!(err, CoreError::NegativeBalance(-10)));
}

#[test]
fn save_commits_only_after_remote_accepts() {
    let remote = FakeRemote::new();
    let mut store = JarStateStore::default();
    store.edit_percent(0, 45.0).expect("edit");
    store.edit_percent(5, 25.0).expect("edit");

    let summary = SyncService::save(&mut store, &remote).expect("save");
    assert!(summary.fully_allocated);
    assert!(!store.flags().has_unsaved_edits);
    assert_eq!(store.jars()[5].amount, 250_000);
    let saved = remote.saved.borrow();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].necessities_percentage, 45);
    assert_eq!(saved[0].investment_percentage, 25);
}

#[test]
fn save_refuses_incomplete_allocation() {
    let remote = FakeRemote::new();
    let mut store = JarStateStore::default();
    store.edit_percent(0, 0.0).expect("edit");

    let err = SyncService::save(&mut store, &remote).expect_err("incomplete");
    assert!(matches!(err, CoreError::AllocationIncomplete { total: 45 }));
    assert!(remote.saved.borrow().is_empty());
    assert!(store.flags().has_unsaved_edits);
}

#[test]
fn rejected_save_keeps_edits_pending() {
    let mut remote = FakeRemote::new();
    remote.reject_update = true;
    let mut store = JarStateStore::default();
    store.edit_percent(0, 50.0).expect("edit");
    store.edit_percent(1, 15.0).expect("edit");

    let err = SyncService::save(&mut store, &remote).expect_err("rejected");
    assert!(err.to_string().contains("jar division not found"));
    assert!(store.flags().has_unsaved_edits);
    assert_eq!(store.jars()[0].amount, 550_000);
}

#[test]
fn public_api_summary_and_chart() {
    let mut store = api_create_store(RoundingPolicy::PerJar);
    api_edit_percent(&mut store, 0, 200.0).expect("edit");
    let summary = api_jar_summary(&store);
    assert_eq!(summary.jars.len(), 6);
    assert_eq!(summary.jars[0].percent, 55);
    assert_eq!(summary.jars[0].id, 1);
    assert!(summary.has_unsaved_edits);

    let chart = api_ring_chart(&store, &[], ChartGeometry::default());
    assert_eq!(chart.arcs.len(), 6);
}
