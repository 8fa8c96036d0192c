#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use jar_domain::{Jar, JarCategory};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that survives until the test binary exits.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Jars in canonical order with the given percentages and no amounts.
pub fn jars_with(percentages: [u8; 6]) -> Vec<Jar> {
    JarCategory::ALL
        .into_iter()
        .zip(percentages)
        .map(|(category, percent)| Jar::new(category, percent))
        .collect()
}

/// Small deterministic generator so property checks are reproducible.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    pub fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }

    /// Six percentages summing to exactly 100.
    pub fn full_allocation(&mut self) -> [u8; 6] {
        let mut cuts: Vec<u64> = (0..5).map(|_| self.below(101)).collect();
        cuts.sort_unstable();
        let mut result = [0u8; 6];
        let mut previous = 0;
        for (slot, cut) in result.iter_mut().zip(cuts.iter().copied().chain([100])) {
            *slot = (cut - previous) as u8;
            previous = cut;
        }
        result
    }
}
