// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::wire::{HomeBreakdown, HomeSummary};
use std::collections::HashMap;

/// Dashboard aggregates keyed by period (`YYYY-MM`).
///
/// Owned by [`crate::store::DataStore`]; cleared whenever the session changes.
#[derive(Debug, Default)]
pub struct DashboardCache {
    summaries: HashMap<String, HomeSummary>,
    breakdowns: HashMap<String, HomeBreakdown>,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self, period: &str) -> Option<&HomeSummary> {
        self.summaries.get(period)
    }

    pub fn breakdown(&self, period: &str) -> Option<&HomeBreakdown> {
        self.breakdowns.get(period)
    }

    pub fn put_summary(&mut self, period: &str, summary: HomeSummary) {
        self.summaries.insert(period.to_string(), summary);
    }

    pub fn put_breakdown(&mut self, period: &str, breakdown: HomeBreakdown) {
        self.breakdowns.insert(period.to_string(), breakdown);
    }

    pub fn invalidate(&mut self) {
        self.summaries.clear();
        self.breakdowns.clear();
    }

    pub fn len(&self) -> usize {
        self.summaries.len() + self.breakdowns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
