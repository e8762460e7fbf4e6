// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! History response type

use serde::{Deserialize, Serialize};

use crate::history::HistoryEntry;

/// Response from the history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<HistoryEntry>,
    pub count: usize,
}

impl HistoryResponse {
    pub fn new(history: Vec<HistoryEntry>) -> Self {
        let count = history.len();
        Self {
            success: true,
            history,
            count,
        }
    }
}
