#![forbid(unsafe_code)]

//! Bounded log of synchronizer triggers, exportable as JSONL.
//!
//! Each line is one [`TraceRecord`]:
//!
//! ```text
//! {"seq":0,"trigger":"structural_load","result":"scheduled","delay_ms":100}
//! {"seq":1,"trigger":"initial_timer","result":"synced","outcome":"scrolled","id":"rules","request":{"top":680.0,"behavior":"smooth"}}
//! ```

use std::collections::VecDeque;

use serde::Serialize;

use crate::lifecycle::TriggerOutcome;

/// Default number of records kept before the oldest are dropped.
pub const DEFAULT_TRACE_CAPACITY: usize = 256;

/// Which host notification (or embedder call) caused a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    StructuralLoad,
    InitialTimer,
    HashChange,
    Manual,
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRecord {
    /// Monotonic across the synchronizer's lifetime, even after eviction.
    pub seq: u64,
    pub trigger: Trigger,
    #[serde(flatten)]
    pub outcome: TriggerOutcome,
}

#[derive(Debug, Clone)]
pub struct SyncTrace {
    records: VecDeque<TraceRecord>,
    capacity: usize,
    next_seq: u64,
}

impl Default for SyncTrace {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TRACE_CAPACITY)
    }
}

impl SyncTrace {
    /// A capacity of zero keeps nothing but still advances `seq`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(DEFAULT_TRACE_CAPACITY)),
            capacity,
            next_seq: 0,
        }
    }

    pub fn push(&mut self, trigger: Trigger, outcome: TriggerOutcome) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(TraceRecord {
            seq,
            trigger,
            outcome,
        });
    }

    pub fn records(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// One JSON object per line, oldest first, newline-terminated.
    pub fn to_jsonl(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}
