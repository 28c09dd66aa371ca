use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::governor::ResultTable;

/// One successfully executed query. Never modified after it is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord {
    pub timestamp: DateTime<Local>,
    pub query: String,
    pub rows: usize,
    pub result: ResultTable,
}

impl QueryRecord {
    pub fn new(query: &str, result: ResultTable) -> Self {
        Self {
            timestamp: Local::now(),
            query: query.to_string(),
            rows: result.num_rows(),
            result,
        }
    }

    /// `[HH:MM:SS] Rows: n`
    pub fn label(&self) -> String {
        format!("[{}] Rows: {}", self.timestamp.format("%H:%M:%S"), self.rows)
    }
}

/// The most recent queries, oldest evicted first once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct QueryHistory {
    capacity: usize,
    records: VecDeque<QueryRecord>,
}

impl QueryHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: QueryRecord) {
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Newest first.
    pub fn recent(&self) -> impl Iterator<Item = &QueryRecord> {
        self.records.iter().rev()
    }

    pub fn latest(&self) -> Option<&QueryRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
