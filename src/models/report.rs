//! Report rows produced by the statistics service

use super::{loan::LoanTerm, stamp::Stamp};

/// One loan created during the current month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub loan_id: String,
    pub member_id: String,
    pub item_id: String,
    pub term: LoanTerm,
    pub due_at: Stamp,
    pub returned: bool,
    pub fee: u64,
}

/// What an annual matrix accumulates per loan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixMetric {
    /// One per loan
    Count,
    /// The loan's frozen fee
    Revenue,
}

/// Twelve monthly buckets, January first
pub type MonthBuckets = [u64; 12];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow {
    pub item_id: String,
    pub title: String,
    pub months: MonthBuckets,
}

impl MatrixRow {
    pub fn total(&self) -> u64 {
        self.months.iter().sum()
    }
}

/// Per-item, per-month aggregation of the loans created in one year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnualMatrix {
    pub year: i32,
    pub metric: MatrixMetric,
    /// One row per item, in catalog order
    pub rows: Vec<MatrixRow>,
    /// Column sums across all rows
    pub totals: MonthBuckets,
}

/// A loan past its due date and not returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueEntry {
    pub loan_id: String,
    pub member_id: String,
    pub member_name: String,
    pub item_id: String,
    pub term: LoanTerm,
    pub fee: u64,
    pub due_at: Stamp,
    /// Whole days since the due date, rounded down
    pub days_overdue: i64,
}
