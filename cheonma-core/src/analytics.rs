//! Per-category spending summaries over a time window, plus an explicit
//! TTL cache for them.
//!
//! The cache is an ordinary value owned by the caller. Nothing here keeps
//! process-wide state, so two callers never observe each other's entries.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::category::Category;
use crate::record::{CandidateRecord, ClassificationResult, Direction};

/// A confirmed record with its final category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifiedTransaction {
    pub occurs_at: NaiveDateTime,
    pub amount: u64,
    pub direction: Direction,
    pub category: Category,
    pub subcategory: Option<String>,
}

impl ClassifiedTransaction {
    pub fn new(record: &CandidateRecord, result: &ClassificationResult) -> Self {
        Self {
            occurs_at: record.occurs_at,
            amount: record.amount,
            direction: record.direction,
            category: result.category,
            subcategory: result.subcategory.clone(),
        }
    }
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// The calendar month containing `year`-`month`.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self {
            start: start.and_hms_opt(0, 0, 0)?,
            end: end.and_hms_opt(0, 0, 0)?,
        })
    }

    /// The calendar month containing `at`.
    pub fn month_of(at: NaiveDateTime) -> Option<Self> {
        Self::month(at.year(), at.month())
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: u64,
    pub count: usize,
    /// Share of the total for the same direction (0.0 - 1.0)
    pub share: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub window: TimeWindow,
    pub total_expense: u64,
    pub total_income: u64,
    /// Categories with at least one transaction, in taxonomy order
    pub by_category: Vec<CategoryTotal>,
}

impl Summary {
    pub fn net(&self) -> i128 {
        self.total_income as i128 - self.total_expense as i128
    }

    pub fn total_for(&self, category: Category) -> u64 {
        self.by_category
            .iter()
            .find(|t| t.category == category)
            .map(|t| t.amount)
            .unwrap_or(0)
    }
}

/// Aggregate transactions falling inside `window` by category.
pub fn summarize(txns: &[ClassifiedTransaction], window: TimeWindow) -> Summary {
    let mut amounts = [0u64; Category::ALL.len()];
    let mut counts = [0usize; Category::ALL.len()];
    let mut total_expense = 0u64;
    let mut total_income = 0u64;

    for t in txns.iter().filter(|t| window.contains(t.occurs_at)) {
        let i = t.category.index();
        amounts[i] = amounts[i].saturating_add(t.amount);
        counts[i] += 1;
        match t.direction {
            Direction::Income => total_income = total_income.saturating_add(t.amount),
            Direction::Expense => total_expense = total_expense.saturating_add(t.amount),
        }
    }

    let by_category = Category::ALL
        .into_iter()
        .filter(|c| counts[c.index()] > 0)
        .map(|category| {
            let amount = amounts[category.index()];
            let base = if category.is_income() { total_income } else { total_expense };
            let share = if base == 0 { 0.0 } else { amount as f64 / base as f64 };
            CategoryTotal {
                category,
                amount,
                count: counts[category.index()],
                share: share.min(1.0),
            }
        })
        .collect();

    Summary {
        window,
        total_expense,
        total_income,
        by_category,
    }
}

/// Summaries keyed by window, each valid for `ttl` after it was computed.
#[derive(Debug, Clone)]
pub struct SummaryCache {
    ttl: Duration,
    entries: HashMap<TimeWindow, (NaiveDateTime, Summary)>,
}

impl SummaryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached summary for `window` if it was computed less than `ttl` before `now`.
    pub fn get(&self, window: &TimeWindow, now: NaiveDateTime) -> Option<&Summary> {
        self.entries
            .get(window)
            .filter(|(computed_at, _)| now - *computed_at < self.ttl)
            .map(|(_, summary)| summary)
    }

    /// Return the cached summary, recomputing it when missing or expired.
    pub fn get_or_compute(
        &mut self,
        window: TimeWindow,
        now: NaiveDateTime,
        compute: impl FnOnce() -> Summary,
    ) -> &Summary {
        let fresh = self.get(&window, now).is_some();
        if !fresh {
            tracing::debug!(start = %window.start, end = %window.end, "summary cache miss");
            self.entries.insert(window, (now, compute()));
        }
        &self.entries[&window].1
    }

    /// Drop every entry, e.g. after new transactions were stored.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    /// Drop entries that are expired at `now`.
    pub fn evict_expired(&mut self, now: NaiveDateTime) {
        let ttl = self.ttl;
        self.entries.retain(|_, (computed_at, _)| now - *computed_at < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
