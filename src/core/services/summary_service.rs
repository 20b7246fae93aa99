use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::{SummaryPeriod, Transaction, TransactionKind};

/// Income and expense totals for one aggregation scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub period: SummaryPeriod,
    pub income: f64,
    pub expense: f64,
    /// Expense totals per category. Income never appears here.
    pub categories: BTreeMap<String, f64>,
}

impl Summary {
    pub fn empty(period: SummaryPeriod) -> Self {
        Self {
            period,
            income: 0.0,
            expense: 0.0,
            categories: BTreeMap::new(),
        }
    }

    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Pure aggregation over a borrowed set of transactions.
pub struct SummaryService;

impl SummaryService {
    /// Income minus expense across every record given.
    pub fn balance<'a, I>(records: I) -> f64
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        records.into_iter().map(Transaction::signed_amount).sum()
    }

    pub fn summarize<'a, I>(records: I, period: &SummaryPeriod, now: NaiveDate) -> Summary
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut summary = Summary::empty(period.clone());
        for txn in records
            .into_iter()
            .filter(|txn| period.contains(txn.date, now))
        {
            match txn.kind {
                TransactionKind::Income => summary.income += txn.amount,
                TransactionKind::Expense => {
                    summary.expense += txn.amount;
                    *summary
                        .categories
                        .entry(txn.category.clone())
                        .or_insert(0.0) += txn.amount;
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(kind: TransactionKind, amount: f64, category: &str, on: NaiveDate) -> Transaction {
        Transaction {
            id: TransactionId::remote(format!("{category}-{on}-{amount}")),
            description: category.into(),
            amount,
            kind,
            category: category.into(),
            date: on,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn(TransactionKind::Income, 100.0, "salary", date(2024, 1, 1)),
            txn(TransactionKind::Expense, 30.0, "food", date(2024, 1, 2)),
        ]
    }

    #[test]
    fn balance_subtracts_expenses() {
        assert_eq!(SummaryService::balance(&sample()), 70.0);
    }

    #[test]
    fn balance_is_order_independent() {
        let mut records = sample();
        records.push(txn(TransactionKind::Expense, 12.5, "fun", date(2023, 5, 1)));
        let forward = SummaryService::balance(&records);
        records.reverse();
        assert_eq!(SummaryService::balance(&records), forward);
    }

    #[test]
    fn monthly_summary_breaks_out_expense_categories() {
        let summary =
            SummaryService::summarize(&sample(), &SummaryPeriod::Monthly, date(2024, 1, 15));
        assert_eq!(summary.income, 100.0);
        assert_eq!(summary.expense, 30.0);
        assert_eq!(summary.categories.len(), 1);
        assert_eq!(summary.categories["food"], 30.0);
        assert_eq!(summary.period, SummaryPeriod::Monthly);
    }

    #[test]
    fn weekly_summary_excludes_old_records() {
        let records = vec![
            txn(TransactionKind::Expense, 10.0, "old", date(2024, 1, 1)),
            txn(TransactionKind::Expense, 20.0, "recent", date(2024, 1, 8)),
        ];
        let summary =
            SummaryService::summarize(&records, &SummaryPeriod::Weekly, date(2024, 1, 10));
        assert_eq!(summary.expense, 20.0);
        assert!(!summary.categories.contains_key("old"));
    }

    #[test]
    fn unknown_period_yields_empty_summary() {
        let period = SummaryPeriod::from_tag("quarterly");
        let summary = SummaryService::summarize(&sample(), &period, date(2024, 1, 15));
        assert_eq!(summary, Summary::empty(period));
    }

    #[test]
    fn summarize_is_repeatable() {
        let records = sample();
        let now = date(2024, 1, 15);
        let first = SummaryService::summarize(&records, &SummaryPeriod::All, now);
        let second = SummaryService::summarize(&records, &SummaryPeriod::All, now);
        assert_eq!(first, second);
        assert_eq!(first.net(), 70.0);
    }
}
