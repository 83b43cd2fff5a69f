//! Statistics service: monthly ledger, annual matrices and overdue loans.
//!
//! Everything here is read-only. Joins against members and items ignore the
//! active flag, so loans of since-deactivated records still show up.

use crate::{
    config::ReportsConfig,
    error::{AppError, AppResult},
    models::{
        report::{AnnualMatrix, LedgerEntry, MatrixMetric, MatrixRow, MonthBuckets, OverdueEntry},
        stamp::Stamp,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
    config: ReportsConfig,
}

impl StatsService {
    pub fn new(repository: Repository, config: ReportsConfig) -> Self {
        Self { repository, config }
    }

    /// Accepted range for annual reports
    pub fn year_range(&self) -> (i32, i32) {
        (self.config.min_year, self.config.max_year)
    }

    pub fn check_year(&self, year: i32) -> AppResult<()> {
        let (min, max) = self.year_range();
        if (min..=max).contains(&year) {
            Ok(())
        } else {
            Err(AppError::YearOutOfRange { year, min, max })
        }
    }

    /// Loans created in the current calendar month
    pub fn monthly_ledger(&self) -> AppResult<Vec<LedgerEntry>> {
        self.monthly_ledger_at(Stamp::now())
    }

    /// Loans created in the calendar month containing `now`
    pub fn monthly_ledger_at(&self, now: Stamp) -> AppResult<Vec<LedgerEntry>> {
        let loans = self.repository.loans.load()?;

        let mut entries = Vec::new();
        for (loan_id, loan) in loans {
            let created: Stamp = loan_id.parse()?;
            if created.year() != now.year() || created.month() != now.month() {
                continue;
            }
            entries.push(LedgerEntry {
                loan_id,
                member_id: loan.member_id,
                item_id: loan.item_id,
                term: loan.term,
                due_at: loan.due_at,
                returned: loan.returned,
                fee: loan.fee,
            });
        }
        Ok(entries)
    }

    /// Number of loans per item and month of `year`
    pub fn annual_loan_counts(&self, year: i32) -> AppResult<AnnualMatrix> {
        self.annual_matrix(year, MatrixMetric::Count)
    }

    /// Fees per item and month of `year`
    pub fn annual_revenue(&self, year: i32) -> AppResult<AnnualMatrix> {
        self.annual_matrix(year, MatrixMetric::Revenue)
    }

    fn annual_matrix(&self, year: i32, metric: MatrixMetric) -> AppResult<AnnualMatrix> {
        self.check_year(year)?;

        let items = self.repository.items.load()?;
        let loans = self.repository.loans.load()?;

        let mut rows: Vec<MatrixRow> = items
            .iter()
            .map(|(id, item)| MatrixRow {
                item_id: id.clone(),
                title: item.title.clone(),
                months: [0; 12],
            })
            .collect();

        for (loan_id, loan) in &loans {
            let created: Stamp = loan_id.parse()?;
            if created.year() != year {
                continue;
            }
            // Loans whose item has left the catalog are not counted
            let Some(row) = items.get_index_of(&loan.item_id) else {
                tracing::debug!("Loan {} references unknown item {}", loan_id, loan.item_id);
                continue;
            };
            let amount = match metric {
                MatrixMetric::Count => 1,
                MatrixMetric::Revenue => loan.fee,
            };
            let bucket = &mut rows[row].months[created.month() as usize - 1];
            *bucket = bucket.saturating_add(amount);
        }

        let mut totals: MonthBuckets = [0; 12];
        for row in &rows {
            for (total, value) in totals.iter_mut().zip(row.months) {
                *total = total.saturating_add(value);
            }
        }

        Ok(AnnualMatrix {
            year,
            metric,
            rows,
            totals,
        })
    }

    /// Loans not returned whose due date has passed
    pub fn overdue_loans(&self) -> AppResult<Vec<OverdueEntry>> {
        self.overdue_loans_at(Stamp::now())
    }

    /// Loans not returned and due strictly before `now`
    pub fn overdue_loans_at(&self, now: Stamp) -> AppResult<Vec<OverdueEntry>> {
        let members = self.repository.members.load()?;
        let loans = self.repository.loans.load()?;

        let entries = loans
            .into_iter()
            .filter(|(_, loan)| loan.is_overdue(now))
            .map(|(loan_id, loan)| {
                let member_name = match members.get(&loan.member_id) {
                    Some(member) => member.full_name(),
                    None => {
                        tracing::warn!("Overdue loan {} references unknown member {}", loan_id, loan.member_id);
                        String::new()
                    }
                };
                OverdueEntry {
                    days_overdue: loan.due_at.whole_days_until(now),
                    loan_id,
                    member_name,
                    member_id: loan.member_id,
                    item_id: loan.item_id,
                    term: loan.term,
                    fee: loan.fee,
                    due_at: loan.due_at,
                }
            })
            .collect();
        Ok(entries)
    }
}
