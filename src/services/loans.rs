//! Loan management service

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::{
        item::Item,
        loan::{CreateLoan, Loan, LoanTerm, ReturnOutcome},
        stamp::Stamp,
    },
    repository::{Records, Repository},
};

use super::pricing;

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LoansConfig,
}

impl LoansService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    /// Get a loan by its id
    pub fn get_loan(&self, loan_id: &str) -> AppResult<Loan> {
        self.repository.loans.get_by_id(loan_id)
    }

    /// All loans in registration order
    pub fn list_loans(&self) -> AppResult<Records<Loan>> {
        self.repository.loans.load()
    }

    /// Create a new loan stamped with the current time
    pub fn create_loan(&self, loan: CreateLoan) -> AppResult<(String, Loan)> {
        self.create_loan_at(loan, Stamp::now())
    }

    /// Create a new loan stamped `now`.
    ///
    /// Every check runs before anything is written: a rejected request leaves
    /// both the items and loans collections untouched. On success the item
    /// loses exactly one unit of stock.
    pub fn create_loan_at(&self, loan: CreateLoan, now: Stamp) -> AppResult<(String, Loan)> {
        let members = self.repository.members.load()?;
        let mut items = self.repository.items.load()?;
        let mut loans = self.repository.loans.load()?;

        if !members.get(&loan.member_id).is_some_and(|m| m.active) {
            return Err(AppError::UnknownOrInactiveMember(loan.member_id));
        }

        let daily_rate = match items.get(&loan.item_id) {
            Some(item) if item.is_available() => item.daily_rate,
            _ => return Err(AppError::UnknownOrInactiveItem(loan.item_id)),
        };

        let term = LoanTerm::try_from(loan.term_code)?;
        let quote = pricing::quote(now, term, daily_rate)?;

        let loan_id = now.to_string();
        if loans.contains_key(&loan_id) {
            tracing::warn!("Rejected loan for member {}: id {} already taken", loan.member_id, loan_id);
            return Err(AppError::DuplicateLoanId(loan_id));
        }

        let items_before = items.clone();
        if let Some(item) = items.get_mut(&loan.item_id) {
            item.quantity -= 1;
        }

        let record = Loan {
            member_id: loan.member_id,
            item_id: loan.item_id,
            term,
            fee: quote.fee,
            due_at: quote.due_at,
            returned: false,
        };
        loans.insert(loan_id.clone(), record.clone());

        // Stock first: a loan on disk always has its unit taken
        self.repository.items.save(&items)?;
        if let Err(e) = self.repository.loans.save(&loans) {
            self.restore_items(&items_before);
            return Err(e);
        }

        tracing::info!(
            "Loan {} registered: member={} item={} term={} fee={} due={}",
            loan_id, record.member_id, record.item_id, term.code(), record.fee, record.due_at
        );

        Ok((loan_id, record))
    }

    /// Mark a loan as returned.
    ///
    /// A loan already returned is reported as such and nothing is written.
    /// Stock is only put back when `loans.restock_on_return` is enabled.
    pub fn return_loan(&self, loan_id: &str) -> AppResult<ReturnOutcome> {
        let mut loans = self.repository.loans.load()?;
        let loan = loans
            .get_mut(loan_id)
            .ok_or_else(|| AppError::LoanNotFound(loan_id.to_string()))?;

        if loan.returned {
            tracing::info!("Loan {} was already returned", loan_id);
            return Ok(ReturnOutcome::AlreadyReturned);
        }
        loan.returned = true;

        let restocked = if self.config.restock_on_return {
            self.restock(loan_id, &loan.item_id)?
        } else {
            None
        };

        if let Err(e) = self.repository.loans.save(&loans) {
            if let Some(items_before) = restocked {
                self.restore_items(&items_before);
            }
            return Err(e);
        }

        tracing::info!("Loan {} returned", loan_id);
        Ok(ReturnOutcome::Returned)
    }

    /// Put one unit of `item_id` back and save the items.
    /// Returns the collection as it was before, if anything was written.
    fn restock(&self, loan_id: &str, item_id: &str) -> AppResult<Option<Records<Item>>> {
        let mut items = self.repository.items.load()?;
        let items_before = items.clone();
        match items.get_mut(item_id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                self.repository.items.save(&items)?;
                Ok(Some(items_before))
            }
            None => {
                tracing::warn!("Returned loan {} references unknown item {}", loan_id, item_id);
                Ok(None)
            }
        }
    }

    /// Best-effort rollback of a stock change after the loans save failed
    fn restore_items(&self, items: &Records<Item>) {
        if let Err(e) = self.repository.items.save(items) {
            tracing::error!("Could not roll back items after a failed loans save: {}", e);
        }
    }
}
