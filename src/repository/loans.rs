//! Loans collection.
//!
//! Loan ids are creation stamps; every key is checked against the timestamp
//! codec on load so that reports can rely on it.

use crate::{
    error::{AppError, AppResult},
    models::{loan::Loan, stamp::Stamp},
};

use super::store::{Collection, JsonStore, Records};

#[derive(Clone)]
pub struct LoansRepository {
    store: JsonStore,
}

impl LoansRepository {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    pub fn load(&self) -> AppResult<Records<Loan>> {
        let loans: Records<Loan> = self.store.load(Collection::Loans)?;
        if let Some(bad) = loans.keys().find(|id| id.parse::<Stamp>().is_err()) {
            return Err(AppError::CorruptCollection {
                collection: Collection::Loans.name().to_string(),
                message: format!("loan id '{}' is not a YYYY.MM.DD HH.MM.SS timestamp", bad),
            });
        }
        Ok(loans)
    }

    pub fn save(&self, loans: &Records<Loan>) -> AppResult<()> {
        self.store.save(Collection::Loans, loans)
    }

    /// Get loan by ID
    pub fn get_by_id(&self, id: &str) -> AppResult<Loan> {
        self.load()?
            .shift_remove(id)
            .ok_or_else(|| AppError::LoanNotFound(id.to_string()))
    }
}
