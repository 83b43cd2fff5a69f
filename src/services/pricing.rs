//! Due date and fee computation

use crate::{
    error::{AppError, AppResult},
    models::{loan::LoanTerm, stamp::Stamp},
};

/// Fee and due date stamped on a new loan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanQuote {
    pub fee: u64,
    pub due_at: Stamp,
}

/// Price a loan created at `created_at` for `term` on an item charging `daily_rate` per day
pub fn quote(created_at: Stamp, term: LoanTerm, daily_rate: u64) -> AppResult<LoanQuote> {
    let days = term.days();
    let fee = daily_rate.checked_mul(u64::from(days)).ok_or_else(|| {
        AppError::Validation(format!("fee overflows for daily rate {}", daily_rate))
    })?;
    Ok(LoanQuote {
        fee,
        due_at: created_at.plus_days(i64::from(days)),
    })
}
