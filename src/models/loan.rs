//! Loan model and related types

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use super::stamp::Stamp;
use crate::error::AppError;

/// Loan duration selected at registration, stored as its numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum LoanTerm {
    Weekly = 1,
    Fortnight = 2,
    Monthly = 3,
}

impl LoanTerm {
    pub const ALL: [LoanTerm; 3] = [LoanTerm::Weekly, LoanTerm::Fortnight, LoanTerm::Monthly];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Number of days the item may be kept
    pub fn days(self) -> u32 {
        match self {
            LoanTerm::Weekly => 7,
            LoanTerm::Fortnight => 15,
            LoanTerm::Monthly => 30,
        }
    }
}

impl TryFrom<u8> for LoanTerm {
    type Error = AppError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(LoanTerm::Weekly),
            2 => Ok(LoanTerm::Fortnight),
            3 => Ok(LoanTerm::Monthly),
            other => Err(AppError::InvalidTermCode(other)),
        }
    }
}

impl From<LoanTerm> for u8 {
    fn from(term: LoanTerm) -> Self {
        term.code()
    }
}

impl std::fmt::Display for LoanTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoanTerm::Weekly => "Weekly",
            LoanTerm::Fortnight => "15 days",
            LoanTerm::Monthly => "Monthly",
        };
        write!(f, "{}", label)
    }
}

/// Loan record as stored in the loans collection.
///
/// The collection key is the creation [`Stamp`], which doubles as the
/// loan identifier.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub member_id: String,
    pub item_id: String,
    pub term: LoanTerm,
    /// Total fee, frozen at creation
    pub fee: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub due_at: Stamp,
    #[serde(default)]
    pub returned: bool,
}

impl Loan {
    /// Not returned and past its due date. A loan due exactly at `now` is not overdue.
    pub fn is_overdue(&self, now: Stamp) -> bool {
        !self.returned && self.due_at < now
    }
}

/// Create loan request
#[derive(Debug, Clone)]
pub struct CreateLoan {
    pub member_id: String,
    pub item_id: String,
    pub term_code: u8,
}

/// Outcome of a return request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    Returned,
    AlreadyReturned,
}
