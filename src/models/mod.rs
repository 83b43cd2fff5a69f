//! Data models for Elidune Desk

pub mod enums;
pub mod item;
pub mod loan;
pub mod member;
pub mod report;
pub mod stamp;

// Re-export commonly used types
pub use enums::Deactivation;
pub use item::{Item, ItemChanges, NewItem};
pub use loan::{CreateLoan, Loan, LoanTerm, ReturnOutcome};
pub use member::{Member, MemberChanges, NewMember};
pub use stamp::Stamp;
