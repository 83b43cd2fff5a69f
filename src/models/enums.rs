//! Shared domain enums

/// Outcome of a logical delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deactivation {
    Deactivated,
    AlreadyInactive,
}
