//! Identifier allocation for members and items.
//!
//! The next identifier is always derived from the largest one currently in
//! the collection, so ids of deactivated records are never reused.

use crate::error::{AppError, AppResult};

use super::store::Records;

/// First member id handed out in an empty collection
pub const FIRST_MEMBER_ID: u32 = 1001;

/// Next member id: max existing + 1, or 1001 for an empty collection
pub fn next_member_id<T>(members: &Records<T>) -> AppResult<String> {
    let mut max: Option<u32> = None;
    for key in members.keys() {
        let id = key
            .parse::<u32>()
            .map_err(|_| AppError::InvalidIdentifierFormat(key.clone()))?;
        max = max.max(Some(id));
    }

    match max {
        None => Ok(FIRST_MEMBER_ID.to_string()),
        Some(max) => max
            .checked_add(1)
            .map(|next| next.to_string())
            .ok_or_else(|| AppError::InvalidIdentifierFormat(max.to_string())),
    }
}

/// Next item id: `prefix` + zero-padded (max numeric suffix + 1), or `prefix` + "001"
pub fn next_item_id<T>(prefix: char, items: &Records<T>) -> AppResult<String> {
    let mut max: Option<u32> = None;
    for key in items.keys() {
        let number = parse_item_suffix(prefix, key)?;
        max = max.max(Some(number));
    }

    let next = match max {
        None => 1,
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| AppError::InvalidIdentifierFormat(format!("{}{}", prefix, max)))?,
    };
    Ok(format!("{}{:03}", prefix, next))
}

fn parse_item_suffix(prefix: char, key: &str) -> AppResult<u32> {
    let invalid = || AppError::InvalidIdentifierFormat(key.to_string());
    let suffix = key.strip_prefix(prefix).ok_or_else(invalid)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    suffix.parse().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(ids: &[&str]) -> Records<()> {
        ids.iter().map(|id| (id.to_string(), ())).collect()
    }

    #[test]
    fn test_first_member_id() {
        assert_eq!(next_member_id(&keys(&[])).unwrap(), "1001");
    }

    #[test]
    fn test_member_id_follows_max_not_count() {
        assert_eq!(next_member_id(&keys(&["1001", "1007", "1003"])).unwrap(), "1008");
    }

    #[test]
    fn test_member_id_rejects_non_numeric_key() {
        assert!(matches!(
            next_member_id(&keys(&["1001", "abc"])),
            Err(AppError::InvalidIdentifierFormat(k)) if k == "abc"
        ));
    }

    #[test]
    fn test_first_item_id() {
        assert_eq!(next_item_id('L', &keys(&[])).unwrap(), "L001");
    }

    #[test]
    fn test_item_id_follows_max_suffix() {
        assert_eq!(next_item_id('L', &keys(&["L001", "L012", "L004"])).unwrap(), "L013");
    }

    #[test]
    fn test_item_id_grows_past_three_digits() {
        assert_eq!(next_item_id('L', &keys(&["L999"])).unwrap(), "L1000");
    }

    #[test]
    fn test_item_id_rejects_wrong_shape() {
        assert!(next_item_id('L', &keys(&["B001"])).is_err());
        assert!(next_item_id('L', &keys(&["L"])).is_err());
        assert!(next_item_id('L', &keys(&["L0x1"])).is_err());
    }
}
