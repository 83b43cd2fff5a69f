//! Item (lendable catalog entry) model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Up to three author names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authors {
    pub author1: Option<String>,
    pub author2: Option<String>,
    pub author3: Option<String>,
}

impl Authors {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [&self.author1, &self.author2, &self.author3]
            .into_iter()
            .filter_map(|a| a.as_deref())
    }
}

/// Item record as stored in the items collection (keyed by id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub active: bool,
    /// Units on the shelf
    pub quantity: u32,
    pub title: String,
    pub publisher: String,
    pub category: String,
    #[serde(default)]
    pub authors: Authors,
    /// Fee charged per day of loan
    pub daily_rate: u64,
}

impl Item {
    /// Can be lent right now
    pub fn is_available(&self) -> bool {
        self.active && self.quantity > 0
    }
}

/// Intake request
#[derive(Debug, Clone, Validate)]
pub struct NewItem {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub publisher: String,
    pub category: String,
    pub quantity: u32,
    pub daily_rate: u64,
    pub author1: Option<String>,
    pub author2: Option<String>,
    pub author3: Option<String>,
}

impl From<NewItem> for Item {
    fn from(i: NewItem) -> Self {
        Self {
            // Items start active only when there is something to lend
            active: i.quantity > 0,
            quantity: i.quantity,
            title: i.title,
            publisher: i.publisher,
            category: i.category,
            authors: Authors {
                author1: i.author1,
                author2: i.author2,
                author3: i.author3,
            },
            daily_rate: i.daily_rate,
        }
    }
}

/// Edit request; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, Validate)]
pub struct ItemChanges {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub publisher: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<u32>,
    pub daily_rate: Option<u64>,
    /// Explicit override of the active flag
    pub active: Option<bool>,
    pub author1: Option<String>,
    pub author2: Option<String>,
    pub author3: Option<String>,
}

impl ItemChanges {
    pub fn apply_to(self, item: &mut Item) {
        if let Some(v) = self.title {
            item.title = v;
        }
        if let Some(v) = self.publisher {
            item.publisher = v;
        }
        if let Some(v) = self.category {
            item.category = v;
        }
        if let Some(v) = self.quantity {
            item.quantity = v;
        }
        if let Some(v) = self.daily_rate {
            item.daily_rate = v;
        }
        if let Some(v) = self.active {
            item.active = v;
        }
        if let Some(v) = self.author1 {
            item.authors.author1 = Some(v);
        }
        if let Some(v) = self.author2 {
            item.authors.author2 = Some(v);
        }
        if let Some(v) = self.author3 {
            item.authors.author3 = Some(v);
        }
    }
}
