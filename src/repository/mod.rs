//! Repository layer over the flat-file collections

pub mod ids;
pub mod items;
pub mod loans;
pub mod members;
pub mod store;

pub use store::{Collection, JsonStore, Records};

/// Main repository struct holding the store and one repository per collection
#[derive(Clone)]
pub struct Repository {
    pub store: JsonStore,
    pub members: members::MembersRepository,
    pub items: items::ItemsRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: JsonStore) -> Self {
        Self {
            members: members::MembersRepository::new(store.clone()),
            items: items::ItemsRepository::new(store.clone()),
            loans: loans::LoansRepository::new(store.clone()),
            store,
        }
    }
}
