//! Members collection

use crate::{
    error::{AppError, AppResult},
    models::member::Member,
};

use super::store::{Collection, JsonStore, Records};

#[derive(Clone)]
pub struct MembersRepository {
    store: JsonStore,
}

impl MembersRepository {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    pub fn load(&self) -> AppResult<Records<Member>> {
        self.store.load(Collection::Members)
    }

    pub fn save(&self, members: &Records<Member>) -> AppResult<()> {
        self.store.save(Collection::Members, members)
    }

    /// Get member by ID
    pub fn get_by_id(&self, id: &str) -> AppResult<Member> {
        self.load()?
            .shift_remove(id)
            .ok_or_else(|| AppError::MemberNotFound(id.to_string()))
    }
}
