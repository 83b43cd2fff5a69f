//! Member directory service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        member::{Member, MemberChanges, NewMember},
        Deactivation,
    },
    repository::{ids, Repository},
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get member by ID
    pub fn get_member(&self, id: &str) -> AppResult<Member> {
        self.repository.members.get_by_id(id)
    }

    /// Register a new member under the next free id
    pub fn register(&self, member: NewMember) -> AppResult<(String, Member)> {
        member.validate()?;

        let mut members = self.repository.members.load()?;
        let id = ids::next_member_id(&members)?;
        let record = Member::from(member);
        members.insert(id.clone(), record.clone());
        self.repository.members.save(&members)?;

        tracing::info!("Member {} registered ({})", id, record.full_name());
        Ok((id, record))
    }

    /// Update member fields; unset fields are left as they are
    pub fn update(&self, id: &str, changes: MemberChanges) -> AppResult<Member> {
        changes.validate()?;

        let mut members = self.repository.members.load()?;
        let member = members
            .get_mut(id)
            .ok_or_else(|| AppError::MemberNotFound(id.to_string()))?;
        changes.apply_to(member);
        let updated = member.clone();
        self.repository.members.save(&members)?;

        tracing::info!("Member {} updated", id);
        Ok(updated)
    }

    /// Logical delete. The record stays in the collection with `active = false`.
    pub fn deactivate(&self, id: &str) -> AppResult<Deactivation> {
        let mut members = self.repository.members.load()?;
        let member = members
            .get_mut(id)
            .ok_or_else(|| AppError::MemberNotFound(id.to_string()))?;

        if !member.active {
            return Ok(Deactivation::AlreadyInactive);
        }
        member.active = false;
        self.repository.members.save(&members)?;

        tracing::info!("Member {} deactivated", id);
        Ok(Deactivation::Deactivated)
    }

    /// Active members in registration order
    pub fn list_active(&self) -> AppResult<Vec<(String, Member)>> {
        Ok(self
            .repository
            .members
            .load()?
            .into_iter()
            .filter(|(_, m)| m.active)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::JsonStore;
    use tempfile::TempDir;

    fn service() -> (TempDir, MembersService) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path());
        store.ensure_collections().unwrap();
        (dir, MembersService::new(Repository::new(store)))
    }

    fn new_member(first: &str) -> NewMember {
        NewMember {
            first_name: first.into(),
            last_name: "Gómez".into(),
            address: "Calle 1".into(),
            email: format!("{}@uni.edu", first.to_lowercase()),
            program: "Physics".into(),
            phone1: None,
            phone2: None,
            phone3: None,
        }
    }

    #[test]
    fn test_ids_start_at_1001() {
        let (_dir, svc) = service();
        assert_eq!(svc.register(new_member("Ana")).unwrap().0, "1001");
        assert_eq!(svc.register(new_member("Luis")).unwrap().0, "1002");
    }

    #[test]
    fn test_invalid_member_not_stored() {
        let (_dir, svc) = service();
        let mut m = new_member("Ana");
        m.phone1 = Some("123".into());
        assert!(matches!(svc.register(m), Err(AppError::Validation(_))));
        assert!(svc.list_active().unwrap().is_empty());
    }

    #[test]
    fn test_deactivate_keeps_record() {
        let (_dir, svc) = service();
        let (id, _) = svc.register(new_member("Ana")).unwrap();
        assert_eq!(svc.deactivate(&id).unwrap(), Deactivation::Deactivated);
        assert_eq!(svc.deactivate(&id).unwrap(), Deactivation::AlreadyInactive);
        assert!(!svc.get_member(&id).unwrap().active);
        assert!(svc.list_active().unwrap().is_empty());
        // Deactivated ids are never handed out again
        assert_eq!(svc.register(new_member("Luis")).unwrap().0, "1002");
    }

    #[test]
    fn test_update() {
        let (_dir, svc) = service();
        let (id, _) = svc.register(new_member("Ana")).unwrap();
        let updated = svc
            .update(
                &id,
                MemberChanges {
                    address: Some("Calle 2".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.address, "Calle 2");
        assert_eq!(svc.get_member(&id).unwrap().address, "Calle 2");
        assert!(matches!(
            svc.update("4242", MemberChanges::default()),
            Err(AppError::MemberNotFound(_))
        ));
    }
}
