use crate::application::access::{self, Identity};
use crate::application::dto::accounts::{AccountChanges, AccountDto};
use crate::application::error::{AppError, FieldErrors};
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::common::{clean_change, require_text};
use crate::domain::accounts::user::User;

/// Applies account and profile edits. Used for both the caller's own
/// profile and staff edits of other accounts; the target must pass the
/// self-or-admin check.
pub struct UpdateAccount<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> UpdateAccount<'a, R> {
    pub async fn execute(
        &self,
        identity: &Identity,
        target: &User,
        changes: AccountChanges,
    ) -> Result<AccountDto, AppError> {
        access::require(
            access::Policy::SelfOrAdmin,
            &access::Actor::User(*identity),
            access::AccessKind::Write,
            target,
        )?;

        let mut user = target.clone();
        let mut errors = FieldErrors::new();
        if let Some(name) = changes.name {
            user.name = require_text(&mut errors, "name", &name);
        }
        if let Some(mobile) = changes.mobile {
            let mobile = require_text(&mut errors, "mobile", &mobile);
            if mobile != user.mobile {
                if let Some(other) = self.repo.find_by_mobile(&mobile).await? {
                    if other.id != user.id {
                        errors.add("mobile", "user with this mobile already exists.");
                    }
                }
            }
            user.mobile = mobile;
        }
        if let Some(address) = clean_change(changes.address) {
            user.address = address;
        }
        if identity.is_staff {
            if let Some(active) = changes.is_active {
                user.is_active = active;
            }
            if let Some(staff) = changes.is_staff {
                user.is_staff = staff;
            }
        } else if changes.is_active.is_some() || changes.is_staff.is_some() {
            return Err(AppError::forbidden());
        }
        errors.into_result()?;

        let user = self
            .repo
            .update_user(&user)
            .await?
            .ok_or(AppError::NotFound("user"))?;

        let mut profile = self.repo.get_profile(user.id).await?;
        let mut profile_dirty = false;
        if let Some(bio) = clean_change(changes.bio) {
            profile.bio = bio;
            profile_dirty = true;
        }
        if let Some(department) = clean_change(changes.department) {
            profile.department = department;
            profile_dirty = true;
        }
        if let Some(student_id) = clean_change(changes.student_id) {
            profile.student_id = student_id;
            profile_dirty = true;
        }
        if profile_dirty {
            profile = self.repo.save_profile(user.id, &profile).await?;
        }
        Ok(AccountDto { user, profile })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryStore;

    #[tokio::test]
    async fn users_edit_their_own_profile() {
        let store = InMemoryStore::default();
        let me = store.seed_user("me@campus.edu", false);
        let uc = UpdateAccount { repo: &store };
        let out = uc
            .execute(
                &Identity::from_user(&me),
                &me,
                AccountChanges {
                    name: Some("New Name".into()),
                    department: Some(Some("Physics".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(out.user.name, "New Name");
        assert_eq!(out.profile.department.as_deref(), Some("Physics"));
    }

    #[tokio::test]
    async fn other_users_are_forbidden_but_staff_may_edit() {
        let store = InMemoryStore::default();
        let target = store.seed_user("t@campus.edu", false);
        let other = store.seed_user("o@campus.edu", false);
        let staff = store.seed_user("s@campus.edu", true);
        let uc = UpdateAccount { repo: &store };
        let denied = uc
            .execute(&Identity::from_user(&other), &target, AccountChanges::default())
            .await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));

        let out = uc
            .execute(
                &Identity::from_user(&staff),
                &target,
                AccountChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!out.user.is_active);
    }

    #[tokio::test]
    async fn regular_users_cannot_grant_themselves_staff() {
        let store = InMemoryStore::default();
        let me = store.seed_user("me@campus.edu", false);
        let uc = UpdateAccount { repo: &store };
        let res = uc
            .execute(
                &Identity::from_user(&me),
                &me,
                AccountChanges {
                    is_staff: Some(true),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(res, Err(AppError::Forbidden(_))));
    }
}
