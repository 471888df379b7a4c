use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::registration_repository::RegistrationRepository;
use crate::application::use_cases::common::clean_change;
use crate::domain::noticeboard::registration::EventRegistration;

#[derive(Debug, Clone, Default)]
pub struct RegistrationChanges {
    pub notes: Option<Option<String>>,
    /// Staff only.
    pub attended: Option<bool>,
}

pub struct UpdateRegistration<'a, R: RegistrationRepository + ?Sized> {
    pub registrations: &'a R,
}

impl<'a, R: RegistrationRepository + ?Sized> UpdateRegistration<'a, R> {
    pub async fn execute(
        &self,
        identity: &Identity,
        id: Uuid,
        changes: RegistrationChanges,
    ) -> Result<EventRegistration, AppError> {
        let mut registration = self
            .registrations
            .get(id)
            .await?
            .ok_or(AppError::NotFound("registration"))?;
        access::require_owner(identity, &registration)?;
        if let Some(attended) = changes.attended {
            access::require_staff(identity)?;
            registration.attended = attended;
        }
        if let Some(notes) = clean_change(changes.notes) {
            registration.notes = notes;
        }
        self.registrations
            .update(&registration)
            .await?
            .ok_or(AppError::NotFound("registration"))
    }
}
