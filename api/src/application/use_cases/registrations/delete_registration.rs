use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::registration_repository::RegistrationRepository;

pub struct DeleteRegistration<'a, R: RegistrationRepository + ?Sized> {
    pub registrations: &'a R,
}

impl<'a, R: RegistrationRepository + ?Sized> DeleteRegistration<'a, R> {
    pub async fn execute(&self, identity: &Identity, id: Uuid) -> Result<(), AppError> {
        let registration = self
            .registrations
            .get(id)
            .await?
            .ok_or(AppError::NotFound("registration"))?;
        access::require_owner(identity, &registration)?;
        if !self.registrations.delete(id).await? {
            return Err(AppError::NotFound("registration"));
        }
        tracing::info!(registration_id = %id, event_id = %registration.event_id, "event_registration_cancelled");
        Ok(())
    }
}
