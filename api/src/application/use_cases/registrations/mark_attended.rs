use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::registration_repository::RegistrationRepository;
use crate::domain::noticeboard::registration::EventRegistration;

pub struct MarkAttended<'a, R: RegistrationRepository + ?Sized> {
    pub registrations: &'a R,
}

impl<'a, R: RegistrationRepository + ?Sized> MarkAttended<'a, R> {
    pub async fn execute(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> Result<EventRegistration, AppError> {
        access::require_staff(identity)?;
        let mut registration = self
            .registrations
            .get(id)
            .await?
            .ok_or(AppError::NotFound("registration"))?;
        registration.attended = true;
        self.registrations
            .update(&registration)
            .await?
            .ok_or(AppError::NotFound("registration"))
    }
}
