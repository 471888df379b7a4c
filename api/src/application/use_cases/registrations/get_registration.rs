use uuid::Uuid;

use crate::application::access::Identity;
use crate::application::error::AppError;
use crate::application::ports::registration_repository::RegistrationRepository;
use crate::domain::noticeboard::registration::EventRegistration;

pub struct GetRegistration<'a, R: RegistrationRepository + ?Sized> {
    pub registrations: &'a R,
}

impl<'a, R: RegistrationRepository + ?Sized> GetRegistration<'a, R> {
    pub async fn execute(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> Result<EventRegistration, AppError> {
        self.registrations
            .get(id)
            .await?
            .filter(|r| identity.is_staff || r.user_id == identity.id)
            .ok_or(AppError::NotFound("registration"))
    }
}
