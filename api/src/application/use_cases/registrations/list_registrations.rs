use crate::application::access::Identity;
use crate::application::error::AppError;
use crate::application::ports::registration_repository::{
    RegistrationFilter, RegistrationRepository,
};
use crate::domain::noticeboard::registration::EventRegistration;

/// Regular users only ever see their own registrations.
pub struct ListRegistrations<'a, R: RegistrationRepository + ?Sized> {
    pub registrations: &'a R,
}

impl<'a, R: RegistrationRepository + ?Sized> ListRegistrations<'a, R> {
    pub async fn execute(
        &self,
        identity: &Identity,
        mut filter: RegistrationFilter,
    ) -> Result<Vec<EventRegistration>, AppError> {
        if !identity.is_staff {
            filter.user_id = Some(identity.id);
        }
        Ok(self.registrations.list(&filter).await?)
    }
}
