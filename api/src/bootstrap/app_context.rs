use std::sync::Arc;

use crate::application::ports::book_repository::BookRepository;
use crate::application::ports::book_request_repository::BookRequestRepository;
use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::event_repository::EventRepository;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::lost_found_repository::LostFoundRepository;
use crate::application::ports::registration_repository::RegistrationRepository;
use crate::application::ports::roommate_repository::RoommateRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::{
    book_repository_sqlx::SqlxBookRepository,
    book_request_repository_sqlx::SqlxBookRequestRepository,
    comment_repository_sqlx::SqlxCommentRepository, event_repository_sqlx::SqlxEventRepository,
    image_repository_sqlx::SqlxImageRepository,
    lost_found_repository_sqlx::SqlxLostFoundRepository,
    registration_repository_sqlx::SqlxRegistrationRepository,
    roommate_repository_sqlx::SqlxRoommateRepository, user_repository_sqlx::SqlxUserRepository,
};

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    book_repo: Arc<dyn BookRepository>,
    book_request_repo: Arc<dyn BookRequestRepository>,
    image_repo: Arc<dyn ImageRepository>,
    lost_found_repo: Arc<dyn LostFoundRepository>,
    event_repo: Arc<dyn EventRepository>,
    registration_repo: Arc<dyn RegistrationRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    roommate_repo: Arc<dyn RoommateRepository>,
    storage_port: Arc<dyn StoragePort>,
    /// Present when backed by Postgres; the health probe pings it.
    pool: Option<PgPool>,
}

impl AppServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        book_repo: Arc<dyn BookRepository>,
        book_request_repo: Arc<dyn BookRequestRepository>,
        image_repo: Arc<dyn ImageRepository>,
        lost_found_repo: Arc<dyn LostFoundRepository>,
        event_repo: Arc<dyn EventRepository>,
        registration_repo: Arc<dyn RegistrationRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        roommate_repo: Arc<dyn RoommateRepository>,
        storage_port: Arc<dyn StoragePort>,
    ) -> Self {
        Self {
            user_repo,
            book_repo,
            book_request_repo,
            image_repo,
            lost_found_repo,
            event_repo,
            registration_repo,
            comment_repo,
            roommate_repo,
            storage_port,
            pool: None,
        }
    }

    /// Wires every repository to the same Postgres pool.
    pub fn postgres(pool: PgPool, storage_port: Arc<dyn StoragePort>) -> Self {
        let mut services = Self::new(
            Arc::new(SqlxUserRepository::new(pool.clone())),
            Arc::new(SqlxBookRepository::new(pool.clone())),
            Arc::new(SqlxBookRequestRepository::new(pool.clone())),
            Arc::new(SqlxImageRepository::new(pool.clone())),
            Arc::new(SqlxLostFoundRepository::new(pool.clone())),
            Arc::new(SqlxEventRepository::new(pool.clone())),
            Arc::new(SqlxRegistrationRepository::new(pool.clone())),
            Arc::new(SqlxCommentRepository::new(pool.clone())),
            Arc::new(SqlxRoommateRepository::new(pool.clone())),
            storage_port,
        );
        services.pool = Some(pool);
        services
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn book_repo(&self) -> Arc<dyn BookRepository> {
        self.services.book_repo.clone()
    }

    pub fn book_request_repo(&self) -> Arc<dyn BookRequestRepository> {
        self.services.book_request_repo.clone()
    }

    pub fn image_repo(&self) -> Arc<dyn ImageRepository> {
        self.services.image_repo.clone()
    }

    pub fn lost_found_repo(&self) -> Arc<dyn LostFoundRepository> {
        self.services.lost_found_repo.clone()
    }

    pub fn event_repo(&self) -> Arc<dyn EventRepository> {
        self.services.event_repo.clone()
    }

    pub fn registration_repo(&self) -> Arc<dyn RegistrationRepository> {
        self.services.registration_repo.clone()
    }

    pub fn comment_repo(&self) -> Arc<dyn CommentRepository> {
        self.services.comment_repo.clone()
    }

    pub fn roommate_repo(&self) -> Arc<dyn RoommateRepository> {
        self.services.roommate_repo.clone()
    }

    pub fn storage_port(&self) -> Arc<dyn StoragePort> {
        self.services.storage_port.clone()
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.services.pool.as_ref()
    }
}
