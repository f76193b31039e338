use std::sync::Arc;

use adapter::{
    database::ConnectionPool,
    redis::RedisClient,
    repository::{
        auth::AuthRepositoryImpl, booking::BookingRepositoryImpl,
        health::HealthCheckRepositoryImpl, space::SpaceRepositoryImpl, user::UserRepositoryImpl,
    },
};
use kernel::model::booking::{admission::BookingPolicy, retention::RetentionPolicy};
use kernel::repository::{
    auth::AuthRepository, booking::BookingRepository, health::HealthCheckRepository,
    space::SpaceRepository, user::UserRepository,
};
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    space_repository: Arc<dyn SpaceRepository>,
    booking_repository: Arc<dyn BookingRepository>,
    user_repository: Arc<dyn UserRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    retention_policy: RetentionPolicy,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, redis_client: Arc<RedisClient>, app_config: &AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let space_repository = Arc::new(SpaceRepositoryImpl::new(pool.clone()));
        let booking_repository = Arc::new(BookingRepositoryImpl::new(
            pool.clone(),
            BookingPolicy::from(&app_config.booking),
        ));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            redis_client.clone(),
            app_config.auth.ttl,
        ));
        Self {
            health_check_repository,
            space_repository,
            booking_repository,
            user_repository,
            auth_repository,
            retention_policy: RetentionPolicy::from(&app_config.retention),
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn space_repository(&self) -> Arc<dyn SpaceRepository> {
        self.space_repository.clone()
    }

    pub fn booking_repository(&self) -> Arc<dyn BookingRepository> {
        self.booking_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn retention_policy(&self) -> &RetentionPolicy {
        &self.retention_policy
    }
}

/// Wires arbitrary repository implementations, typically mocks, into a registry.
#[cfg(feature = "test-utils")]
#[derive(Default)]
pub struct AppRegistryBuilder {
    health_check_repository: Option<Arc<dyn HealthCheckRepository>>,
    space_repository: Option<Arc<dyn SpaceRepository>>,
    booking_repository: Option<Arc<dyn BookingRepository>>,
    user_repository: Option<Arc<dyn UserRepository>>,
    auth_repository: Option<Arc<dyn AuthRepository>>,
    retention_policy: RetentionPolicy,
}

#[cfg(feature = "test-utils")]
impl AppRegistryBuilder {
    pub fn health_check(mut self, repo: impl HealthCheckRepository + 'static) -> Self {
        self.health_check_repository = Some(Arc::new(repo));
        self
    }

    pub fn space(mut self, repo: impl SpaceRepository + 'static) -> Self {
        self.space_repository = Some(Arc::new(repo));
        self
    }

    pub fn booking(mut self, repo: impl BookingRepository + 'static) -> Self {
        self.booking_repository = Some(Arc::new(repo));
        self
    }

    pub fn user(mut self, repo: impl UserRepository + 'static) -> Self {
        self.user_repository = Some(Arc::new(repo));
        self
    }

    pub fn auth(mut self, repo: impl AuthRepository + 'static) -> Self {
        self.auth_repository = Some(Arc::new(repo));
        self
    }

    pub fn retention_policy(mut self, policy: RetentionPolicy) -> Self {
        self.retention_policy = policy;
        self
    }

    /// Repositories left unset become mocks with no expectations, so any
    /// call into them fails the test.
    pub fn build(self) -> AppRegistry {
        use kernel::repository::{
            auth::MockAuthRepository, booking::MockBookingRepository,
            health::MockHealthCheckRepository, space::MockSpaceRepository,
            user::MockUserRepository,
        };
        AppRegistry {
            health_check_repository: self
                .health_check_repository
                .unwrap_or_else(|| Arc::new(MockHealthCheckRepository::new())),
            space_repository: self
                .space_repository
                .unwrap_or_else(|| Arc::new(MockSpaceRepository::new())),
            booking_repository: self
                .booking_repository
                .unwrap_or_else(|| Arc::new(MockBookingRepository::new())),
            user_repository: self
                .user_repository
                .unwrap_or_else(|| Arc::new(MockUserRepository::new())),
            auth_repository: self
                .auth_repository
                .unwrap_or_else(|| Arc::new(MockAuthRepository::new())),
            retention_policy: self.retention_policy,
        }
    }
}
