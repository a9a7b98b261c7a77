//! Unit of Work pattern implementation.
//!
//! Centralizes access to the repositories and owns the transaction
//! lifecycle (begin, commit, rollback) for operations that must be atomic,
//! such as admitting a registration against an event's capacity.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::{
    count_for_event, find_event, find_registration, insert_registration, EventRepository,
    EventStore, RegistrationRepository, RegistrationStore, UserRepository, UserStore,
};
use crate::domain::{Event, Registration};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock at the service level or use integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get event repository
    fn events(&self) -> Arc<dyn EventRepository>;

    /// Get registration repository
    fn registrations(&self) -> Arc<dyn RegistrationRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success and rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get event repository for this transaction
    pub fn events(&self) -> TxEventRepository<'_> {
        TxEventRepository { txn: self.txn }
    }

    /// Get registration repository for this transaction
    pub fn registrations(&self) -> TxRegistrationRepository<'_> {
        TxRegistrationRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    event_repo: Arc<EventStore>,
    registration_repo: Arc<RegistrationStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            event_repo: Arc::new(EventStore::new(db.clone())),
            registration_repo: Arc::new(RegistrationStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn events(&self) -> Arc<dyn EventRepository> {
        self.event_repo.clone()
    }

    fn registrations(&self) -> Arc<dyn RegistrationRepository> {
        self.registration_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware event repository.
pub struct TxEventRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxEventRepository<'_> {
    /// Load an event and hold a row lock on it until the transaction ends.
    /// Concurrent sign-ups for the same event queue up behind this lock.
    pub async fn find_for_update(&self, id: Uuid) -> AppResult<Option<Event>> {
        find_event(self.txn, id, true).await
    }
}

/// Transaction-aware registration repository.
pub struct TxRegistrationRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxRegistrationRepository<'_> {
    pub async fn count_for_event(&self, event_id: Uuid) -> AppResult<u64> {
        count_for_event(self.txn, event_id).await
    }

    pub async fn exists(&self, user_id: Uuid, event_id: Uuid) -> AppResult<bool> {
        Ok(find_registration(self.txn, user_id, event_id)
            .await?
            .is_some())
    }

    pub async fn create(&self, user_id: Uuid, event_id: Uuid) -> AppResult<Registration> {
        insert_registration(self.txn, user_id, event_id).await
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
