//! A process-local store with the same guarantees as the mongodb store:
//! counter updates happen under a single write lock, so concurrent purchases
//! of one listing serialize the same way a store-level `$inc` does.
use foods_core::model::{Feedback, Food, Purchase};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use utoipa::ToSchema;
use uuid::Uuid;

mod feedback;
mod foods;
mod purchases;

pub use feedback::FeedbackRepo;
pub use foods::FoodRepo;
pub use purchases::PurchaseRepo;

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct MemoryId(Uuid);

impl MemoryId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for MemoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MemoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct ArwLock<T>(Arc<RwLock<T>>);

impl<T> Clone for ArwLock<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> ArwLock<T> {
    pub fn new(data: T) -> Self {
        Self(Arc::new(RwLock::new(data)))
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().await
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    foods: ArwLock<Vec<Food<MemoryId>>>,
    purchases: ArwLock<Vec<Purchase<MemoryId>>>,
    feedback: ArwLock<Vec<Feedback<MemoryId>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn foods(&self) -> FoodRepo {
        FoodRepo::new(self.foods.clone())
    }

    pub fn purchases(&self) -> PurchaseRepo {
        PurchaseRepo::new(self.purchases.clone())
    }

    pub fn feedback(&self) -> FeedbackRepo {
        FeedbackRepo::new(self.feedback.clone())
    }
}
