use list_filter::FoodListCriteria;
use model::{Feedback, Food, FoodUpdate, NewFeedback, NewFood, NewPurchase, Purchase};
use payment::PaymentGateway;
use result::{FeedbackRepoError, FoodRepoError, OptRepoResult, PurchaseRepoError, RepoResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use utoipa::ToSchema;

pub mod list_filter;
pub mod model;
pub mod payment;
pub mod result;

/// Binds together the stores and outside services a running app talks to.
pub trait FoodEngine: Clone + Send + Sync + 'static {
    type Id: RecordId;
    type Foods: FoodRepository<Id = Self::Id> + Send + Sync + 'static;
    type Purchases: PurchaseRepository<Id = Self::Id> + Send + Sync + 'static;
    type Feedback: FeedbackRepository<Id = Self::Id> + Send + Sync + 'static;
    type Payments: PaymentGateway + Send + Sync + 'static;

    fn foods(&self) -> Self::Foods;
    fn purchases(&self) -> Self::Purchases;
    fn feedback(&self) -> Self::Feedback;
    fn payments(&self) -> Self::Payments;
}

pub trait FoodRepository {
    type Id: RecordId;

    fn get(
        &self,
        id: Self::Id,
    ) -> impl Future<Output = OptRepoResult<Food<Self::Id>, FoodRepoError>> + Send;

    fn list(
        &self,
        criteria: FoodListCriteria,
    ) -> impl Future<Output = RepoResult<Vec<Food<Self::Id>>, FoodRepoError>> + Send;

    fn create(
        &self,
        new_food: NewFood,
    ) -> impl Future<Output = RepoResult<Food<Self::Id>, FoodRepoError>> + Send;

    /// Overwrite the listing's fields, inserting it under `id` if it does not exist.
    fn upsert(
        &self,
        id: Self::Id,
        update: FoodUpdate,
    ) -> impl Future<Output = RepoResult<Food<Self::Id>, FoodRepoError>> + Send;

    fn delete(
        &self,
        id: Self::Id,
    ) -> impl Future<Output = OptRepoResult<(), FoodRepoError>> + Send;

    /// Atomically take `quantity` out of stock and count one more purchase.
    /// This must be a single store-level update so concurrent purchases never lose writes.
    /// Returns the listing after the update, or `None` if no listing has `id`. Never inserts.
    fn record_purchase(
        &self,
        id: Self::Id,
        quantity: u32,
    ) -> impl Future<Output = OptRepoResult<Food<Self::Id>, FoodRepoError>> + Send;

    /// Exact inverse of [`FoodRepository::record_purchase`], used when the purchase
    /// record could not be written after the counters were already moved.
    fn reverse_purchase(
        &self,
        id: Self::Id,
        quantity: u32,
    ) -> impl Future<Output = OptRepoResult<Food<Self::Id>, FoodRepoError>> + Send;
}

pub trait PurchaseRepository {
    type Id: RecordId;

    fn create(
        &self,
        new_purchase: NewPurchase<Self::Id>,
    ) -> impl Future<Output = RepoResult<Purchase<Self::Id>, PurchaseRepoError>> + Send;

    fn list_by_buyer(
        &self,
        buyer_email: String,
    ) -> impl Future<Output = RepoResult<Vec<Purchase<Self::Id>>, PurchaseRepoError>> + Send;

    fn delete(
        &self,
        id: Self::Id,
    ) -> impl Future<Output = OptRepoResult<(), PurchaseRepoError>> + Send;
}

pub trait FeedbackRepository {
    type Id: RecordId;

    fn create(
        &self,
        new_feedback: NewFeedback,
    ) -> impl Future<Output = RepoResult<Feedback<Self::Id>, FeedbackRepoError>> + Send;

    fn list(
        &self,
    ) -> impl Future<Output = RepoResult<Vec<Feedback<Self::Id>>, FeedbackRepoError>> + Send;
}

pub trait RecordId:
    Debug
    + Display
    + Send
    + Sync
    + Serialize
    + for<'de> Deserialize<'de>
    + Clone
    + ToSchema
    + PartialEq
    + 'static
{
}

impl<T> RecordId for T where
    T: Debug
        + Display
        + Send
        + Sync
        + Serialize
        + for<'de> Deserialize<'de>
        + Clone
        + ToSchema
        + PartialEq
        + 'static
{
}
