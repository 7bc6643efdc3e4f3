use crate::error::FoodServiceError;
use crate::metrics;
use crate::{OptServiceResult, ServiceResult};
use error_stack::ResultExt;
use foods_core::list_filter::FoodListCriteria;
use foods_core::model::{Details, Feedback, Food, FoodUpdate, NewFeedback, NewFood, NewPurchase, Purchase};
use foods_core::payment::{PaymentAmount, PaymentGateway, PaymentIntent};
use foods_core::{FeedbackRepository, FoodEngine, FoodRepository, PurchaseRepository};
use tracing::{error, info, instrument, warn};

/// How many listings the landing page shows.
pub const TOP_FOODS_LIMIT: u64 = 6;

#[derive(Debug)]
pub enum PurchaseOutcome<I> {
    Recorded { purchase: Purchase<I>, food: Food<I> },
    FoodNotFound,
    InvalidQuantity,
}

#[derive(Debug)]
pub enum ListingOutcome<I> {
    Written(Food<I>),
    /// Names the first field with a value a listing can't hold
    Invalid(&'static str),
}

#[derive(Debug)]
pub enum PaymentOutcome {
    Created(PaymentIntent),
    InvalidAmount,
    ProcessorFailed,
}

#[derive(Debug, Clone)]
pub struct FoodService<T> {
    engine: T,
}

impl<T> FoodService<T>
where
    T: FoodEngine,
{
    pub fn new(engine: T) -> Self {
        FoodService { engine }
    }

    #[instrument(skip_all, name = "service#get")]
    pub async fn get(&self, id: T::Id) -> OptServiceResult<Food<T::Id>> {
        self.engine
            .foods()
            .get(id)
            .await
            .change_context(FoodServiceError)
    }

    #[instrument(skip(self), name = "service#list")]
    pub async fn list(&self, criteria: FoodListCriteria) -> ServiceResult<Vec<Food<T::Id>>> {
        self.engine
            .foods()
            .list(criteria)
            .await
            .change_context(FoodServiceError)
    }

    pub async fn top_foods(&self) -> ServiceResult<Vec<Food<T::Id>>> {
        self.list(FoodListCriteria::most_purchased(TOP_FOODS_LIMIT)).await
    }

    #[instrument(skip_all, name = "service#create", fields(food.name = %new_food.name))]
    pub async fn create(&self, new_food: NewFood) -> ServiceResult<ListingOutcome<T::Id>> {
        if let Some(field) = new_food.invalid_field() {
            return Ok(ListingOutcome::Invalid(field));
        }

        let food = self
            .engine
            .foods()
            .create(new_food)
            .await
            .change_context(FoodServiceError)?;

        metrics::increment_foods_created();
        Ok(ListingOutcome::Written(food))
    }

    #[instrument(skip(self, update), name = "service#upsert")]
    pub async fn upsert(&self, id: T::Id, update: FoodUpdate) -> ServiceResult<ListingOutcome<T::Id>> {
        if let Some(field) = update.invalid_field() {
            return Ok(ListingOutcome::Invalid(field));
        }

        let food = self
            .engine
            .foods()
            .upsert(id, update)
            .await
            .change_context(FoodServiceError)?;

        metrics::increment_foods_updated();
        Ok(ListingOutcome::Written(food))
    }

    #[instrument(skip(self), name = "service#delete")]
    pub async fn delete(&self, id: T::Id) -> OptServiceResult<()> {
        let deleted = self
            .engine
            .foods()
            .delete(id)
            .await
            .change_context(FoodServiceError)?;

        if deleted.is_some() {
            metrics::increment_foods_deleted();
        }
        Ok(deleted)
    }

    /// Counts the sale against the listing first, then writes the purchase record.
    /// A listing that doesn't exist is never created by a purchase, and no record is
    /// written for it. If the record can't be written the counters are put back.
    #[instrument(skip_all, name = "service#purchase", fields(food_id = %purchase.food_id, quantity = purchase.quantity))]
    pub async fn purchase(&self, purchase: NewPurchase<T::Id>) -> ServiceResult<PurchaseOutcome<T::Id>> {
        if purchase.quantity == 0 {
            return Ok(PurchaseOutcome::InvalidQuantity);
        }

        let foods = self.engine.foods();
        let food_id = purchase.food_id.clone();
        let quantity = purchase.quantity;

        let Some(food) = foods
            .record_purchase(food_id.clone(), quantity)
            .await
            .change_context(FoodServiceError)?
        else {
            info!("food {food_id} does not exist, nothing purchased");
            return Ok(PurchaseOutcome::FoodNotFound);
        };

        match self.engine.purchases().create(purchase).await {
            Ok(purchase) => {
                metrics::record_purchase(quantity);
                Ok(PurchaseOutcome::Recorded { purchase, food })
            }
            Err(e) => {
                warn!("purchase record for food {food_id} was not written, reversing inventory update");
                match foods.reverse_purchase(food_id.clone(), quantity).await {
                    Ok(Some(_)) => metrics::increment_purchases_reversed(),
                    Ok(None) => warn!("food {food_id} was removed before its purchase could be reversed"),
                    Err(reverse) => error!("failed to reverse purchase of food {food_id}: {reverse:?}"),
                }
                Err(e.change_context(FoodServiceError))
            }
        }
    }

    #[instrument(skip(self), name = "service#purchases_by_buyer")]
    pub async fn purchases_by_buyer(&self, buyer_email: String) -> ServiceResult<Vec<Purchase<T::Id>>> {
        self.engine
            .purchases()
            .list_by_buyer(buyer_email)
            .await
            .change_context(FoodServiceError)
    }

    #[instrument(skip(self), name = "service#delete_purchase")]
    pub async fn delete_purchase(&self, id: T::Id) -> OptServiceResult<()> {
        self.engine
            .purchases()
            .delete(id)
            .await
            .change_context(FoodServiceError)
    }

    #[instrument(skip_all, name = "service#create_feedback")]
    pub async fn create_feedback(&self, content: Details) -> ServiceResult<Feedback<T::Id>> {
        let feedback = self
            .engine
            .feedback()
            .create(NewFeedback::new(content))
            .await
            .change_context(FoodServiceError)?;

        metrics::increment_feedback_received();
        Ok(feedback)
    }

    pub async fn list_feedback(&self) -> ServiceResult<Vec<Feedback<T::Id>>> {
        self.engine
            .feedback()
            .list()
            .await
            .change_context(FoodServiceError)
    }

    #[instrument(skip(self), name = "service#create_payment_intent")]
    pub async fn create_payment_intent(&self, price: f64) -> PaymentOutcome {
        let Some(amount) = PaymentAmount::from_price(price) else {
            return PaymentOutcome::InvalidAmount;
        };

        match self.engine.payments().create_intent(amount).await {
            Ok(intent) => PaymentOutcome::Created(intent),
            Err(e) => {
                error!("{e:?}");
                PaymentOutcome::ProcessorFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FoodService, PurchaseOutcome};
    use error_stack::Report;
    use foods_core::model::{Contributor, NewFood, NewPurchase, Purchase};
    use foods_core::payment::{PaymentAmount, PaymentGateway, PaymentIntent};
    use foods_core::result::{OptRepoResult, PaymentError, PurchaseRepoError, RepoResult};
    use foods_core::{FoodEngine, FoodRepository, PurchaseRepository};
    use repositories::memory::{FeedbackRepo, FoodRepo, MemoryId, MemoryStore};

    /// Purchase store that is down.
    #[derive(Debug, Clone)]
    struct UnavailablePurchases;

    impl PurchaseRepository for UnavailablePurchases {
        type Id = MemoryId;

        async fn create(&self, _: NewPurchase<MemoryId>) -> RepoResult<Purchase<MemoryId>, PurchaseRepoError> {
            Err(Report::new(PurchaseRepoError::Create))
        }

        async fn list_by_buyer(&self, _: String) -> RepoResult<Vec<Purchase<MemoryId>>, PurchaseRepoError> {
            Err(Report::new(PurchaseRepoError::List))
        }

        async fn delete(&self, _: MemoryId) -> OptRepoResult<(), PurchaseRepoError> {
            Err(Report::new(PurchaseRepoError::Delete))
        }
    }

    #[derive(Debug, Clone)]
    struct NoPayments;

    impl PaymentGateway for NoPayments {
        async fn create_intent(&self, _: PaymentAmount) -> Result<PaymentIntent, Report<PaymentError>> {
            Err(Report::new(PaymentError))
        }
    }

    #[derive(Debug, Clone)]
    struct BrokenPurchaseEngine {
        store: MemoryStore,
    }

    impl FoodEngine for BrokenPurchaseEngine {
        type Id = MemoryId;
        type Foods = FoodRepo;
        type Purchases = UnavailablePurchases;
        type Feedback = FeedbackRepo;
        type Payments = NoPayments;

        fn foods(&self) -> Self::Foods {
            self.store.foods()
        }

        fn purchases(&self) -> Self::Purchases {
            UnavailablePurchases
        }

        fn feedback(&self) -> Self::Feedback {
            self.store.feedback()
        }

        fn payments(&self) -> Self::Payments {
            NoPayments
        }
    }

    #[tokio::test]
    async fn failed_purchase_record_reverses_counters() {
        let store = MemoryStore::new();
        let food = store
            .foods()
            .create(NewFood {
                name: "Momo".to_string(),
                price: 6.0,
                quantity: 10,
                number_of_purchases: 3,
                added_by: Contributor {
                    name: None,
                    email: "chef@example.com".to_string(),
                },
                details: Default::default(),
            })
            .await
            .unwrap();

        let service = FoodService::new(BrokenPurchaseEngine { store: store.clone() });

        let result = service
            .purchase(NewPurchase {
                food_id: food.id,
                quantity: 2,
                buyer_email: "buyer@example.com".to_string(),
                buyer_name: None,
                order: Default::default(),
            })
            .await;

        assert!(result.is_err());
        let after = store.foods().get(food.id).await.unwrap().unwrap();
        assert_eq!(10, after.quantity);
        assert_eq!(3, after.number_of_purchases);
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_without_touching_counters() {
        let store = MemoryStore::new();
        let service = FoodService::new(BrokenPurchaseEngine { store: store.clone() });

        let outcome = service
            .purchase(NewPurchase {
                food_id: MemoryId::new(),
                quantity: 0,
                buyer_email: "buyer@example.com".to_string(),
                buyer_name: None,
                order: Default::default(),
            })
            .await
            .unwrap();

        assert!(matches!(outcome, PurchaseOutcome::InvalidQuantity));
    }
}
