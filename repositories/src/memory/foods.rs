use super::{ArwLock, MemoryId};
use crate::strip_reserved_keys;
use error_stack::Report;
use foods_core::FoodRepository;
use foods_core::list_filter::{FoodFilter, FoodListCriteria, FoodOrder};
use foods_core::model::{Food, FoodUpdate, NewFood};
use foods_core::result::{FoodRepoError, OptRepoResult, RepoResult};
use std::cmp::Reverse;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FoodRepo {
    foods: ArwLock<Vec<Food<MemoryId>>>,
}

impl FoodRepo {
    pub(super) fn new(foods: ArwLock<Vec<Food<MemoryId>>>) -> Self {
        Self { foods }
    }

    async fn increment_counters(
        &self,
        id: MemoryId,
        quantity_delta: i64,
        purchases_delta: i64,
    ) -> OptRepoResult<Food<MemoryId>, FoodRepoError> {
        let mut foods = self.foods.write().await;
        let Some(food) = foods.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };

        let (Some(quantity), Some(number_of_purchases)) = (
            food.quantity.checked_add(quantity_delta),
            food.number_of_purchases.checked_add(purchases_delta),
        ) else {
            return Err(Report::new(FoodRepoError::Inventory).attach(format!(
                "food {id} counters {}/{} overflow by {quantity_delta}/{purchases_delta}",
                food.quantity, food.number_of_purchases
            )));
        };

        food.quantity = quantity;
        food.number_of_purchases = number_of_purchases;
        Ok(Some(food.clone()))
    }
}

fn matches(filter: &FoodFilter, food: &Food<MemoryId>) -> bool {
    match filter {
        FoodFilter::All => true,
        FoodFilter::AddedBy(email) => food.added_by.as_ref().is_some_and(|a| &a.email == email),
        FoodFilter::Name(name) => &food.name == name,
    }
}

impl FoodRepository for FoodRepo {
    type Id = MemoryId;

    async fn get(&self, id: Self::Id) -> OptRepoResult<Food<Self::Id>, FoodRepoError> {
        Ok(self.foods.read().await.iter().find(|f| f.id == id).cloned())
    }

    async fn list(&self, criteria: FoodListCriteria) -> RepoResult<Vec<Food<Self::Id>>, FoodRepoError> {
        let mut found = self
            .foods
            .read()
            .await
            .iter()
            .filter(|f| matches(criteria.filter(), f))
            .cloned()
            .collect::<Vec<_>>();

        if criteria.order() == FoodOrder::MostPurchased {
            found.sort_by_key(|f| Reverse(f.number_of_purchases));
        }

        if let Some(limit) = criteria.limit() {
            found.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        Ok(found)
    }

    async fn create(&self, mut new_food: NewFood) -> RepoResult<Food<Self::Id>, FoodRepoError> {
        strip_reserved_keys(&mut new_food.details);
        let food = new_food.into_food(MemoryId::new());
        self.foods.write().await.push(food.clone());
        Ok(food)
    }

    async fn upsert(&self, id: Self::Id, mut update: FoodUpdate) -> RepoResult<Food<Self::Id>, FoodRepoError> {
        strip_reserved_keys(&mut update.details);
        let mut foods = self.foods.write().await;

        match foods.iter_mut().find(|f| f.id == id) {
            Some(food) => {
                update.apply_to(food);
                Ok(food.clone())
            }
            None => {
                debug!("food {id} does not exist, inserting");
                let food = update.into_food(id);
                foods.push(food.clone());
                Ok(food)
            }
        }
    }

    async fn delete(&self, id: Self::Id) -> OptRepoResult<(), FoodRepoError> {
        let mut foods = self.foods.write().await;
        let before = foods.len();
        foods.retain(|f| f.id != id);
        Ok((foods.len() < before).then_some(()))
    }

    async fn record_purchase(&self, id: Self::Id, quantity: u32) -> OptRepoResult<Food<Self::Id>, FoodRepoError> {
        self.increment_counters(id, -i64::from(quantity), 1).await
    }

    async fn reverse_purchase(&self, id: Self::Id, quantity: u32) -> OptRepoResult<Food<Self::Id>, FoodRepoError> {
        self.increment_counters(id, i64::from(quantity), -1).await
    }
}
