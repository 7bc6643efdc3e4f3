use super::{ArwLock, MemoryId};
use crate::strip_reserved_keys;
use foods_core::PurchaseRepository;
use foods_core::model::{NewPurchase, Purchase};
use foods_core::result::{OptRepoResult, PurchaseRepoError, RepoResult};

#[derive(Debug, Clone)]
pub struct PurchaseRepo {
    purchases: ArwLock<Vec<Purchase<MemoryId>>>,
}

impl PurchaseRepo {
    pub(super) fn new(purchases: ArwLock<Vec<Purchase<MemoryId>>>) -> Self {
        Self { purchases }
    }
}

impl PurchaseRepository for PurchaseRepo {
    type Id = MemoryId;

    async fn create(
        &self,
        mut new_purchase: NewPurchase<Self::Id>,
    ) -> RepoResult<Purchase<Self::Id>, PurchaseRepoError> {
        strip_reserved_keys(&mut new_purchase.order);
        let purchase = new_purchase.into_purchase(MemoryId::new());
        self.purchases.write().await.push(purchase.clone());
        Ok(purchase)
    }

    async fn list_by_buyer(
        &self,
        buyer_email: String,
    ) -> RepoResult<Vec<Purchase<Self::Id>>, PurchaseRepoError> {
        Ok(self
            .purchases
            .read()
            .await
            .iter()
            .filter(|p| p.buyer_email == buyer_email)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Self::Id) -> OptRepoResult<(), PurchaseRepoError> {
        let mut purchases = self.purchases.write().await;
        let before = purchases.len();
        purchases.retain(|p| p.id != id);
        Ok((purchases.len() < before).then_some(()))
    }
}
