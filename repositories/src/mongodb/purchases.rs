use super::DocumentId;
use crate::strip_reserved_keys;
use bson::doc;
use bson::oid::ObjectId;
use error_stack::{Report, ResultExt};
use foods_core::PurchaseRepository;
use foods_core::model::{Details, NewPurchase, Purchase};
use foods_core::result::{OptRepoResult, PurchaseRepoError, RepoResult};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;
use tracing::instrument;

const PURCHASES_COLLECTION_NAME: &str = "purchase";

#[derive(Debug, Serialize, Deserialize)]
struct MongoPurchase {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(rename = "foodId")]
    food_id: ObjectId,
    quantity: i64,
    buyer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    buyer_name: Option<String>,
    #[serde(flatten)]
    order: Details,
}

impl TryFrom<MongoPurchase> for Purchase<DocumentId> {
    type Error = Report<PurchaseRepoError>;

    fn try_from(value: MongoPurchase) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(value.quantity)
            .change_context(PurchaseRepoError::List)
            .attach_with(|| format!("purchase {} has an invalid quantity {}", value.id, value.quantity))?;

        Ok(Self {
            id: DocumentId::new_with(value.id),
            food_id: DocumentId::new_with(value.food_id),
            quantity,
            buyer_email: value.buyer_email,
            buyer_name: value.buyer_name,
            order: value.order,
        })
    }
}

#[derive(Debug, Serialize)]
struct NewPurchaseDocument {
    #[serde(rename = "foodId")]
    food_id: ObjectId,
    quantity: i64,
    buyer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    buyer_name: Option<String>,
    #[serde(flatten)]
    order: Details,
}

#[derive(Debug, Clone)]
pub struct PurchaseRepo {
    collection: Collection<MongoPurchase>,
}

impl PurchaseRepo {
    pub(super) fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(PURCHASES_COLLECTION_NAME),
        }
    }
}

impl PurchaseRepository for PurchaseRepo {
    type Id = DocumentId;

    #[instrument(skip_all, fields(food_id = %new_purchase.food_id))]
    async fn create(
        &self,
        mut new_purchase: NewPurchase<Self::Id>,
    ) -> RepoResult<Purchase<Self::Id>, PurchaseRepoError> {
        strip_reserved_keys(&mut new_purchase.order);
        let document = NewPurchaseDocument {
            food_id: new_purchase.food_id.object_id(),
            quantity: i64::from(new_purchase.quantity),
            buyer_email: new_purchase.buyer_email,
            buyer_name: new_purchase.buyer_name,
            order: new_purchase.order,
        };

        let result = self
            .collection
            .clone_with_type::<NewPurchaseDocument>()
            .insert_one(&document)
            .await
            .change_context(PurchaseRepoError::Create)?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or(PurchaseRepoError::Create)
            .attach("inserted id for purchase was not an ObjectId")?;

        Ok(Purchase {
            id: DocumentId::new_with(id),
            food_id: new_purchase.food_id,
            quantity: new_purchase.quantity,
            buyer_email: document.buyer_email,
            buyer_name: document.buyer_name,
            order: document.order,
        })
    }

    #[instrument(skip(self))]
    async fn list_by_buyer(
        &self,
        buyer_email: String,
    ) -> RepoResult<Vec<Purchase<Self::Id>>, PurchaseRepoError> {
        let documents: Vec<MongoPurchase> = self
            .collection
            .find(doc! { "buyer_email": buyer_email })
            .await
            .change_context(PurchaseRepoError::List)?
            .collect::<Result<_, _>>()
            .await
            .change_context(PurchaseRepoError::List)?;

        documents
            .into_iter()
            .map(Purchase::<DocumentId>::try_from)
            .collect()
    }

    async fn delete(&self, id: Self::Id) -> OptRepoResult<(), PurchaseRepoError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .await
            .change_context(PurchaseRepoError::Delete)?;

        Ok((result.deleted_count > 0).then_some(()))
    }
}
