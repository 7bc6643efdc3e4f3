use super::DocumentId;
use crate::strip_reserved_keys;
use bson::oid::ObjectId;
use bson::{Document, doc};
use error_stack::ResultExt;
use foods_core::FoodRepository;
use foods_core::list_filter::{FoodFilter, FoodListCriteria, FoodOrder};
use foods_core::model::{Contributor, Details, Food, FoodUpdate, NewFood};
use foods_core::result::{FoodRepoError, OptRepoResult, RepoResult};
use mongodb::{Collection, Database};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;
use tracing::{debug, instrument};

const FOODS_COLLECTION_NAME: &str = "foods";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MongoFood {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    price: f64,
    quantity: i64,
    #[serde(default)]
    number_of_purchases: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    added_by: Option<Contributor>,
    #[serde(flatten)]
    details: Details,
}

impl From<MongoFood> for Food<DocumentId> {
    fn from(value: MongoFood) -> Self {
        Self {
            id: DocumentId::new_with(value.id),
            name: value.name,
            price: value.price,
            quantity: value.quantity,
            number_of_purchases: value.number_of_purchases,
            added_by: value.added_by,
            details: value.details,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewFoodDocument {
    name: String,
    price: f64,
    quantity: i64,
    number_of_purchases: i64,
    added_by: Contributor,
    #[serde(flatten)]
    details: Details,
}

impl From<NewFood> for NewFoodDocument {
    fn from(mut value: NewFood) -> Self {
        strip_reserved_keys(&mut value.details);
        Self {
            name: value.name,
            price: value.price,
            quantity: value.quantity,
            number_of_purchases: value.number_of_purchases,
            added_by: value.added_by,
            details: value.details,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FoodRepo {
    collection: Collection<MongoFood>,
}

impl FoodRepo {
    pub(super) fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(FOODS_COLLECTION_NAME),
        }
    }

    /// `$inc` both counters in one `findOneAndUpdate`, never upserting.
    async fn increment_counters(
        &self,
        id: DocumentId,
        quantity_delta: i64,
        purchases_delta: i64,
    ) -> OptRepoResult<Food<DocumentId>, FoodRepoError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$inc": { "quantity": quantity_delta, "numberOfPurchases": purchases_delta } },
            )
            .with_options(options)
            .await
            .change_context(FoodRepoError::Inventory)
            .attach_with(|| format!("food id {id}"))
            .map(|f| f.map(From::from))
    }
}

fn filter_document(filter: &FoodFilter) -> Document {
    match filter {
        FoodFilter::All => Document::new(),
        FoodFilter::AddedBy(email) => doc! { "addedBy.email": email },
        FoodFilter::Name(name) => doc! { "name": name },
    }
}

impl FoodRepository for FoodRepo {
    type Id = DocumentId;

    async fn get(&self, id: Self::Id) -> OptRepoResult<Food<Self::Id>, FoodRepoError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .change_context(FoodRepoError::Get)
            .map(|f| f.map(From::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, criteria: FoodListCriteria) -> RepoResult<Vec<Food<Self::Id>>, FoodRepoError> {
        let sort = match criteria.order() {
            FoodOrder::Insertion => None,
            FoodOrder::MostPurchased => Some(doc! { "numberOfPurchases": -1, "_id": 1 }),
        };

        let limit = criteria
            .limit()
            .map(i64::try_from)
            .transpose()
            .change_context(FoodRepoError::List)
            .attach_with(|| format!("invalid limit {:?}. It is too large and not supported", criteria.limit()))?;

        let options = FindOptions::builder().sort(sort).limit(limit).build();

        self.collection
            .find(filter_document(criteria.filter()))
            .with_options(options)
            .await
            .change_context(FoodRepoError::List)?
            .map(|f| f.map(From::from))
            .collect::<Result<_, _>>()
            .await
            .change_context(FoodRepoError::List)
    }

    async fn create(&self, new_food: NewFood) -> RepoResult<Food<Self::Id>, FoodRepoError> {
        let document = NewFoodDocument::from(new_food);

        let result = self
            .collection
            .clone_with_type::<NewFoodDocument>()
            .insert_one(&document)
            .await
            .change_context(FoodRepoError::Create)?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or(FoodRepoError::Create)
            .attach_with(|| format!("inserted id for food '{}' was not an ObjectId", document.name))?;

        Ok(Food {
            id: DocumentId::new_with(id),
            name: document.name,
            price: document.price,
            quantity: document.quantity,
            number_of_purchases: document.number_of_purchases,
            added_by: Some(document.added_by),
            details: document.details,
        })
    }

    #[instrument(skip(self, update))]
    async fn upsert(&self, id: Self::Id, update: FoodUpdate) -> RepoResult<Food<Self::Id>, FoodRepoError> {
        let mut set = doc! {
            "name": update.name,
            "price": update.price,
            "quantity": update.quantity,
        };

        if let Some(added_by) = update.added_by {
            set.insert(
                "addedBy",
                bson::to_bson(&added_by).change_context(FoodRepoError::Update)?,
            );
        }

        let mut details = update.details;
        strip_reserved_keys(&mut details);
        for (key, value) in details {
            let value = bson::to_bson(&value)
                .change_context(FoodRepoError::Update)
                .attach_with(|| format!("field '{key}' could not be stored"))?;
            set.insert(key, value);
        }

        debug!("upserting food document {set:?}");

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": set, "$setOnInsert": { "numberOfPurchases": 0_i64 } },
            )
            .with_options(options)
            .await
            .change_context(FoodRepoError::Update)?
            .map(From::from)
            .ok_or(FoodRepoError::Update)
            .attach("upsert did not return a document")
    }

    async fn delete(&self, id: Self::Id) -> OptRepoResult<(), FoodRepoError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .await
            .change_context(FoodRepoError::Delete)?;

        Ok((result.deleted_count > 0).then_some(()))
    }

    async fn record_purchase(&self, id: Self::Id, quantity: u32) -> OptRepoResult<Food<Self::Id>, FoodRepoError> {
        self.increment_counters(id, -i64::from(quantity), 1).await
    }

    async fn reverse_purchase(&self, id: Self::Id, quantity: u32) -> OptRepoResult<Food<Self::Id>, FoodRepoError> {
        self.increment_counters(id, i64::from(quantity), -1).await
    }
}
