use super::DocumentId;
use crate::strip_reserved_keys;
use bson::Document;
use bson::oid::ObjectId;
use error_stack::ResultExt;
use foods_core::FeedbackRepository;
use foods_core::model::{Details, Feedback, NewFeedback};
use foods_core::result::{FeedbackRepoError, RepoResult};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;

const FEEDBACK_COLLECTION_NAME: &str = "feedback";

#[derive(Debug, Serialize, Deserialize)]
struct MongoFeedback {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(flatten)]
    content: Details,
}

impl From<MongoFeedback> for Feedback<DocumentId> {
    fn from(value: MongoFeedback) -> Self {
        Self {
            id: DocumentId::new_with(value.id),
            content: value.content,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedbackRepo {
    collection: Collection<MongoFeedback>,
}

impl FeedbackRepo {
    pub(super) fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(FEEDBACK_COLLECTION_NAME),
        }
    }
}

impl FeedbackRepository for FeedbackRepo {
    type Id = DocumentId;

    async fn create(&self, new_feedback: NewFeedback) -> RepoResult<Feedback<Self::Id>, FeedbackRepoError> {
        let mut content = new_feedback.content;
        strip_reserved_keys(&mut content);

        let document = bson::to_document(&content).change_context(FeedbackRepoError::Create)?;

        let result = self
            .collection
            .clone_with_type::<Document>()
            .insert_one(document)
            .await
            .change_context(FeedbackRepoError::Create)?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or(FeedbackRepoError::Create)
            .attach("inserted id for feedback was not an ObjectId")?;

        Ok(Feedback {
            id: DocumentId::new_with(id),
            content,
        })
    }

    async fn list(&self) -> RepoResult<Vec<Feedback<Self::Id>>, FeedbackRepoError> {
        self.collection
            .find(Document::new())
            .await
            .change_context(FeedbackRepoError::List)?
            .map(|f| f.map(From::from))
            .collect::<Result<_, _>>()
            .await
            .change_context(FeedbackRepoError::List)
    }
}
