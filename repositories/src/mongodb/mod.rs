use crate::{RepoInitErr, RepoInitResult};
use bson::oid::ObjectId;
use bson::{Bson, doc};
use error_stack::ResultExt;
use mongodb::{Client, Database};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

pub mod feedback;
pub mod foods;
pub mod purchases;

/// Store generated id of a document. Travels over HTTP as a hex string.
#[derive(Debug, ToSchema, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(transparent)]
#[schema(value_type = String)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn new_with(id: ObjectId) -> Self {
        Self(id)
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for DocumentId {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.to_hex().serialize(ser)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D>(de: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(de)?;
        ObjectId::parse_str(&hex)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

impl From<DocumentId> for Bson {
    fn from(value: DocumentId) -> Self {
        value.0.into()
    }
}

impl From<ObjectId> for DocumentId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub enum ConnectionDetails {
    Url(String),
}

/// One client for the whole process. Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    pub fn new(client: Client, db_name: &str) -> Self {
        Self {
            db: client.database(db_name),
            client,
        }
    }

    #[instrument(skip(connection_details))]
    pub async fn init(connection_details: ConnectionDetails, db_name: &str) -> RepoInitResult<Self> {
        let client = match connection_details {
            ConnectionDetails::Url(url) => Client::with_uri_str(url)
                .await
                .change_context(RepoInitErr)
                .attach("failed to create client connection to mongodb instance")?,
        };

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .change_context(RepoInitErr)
            .attach("mongodb deployment did not answer ping")?;

        info!("connected to mongodb, using database '{db_name}'");
        Ok(Self::new(client, db_name))
    }

    pub fn foods(&self) -> foods::FoodRepo {
        foods::FoodRepo::new(&self.db)
    }

    pub fn purchases(&self) -> purchases::PurchaseRepo {
        purchases::PurchaseRepo::new(&self.db)
    }

    pub fn feedback(&self) -> feedback::FeedbackRepo {
        feedback::FeedbackRepo::new(&self.db)
    }

    pub async fn shutdown(self) {
        debug!("closing mongodb client");
        self.client.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentId;
    use bson::oid::ObjectId;

    #[test]
    fn document_id_is_hex_over_json() {
        let oid = ObjectId::new();
        let id = DocumentId::new_with(oid);

        let json = serde_json::to_value(id).unwrap();
        assert_eq!(serde_json::Value::String(oid.to_hex()), json);

        let back: DocumentId = serde_json::from_value(json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn document_id_rejects_non_hex() {
        assert!(serde_json::from_str::<DocumentId>("\"not-an-id\"").is_err());
    }
}
