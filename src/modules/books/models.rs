use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

/// A catalog entry as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Book {
    /// Store-assigned identity, rendered as 24 hex characters
    #[serde(serialize_with = "serialize_hex")]
    #[schema(value_type = String, example = "65f1c0ffee0123456789abcd")]
    pub id: ObjectId,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub stock: i64,
}

impl Book {
    pub fn new(id: ObjectId, input: BookInput) -> Self {
        Self {
            id,
            title: input.title,
            author: input.author,
            price: input.price,
            stock: input.stock,
        }
    }
}

/// Request body for create and update.
///
/// Omitted fields take their zero value and an `id` field is ignored, so an
/// update always overwrites all four fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(default)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub price: f64,
    pub stock: i64,
}

/// Persisted shape of a book, keyed by `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
}

impl From<BookInput> for BookDocument {
    fn from(input: BookInput) -> Self {
        Self {
            id: None,
            title: input.title,
            author: input.author,
            price: input.price,
            stock: input.stock,
        }
    }
}

impl BookDocument {
    /// Convert a stored document; `None` when it has no identity.
    pub fn into_book(self) -> Option<Book> {
        let id = self.id?;
        Some(Book {
            id,
            title: self.title,
            author: self.author,
            price: self.price,
            stock: self.stock,
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub message: String,
    /// Identity assigned to the new book
    pub id: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn serialize_hex<S>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&id.to_hex())
}
