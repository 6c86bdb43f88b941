//! Document-store seam for the books module.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use catalog_db::{with_deadline, StoreError};
use catalog_kernel::settings::DatabaseSettings;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection, Database,
};

use super::models::{Book, BookDocument, BookInput};

/// Persistence operations the catalog handlers rely on.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every book, in store-defined order.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    /// Insert a book and return the identity the store assigned.
    async fn insert(&self, input: BookInput) -> Result<ObjectId, StoreError>;

    /// Overwrite all fields of `id`; `false` when no book matched.
    async fn replace_fields(&self, id: ObjectId, input: BookInput) -> Result<bool, StoreError>;

    /// Remove `id`; `false` when no book matched.
    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError>;
}

/// [`BookStore`] over a MongoDB collection.
pub struct MongoBookStore {
    collection: Collection<BookDocument>,
    operation_timeout: Duration,
}

impl MongoBookStore {
    pub fn new(database: &Database, settings: &DatabaseSettings) -> Self {
        Self {
            collection: database.collection(&settings.collection),
            operation_timeout: Duration::from_millis(settings.operation_timeout_ms),
        }
    }
}

#[async_trait]
impl BookStore for MongoBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let documents = with_deadline(self.operation_timeout, async {
            let cursor = self.collection.find(doc! {}).await?;
            cursor.try_collect::<Vec<_>>().await
        })
        .await?;

        Ok(documents
            .into_iter()
            .filter_map(BookDocument::into_book)
            .collect())
    }

    async fn insert(&self, input: BookInput) -> Result<ObjectId, StoreError> {
        let result = with_deadline(
            self.operation_timeout,
            self.collection.insert_one(BookDocument::from(input)),
        )
        .await?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::Unexpected(format!(
                "store assigned a non-ObjectId identity: {}",
                result.inserted_id
            ))
        })
    }

    async fn replace_fields(&self, id: ObjectId, input: BookInput) -> Result<bool, StoreError> {
        let result = with_deadline(
            self.operation_timeout,
            self.collection
                .update_one(doc! { "_id": id }, set_all_fields(&input)),
        )
        .await?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        let result = with_deadline(
            self.operation_timeout,
            self.collection.delete_one(doc! { "_id": id }),
        )
        .await?;

        Ok(result.deleted_count > 0)
    }
}

/// `$set` update writing every mutable field, zero values included.
pub fn set_all_fields(input: &BookInput) -> Document {
    doc! {
        "$set": {
            "title": input.title.as_str(),
            "author": input.author.as_str(),
            "price": input.price,
            "stock": input.stock,
        }
    }
}

/// Process-local [`BookStore`] used as a substitute for MongoDB in tests.
#[derive(Default)]
pub struct InMemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unexpected("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.books.read().map_err(poisoned)?.clone())
    }

    async fn insert(&self, input: BookInput) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        self.books
            .write()
            .map_err(poisoned)?
            .push(Book::new(id, input));
        Ok(id)
    }

    async fn replace_fields(&self, id: ObjectId, input: BookInput) -> Result<bool, StoreError> {
        let mut books = self.books.write().map_err(poisoned)?;
        match books.iter_mut().find(|book| book.id == id) {
            Some(book) => {
                *book = Book::new(id, input);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        let mut books = self.books.write().map_err(poisoned)?;
        let before = books.len();
        books.retain(|book| book.id != id);
        Ok(books.len() < before)
    }
}
