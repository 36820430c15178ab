// Copyright 2026 Sinkroute Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! Built-in operations for MongoDB change stream documents.
//!
//! Each operation reads the change stream fields it needs from the value
//! document:
//!
//! | Operation | Reads | Produces |
//! |-----------|-------|----------|
//! | [`MongoDbInsert`] | `documentKey`, `fullDocument` | upserting `ReplaceOne` |
//! | [`MongoDbReplace`] | `documentKey`, `fullDocument` | upserting `ReplaceOne` |
//! | [`MongoDbUpdate`] | `documentKey`, `fullDocument` or `updateDescription` | `ReplaceOne` or `UpdateOne` |
//! | [`MongoDbDelete`] | `documentKey` | `DeleteOne` |
//!
//! When the value has no `documentKey`, the event's key document is used as
//! the filter.

mod delete;
mod insert;
mod replace;
mod update;

pub use delete::MongoDbDelete;
pub use insert::MongoDbInsert;
pub use replace::MongoDbReplace;
pub use update::MongoDbUpdate;

use bson::{Bson, Document};
use sinkroute_core::error::OperationError;
use sinkroute_core::event::ValidatedEvent;
use sinkroute_core::operation::OperationKind;
use sinkroute_core::registry::OperationRegistry;
use sinkroute_core::write_model::WriteModel;

pub(crate) const DOCUMENT_KEY: &str = "documentKey";
pub(crate) const FULL_DOCUMENT: &str = "fullDocument";
pub(crate) const UPDATE_DESCRIPTION: &str = "updateDescription";
pub(crate) const UPDATED_FIELDS: &str = "updatedFields";
pub(crate) const REMOVED_FIELDS: &str = "removedFields";
pub(crate) const TRUNCATED_ARRAYS: &str = "truncatedArrays";

/// Returns a registry with the four built-in operations.
///
/// # Examples
///
/// ```rust
/// use sinkroute_core::operation::OperationKind;
/// use sinkroute_mongodb::default_operations;
///
/// let registry = default_operations();
/// assert_eq!(registry.registered_kinds(), OperationKind::ALL.to_vec());
/// ```
#[must_use]
pub fn default_operations() -> OperationRegistry {
    OperationRegistry::builder()
        .register(OperationKind::Insert, MongoDbInsert)
        .register(OperationKind::Replace, MongoDbReplace)
        .register(OperationKind::Update, MongoDbUpdate)
        .register(OperationKind::Delete, MongoDbDelete)
        .build()
}

/// Returns the filter selecting the changed document.
///
/// Prefers the value's `documentKey` and falls back to the event key. An
/// empty filter would match an arbitrary document and is rejected.
pub(crate) fn document_key(event: &ValidatedEvent<'_>) -> Result<Document, OperationError> {
    let filter = match event.value().get(DOCUMENT_KEY) {
        Some(Bson::Document(key)) => key,
        None | Some(Bson::Null) => event.key(),
        Some(_) => return Err(OperationError::invalid_field(DOCUMENT_KEY, "a document")),
    };

    if filter.is_empty() {
        return Err(OperationError::invalid_field(
            DOCUMENT_KEY,
            "a non-empty document",
        ));
    }

    Ok(filter.clone())
}

/// Returns the sub-document `field`, treating null as absent.
pub(crate) fn optional_document<'a>(
    value: &'a Document,
    field: &str,
) -> Result<Option<&'a Document>, OperationError> {
    match value.get(field) {
        Some(Bson::Document(doc)) => Ok(Some(doc)),
        None | Some(Bson::Null) => Ok(None),
        Some(_) => Err(OperationError::invalid_field(field, "a document")),
    }
}

/// Builds the upserting replace shared by insert, replace and full-document
/// updates.
pub(crate) fn replace_with_full_document(
    event: &ValidatedEvent<'_>,
) -> Result<WriteModel, OperationError> {
    let filter = document_key(event)?;
    let replacement = optional_document(event.value(), FULL_DOCUMENT)?
        .ok_or_else(|| OperationError::missing_field(FULL_DOCUMENT))?
        .clone();

    Ok(WriteModel::ReplaceOne {
        filter,
        replacement,
        upsert: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_document_key_prefers_value() {
        let key = doc! { "_id": { "_data": "resume-token" } };
        let value = doc! { "documentKey": { "_id": 7 } };
        let event = ValidatedEvent::new(&key, &value);

        assert_eq!(document_key(&event).unwrap(), doc! { "_id": 7 });
    }

    #[test]
    fn test_document_key_falls_back_to_event_key() {
        let key = doc! { "_id": 7 };
        let value = doc! { "operationType": "delete" };
        let event = ValidatedEvent::new(&key, &value);

        assert_eq!(document_key(&event).unwrap(), doc! { "_id": 7 });
    }

    #[test]
    fn test_document_key_rejects_bad_shapes() {
        let key = doc! {};
        let value = doc! { "documentKey": "7" };
        let event = ValidatedEvent::new(&key, &value);
        assert!(matches!(
            document_key(&event),
            Err(OperationError::InvalidField { .. })
        ));

        let value = doc! { "operationType": "delete" };
        let event = ValidatedEvent::new(&key, &value);
        assert!(matches!(
            document_key(&event),
            Err(OperationError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_optional_document() {
        let value = doc! { "a": { "b": 1 }, "n": Bson::Null, "s": "x" };
        assert_eq!(optional_document(&value, "a").unwrap(), Some(&doc! { "b": 1 }));
        assert_eq!(optional_document(&value, "n").unwrap(), None);
        assert_eq!(optional_document(&value, "missing").unwrap(), None);
        assert!(optional_document(&value, "s").is_err());
    }

    #[test]
    fn test_default_operations_cover_every_kind() {
        let registry = default_operations();
        assert_eq!(registry.len(), 4);
        for kind in OperationKind::ALL {
            assert!(registry.contains(kind));
        }
    }
}
