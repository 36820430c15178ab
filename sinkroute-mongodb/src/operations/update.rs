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

use super::{
    document_key, optional_document, replace_with_full_document, FULL_DOCUMENT, REMOVED_FIELDS,
    TRUNCATED_ARRAYS, UPDATED_FIELDS, UPDATE_DESCRIPTION,
};
use bson::{doc, Bson, Document};
use sinkroute_core::error::OperationError;
use sinkroute_core::event::ValidatedEvent;
use sinkroute_core::operation::CdcOperation;
use sinkroute_core::write_model::WriteModel;
use tracing::debug;

/// Translates `update` events.
///
/// With a `fullDocument` (change streams opened with `updateLookup`), the
/// post-image replaces the target document. Otherwise the
/// `updateDescription` is turned into update operators:
///
/// - `updatedFields` becomes `$set`
/// - `removedFields` becomes `$unset`
/// - `truncatedArrays` becomes `$push` with an empty `$each` and `$slice`
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoDbUpdate;

impl CdcOperation for MongoDbUpdate {
    fn perform(&self, event: &ValidatedEvent<'_>) -> Result<WriteModel, OperationError> {
        let value = event.value();

        if optional_document(value, FULL_DOCUMENT)?.is_some() {
            debug!("Full document present, replacing the document");
            return replace_with_full_document(event);
        }

        let description = optional_document(value, UPDATE_DESCRIPTION)?
            .ok_or_else(|| OperationError::missing_field(UPDATE_DESCRIPTION))?;

        Ok(WriteModel::UpdateOne {
            filter: document_key(event)?,
            update: update_document(description)?,
            upsert: false,
        })
    }
}

fn update_document(description: &Document) -> Result<Document, OperationError> {
    let mut update = Document::new();

    if let Some(updated) = optional_document(description, UPDATED_FIELDS)? {
        if !updated.is_empty() {
            update.insert("$set", updated.clone());
        }
    }

    let mut unset = Document::new();
    for field in array(description, REMOVED_FIELDS)? {
        let Bson::String(name) = field else {
            return Err(OperationError::invalid_field(
                REMOVED_FIELDS,
                "an array of field names",
            ));
        };
        unset.insert(name.as_str(), "");
    }
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }

    let mut push = Document::new();
    for entry in array(description, TRUNCATED_ARRAYS)? {
        let (field, new_size) = truncation(entry)?;
        push.insert(field, doc! { "$each": [], "$slice": new_size });
    }
    if !push.is_empty() {
        update.insert("$push", push);
    }

    if update.is_empty() {
        return Err(OperationError::EmptyUpdate);
    }

    Ok(update)
}

/// Returns the array `field`, treating absent and null as empty.
fn array<'a>(description: &'a Document, field: &str) -> Result<&'a [Bson], OperationError> {
    match description.get(field) {
        Some(Bson::Array(items)) => Ok(items.as_slice()),
        None | Some(Bson::Null) => Ok(&[]),
        Some(_) => Err(OperationError::invalid_field(field, "an array")),
    }
}

/// Parses a `{ field, newSize }` truncation entry.
fn truncation(entry: &Bson) -> Result<(&str, i64), OperationError> {
    let invalid = || {
        OperationError::invalid_field(
            TRUNCATED_ARRAYS,
            "documents with a string 'field' and a non-negative 'newSize'",
        )
    };

    let Bson::Document(entry) = entry else {
        return Err(invalid());
    };

    let field = entry.get_str("field").map_err(|_| invalid())?;
    let new_size = match entry.get("newSize") {
        Some(Bson::Int32(n)) if *n >= 0 => i64::from(*n),
        Some(Bson::Int64(n)) if *n >= 0 => *n,
        _ => return Err(invalid()),
    };

    Ok((field, new_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn perform(value: &Document) -> Result<WriteModel, OperationError> {
        let key = doc! { "_id": 7 };
        MongoDbUpdate.perform(&ValidatedEvent::new(&key, value))
    }

    #[test]
    fn test_update_description_becomes_operators() {
        let model = perform(&doc! {
            "operationType": "update",
            "documentKey": { "_id": 7 },
            "updateDescription": {
                "updatedFields": { "email": "alice@example.com" },
                "removedFields": ["nickname", "legacy.flag"],
            },
        })
        .unwrap();

        assert_eq!(
            model,
            WriteModel::UpdateOne {
                filter: doc! { "_id": 7 },
                update: doc! {
                    "$set": { "email": "alice@example.com" },
                    "$unset": { "nickname": "", "legacy.flag": "" },
                },
                upsert: false,
            }
        );
    }

    #[test]
    fn test_full_document_wins_over_description() {
        let model = perform(&doc! {
            "operationType": "update",
            "documentKey": { "_id": 7 },
            "fullDocument": { "_id": 7, "email": "alice@example.com" },
            "updateDescription": { "updatedFields": { "email": "alice@example.com" } },
        })
        .unwrap();

        assert_eq!(
            model,
            WriteModel::ReplaceOne {
                filter: doc! { "_id": 7 },
                replacement: doc! { "_id": 7, "email": "alice@example.com" },
                upsert: true,
            }
        );
    }

    #[test]
    fn test_null_full_document_uses_description() {
        let model = perform(&doc! {
            "operationType": "update",
            "fullDocument": Bson::Null,
            "updateDescription": { "updatedFields": { "n": 2 } },
        })
        .unwrap();

        assert_eq!(model.kind_name(), "update_one");
    }

    #[test]
    fn test_truncated_arrays_become_slices() {
        let model = perform(&doc! {
            "operationType": "update",
            "updateDescription": {
                "updatedFields": {},
                "removedFields": [],
                "truncatedArrays": [{ "field": "tags", "newSize": 2 }],
            },
        })
        .unwrap();

        let WriteModel::UpdateOne { update, .. } = model else {
            panic!("expected an update");
        };
        assert_eq!(
            update,
            doc! { "$push": { "tags": { "$each": [], "$slice": 2_i64 } } }
        );
    }

    #[test]
    fn test_empty_description_is_rejected() {
        let err = perform(&doc! {
            "operationType": "update",
            "updateDescription": { "updatedFields": {}, "removedFields": [] },
        })
        .unwrap_err();

        assert!(matches!(err, OperationError::EmptyUpdate));
    }

    #[test]
    fn test_missing_description_is_rejected() {
        let err = perform(&doc! { "operationType": "update" }).unwrap_err();
        assert!(matches!(err, OperationError::MissingField { field } if field == "updateDescription"));
    }

    #[test]
    fn test_malformed_removed_fields() {
        let err = perform(&doc! {
            "operationType": "update",
            "updateDescription": { "removedFields": [1] },
        })
        .unwrap_err();
        assert!(matches!(err, OperationError::InvalidField { field, .. } if field == "removedFields"));

        let err = perform(&doc! {
            "operationType": "update",
            "updateDescription": { "removedFields": "name" },
        })
        .unwrap_err();
        assert!(matches!(err, OperationError::InvalidField { .. }));
    }

    #[test]
    fn test_malformed_truncation() {
        let err = perform(&doc! {
            "operationType": "update",
            "updateDescription": { "truncatedArrays": [{ "field": "tags", "newSize": -1 }] },
        })
        .unwrap_err();
        assert!(matches!(err, OperationError::InvalidField { field, .. } if field == "truncatedArrays"));
    }
}
