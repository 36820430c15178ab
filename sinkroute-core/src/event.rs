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

//! Captured change events.
//!
//! A [`SinkDocument`] is the key/value document pair a sink receives for a
//! single change. The key identifies the source record; the value carries
//! the change itself and is absent for deletes and compaction tombstones.
//!
//! # Examples
//!
//! ```rust
//! use bson::doc;
//! use sinkroute_core::event::SinkDocument;
//!
//! let record = SinkDocument::new(
//!     Some(doc! { "_id": 7 }),
//!     Some(doc! { "operationType": "delete", "documentKey": { "_id": 7 } }),
//! );
//! assert!(record.key_doc().is_some());
//!
//! // Extended JSON, as produced by most Kafka converters
//! let record = SinkDocument::from_json(Some(r#"{"_id": {"$oid": "65a0c0ffee0000000000beef"}}"#), None)?;
//! assert!(record.value_doc().is_none());
//! # Ok::<(), sinkroute_core::error::RouterError>(())
//! ```

use crate::config::DEFAULT_ID_FIELD;
use crate::error::RouterError;
use bson::{Bson, Document};
use std::borrow::Cow;

/// A captured change event: an optional key document and an optional
/// value document.
///
/// The pair is immutable once constructed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinkDocument {
    key: Option<Document>,
    value: Option<Document>,
}

impl SinkDocument {
    /// Creates a sink document from already decoded key and value documents.
    #[must_use]
    pub const fn new(key: Option<Document>, value: Option<Document>) -> Self {
        Self { key, value }
    }

    /// Parses key and value from Extended JSON text.
    ///
    /// `None` or a JSON `null` leaves the corresponding side absent.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Conversion`] if either side is not valid JSON,
    /// is not valid Extended JSON, or is not a JSON object.
    pub fn from_json(key: Option<&str>, value: Option<&str>) -> Result<Self, RouterError> {
        Ok(Self {
            key: key.map(|raw| parse_document("key", raw)).transpose()?.flatten(),
            value: value
                .map(|raw| parse_document("value", raw))
                .transpose()?
                .flatten(),
        })
    }

    /// Returns the key document, if any.
    #[inline]
    #[must_use]
    pub const fn key_doc(&self) -> Option<&Document> {
        self.key.as_ref()
    }

    /// Returns the value document, if any.
    #[inline]
    #[must_use]
    pub const fn value_doc(&self) -> Option<&Document> {
        self.value.as_ref()
    }

    /// Checks the event's preconditions.
    ///
    /// A missing value is replaced by an empty document; a missing key is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::MissingKey`] if the event has no key document.
    pub fn validate<'a>(&'a self, id_field: &'a str) -> Result<ValidatedEvent<'a>, RouterError> {
        let key = self.key.as_ref().ok_or(RouterError::MissingKey)?;
        let value = self
            .value
            .as_ref()
            .map_or_else(|| Cow::Owned(Document::new()), Cow::Borrowed);

        Ok(ValidatedEvent {
            key,
            value,
            id_field,
        })
    }
}

fn parse_document(side: &str, raw: &str) -> Result<Option<Document>, RouterError> {
    let json: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| RouterError::conversion(format!("{side} is not valid JSON: {e}")))?;

    match Bson::try_from(json) {
        Ok(Bson::Document(doc)) => Ok(Some(doc)),
        Ok(Bson::Null) => Ok(None),
        Ok(other) => Err(RouterError::conversion(format!(
            "{side} must be a JSON object, found {:?}",
            other.element_type()
        ))),
        Err(e) => Err(RouterError::conversion(format!(
            "{side} is not valid extended JSON: {e}"
        ))),
    }
}

/// A change event that passed validation.
///
/// The key is always present. The value is the event's value document or
/// an empty document when the event had none.
#[derive(Debug, Clone)]
pub struct ValidatedEvent<'a> {
    key: &'a Document,
    value: Cow<'a, Document>,
    id_field: &'a str,
}

impl<'a> ValidatedEvent<'a> {
    /// Creates a validated event directly from borrowed documents.
    ///
    /// Uses `_id` as the identity field. Mostly useful for exercising
    /// [`CdcOperation`](crate::operation::CdcOperation) implementations
    /// without a handler.
    #[must_use]
    pub const fn new(key: &'a Document, value: &'a Document) -> Self {
        Self {
            key,
            value: Cow::Borrowed(value),
            id_field: DEFAULT_ID_FIELD,
        }
    }

    /// Like [`new`](Self::new) but reads the identity from `id_field`.
    #[must_use]
    pub const fn with_id_field(key: &'a Document, value: &'a Document, id_field: &'a str) -> Self {
        Self {
            key,
            value: Cow::Borrowed(value),
            id_field,
        }
    }

    /// Returns the key document.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> &Document {
        self.key
    }

    /// Returns the value document (empty when the event had no value).
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Document {
        &self.value
    }

    /// Returns the record identity from the key document, if present.
    #[must_use]
    pub fn identity(&self) -> Option<&Bson> {
        self.key.get(self.id_field)
    }

    /// Returns true if this is a compaction tombstone: the key names a
    /// record and the value carries nothing.
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        self.identity().is_some() && self.value.is_empty()
    }
}
