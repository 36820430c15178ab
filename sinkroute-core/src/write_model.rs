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

//! Storage write operations produced by CDC operations.
//!
//! A [`WriteModel`] describes a single-document write against the sink
//! collection. Executing it (bulk writes, ordering, retries) is the job of
//! whatever consumes the router's output.

use bson::Document;
use serde::{Deserialize, Serialize};

/// A single-document write operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WriteModel {
    /// Replace the document matching `filter` with `replacement`.
    #[serde(rename_all = "camelCase")]
    ReplaceOne {
        /// Selects the document to replace
        filter: Document,
        /// The new document
        replacement: Document,
        /// Insert `replacement` when nothing matches
        upsert: bool,
    },

    /// Apply update operators to the document matching `filter`.
    #[serde(rename_all = "camelCase")]
    UpdateOne {
        /// Selects the document to update
        filter: Document,
        /// Update operators, e.g. `$set` and `$unset`
        update: Document,
        /// Insert a document when nothing matches
        upsert: bool,
    },

    /// Delete the document matching `filter`.
    #[serde(rename_all = "camelCase")]
    DeleteOne {
        /// Selects the document to delete
        filter: Document,
    },
}

impl WriteModel {
    /// Returns the filter that selects the target document.
    #[must_use]
    pub const fn filter(&self) -> &Document {
        match self {
            Self::ReplaceOne { filter, .. }
            | Self::UpdateOne { filter, .. }
            | Self::DeleteOne { filter } => filter,
        }
    }

    /// Returns a short name for the write, suitable for log fields.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::ReplaceOne { .. } => "replace_one",
            Self::UpdateOne { .. } => "update_one",
            Self::DeleteOne { .. } => "delete_one",
        }
    }

    /// Returns true if the write inserts when its filter matches nothing.
    #[must_use]
    pub const fn is_upsert(&self) -> bool {
        match self {
            Self::ReplaceOne { upsert, .. } | Self::UpdateOne { upsert, .. } => *upsert,
            Self::DeleteOne { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_filter_and_upsert() {
        let replace = WriteModel::ReplaceOne {
            filter: doc! { "_id": 1 },
            replacement: doc! { "_id": 1, "name": "Alice" },
            upsert: true,
        };
        assert_eq!(replace.filter(), &doc! { "_id": 1 });
        assert!(replace.is_upsert());
        assert_eq!(replace.kind_name(), "replace_one");

        let delete = WriteModel::DeleteOne {
            filter: doc! { "_id": 2 },
        };
        assert!(!delete.is_upsert());
        assert_eq!(delete.kind_name(), "delete_one");
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let update = WriteModel::UpdateOne {
            filter: doc! { "_id": 3 },
            update: doc! { "$set": { "active": false } },
            upsert: false,
        };

        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], "updateOne");
        assert_eq!(json["update"]["$set"]["active"], false);
    }
}
