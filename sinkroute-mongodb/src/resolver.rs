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

//! Operation type resolution for MongoDB change stream documents.

use bson::{Bson, Document};
use sinkroute_core::config::DEFAULT_OPERATION_FIELD;
use sinkroute_core::error::ClassificationReason;
use sinkroute_core::operation::{OperationKind, OperationResolver};

/// Reads the operation kind from a string marker field.
///
/// MongoDB change stream documents name their operation in
/// `operationType`. A null marker counts as missing.
///
/// # Examples
///
/// ```rust
/// use bson::doc;
/// use sinkroute_core::operation::{OperationKind, OperationResolver};
/// use sinkroute_mongodb::resolver::OperationTypeResolver;
///
/// let resolver = OperationTypeResolver::default();
/// let kind = resolver.resolve(&doc! { "operationType": "replace" }).unwrap();
/// assert_eq!(kind, OperationKind::Replace);
///
/// assert!(resolver.resolve(&doc! { "operationType": "drop" }).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTypeResolver {
    field: String,
}

impl OperationTypeResolver {
    /// Creates a resolver reading `field`.
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Returns the marker field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl Default for OperationTypeResolver {
    fn default() -> Self {
        Self::new(DEFAULT_OPERATION_FIELD)
    }
}

impl OperationResolver for OperationTypeResolver {
    fn resolve(&self, value: &Document) -> Result<OperationKind, ClassificationReason> {
        match value.get(&self.field) {
            Some(Bson::String(op)) => op.parse(),
            None | Some(Bson::Null) => Err(ClassificationReason::MissingField {
                field: self.field.clone(),
            }),
            Some(other) => Err(ClassificationReason::NotAString {
                field: self.field.clone(),
                found: format!("{:?}", other.element_type()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_resolves_all_supported_kinds() {
        let resolver = OperationTypeResolver::default();
        for kind in OperationKind::ALL {
            let value = doc! { "operationType": kind.as_str() };
            assert_eq!(resolver.resolve(&value), Ok(kind));
        }
    }

    #[test]
    fn test_missing_and_null_markers() {
        let resolver = OperationTypeResolver::default();
        let expected = Err(ClassificationReason::MissingField {
            field: "operationType".to_string(),
        });

        assert_eq!(resolver.resolve(&doc! { "fullDocument": {} }), expected);
        assert_eq!(resolver.resolve(&doc! { "operationType": Bson::Null }), expected);
    }

    #[test]
    fn test_non_string_marker() {
        let resolver = OperationTypeResolver::default();
        assert_eq!(
            resolver.resolve(&doc! { "operationType": 1 }),
            Err(ClassificationReason::NotAString {
                field: "operationType".to_string(),
                found: "Int32".to_string(),
            })
        );
    }

    #[test]
    fn test_unsupported_change_stream_events() {
        let resolver = OperationTypeResolver::default();
        for op in ["drop", "rename", "dropDatabase", "invalidate"] {
            assert_eq!(
                resolver.resolve(&doc! { "operationType": op }),
                Err(ClassificationReason::Unrecognized {
                    value: op.to_string()
                })
            );
        }
    }

    #[test]
    fn test_custom_field() {
        let resolver = OperationTypeResolver::new("op");
        assert_eq!(resolver.field(), "op");
        assert_eq!(
            resolver.resolve(&doc! { "op": "delete" }),
            Ok(OperationKind::Delete)
        );
    }
}
