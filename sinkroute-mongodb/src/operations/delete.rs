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

use super::document_key;
use sinkroute_core::error::OperationError;
use sinkroute_core::event::ValidatedEvent;
use sinkroute_core::operation::CdcOperation;
use sinkroute_core::write_model::WriteModel;

/// Translates `delete` events into a single-document delete by key.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoDbDelete;

impl CdcOperation for MongoDbDelete {
    fn perform(&self, event: &ValidatedEvent<'_>) -> Result<WriteModel, OperationError> {
        Ok(WriteModel::DeleteOne {
            filter: document_key(event)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_delete_by_document_key() {
        let key = doc! { "_id": 7 };
        let value = doc! { "operationType": "delete", "documentKey": { "_id": 7 } };

        let model = MongoDbDelete
            .perform(&ValidatedEvent::new(&key, &value))
            .unwrap();

        assert_eq!(
            model,
            WriteModel::DeleteOne {
                filter: doc! { "_id": 7 }
            }
        );
    }

    #[test]
    fn test_delete_never_uses_empty_filter() {
        let key = doc! {};
        let value = doc! { "operationType": "delete", "documentKey": {} };

        assert!(MongoDbDelete
            .perform(&ValidatedEvent::new(&key, &value))
            .is_err());
    }
}
