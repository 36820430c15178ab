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

use super::replace_with_full_document;
use sinkroute_core::error::OperationError;
use sinkroute_core::event::ValidatedEvent;
use sinkroute_core::operation::CdcOperation;
use sinkroute_core::write_model::WriteModel;

/// Translates `replace` events into an upserting replace of `fullDocument`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoDbReplace;

impl CdcOperation for MongoDbReplace {
    fn perform(&self, event: &ValidatedEvent<'_>) -> Result<WriteModel, OperationError> {
        replace_with_full_document(event)
    }
}
