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

//! Fixtures shared by the routing benchmarks.

use bson::doc;
use sinkroute_core::event::SinkDocument;

/// Builds `count` change records cycling through insert, update, replace,
/// delete and tombstone.
#[must_use]
pub fn mixed_records(count: usize) -> Vec<SinkDocument> {
    (0..count)
        .map(|i| {
            let id = i64::try_from(i).unwrap_or(i64::MAX);
            let key = Some(doc! { "_id": id });
            let value = match i % 5 {
                0 => Some(doc! {
                    "operationType": "insert",
                    "documentKey": { "_id": id },
                    "fullDocument": { "_id": id, "user_id": format!("user_{}", i % 1000), "value": id },
                }),
                1 => Some(doc! {
                    "operationType": "update",
                    "documentKey": { "_id": id },
                    "updateDescription": {
                        "updatedFields": { "value": id + 1 },
                        "removedFields": ["stale"],
                    },
                }),
                2 => Some(doc! {
                    "operationType": "replace",
                    "documentKey": { "_id": id },
                    "fullDocument": { "_id": id, "value": id },
                }),
                3 => Some(doc! {
                    "operationType": "delete",
                    "documentKey": { "_id": id },
                }),
                _ => None,
            };
            SinkDocument::new(key, value)
        })
        .collect()
}

/// Builds `count` insert records with a payload of roughly `payload_size`
/// bytes each.
#[must_use]
pub fn insert_records(count: usize, payload_size: usize) -> Vec<SinkDocument> {
    let payload = "x".repeat(payload_size);
    (0..count)
        .map(|i| {
            let id = i64::try_from(i).unwrap_or(i64::MAX);
            SinkDocument::new(
                Some(doc! { "_id": id }),
                Some(doc! {
                    "operationType": "insert",
                    "documentKey": { "_id": id },
                    "fullDocument": { "_id": id, "data": payload.as_str() },
                }),
            )
        })
        .collect()
}
