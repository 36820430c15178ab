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

//! MongoDB change stream operations for the sinkroute CDC router.
//!
//! This crate provides the MongoDB flavour of
//! [`CdcHandler`](sinkroute_core::handler::CdcHandler):
//!
//! - [`resolver::OperationTypeResolver`] reads `operationType`
//! - [`operations`] holds the built-in insert, replace, update and delete
//!   operations and [`default_operations`]
//! - [`MongoDbHandler`] wires them together
//!
//! # Example
//!
//! ```rust
//! use sinkroute_core::config::HandlerConfig;
//! use sinkroute_core::event::SinkDocument;
//! use sinkroute_core::write_model::WriteModel;
//! use sinkroute_mongodb::MongoDbHandler;
//!
//! let handler = MongoDbHandler::new(HandlerConfig::builder().name("users").build()?);
//!
//! let record = SinkDocument::from_json(
//!     Some(r#"{"_id": 7}"#),
//!     Some(r#"{"operationType": "insert", "documentKey": {"_id": 7}, "fullDocument": {"_id": 7, "name": "Alice"}}"#),
//! )?;
//!
//! match handler.handle(&record)?.into_write_model() {
//!     Some(WriteModel::ReplaceOne { upsert, .. }) => assert!(upsert),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod handler;
pub mod operations;
pub mod resolver;

pub use handler::MongoDbHandler;
pub use operations::default_operations;
pub use resolver::OperationTypeResolver;
