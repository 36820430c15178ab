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

//! Sinkroute Core - change-data-capture event routing
//!
//! This crate decides what a captured change event means for a sink. It
//! takes a key/value document pair, filters compaction tombstones, asks a
//! resolver which operation the event represents and delegates to the
//! operation registered for that kind, which returns a [`WriteModel`].
//!
//! # Key Components
//!
//! - **Events**: [`event`] defines [`SinkDocument`] and its validated view
//! - **Operations**: [`operation`] defines [`OperationKind`] and the
//!   [`CdcOperation`] and [`OperationResolver`] contracts
//! - **Registry**: [`registry`] maps kinds to operations
//! - **Handler**: [`handler`] validates, filters and dispatches
//! - **Write models**: [`write_model`] describes the resulting writes
//!
//! Executing write models is left to the caller. The built-in MongoDB
//! change stream operations live in the `sinkroute-mongodb` crate.
//!
//! # Example
//!
//! ```rust
//! use bson::{doc, Document};
//! use sinkroute_core::config::HandlerConfig;
//! use sinkroute_core::error::{ClassificationReason, OperationError};
//! use sinkroute_core::event::{SinkDocument, ValidatedEvent};
//! use sinkroute_core::handler::{CdcHandler, RouteOutcome};
//! use sinkroute_core::operation::{CdcOperation, OperationKind, OperationResolver};
//! use sinkroute_core::registry::OperationRegistry;
//! use sinkroute_core::write_model::WriteModel;
//!
//! struct AlwaysDelete;
//!
//! impl OperationResolver for AlwaysDelete {
//!     fn resolve(&self, _value: &Document) -> Result<OperationKind, ClassificationReason> {
//!         Ok(OperationKind::Delete)
//!     }
//! }
//!
//! struct DeleteByKey;
//!
//! impl CdcOperation for DeleteByKey {
//!     fn perform(&self, event: &ValidatedEvent<'_>) -> Result<WriteModel, OperationError> {
//!         Ok(WriteModel::DeleteOne { filter: event.key().clone() })
//!     }
//! }
//!
//! let registry = OperationRegistry::builder()
//!     .register(OperationKind::Delete, DeleteByKey)
//!     .build();
//! let config = HandlerConfig::builder().name("users").build().unwrap();
//! let handler = CdcHandler::new(config, registry, AlwaysDelete);
//!
//! // Tombstones are skipped
//! let tombstone = SinkDocument::new(Some(doc! { "_id": 7 }), None);
//! assert_eq!(handler.handle(&tombstone).unwrap(), RouteOutcome::Skip);
//!
//! // Everything else is dispatched
//! let delete = SinkDocument::new(Some(doc! { "_id": 7 }), Some(doc! { "deleted": true }));
//! assert!(handler.handle(&delete).unwrap().write_model().is_some());
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod metrics;
pub mod operation;
pub mod registry;
pub mod write_model;

pub use config::HandlerConfig;
pub use error::{ClassificationReason, OperationError, RouterError};
pub use event::{SinkDocument, ValidatedEvent};
pub use handler::{CdcHandler, RouteOutcome};
pub use operation::{CdcOperation, OperationKind, OperationResolver};
pub use registry::OperationRegistry;
pub use write_model::WriteModel;
