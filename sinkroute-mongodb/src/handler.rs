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

//! A [`CdcHandler`] preconfigured for MongoDB change stream documents.

use crate::operations::default_operations;
use crate::resolver::OperationTypeResolver;
use sinkroute_core::config::HandlerConfig;
use sinkroute_core::error::RouterError;
use sinkroute_core::event::SinkDocument;
use sinkroute_core::handler::{CdcHandler, RouteOutcome};
use sinkroute_core::registry::OperationRegistry;

/// Routes MongoDB change stream events to MongoDB write models.
///
/// The operation type is read from the configured
/// [`operation_field`](HandlerConfig::operation_field).
///
/// # Examples
///
/// ```rust
/// use bson::doc;
/// use sinkroute_core::config::HandlerConfig;
/// use sinkroute_core::event::SinkDocument;
/// use sinkroute_core::handler::RouteOutcome;
/// use sinkroute_mongodb::MongoDbHandler;
///
/// let config = HandlerConfig::builder().name("shop.orders").build().unwrap();
/// let handler = MongoDbHandler::new(config);
///
/// let tombstone = SinkDocument::new(Some(doc! { "_id": 7 }), None);
/// assert_eq!(handler.handle(&tombstone).unwrap(), RouteOutcome::Skip);
///
/// let delete = SinkDocument::new(
///     Some(doc! { "_id": 7 }),
///     Some(doc! { "operationType": "delete", "documentKey": { "_id": 7 } }),
/// );
/// let model = handler.handle(&delete).unwrap().into_write_model().unwrap();
/// assert_eq!(model.filter(), &doc! { "_id": 7 });
/// ```
#[derive(Debug)]
pub struct MongoDbHandler {
    inner: CdcHandler<OperationTypeResolver>,
}

impl MongoDbHandler {
    /// Creates a handler with the built-in insert, replace, update and
    /// delete operations.
    #[must_use]
    pub fn new(config: HandlerConfig) -> Self {
        Self::with_operations(config, default_operations())
    }

    /// Creates a handler with caller-supplied operations.
    ///
    /// `operations` replaces the defaults entirely. Kinds it leaves out fail
    /// with [`RouterError::Configuration`] instead of falling back to a
    /// built-in. To override a single kind, start from
    /// [`default_operations`] and use
    /// [`OperationRegistry::into_builder`]. A registry built from scratch
    /// covers only what it registers:
    ///
    /// ```rust
    /// use sinkroute_core::config::HandlerConfig;
    /// use sinkroute_core::operation::OperationKind;
    /// use sinkroute_core::registry::OperationRegistry;
    /// use sinkroute_mongodb::operations::{MongoDbDelete, MongoDbInsert, MongoDbReplace};
    /// use sinkroute_mongodb::MongoDbHandler;
    ///
    /// // Treat updates like replaces; deletes are not sunk at all
    /// let operations = OperationRegistry::builder()
    ///     .register(OperationKind::Insert, MongoDbInsert)
    ///     .register(OperationKind::Replace, MongoDbReplace)
    ///     .register(OperationKind::Update, MongoDbReplace)
    ///     .build();
    ///
    /// let config = HandlerConfig::builder().name("audit").build().unwrap();
    /// let handler = MongoDbHandler::with_operations(config, operations);
    /// assert!(!handler.registry().contains(OperationKind::Delete));
    /// ```
    #[must_use]
    pub fn with_operations(config: HandlerConfig, operations: OperationRegistry) -> Self {
        let resolver = OperationTypeResolver::new(config.operation_field.clone());
        Self {
            inner: CdcHandler::new(config, operations, resolver),
        }
    }

    /// Routes a single change event.
    ///
    /// # Errors
    ///
    /// See [`CdcHandler::handle`].
    pub fn handle(&self, doc: &SinkDocument) -> Result<RouteOutcome, RouterError> {
        self.inner.handle(doc)
    }

    /// Returns the handler configuration.
    #[must_use]
    pub const fn config(&self) -> &HandlerConfig {
        self.inner.config()
    }

    /// Returns the operation registry.
    #[must_use]
    pub const fn registry(&self) -> &OperationRegistry {
        self.inner.registry()
    }

    /// Returns the underlying generic handler.
    #[must_use]
    pub const fn as_cdc_handler(&self) -> &CdcHandler<OperationTypeResolver> {
        &self.inner
    }
}

impl From<MongoDbHandler> for CdcHandler<OperationTypeResolver> {
    fn from(handler: MongoDbHandler) -> Self {
        handler.inner
    }
}
