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

//! Validation and dispatch of captured change events.
//!
//! [`CdcHandler::handle`] moves every event through the same steps:
//!
//! ```text
//! Received ──► Validated ──► Skipped (tombstone)
//!    │             │
//!    │             └──► Classified ──► Dispatched ──► Completed
//!    │                      │               │
//!    └──────────────────────┴───────────────┴──► Failed
//! ```
//!
//! 1. **Validate**: reject events without a key, treat a missing value as an
//!    empty document, trace both documents.
//! 2. **Filter tombstones**: a key with an identity and an empty value is a
//!    compaction marker and yields [`RouteOutcome::Skip`]. This runs before
//!    classification, so no resolver or operation ever sees a tombstone.
//! 3. **Classify**: the [`OperationResolver`] names the [`OperationKind`].
//! 4. **Dispatch**: the registered [`CdcOperation`](crate::operation::CdcOperation)
//!    turns the whole event (key and value) into a [`WriteModel`].
//!
//! There are no retries. Every failure is returned to the caller.
//!
//! # Thread Safety
//!
//! A handler is immutable after construction. Wrap it in an `Arc` to share it
//! between workers routing different events in parallel.

use crate::config::HandlerConfig;
use crate::error::RouterError;
use crate::event::{SinkDocument, ValidatedEvent};
use crate::metrics::{self, SkipReason, Timer};
use crate::operation::{OperationKind, OperationResolver};
use crate::registry::OperationRegistry;
use crate::write_model::WriteModel;
use tracing::{debug, error, instrument, warn};

/// Result of routing a single event.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// The event was intentionally ignored.
    Skip,

    /// The event translated into a write.
    Write(WriteModel),
}

impl RouteOutcome {
    /// Returns true if the event was skipped.
    #[inline]
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }

    /// Returns the write model, if any.
    #[must_use]
    pub const fn write_model(&self) -> Option<&WriteModel> {
        match self {
            Self::Skip => None,
            Self::Write(model) => Some(model),
        }
    }

    /// Consumes the outcome and returns the write model, if any.
    #[must_use]
    pub fn into_write_model(self) -> Option<WriteModel> {
        match self {
            Self::Skip => None,
            Self::Write(model) => Some(model),
        }
    }
}

/// Result of the validation step.
#[derive(Debug, Clone)]
pub enum Validated<'a> {
    /// The event is a compaction tombstone and must not be dispatched.
    Tombstone,

    /// The event is ready for classification.
    Event(ValidatedEvent<'a>),
}

/// Routes captured change events to the operation registered for their kind.
#[derive(Debug)]
pub struct CdcHandler<R> {
    config: HandlerConfig,
    registry: OperationRegistry,
    resolver: R,
}

impl<R: OperationResolver> CdcHandler<R> {
    /// Creates a handler from its configuration, operations and resolver.
    ///
    /// The registry is used as-is. Kinds it does not cover fail with
    /// [`RouterError::Configuration`] when an event resolves to them.
    #[must_use]
    pub fn new(config: HandlerConfig, registry: OperationRegistry, resolver: R) -> Self {
        if registry.len() < OperationKind::ALL.len() {
            debug!(
                handler = %config.name,
                registered = ?registry.registered_kinds(),
                "Handler created with a partial operation registry"
            );
        }

        Self {
            config,
            registry,
            resolver,
        }
    }

    /// Returns the handler configuration.
    #[must_use]
    pub const fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Returns the operation registry.
    #[must_use]
    pub const fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Returns the operation resolver.
    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Routes a single event.
    ///
    /// # Errors
    ///
    /// - [`RouterError::MissingKey`] if the event has no key document
    /// - [`RouterError::Classification`] if the resolver cannot name a kind
    /// - [`RouterError::Configuration`] if no operation is registered for the kind
    /// - [`RouterError::Operation`] if the operation rejects the event
    #[instrument(skip_all, fields(handler = %self.config.name))]
    pub fn handle(&self, doc: &SinkDocument) -> Result<RouteOutcome, RouterError> {
        let _timer = Timer::new(self.config.name.as_str(), metrics::record_route_duration);

        let result = match self.validate(doc) {
            Ok(Validated::Tombstone) => Ok(RouteOutcome::Skip),
            Ok(Validated::Event(event)) => self.dispatch(&event).map(RouteOutcome::Write),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            metrics::increment_events_failed(&self.config.name, e.category());
        }

        result
    }

    /// Checks preconditions and filters tombstones.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::MissingKey`] if the event has no key document.
    pub fn validate<'a>(&'a self, doc: &'a SinkDocument) -> Result<Validated<'a>, RouterError> {
        let event = doc
            .validate(&self.config.id_field)
            .inspect_err(|_| warn!("Rejecting change event without key document"))?;

        if self.config.trace_documents {
            debug!(key = %event.key(), "key");
            debug!(value = %event.value(), "value");
        }

        if event.is_tombstone() {
            debug!(id = ?event.identity(), "Skipping tombstone event for topic compaction");
            metrics::increment_events_skipped(&self.config.name, SkipReason::Tombstone);
            return Ok(Validated::Tombstone);
        }

        Ok(Validated::Event(event))
    }

    /// Classifies a validated, non-tombstone event and runs the matching
    /// operation. Only reachable through [`handle`](Self::handle).
    fn dispatch(&self, event: &ValidatedEvent<'_>) -> Result<WriteModel, RouterError> {
        let kind = self.resolver.resolve(event.value()).map_err(|reason| {
            warn!(%reason, "Unable to classify change event");
            RouterError::classification(reason)
        })?;

        let operation = self.registry.get(kind).ok_or_else(|| {
            error!(operation = %kind, "No CDC operation registered for operation type");
            RouterError::Configuration { kind }
        })?;

        let model = operation
            .perform(event)
            .map_err(|source| RouterError::Operation { kind, source })?;

        debug!(operation = %kind, write = model.kind_name(), "Change event translated");
        metrics::increment_events_routed(&self.config.name, kind.as_str());

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClassificationReason, OperationError};
    use crate::operation::{CdcOperation, OperationKind};
    use bson::{doc, Document};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Resolves every value to a fixed kind and counts calls.
    struct FixedResolver {
        kind: OperationKind,
        calls: AtomicUsize,
    }

    impl OperationResolver for FixedResolver {
        fn resolve(&self, _value: &Document) -> Result<OperationKind, ClassificationReason> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.kind)
        }
    }

    struct DeleteByKey {
        calls: Arc<AtomicUsize>,
    }

    impl CdcOperation for DeleteByKey {
        fn perform(&self, event: &ValidatedEvent<'_>) -> Result<WriteModel, OperationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(WriteModel::DeleteOne {
                filter: event.key().clone(),
            })
        }
    }

    fn handler(kind: OperationKind) -> (CdcHandler<FixedResolver>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = OperationRegistry::builder()
            .register(
                OperationKind::Delete,
                DeleteByKey {
                    calls: Arc::clone(&calls),
                },
            )
            .build();
        let resolver = FixedResolver {
            kind,
            calls: AtomicUsize::new(0),
        };
        let config = HandlerConfig::builder().name("test").build().unwrap();

        (CdcHandler::new(config, registry, resolver), calls)
    }

    #[test]
    fn test_tombstone_skips_before_resolution() {
        let (handler, calls) = handler(OperationKind::Delete);
        let doc = SinkDocument::new(Some(doc! { "_id": 7 }), None);

        let outcome = handler.handle(&doc).unwrap();

        assert!(outcome.is_skip());
        assert_eq!(handler.resolver().calls.load(Ordering::SeqCst), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_key_never_reaches_resolver() {
        let (handler, calls) = handler(OperationKind::Delete);
        let doc = SinkDocument::new(None, Some(doc! { "anything": 1 }));

        let err = handler.handle(&doc).unwrap_err();

        assert!(matches!(err, RouterError::MissingKey));
        assert_eq!(handler.resolver().calls.load(Ordering::SeqCst), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dispatch_uses_registered_operation() {
        let (handler, calls) = handler(OperationKind::Delete);
        let doc = SinkDocument::new(Some(doc! { "_id": 7 }), Some(doc! { "anything": 1 }));

        let outcome = handler.handle(&doc).unwrap();

        assert_eq!(
            outcome,
            RouteOutcome::Write(WriteModel::DeleteOne {
                filter: doc! { "_id": 7 }
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unregistered_kind_is_configuration_error() {
        let (handler, calls) = handler(OperationKind::Insert);
        let doc = SinkDocument::new(Some(doc! { "_id": 7 }), Some(doc! { "anything": 1 }));

        let err = handler.handle(&doc).unwrap_err();

        assert!(matches!(
            err,
            RouterError::Configuration {
                kind: OperationKind::Insert
            }
        ));
        assert!(err.is_fatal());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_value_without_identity_is_classified() {
        let (handler, calls) = handler(OperationKind::Delete);
        let doc = SinkDocument::new(Some(doc! { "other": 7 }), None);

        handler.handle(&doc).unwrap();

        assert_eq!(handler.resolver().calls.load(Ordering::SeqCst), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_route_outcome_accessors() {
        assert!(RouteOutcome::Skip.write_model().is_none());

        let outcome = RouteOutcome::Write(WriteModel::DeleteOne {
            filter: doc! { "_id": 1 },
        });
        assert!(!outcome.is_skip());
        assert!(outcome.write_model().is_some());
        assert_eq!(
            outcome.into_write_model(),
            Some(WriteModel::DeleteOne {
                filter: doc! { "_id": 1 }
            })
        );
    }

    #[test]
    fn test_handler_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CdcHandler<FixedResolver>>();
    }
}
