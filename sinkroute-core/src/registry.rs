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

//! Mapping from operation kinds to the operations that translate them.
//!
//! An [`OperationRegistry`] is a four-slot dispatch table indexed by
//! [`OperationKind`]. It is assembled once through its builder and is
//! read-only afterwards, so a handler can be shared between worker threads
//! without locking.
//!
//! # Examples
//!
//! ```rust
//! use bson::doc;
//! use sinkroute_core::error::OperationError;
//! use sinkroute_core::event::ValidatedEvent;
//! use sinkroute_core::operation::{CdcOperation, OperationKind};
//! use sinkroute_core::registry::OperationRegistry;
//! use sinkroute_core::write_model::WriteModel;
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
//!
//! assert!(registry.contains(OperationKind::Delete));
//! assert!(!registry.contains(OperationKind::Insert));
//! ```

use crate::operation::{CdcOperation, OperationKind};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a registered operation.
pub type SharedOperation = Arc<dyn CdcOperation>;

/// Immutable dispatch table from [`OperationKind`] to [`CdcOperation`].
#[derive(Clone, Default)]
pub struct OperationRegistry {
    slots: [Option<SharedOperation>; 4],
}

impl OperationRegistry {
    /// Creates a new builder for `OperationRegistry`.
    #[must_use]
    pub fn builder() -> OperationRegistryBuilder {
        OperationRegistryBuilder::default()
    }

    /// Creates a registry with no operations.
    ///
    /// Every dispatch through a handler using it fails with a configuration
    /// error.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry from `(kind, operation)` pairs.
    ///
    /// A kind listed more than once keeps the last operation.
    #[must_use]
    pub fn from_operations<I>(operations: I) -> Self
    where
        I: IntoIterator<Item = (OperationKind, SharedOperation)>,
    {
        operations
            .into_iter()
            .fold(Self::builder(), |builder, (kind, op)| {
                builder.register_shared(kind, op)
            })
            .build()
    }

    /// Turns the registry back into a builder, keeping its registrations.
    ///
    /// Used to derive an override registry from an existing one before a
    /// handler is created.
    #[must_use]
    pub fn into_builder(self) -> OperationRegistryBuilder {
        OperationRegistryBuilder { slots: self.slots }
    }

    /// Returns the operation registered for `kind`.
    #[inline]
    #[must_use]
    pub fn get(&self, kind: OperationKind) -> Option<&dyn CdcOperation> {
        self.slots[kind.index()].as_deref()
    }

    /// Returns true if an operation is registered for `kind`.
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: OperationKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Returns the kinds that have an operation, in dispatch table order.
    #[must_use]
    pub fn registered_kinds(&self) -> Vec<OperationKind> {
        OperationKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    /// Returns the number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns true if no operation is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("registered", &self.registered_kinds())
            .finish()
    }
}

/// Builder for `OperationRegistry`.
#[derive(Default)]
pub struct OperationRegistryBuilder {
    slots: [Option<SharedOperation>; 4],
}

impl OperationRegistryBuilder {
    /// Registers `operation` for `kind`, replacing any earlier registration.
    #[must_use]
    pub fn register(self, kind: OperationKind, operation: impl CdcOperation + 'static) -> Self {
        self.register_shared(kind, Arc::new(operation))
    }

    /// Registers an already shared operation for `kind`.
    ///
    /// Lets one operation instance serve several kinds.
    #[must_use]
    pub fn register_shared(mut self, kind: OperationKind, operation: SharedOperation) -> Self {
        self.slots[kind.index()] = Some(operation);
        self
    }

    /// Builds the `OperationRegistry`.
    #[must_use]
    pub fn build(self) -> OperationRegistry {
        OperationRegistry { slots: self.slots }
    }
}

impl fmt::Debug for OperationRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistryBuilder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OperationError;
    use crate::event::ValidatedEvent;
    use crate::write_model::WriteModel;
    use bson::doc;

    struct Tagged(&'static str);

    impl CdcOperation for Tagged {
        fn perform(&self, event: &ValidatedEvent<'_>) -> Result<WriteModel, OperationError> {
            Ok(WriteModel::UpdateOne {
                filter: event.key().clone(),
                update: doc! { "$set": { "by": self.0 } },
                upsert: false,
            })
        }
    }

    fn tag_of(registry: &OperationRegistry, kind: OperationKind) -> Option<String> {
        let key = doc! { "_id": 1 };
        let value = doc! {};
        let event = ValidatedEvent::new(&key, &value);

        match registry.get(kind)?.perform(&event).ok()? {
            WriteModel::UpdateOne { update, .. } => update
                .get_document("$set")
                .ok()
                .and_then(|set| set.get_str("by").ok())
                .map(str::to_string),
            _ => None,
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = OperationRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.registered_kinds().is_empty());
        for kind in OperationKind::ALL {
            assert!(registry.get(kind).is_none());
        }
    }

    #[test]
    fn test_partial_registry_leaves_other_slots_empty() {
        let registry = OperationRegistry::builder()
            .register(OperationKind::Insert, Tagged("insert"))
            .register(OperationKind::Delete, Tagged("delete"))
            .build();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.registered_kinds(),
            vec![OperationKind::Insert, OperationKind::Delete]
        );
        assert!(registry.get(OperationKind::Update).is_none());
        assert_eq!(tag_of(&registry, OperationKind::Delete).as_deref(), Some("delete"));
    }

    #[test]
    fn test_later_registration_wins() {
        let registry = OperationRegistry::builder()
            .register(OperationKind::Update, Tagged("first"))
            .register(OperationKind::Update, Tagged("second"))
            .build();

        assert_eq!(registry.len(), 1);
        assert_eq!(tag_of(&registry, OperationKind::Update).as_deref(), Some("second"));
    }

    #[test]
    fn test_from_operations_shares_instances() {
        let shared: SharedOperation = Arc::new(Tagged("shared"));
        let registry = OperationRegistry::from_operations([
            (OperationKind::Insert, Arc::clone(&shared)),
            (OperationKind::Replace, Arc::clone(&shared)),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(Arc::strong_count(&shared), 3);
        assert_eq!(tag_of(&registry, OperationKind::Replace).as_deref(), Some("shared"));
    }

    #[test]
    fn test_into_builder_keeps_registrations() {
        let base = OperationRegistry::builder()
            .register(OperationKind::Insert, Tagged("insert"))
            .register(OperationKind::Update, Tagged("update"))
            .build();

        let derived = base
            .into_builder()
            .register(OperationKind::Update, Tagged("custom"))
            .build();

        assert_eq!(tag_of(&derived, OperationKind::Insert).as_deref(), Some("insert"));
        assert_eq!(tag_of(&derived, OperationKind::Update).as_deref(), Some("custom"));
    }

    #[test]
    fn test_debug_lists_registered_kinds() {
        let registry = OperationRegistry::builder()
            .register(OperationKind::Replace, Tagged("replace"))
            .build();
        assert_eq!(
            format!("{registry:?}"),
            "OperationRegistry { registered: [Replace] }"
        );
    }
}
