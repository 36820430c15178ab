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

//! Operation kinds and the translator and resolver contracts.
//!
//! A [`CdcHandler`](crate::handler::CdcHandler) never builds write models
//! itself. It asks an [`OperationResolver`] which [`OperationKind`] a value
//! document represents and then hands the event to the [`CdcOperation`]
//! registered for that kind.
//!
//! # Implementing a Custom Operation
//!
//! ```rust
//! use bson::doc;
//! use sinkroute_core::error::OperationError;
//! use sinkroute_core::event::ValidatedEvent;
//! use sinkroute_core::operation::CdcOperation;
//! use sinkroute_core::write_model::WriteModel;
//!
//! /// Soft-deletes records instead of removing them.
//! struct SoftDelete;
//!
//! impl CdcOperation for SoftDelete {
//!     fn perform(&self, event: &ValidatedEvent<'_>) -> Result<WriteModel, OperationError> {
//!         Ok(WriteModel::UpdateOne {
//!             filter: event.key().clone(),
//!             update: doc! { "$set": { "deleted": true } },
//!             upsert: false,
//!         })
//!     }
//! }
//! ```

use crate::error::{ClassificationReason, OperationError};
use crate::event::ValidatedEvent;
use crate::write_model::WriteModel;
use bson::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The logical mutation a change event represents.
///
/// This is a closed set. Markers naming anything else (`drop`, `rename`,
/// `invalidate`, ...) fail classification instead of producing a new kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// A document was inserted
    Insert,

    /// A document was replaced entirely
    Replace,

    /// A document was modified in place
    Update,

    /// A document was deleted
    Delete,
}

impl OperationKind {
    /// All kinds, in dispatch table order.
    pub const ALL: [Self; 4] = [Self::Insert, Self::Replace, Self::Update, Self::Delete];

    /// Returns the lowercase name used on the wire and in metric labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Replace => "replace",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Slot of this kind in the registry dispatch table.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Insert => 0,
            Self::Replace => 1,
            Self::Update => 2,
            Self::Delete => 3,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = ClassificationReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insert" => Ok(Self::Insert),
            "replace" => Ok(Self::Replace),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(ClassificationReason::Unrecognized {
                value: other.to_string(),
            }),
        }
    }
}

/// Translates a validated change event into a storage write.
///
/// One implementation exists per [`OperationKind`]. Handlers may be shared
/// across worker threads, so implementations must be `Send + Sync` and must
/// not rely on interior state changing between calls.
pub trait CdcOperation: Send + Sync {
    /// Builds the write model for `event`.
    ///
    /// # Errors
    ///
    /// Returns an [`OperationError`] when the payload is missing data the
    /// translation needs or carries it in the wrong shape.
    fn perform(&self, event: &ValidatedEvent<'_>) -> Result<WriteModel, OperationError>;
}

/// Determines the [`OperationKind`] of a value document.
///
/// The extraction scheme belongs to the implementation; the handler only
/// consumes the result.
pub trait OperationResolver: Send + Sync {
    /// Classifies `value`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClassificationReason`] when the document does not say,
    /// or says something unsupported, about its intent.
    fn resolve(&self, value: &Document) -> Result<OperationKind, ClassificationReason>;
}
