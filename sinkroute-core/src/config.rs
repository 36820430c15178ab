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

//! Handler configuration.

/// Identity field checked by the tombstone rule unless configured otherwise.
pub const DEFAULT_ID_FIELD: &str = "_id";

/// Marker field naming the operation type in MongoDB change stream values.
pub const DEFAULT_OPERATION_FIELD: &str = "operationType";

/// Configuration for a [`CdcHandler`](crate::handler::CdcHandler).
///
/// # Examples
///
/// ```rust
/// use sinkroute_core::config::HandlerConfig;
///
/// let config = HandlerConfig::builder()
///     .name("inventory.products")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.id_field, "_id");
/// assert_eq!(config.operation_field, "operationType");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Logical handler name (required), usually the source topic.
    ///
    /// Used as a span field and metric label.
    pub name: String,

    /// Key field that identifies the source record (default: `_id`).
    pub id_field: String,

    /// Value field the resolver reads the operation type from
    /// (default: `operationType`).
    pub operation_field: String,

    /// Emit key and value documents at debug level (default: true).
    ///
    /// Disable when documents may carry data that must not reach logs.
    pub trace_documents: bool,
}

impl HandlerConfig {
    /// Creates a new builder for `HandlerConfig`.
    #[must_use]
    pub fn builder() -> HandlerConfigBuilder {
        HandlerConfigBuilder::default()
    }
}

/// Builder for `HandlerConfig`.
#[derive(Debug, Default)]
pub struct HandlerConfigBuilder {
    name: Option<String>,
    id_field: Option<String>,
    operation_field: Option<String>,
    trace_documents: Option<bool>,
}

impl HandlerConfigBuilder {
    /// Sets the handler name (required).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the key identity field (default: `_id`).
    #[must_use]
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = Some(field.into());
        self
    }

    /// Sets the operation marker field (default: `operationType`).
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// // Debezium-style envelopes
    /// builder.operation_field("op")
    /// ```
    #[must_use]
    pub fn operation_field(mut self, field: impl Into<String>) -> Self {
        self.operation_field = Some(field.into());
        self
    }

    /// Enables or disables the key/value debug trace (default: true).
    #[must_use]
    pub fn trace_documents(mut self, enabled: bool) -> Self {
        self.trace_documents = Some(enabled);
        self
    }

    /// Builds the `HandlerConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing or invalid:
    /// - `name` is required and must not be empty
    /// - `id_field` and `operation_field` must not be empty when set
    pub fn build(self) -> Result<HandlerConfig, String> {
        let name = self.name.ok_or("name is required")?;
        if name.is_empty() {
            return Err("name cannot be empty".to_string());
        }

        let id_field = self
            .id_field
            .unwrap_or_else(|| DEFAULT_ID_FIELD.to_string());
        if id_field.is_empty() {
            return Err("id_field cannot be empty".to_string());
        }

        let operation_field = self
            .operation_field
            .unwrap_or_else(|| DEFAULT_OPERATION_FIELD.to_string());
        if operation_field.is_empty() {
            return Err("operation_field cannot be empty".to_string());
        }

        Ok(HandlerConfig {
            name,
            id_field,
            operation_field,
            trace_documents: self.trace_documents.unwrap_or(true),
        })
    }
}
