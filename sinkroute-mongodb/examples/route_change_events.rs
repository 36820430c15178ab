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

//! Routing a stream of MongoDB change events
//!
//! This example feeds a handful of change stream records (as a Kafka sink
//! would receive them, Extended JSON key and value) through a
//! [`MongoDbHandler`] and prints the resulting write models. Tombstones and
//! unsupported events are shown alongside.
//!
//! Routing metrics are recorded into a Prometheus recorder and rendered at
//! the end.
//!
//! # Running the Example
//!
//! ```bash
//! RUST_LOG=debug cargo run -p sinkroute-mongodb --example route_change_events
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use sinkroute_core::config::HandlerConfig;
use sinkroute_core::event::SinkDocument;
use sinkroute_core::handler::RouteOutcome;
use sinkroute_core::metrics;
use sinkroute_mongodb::MongoDbHandler;
use std::error::Error;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const RECORDS: &[(Option<&str>, Option<&str>)] = &[
    (
        Some(r#"{"_id": 1}"#),
        Some(
            r#"{"operationType": "insert", "documentKey": {"_id": 1},
                "fullDocument": {"_id": 1, "name": "Alice", "email": "alice@example.com"}}"#,
        ),
    ),
    (
        Some(r#"{"_id": 1}"#),
        Some(
            r#"{"operationType": "update", "documentKey": {"_id": 1},
                "updateDescription": {"updatedFields": {"email": "alice@example.org"}, "removedFields": []}}"#,
        ),
    ),
    (
        Some(r#"{"_id": 2}"#),
        Some(
            r#"{"operationType": "replace", "documentKey": {"_id": 2},
                "fullDocument": {"_id": 2, "name": "Bob"}}"#,
        ),
    ),
    (
        Some(r#"{"_id": 2}"#),
        Some(r#"{"operationType": "delete", "documentKey": {"_id": 2}}"#),
    ),
    // Compaction tombstone for the delete above
    (Some(r#"{"_id": 2}"#), None),
    // Collection-level events are not routed
    (
        Some(r#"{"_id": 3}"#),
        Some(r#"{"operationType": "drop", "ns": {"db": "shop", "coll": "users"}}"#),
    ),
    // No key at all
    (None, Some(r#"{"operationType": "insert"}"#)),
];

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let prometheus = PrometheusBuilder::new().install_recorder()?;
    metrics::init_metrics();

    let config = HandlerConfig::builder().name("shop.users").build()?;
    let handler = MongoDbHandler::new(config);

    info!("Routing {} change records", RECORDS.len());

    for (index, (key, value)) in RECORDS.iter().enumerate() {
        let record = SinkDocument::from_json(*key, *value)?;

        match handler.handle(&record) {
            Ok(RouteOutcome::Write(model)) => {
                info!(
                    record = index,
                    write = model.kind_name(),
                    filter = %model.filter(),
                    "Write model ready"
                );
                println!("{}", serde_json::to_string(&model)?);
            }
            Ok(RouteOutcome::Skip) => info!(record = index, "Record skipped"),
            Err(e) if e.is_fatal() => {
                error!(record = index, %e, "Handler misconfigured, stopping");
                return Err(e.into());
            }
            Err(e) => warn!(record = index, %e, "Record rejected"),
        }
    }

    println!("{}", prometheus.render());
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sinkroute_core=info,sinkroute_mongodb=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .init();
}
