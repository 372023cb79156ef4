// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The handler traits the engine's callbacks are forwarded to.

use crate::error::Result;
use crate::info::{BindInfo, DataChunk, FunctionInfo, InitInfo, ReplacementScanInfo};

/// A user-defined table function.
///
/// The engine drives a registration through bind (schema negotiation), then
/// init (per-scan setup), then repeated `func` calls (row production), in that
/// order. `func` may be invoked from multiple engine worker threads
/// concurrently for a parallel scan, hence the `Send + Sync` bound; per-call
/// state belongs in bind data and init data, not in the handler itself.
///
/// A returned [Err](crate::error::Error) is reported to the engine through
/// the info handle's error slot and surfaces on the engine's normal query
/// error path. The same applies to a panic, so a faulting handler never
/// unwinds into the engine.
pub trait TableFunction: Send + Sync {
    /// Negotiate the result schema and capture bind data.
    fn bind(&self, info: &mut BindInfo) -> Result<()>;

    /// Set up per-scan state.
    fn init(&self, info: &mut InitInfo) -> Result<()>;

    /// Produce the next batch of rows into `output`.
    fn func(&self, info: &mut FunctionInfo, output: &mut DataChunk) -> Result<()>;
}

/// A replacement scan: supplies a table function call for an otherwise
/// unresolved table reference in a query.
///
/// Dropping the handler is the teardown notification; the bridge drops its
/// reference when the engine discards the registration.
pub trait ReplacementScan: Send + Sync {
    /// Decide whether to replace the reference named `table_name`.
    ///
    /// To perform a replacement, set a function name (and parameters) on
    /// `info`; doing nothing leaves the reference unresolved for the next
    /// candidate.
    fn replace(&self, info: &mut ReplacementScanInfo, table_name: &str) -> Result<()>;
}
