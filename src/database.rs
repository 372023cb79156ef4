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

use std::sync::Arc;

use crate::bridge;
use crate::engine::Engine;
use crate::error::{Error, Result, Status};
use crate::ffi;
use crate::interface::ReplacementScan;
use crate::registry::{self, Slot};

/// A database handle owned by the embedder.
pub struct Database {
    raw: ffi::duckdb_database,
}

impl Database {
    /// Wrap a raw database provided by the embedder.
    ///
    /// # Safety
    ///
    /// `raw` must be a live database handle and must outlive this wrapper.
    pub unsafe fn from_raw(raw: ffi::duckdb_database) -> Self {
        Self { raw }
    }

    pub fn as_raw(&self) -> ffi::duckdb_database {
        self.raw
    }

    /// Register a replacement scan on this database.
    ///
    /// The handler is stored behind a registry token handed to the engine as
    /// the callback's extra data. The engine releases the token through the
    /// delete callback when it discards the registration, at which point the
    /// handler is dropped.
    pub fn add_replacement_scan(&self, handler: Arc<dyn ReplacementScan>) -> Result<()> {
        let entry_points = Engine::get()?.entry_points();
        let Some(add_replacement_scan) = entry_points.duckdb_add_replacement_scan else {
            return Err(Error::with_message_and_status(
                "Engine library does not export duckdb_add_replacement_scan",
                Status::NotImplemented,
            ));
        };
        let token = registry::register(Slot::ReplacementScan(handler));
        unsafe {
            add_replacement_scan(
                self.raw,
                Some(bridge::replacement_scan_trampoline),
                token,
                Some(bridge::replacement_scan_delete_trampoline),
            );
        }
        Ok(())
    }
}
