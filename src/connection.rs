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

use crate::error::Result;
use crate::ffi;
use crate::table_function::TableFunctionBuilder;

/// A connection handle owned by the embedder.
///
/// The bridge borrows the raw connection for registration calls; opening and
/// closing connections stays with whoever produced the handle.
pub struct Connection {
    raw: ffi::duckdb_connection,
}

impl Connection {
    /// Wrap a raw connection provided by the embedder.
    ///
    /// # Safety
    ///
    /// `raw` must be a live connection handle and must outlive this wrapper.
    pub unsafe fn from_raw(raw: ffi::duckdb_connection) -> Self {
        Self { raw }
    }

    pub fn as_raw(&self) -> ffi::duckdb_connection {
        self.raw
    }

    /// Register a fully-built table function on this connection.
    pub fn register_table_function(&self, function: &TableFunctionBuilder) -> Result<()> {
        function.register(self.raw)
    }
}
