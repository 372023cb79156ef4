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

//! Runtime-loaded bindings to the DuckDB C API's extension points.
//!
//! The engine invokes extension callbacks through raw function pointers
//! resolved at registration time; a Rust closure or trait object is not such
//! a pointer. This crate provides the bridge between the two calling
//! conventions:
//!
//! - Implement [TableFunction] or [ReplacementScan] for your handler.
//! - Load and install the engine once per process with [Engine].
//! - Register handlers through [Database::add_replacement_scan] and
//!   [Connection::register_table_function].
//!
//! The [bridge] module holds the trampolines the engine actually stores: each
//! is a plain native function that forwards its arguments to the registered
//! handler, exactly once, on whatever thread the engine called from, and
//! reports handler faults through the engine's own error slots instead of
//! letting them unwind across the boundary.
//!
//! The engine library itself is loaded at run time (`dlopen`/`LoadLibrary`);
//! nothing links against it at build time. Embedders that already carry the
//! engine can supply their own entry-point table via
//! [Engine::from_entry_points].
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use duckdb_capi::ffi::DUCKDB_TYPE_BIGINT;
//! use duckdb_capi::{
//!     BindInfo, DataChunk, Engine, FunctionInfo, InitInfo, LogicalType, Result,
//!     TableFunction, TableFunctionBuilder,
//! };
//!
//! struct FortyTwo;
//!
//! impl TableFunction for FortyTwo {
//!     fn bind(&self, info: &mut BindInfo) -> Result<()> {
//!         let column_type = LogicalType::new(DUCKDB_TYPE_BIGINT)?;
//!         info.add_result_column("forty_two", &column_type)?;
//!         info.set_bind_data(42_i64)
//!     }
//!     fn init(&self, _info: &mut InitInfo) -> Result<()> {
//!         Ok(())
//!     }
//!     fn func(&self, info: &mut FunctionInfo, _output: &mut DataChunk) -> Result<()> {
//!         let _bound: std::sync::Arc<i64> = info.bind_data()?;
//!         Ok(())
//!     }
//! }
//!
//! fn register(connection: &duckdb_capi::Connection) -> Result<()> {
//!     Engine::load_dynamic_from_name("duckdb")?.install()?;
//!     let mut function = TableFunctionBuilder::new("forty_two")?;
//!     function.set_callback(Arc::new(FortyTwo))?;
//!     connection.register_table_function(&function)
//! }
//! ```

pub mod bridge;
mod connection;
mod database;
mod engine;
pub mod error;
pub mod ffi;
mod info;
mod interface;
mod registry;
mod table_function;

pub use connection::Connection;
pub use database::Database;
pub use engine::{Engine, ENGINE_LIBRARY_ENV};
pub use error::{Error, Result, Status};
pub use info::{
    BindInfo, DataChunk, FunctionInfo, InitInfo, LogicalType, ReplacementScanInfo, Value,
};
pub use interface::{ReplacementScan, TableFunction};
pub use table_function::TableFunctionBuilder;
