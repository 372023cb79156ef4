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

//! Building a table-function registration.

use std::ffi::CString;
use std::sync::Arc;

use crate::bridge;
use crate::engine::Engine;
use crate::engine_entry;
use crate::error::{Error, Result, Status};
use crate::ffi;
use crate::info::LogicalType;
use crate::interface::TableFunction;
use crate::registry::{self, Slot};

/// A table function under construction, destroyed on drop.
///
/// Mirrors the engine's table-function object: name it, declare its
/// parameters, wire a [TableFunction] handler, then hand it to
/// [crate::Connection::register_table_function].
pub struct TableFunctionBuilder {
    raw: ffi::duckdb_table_function,
}

impl TableFunctionBuilder {
    /// Create a table function with the given name.
    pub fn new(name: &str) -> Result<Self> {
        let entry_points = Engine::get()?.entry_points();
        let create = engine_entry!(entry_points, duckdb_create_table_function);
        let set_name = engine_entry!(entry_points, duckdb_table_function_set_name);
        let name = CString::new(name)?;
        let raw = unsafe { create() };
        unsafe { set_name(raw, name.as_ptr()) };
        Ok(Self { raw })
    }

    /// The underlying engine handle.
    pub fn as_raw(&self) -> ffi::duckdb_table_function {
        self.raw
    }

    /// Declare a positional parameter.
    pub fn add_parameter(&mut self, parameter_type: &LogicalType) -> Result<&mut Self> {
        let entry_points = Engine::get()?.entry_points();
        let add_parameter = engine_entry!(entry_points, duckdb_table_function_add_parameter);
        unsafe { add_parameter(self.raw, parameter_type.as_raw()) };
        Ok(self)
    }

    /// Declare that init receives a projected column set.
    pub fn supports_projection_pushdown(&mut self, pushdown: bool) -> Result<&mut Self> {
        let entry_points = Engine::get()?.entry_points();
        let set_pushdown =
            engine_entry!(entry_points, duckdb_table_function_supports_projection_pushdown);
        unsafe { set_pushdown(self.raw, pushdown) };
        Ok(self)
    }

    /// Wire the handler into the engine's callback slots.
    ///
    /// The handler is stored behind a registry token handed to the engine as
    /// extra info; the bind, init and function slots receive the bridge
    /// trampolines, which resolve the token back to the handler on every
    /// invocation. The engine releases the token through the matching delete
    /// callback when it discards the registration.
    pub fn set_callback(&mut self, handler: Arc<dyn TableFunction>) -> Result<&mut Self> {
        let entry_points = Engine::get()?.entry_points();
        let set_extra_info = engine_entry!(entry_points, duckdb_table_function_set_extra_info);
        let set_bind = engine_entry!(entry_points, duckdb_table_function_set_bind);
        let set_init = engine_entry!(entry_points, duckdb_table_function_set_init);
        let set_function = engine_entry!(entry_points, duckdb_table_function_set_function);

        let token = registry::register(Slot::TableFunction(handler));
        unsafe {
            set_extra_info(self.raw, token, Some(bridge::extra_info_delete_trampoline));
            set_bind(self.raw, Some(bridge::bind_trampoline));
            set_init(self.raw, Some(bridge::init_trampoline));
            set_function(self.raw, Some(bridge::function_trampoline));
        }
        Ok(self)
    }

    pub(crate) fn register(&self, connection: ffi::duckdb_connection) -> Result<()> {
        let entry_points = Engine::get()?.entry_points();
        let register = engine_entry!(entry_points, duckdb_register_table_function);
        match unsafe { register(connection, self.raw) } {
            ffi::DUCKDB_SUCCESS => Ok(()),
            _ => Err(Error::with_message_and_status(
                "Engine rejected the table function registration",
                Status::Internal,
            )),
        }
    }
}

impl Drop for TableFunctionBuilder {
    fn drop(&mut self) {
        if let Ok(engine) = Engine::get() {
            if let Some(destroy) = engine.entry_points().duckdb_destroy_table_function {
                unsafe { destroy(&mut self.raw) };
            }
        }
    }
}
