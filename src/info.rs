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

//! Safe wrappers over the engine's per-callback info handles.
//!
//! Each wrapper borrows a handle the engine owns and is valid only for the
//! duration of the callback it was created for. All operations dispatch
//! through the installed [Engine]'s entry points.

use std::ffi::{CStr, CString};
use std::sync::Arc;

use crate::bridge;
use crate::engine::Engine;
use crate::engine_entry;
use crate::error::{Error, Result, Status};
use crate::ffi;
use crate::registry::{self, Slot, Token};

fn data_slot<T: Send + Sync + 'static>(token: Token, what: &str) -> Result<Arc<T>> {
    match registry::resolve(token) {
        Some(Slot::Data(data)) => data.downcast::<T>().map_err(|_| {
            Error::with_message_and_status(
                format!("{what} has a different type than requested"),
                Status::InvalidArguments,
            )
        }),
        Some(_) => Err(Error::with_message_and_status(
            format!("{what} token does not refer to callback data"),
            Status::InvalidState,
        )),
        None => Err(Error::with_message_and_status(
            format!("{what} was not set"),
            Status::NotFound,
        )),
    }
}

/// State for one table-function bind call.
pub struct BindInfo {
    raw: ffi::duckdb_bind_info,
}

impl BindInfo {
    pub(crate) fn from_raw(raw: ffi::duckdb_bind_info) -> Self {
        Self { raw }
    }

    /// The underlying engine handle.
    pub fn as_raw(&self) -> ffi::duckdb_bind_info {
        self.raw
    }

    /// Number of parameters in the table function call being bound.
    pub fn parameter_count(&self) -> Result<u64> {
        let entry_points = Engine::get()?.entry_points();
        let get_count = engine_entry!(entry_points, duckdb_bind_get_parameter_count);
        Ok(unsafe { get_count(self.raw) })
    }

    /// The parameter at `index` as an owned [Value].
    pub fn parameter(&self, index: u64) -> Result<Value> {
        let entry_points = Engine::get()?.entry_points();
        let get_parameter = engine_entry!(entry_points, duckdb_bind_get_parameter);
        Ok(Value::from_raw(unsafe { get_parameter(self.raw, index) }))
    }

    /// Append a column to the negotiated result schema.
    pub fn add_result_column(&mut self, name: &str, column_type: &LogicalType) -> Result<()> {
        let entry_points = Engine::get()?.entry_points();
        let add_column = engine_entry!(entry_points, duckdb_bind_add_result_column);
        let name = CString::new(name)?;
        unsafe { add_column(self.raw, name.as_ptr(), column_type.raw) };
        Ok(())
    }

    /// Attach bind data to this registration.
    ///
    /// The data is held by the bridge until the engine discards it through the
    /// matching delete callback, which releases it exactly once.
    pub fn set_bind_data<T: Send + Sync + 'static>(&mut self, data: T) -> Result<()> {
        let entry_points = Engine::get()?.entry_points();
        let Some(set_bind_data) = entry_points.duckdb_bind_set_bind_data else {
            return Err(Error::with_message_and_status(
                "Engine library does not export duckdb_bind_set_bind_data",
                Status::NotImplemented,
            ));
        };
        let token = registry::register(Slot::Data(Arc::new(data)));
        unsafe { set_bind_data(self.raw, token, Some(bridge::bind_data_delete_trampoline)) };
        Ok(())
    }

    /// Report a bind error to the engine.
    pub fn set_error(&mut self, message: &str) -> Result<()> {
        let entry_points = Engine::get()?.entry_points();
        let set_error = engine_entry!(entry_points, duckdb_bind_set_error);
        let message = CString::new(message)?;
        unsafe { set_error(self.raw, message.as_ptr()) };
        Ok(())
    }
}

/// State for one table-function init call.
pub struct InitInfo {
    raw: ffi::duckdb_init_info,
}

impl InitInfo {
    pub(crate) fn from_raw(raw: ffi::duckdb_init_info) -> Self {
        Self { raw }
    }

    pub fn as_raw(&self) -> ffi::duckdb_init_info {
        self.raw
    }

    /// The bind data captured during the bind phase.
    pub fn bind_data<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        let entry_points = Engine::get()?.entry_points();
        let get_bind_data = engine_entry!(entry_points, duckdb_init_get_bind_data);
        data_slot(unsafe { get_bind_data(self.raw) }, "Bind data")
    }

    /// Attach per-scan init data, released exactly once via the matching
    /// delete callback.
    pub fn set_init_data<T: Send + Sync + 'static>(&mut self, data: T) -> Result<()> {
        let entry_points = Engine::get()?.entry_points();
        let Some(set_init_data) = entry_points.duckdb_init_set_init_data else {
            return Err(Error::with_message_and_status(
                "Engine library does not export duckdb_init_set_init_data",
                Status::NotImplemented,
            ));
        };
        let token = registry::register(Slot::Data(Arc::new(data)));
        unsafe { set_init_data(self.raw, token, Some(bridge::init_data_delete_trampoline)) };
        Ok(())
    }

    /// Number of columns the scan must produce (after projection pushdown).
    pub fn column_count(&self) -> Result<u64> {
        let entry_points = Engine::get()?.entry_points();
        let get_count = engine_entry!(entry_points, duckdb_init_get_column_count);
        Ok(unsafe { get_count(self.raw) })
    }

    /// The original column index of projected column `column_index`.
    pub fn column_index(&self, column_index: u64) -> Result<u64> {
        let entry_points = Engine::get()?.entry_points();
        let get_index = engine_entry!(entry_points, duckdb_init_get_column_index);
        Ok(unsafe { get_index(self.raw, column_index) })
    }

    /// Report an init error to the engine.
    pub fn set_error(&mut self, message: &str) -> Result<()> {
        let entry_points = Engine::get()?.entry_points();
        let set_error = engine_entry!(entry_points, duckdb_init_set_error);
        let message = CString::new(message)?;
        unsafe { set_error(self.raw, message.as_ptr()) };
        Ok(())
    }
}

/// State for one table-function execution step.
pub struct FunctionInfo {
    raw: ffi::duckdb_function_info,
}

impl FunctionInfo {
    pub(crate) fn from_raw(raw: ffi::duckdb_function_info) -> Self {
        Self { raw }
    }

    pub fn as_raw(&self) -> ffi::duckdb_function_info {
        self.raw
    }

    /// The bind data captured during the bind phase.
    ///
    /// The engine may run execution callbacks for one scan concurrently;
    /// interior synchronization of the data is the creator's concern.
    pub fn bind_data<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        let entry_points = Engine::get()?.entry_points();
        let get_bind_data = engine_entry!(entry_points, duckdb_function_get_bind_data);
        data_slot(unsafe { get_bind_data(self.raw) }, "Bind data")
    }

    /// The init data captured during the init phase.
    pub fn init_data<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        let entry_points = Engine::get()?.entry_points();
        let get_init_data = engine_entry!(entry_points, duckdb_function_get_init_data);
        data_slot(unsafe { get_init_data(self.raw) }, "Init data")
    }

    /// Report an execution error to the engine.
    pub fn set_error(&mut self, message: &str) -> Result<()> {
        let entry_points = Engine::get()?.entry_points();
        let set_error = engine_entry!(entry_points, duckdb_function_set_error);
        let message = CString::new(message)?;
        unsafe { set_error(self.raw, message.as_ptr()) };
        Ok(())
    }
}

/// State for one replacement-scan invocation.
pub struct ReplacementScanInfo {
    raw: ffi::duckdb_replacement_scan_info,
}

impl ReplacementScanInfo {
    pub(crate) fn from_raw(raw: ffi::duckdb_replacement_scan_info) -> Self {
        Self { raw }
    }

    pub fn as_raw(&self) -> ffi::duckdb_replacement_scan_info {
        self.raw
    }

    /// Replace the unresolved reference with a call to the named table
    /// function.
    pub fn set_function_name(&mut self, name: &str) -> Result<()> {
        let entry_points = Engine::get()?.entry_points();
        let set_name = engine_entry!(entry_points, duckdb_replacement_scan_set_function_name);
        let name = CString::new(name)?;
        unsafe { set_name(self.raw, name.as_ptr()) };
        Ok(())
    }

    /// Append a parameter to the replacement function call.
    pub fn add_parameter(&mut self, parameter: &Value) -> Result<()> {
        let entry_points = Engine::get()?.entry_points();
        let add_parameter = engine_entry!(entry_points, duckdb_replacement_scan_add_parameter);
        unsafe { add_parameter(self.raw, parameter.raw) };
        Ok(())
    }

    /// Report a replacement-scan error to the engine.
    pub fn set_error(&mut self, message: &str) -> Result<()> {
        let entry_points = Engine::get()?.entry_points();
        let set_error = engine_entry!(entry_points, duckdb_replacement_scan_set_error);
        let message = CString::new(message)?;
        unsafe { set_error(self.raw, message.as_ptr()) };
        Ok(())
    }
}

/// The output buffer the engine hands to an execution callback.
///
/// The chunk's contents are the engine's business; the bridge only carries the
/// handle. Handlers that fill chunks do so through engine facilities addressed
/// by [DataChunk::as_raw].
pub struct DataChunk {
    raw: ffi::duckdb_data_chunk,
}

impl DataChunk {
    pub(crate) fn from_raw(raw: ffi::duckdb_data_chunk) -> Self {
        Self { raw }
    }

    pub fn as_raw(&self) -> ffi::duckdb_data_chunk {
        self.raw
    }
}

/// An owned scalar value, destroyed on drop.
pub struct Value {
    raw: ffi::duckdb_value,
}

impl Value {
    pub(crate) fn from_raw(raw: ffi::duckdb_value) -> Self {
        Self { raw }
    }

    pub fn as_raw(&self) -> ffi::duckdb_value {
        self.raw
    }

    /// Create an owned BIGINT value.
    pub fn from_int64(value: i64) -> Result<Self> {
        let entry_points = Engine::get()?.entry_points();
        let create = engine_entry!(entry_points, duckdb_create_int64);
        Ok(Self::from_raw(unsafe { create(value) }))
    }

    /// Create an owned VARCHAR value.
    pub fn from_varchar(text: &str) -> Result<Self> {
        let entry_points = Engine::get()?.entry_points();
        let create = engine_entry!(entry_points, duckdb_create_varchar);
        let text = CString::new(text)?;
        Ok(Self::from_raw(unsafe { create(text.as_ptr()) }))
    }

    /// Read the value as an `i64`.
    pub fn int64(&self) -> Result<i64> {
        let entry_points = Engine::get()?.entry_points();
        let get = engine_entry!(entry_points, duckdb_get_int64);
        Ok(unsafe { get(self.raw) })
    }

    /// Read the value as a string. The engine-owned copy is freed after the
    /// contents are taken over.
    pub fn varchar(&self) -> Result<String> {
        let entry_points = Engine::get()?.entry_points();
        let get = engine_entry!(entry_points, duckdb_get_varchar);
        let free = engine_entry!(entry_points, duckdb_free);
        unsafe {
            let text = get(self.raw);
            if text.is_null() {
                return Err(Error::with_message_and_status(
                    "Engine returned a null string for this value",
                    Status::InvalidData,
                ));
            }
            let owned = CStr::from_ptr(text).to_str().map(str::to_owned);
            free(text.cast());
            Ok(owned?)
        }
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        if let Ok(engine) = Engine::get() {
            if let Some(destroy) = engine.entry_points().duckdb_destroy_value {
                unsafe { destroy(&mut self.raw) };
            }
        }
    }
}

/// An owned logical column type, destroyed on drop.
pub struct LogicalType {
    raw: ffi::duckdb_logical_type,
}

impl LogicalType {
    /// Create a logical type from a [ffi::duckdb_type] constant.
    pub fn new(type_id: ffi::duckdb_type) -> Result<Self> {
        let entry_points = Engine::get()?.entry_points();
        let create = engine_entry!(entry_points, duckdb_create_logical_type);
        Ok(Self {
            raw: unsafe { create(type_id) },
        })
    }

    pub fn as_raw(&self) -> ffi::duckdb_logical_type {
        self.raw
    }

    /// The type identifier of this logical type.
    pub fn type_id(&self) -> Result<ffi::duckdb_type> {
        let entry_points = Engine::get()?.entry_points();
        let get_type_id = engine_entry!(entry_points, duckdb_get_type_id);
        Ok(unsafe { get_type_id(self.raw) })
    }
}

impl Drop for LogicalType {
    fn drop(&mut self) {
        if let Ok(engine) = Engine::get() {
            if let Some(destroy) = engine.entry_points().duckdb_destroy_logical_type {
                unsafe { destroy(&mut self.raw) };
            }
        }
    }
}
