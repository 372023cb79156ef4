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

//! The table of engine entry points the bridge dispatches through.
//!
//! Each field holds the resolved address of the C function with the same name.
//! The table is usually filled by [crate::Engine::load_dynamic]; an embedder
//! that already links the engine can populate it by hand instead.

#![allow(non_snake_case)]

use std::os::raw::{c_char, c_void};

use super::constants::duckdb_type;
use super::types::*;

/// Resolved engine entry points, one [Option] per C symbol.
///
/// A `None` entry means the symbol was absent from the loaded library; the
/// safe wrappers report such calls as [crate::error::Status::NotImplemented].
#[derive(Debug, Default)]
pub struct EngineEntryPoints {
    pub duckdb_library_version: Option<unsafe extern "C" fn() -> *const c_char>,
    pub duckdb_free: Option<unsafe extern "C" fn(ptr: *mut c_void)>,

    // Replacement scans.
    pub duckdb_add_replacement_scan: Option<
        unsafe extern "C" fn(
            db: duckdb_database,
            replacement: duckdb_replacement_callback_t,
            extra_data: *mut c_void,
            delete_callback: duckdb_delete_callback_t,
        ),
    >,
    pub duckdb_replacement_scan_set_function_name:
        Option<unsafe extern "C" fn(info: duckdb_replacement_scan_info, name: *const c_char)>,
    pub duckdb_replacement_scan_add_parameter:
        Option<unsafe extern "C" fn(info: duckdb_replacement_scan_info, parameter: duckdb_value)>,
    pub duckdb_replacement_scan_set_error:
        Option<unsafe extern "C" fn(info: duckdb_replacement_scan_info, error: *const c_char)>,

    // Table function object.
    pub duckdb_create_table_function: Option<unsafe extern "C" fn() -> duckdb_table_function>,
    pub duckdb_destroy_table_function:
        Option<unsafe extern "C" fn(table_function: *mut duckdb_table_function)>,
    pub duckdb_table_function_set_name:
        Option<unsafe extern "C" fn(table_function: duckdb_table_function, name: *const c_char)>,
    pub duckdb_table_function_add_parameter: Option<
        unsafe extern "C" fn(table_function: duckdb_table_function, r#type: duckdb_logical_type),
    >,
    pub duckdb_table_function_set_extra_info: Option<
        unsafe extern "C" fn(
            table_function: duckdb_table_function,
            extra_info: *mut c_void,
            destroy: duckdb_delete_callback_t,
        ),
    >,
    pub duckdb_table_function_set_bind: Option<
        unsafe extern "C" fn(table_function: duckdb_table_function, bind: duckdb_table_function_bind_t),
    >,
    pub duckdb_table_function_set_init: Option<
        unsafe extern "C" fn(table_function: duckdb_table_function, init: duckdb_table_function_init_t),
    >,
    pub duckdb_table_function_set_function: Option<
        unsafe extern "C" fn(table_function: duckdb_table_function, function: duckdb_table_function_t),
    >,
    pub duckdb_table_function_supports_projection_pushdown:
        Option<unsafe extern "C" fn(table_function: duckdb_table_function, pushdown: bool)>,
    pub duckdb_register_table_function: Option<
        unsafe extern "C" fn(
            con: duckdb_connection,
            function: duckdb_table_function,
        ) -> duckdb_state,
    >,

    // Bind info.
    pub duckdb_bind_get_extra_info:
        Option<unsafe extern "C" fn(info: duckdb_bind_info) -> *mut c_void>,
    pub duckdb_bind_get_parameter_count:
        Option<unsafe extern "C" fn(info: duckdb_bind_info) -> idx_t>,
    pub duckdb_bind_get_parameter:
        Option<unsafe extern "C" fn(info: duckdb_bind_info, index: idx_t) -> duckdb_value>,
    pub duckdb_bind_add_result_column: Option<
        unsafe extern "C" fn(
            info: duckdb_bind_info,
            name: *const c_char,
            r#type: duckdb_logical_type,
        ),
    >,
    pub duckdb_bind_set_bind_data: Option<
        unsafe extern "C" fn(
            info: duckdb_bind_info,
            bind_data: *mut c_void,
            destroy: duckdb_delete_callback_t,
        ),
    >,
    pub duckdb_bind_set_error:
        Option<unsafe extern "C" fn(info: duckdb_bind_info, error: *const c_char)>,

    // Init info.
    pub duckdb_init_get_extra_info:
        Option<unsafe extern "C" fn(info: duckdb_init_info) -> *mut c_void>,
    pub duckdb_init_get_bind_data:
        Option<unsafe extern "C" fn(info: duckdb_init_info) -> *mut c_void>,
    pub duckdb_init_set_init_data: Option<
        unsafe extern "C" fn(
            info: duckdb_init_info,
            init_data: *mut c_void,
            destroy: duckdb_delete_callback_t,
        ),
    >,
    pub duckdb_init_get_column_count: Option<unsafe extern "C" fn(info: duckdb_init_info) -> idx_t>,
    pub duckdb_init_get_column_index:
        Option<unsafe extern "C" fn(info: duckdb_init_info, column_index: idx_t) -> idx_t>,
    pub duckdb_init_set_error:
        Option<unsafe extern "C" fn(info: duckdb_init_info, error: *const c_char)>,

    // Function info.
    pub duckdb_function_get_extra_info:
        Option<unsafe extern "C" fn(info: duckdb_function_info) -> *mut c_void>,
    pub duckdb_function_get_bind_data:
        Option<unsafe extern "C" fn(info: duckdb_function_info) -> *mut c_void>,
    pub duckdb_function_get_init_data:
        Option<unsafe extern "C" fn(info: duckdb_function_info) -> *mut c_void>,
    pub duckdb_function_set_error:
        Option<unsafe extern "C" fn(info: duckdb_function_info, error: *const c_char)>,

    // Values and logical types.
    pub duckdb_create_int64: Option<unsafe extern "C" fn(val: i64) -> duckdb_value>,
    pub duckdb_create_varchar: Option<unsafe extern "C" fn(text: *const c_char) -> duckdb_value>,
    pub duckdb_get_int64: Option<unsafe extern "C" fn(val: duckdb_value) -> i64>,
    pub duckdb_get_varchar: Option<unsafe extern "C" fn(val: duckdb_value) -> *mut c_char>,
    pub duckdb_destroy_value: Option<unsafe extern "C" fn(val: *mut duckdb_value)>,
    pub duckdb_create_logical_type:
        Option<unsafe extern "C" fn(r#type: duckdb_type) -> duckdb_logical_type>,
    pub duckdb_destroy_logical_type:
        Option<unsafe extern "C" fn(r#type: *mut duckdb_logical_type)>,
    pub duckdb_get_type_id:
        Option<unsafe extern "C" fn(r#type: duckdb_logical_type) -> duckdb_type>,
}

/// Call an engine entry point from the installed table, or return a
/// `NotImplemented` error naming the missing symbol.
#[macro_export]
macro_rules! engine_entry {
    ($entry_points:expr, $symbol:ident) => {
        $entry_points
            .$symbol
            .ok_or($crate::error::Error::with_message_and_status(
                concat!("Engine library does not export ", stringify!($symbol)),
                $crate::error::Status::NotImplemented,
            ))?
    };
}
