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

//! Raw types matching the engine's C header.
//!
//! Every handle is an opaque pointer owned by the engine. The bridge stores
//! and forwards them; it never dereferences one.

#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_uint, c_void};

/// Index type used by the engine for row and column counts.
pub type idx_t = u64;

/// Return state of fallible engine calls.
pub type duckdb_state = c_uint;

macro_rules! opaque_handle {
    ($(#[$doc:meta])* $name:ident, $inner:ident) => {
        #[repr(C)]
        #[derive(Debug, Copy, Clone)]
        pub struct $inner {
            _unused: [u8; 0],
        }
        $(#[$doc])*
        pub type $name = *mut $inner;
    };
}

opaque_handle!(
    /// A database instance.
    duckdb_database,
    _duckdb_database
);
opaque_handle!(
    /// A connection to a database instance.
    duckdb_connection,
    _duckdb_connection
);
opaque_handle!(
    /// A table function under construction.
    duckdb_table_function,
    _duckdb_table_function
);
opaque_handle!(
    /// State for one bind call; valid only for the duration of the call.
    duckdb_bind_info,
    _duckdb_bind_info
);
opaque_handle!(
    /// State for one init call; valid only for the duration of the call.
    duckdb_init_info,
    _duckdb_init_info
);
opaque_handle!(
    /// State for one execution step; valid only for the duration of the call.
    duckdb_function_info,
    _duckdb_function_info
);
opaque_handle!(
    /// State for one replacement scan invocation.
    duckdb_replacement_scan_info,
    _duckdb_replacement_scan_info
);
opaque_handle!(
    /// An output buffer the engine hands to execution callbacks.
    duckdb_data_chunk,
    _duckdb_data_chunk
);
opaque_handle!(
    /// An owned scalar value.
    duckdb_value,
    _duckdb_value
);
opaque_handle!(
    /// An owned logical column type.
    duckdb_logical_type,
    _duckdb_logical_type
);

/// Releases user data the engine received alongside a callback registration.
pub type duckdb_delete_callback_t = Option<unsafe extern "C" fn(data: *mut c_void)>;

/// Invoked when a table reference cannot be resolved by the catalog.
pub type duckdb_replacement_callback_t = Option<
    unsafe extern "C" fn(
        info: duckdb_replacement_scan_info,
        table_name: *const c_char,
        data: *mut c_void,
    ),
>;

/// Schema negotiation callback of a table function.
pub type duckdb_table_function_bind_t = Option<unsafe extern "C" fn(info: duckdb_bind_info)>;

/// Per-scan setup callback of a table function.
pub type duckdb_table_function_init_t = Option<unsafe extern "C" fn(info: duckdb_init_info)>;

/// Row production callback of a table function.
pub type duckdb_table_function_t =
    Option<unsafe extern "C" fn(info: duckdb_function_info, output: duckdb_data_chunk)>;
