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

//! Loading and installing the native engine.
//!
//! The engine library is loaded at run time (with `dlopen`/`LoadLibrary`) and
//! its C symbols are resolved into an [EngineEntryPoints] table. Exactly one
//! engine is installed per process; every callback the engine later delivers
//! re-enters Rust through the installed table.

use std::ffi::{CStr, OsStr};
use std::sync::OnceLock;

use crate::error::{Error, Result, Status};
use crate::ffi::EngineEntryPoints;

/// Environment variable overriding the engine library location.
pub const ENGINE_LIBRARY_ENV: &str = "DUCKDB_LIBRARY";

static ENGINE: OnceLock<Engine> = OnceLock::new();

/// A loaded engine.
///
/// If the engine was loaded dynamically, the [libloading::Library] is kept in
/// scope as long as the entry-point table so that all resolved function
/// pointers remain valid.
#[derive(Debug)]
pub struct Engine {
    entry_points: EngineEntryPoints,
    _library: Option<libloading::Library>,
}

macro_rules! resolve {
    ($library:expr, $entry_points:expr, $($symbol:ident),+ $(,)?) => {
        $(
            $entry_points.$symbol = $library
                .get(concat!(stringify!($symbol), "\0").as_bytes())
                .map(|symbol| *symbol)
                .ok();
        )+
    };
}

impl Engine {
    /// Load the engine from a dynamic library at the given path.
    ///
    /// Symbols absent from the library are left unresolved; calls that need
    /// them fail with [Status::NotImplemented] instead of failing the load.
    pub fn load_dynamic(filename: impl AsRef<OsStr>) -> Result<Self> {
        // Safety: loading a library runs its initialization routines; we trust
        // the engine library the caller pointed us at.
        let library = unsafe { libloading::Library::new(filename.as_ref())? };
        let entry_points = unsafe { Self::resolve_entry_points(&library) };
        Ok(Self {
            entry_points,
            _library: Some(library),
        })
    }

    /// Load the engine by library name, without platform prefixes or suffixes.
    ///
    /// `name` should be `"duckdb"` rather than `"libduckdb.so"`. The
    /// `DUCKDB_LIBRARY` environment variable, when set, takes precedence and
    /// must hold a full path.
    pub fn load_dynamic_from_name(name: impl AsRef<str>) -> Result<Self> {
        Self::load_dynamic(Self::locate(name))
    }

    /// Resolve the file name to load for the given engine library name.
    pub fn locate(name: impl AsRef<str>) -> std::ffi::OsString {
        match std::env::var_os(ENGINE_LIBRARY_ENV) {
            Some(path) => path,
            None => libloading::library_filename(name.as_ref()),
        }
    }

    /// Wrap an entry-point table supplied by an embedder that already links
    /// the engine.
    pub fn from_entry_points(entry_points: EngineEntryPoints) -> Self {
        Self {
            entry_points,
            _library: None,
        }
    }

    unsafe fn resolve_entry_points(library: &libloading::Library) -> EngineEntryPoints {
        let mut entry_points = EngineEntryPoints::default();
        resolve!(
            library,
            entry_points,
            duckdb_library_version,
            duckdb_free,
            duckdb_add_replacement_scan,
            duckdb_replacement_scan_set_function_name,
            duckdb_replacement_scan_add_parameter,
            duckdb_replacement_scan_set_error,
            duckdb_create_table_function,
            duckdb_destroy_table_function,
            duckdb_table_function_set_name,
            duckdb_table_function_add_parameter,
            duckdb_table_function_set_extra_info,
            duckdb_table_function_set_bind,
            duckdb_table_function_set_init,
            duckdb_table_function_set_function,
            duckdb_table_function_supports_projection_pushdown,
            duckdb_register_table_function,
            duckdb_bind_get_extra_info,
            duckdb_bind_get_parameter_count,
            duckdb_bind_get_parameter,
            duckdb_bind_add_result_column,
            duckdb_bind_set_bind_data,
            duckdb_bind_set_error,
            duckdb_init_get_extra_info,
            duckdb_init_get_bind_data,
            duckdb_init_set_init_data,
            duckdb_init_get_column_count,
            duckdb_init_get_column_index,
            duckdb_init_set_error,
            duckdb_function_get_extra_info,
            duckdb_function_get_bind_data,
            duckdb_function_get_init_data,
            duckdb_function_set_error,
            duckdb_create_int64,
            duckdb_create_varchar,
            duckdb_get_int64,
            duckdb_get_varchar,
            duckdb_destroy_value,
            duckdb_create_logical_type,
            duckdb_destroy_logical_type,
            duckdb_get_type_id,
        );
        entry_points
    }

    /// Install this engine as the process-wide engine.
    ///
    /// Trampolines registered with the engine resolve their entry points
    /// through the installed instance, so installation must happen before any
    /// callback registration. Installing twice is an error.
    pub fn install(self) -> Result<()> {
        ENGINE
            .set(self)
            .map_err(|_| Error::with_message_and_status("Engine already installed", Status::InvalidState))
    }

    /// The installed engine, if any.
    pub fn get() -> Result<&'static Engine> {
        ENGINE.get().ok_or(Error::with_message_and_status(
            "No engine installed",
            Status::InvalidState,
        ))
    }

    /// Resolved entry points of this engine.
    pub fn entry_points(&self) -> &EngineEntryPoints {
        &self.entry_points
    }

    /// The engine's reported library version.
    pub fn version(&self) -> Result<String> {
        let library_version = crate::engine_entry!(self.entry_points, duckdb_library_version);
        // Safety: the engine returns a static, nul-terminated version string.
        let version = unsafe { CStr::from_ptr(library_version()) };
        Ok(version.to_str()?.to_owned())
    }
}
