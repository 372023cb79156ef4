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

//! The callback trampolines.
//!
//! Each function here is a statically-addressable native function the engine
//! stores at registration time and later invokes through a raw pointer, on
//! whichever thread it chooses. A trampoline's entire job is convention
//! translation: forward the arguments, unchanged and exactly once, to the
//! registered Rust handler, and translate any handler fault into the engine's
//! error slot on the relevant info handle. No fault may unwind across the
//! native call boundary; a fault with no handle to carry it aborts the
//! process.
//!
//! Trampolines never allocate (beyond an error message), block, buffer or
//! reorder calls, and never interpret the handles they forward.

use std::any::Any;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::process::abort;
use std::sync::Arc;

use crate::engine::Engine;
use crate::engine_entry;
use crate::error::{Error, Result, Status};
use crate::ffi;
use crate::info::{BindInfo, DataChunk, FunctionInfo, InitInfo, ReplacementScanInfo};
use crate::interface::{ReplacementScan, TableFunction};
use crate::registry::{self, Slot, Token};

fn table_function_handler(token: Token) -> Result<Arc<dyn TableFunction>> {
    match registry::resolve(token) {
        Some(Slot::TableFunction(handler)) => Ok(handler),
        _ => Err(Error::with_message_and_status(
            "No table function handler is registered for this callback",
            Status::InvalidState,
        )),
    }
}

fn replacement_scan_handler(token: Token) -> Result<Arc<dyn ReplacementScan>> {
    match registry::resolve(token) {
        Some(Slot::ReplacementScan(handler)) => Ok(handler),
        _ => Err(Error::with_message_and_status(
            "No replacement scan handler is registered for this callback",
            Status::InvalidState,
        )),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Run a forwarded handler call and keep its outcome on our side of the
/// boundary: `Ok` returns quietly, an `Err` or a panic is pushed through
/// `report` into the engine's error slot. When not even that works the
/// process aborts, because the one remaining alternative is unwinding into
/// the engine's call stack.
fn dispatch<B, R>(target: &str, body: B, report: R)
where
    B: FnOnce() -> Result<()>,
    R: FnOnce(&CStr) -> Result<()>,
{
    let message = match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => return,
        Ok(Err(error)) => error.message,
        Err(payload) => format!("{target} callback panicked: {}", panic_message(payload)),
    };
    let c_message = CString::new(message.as_str())
        .unwrap_or_else(|_| CString::new(format!("{target} callback failed")).unwrap());
    if report(&c_message).is_err() {
        eprintln!("duckdb-capi: unreportable fault in {target} callback: {message}");
        abort();
    }
}

/// Release a registry token, containing any panic raised by the dropped
/// value. Delete callbacks carry no info handle, so a faulting drop has
/// nowhere to report and aborts.
fn release_guarded(target: &str, token: Token) {
    if catch_unwind(AssertUnwindSafe(|| registry::release(token))).is_err() {
        eprintln!("duckdb-capi: panic while dropping {target}");
        abort();
    }
}

/// Forwards a replacement-scan invocation to the registered
/// [ReplacementScan] handler. `data` is the registry token handed to the
/// engine at registration time.
pub unsafe extern "C" fn replacement_scan_trampoline(
    info: ffi::duckdb_replacement_scan_info,
    table_name: *const c_char,
    data: *mut c_void,
) {
    dispatch(
        "replacement scan",
        || {
            let handler = replacement_scan_handler(data)?;
            if table_name.is_null() {
                return Err(Error::with_message_and_status(
                    "Engine passed a null table name",
                    Status::InvalidArguments,
                ));
            }
            let table_name = unsafe { CStr::from_ptr(table_name) }.to_str()?;
            handler.replace(&mut ReplacementScanInfo::from_raw(info), table_name)
        },
        |message| {
            let entry_points = Engine::get()?.entry_points();
            let set_error = engine_entry!(entry_points, duckdb_replacement_scan_set_error);
            unsafe { set_error(info, message.as_ptr()) };
            Ok(())
        },
    );
}

/// Releases the extra data of a replacement-scan registration. The engine
/// guarantees exactly one delivery on teardown; a duplicate delivery is a
/// no-op.
pub unsafe extern "C" fn replacement_scan_delete_trampoline(data: *mut c_void) {
    release_guarded("replacement scan extra data", data);
}

/// Forwards a table-function bind call to [TableFunction::bind].
pub unsafe extern "C" fn bind_trampoline(info: ffi::duckdb_bind_info) {
    dispatch(
        "bind",
        || {
            let entry_points = Engine::get()?.entry_points();
            let get_extra_info = engine_entry!(entry_points, duckdb_bind_get_extra_info);
            let handler = table_function_handler(unsafe { get_extra_info(info) })?;
            handler.bind(&mut BindInfo::from_raw(info))
        },
        |message| {
            let entry_points = Engine::get()?.entry_points();
            let set_error = engine_entry!(entry_points, duckdb_bind_set_error);
            unsafe { set_error(info, message.as_ptr()) };
            Ok(())
        },
    );
}

/// Forwards a table-function init call to [TableFunction::init].
pub unsafe extern "C" fn init_trampoline(info: ffi::duckdb_init_info) {
    dispatch(
        "init",
        || {
            let entry_points = Engine::get()?.entry_points();
            let get_extra_info = engine_entry!(entry_points, duckdb_init_get_extra_info);
            let handler = table_function_handler(unsafe { get_extra_info(info) })?;
            handler.init(&mut InitInfo::from_raw(info))
        },
        |message| {
            let entry_points = Engine::get()?.entry_points();
            let set_error = engine_entry!(entry_points, duckdb_init_set_error);
            unsafe { set_error(info, message.as_ptr()) };
            Ok(())
        },
    );
}

/// Forwards a table-function execution step to [TableFunction::func].
///
/// The engine may deliver these concurrently from multiple worker threads for
/// a parallel scan; each invocation is forwarded independently with the exact
/// info/output pair it arrived with.
pub unsafe extern "C" fn function_trampoline(
    info: ffi::duckdb_function_info,
    output: ffi::duckdb_data_chunk,
) {
    dispatch(
        "function",
        || {
            let entry_points = Engine::get()?.entry_points();
            let get_extra_info = engine_entry!(entry_points, duckdb_function_get_extra_info);
            let handler = table_function_handler(unsafe { get_extra_info(info) })?;
            handler.func(
                &mut FunctionInfo::from_raw(info),
                &mut DataChunk::from_raw(output),
            )
        },
        |message| {
            let entry_points = Engine::get()?.entry_points();
            let set_error = engine_entry!(entry_points, duckdb_function_set_error);
            unsafe { set_error(info, message.as_ptr()) };
            Ok(())
        },
    );
}

/// Releases the extra-info handler of a table-function registration.
pub unsafe extern "C" fn extra_info_delete_trampoline(data: *mut c_void) {
    release_guarded("table function extra info", data);
}

/// Releases bind data captured by [BindInfo::set_bind_data].
pub unsafe extern "C" fn bind_data_delete_trampoline(data: *mut c_void) {
    release_guarded("bind data", data);
}

/// Releases init data captured by [InitInfo::set_init_data].
pub unsafe extern "C" fn init_data_delete_trampoline(data: *mut c_void) {
    release_guarded("init data", data);
}
