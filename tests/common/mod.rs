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

//! A mock engine for exercising the bridge without a real engine library.
//!
//! The mock entry points carry no state of their own: every fake info handle
//! is a pointer to a test-owned struct below, and the entry points read and
//! write through that handle. This mirrors how the real engine treats its
//! handles and lets a single installed engine serve every test in the binary.

#![allow(dead_code)]

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};
use std::ptr::null_mut;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use duckdb_capi::ffi::{self, EngineEntryPoints};
use duckdb_capi::Engine;

pub const MOCK_VERSION: &[u8] = b"v1.3.2-mock\0";

/// Number of engine-owned strings released through `duckdb_free`.
pub static FREED_STRINGS: AtomicUsize = AtomicUsize::new(0);

/// Install the mock engine; callable from every test, effective once.
pub fn install_mock_engine() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        Engine::from_entry_points(mock_entry_points())
            .install()
            .unwrap();
    });
}

pub struct MockDatabase {
    pub replacement: ffi::duckdb_replacement_callback_t,
    pub replacement_extra_data: *mut c_void,
    pub replacement_delete: ffi::duckdb_delete_callback_t,
}

impl Default for MockDatabase {
    fn default() -> Self {
        Self {
            replacement: None,
            replacement_extra_data: null_mut(),
            replacement_delete: None,
        }
    }
}

impl MockDatabase {
    pub fn as_handle(&mut self) -> ffi::duckdb_database {
        self as *mut Self as ffi::duckdb_database
    }
}

#[derive(Default)]
pub struct MockConnection {
    pub registered_names: Vec<String>,
    pub reject_registration: bool,
}

impl MockConnection {
    pub fn as_handle(&mut self) -> ffi::duckdb_connection {
        self as *mut Self as ffi::duckdb_connection
    }
}

pub struct MockTableFunction {
    pub name: String,
    pub parameter_types: Vec<ffi::duckdb_type>,
    pub pushdown: bool,
    pub extra_info: *mut c_void,
    pub extra_info_delete: ffi::duckdb_delete_callback_t,
    pub bind: ffi::duckdb_table_function_bind_t,
    pub init: ffi::duckdb_table_function_init_t,
    pub function: ffi::duckdb_table_function_t,
}

impl Default for MockTableFunction {
    fn default() -> Self {
        Self {
            name: String::new(),
            parameter_types: Vec::new(),
            pushdown: false,
            extra_info: null_mut(),
            extra_info_delete: None,
            bind: None,
            init: None,
            function: None,
        }
    }
}

impl MockTableFunction {
    /// # Safety
    /// `handle` must come from `mock_create_table_function` and be live.
    pub unsafe fn from_handle<'a>(handle: ffi::duckdb_table_function) -> &'a mut Self {
        &mut *(handle as *mut Self)
    }
}

pub struct MockBindInfo {
    pub extra_info: *mut c_void,
    pub parameters: Vec<i64>,
    pub result_columns: Vec<(String, ffi::duckdb_type)>,
    pub bind_data: *mut c_void,
    pub bind_data_delete: ffi::duckdb_delete_callback_t,
    pub error: Option<String>,
}

impl MockBindInfo {
    pub fn new(extra_info: *mut c_void, parameters: Vec<i64>) -> Self {
        Self {
            extra_info,
            parameters,
            result_columns: Vec::new(),
            bind_data: null_mut(),
            bind_data_delete: None,
            error: None,
        }
    }

    pub fn as_handle(&mut self) -> ffi::duckdb_bind_info {
        self as *mut Self as ffi::duckdb_bind_info
    }
}

pub struct MockInitInfo {
    pub extra_info: *mut c_void,
    pub bind_data: *mut c_void,
    pub init_data: *mut c_void,
    pub init_data_delete: ffi::duckdb_delete_callback_t,
    pub column_count: u64,
    pub column_indexes: Vec<u64>,
    pub error: Option<String>,
}

impl MockInitInfo {
    pub fn new(extra_info: *mut c_void, bind_data: *mut c_void) -> Self {
        Self {
            extra_info,
            bind_data,
            init_data: null_mut(),
            init_data_delete: None,
            column_count: 0,
            column_indexes: Vec::new(),
            error: None,
        }
    }

    pub fn as_handle(&mut self) -> ffi::duckdb_init_info {
        self as *mut Self as ffi::duckdb_init_info
    }
}

pub struct MockFunctionInfo {
    pub extra_info: *mut c_void,
    pub bind_data: *mut c_void,
    pub init_data: *mut c_void,
    pub error: Option<String>,
}

impl MockFunctionInfo {
    pub fn new(extra_info: *mut c_void, bind_data: *mut c_void, init_data: *mut c_void) -> Self {
        Self {
            extra_info,
            bind_data,
            init_data,
            error: None,
        }
    }

    pub fn as_handle(&mut self) -> ffi::duckdb_function_info {
        self as *mut Self as ffi::duckdb_function_info
    }
}

#[derive(Default)]
pub struct MockReplacementScanInfo {
    pub function_name: Option<String>,
    pub parameters: Vec<i64>,
    pub text_parameters: Vec<String>,
    pub error: Option<String>,
}

impl MockReplacementScanInfo {
    pub fn as_handle(&mut self) -> ffi::duckdb_replacement_scan_info {
        self as *mut Self as ffi::duckdb_replacement_scan_info
    }
}

pub struct MockValue {
    pub int: i64,
    pub text: Option<String>,
}

pub struct MockLogicalType {
    pub type_id: ffi::duckdb_type,
}

unsafe fn owned_string(text: *const c_char) -> String {
    CStr::from_ptr(text).to_str().unwrap().to_owned()
}

// Library.

unsafe extern "C" fn mock_library_version() -> *const c_char {
    MOCK_VERSION.as_ptr() as *const c_char
}

unsafe extern "C" fn mock_free(ptr: *mut c_void) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr as *mut c_char));
        FREED_STRINGS.fetch_add(1, Ordering::SeqCst);
    }
}

// Replacement scans.

unsafe extern "C" fn mock_add_replacement_scan(
    db: ffi::duckdb_database,
    replacement: ffi::duckdb_replacement_callback_t,
    extra_data: *mut c_void,
    delete_callback: ffi::duckdb_delete_callback_t,
) {
    let db = &mut *(db as *mut MockDatabase);
    db.replacement = replacement;
    db.replacement_extra_data = extra_data;
    db.replacement_delete = delete_callback;
}

unsafe extern "C" fn mock_replacement_scan_set_function_name(
    info: ffi::duckdb_replacement_scan_info,
    name: *const c_char,
) {
    (*(info as *mut MockReplacementScanInfo)).function_name = Some(owned_string(name));
}

unsafe extern "C" fn mock_replacement_scan_add_parameter(
    info: ffi::duckdb_replacement_scan_info,
    parameter: ffi::duckdb_value,
) {
    let value = &*(parameter as *mut MockValue);
    let info = &mut *(info as *mut MockReplacementScanInfo);
    match &value.text {
        Some(text) => info.text_parameters.push(text.clone()),
        None => info.parameters.push(value.int),
    }
}

unsafe extern "C" fn mock_replacement_scan_set_error(
    info: ffi::duckdb_replacement_scan_info,
    error: *const c_char,
) {
    (*(info as *mut MockReplacementScanInfo)).error = Some(owned_string(error));
}

// Table function object.

unsafe extern "C" fn mock_create_table_function() -> ffi::duckdb_table_function {
    Box::into_raw(Box::new(MockTableFunction::default())) as ffi::duckdb_table_function
}

unsafe extern "C" fn mock_destroy_table_function(table_function: *mut ffi::duckdb_table_function) {
    if table_function.is_null() || (*table_function).is_null() {
        return;
    }
    let owned = Box::from_raw(*table_function as *mut MockTableFunction);
    // The engine releases the extra info when the function object goes away.
    if let Some(delete) = owned.extra_info_delete {
        if !owned.extra_info.is_null() {
            delete(owned.extra_info);
        }
    }
    *table_function = null_mut();
}

unsafe extern "C" fn mock_table_function_set_name(
    table_function: ffi::duckdb_table_function,
    name: *const c_char,
) {
    (*(table_function as *mut MockTableFunction)).name = owned_string(name);
}

unsafe extern "C" fn mock_table_function_add_parameter(
    table_function: ffi::duckdb_table_function,
    parameter_type: ffi::duckdb_logical_type,
) {
    let parameter_type = &*(parameter_type as *mut MockLogicalType);
    (*(table_function as *mut MockTableFunction))
        .parameter_types
        .push(parameter_type.type_id);
}

unsafe extern "C" fn mock_table_function_set_extra_info(
    table_function: ffi::duckdb_table_function,
    extra_info: *mut c_void,
    destroy: ffi::duckdb_delete_callback_t,
) {
    let table_function = &mut *(table_function as *mut MockTableFunction);
    table_function.extra_info = extra_info;
    table_function.extra_info_delete = destroy;
}

unsafe extern "C" fn mock_table_function_set_bind(
    table_function: ffi::duckdb_table_function,
    bind: ffi::duckdb_table_function_bind_t,
) {
    (*(table_function as *mut MockTableFunction)).bind = bind;
}

unsafe extern "C" fn mock_table_function_set_init(
    table_function: ffi::duckdb_table_function,
    init: ffi::duckdb_table_function_init_t,
) {
    (*(table_function as *mut MockTableFunction)).init = init;
}

unsafe extern "C" fn mock_table_function_set_function(
    table_function: ffi::duckdb_table_function,
    function: ffi::duckdb_table_function_t,
) {
    (*(table_function as *mut MockTableFunction)).function = function;
}

unsafe extern "C" fn mock_table_function_supports_projection_pushdown(
    table_function: ffi::duckdb_table_function,
    pushdown: bool,
) {
    (*(table_function as *mut MockTableFunction)).pushdown = pushdown;
}

unsafe extern "C" fn mock_register_table_function(
    con: ffi::duckdb_connection,
    function: ffi::duckdb_table_function,
) -> ffi::duckdb_state {
    let con = &mut *(con as *mut MockConnection);
    if con.reject_registration {
        return ffi::DUCKDB_ERROR;
    }
    let function = &*(function as *mut MockTableFunction);
    con.registered_names.push(function.name.clone());
    ffi::DUCKDB_SUCCESS
}

// Bind info.

unsafe extern "C" fn mock_bind_get_extra_info(info: ffi::duckdb_bind_info) -> *mut c_void {
    (*(info as *mut MockBindInfo)).extra_info
}

unsafe extern "C" fn mock_bind_get_parameter_count(info: ffi::duckdb_bind_info) -> ffi::idx_t {
    (*(info as *mut MockBindInfo)).parameters.len() as ffi::idx_t
}

unsafe extern "C" fn mock_bind_get_parameter(
    info: ffi::duckdb_bind_info,
    index: ffi::idx_t,
) -> ffi::duckdb_value {
    let int = (&(*(info as *mut MockBindInfo)).parameters)[index as usize];
    Box::into_raw(Box::new(MockValue { int, text: None })) as ffi::duckdb_value
}

unsafe extern "C" fn mock_bind_add_result_column(
    info: ffi::duckdb_bind_info,
    name: *const c_char,
    column_type: ffi::duckdb_logical_type,
) {
    let column_type = &*(column_type as *mut MockLogicalType);
    (*(info as *mut MockBindInfo))
        .result_columns
        .push((owned_string(name), column_type.type_id));
}

unsafe extern "C" fn mock_bind_set_bind_data(
    info: ffi::duckdb_bind_info,
    bind_data: *mut c_void,
    destroy: ffi::duckdb_delete_callback_t,
) {
    let info = &mut *(info as *mut MockBindInfo);
    info.bind_data = bind_data;
    info.bind_data_delete = destroy;
}

unsafe extern "C" fn mock_bind_set_error(info: ffi::duckdb_bind_info, error: *const c_char) {
    (*(info as *mut MockBindInfo)).error = Some(owned_string(error));
}

// Init info.

unsafe extern "C" fn mock_init_get_extra_info(info: ffi::duckdb_init_info) -> *mut c_void {
    (*(info as *mut MockInitInfo)).extra_info
}

unsafe extern "C" fn mock_init_get_bind_data(info: ffi::duckdb_init_info) -> *mut c_void {
    (*(info as *mut MockInitInfo)).bind_data
}

unsafe extern "C" fn mock_init_set_init_data(
    info: ffi::duckdb_init_info,
    init_data: *mut c_void,
    destroy: ffi::duckdb_delete_callback_t,
) {
    let info = &mut *(info as *mut MockInitInfo);
    info.init_data = init_data;
    info.init_data_delete = destroy;
}

unsafe extern "C" fn mock_init_get_column_count(info: ffi::duckdb_init_info) -> ffi::idx_t {
    (*(info as *mut MockInitInfo)).column_count
}

unsafe extern "C" fn mock_init_get_column_index(
    info: ffi::duckdb_init_info,
    column_index: ffi::idx_t,
) -> ffi::idx_t {
    (&(*(info as *mut MockInitInfo)).column_indexes)[column_index as usize]
}

unsafe extern "C" fn mock_init_set_error(info: ffi::duckdb_init_info, error: *const c_char) {
    (*(info as *mut MockInitInfo)).error = Some(owned_string(error));
}

// Function info.

unsafe extern "C" fn mock_function_get_extra_info(info: ffi::duckdb_function_info) -> *mut c_void {
    (*(info as *mut MockFunctionInfo)).extra_info
}

unsafe extern "C" fn mock_function_get_bind_data(info: ffi::duckdb_function_info) -> *mut c_void {
    (*(info as *mut MockFunctionInfo)).bind_data
}

unsafe extern "C" fn mock_function_get_init_data(info: ffi::duckdb_function_info) -> *mut c_void {
    (*(info as *mut MockFunctionInfo)).init_data
}

unsafe extern "C" fn mock_function_set_error(
    info: ffi::duckdb_function_info,
    error: *const c_char,
) {
    (*(info as *mut MockFunctionInfo)).error = Some(owned_string(error));
}

// Values and logical types.

unsafe extern "C" fn mock_create_int64(val: i64) -> ffi::duckdb_value {
    Box::into_raw(Box::new(MockValue {
        int: val,
        text: None,
    })) as ffi::duckdb_value
}

unsafe extern "C" fn mock_create_varchar(text: *const c_char) -> ffi::duckdb_value {
    Box::into_raw(Box::new(MockValue {
        int: 0,
        text: Some(owned_string(text)),
    })) as ffi::duckdb_value
}

unsafe extern "C" fn mock_get_int64(val: ffi::duckdb_value) -> i64 {
    (*(val as *mut MockValue)).int
}

unsafe extern "C" fn mock_get_varchar(val: ffi::duckdb_value) -> *mut c_char {
    let value = &*(val as *mut MockValue);
    let text = value.text.clone().unwrap_or_else(|| value.int.to_string());
    CString::new(text).unwrap().into_raw()
}

unsafe extern "C" fn mock_destroy_value(val: *mut ffi::duckdb_value) {
    if !val.is_null() && !(*val).is_null() {
        drop(Box::from_raw(*val as *mut MockValue));
        *val = null_mut();
    }
}

unsafe extern "C" fn mock_create_logical_type(
    type_id: ffi::duckdb_type,
) -> ffi::duckdb_logical_type {
    Box::into_raw(Box::new(MockLogicalType { type_id })) as ffi::duckdb_logical_type
}

unsafe extern "C" fn mock_destroy_logical_type(logical_type: *mut ffi::duckdb_logical_type) {
    if !logical_type.is_null() && !(*logical_type).is_null() {
        drop(Box::from_raw(*logical_type as *mut MockLogicalType));
        *logical_type = null_mut();
    }
}

unsafe extern "C" fn mock_get_type_id(logical_type: ffi::duckdb_logical_type) -> ffi::duckdb_type {
    (*(logical_type as *mut MockLogicalType)).type_id
}

pub fn mock_entry_points() -> EngineEntryPoints {
    EngineEntryPoints {
        duckdb_library_version: Some(mock_library_version),
        duckdb_free: Some(mock_free),
        duckdb_add_replacement_scan: Some(mock_add_replacement_scan),
        duckdb_replacement_scan_set_function_name: Some(mock_replacement_scan_set_function_name),
        duckdb_replacement_scan_add_parameter: Some(mock_replacement_scan_add_parameter),
        duckdb_replacement_scan_set_error: Some(mock_replacement_scan_set_error),
        duckdb_create_table_function: Some(mock_create_table_function),
        duckdb_destroy_table_function: Some(mock_destroy_table_function),
        duckdb_table_function_set_name: Some(mock_table_function_set_name),
        duckdb_table_function_add_parameter: Some(mock_table_function_add_parameter),
        duckdb_table_function_set_extra_info: Some(mock_table_function_set_extra_info),
        duckdb_table_function_set_bind: Some(mock_table_function_set_bind),
        duckdb_table_function_set_init: Some(mock_table_function_set_init),
        duckdb_table_function_set_function: Some(mock_table_function_set_function),
        duckdb_table_function_supports_projection_pushdown: Some(
            mock_table_function_supports_projection_pushdown,
        ),
        duckdb_register_table_function: Some(mock_register_table_function),
        duckdb_bind_get_extra_info: Some(mock_bind_get_extra_info),
        duckdb_bind_get_parameter_count: Some(mock_bind_get_parameter_count),
        duckdb_bind_get_parameter: Some(mock_bind_get_parameter),
        duckdb_bind_add_result_column: Some(mock_bind_add_result_column),
        duckdb_bind_set_bind_data: Some(mock_bind_set_bind_data),
        duckdb_bind_set_error: Some(mock_bind_set_error),
        duckdb_init_get_extra_info: Some(mock_init_get_extra_info),
        duckdb_init_get_bind_data: Some(mock_init_get_bind_data),
        duckdb_init_set_init_data: Some(mock_init_set_init_data),
        duckdb_init_get_column_count: Some(mock_init_get_column_count),
        duckdb_init_get_column_index: Some(mock_init_get_column_index),
        duckdb_init_set_error: Some(mock_init_set_error),
        duckdb_function_get_extra_info: Some(mock_function_get_extra_info),
        duckdb_function_get_bind_data: Some(mock_function_get_bind_data),
        duckdb_function_get_init_data: Some(mock_function_get_init_data),
        duckdb_function_set_error: Some(mock_function_set_error),
        duckdb_create_int64: Some(mock_create_int64),
        duckdb_create_varchar: Some(mock_create_varchar),
        duckdb_get_int64: Some(mock_get_int64),
        duckdb_get_varchar: Some(mock_get_varchar),
        duckdb_destroy_value: Some(mock_destroy_value),
        duckdb_create_logical_type: Some(mock_create_logical_type),
        duckdb_destroy_logical_type: Some(mock_destroy_logical_type),
        duckdb_get_type_id: Some(mock_get_type_id),
    }
}
