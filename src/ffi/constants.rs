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

use std::os::raw::c_uint;

use crate::ffi::types::duckdb_state;

pub const DUCKDB_SUCCESS: duckdb_state = 0;
pub const DUCKDB_ERROR: duckdb_state = 1;

/// Logical type identifier understood by `duckdb_create_logical_type`.
#[allow(non_camel_case_types)]
pub type duckdb_type = c_uint;

pub const DUCKDB_TYPE_INVALID: duckdb_type = 0;
pub const DUCKDB_TYPE_BOOLEAN: duckdb_type = 1;
pub const DUCKDB_TYPE_TINYINT: duckdb_type = 2;
pub const DUCKDB_TYPE_SMALLINT: duckdb_type = 3;
pub const DUCKDB_TYPE_INTEGER: duckdb_type = 4;
pub const DUCKDB_TYPE_BIGINT: duckdb_type = 5;
pub const DUCKDB_TYPE_UTINYINT: duckdb_type = 6;
pub const DUCKDB_TYPE_USMALLINT: duckdb_type = 7;
pub const DUCKDB_TYPE_UINTEGER: duckdb_type = 8;
pub const DUCKDB_TYPE_UBIGINT: duckdb_type = 9;
pub const DUCKDB_TYPE_FLOAT: duckdb_type = 10;
pub const DUCKDB_TYPE_DOUBLE: duckdb_type = 11;
pub const DUCKDB_TYPE_TIMESTAMP: duckdb_type = 12;
pub const DUCKDB_TYPE_DATE: duckdb_type = 13;
pub const DUCKDB_TYPE_TIME: duckdb_type = 14;
pub const DUCKDB_TYPE_INTERVAL: duckdb_type = 15;
pub const DUCKDB_TYPE_HUGEINT: duckdb_type = 16;
pub const DUCKDB_TYPE_VARCHAR: duckdb_type = 17;
pub const DUCKDB_TYPE_BLOB: duckdb_type = 18;
