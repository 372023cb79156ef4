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

//! Error, status and result types.

use std::ffi::NulError;
use std::fmt::Display;
use std::str::Utf8Error;

/// Status of an operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    /// An unknown error occurred.
    Unknown,
    /// The operation is not implemented, or the loaded engine library does not
    /// export the required entry point.
    NotImplemented,
    /// A requested resource was not found.
    NotFound,
    /// The arguments are invalid, likely a programming error.
    InvalidArguments,
    /// The preconditions for the operation are not met, likely a programming
    /// error. For instance, no engine may be installed yet.
    InvalidState,
    /// Invalid data was processed (not a programming error).
    InvalidData,
    /// An error internal to the engine or the bridge occurred.
    Internal,
    /// An I/O error occurred. For instance, the engine library may not be
    /// loadable from disk.
    IO,
}

/// A bridge error.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Error {
    /// The error message.
    pub message: String,
    /// The status of the operation.
    pub status: Status,
}

/// Result type wrapping [Error].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn with_message_and_status(message: impl Into<String>, status: Status) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.status, self.message)
    }
}

impl std::error::Error for Error {}

impl From<NulError> for Error {
    fn from(value: NulError) -> Self {
        Self {
            message: format!(
                "Interior null byte was found at position {}",
                value.nul_position()
            ),
            status: Status::InvalidData,
        }
    }
}

impl From<Utf8Error> for Error {
    fn from(value: Utf8Error) -> Self {
        Self {
            message: value.to_string(),
            status: Status::InvalidData,
        }
    }
}

impl From<libloading::Error> for Error {
    fn from(value: libloading::Error) -> Self {
        Self {
            message: format!("Error with dynamic library: {value}"),
            status: Status::IO,
        }
    }
}
