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

//! The handle registry.
//!
//! The engine stores extra-data, bind-data and init-data registrations as raw
//! `void *` values; a Rust handler object cannot be referenced by such a
//! pointer directly. The registry maps opaque integer tokens, smuggled across
//! the boundary as pointers, back to the registered objects. Tokens are
//! sequence numbers rather than addresses: a stale token misses the map
//! instead of touching freed memory, which keeps the delete trampolines safe
//! against duplicate delivery.
//!
//! A single coarse lock guards the map. Registration and deletion are rare
//! relative to execution callbacks, and lookups clone the entry and release
//! the lock before any handler code runs.

use std::any::Any;
use std::collections::HashMap;
use std::os::raw::c_void;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use crate::interface::{ReplacementScan, TableFunction};

/// An object held on behalf of the engine.
#[derive(Clone)]
pub(crate) enum Slot {
    TableFunction(Arc<dyn TableFunction>),
    ReplacementScan(Arc<dyn ReplacementScan>),
    Data(Arc<dyn Any + Send + Sync>),
}

/// Token handed to the engine in place of a real address. Never null.
pub(crate) type Token = *mut c_void;

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

fn slots() -> &'static Mutex<HashMap<u64, Slot>> {
    static SLOTS: OnceLock<Mutex<HashMap<u64, Slot>>> = OnceLock::new();
    SLOTS.get_or_init(Default::default)
}

/// Register an object and return the token to pass to the engine.
pub(crate) fn register(slot: Slot) -> Token {
    let key = NEXT_KEY.fetch_add(1, Ordering::Relaxed);
    slots().lock().unwrap().insert(key, slot);
    key as usize as Token
}

/// Look up a token without removing it.
pub(crate) fn resolve(token: Token) -> Option<Slot> {
    slots().lock().unwrap().get(&(token as usize as u64)).cloned()
}

/// Remove a token, dropping the registry's reference to the object.
///
/// Dropping the last [Arc] runs the object's `Drop`; that is the release
/// notification for handlers that care about teardown. Returns `false` when
/// the token was already released, making duplicate delete deliveries a no-op.
pub(crate) fn release(token: Token) -> bool {
    slots().lock().unwrap().remove(&(token as usize as u64)).is_some()
}
