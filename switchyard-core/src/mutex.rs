// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronization primitive shared by every Switchyard lock.
//!
//! `parking_lot::Mutex` does not poison, so a receiver panicking on another
//! thread can never wedge a handler slot or a receiver set.

pub use parking_lot::{Mutex, MutexGuard};
