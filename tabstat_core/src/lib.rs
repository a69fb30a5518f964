// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Columnar tables for `tabstat`.
//!
//! This crate provides:
//! - an immutable, typed, nullable [`Table`] with a named schema,
//! - a deferred [`LazyTable`] plan and the [`Frame`] input type that resolves
//!   either form into a concrete table, and
//! - [`partition_by`], which splits a table into group-by partitions in
//!   first-seen key order.
//!
//! Everything here is read-only once built: operations return new tables or
//! borrowed views rather than mutating in place.

#![no_std]

extern crate alloc;

mod column;
mod frame;
mod lazy;
mod partition;
mod table;
mod value;

pub use column::{Column, ColumnData};
pub use frame::Frame;
pub use lazy::{CompareOp, LazyOp, LazyTable, Predicate};
pub use partition::{GroupKey, Partition, partition_by};
pub use table::{Table, TableError};
pub use value::{DataType, Value};
