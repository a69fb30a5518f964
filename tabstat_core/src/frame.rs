// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Eager-or-lazy table inputs.

extern crate alloc;

use alloc::borrow::Cow;

use crate::lazy::LazyTable;
use crate::table::{Table, TableError};

/// An input table that may still need to be computed.
///
/// Statistics always need whole partitions in memory, so consumers call
/// [`Frame::materialize`] exactly once up front and work on the snapshot.
#[derive(Debug, Clone)]
pub enum Frame<'a> {
    /// A table that already exists.
    Eager(&'a Table),
    /// A plan that produces a table on demand.
    Lazy(LazyTable),
}

impl<'a> Frame<'a> {
    /// Returns `true` for [`Frame::Lazy`].
    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }

    /// Resolves the input into a concrete table.
    ///
    /// Eager inputs are borrowed as-is; lazy inputs run their plan.
    pub fn materialize(self) -> Result<Cow<'a, Table>, TableError> {
        match self {
            Self::Eager(table) => Ok(Cow::Borrowed(table)),
            Self::Lazy(plan) => plan.collect().map(Cow::Owned),
        }
    }
}

impl<'a> From<&'a Table> for Frame<'a> {
    fn from(value: &'a Table) -> Self {
        Self::Eager(value)
    }
}

impl From<LazyTable> for Frame<'_> {
    fn from(value: LazyTable) -> Self {
        Self::Lazy(value)
    }
}
