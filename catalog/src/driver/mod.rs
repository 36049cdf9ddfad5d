// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Business logic for the catalog.
//!
//! Every operation returns the data that a page needs to render: read operations return view
//! models and form submissions return either the path to redirect to or the form to show again.

use locallib_core::db::{Db, DbError, DbResult};
use locallib_core::driver::DriverError;
use std::collections::BTreeMap;
use std::sync::Arc;

mod author;
pub(crate) use author::{AuthorDelete, AuthorDetail, AuthorFields, AuthorForm};
mod book;
pub(crate) use book::{BookDelete, BookDetail, BookFields, BookForm, BookListItem};
mod bookinstance;
pub(crate) use bookinstance::{
    BookInstanceDelete, BookInstanceDetail, BookInstanceFields, BookInstanceForm,
    BookInstanceListItem,
};
mod genre;
pub(crate) use genre::{GenreDelete, GenreDetail, GenreFields, GenreForm};
mod index;
pub(crate) use index::Summary;
#[cfg(test)]
pub(crate) mod testutils;
pub(crate) mod validation;

/// Outcome of submitting a create or update form.
#[derive(Debug)]
pub(crate) enum FormOutcome<F> {
    /// The submission was stored and the user should be sent to the given path.
    Saved(String),

    /// The submission had invalid fields and the form has to be shown again.
    Rejected(F),
}

/// Outcome of confirming the deletion of an entity.
#[derive(Debug)]
pub(crate) enum DeleteOutcome<P> {
    /// The entity does not exist anymore, either because it was just deleted or because it was
    /// already gone.
    Gone,

    /// The entity still has dependents and the confirmation page has to be shown again.
    Blocked(P),
}

/// Returns a mapper from database errors to driver errors that names `what` was not found.
fn not_found(what: &'static str) -> impl Fn(DbError) -> DriverError {
    move |e| match e {
        DbError::NotFound => DriverError::NotFound(format!("{} not found", what)),
        e => e.into(),
    }
}

/// Converts the `NotFound` failure of a lookup into `None`.
fn optional<T>(result: DbResult<T>) -> DbResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DbError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Builds the selection overlay for a multi-choice form control: every identifier in `ids` maps
/// to whether its textual form appears in `chosen`.
pub(crate) fn selection<I, T>(ids: I, chosen: &[String]) -> BTreeMap<T, bool>
where
    I: IntoIterator<Item = T>,
    T: Ord + ToString,
{
    ids.into_iter()
        .map(|id| {
            let selected = chosen.contains(&id.to_string());
            (id, selected)
        })
        .collect()
}

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they consume the driver.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        Self { db }
    }
}
