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

//! Database abstraction to manipulate the catalog.

use locallib_core::db::{DbError, DbResult, Executor};
#[cfg(feature = "postgres")]
use locallib_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use locallib_core::db::sqlite;

mod author;
pub(crate) use author::*;
mod book;
pub(crate) use book::*;
mod bookinstance;
pub(crate) use bookinstance::*;
mod genre;
pub(crate) use genre::*;

#[cfg(test)]
mod tests;

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Adjusts the error of a deletion of a `what` record.
///
/// Deletions do not look up other rows, so a `NotFound` coming from the backend is a foreign key
/// violation: some other record still points at the one being deleted.
fn deletion_error(what: &'static str) -> impl Fn(DbError) -> DbError {
    move |e| match e {
        DbError::NotFound => {
            DbError::DataIntegrityError(format!("The {} is still referenced by other records", what))
        }
        e => e,
    }
}
