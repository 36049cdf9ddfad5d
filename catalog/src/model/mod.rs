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

//! Data types that describe the contents of the catalog.

use locallib_core::model::{ModelError, ModelResult};
use time::macros::format_description;
use time::Date;

mod author;
pub(crate) use author::Author;
mod book;
pub(crate) use book::Book;
mod bookinstance;
pub(crate) use bookinstance::{BookInstance, BookInstanceStatus};
mod genre;
pub(crate) use genre::Genre;
mod ids;
pub(crate) use ids::{AuthorId, BookId, BookInstanceId, GenreId};

/// Parses a date in the `YYYY-MM-DD` form that HTML date inputs submit.
pub(crate) fn parse_iso_date(s: &str) -> ModelResult<Date> {
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .map_err(|e| ModelError(format!("Invalid date '{}': {}", s, e)))
}

/// Formats `date` in the `YYYY-MM-DD` form that HTML date inputs expect.
pub(crate) fn format_iso_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .expect("Dates always have the components to format")
}

/// Formats `date` for humans, as in `Oct 6, 2014`.
pub(crate) fn format_date(date: Date) -> String {
    date.format(format_description!("[month repr:short] [day padding:none], [year]"))
        .expect("Dates always have the components to format")
}
