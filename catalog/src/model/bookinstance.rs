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

//! The `BookInstance` type.

use crate::model::{format_date, BookId, BookInstanceId};
use derive_getters::Getters;
use derive_more::Constructor;
use locallib_core::model::{ModelError, ModelResult};
use std::fmt;
use std::str::FromStr;
use time::Date;

/// Lending state of a physical copy of a book.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum BookInstanceStatus {
    /// The copy can be borrowed.
    Available,

    /// The copy is being repaired or catalogued and cannot be borrowed.
    #[default]
    Maintenance,

    /// The copy is currently borrowed.
    Loaned,

    /// The copy has been reserved by a patron.
    Reserved,
}

impl BookInstanceStatus {
    /// All possible statuses in the order in which forms offer them.
    pub(crate) const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Available,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    /// Returns the textual representation of the status, used in storage and in forms.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl FromStr for BookInstanceStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        BookInstanceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ModelError(format!("Unknown book copy status '{}'", s)))
    }
}

impl fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical copy of a book that the library can lend.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct BookInstance {
    /// Identifier of the copy.
    id: BookInstanceId,

    /// Book that this is a copy of.
    book: BookId,

    /// Publisher and edition details of the copy, already sanitized.
    imprint: String,

    /// Lending state of the copy.
    status: BookInstanceStatus,

    /// Date in which the copy is expected back, if it is lent.
    due_back: Option<Date>,
}

impl BookInstance {
    /// Returns the due-back date for humans, or nothing if there is none.
    pub(crate) fn due_back_formatted(&self) -> String {
        self.due_back.map(format_date).unwrap_or_default()
    }

    /// Returns the path to the detail page of this copy.
    pub(crate) fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }
}
