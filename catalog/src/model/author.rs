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

//! The `Author` type.

use crate::model::{format_date, AuthorId};
use derive_getters::Getters;
use time::Date;

/// A person who wrote one or more books.
#[derive(Clone, Debug, Getters, PartialEq)]
pub(crate) struct Author {
    /// Identifier of the author.
    id: AuthorId,

    /// First name of the author, already sanitized.
    first_name: String,

    /// Family name of the author, already sanitized.
    family_name: String,

    /// Date in which the author was born, if known.
    date_of_birth: Option<Date>,

    /// Date in which the author died, if known.
    date_of_death: Option<Date>,
}

impl Author {
    /// Creates a new author without any dates.
    pub(crate) fn new<S1: Into<String>, S2: Into<String>>(
        id: AuthorId,
        first_name: S1,
        family_name: S2,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            family_name: family_name.into(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    /// Modifies a new author to record its date of birth.
    pub(crate) fn with_date_of_birth(mut self, date: Option<Date>) -> Self {
        self.date_of_birth = date;
        self
    }

    /// Modifies a new author to record its date of death.
    pub(crate) fn with_date_of_death(mut self, date: Option<Date>) -> Self {
        self.date_of_death = date;
        self
    }

    /// Returns the name of the author as `family, first`, or nothing if either part is missing.
    pub(crate) fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Returns a human-readable description of the known dates of the author.
    pub(crate) fn lifespan(&self) -> String {
        let mut parts = vec![];
        if let Some(date) = self.date_of_birth {
            parts.push(format!("Born: {}", format_date(date)));
        }
        if let Some(date) = self.date_of_death {
            parts.push(format!("Died: {}", format_date(date)));
        }
        parts.join(" - ")
    }

    /// Returns the path to the detail page of this author.
    pub(crate) fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }
}
