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

//! The `Genre` type.

use crate::model::GenreId;
use derive_getters::Getters;
use derive_more::Constructor;

/// A category of books.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct Genre {
    /// Identifier of the genre.
    id: GenreId,

    /// Name of the genre, already sanitized.
    name: String,
}

impl Genre {
    /// Returns the path to the detail page of this genre.
    pub(crate) fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}
