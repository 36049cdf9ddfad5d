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

//! The `Book` type.

use crate::model::{AuthorId, BookId, GenreId};
use derive_getters::Getters;
use derive_more::Constructor;
use std::collections::BTreeSet;

/// A book, as an abstract work independent of its physical copies.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct Book {
    /// Identifier of the book.
    id: BookId,

    /// Title of the book, already sanitized.
    title: String,

    /// Author that wrote the book.
    author: AuthorId,

    /// Brief description of the book, already sanitized.
    summary: String,

    /// ISBN of the book, already sanitized.  This is not validated.
    isbn: String,

    /// Genres that the book belongs to.
    genres: BTreeSet<GenreId>,
}

impl Book {
    /// Replaces the genres of the book.
    pub(crate) fn with_genres(mut self, genres: BTreeSet<GenreId>) -> Self {
        self.genres = genres;
        self
    }

    /// Returns the path to the detail page of this book.
    pub(crate) fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}
