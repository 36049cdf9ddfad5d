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

//! Operations on genres.

use crate::db;
use crate::driver::validation::{Validator, Violation};
use crate::driver::{not_found, optional, DeleteOutcome, Driver, FormOutcome};
use crate::model::*;
use futures::try_join;
use locallib_core::driver::{DriverError, DriverResult};
use log::{debug, info};
use serde::Deserialize;

/// Textual values of the fields of the genre form, as submitted or as pre-filled.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct GenreFields {
    /// Name of the genre.
    pub(crate) name: String,
}

impl GenreFields {
    /// Trims, checks and escapes all fields.
    fn sanitize(self) -> (Self, Validator) {
        let mut validator = Validator::default();
        let fields = Self {
            name: validator
                .field("name", &self.name)
                .trim()
                .min_chars(3, "Genre name must contain at least 3 characters.")
                .max_chars(100, "Genre name must be at most 100 characters.")
                .escape()
                .value(),
        };
        (fields, validator)
    }
}

/// Everything that the detail page of a genre shows.
#[derive(Debug)]
pub(crate) struct GenreDetail {
    /// The genre.
    pub(crate) genre: Genre,

    /// The books that belong to the genre, sorted by title.
    pub(crate) books: Vec<Book>,
}

/// State of the genre create and update forms.
#[derive(Debug)]
pub(crate) struct GenreForm {
    /// Title of the page that hosts the form.
    pub(crate) title: &'static str,

    /// Values to pre-fill the form with.
    pub(crate) fields: GenreFields,

    /// Problems found in the last submission of the form.
    pub(crate) violations: Vec<Violation>,
}

impl GenreForm {
    /// Returns the empty form to create a new genre.
    pub(crate) fn create() -> Self {
        Self { title: "Create Genre", fields: GenreFields::default(), violations: vec![] }
    }
}

/// Everything that the delete confirmation page of a genre shows.
#[derive(Debug)]
pub(crate) struct GenreDelete {
    /// The genre to delete.
    pub(crate) genre: Genre,

    /// The books that belong to the genre, which block its deletion.
    pub(crate) books: Vec<Book>,
}

impl Driver {
    /// Gets all genres sorted by name.
    pub(crate) async fn list_genres(self) -> DriverResult<Vec<Genre>> {
        Ok(db::list_genres(&mut self.db.ex().await?).await?)
    }

    /// Gets the genre identified by `id` along with the books that belong to it.
    pub(crate) async fn get_genre_detail(self, id: GenreId) -> DriverResult<GenreDetail> {
        let (genre, books) = try_join!(
            async { db::get_genre(&mut self.db.ex().await?, id).await.map_err(not_found("Genre")) },
            async {
                Ok::<_, DriverError>(db::list_books_by_genre(&mut self.db.ex().await?, id).await?)
            },
        )?;
        Ok(GenreDetail { genre, books })
    }

    /// Creates a new genre from the submitted `fields`.
    ///
    /// If a genre with the same name already exists, nothing is created and the outcome points
    /// to the existing genre instead.
    pub(crate) async fn create_genre(
        self,
        fields: GenreFields,
    ) -> DriverResult<FormOutcome<GenreForm>> {
        let (fields, validator) = fields.sanitize();
        if !validator.is_valid() {
            let violations = validator.into_violations();
            debug!("Rejected new genre: {:?}", violations);
            return Ok(FormOutcome::Rejected(GenreForm {
                title: "Create Genre",
                fields,
                violations,
            }));
        }

        let mut tx = self.db.begin().await?;
        if let Some(genre) = db::get_genre_by_name(tx.ex(), &fields.name).await? {
            debug!("Genre '{}' already exists as {}", fields.name, genre.id());
            return Ok(FormOutcome::Saved(genre.url()));
        }
        let genre = Genre::new(GenreId::generate(), fields.name);
        db::create_genre(tx.ex(), &genre).await?;
        tx.commit().await?;
        info!("Created genre {} named '{}'", genre.id(), genre.name());
        Ok(FormOutcome::Saved(genre.url()))
    }

    /// Gets the form to update the genre identified by `id`, pre-filled with its current name.
    pub(crate) async fn genre_update_form(self, id: GenreId) -> DriverResult<GenreForm> {
        let genre = db::get_genre(&mut self.db.ex().await?, id).await.map_err(not_found("Genre"))?;
        Ok(GenreForm {
            title: "Update Genre",
            fields: GenreFields { name: genre.name().clone() },
            violations: vec![],
        })
    }

    /// Replaces the name of the genre identified by `id` with the submitted one.
    pub(crate) async fn update_genre(
        self,
        id: GenreId,
        fields: GenreFields,
    ) -> DriverResult<FormOutcome<GenreForm>> {
        let (fields, validator) = fields.sanitize();
        if !validator.is_valid() {
            db::get_genre(&mut self.db.ex().await?, id).await.map_err(not_found("Genre"))?;
            let violations = validator.into_violations();
            debug!("Rejected update of genre {}: {:?}", id, violations);
            return Ok(FormOutcome::Rejected(GenreForm {
                title: "Update Genre",
                fields,
                violations,
            }));
        }

        let genre = Genre::new(id, fields.name);
        db::update_genre(&mut self.db.ex().await?, &genre).await.map_err(not_found("Genre"))?;
        info!("Updated genre {} named '{}'", genre.id(), genre.name());
        Ok(FormOutcome::Saved(genre.url()))
    }

    /// Gets the confirmation page to delete the genre identified by `id`, or `None` if the
    /// genre does not exist.
    pub(crate) async fn genre_delete_page(self, id: GenreId) -> DriverResult<Option<GenreDelete>> {
        let (genre, books) = try_join!(
            async {
                Ok::<_, DriverError>(optional(db::get_genre(&mut self.db.ex().await?, id).await)?)
            },
            async {
                Ok::<_, DriverError>(db::list_books_by_genre(&mut self.db.ex().await?, id).await?)
            },
        )?;
        Ok(genre.map(|genre| GenreDelete { genre, books }))
    }

    /// Deletes the genre identified by `id` unless books still belong to it.
    pub(crate) async fn delete_genre(self, id: GenreId) -> DriverResult<DeleteOutcome<GenreDelete>> {
        let mut tx = self.db.begin().await?;

        let genre = match optional(db::get_genre(tx.ex(), id).await)? {
            Some(genre) => genre,
            None => return Ok(DeleteOutcome::Gone),
        };
        let books = db::list_books_by_genre(tx.ex(), id).await?;
        if !books.is_empty() {
            debug!("Refusing to delete genre {} with {} books", id, books.len());
            return Ok(DeleteOutcome::Blocked(GenreDelete { genre, books }));
        }

        db::delete_genre(tx.ex(), id).await?;
        tx.commit().await?;
        info!("Deleted genre {} named '{}'", id, genre.name());
        Ok(DeleteOutcome::Gone)
    }
}
