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

//! Operations on book copies.

use crate::db;
use crate::driver::validation::{Validator, Violation};
use crate::driver::{not_found, optional, Driver, FormOutcome};
use crate::model::*;
use futures::try_join;
use locallib_core::db::{DbError, Executor};
use locallib_core::driver::{DriverError, DriverResult};
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;

/// Textual values of the fields of the book copy form, as submitted or as pre-filled.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct BookInstanceFields {
    /// Identifier of the book that this is a copy of.
    pub(crate) book: String,

    /// Publisher and edition details of the copy.
    pub(crate) imprint: String,

    /// Lending state of the copy, or empty for the default.
    pub(crate) status: String,

    /// Date in which the copy is expected back as `YYYY-MM-DD`, or empty.
    pub(crate) due_back: String,
}

impl BookInstanceFields {
    /// Pre-fills the fields with the details of an existing `instance`.
    fn from_instance(instance: &BookInstance) -> Self {
        Self {
            book: instance.book().to_string(),
            imprint: instance.imprint().clone(),
            status: instance.status().to_string(),
            due_back: instance.due_back().map(format_iso_date).unwrap_or_default(),
        }
    }

    /// Trims, checks and escapes all fields, returning their sanitized values along with the
    /// violations found so far.  The reference to the book is not checked.
    fn sanitize(self) -> (Self, Validator) {
        let statuses = BookInstanceStatus::ALL.map(|status| status.as_str());

        let mut validator = Validator::default();
        let fields = Self {
            book: validator
                .field("book", &self.book)
                .trim()
                .not_empty("Book must be specified.")
                .escape()
                .value(),
            imprint: validator
                .field("imprint", &self.imprint)
                .trim()
                .not_empty("Imprint must be specified.")
                .escape()
                .value(),
            status: validator
                .field("status", &self.status)
                .trim()
                .one_of(&statuses, true, "Invalid status.")
                .escape()
                .value(),
            due_back: validator
                .field("due_back", &self.due_back)
                .trim()
                .optional_iso_date("Invalid date.")
                .escape()
                .value(),
        };
        (fields, validator)
    }
}

/// A book copy along with the book it belongs to.
#[derive(Debug)]
pub(crate) struct BookInstanceListItem {
    /// The copy.
    pub(crate) instance: BookInstance,

    /// The book that this is a copy of.
    pub(crate) book: Book,
}

/// Everything that the detail page of a book copy shows.
pub(crate) type BookInstanceDetail = BookInstanceListItem;

/// Everything that the delete confirmation page of a book copy shows.
pub(crate) type BookInstanceDelete = BookInstanceListItem;

/// State of the book copy create and update forms.
#[derive(Debug)]
pub(crate) struct BookInstanceForm {
    /// Title of the page that hosts the form.
    pub(crate) title: &'static str,

    /// All books that the copy can belong to, sorted by title.
    pub(crate) books: Vec<Book>,

    /// The book currently selected in the form, if any.
    pub(crate) selected_book: Option<BookId>,

    /// Values to pre-fill the form with.
    pub(crate) fields: BookInstanceFields,

    /// Problems found in the last submission of the form.
    pub(crate) violations: Vec<Violation>,
}

/// Checks that the book referenced by the sanitized `fields` exists and builds the copy they
/// describe with the given `id`.
///
/// Violations are recorded in `validator`.  Returns `None` if the copy cannot be built.
async fn resolve_instance(
    ex: &mut Executor,
    id: BookInstanceId,
    fields: &BookInstanceFields,
    validator: &mut Validator,
) -> DriverResult<Option<BookInstance>> {
    let mut book = None;
    if !validator.has_violation("book") {
        if let Ok(book_id) = fields.book.parse::<BookId>() {
            book = optional(db::get_book(ex, book_id).await)?.map(|b| *b.id());
        }
        if book.is_none() {
            validator.reject("book", "Book does not exist.");
        }
    }

    let book = match book {
        Some(book) if validator.is_valid() => book,
        _ => return Ok(None),
    };
    let status = match fields.status.as_str() {
        "" => BookInstanceStatus::default(),
        s => s.parse::<BookInstanceStatus>()?,
    };
    let due_back = match fields.due_back.as_str() {
        "" => None,
        s => Some(parse_iso_date(s)?),
    };
    Ok(Some(BookInstance::new(id, book, fields.imprint.clone(), status, due_back)))
}

impl Driver {
    /// Gets all book copies sorted by the title of their book and then by imprint.
    pub(crate) async fn list_instances(self) -> DriverResult<Vec<BookInstanceListItem>> {
        let (instances, books) = try_join!(
            async { Ok::<_, DriverError>(db::list_instances(&mut self.db.ex().await?).await?) },
            async { Ok::<_, DriverError>(db::list_books(&mut self.db.ex().await?).await?) },
        )?;

        let books: HashMap<BookId, Book> =
            books.into_iter().map(|book| (*book.id(), book)).collect();
        instances
            .into_iter()
            .map(|instance| match books.get(instance.book()) {
                Some(book) => Ok(BookInstanceListItem { book: book.clone(), instance }),
                None => Err(DriverError::BackendError(format!(
                    "Book copy {} references unknown book {}",
                    instance.id(),
                    instance.book()
                ))),
            })
            .collect()
    }

    /// Gets the book copy identified by `id` along with its book, or `None` if it does not
    /// exist.
    async fn find_instance(&self, id: BookInstanceId) -> DriverResult<Option<BookInstanceDetail>> {
        let mut ex = self.db.ex().await?;
        match optional(db::get_instance(&mut ex, id).await)? {
            Some(instance) => {
                let book = db::get_book(&mut ex, *instance.book()).await?;
                Ok(Some(BookInstanceDetail { instance, book }))
            }
            None => Ok(None),
        }
    }

    /// Gets the book copy identified by `id` along with its book.
    pub(crate) async fn get_instance_detail(
        self,
        id: BookInstanceId,
    ) -> DriverResult<BookInstanceDetail> {
        match self.find_instance(id).await? {
            Some(detail) => Ok(detail),
            None => Err(DriverError::NotFound("Book copy not found".to_owned())),
        }
    }

    /// Builds the book copy form titled `title` pre-filled with `fields` and showing
    /// `violations`.
    async fn instance_form(
        &self,
        title: &'static str,
        fields: BookInstanceFields,
        violations: Vec<Violation>,
    ) -> DriverResult<BookInstanceForm> {
        let books = db::list_books(&mut self.db.ex().await?).await?;
        let selected_book =
            books.iter().map(|book| *book.id()).find(|id| id.to_string() == fields.book);
        Ok(BookInstanceForm { title, books, selected_book, fields, violations })
    }

    /// Gets the empty form to create a new book copy.
    pub(crate) async fn instance_create_form(self) -> DriverResult<BookInstanceForm> {
        self.instance_form("Create Book Copy", BookInstanceFields::default(), vec![]).await
    }

    /// Creates a new book copy from the submitted `fields`.
    pub(crate) async fn create_instance(
        self,
        fields: BookInstanceFields,
    ) -> DriverResult<FormOutcome<BookInstanceForm>> {
        let (fields, mut validator) = fields.sanitize();

        let mut tx = self.db.begin().await?;
        let id = BookInstanceId::generate();
        if let Some(instance) = resolve_instance(tx.ex(), id, &fields, &mut validator).await? {
            db::create_instance(tx.ex(), &instance).await?;
            tx.commit().await?;
            info!("Created copy {} of book {}", instance.id(), instance.book());
            return Ok(FormOutcome::Saved(instance.url()));
        }
        drop(tx);

        let violations = validator.into_violations();
        debug!("Rejected new book copy: {:?}", violations);
        Ok(FormOutcome::Rejected(self.instance_form("Create Book Copy", fields, violations).await?))
    }

    /// Gets the form to update the book copy identified by `id`, pre-filled with its current
    /// details.
    pub(crate) async fn instance_update_form(
        self,
        id: BookInstanceId,
    ) -> DriverResult<BookInstanceForm> {
        let instance = db::get_instance(&mut self.db.ex().await?, id)
            .await
            .map_err(not_found("Book copy"))?;
        let fields = BookInstanceFields::from_instance(&instance);
        self.instance_form("Update Book Copy", fields, vec![]).await
    }

    /// Replaces the details of the book copy identified by `id` with the submitted `fields`.
    pub(crate) async fn update_instance(
        self,
        id: BookInstanceId,
        fields: BookInstanceFields,
    ) -> DriverResult<FormOutcome<BookInstanceForm>> {
        let (fields, mut validator) = fields.sanitize();

        let mut tx = self.db.begin().await?;
        if let Some(instance) = resolve_instance(tx.ex(), id, &fields, &mut validator).await? {
            db::update_instance(tx.ex(), &instance).await.map_err(not_found("Book copy"))?;
            tx.commit().await?;
            info!("Updated copy {} of book {}", instance.id(), instance.book());
            return Ok(FormOutcome::Saved(instance.url()));
        }
        db::get_instance(tx.ex(), id).await.map_err(not_found("Book copy"))?;
        drop(tx);

        let violations = validator.into_violations();
        debug!("Rejected update of book copy {}: {:?}", id, violations);
        Ok(FormOutcome::Rejected(self.instance_form("Update Book Copy", fields, violations).await?))
    }

    /// Gets the confirmation page to delete the book copy identified by `id`, or `None` if the
    /// copy does not exist.
    pub(crate) async fn instance_delete_page(
        self,
        id: BookInstanceId,
    ) -> DriverResult<Option<BookInstanceDelete>> {
        self.find_instance(id).await
    }

    /// Deletes the book copy identified by `id`.  Deleting a copy that does not exist succeeds.
    pub(crate) async fn delete_instance(self, id: BookInstanceId) -> DriverResult<()> {
        match db::delete_instance(&mut self.db.ex().await?, id).await {
            Ok(()) => {
                info!("Deleted book copy {}", id);
                Ok(())
            }
            Err(DbError::NotFound) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
