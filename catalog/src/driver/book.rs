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

//! Operations on books.

use crate::db;
use crate::driver::validation::{sanitize_all, Validator, Violation};
use crate::driver::{not_found, optional, selection, DeleteOutcome, Driver, FormOutcome};
use crate::model::*;
use futures::try_join;
use locallib_core::db::Executor;
use locallib_core::driver::{DriverError, DriverResult};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Textual values of the fields of the book form, as submitted or as pre-filled.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct BookFields {
    /// Title of the book.
    pub(crate) title: String,

    /// Identifier of the author of the book.
    pub(crate) author: String,

    /// Brief description of the book.
    pub(crate) summary: String,

    /// ISBN of the book.
    pub(crate) isbn: String,

    /// Identifiers of the genres of the book.
    pub(crate) genre: Vec<String>,
}

impl BookFields {
    /// Pre-fills the fields with the details of an existing `book`.
    fn from_book(book: &Book) -> Self {
        Self {
            title: book.title().clone(),
            author: book.author().to_string(),
            summary: book.summary().clone(),
            isbn: book.isbn().clone(),
            genre: book.genres().iter().map(GenreId::to_string).collect(),
        }
    }

    /// Trims, checks and escapes all fields, returning their sanitized values along with the
    /// violations found so far.  References to other entities are not checked.
    fn sanitize(self) -> (Self, Validator) {
        let mut validator = Validator::default();
        let fields = Self {
            title: validator
                .field("title", &self.title)
                .trim()
                .not_empty("Title must not be empty.")
                .escape()
                .value(),
            author: validator
                .field("author", &self.author)
                .trim()
                .not_empty("Author must not be empty.")
                .escape()
                .value(),
            summary: validator
                .field("summary", &self.summary)
                .trim()
                .not_empty("Summary must not be empty.")
                .escape()
                .value(),
            isbn: validator
                .field("isbn", &self.isbn)
                .trim()
                .not_empty("ISBN must not be empty.")
                .escape()
                .value(),
            genre: sanitize_all(&self.genre),
        };
        (fields, validator)
    }
}

/// A book along with the entities that listings show next to it.
#[derive(Debug)]
pub(crate) struct BookListItem {
    /// The book.
    pub(crate) book: Book,

    /// The author of the book.
    pub(crate) author: Author,
}

/// Everything that the detail page of a book shows.
#[derive(Debug)]
pub(crate) struct BookDetail {
    /// The book.
    pub(crate) book: Book,

    /// The author of the book.
    pub(crate) author: Author,

    /// The genres of the book, sorted by name.
    pub(crate) genres: Vec<Genre>,

    /// The physical copies of the book, sorted by imprint.
    pub(crate) instances: Vec<BookInstance>,
}

/// State of the book create and update forms.
#[derive(Debug)]
pub(crate) struct BookForm {
    /// Title of the page that hosts the form.
    pub(crate) title: &'static str,

    /// All authors that the book can be attributed to, sorted by name.
    pub(crate) authors: Vec<Author>,

    /// The author currently selected in the form, if any.
    pub(crate) selected_author: Option<AuthorId>,

    /// All genres that the book can belong to, sorted by name.
    pub(crate) genres: Vec<Genre>,

    /// Whether each genre is currently checked in the form.
    pub(crate) selected_genres: BTreeMap<GenreId, bool>,

    /// Values to pre-fill the form with.
    pub(crate) fields: BookFields,

    /// Problems found in the last submission of the form.
    pub(crate) violations: Vec<Violation>,
}

/// Everything that the delete confirmation page of a book shows.
#[derive(Debug)]
pub(crate) struct BookDelete {
    /// The book to delete.
    pub(crate) book: Book,

    /// The author of the book.
    pub(crate) author: Author,

    /// The copies of the book, which block its deletion.
    pub(crate) instances: Vec<BookInstance>,
}

/// Checks that the references in the sanitized `fields` point to existing entities and builds
/// the book they describe with the given `id`.
///
/// Violations are recorded in `validator`.  Returns `None` if the book cannot be built.
async fn resolve_book(
    ex: &mut Executor,
    id: BookId,
    fields: &BookFields,
    validator: &mut Validator,
) -> DriverResult<Option<Book>> {
    let mut author = None;
    if !validator.has_violation("author") {
        if let Ok(author_id) = fields.author.parse::<AuthorId>() {
            author = optional(db::get_author(ex, author_id).await)?.map(|a| *a.id());
        }
        if author.is_none() {
            validator.reject("author", "Author does not exist.");
        }
    }

    let mut genres = BTreeSet::default();
    for raw_id in &fields.genre {
        let genre = match raw_id.parse::<GenreId>() {
            Ok(genre_id) => optional(db::get_genre(ex, genre_id).await)?,
            Err(_) => None,
        };
        match genre {
            Some(genre) => {
                genres.insert(*genre.id());
            }
            None => {
                validator.reject("genre", "Genre does not exist.");
                break;
            }
        }
    }

    match author {
        Some(author) if validator.is_valid() => Ok(Some(Book::new(
            id,
            fields.title.clone(),
            author,
            fields.summary.clone(),
            fields.isbn.clone(),
            genres,
        ))),
        _ => Ok(None),
    }
}

impl Driver {
    /// Gets all books sorted by title along with their authors.
    pub(crate) async fn list_books(self) -> DriverResult<Vec<BookListItem>> {
        let (books, authors) = try_join!(
            async { Ok::<_, DriverError>(db::list_books(&mut self.db.ex().await?).await?) },
            async { Ok::<_, DriverError>(db::list_authors(&mut self.db.ex().await?).await?) },
        )?;

        let authors: HashMap<AuthorId, Author> =
            authors.into_iter().map(|author| (*author.id(), author)).collect();
        books
            .into_iter()
            .map(|book| match authors.get(book.author()) {
                Some(author) => Ok(BookListItem { author: author.clone(), book }),
                None => Err(DriverError::BackendError(format!(
                    "Book {} references unknown author {}",
                    book.id(),
                    book.author()
                ))),
            })
            .collect()
    }

    /// Gets the book identified by `id` along with its author, genres and copies.
    pub(crate) async fn get_book_detail(self, id: BookId) -> DriverResult<BookDetail> {
        let ((book, author), genres, instances) = try_join!(
            async {
                let mut ex = self.db.ex().await?;
                let book = db::get_book(&mut ex, id).await.map_err(not_found("Book"))?;
                let author = db::get_author(&mut ex, *book.author()).await?;
                Ok::<_, DriverError>((book, author))
            },
            async {
                Ok::<_, DriverError>(db::list_genres_by_book(&mut self.db.ex().await?, id).await?)
            },
            async {
                Ok::<_, DriverError>(
                    db::list_instances_by_book(&mut self.db.ex().await?, id).await?,
                )
            },
        )?;
        Ok(BookDetail { book, author, genres, instances })
    }

    /// Builds the book form titled `title` pre-filled with `fields` and showing `violations`.
    async fn book_form(
        &self,
        title: &'static str,
        fields: BookFields,
        violations: Vec<Violation>,
    ) -> DriverResult<BookForm> {
        let (authors, genres) = try_join!(
            async { Ok::<_, DriverError>(db::list_authors(&mut self.db.ex().await?).await?) },
            async { Ok::<_, DriverError>(db::list_genres(&mut self.db.ex().await?).await?) },
        )?;

        let selected_author = authors
            .iter()
            .map(|author| *author.id())
            .find(|id| id.to_string() == fields.author);
        let selected_genres = selection(genres.iter().map(|genre| *genre.id()), &fields.genre);
        Ok(BookForm { title, authors, selected_author, genres, selected_genres, fields, violations })
    }

    /// Gets the empty form to create a new book.
    pub(crate) async fn book_create_form(self) -> DriverResult<BookForm> {
        self.book_form("Create Book", BookFields::default(), vec![]).await
    }

    /// Creates a new book from the submitted `fields`.
    pub(crate) async fn create_book(self, fields: BookFields) -> DriverResult<FormOutcome<BookForm>> {
        let (fields, mut validator) = fields.sanitize();

        let mut tx = self.db.begin().await?;
        if let Some(book) = resolve_book(tx.ex(), BookId::generate(), &fields, &mut validator).await?
        {
            db::create_book(tx.ex(), &book).await?;
            tx.commit().await?;
            info!("Created book {} titled '{}'", book.id(), book.title());
            return Ok(FormOutcome::Saved(book.url()));
        }
        drop(tx);

        let violations = validator.into_violations();
        debug!("Rejected new book: {:?}", violations);
        Ok(FormOutcome::Rejected(self.book_form("Create Book", fields, violations).await?))
    }

    /// Gets the form to update the book identified by `id`, pre-filled with its current details.
    pub(crate) async fn book_update_form(self, id: BookId) -> DriverResult<BookForm> {
        let book = db::get_book(&mut self.db.ex().await?, id).await.map_err(not_found("Book"))?;
        self.book_form("Update Book", BookFields::from_book(&book), vec![]).await
    }

    /// Replaces the details of the book identified by `id` with the submitted `fields`.
    pub(crate) async fn update_book(
        self,
        id: BookId,
        fields: BookFields,
    ) -> DriverResult<FormOutcome<BookForm>> {
        let (fields, mut validator) = fields.sanitize();

        let mut tx = self.db.begin().await?;
        if let Some(book) = resolve_book(tx.ex(), id, &fields, &mut validator).await? {
            db::update_book(tx.ex(), &book).await.map_err(not_found("Book"))?;
            tx.commit().await?;
            info!("Updated book {} titled '{}'", book.id(), book.title());
            return Ok(FormOutcome::Saved(book.url()));
        }
        db::get_book(tx.ex(), id).await.map_err(not_found("Book"))?;
        drop(tx);

        let violations = validator.into_violations();
        debug!("Rejected update of book {}: {:?}", id, violations);
        Ok(FormOutcome::Rejected(self.book_form("Update Book", fields, violations).await?))
    }

    /// Gets the confirmation page to delete the book identified by `id`, or `None` if the book
    /// does not exist.
    pub(crate) async fn book_delete_page(self, id: BookId) -> DriverResult<Option<BookDelete>> {
        let (book, instances) = try_join!(
            async {
                let mut ex = self.db.ex().await?;
                match optional(db::get_book(&mut ex, id).await)? {
                    Some(book) => {
                        let author = db::get_author(&mut ex, *book.author()).await?;
                        Ok::<_, DriverError>(Some((book, author)))
                    }
                    None => Ok(None),
                }
            },
            async {
                Ok::<_, DriverError>(
                    db::list_instances_by_book(&mut self.db.ex().await?, id).await?,
                )
            },
        )?;
        Ok(book.map(|(book, author)| BookDelete { book, author, instances }))
    }

    /// Deletes the book identified by `id` unless it still has copies.
    pub(crate) async fn delete_book(self, id: BookId) -> DriverResult<DeleteOutcome<BookDelete>> {
        let mut tx = self.db.begin().await?;

        let book = match optional(db::get_book(tx.ex(), id).await)? {
            Some(book) => book,
            None => return Ok(DeleteOutcome::Gone),
        };
        let instances = db::list_instances_by_book(tx.ex(), id).await?;
        if !instances.is_empty() {
            let author = db::get_author(tx.ex(), *book.author()).await?;
            debug!("Refusing to delete book {} with {} copies", id, instances.len());
            return Ok(DeleteOutcome::Blocked(BookDelete { book, author, instances }));
        }

        db::delete_book(tx.ex(), id).await?;
        tx.commit().await?;
        info!("Deleted book {} titled '{}'", id, book.title());
        Ok(DeleteOutcome::Gone)
    }
}
