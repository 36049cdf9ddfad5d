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

//! Operations on authors.

use crate::db;
use crate::driver::validation::{Validator, Violation};
use crate::driver::{not_found, optional, DeleteOutcome, Driver, FormOutcome};
use crate::model::*;
use futures::try_join;
use locallib_core::driver::{DriverError, DriverResult};
use log::{debug, info};
use serde::Deserialize;

/// Textual values of the fields of the author form, as submitted or as pre-filled.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct AuthorFields {
    /// First name of the author.
    pub(crate) first_name: String,

    /// Family name of the author.
    pub(crate) family_name: String,

    /// Date of birth of the author as `YYYY-MM-DD`, or empty if unknown.
    pub(crate) date_of_birth: String,

    /// Date of death of the author as `YYYY-MM-DD`, or empty if unknown.
    pub(crate) date_of_death: String,
}

impl AuthorFields {
    /// Pre-fills the fields with the details of an existing `author`.
    fn from_author(author: &Author) -> Self {
        Self {
            first_name: author.first_name().clone(),
            family_name: author.family_name().clone(),
            date_of_birth: author.date_of_birth().map(format_iso_date).unwrap_or_default(),
            date_of_death: author.date_of_death().map(format_iso_date).unwrap_or_default(),
        }
    }

    /// Trims, checks and escapes all fields, returning their sanitized values along with the
    /// violations found.
    fn sanitize(self) -> (Self, Validator) {
        let mut validator = Validator::default();
        let fields = Self {
            first_name: validator
                .field("first_name", &self.first_name)
                .trim()
                .not_empty("First name must be specified.")
                .max_chars(100, "First name must be at most 100 characters.")
                .alphanumeric("First name has non-alphanumeric characters.")
                .escape()
                .value(),
            family_name: validator
                .field("family_name", &self.family_name)
                .trim()
                .not_empty("Family name must be specified.")
                .max_chars(100, "Family name must be at most 100 characters.")
                .alphanumeric("Family name has non-alphanumeric characters.")
                .escape()
                .value(),
            date_of_birth: validator
                .field("date_of_birth", &self.date_of_birth)
                .trim()
                .optional_iso_date("Invalid date of birth.")
                .escape()
                .value(),
            date_of_death: validator
                .field("date_of_death", &self.date_of_death)
                .trim()
                .optional_iso_date("Invalid date of death.")
                .escape()
                .value(),
        };
        (fields, validator)
    }

    /// Builds the author with the given `id` that the sanitized and valid fields describe.
    fn into_author(self, id: AuthorId) -> DriverResult<Author> {
        let parse = |s: &str| match s {
            "" => Ok(None),
            s => parse_iso_date(s).map(Some),
        };
        let date_of_birth = parse(&self.date_of_birth)?;
        let date_of_death = parse(&self.date_of_death)?;
        Ok(Author::new(id, self.first_name, self.family_name)
            .with_date_of_birth(date_of_birth)
            .with_date_of_death(date_of_death))
    }
}

/// Everything that the detail page of an author shows.
#[derive(Debug)]
pub(crate) struct AuthorDetail {
    /// The author.
    pub(crate) author: Author,

    /// The books written by the author, sorted by title.
    pub(crate) books: Vec<Book>,
}

/// State of the author create and update forms.
#[derive(Debug)]
pub(crate) struct AuthorForm {
    /// Title of the page that hosts the form.
    pub(crate) title: &'static str,

    /// Values to pre-fill the form with.
    pub(crate) fields: AuthorFields,

    /// Problems found in the last submission of the form.
    pub(crate) violations: Vec<Violation>,
}

impl AuthorForm {
    /// Returns the empty form to create a new author.
    pub(crate) fn create() -> Self {
        Self { title: "Create Author", fields: AuthorFields::default(), violations: vec![] }
    }
}

/// Everything that the delete confirmation page of an author shows.
#[derive(Debug)]
pub(crate) struct AuthorDelete {
    /// The author to delete.
    pub(crate) author: Author,

    /// The books written by the author, which block its deletion.
    pub(crate) books: Vec<Book>,
}

impl Driver {
    /// Gets all authors sorted by family name and then by first name.
    pub(crate) async fn list_authors(self) -> DriverResult<Vec<Author>> {
        Ok(db::list_authors(&mut self.db.ex().await?).await?)
    }

    /// Gets the author identified by `id` along with the books they wrote.
    pub(crate) async fn get_author_detail(self, id: AuthorId) -> DriverResult<AuthorDetail> {
        let (author, books) = try_join!(
            async {
                db::get_author(&mut self.db.ex().await?, id).await.map_err(not_found("Author"))
            },
            async {
                Ok::<_, DriverError>(db::list_books_by_author(&mut self.db.ex().await?, id).await?)
            },
        )?;
        Ok(AuthorDetail { author, books })
    }

    /// Creates a new author from the submitted `fields`.
    pub(crate) async fn create_author(
        self,
        fields: AuthorFields,
    ) -> DriverResult<FormOutcome<AuthorForm>> {
        let (fields, validator) = fields.sanitize();
        if !validator.is_valid() {
            let violations = validator.into_violations();
            debug!("Rejected new author: {:?}", violations);
            return Ok(FormOutcome::Rejected(AuthorForm {
                title: "Create Author",
                fields,
                violations,
            }));
        }

        let author = fields.into_author(AuthorId::generate())?;
        db::create_author(&mut self.db.ex().await?, &author).await?;
        info!("Created author {} named '{}'", author.id(), author.name());
        Ok(FormOutcome::Saved(author.url()))
    }

    /// Gets the form to update the author identified by `id`, pre-filled with their current
    /// details.
    pub(crate) async fn author_update_form(self, id: AuthorId) -> DriverResult<AuthorForm> {
        let author =
            db::get_author(&mut self.db.ex().await?, id).await.map_err(not_found("Author"))?;
        Ok(AuthorForm {
            title: "Update Author",
            fields: AuthorFields::from_author(&author),
            violations: vec![],
        })
    }

    /// Replaces the details of the author identified by `id` with the submitted `fields`.
    pub(crate) async fn update_author(
        self,
        id: AuthorId,
        fields: AuthorFields,
    ) -> DriverResult<FormOutcome<AuthorForm>> {
        let (fields, validator) = fields.sanitize();
        if !validator.is_valid() {
            db::get_author(&mut self.db.ex().await?, id).await.map_err(not_found("Author"))?;
            let violations = validator.into_violations();
            debug!("Rejected update of author {}: {:?}", id, violations);
            return Ok(FormOutcome::Rejected(AuthorForm {
                title: "Update Author",
                fields,
                violations,
            }));
        }

        let author = fields.into_author(id)?;
        db::update_author(&mut self.db.ex().await?, &author)
            .await
            .map_err(not_found("Author"))?;
        info!("Updated author {} named '{}'", author.id(), author.name());
        Ok(FormOutcome::Saved(author.url()))
    }

    /// Gets the confirmation page to delete the author identified by `id`, or `None` if the
    /// author does not exist.
    pub(crate) async fn author_delete_page(self, id: AuthorId) -> DriverResult<Option<AuthorDelete>> {
        let (author, books) = try_join!(
            async {
                Ok::<_, DriverError>(optional(db::get_author(&mut self.db.ex().await?, id).await)?)
            },
            async {
                Ok::<_, DriverError>(db::list_books_by_author(&mut self.db.ex().await?, id).await?)
            },
        )?;
        Ok(author.map(|author| AuthorDelete { author, books }))
    }

    /// Deletes the author identified by `id` unless they still have books.
    pub(crate) async fn delete_author(
        self,
        id: AuthorId,
    ) -> DriverResult<DeleteOutcome<AuthorDelete>> {
        let mut tx = self.db.begin().await?;

        let author = match optional(db::get_author(tx.ex(), id).await)? {
            Some(author) => author,
            None => return Ok(DeleteOutcome::Gone),
        };
        let books = db::list_books_by_author(tx.ex(), id).await?;
        if !books.is_empty() {
            debug!("Refusing to delete author {} with {} books", id, books.len());
            return Ok(DeleteOutcome::Blocked(AuthorDelete { author, books }));
        }

        db::delete_author(tx.ex(), id).await?;
        tx.commit().await?;
        info!("Deleted author {} named '{}'", id, author.name());
        Ok(DeleteOutcome::Gone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use locallib_core::db::DbError;
    use time::macros::date;

    /// Returns a valid set of fields for an author.
    fn asimov_fields() -> AuthorFields {
        AuthorFields {
            first_name: "Isaac".to_owned(),
            family_name: "Asimov".to_owned(),
            date_of_birth: "1920-01-02".to_owned(),
            date_of_death: "1992-04-06".to_owned(),
        }
    }

    /// Extracts the form from an outcome that must have been rejected.
    fn rejected(outcome: FormOutcome<AuthorForm>) -> AuthorForm {
        match outcome {
            FormOutcome::Rejected(form) => form,
            FormOutcome::Saved(url) => panic!("Submission unexpectedly saved to {}", url),
        }
    }

    #[tokio::test]
    async fn test_list_authors() {
        let context = TestContext::setup().await;
        assert!(context.driver().list_authors().await.unwrap().is_empty());

        let mut ex = context.ex().await;
        let herbert = create_test_author(&mut ex, "Frank", "Herbert").await;
        let asimov = create_test_author(&mut ex, "Isaac", "Asimov").await;
        assert_eq!(vec![asimov, herbert], context.driver().list_authors().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_author_detail_ok() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let asimov = create_test_author(&mut ex, "Isaac", "Asimov").await;
        let herbert = create_test_author(&mut ex, "Frank", "Herbert").await;
        let robot = create_test_book(&mut ex, "I, Robot", &asimov, &[]).await;
        let foundation = create_test_book(&mut ex, "Foundation", &asimov, &[]).await;
        create_test_book(&mut ex, "Dune", &herbert, &[]).await;

        let detail = context.driver().get_author_detail(*asimov.id()).await.unwrap();
        assert_eq!(asimov, detail.author);
        assert_eq!(vec![foundation, robot], detail.books);
    }

    #[tokio::test]
    async fn test_get_author_detail_not_found() {
        let context = TestContext::setup().await;

        assert_eq!(
            DriverError::NotFound("Author not found".to_owned()),
            context.driver().get_author_detail(AuthorId::generate()).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_create_author_ok() {
        let context = TestContext::setup().await;

        let url = match context.driver().create_author(asimov_fields()).await.unwrap() {
            FormOutcome::Saved(url) => url,
            FormOutcome::Rejected(form) => panic!("Unexpected rejection: {:?}", form.violations),
        };

        let authors = db::list_authors(&mut context.ex().await).await.unwrap();
        assert_eq!(1, authors.len());
        let author = &authors[0];
        assert_eq!(author.url(), url);
        assert_eq!("Isaac", author.first_name());
        assert_eq!("Asimov", author.family_name());
        assert_eq!(&Some(date!(1920 - 01 - 02)), author.date_of_birth());
        assert_eq!(&Some(date!(1992 - 04 - 06)), author.date_of_death());
    }

    #[tokio::test]
    async fn test_create_author_without_dates() {
        let context = TestContext::setup().await;

        let fields = AuthorFields {
            first_name: " Ben ".to_owned(),
            family_name: "Bova".to_owned(),
            ..AuthorFields::default()
        };
        match context.driver().create_author(fields).await.unwrap() {
            FormOutcome::Saved(_) => (),
            FormOutcome::Rejected(form) => panic!("Unexpected rejection: {:?}", form.violations),
        }

        let authors = db::list_authors(&mut context.ex().await).await.unwrap();
        assert_eq!(1, authors.len());
        assert_eq!("Ben", authors[0].first_name());
        assert_eq!(&None, authors[0].date_of_birth());
        assert_eq!(&None, authors[0].date_of_death());
    }

    #[tokio::test]
    async fn test_create_author_invalid() {
        let context = TestContext::setup().await;

        let fields = AuthorFields {
            first_name: "".to_owned(),
            family_name: "O'Brien".to_owned(),
            date_of_birth: "yesterday".to_owned(),
            date_of_death: "1992-04-06".to_owned(),
        };
        let form = rejected(context.driver().create_author(fields).await.unwrap());

        assert_eq!("Create Author", form.title);
        assert_eq!(
            vec![
                Violation { field: "first_name", message: "First name must be specified." },
                Violation {
                    field: "family_name",
                    message: "Family name has non-alphanumeric characters."
                },
                Violation { field: "date_of_birth", message: "Invalid date of birth." },
            ],
            form.violations
        );
        assert_eq!("O&#x27;Brien", form.fields.family_name);
        assert_eq!(0, db::count_authors(&mut context.ex().await).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_author_too_long() {
        let context = TestContext::setup().await;

        let fields = AuthorFields { first_name: "a".repeat(101), ..asimov_fields() };
        let form = rejected(context.driver().create_author(fields).await.unwrap());

        assert_eq!(
            vec![Violation {
                field: "first_name",
                message: "First name must be at most 100 characters."
            }],
            form.violations
        );
    }

    #[tokio::test]
    async fn test_author_update_form() {
        let context = TestContext::setup().await;
        let author = Author::new(AuthorId::generate(), "Isaac", "Asimov")
            .with_date_of_birth(Some(date!(1920 - 01 - 02)));
        db::create_author(&mut context.ex().await, &author).await.unwrap();

        let form = context.driver().author_update_form(*author.id()).await.unwrap();
        assert_eq!("Update Author", form.title);
        assert_eq!(
            AuthorFields { date_of_death: "".to_owned(), ..asimov_fields() },
            form.fields
        );

        assert_eq!(
            DriverError::NotFound("Author not found".to_owned()),
            context.driver().author_update_form(AuthorId::generate()).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_update_author_ok() {
        let context = TestContext::setup().await;
        let author = create_test_author(&mut context.ex().await, "Isak", "Asimof").await;

        match context.driver().update_author(*author.id(), asimov_fields()).await.unwrap() {
            FormOutcome::Saved(url) => assert_eq!(author.url(), url),
            FormOutcome::Rejected(form) => panic!("Unexpected rejection: {:?}", form.violations),
        }

        let exp_author = Author::new(*author.id(), "Isaac", "Asimov")
            .with_date_of_birth(Some(date!(1920 - 01 - 02)))
            .with_date_of_death(Some(date!(1992 - 04 - 06)));
        assert_eq!(exp_author, db::get_author(&mut context.ex().await, *author.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_author_invalid_and_not_found() {
        let context = TestContext::setup().await;
        let author = create_test_author(&mut context.ex().await, "Isaac", "Asimov").await;

        let fields = AuthorFields { date_of_death: "soon".to_owned(), ..asimov_fields() };
        let form = rejected(context.driver().update_author(*author.id(), fields).await.unwrap());
        assert_eq!("Update Author", form.title);
        assert_eq!(
            vec![Violation { field: "date_of_death", message: "Invalid date of death." }],
            form.violations
        );

        assert_eq!(
            DriverError::NotFound("Author not found".to_owned()),
            context.driver().update_author(AuthorId::generate(), asimov_fields()).await.unwrap_err()
        );
        assert_eq!(
            DriverError::NotFound("Author not found".to_owned()),
            context
                .driver()
                .update_author(AuthorId::generate(), AuthorFields::default())
                .await
                .unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_author_delete_page() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let author = create_test_author(&mut ex, "Isaac", "Asimov").await;
        let book = create_test_book(&mut ex, "Foundation", &author, &[]).await;

        let page = context.driver().author_delete_page(*author.id()).await.unwrap().unwrap();
        assert_eq!(author, page.author);
        assert_eq!(vec![book], page.books);

        assert!(context.driver().author_delete_page(AuthorId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_author_ok() {
        let context = TestContext::setup().await;
        let author = create_test_author(&mut context.ex().await, "Isaac", "Asimov").await;

        match context.driver().delete_author(*author.id()).await.unwrap() {
            DeleteOutcome::Gone => (),
            DeleteOutcome::Blocked(page) => panic!("Unexpectedly blocked: {:?}", page),
        }
        assert_eq!(
            DbError::NotFound,
            db::get_author(&mut context.ex().await, *author.id()).await.unwrap_err()
        );

        match context.driver().delete_author(*author.id()).await.unwrap() {
            DeleteOutcome::Gone => (),
            DeleteOutcome::Blocked(page) => panic!("Unexpectedly blocked: {:?}", page),
        }
    }

    #[tokio::test]
    async fn test_delete_author_blocked_by_books() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let author = create_test_author(&mut ex, "Isaac", "Asimov").await;
        let book = create_test_book(&mut ex, "Foundation", &author, &[]).await;

        let page = match context.driver().delete_author(*author.id()).await.unwrap() {
            DeleteOutcome::Gone => panic!("Author with books was deleted"),
            DeleteOutcome::Blocked(page) => page,
        };
        assert_eq!(vec![book], page.books);
        assert_eq!(author, db::get_author(&mut ex, *author.id()).await.unwrap());
    }
}
