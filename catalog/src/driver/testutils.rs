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

//! Test utilities for the business logic.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use locallib_core::db::{Db, Executor};
use std::sync::Arc;

/// Creates an author named `first_name family_name` directly in the database.
pub(crate) async fn create_test_author(
    ex: &mut Executor,
    first_name: &str,
    family_name: &str,
) -> Author {
    let author = Author::new(AuthorId::generate(), first_name, family_name);
    db::create_author(ex, &author).await.unwrap();
    author
}

/// Creates a genre called `name` directly in the database.
pub(crate) async fn create_test_genre(ex: &mut Executor, name: &str) -> Genre {
    let genre = Genre::new(GenreId::generate(), name.to_owned());
    db::create_genre(ex, &genre).await.unwrap();
    genre
}

/// Creates a book titled `title` directly in the database.
pub(crate) async fn create_test_book(
    ex: &mut Executor,
    title: &str,
    author: &Author,
    genres: &[&Genre],
) -> Book {
    let book = Book::new(
        BookId::generate(),
        title.to_owned(),
        *author.id(),
        format!("Summary of {}", title),
        "9780441013593".to_owned(),
        genres.iter().map(|genre| *genre.id()).collect(),
    );
    db::create_book(ex, &book).await.unwrap();
    book
}

/// Creates a copy of `book` directly in the database.
pub(crate) async fn create_test_instance(
    ex: &mut Executor,
    book: &Book,
    imprint: &str,
    status: BookInstanceStatus,
) -> BookInstance {
    let instance =
        BookInstance::new(BookInstanceId::generate(), *book.id(), imprint.to_owned(), status, None);
    db::create_instance(ex, &instance).await.unwrap();
    instance
}

/// State of a running test.
pub(crate) struct TestContext {
    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database.
    pub(crate) async fn setup() -> Self {
        let db = Arc::from(locallib_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        Self { driver: Driver::new(db) }
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.driver.db.ex().await.unwrap()
    }

    /// Gets a copy of the driver in this test context.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }
}
