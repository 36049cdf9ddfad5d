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

//! Common tests for any database implementation.

use crate::db::*;
use crate::model::*;
use locallib_core::db::{Db, DbError, Executor};
use std::collections::BTreeSet;
use time::macros::date;

/// Creates an author with the given names and no dates.
async fn make_author(ex: &mut Executor, first_name: &str, family_name: &str) -> Author {
    let author = Author::new(AuthorId::generate(), first_name, family_name);
    create_author(ex, &author).await.unwrap();
    author
}

/// Creates a genre with the given `name`.
async fn make_genre(ex: &mut Executor, name: &str) -> Genre {
    let genre = Genre::new(GenreId::generate(), name.to_owned());
    create_genre(ex, &genre).await.unwrap();
    genre
}

/// Creates a book titled `title` written by `author` and belonging to `genres`.
async fn make_book(ex: &mut Executor, title: &str, author: &Author, genres: &[&Genre]) -> Book {
    let book = Book::new(
        BookId::generate(),
        title.to_owned(),
        *author.id(),
        format!("Summary of {}", title),
        format!("isbn-{}", title.len()),
        genres.iter().map(|g| *g.id()).collect(),
    );
    create_book(ex, &book).await.unwrap();
    book
}

/// Creates a copy of `book` with the given `imprint` and `status`.
async fn make_instance(
    ex: &mut Executor,
    book: &Book,
    imprint: &str,
    status: BookInstanceStatus,
) -> BookInstance {
    let instance =
        BookInstance::new(BookInstanceId::generate(), *book.id(), imprint.to_owned(), status, None);
    create_instance(ex, &instance).await.unwrap();
    instance
}

pub(crate) async fn test_init_schema_is_idempotent(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();
    let author = make_author(&mut ex, "Isaac", "Asimov").await;

    init_schema(&mut ex).await.unwrap();

    assert_eq!(vec![author], list_authors(&mut ex).await.unwrap());
}

pub(crate) async fn test_authors_empty(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();
    assert_eq!(0, count_authors(&mut ex).await.unwrap());
    assert!(list_authors(&mut ex).await.unwrap().is_empty());
}

pub(crate) async fn test_authors_ok(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let author1 = Author::new(AuthorId::generate(), "Isaac", "Asimov")
        .with_date_of_birth(Some(date!(1920 - 01 - 02)))
        .with_date_of_death(Some(date!(1992 - 04 - 06)));
    create_author(&mut ex, &author1).await.unwrap();
    let author2 = make_author(&mut ex, "Ben", "Bova").await;
    let author3 = make_author(&mut ex, "Anne", "Asimov").await;

    assert_eq!(3, count_authors(&mut ex).await.unwrap());
    assert_eq!(
        vec![author3.clone(), author1.clone(), author2.clone()],
        list_authors(&mut ex).await.unwrap()
    );
    assert_eq!(author1, get_author(&mut ex, *author1.id()).await.unwrap());
}

pub(crate) async fn test_authors_update_and_delete(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let author = make_author(&mut ex, "Isaac", "Asimov").await;
    let other = make_author(&mut ex, "Ben", "Bova").await;

    let updated = Author::new(*author.id(), "Isaac", "Azimov")
        .with_date_of_birth(Some(date!(1920 - 01 - 02)));
    update_author(&mut ex, &updated).await.unwrap();
    assert_eq!(updated, get_author(&mut ex, *author.id()).await.unwrap());

    delete_author(&mut ex, *author.id()).await.unwrap();
    assert_eq!(DbError::NotFound, get_author(&mut ex, *author.id()).await.unwrap_err());
    assert_eq!(vec![other], list_authors(&mut ex).await.unwrap());
}

pub(crate) async fn test_authors_not_found(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let missing = Author::new(AuthorId::generate(), "Nobody", "Atall");
    assert_eq!(DbError::NotFound, get_author(&mut ex, *missing.id()).await.unwrap_err());
    assert_eq!(DbError::NotFound, update_author(&mut ex, &missing).await.unwrap_err());
    assert_eq!(DbError::NotFound, delete_author(&mut ex, *missing.id()).await.unwrap_err());
}

pub(crate) async fn test_authors_delete_referenced(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let author = make_author(&mut ex, "Isaac", "Asimov").await;
    make_book(&mut ex, "Foundation", &author, &[]).await;

    match delete_author(&mut ex, *author.id()).await {
        Err(DbError::DataIntegrityError(msg)) => assert!(msg.contains("author")),
        e => panic!("{:?}", e),
    }
    assert_eq!(author, get_author(&mut ex, *author.id()).await.unwrap());
}

pub(crate) async fn test_genres_ok(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let genre1 = make_genre(&mut ex, "Science Fiction").await;
    let genre2 = make_genre(&mut ex, "Fantasy").await;

    assert_eq!(2, count_genres(&mut ex).await.unwrap());
    assert_eq!(vec![genre2.clone(), genre1.clone()], list_genres(&mut ex).await.unwrap());
    assert_eq!(genre1, get_genre(&mut ex, *genre1.id()).await.unwrap());
    assert_eq!(DbError::NotFound, get_genre(&mut ex, GenreId::generate()).await.unwrap_err());
}

pub(crate) async fn test_genres_get_by_name(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let genre = make_genre(&mut ex, "Science Fiction").await;

    assert_eq!(Some(genre.clone()), get_genre_by_name(&mut ex, "Science Fiction").await.unwrap());
    assert_eq!(Some(genre), get_genre_by_name(&mut ex, "science FICTION").await.unwrap());
    assert_eq!(None, get_genre_by_name(&mut ex, "Science").await.unwrap());

    let genre = make_genre(&mut ex, "Ñandú Tales").await;
    assert_eq!(Some(genre), get_genre_by_name(&mut ex, "ñandú tales").await.unwrap());
}

pub(crate) async fn test_genres_update_and_delete(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let genre = make_genre(&mut ex, "Fantasy").await;

    let renamed = Genre::new(*genre.id(), "High Fantasy".to_owned());
    update_genre(&mut ex, &renamed).await.unwrap();
    assert_eq!(renamed, get_genre(&mut ex, *genre.id()).await.unwrap());

    delete_genre(&mut ex, *genre.id()).await.unwrap();
    assert_eq!(DbError::NotFound, delete_genre(&mut ex, *genre.id()).await.unwrap_err());
    assert_eq!(DbError::NotFound, update_genre(&mut ex, &renamed).await.unwrap_err());
}

pub(crate) async fn test_genres_delete_referenced(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let author = make_author(&mut ex, "Isaac", "Asimov").await;
    let genre = make_genre(&mut ex, "Science Fiction").await;
    make_book(&mut ex, "Foundation", &author, &[&genre]).await;

    match delete_genre(&mut ex, *genre.id()).await {
        Err(DbError::DataIntegrityError(msg)) => assert!(msg.contains("genre")),
        e => panic!("{:?}", e),
    }
}

pub(crate) async fn test_books_ok(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let author1 = make_author(&mut ex, "Isaac", "Asimov").await;
    let author2 = make_author(&mut ex, "Frank", "Herbert").await;
    let genre1 = make_genre(&mut ex, "Science Fiction").await;
    let genre2 = make_genre(&mut ex, "Classics").await;

    let book1 = make_book(&mut ex, "Foundation", &author1, &[&genre1]).await;
    let book2 = make_book(&mut ex, "Dune", &author2, &[&genre1, &genre2]).await;
    let book3 = make_book(&mut ex, "I, Robot", &author1, &[]).await;

    assert_eq!(3, count_books(&mut ex).await.unwrap());
    assert_eq!(
        vec![book2.clone(), book1.clone(), book3.clone()],
        list_books(&mut ex).await.unwrap()
    );
    assert_eq!(book2, get_book(&mut ex, *book2.id()).await.unwrap());
    assert_eq!(book3, get_book(&mut ex, *book3.id()).await.unwrap());

    assert_eq!(
        vec![book1.clone(), book3.clone()],
        list_books_by_author(&mut ex, *author1.id()).await.unwrap()
    );
    assert_eq!(
        vec![book2.clone(), book1.clone()],
        list_books_by_genre(&mut ex, *genre1.id()).await.unwrap()
    );
    assert_eq!(vec![book2.clone()], list_books_by_genre(&mut ex, *genre2.id()).await.unwrap());

    assert_eq!(
        vec![genre2.clone(), genre1.clone()],
        list_genres_by_book(&mut ex, *book2.id()).await.unwrap()
    );
    assert!(list_genres_by_book(&mut ex, *book3.id()).await.unwrap().is_empty());
}

pub(crate) async fn test_books_empty(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let author = make_author(&mut ex, "Isaac", "Asimov").await;

    assert_eq!(0, count_books(&mut ex).await.unwrap());
    assert!(list_books(&mut ex).await.unwrap().is_empty());
    assert!(list_books_by_author(&mut ex, *author.id()).await.unwrap().is_empty());
    assert_eq!(DbError::NotFound, get_book(&mut ex, BookId::generate()).await.unwrap_err());
}

pub(crate) async fn test_books_missing_references(db: Box<dyn Db>) {
    let author = make_author(&mut db.ex().await.unwrap(), "Isaac", "Asimov").await;

    let mut tx = db.begin().await.unwrap();
    let book = Book::new(
        BookId::generate(),
        "Foundation".to_owned(),
        AuthorId::generate(),
        "".to_owned(),
        "".to_owned(),
        BTreeSet::new(),
    );
    assert_eq!(DbError::NotFound, create_book(tx.ex(), &book).await.unwrap_err());
    drop(tx);

    let mut tx = db.begin().await.unwrap();
    let book = Book::new(
        BookId::generate(),
        "Foundation".to_owned(),
        *author.id(),
        "".to_owned(),
        "".to_owned(),
        BTreeSet::from([GenreId::generate()]),
    );
    assert_eq!(DbError::NotFound, create_book(tx.ex(), &book).await.unwrap_err());
    drop(tx);

    assert_eq!(0, count_books(&mut db.ex().await.unwrap()).await.unwrap());
}

pub(crate) async fn test_books_update(db: Box<dyn Db>) {
    let mut tx = db.begin().await.unwrap();

    let author1 = make_author(tx.ex(), "Isaac", "Asimov").await;
    let author2 = make_author(tx.ex(), "Frank", "Herbert").await;
    let genre1 = make_genre(tx.ex(), "Science Fiction").await;
    let genre2 = make_genre(tx.ex(), "Classics").await;
    let book = make_book(tx.ex(), "Dune", &author1, &[&genre1]).await;

    let updated = Book::new(
        *book.id(),
        "Dune Messiah".to_owned(),
        *author2.id(),
        "Sequel".to_owned(),
        "9780593098233".to_owned(),
        BTreeSet::from([*genre2.id()]),
    );
    update_book(tx.ex(), &updated).await.unwrap();
    tx.commit().await.unwrap();

    let mut ex = db.ex().await.unwrap();
    assert_eq!(updated, get_book(&mut ex, *book.id()).await.unwrap());
    assert!(list_books_by_genre(&mut ex, *genre1.id()).await.unwrap().is_empty());

    let missing = Book::new(
        BookId::generate(),
        "Dune".to_owned(),
        *author1.id(),
        "".to_owned(),
        "".to_owned(),
        BTreeSet::new(),
    );
    assert_eq!(DbError::NotFound, update_book(&mut ex, &missing).await.unwrap_err());
}

pub(crate) async fn test_books_delete(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let author = make_author(&mut ex, "Frank", "Herbert").await;
    let genre = make_genre(&mut ex, "Science Fiction").await;
    let book = make_book(&mut ex, "Dune", &author, &[&genre]).await;

    delete_book(&mut ex, *book.id()).await.unwrap();
    assert_eq!(DbError::NotFound, get_book(&mut ex, *book.id()).await.unwrap_err());
    assert_eq!(DbError::NotFound, delete_book(&mut ex, *book.id()).await.unwrap_err());

    // Genre memberships go away with the book so the genre is free to go too.
    delete_genre(&mut ex, *genre.id()).await.unwrap();
    delete_author(&mut ex, *author.id()).await.unwrap();
}

pub(crate) async fn test_books_delete_referenced(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let author = make_author(&mut ex, "Frank", "Herbert").await;
    let book = make_book(&mut ex, "Dune", &author, &[]).await;
    make_instance(&mut ex, &book, "Ace, 1990", BookInstanceStatus::Available).await;

    match delete_book(&mut ex, *book.id()).await {
        Err(DbError::DataIntegrityError(msg)) => assert!(msg.contains("book")),
        e => panic!("{:?}", e),
    }
    assert_eq!(book, get_book(&mut ex, *book.id()).await.unwrap());
}

pub(crate) async fn test_instances_ok(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let author = make_author(&mut ex, "Frank", "Herbert").await;
    let book1 = make_book(&mut ex, "Dune", &author, &[]).await;
    let book2 = make_book(&mut ex, "Children of Dune", &author, &[]).await;

    let instance1 = BookInstance::new(
        BookInstanceId::generate(),
        *book1.id(),
        "Ace, 1990".to_owned(),
        BookInstanceStatus::Loaned,
        Some(date!(2024 - 03 - 15)),
    );
    create_instance(&mut ex, &instance1).await.unwrap();
    let instance2 = make_instance(&mut ex, &book1, "Ace, 1965", BookInstanceStatus::Available).await;
    let instance3 = make_instance(&mut ex, &book2, "Putnam, 1976", BookInstanceStatus::Available).await;

    assert_eq!(3, count_instances(&mut ex).await.unwrap());
    assert_eq!(
        2,
        count_instances_by_status(&mut ex, BookInstanceStatus::Available).await.unwrap()
    );
    assert_eq!(1, count_instances_by_status(&mut ex, BookInstanceStatus::Loaned).await.unwrap());
    assert_eq!(
        0,
        count_instances_by_status(&mut ex, BookInstanceStatus::Reserved).await.unwrap()
    );

    assert_eq!(
        vec![instance3.clone(), instance2.clone(), instance1.clone()],
        list_instances(&mut ex).await.unwrap()
    );
    assert_eq!(
        vec![instance2.clone(), instance1.clone()],
        list_instances_by_book(&mut ex, *book1.id()).await.unwrap()
    );
    assert_eq!(instance1, get_instance(&mut ex, *instance1.id()).await.unwrap());
}

pub(crate) async fn test_instances_empty(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    assert_eq!(0, count_instances(&mut ex).await.unwrap());
    assert!(list_instances(&mut ex).await.unwrap().is_empty());
    assert_eq!(
        DbError::NotFound,
        get_instance(&mut ex, BookInstanceId::generate()).await.unwrap_err()
    );
}

pub(crate) async fn test_instances_update_and_delete(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let author = make_author(&mut ex, "Frank", "Herbert").await;
    let book1 = make_book(&mut ex, "Dune", &author, &[]).await;
    let book2 = make_book(&mut ex, "Children of Dune", &author, &[]).await;
    let instance = make_instance(&mut ex, &book1, "Ace, 1990", BookInstanceStatus::Available).await;

    let updated = BookInstance::new(
        *instance.id(),
        *book2.id(),
        "Putnam, 1976".to_owned(),
        BookInstanceStatus::Reserved,
        Some(date!(2024 - 01 - 31)),
    );
    update_instance(&mut ex, &updated).await.unwrap();
    assert_eq!(updated, get_instance(&mut ex, *instance.id()).await.unwrap());
    assert!(list_instances_by_book(&mut ex, *book1.id()).await.unwrap().is_empty());

    let dangling = BookInstance::new(
        *instance.id(),
        BookId::generate(),
        "Putnam, 1976".to_owned(),
        BookInstanceStatus::Reserved,
        None,
    );
    assert_eq!(DbError::NotFound, update_instance(&mut ex, &dangling).await.unwrap_err());

    delete_instance(&mut ex, *instance.id()).await.unwrap();
    assert_eq!(DbError::NotFound, delete_instance(&mut ex, *instance.id()).await.unwrap_err());

    // With no copies left, the book can go away.
    delete_book(&mut ex, *book2.id()).await.unwrap();
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        locallib_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_init_schema_is_idempotent,
            test_authors_empty,
            test_authors_ok,
            test_authors_update_and_delete,
            test_authors_not_found,
            test_authors_delete_referenced,
            test_genres_ok,
            test_genres_get_by_name,
            test_genres_update_and_delete,
            test_genres_delete_referenced,
            test_books_ok,
            test_books_empty,
            test_books_missing_references,
            test_books_update,
            test_books_delete,
            test_books_delete_referenced,
            test_instances_ok,
            test_instances_empty,
            test_instances_update_and_delete
        );
    }
];

mod sqlite {
    use super::*;

    /// Initializes an in-memory SQLite database with the catalog schema.
    async fn setup() -> Box<dyn Db> {
        let db = locallib_core::db::sqlite::testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        Box::from(db)
    }

    generate_db_tests!(setup().await);
}

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;

    /// Connects to the test PostgreSQL database and creates the catalog schema in `pg_temp`.
    async fn setup() -> Box<dyn Db> {
        let db = locallib_core::db::postgres::testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        Box::from(db)
    }

    generate_db_tests!(
        setup().await,
        #[ignore = "Requires environment configuration and is expensive"]
    );
}
