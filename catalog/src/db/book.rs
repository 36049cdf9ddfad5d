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

//! Database operations on books and their genres.

use crate::db::deletion_error;
use crate::model::{AuthorId, Book, BookId, GenreId};
#[cfg(feature = "postgres")]
use locallib_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use locallib_core::db::sqlite;
use locallib_core::db::{count_to_u64, DbError, DbResult, Executor};
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// Builds a book from a row of the `books` table.  The genres of the book live in a separate
/// table so the returned book has none.
#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Book {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(postgres::map_sqlx_error)?;
        let author_id: Uuid = row.try_get("author_id").map_err(postgres::map_sqlx_error)?;
        let summary: String = row.try_get("summary").map_err(postgres::map_sqlx_error)?;
        let isbn: String = row.try_get("isbn").map_err(postgres::map_sqlx_error)?;

        Ok(Book::new(
            BookId::from(id),
            title,
            AuthorId::from(author_id),
            summary,
            isbn,
            BTreeSet::new(),
        ))
    }
}

/// Builds a book from a row of the `books` table.  The genres of the book live in a separate
/// table so the returned book has none.
#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Book {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(sqlite::map_sqlx_error)?;
        let author_id: Uuid = row.try_get("author_id").map_err(sqlite::map_sqlx_error)?;
        let summary: String = row.try_get("summary").map_err(sqlite::map_sqlx_error)?;
        let isbn: String = row.try_get("isbn").map_err(sqlite::map_sqlx_error)?;

        Ok(Book::new(
            BookId::from(id),
            title,
            AuthorId::from(author_id),
            summary,
            isbn,
            BTreeSet::new(),
        ))
    }
}

/// Gets the genres of all books, keyed by book.
async fn get_all_book_genres(ex: &mut Executor) -> DbResult<HashMap<BookId, BTreeSet<GenreId>>> {
    let query_str = "SELECT book_id, genre_id FROM book_genres";
    let pairs: Vec<(Uuid, Uuid)> = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            let mut pairs = Vec::with_capacity(rows.len());
            for row in rows {
                let book_id: Uuid = row.try_get("book_id").map_err(postgres::map_sqlx_error)?;
                let genre_id: Uuid = row.try_get("genre_id").map_err(postgres::map_sqlx_error)?;
                pairs.push((book_id, genre_id));
            }
            pairs
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows =
                sqlx::query(query_str).fetch_all(ex.conn()).await.map_err(sqlite::map_sqlx_error)?;
            let mut pairs = Vec::with_capacity(rows.len());
            for row in rows {
                let book_id: Uuid = row.try_get("book_id").map_err(sqlite::map_sqlx_error)?;
                let genre_id: Uuid = row.try_get("genre_id").map_err(sqlite::map_sqlx_error)?;
                pairs.push((book_id, genre_id));
            }
            pairs
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    let mut genres: HashMap<BookId, BTreeSet<GenreId>> = HashMap::default();
    for (book_id, genre_id) in pairs {
        genres.entry(BookId::from(book_id)).or_default().insert(GenreId::from(genre_id));
    }
    Ok(genres)
}

/// Gets the genres of the book identified by `id`.
async fn get_book_genres(ex: &mut Executor, id: BookId) -> DbResult<BTreeSet<GenreId>> {
    let ids: Vec<Uuid> = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT genre_id FROM book_genres WHERE book_id = $1";
            let rows = sqlx::query(query_str)
                .bind(id.as_uuid())
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.iter()
                .map(|row| row.try_get("genre_id"))
                .collect::<Result<Vec<Uuid>, sqlx::Error>>()
                .map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT genre_id FROM book_genres WHERE book_id = ?";
            let rows = sqlx::query(query_str)
                .bind(id.as_uuid())
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.iter()
                .map(|row| row.try_get("genre_id"))
                .collect::<Result<Vec<Uuid>, sqlx::Error>>()
                .map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(ids.into_iter().map(GenreId::from).collect())
}

/// Fills in the genres of all `books`.
async fn attach_genres(ex: &mut Executor, books: Vec<Book>) -> DbResult<Vec<Book>> {
    if books.is_empty() {
        return Ok(books);
    }
    let mut genres = get_all_book_genres(ex).await?;
    Ok(books
        .into_iter()
        .map(|book| {
            let book_genres = genres.remove(book.id()).unwrap_or_default();
            book.with_genres(book_genres)
        })
        .collect())
}

/// Records `book` as belonging to each of its genres.
async fn insert_book_genres(ex: &mut Executor, book: &Book) -> DbResult<()> {
    for genre in book.genres() {
        match ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                let query_str = "INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)";
                sqlx::query(query_str)
                    .bind(book.id().as_uuid())
                    .bind(genre.as_uuid())
                    .execute(ex.conn())
                    .await
                    .map_err(postgres::map_sqlx_error)?;
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(ex) => {
                let query_str = "INSERT INTO book_genres (book_id, genre_id) VALUES (?, ?)";
                sqlx::query(query_str)
                    .bind(book.id().as_uuid())
                    .bind(genre.as_uuid())
                    .execute(ex.conn())
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
    }
    Ok(())
}

/// Counts all books.
pub(crate) async fn count_books(ex: &mut Executor) -> DbResult<u64> {
    let query_str = "SELECT COUNT(*) AS count FROM books";
    let count: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let row = sqlx::query(query_str)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("count").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let row =
                sqlx::query(query_str).fetch_one(ex.conn()).await.map_err(sqlite::map_sqlx_error)?;
            row.try_get("count").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    count_to_u64(count)
}

/// Gets all books sorted by title.
pub(crate) async fn list_books(ex: &mut Executor) -> DbResult<Vec<Book>> {
    let query_str = "SELECT * FROM books ORDER BY title";
    let books = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Book::try_from).collect::<DbResult<Vec<Book>>>()?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows =
                sqlx::query(query_str).fetch_all(ex.conn()).await.map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Book::try_from).collect::<DbResult<Vec<Book>>>()?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    attach_genres(ex, books).await
}

/// Gets all books written by `author` sorted by title.
pub(crate) async fn list_books_by_author(
    ex: &mut Executor,
    author: AuthorId,
) -> DbResult<Vec<Book>> {
    let books = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM books WHERE author_id = $1 ORDER BY title";
            let rows = sqlx::query(query_str)
                .bind(author.as_uuid())
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Book::try_from).collect::<DbResult<Vec<Book>>>()?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM books WHERE author_id = ? ORDER BY title";
            let rows = sqlx::query(query_str)
                .bind(author.as_uuid())
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Book::try_from).collect::<DbResult<Vec<Book>>>()?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    attach_genres(ex, books).await
}

/// Gets all books that belong to `genre` sorted by title.
pub(crate) async fn list_books_by_genre(ex: &mut Executor, genre: GenreId) -> DbResult<Vec<Book>> {
    let books = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT books.* FROM books
                JOIN book_genres ON book_genres.book_id = books.id
                WHERE book_genres.genre_id = $1
                ORDER BY books.title
            ";
            let rows = sqlx::query(query_str)
                .bind(genre.as_uuid())
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Book::try_from).collect::<DbResult<Vec<Book>>>()?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT books.* FROM books
                JOIN book_genres ON book_genres.book_id = books.id
                WHERE book_genres.genre_id = ?
                ORDER BY books.title
            ";
            let rows = sqlx::query(query_str)
                .bind(genre.as_uuid())
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Book::try_from).collect::<DbResult<Vec<Book>>>()?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    attach_genres(ex, books).await
}

/// Gets the book identified by `id`, including its genres.
pub(crate) async fn get_book(ex: &mut Executor, id: BookId) -> DbResult<Book> {
    let book = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM books WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id.as_uuid())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Book::try_from(row)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM books WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.as_uuid())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Book::try_from(row)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    let genres = get_book_genres(ex, id).await?;
    Ok(book.with_genres(genres))
}

/// Inserts a new `book` along with its genres.
///
/// This issues more than one statement so it should run within a transaction.
pub(crate) async fn create_book(ex: &mut Executor, book: &Book) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO books (id, title, author_id, summary, isbn)
                VALUES ($1, $2, $3, $4, $5)
            ";
            sqlx::query(query_str)
                .bind(book.id().as_uuid())
                .bind(book.title())
                .bind(book.author().as_uuid())
                .bind(book.summary())
                .bind(book.isbn())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO books (id, title, author_id, summary, isbn)
                VALUES (?, ?, ?, ?, ?)
            ";
            sqlx::query(query_str)
                .bind(book.id().as_uuid())
                .bind(book.title())
                .bind(book.author().as_uuid())
                .bind(book.summary())
                .bind(book.isbn())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    insert_book_genres(ex, book).await
}

/// Replaces the details and the genres of the existing book with the same identifier as `book`.
///
/// This issues more than one statement so it should run within a transaction.
pub(crate) async fn update_book(ex: &mut Executor, book: &Book) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE books SET title = $1, author_id = $2, summary = $3, isbn = $4
                WHERE id = $5
            ";
            let done = sqlx::query(query_str)
                .bind(book.title())
                .bind(book.author().as_uuid())
                .bind(book.summary())
                .bind(book.isbn())
                .bind(book.id().as_uuid())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            if done.rows_affected() == 1 {
                let query_str = "DELETE FROM book_genres WHERE book_id = $1";
                sqlx::query(query_str)
                    .bind(book.id().as_uuid())
                    .execute(ex.conn())
                    .await
                    .map_err(postgres::map_sqlx_error)?;
            }
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE books SET title = ?, author_id = ?, summary = ?, isbn = ?
                WHERE id = ?
            ";
            let done = sqlx::query(query_str)
                .bind(book.title())
                .bind(book.author().as_uuid())
                .bind(book.summary())
                .bind(book.isbn())
                .bind(book.id().as_uuid())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            if done.rows_affected() == 1 {
                let query_str = "DELETE FROM book_genres WHERE book_id = ?";
                sqlx::query(query_str)
                    .bind(book.id().as_uuid())
                    .execute(ex.conn())
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
            }
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => insert_book_genres(ex, book).await,
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Deletes the book identified by `id` along with its genre memberships.
pub(crate) async fn delete_book(ex: &mut Executor, id: BookId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM books WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id.as_uuid())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)
                .map_err(deletion_error("book"))?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM books WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id.as_uuid())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)
                .map_err(deletion_error("book"))?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
    }
}
