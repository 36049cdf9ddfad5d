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

//! Database operations on genres.

use crate::db::deletion_error;
use crate::model::{BookId, Genre, GenreId};
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
use uuid::Uuid;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Genre {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        Ok(Genre::new(GenreId::from(id), name))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Genre {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        Ok(Genre::new(GenreId::from(id), name))
    }
}

/// Counts all genres.
pub(crate) async fn count_genres(ex: &mut Executor) -> DbResult<u64> {
    let query_str = "SELECT COUNT(*) AS count FROM genres";
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

/// Gets all genres sorted by name.
pub(crate) async fn list_genres(ex: &mut Executor) -> DbResult<Vec<Genre>> {
    let query_str = "SELECT * FROM genres ORDER BY name";
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Genre::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows =
                sqlx::query(query_str).fetch_all(ex.conn()).await.map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Genre::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the genres that `book` belongs to, sorted by name.
pub(crate) async fn list_genres_by_book(ex: &mut Executor, book: BookId) -> DbResult<Vec<Genre>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT genres.* FROM genres
                JOIN book_genres ON book_genres.genre_id = genres.id
                WHERE book_genres.book_id = $1
                ORDER BY genres.name
            ";
            let rows = sqlx::query(query_str)
                .bind(book.as_uuid())
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Genre::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT genres.* FROM genres
                JOIN book_genres ON book_genres.genre_id = genres.id
                WHERE book_genres.book_id = ?
                ORDER BY genres.name
            ";
            let rows = sqlx::query(query_str)
                .bind(book.as_uuid())
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Genre::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the genre identified by `id`.
pub(crate) async fn get_genre(ex: &mut Executor, id: GenreId) -> DbResult<Genre> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM genres WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id.as_uuid())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Genre::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM genres WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.as_uuid())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Genre::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the genre whose name matches `name` ignoring case, if any.
///
/// The comparison happens here instead of in SQL because SQLite's `LOWER` only folds ASCII.
pub(crate) async fn get_genre_by_name(ex: &mut Executor, name: &str) -> DbResult<Option<Genre>> {
    let name = name.to_lowercase();
    let genres = list_genres(ex).await?;
    Ok(genres.into_iter().find(|genre| genre.name().to_lowercase() == name))
}

/// Inserts a new `genre`.
pub(crate) async fn create_genre(ex: &mut Executor, genre: &Genre) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "INSERT INTO genres (id, name) VALUES ($1, $2)";
            sqlx::query(query_str)
                .bind(genre.id().as_uuid())
                .bind(genre.name())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO genres (id, name) VALUES (?, ?)";
            sqlx::query(query_str)
                .bind(genre.id().as_uuid())
                .bind(genre.name())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(())
}

/// Renames the existing genre with the same identifier as `genre`.
pub(crate) async fn update_genre(ex: &mut Executor, genre: &Genre) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE genres SET name = $1 WHERE id = $2";
            let done = sqlx::query(query_str)
                .bind(genre.name())
                .bind(genre.id().as_uuid())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE genres SET name = ? WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(genre.name())
                .bind(genre.id().as_uuid())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Deletes the genre identified by `id`.
pub(crate) async fn delete_genre(ex: &mut Executor, id: GenreId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM genres WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id.as_uuid())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)
                .map_err(deletion_error("genre"))?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM genres WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id.as_uuid())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)
                .map_err(deletion_error("genre"))?;
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
