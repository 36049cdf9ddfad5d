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

//! Database operations on authors.

use crate::db::deletion_error;
use crate::model::{Author, AuthorId};
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
use time::Date;
use uuid::Uuid;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Author {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(postgres::map_sqlx_error)?;
        let family_name: String = row.try_get("family_name").map_err(postgres::map_sqlx_error)?;
        let date_of_birth: Option<Date> =
            row.try_get("date_of_birth").map_err(postgres::map_sqlx_error)?;
        let date_of_death: Option<Date> =
            row.try_get("date_of_death").map_err(postgres::map_sqlx_error)?;

        Ok(Author::new(AuthorId::from(id), first_name, family_name)
            .with_date_of_birth(date_of_birth)
            .with_date_of_death(date_of_death))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Author {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(sqlite::map_sqlx_error)?;
        let family_name: String = row.try_get("family_name").map_err(sqlite::map_sqlx_error)?;
        let date_of_birth: Option<Date> =
            row.try_get("date_of_birth").map_err(sqlite::map_sqlx_error)?;
        let date_of_death: Option<Date> =
            row.try_get("date_of_death").map_err(sqlite::map_sqlx_error)?;

        Ok(Author::new(AuthorId::from(id), first_name, family_name)
            .with_date_of_birth(date_of_birth)
            .with_date_of_death(date_of_death))
    }
}

/// Counts all authors.
pub(crate) async fn count_authors(ex: &mut Executor) -> DbResult<u64> {
    let query_str = "SELECT COUNT(*) AS count FROM authors";
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

/// Gets all authors sorted by family name and then by first name.
pub(crate) async fn list_authors(ex: &mut Executor) -> DbResult<Vec<Author>> {
    let query_str = "SELECT * FROM authors ORDER BY family_name, first_name";
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Author::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows =
                sqlx::query(query_str).fetch_all(ex.conn()).await.map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Author::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the author identified by `id`.
pub(crate) async fn get_author(ex: &mut Executor, id: AuthorId) -> DbResult<Author> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM authors WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id.as_uuid())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Author::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM authors WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.as_uuid())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Author::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Inserts a new `author`.
pub(crate) async fn create_author(ex: &mut Executor, author: &Author) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO authors (id, first_name, family_name, date_of_birth, date_of_death)
                VALUES ($1, $2, $3, $4, $5)
            ";
            sqlx::query(query_str)
                .bind(author.id().as_uuid())
                .bind(author.first_name())
                .bind(author.family_name())
                .bind(author.date_of_birth())
                .bind(author.date_of_death())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO authors (id, first_name, family_name, date_of_birth, date_of_death)
                VALUES (?, ?, ?, ?, ?)
            ";
            sqlx::query(query_str)
                .bind(author.id().as_uuid())
                .bind(author.first_name())
                .bind(author.family_name())
                .bind(author.date_of_birth())
                .bind(author.date_of_death())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(())
}

/// Replaces the details of the existing author with the same identifier as `author`.
pub(crate) async fn update_author(ex: &mut Executor, author: &Author) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE authors
                SET first_name = $1, family_name = $2, date_of_birth = $3, date_of_death = $4
                WHERE id = $5
            ";
            let done = sqlx::query(query_str)
                .bind(author.first_name())
                .bind(author.family_name())
                .bind(author.date_of_birth())
                .bind(author.date_of_death())
                .bind(author.id().as_uuid())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE authors
                SET first_name = ?, family_name = ?, date_of_birth = ?, date_of_death = ?
                WHERE id = ?
            ";
            let done = sqlx::query(query_str)
                .bind(author.first_name())
                .bind(author.family_name())
                .bind(author.date_of_birth())
                .bind(author.date_of_death())
                .bind(author.id().as_uuid())
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

/// Deletes the author identified by `id`.
pub(crate) async fn delete_author(ex: &mut Executor, id: AuthorId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM authors WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id.as_uuid())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)
                .map_err(deletion_error("author"))?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM authors WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id.as_uuid())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)
                .map_err(deletion_error("author"))?;
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
