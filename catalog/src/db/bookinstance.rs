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

//! Database operations on book copies.

use crate::model::{BookId, BookInstance, BookInstanceId, BookInstanceStatus};
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
impl TryFrom<PgRow> for BookInstance {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let book_id: Uuid = row.try_get("book_id").map_err(postgres::map_sqlx_error)?;
        let imprint: String = row.try_get("imprint").map_err(postgres::map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(postgres::map_sqlx_error)?;
        let due_back: Option<Date> = row.try_get("due_back").map_err(postgres::map_sqlx_error)?;

        Ok(BookInstance::new(
            BookInstanceId::from(id),
            BookId::from(book_id),
            imprint,
            status.parse::<BookInstanceStatus>()?,
            due_back,
        ))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for BookInstance {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let book_id: Uuid = row.try_get("book_id").map_err(sqlite::map_sqlx_error)?;
        let imprint: String = row.try_get("imprint").map_err(sqlite::map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(sqlite::map_sqlx_error)?;
        let due_back: Option<Date> = row.try_get("due_back").map_err(sqlite::map_sqlx_error)?;

        Ok(BookInstance::new(
            BookInstanceId::from(id),
            BookId::from(book_id),
            imprint,
            status.parse::<BookInstanceStatus>()?,
            due_back,
        ))
    }
}

/// Counts all book copies.
pub(crate) async fn count_instances(ex: &mut Executor) -> DbResult<u64> {
    let query_str = "SELECT COUNT(*) AS count FROM book_instances";
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

/// Counts the book copies in the given `status`.
pub(crate) async fn count_instances_by_status(
    ex: &mut Executor,
    status: BookInstanceStatus,
) -> DbResult<u64> {
    let count: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM book_instances WHERE status = $1";
            let row = sqlx::query(query_str)
                .bind(status.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("count").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM book_instances WHERE status = ?";
            let row = sqlx::query(query_str)
                .bind(status.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("count").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    count_to_u64(count)
}

/// Gets all book copies sorted by the title of their book and then by imprint.
pub(crate) async fn list_instances(ex: &mut Executor) -> DbResult<Vec<BookInstance>> {
    let query_str = "
        SELECT book_instances.* FROM book_instances
        JOIN books ON books.id = book_instances.book_id
        ORDER BY books.title, book_instances.imprint
    ";
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(BookInstance::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows =
                sqlx::query(query_str).fetch_all(ex.conn()).await.map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(BookInstance::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all copies of `book` sorted by imprint.
pub(crate) async fn list_instances_by_book(
    ex: &mut Executor,
    book: BookId,
) -> DbResult<Vec<BookInstance>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM book_instances WHERE book_id = $1 ORDER BY imprint";
            let rows = sqlx::query(query_str)
                .bind(book.as_uuid())
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(BookInstance::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM book_instances WHERE book_id = ? ORDER BY imprint";
            let rows = sqlx::query(query_str)
                .bind(book.as_uuid())
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(BookInstance::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the book copy identified by `id`.
pub(crate) async fn get_instance(ex: &mut Executor, id: BookInstanceId) -> DbResult<BookInstance> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM book_instances WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id.as_uuid())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            BookInstance::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM book_instances WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.as_uuid())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            BookInstance::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Inserts a new book copy.
pub(crate) async fn create_instance(ex: &mut Executor, instance: &BookInstance) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO book_instances (id, book_id, imprint, status, due_back)
                VALUES ($1, $2, $3, $4, $5)
            ";
            sqlx::query(query_str)
                .bind(instance.id().as_uuid())
                .bind(instance.book().as_uuid())
                .bind(instance.imprint())
                .bind(instance.status().as_str())
                .bind(instance.due_back())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO book_instances (id, book_id, imprint, status, due_back)
                VALUES (?, ?, ?, ?, ?)
            ";
            sqlx::query(query_str)
                .bind(instance.id().as_uuid())
                .bind(instance.book().as_uuid())
                .bind(instance.imprint())
                .bind(instance.status().as_str())
                .bind(instance.due_back())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(())
}

/// Replaces the details of the existing book copy with the same identifier as `instance`.
pub(crate) async fn update_instance(ex: &mut Executor, instance: &BookInstance) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE book_instances SET book_id = $1, imprint = $2, status = $3, due_back = $4
                WHERE id = $5
            ";
            let done = sqlx::query(query_str)
                .bind(instance.book().as_uuid())
                .bind(instance.imprint())
                .bind(instance.status().as_str())
                .bind(instance.due_back())
                .bind(instance.id().as_uuid())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE book_instances SET book_id = ?, imprint = ?, status = ?, due_back = ?
                WHERE id = ?
            ";
            let done = sqlx::query(query_str)
                .bind(instance.book().as_uuid())
                .bind(instance.imprint())
                .bind(instance.status().as_str())
                .bind(instance.due_back())
                .bind(instance.id().as_uuid())
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

/// Deletes the book copy identified by `id`.
pub(crate) async fn delete_instance(ex: &mut Executor, id: BookInstanceId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM book_instances WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id.as_uuid())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM book_instances WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id.as_uuid())
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
        _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
    }
}
