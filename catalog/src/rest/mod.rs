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

//! Entry point to the HTTP layer.

use crate::driver::{DeleteOutcome, Driver, FormOutcome};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Router;
use locallib_core::rest::{RestError, RestResult};
use std::str::FromStr;

mod author_create;
mod author_delete;
mod author_get;
mod author_update;
mod authors_get;
mod book_create;
mod book_delete;
mod book_get;
mod book_update;
mod bookinstance_create;
mod bookinstance_delete;
mod bookinstance_get;
mod bookinstance_update;
mod bookinstances_get;
mod books_get;
mod forms;
mod genre_create;
mod genre_delete;
mod genre_get;
mod genre_update;
mod genres_get;
mod index_get;
mod root_get;
#[cfg(test)]
mod testutils;
mod views;

/// Parses the identifier `raw` of a `what` entity taken from a path.
///
/// Malformed identifiers cannot name any entity so they are reported as not found.
fn parse_id<T: FromStr>(raw: &str, what: &str) -> RestResult<T> {
    raw.parse::<T>().map_err(|_| RestError::NotFound(format!("{} not found", what)))
}

/// Turns the outcome of a form submission into a response: a redirection to the saved entity or
/// the form rendered again by `render`.
fn form_response<F, R>(outcome: FormOutcome<F>, render: R) -> Response
where
    R: FnOnce(&F) -> Html<String>,
{
    match outcome {
        FormOutcome::Saved(url) => Redirect::to(&url).into_response(),
        FormOutcome::Rejected(form) => render(&form).into_response(),
    }
}

/// Turns the outcome of a deletion into a response: a redirection to the list at `list_url` or
/// the confirmation page rendered again by `render`.
fn delete_response<P, R>(outcome: DeleteOutcome<P>, list_url: &str, render: R) -> Response
where
    R: FnOnce(&P) -> Html<String>,
{
    match outcome {
        DeleteOutcome::Gone => Redirect::to(list_url).into_response(),
        DeleteOutcome::Blocked(page) => render(&page).into_response(),
    }
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;
    Router::new()
        .route("/", get(root_get::handler))
        .route("/catalog", get(index_get::handler))
        .route("/catalog/books", get(books_get::handler))
        .route(
            "/catalog/book/create",
            get(book_create::get_handler).post(book_create::post_handler),
        )
        .route(
            "/catalog/book/:id/delete",
            get(book_delete::get_handler).post(book_delete::post_handler),
        )
        .route(
            "/catalog/book/:id/update",
            get(book_update::get_handler).post(book_update::post_handler),
        )
        .route("/catalog/book/:id", get(book_get::handler))
        .route("/catalog/authors", get(authors_get::handler))
        .route(
            "/catalog/author/create",
            get(author_create::get_handler).post(author_create::post_handler),
        )
        .route(
            "/catalog/author/:id/delete",
            get(author_delete::get_handler).post(author_delete::post_handler),
        )
        .route(
            "/catalog/author/:id/update",
            get(author_update::get_handler).post(author_update::post_handler),
        )
        .route("/catalog/author/:id", get(author_get::handler))
        .route("/catalog/genres", get(genres_get::handler))
        .route(
            "/catalog/genre/create",
            get(genre_create::get_handler).post(genre_create::post_handler),
        )
        .route(
            "/catalog/genre/:id/delete",
            get(genre_delete::get_handler).post(genre_delete::post_handler),
        )
        .route(
            "/catalog/genre/:id/update",
            get(genre_update::get_handler).post(genre_update::post_handler),
        )
        .route("/catalog/genre/:id", get(genre_get::handler))
        .route("/catalog/bookinstances", get(bookinstances_get::handler))
        .route(
            "/catalog/bookinstance/create",
            get(bookinstance_create::get_handler).post(bookinstance_create::post_handler),
        )
        .route(
            "/catalog/bookinstance/:id/delete",
            get(bookinstance_delete::get_handler).post(bookinstance_delete::post_handler),
        )
        .route(
            "/catalog/bookinstance/:id/update",
            get(bookinstance_update::get_handler).post(bookinstance_update::post_handler),
        )
        .route("/catalog/bookinstance/:id", get(bookinstance_get::handler))
        .with_state(driver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookId;

    #[test]
    fn test_parse_id_ok() {
        let id = BookId::generate();
        assert_eq!(id, parse_id::<BookId>(&id.to_string(), "Book").unwrap());
    }

    #[test]
    fn test_parse_id_malformed() {
        assert_eq!(
            RestError::NotFound("Book not found".to_owned()),
            parse_id::<BookId>("not-an-id", "Book").unwrap_err()
        );
    }
}
