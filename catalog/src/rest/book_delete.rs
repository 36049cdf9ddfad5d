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

//! Page to delete a book.

use crate::driver::Driver;
use crate::model::BookId;
use crate::rest::{delete_response, views};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use locallib_core::rest::{EmptyBody, RestError};

/// Where to go once the book is gone.
const LIST_URL: &str = "/catalog/books";

/// GET handler for this page.
pub(crate) async fn get_handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<Response, RestError> {
    let page = match id.parse::<BookId>() {
        Ok(id) => driver.book_delete_page(id).await?,
        Err(_) => None,
    };
    match page {
        Some(page) => Ok(views::book_delete(&page).into_response()),
        None => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

/// POST handler for this page.
pub(crate) async fn post_handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<Response, RestError> {
    let id = match id.parse::<BookId>() {
        Ok(id) => id,
        Err(_) => return Ok(Redirect::to(LIST_URL).into_response()),
    };
    let outcome = driver.delete_book(id).await?;
    Ok(delete_response(outcome, LIST_URL, views::book_delete))
}
