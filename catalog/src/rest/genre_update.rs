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

//! Page to update an existing genre.

use crate::driver::{Driver, GenreFields};
use crate::model::GenreId;
use crate::rest::{form_response, forms, parse_id, views};
use axum::extract::{Path, State};
use axum::response::{Html, Response};
use axum::Form;
use locallib_core::rest::{EmptyBody, RestError};

/// GET handler for this page.
pub(crate) async fn get_handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<Html<String>, RestError> {
    let id = parse_id::<GenreId>(&id, "Genre")?;
    let form = driver.genre_update_form(id).await?;
    Ok(views::genre_form(&form))
}

/// POST handler for this page.
pub(crate) async fn post_handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, RestError> {
    let fields = forms::single_valued::<GenreFields>(pairs)?;
    let id = parse_id::<GenreId>(&id, "Genre")?;
    let outcome = driver.update_genre(id, fields).await?;
    Ok(form_response(outcome, views::genre_form))
}
