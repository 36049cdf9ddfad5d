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

//! Page to create a new author.

use crate::driver::{AuthorFields, AuthorForm, Driver};
use crate::rest::{form_response, forms, views};
use axum::extract::State;
use axum::response::{Html, Response};
use axum::Form;
use locallib_core::rest::{EmptyBody, RestError};

/// GET handler for this page.
pub(crate) async fn get_handler(_: EmptyBody) -> Html<String> {
    views::author_form(&AuthorForm::create())
}

/// POST handler for this page.
pub(crate) async fn post_handler(
    State(driver): State<Driver>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, RestError> {
    let fields = forms::single_valued::<AuthorFields>(pairs)?;
    let outcome = driver.create_author(fields).await?;
    Ok(form_response(outcome, views::author_form))
}
