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

//! Page to delete an author.

use crate::driver::Driver;
use crate::model::AuthorId;
use crate::rest::{delete_response, views};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use locallib_core::rest::{EmptyBody, RestError};

/// Where to go once the author is gone.
const LIST_URL: &str = "/catalog/authors";

/// GET handler for this page.
pub(crate) async fn get_handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<Response, RestError> {
    let page = match id.parse::<AuthorId>() {
        Ok(id) => driver.author_delete_page(id).await?,
        Err(_) => None,
    };
    match page {
        Some(page) => Ok(views::author_delete(&page).into_response()),
        None => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

/// POST handler for this page.
pub(crate) async fn post_handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<Response, RestError> {
    let id = match id.parse::<AuthorId>() {
        Ok(id) => id,
        Err(_) => return Ok(Redirect::to(LIST_URL).into_response()),
    };
    let outcome = driver.delete_author(id).await?;
    Ok(delete_response(outcome, LIST_URL, views::author_delete))
}

#[cfg(test)]
mod tests {
    use crate::db;
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use locallib_core::db::DbError;
    use locallib_core::rest::testutils::OneShotBuilder;
    use locallib_core::test_payload_must_be_empty;

    fn get_route(id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/catalog/author/{}/delete", id))
    }

    fn post_route(id: &str) -> (http::Method, String) {
        (http::Method::POST, format!("/catalog/author/{}/delete", id))
    }

    #[tokio::test]
    async fn test_get() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let idle = create_test_author(&mut ex, "Isaac", "Asimov").await;
        let busy = create_test_author(&mut ex, "Frank", "Herbert").await;
        let book = create_test_book(&mut ex, "Dune", &busy, &[]).await;

        OneShotBuilder::new(context.app(), get_route(&idle.id().to_string()))
            .send_empty()
            .await
            .expect_text("Do you really want to delete this author?")
            .await;

        let body = OneShotBuilder::new(context.app(), get_route(&busy.id().to_string()))
            .send_empty()
            .await
            .take_body_as_text()
            .await;
        assert!(body.contains("<h1>Delete Author: Herbert, Frank</h1>"));
        assert!(body.contains("Delete the following books before attempting to delete this author."));
        assert!(body.contains(&book.url()));

        OneShotBuilder::new(context.app(), get_route(&AuthorId::generate().to_string()))
            .send_empty()
            .await
            .expect_redirect("/catalog/authors")
            .await;
    }

    #[tokio::test]
    async fn test_post_ok() {
        let context = TestContext::setup().await;
        let author = create_test_author(&mut context.ex().await, "Isaac", "Asimov").await;

        OneShotBuilder::new(context.app(), post_route(&author.id().to_string()))
            .send_empty()
            .await
            .expect_redirect("/catalog/authors")
            .await;

        assert_eq!(
            DbError::NotFound,
            db::get_author(&mut context.ex().await, *author.id()).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_post_blocked_by_books() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let author = create_test_author(&mut ex, "Frank", "Herbert").await;
        create_test_book(&mut ex, "Dune", &author, &[]).await;

        OneShotBuilder::new(context.app(), post_route(&author.id().to_string()))
            .send_empty()
            .await
            .expect_text("Delete the following books before attempting to delete this author.")
            .await;

        assert_eq!(author, db::get_author(&mut ex, *author.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_post_missing_redirects_to_list() {
        let context = TestContext::setup().await;

        for id in [AuthorId::generate().to_string(), "bad-id".to_owned()] {
            OneShotBuilder::new(context.app(), post_route(&id))
                .send_empty()
                .await
                .expect_redirect("/catalog/authors")
                .await;
        }
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        post_route(&AuthorId::generate().to_string())
    );
}
