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

//! Page to delete a book copy.

use crate::driver::Driver;
use crate::model::BookInstanceId;
use crate::rest::views;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use locallib_core::rest::{EmptyBody, RestError};

/// Where to go once the book copy is gone.
const LIST_URL: &str = "/catalog/bookinstances";

/// GET handler for this page.
pub(crate) async fn get_handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<Response, RestError> {
    let page = match id.parse::<BookInstanceId>() {
        Ok(id) => driver.instance_delete_page(id).await?,
        Err(_) => None,
    };
    match page {
        Some(page) => Ok(views::bookinstance_delete(&page).into_response()),
        None => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

/// POST handler for this page.
pub(crate) async fn post_handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<Redirect, RestError> {
    if let Ok(id) = id.parse::<BookInstanceId>() {
        driver.delete_instance(id).await?;
    }
    Ok(Redirect::to(LIST_URL))
}

#[cfg(test)]
mod tests {
    use crate::db;
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use locallib_core::rest::testutils::OneShotBuilder;
    use locallib_core::test_payload_must_be_empty;

    fn get_route(id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/catalog/bookinstance/{}/delete", id))
    }

    fn post_route(id: &str) -> (http::Method, String) {
        (http::Method::POST, format!("/catalog/bookinstance/{}/delete", id))
    }

    #[tokio::test]
    async fn test_get() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let author = create_test_author(&mut ex, "Frank", "Herbert").await;
        let book = create_test_book(&mut ex, "Dune", &author, &[]).await;
        let instance =
            create_test_instance(&mut ex, &book, "Ace", BookInstanceStatus::Available).await;

        let body = OneShotBuilder::new(context.app(), get_route(&instance.id().to_string()))
            .send_empty()
            .await
            .take_body_as_text()
            .await;
        assert!(body.contains(&format!("<h1>Delete Book Copy: {}</h1>", instance.id())));
        assert!(body.contains("Do you really want to delete this book copy?"));
        assert!(body.contains(&format!("<a href=\"{}\">Dune</a>", book.url())));

        OneShotBuilder::new(context.app(), get_route(&BookInstanceId::generate().to_string()))
            .send_empty()
            .await
            .expect_redirect("/catalog/bookinstances")
            .await;
    }

    #[tokio::test]
    async fn test_post() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let author = create_test_author(&mut ex, "Frank", "Herbert").await;
        let book = create_test_book(&mut ex, "Dune", &author, &[]).await;
        let instance =
            create_test_instance(&mut ex, &book, "Ace", BookInstanceStatus::Available).await;

        OneShotBuilder::new(context.app(), post_route(&instance.id().to_string()))
            .send_empty()
            .await
            .expect_redirect("/catalog/bookinstances")
            .await;
        assert_eq!(0, db::count_instances(&mut ex).await.unwrap());

        OneShotBuilder::new(context.app(), post_route(&instance.id().to_string()))
            .send_empty()
            .await
            .expect_redirect("/catalog/bookinstances")
            .await;
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        post_route(&BookInstanceId::generate().to_string())
    );
}
