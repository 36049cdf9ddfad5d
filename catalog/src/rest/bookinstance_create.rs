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

//! Page to create a new book copy.

use crate::driver::{BookInstanceFields, Driver};
use crate::rest::{form_response, forms, views};
use axum::extract::State;
use axum::response::{Html, Response};
use axum::Form;
use locallib_core::rest::{EmptyBody, RestError};

/// GET handler for this page.
pub(crate) async fn get_handler(
    State(driver): State<Driver>,
    _: EmptyBody,
) -> Result<Html<String>, RestError> {
    let form = driver.instance_create_form().await?;
    Ok(views::bookinstance_form(&form))
}

/// POST handler for this page.
pub(crate) async fn post_handler(
    State(driver): State<Driver>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, RestError> {
    let fields = forms::single_valued::<BookInstanceFields>(pairs)?;
    let outcome = driver.create_instance(fields).await?;
    Ok(form_response(outcome, views::bookinstance_form))
}

#[cfg(test)]
mod tests {
    use crate::db;
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use locallib_core::rest::testutils::OneShotBuilder;
    use locallib_core::{test_payload_must_be_empty, test_payload_must_be_form};
    use time::macros::date;

    fn get_route() -> (http::Method, String) {
        (http::Method::GET, "/catalog/bookinstance/create".to_owned())
    }

    fn post_route() -> (http::Method, String) {
        (http::Method::POST, "/catalog/bookinstance/create".to_owned())
    }

    #[tokio::test]
    async fn test_get_form_with_choices() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let author = create_test_author(&mut ex, "Frank", "Herbert").await;
        let book = create_test_book(&mut ex, "Dune", &author, &[]).await;

        let body = OneShotBuilder::new(context.app(), get_route())
            .send_empty()
            .await
            .take_body_as_text()
            .await;
        assert!(body.contains("<h1>Create Book Copy</h1>"));
        assert!(body.contains(&format!("<option value=\"{}\">Dune</option>", book.id())));
        for status in ["Maintenance", "Available", "Loaned", "Reserved"] {
            assert!(body.contains(&format!("<option value=\"{}\">{}</option>", status, status)));
        }
    }

    #[tokio::test]
    async fn test_post_ok() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let author = create_test_author(&mut ex, "Frank", "Herbert").await;
        let book = create_test_book(&mut ex, "Dune", &author, &[]).await;
        let book_id = book.id().to_string();

        let response = OneShotBuilder::new(context.app(), post_route())
            .send_form([
                ("book", book_id.as_str()),
                ("imprint", "Ace, 1990"),
                ("status", "Reserved"),
                ("due_back", "2024-03-01"),
            ])
            .await
            .expect_status(http::StatusCode::SEE_OTHER)
            .take_response()
            .await;

        let instances = db::list_instances_by_book(&mut ex, *book.id()).await.unwrap();
        assert_eq!(1, instances.len());
        let instance = &instances[0];
        assert_eq!(
            instance.url(),
            response.headers().get(http::header::LOCATION).unwrap().to_str().unwrap()
        );
        assert_eq!("Ace, 1990", instance.imprint());
        assert_eq!(&BookInstanceStatus::Reserved, instance.status());
        assert_eq!(&Some(date!(2024 - 03 - 01)), instance.due_back());
    }

    #[tokio::test]
    async fn test_post_repeated_key_last_wins() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let author = create_test_author(&mut ex, "Frank", "Herbert").await;
        let book = create_test_book(&mut ex, "Dune", &author, &[]).await;
        let book_id = book.id().to_string();

        OneShotBuilder::new(context.app(), post_route())
            .send_form([
                ("book", book_id.as_str()),
                ("imprint", "Ace, 1990"),
                ("status", "Loaned"),
                ("status", "Available"),
            ])
            .await
            .expect_status(http::StatusCode::SEE_OTHER)
            .verify();

        let instances = db::list_instances_by_book(&mut ex, *book.id()).await.unwrap();
        assert_eq!(1, instances.len());
        assert_eq!(&BookInstanceStatus::Available, instances[0].status());
    }

    #[tokio::test]
    async fn test_post_invalid() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let author = create_test_author(&mut ex, "Frank", "Herbert").await;
        let book = create_test_book(&mut ex, "Dune", &author, &[]).await;
        let book_id = book.id().to_string();

        let body = OneShotBuilder::new(context.app(), post_route())
            .send_form([("book", book_id.as_str()), ("imprint", ""), ("status", "Loaned")])
            .await
            .take_body_as_text()
            .await;
        assert!(body.contains("<li data-field=\"imprint\">Imprint must be specified.</li>"));
        assert!(body.contains(&format!("<option value=\"{}\" selected>Dune</option>", book.id())));
        assert!(body.contains("<option value=\"Loaned\" selected>Loaned</option>"));
        assert_eq!(0, db::count_instances(&mut ex).await.unwrap());
    }

    #[tokio::test]
    async fn test_post_missing_book() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), post_route())
            .send_form([("imprint", "Ace")])
            .await
            .expect_text("Book must be specified.")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), get_route());

    test_payload_must_be_form!(TestContext::setup().await.into_app(), post_route());
}
