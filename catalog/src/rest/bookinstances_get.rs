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

//! Page to list all book copies.

use crate::driver::Driver;
use crate::rest::views;
use axum::extract::State;
use axum::response::Html;
use locallib_core::rest::{EmptyBody, RestError};

/// GET handler for this page.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    _: EmptyBody,
) -> Result<Html<String>, RestError> {
    let items = driver.list_instances().await?;
    Ok(views::bookinstance_list(&items))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use locallib_core::rest::testutils::OneShotBuilder;
    use locallib_core::test_payload_must_be_empty;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/catalog/bookinstances".to_owned())
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_text("There are no book copies in this library")
            .await;
    }

    #[tokio::test]
    async fn test_statuses() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let author = create_test_author(&mut ex, "Frank", "Herbert").await;
        let book = create_test_book(&mut ex, "Dune", &author, &[]).await;
        let available =
            create_test_instance(&mut ex, &book, "Ace", BookInstanceStatus::Available).await;
        let loaned =
            create_test_instance(&mut ex, &book, "Gollancz", BookInstanceStatus::Loaned).await;

        let body = OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .take_body_as_text()
            .await;
        assert!(body.contains(&format!(
            "<a href=\"{}\">Dune: Ace</a> - <span class=\"status-available\">Available</span></li>",
            available.url()
        )));
        assert!(body.contains(&format!(
            "<a href=\"{}\">Dune: Gollancz</a> - <span class=\"status-loaned\">Loaned</span> (Due: )",
            loaned.url()
        )));
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
