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

//! Page to list all books.

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
    let items = driver.list_books().await?;
    Ok(views::book_list(&items))
}

#[cfg(test)]
mod tests {
    use crate::rest::testutils::*;
    use axum::http;
    use locallib_core::rest::testutils::OneShotBuilder;
    use locallib_core::test_payload_must_be_empty;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/catalog/books".to_owned())
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_text("There are no books")
            .await;
    }

    #[tokio::test]
    async fn test_sorted_by_title() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let herbert = create_test_author(&mut ex, "Frank", "Herbert").await;
        let asimov = create_test_author(&mut ex, "Isaac", "Asimov").await;
        let foundation = create_test_book(&mut ex, "Foundation", &asimov, &[]).await;
        let dune = create_test_book(&mut ex, "Dune", &herbert, &[]).await;

        let body = OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .take_body_as_text()
            .await;
        let dune_pos = body
            .find(&format!("<a href=\"{}\">Dune</a> (Herbert, Frank)", dune.url()))
            .expect("Dune not listed");
        let foundation_pos = body
            .find(&format!("<a href=\"{}\">Foundation</a> (Asimov, Isaac)", foundation.url()))
            .expect("Foundation not listed");
        assert!(dune_pos < foundation_pos);
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
