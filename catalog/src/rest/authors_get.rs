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

//! Page to list all authors.

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
    let authors = driver.list_authors().await?;
    Ok(views::author_list(&authors))
}

#[cfg(test)]
mod tests {
    use crate::db;
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use locallib_core::rest::testutils::OneShotBuilder;
    use locallib_core::test_payload_must_be_empty;
    use time::macros::date;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/catalog/authors".to_owned())
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_text("There are no authors")
            .await;
    }

    #[tokio::test]
    async fn test_sorted_with_lifespans() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let herbert = create_test_author(&mut ex, "Frank", "Herbert").await;
        let asimov = Author::new(AuthorId::generate(), "Isaac", "Asimov")
            .with_date_of_birth(Some(date!(1920 - 01 - 02)))
            .with_date_of_death(Some(date!(1992 - 04 - 06)));
        db::create_author(&mut ex, &asimov).await.unwrap();

        let body = OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .take_body_as_text()
            .await;
        let asimov_pos = body
            .find(&format!(
                "<a href=\"{}\">Asimov, Isaac</a> (Born: Jan 2, 1920 - Died: Apr 6, 1992)",
                asimov.url()
            ))
            .expect("Asimov not listed");
        let herbert_pos = body
            .find(&format!("<a href=\"{}\">Herbert, Frank</a></li>", herbert.url()))
            .expect("Herbert not listed");
        assert!(asimov_pos < herbert_pos);
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
