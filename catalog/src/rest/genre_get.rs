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

//! Page to show the details of a genre.

use crate::driver::Driver;
use crate::model::GenreId;
use crate::rest::{parse_id, views};
use axum::extract::{Path, State};
use axum::response::Html;
use locallib_core::rest::{EmptyBody, RestError};

/// GET handler for this page.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<Html<String>, RestError> {
    let id = parse_id::<GenreId>(&id, "Genre")?;
    let detail = driver.get_genre_detail(id).await?;
    Ok(views::genre_detail(&detail))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use locallib_core::rest::testutils::OneShotBuilder;
    use locallib_core::test_payload_must_be_empty;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/catalog/genre/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let author = create_test_author(&mut ex, "Frank", "Herbert").await;
        let genre = create_test_genre(&mut ex, "Science Fiction").await;
        let book = create_test_book(&mut ex, "Dune", &author, &[&genre]).await;

        let body = OneShotBuilder::new(context.app(), route(&genre.id().to_string()))
            .send_empty()
            .await
            .take_body_as_text()
            .await;
        assert!(body.contains("<h1>Genre: Science Fiction</h1>"));
        assert!(body.contains(&format!("<a href=\"{}\">Dune</a>", book.url())));
    }

    #[tokio::test]
    async fn test_no_books() {
        let context = TestContext::setup().await;
        let genre = create_test_genre(&mut context.ex().await, "Poetry").await;

        OneShotBuilder::new(context.app(), route(&genre.id().to_string()))
            .send_empty()
            .await
            .expect_text("This genre has no books")
            .await;
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route(&GenreId::generate().to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Genre not found")
            .await;
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route(&GenreId::generate().to_string())
    );
}
