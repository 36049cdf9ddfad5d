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

//! Page that sends visitors of the site root to the catalog.

use axum::response::Redirect;
use locallib_core::rest::EmptyBody;

/// GET handler for this page.
pub(crate) async fn handler(_: EmptyBody) -> Redirect {
    Redirect::to("/catalog")
}

#[cfg(test)]
mod tests {
    use crate::rest::testutils::*;
    use axum::http;
    use locallib_core::rest::testutils::OneShotBuilder;
    use locallib_core::test_payload_must_be_empty;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/".to_owned())
    }

    #[tokio::test]
    async fn test_redirect() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_redirect("/catalog")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
