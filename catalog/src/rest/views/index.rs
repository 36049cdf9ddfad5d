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

//! Rendering of the landing page.

use crate::driver::Summary;
use crate::rest::views::layout;
use axum::response::Html;
use locallib_core::template;

/// Template for the `index` page.
const INDEX: &str = r#"<p>Welcome to <em>LocalLibrary</em>, a very basic website for a small
lending library.</p>

<h2>Dynamic content</h2>

<p>The library has the following record counts:</p>

<ul>
<li><strong>Books:</strong> <span id="books">%books%</span></li>
<li><strong>Copies:</strong> <span id="instances">%instances%</span></li>
<li><strong>Copies available:</strong> <span id="available">%available%</span></li>
<li><strong>Authors:</strong> <span id="authors">%authors%</span></li>
<li><strong>Genres:</strong> <span id="genres">%genres%</span></li>
</ul>
"#;

/// Renders the landing page with the record counts in `summary`.
pub(crate) fn index(summary: &Summary) -> Html<String> {
    let content = template::apply(
        INDEX,
        &[
            ("books", &summary.books.to_string()),
            ("instances", &summary.instances.to_string()),
            ("available", &summary.available_instances.to_string()),
            ("authors", &summary.authors.to_string()),
            ("genres", &summary.genres.to_string()),
        ],
    );
    layout("Local Library Home", &content)
}
