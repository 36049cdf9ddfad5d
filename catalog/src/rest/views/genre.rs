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

//! Rendering of the genre pages.

use crate::driver::{GenreDelete, GenreDetail, GenreForm};
use crate::model::{Book, Genre};
use crate::rest::views::{layout, link, list, violations, DELETE_FORM};
use axum::response::Html;
use locallib_core::template;

/// Template for the `genre_detail` page.
const GENRE_DETAIL: &str = r#"<div>
<h2>Books</h2>
%books%
</div>

<hr>
<p><a href="%url%/delete">Delete genre</a></p>
<p><a href="%url%/update">Update genre</a></p>
"#;

/// Template for the `genre_form` page.
const GENRE_FORM: &str = r#"<form method="POST" action="">
<div>
<label for="name">Genre:</label>
<input id="name" type="text" name="name" placeholder="Fantasy, Poetry etc." value="%name%">
</div>
<button type="submit">Submit</button>
</form>

%violations%"#;

/// Template for the `genre_delete` page.
const GENRE_DELETE: &str = r#"<div>
<h2>Books</h2>
%books%
</div>

%confirm%"#;

/// Renders a book as an item of the books of a genre.
fn book_item(book: &Book) -> String {
    format!("{}<p>{}</p>", link(&book.url(), book.title()), book.summary())
}

/// Renders the `genre_list` page.
pub(crate) fn genre_list(genres: &[Genre]) -> Html<String> {
    let content = list(genres, "There are no genres.", |genre| link(&genre.url(), genre.name()));
    layout("Genre List", &content)
}

/// Renders the `genre_detail` page.
pub(crate) fn genre_detail(detail: &GenreDetail) -> Html<String> {
    let books = list(&detail.books, "This genre has no books.", book_item);
    let content =
        template::apply(GENRE_DETAIL, &[("books", &books), ("url", &detail.genre.url())]);
    layout(&format!("Genre: {}", detail.genre.name()), &content)
}

/// Renders the `genre_form` page.
pub(crate) fn genre_form(form: &GenreForm) -> Html<String> {
    let content = template::apply(
        GENRE_FORM,
        &[("name", &form.fields.name), ("violations", &violations(&form.violations))],
    );
    layout(form.title, &content)
}

/// Renders the `genre_delete` page.
pub(crate) fn genre_delete(page: &GenreDelete) -> Html<String> {
    let confirm = if page.books.is_empty() {
        format!("<p>Do you really want to delete this genre?</p>\n{}", DELETE_FORM)
    } else {
        "<p><strong>Delete the following books before attempting to delete this genre.</strong></p>\n"
            .to_owned()
    };
    let books = list(&page.books, "This genre has no books.", book_item);
    let content = template::apply(GENRE_DELETE, &[("books", &books), ("confirm", &confirm)]);
    layout(&format!("Delete Genre: {}", page.genre.name()), &content)
}
