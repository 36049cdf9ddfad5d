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

//! Rendering of the author pages.

use crate::driver::{AuthorDelete, AuthorDetail, AuthorForm};
use crate::model::{Author, Book};
use crate::rest::views::{layout, link, list, violations, DELETE_FORM};
use axum::response::Html;
use locallib_core::template;

/// Template for the `author_detail` page.
const AUTHOR_DETAIL: &str = r#"<p>%lifespan%</p>

<div>
<h2>Books</h2>
%books%
</div>

<hr>
<p><a href="%url%/delete">Delete author</a></p>
<p><a href="%url%/update">Update author</a></p>
"#;

/// Template for the `author_form` page.
const AUTHOR_FORM: &str = r#"<form method="POST" action="">
<div>
<label for="first_name">First Name:</label>
<input id="first_name" type="text" name="first_name" placeholder="First name" value="%first_name%">
<label for="family_name">Family Name:</label>
<input id="family_name" type="text" name="family_name" placeholder="Family name" value="%family_name%">
</div>
<div>
<label for="date_of_birth">Date of birth:</label>
<input id="date_of_birth" type="date" name="date_of_birth" value="%date_of_birth%">
</div>
<div>
<label for="date_of_death">Date of death:</label>
<input id="date_of_death" type="date" name="date_of_death" value="%date_of_death%">
</div>
<button type="submit">Submit</button>
</form>

%violations%"#;

/// Template for the `author_delete` page.
const AUTHOR_DELETE: &str = r#"<p>%lifespan%</p>

<div>
<h2>Books</h2>
%books%
</div>

%confirm%"#;

/// Renders a book as an item of the books of an author.
fn book_item(book: &Book) -> String {
    format!("{}<p>{}</p>", link(&book.url(), book.title()), book.summary())
}

/// Renders an author as an item of the list of all authors.
fn author_item(author: &Author) -> String {
    let lifespan = author.lifespan();
    if lifespan.is_empty() {
        link(&author.url(), &author.name())
    } else {
        format!("{} ({})", link(&author.url(), &author.name()), lifespan)
    }
}

/// Renders the `author_list` page.
pub(crate) fn author_list(authors: &[Author]) -> Html<String> {
    layout("Author List", &list(authors, "There are no authors.", author_item))
}

/// Renders the `author_detail` page.
pub(crate) fn author_detail(detail: &AuthorDetail) -> Html<String> {
    let content = template::apply(
        AUTHOR_DETAIL,
        &[
            ("lifespan", &detail.author.lifespan()),
            ("books", &list(&detail.books, "This author has no books.", book_item)),
            ("url", &detail.author.url()),
        ],
    );
    layout(&format!("Author: {}", detail.author.name()), &content)
}

/// Renders the `author_form` page.
pub(crate) fn author_form(form: &AuthorForm) -> Html<String> {
    let content = template::apply(
        AUTHOR_FORM,
        &[
            ("first_name", &form.fields.first_name),
            ("family_name", &form.fields.family_name),
            ("date_of_birth", &form.fields.date_of_birth),
            ("date_of_death", &form.fields.date_of_death),
            ("violations", &violations(&form.violations)),
        ],
    );
    layout(form.title, &content)
}

/// Renders the `author_delete` page.
pub(crate) fn author_delete(page: &AuthorDelete) -> Html<String> {
    let confirm = if page.books.is_empty() {
        format!("<p>Do you really want to delete this author?</p>\n{}", DELETE_FORM)
    } else {
        "<p><strong>Delete the following books before attempting to delete this author.</strong></p>\n"
            .to_owned()
    };
    let content = template::apply(
        AUTHOR_DELETE,
        &[
            ("lifespan", &page.author.lifespan()),
            ("books", &list(&page.books, "This author has no books.", book_item)),
            ("confirm", &confirm),
        ],
    );
    layout(&format!("Delete Author: {}", page.author.name()), &content)
}
