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

//! Rendering of the book pages.

use crate::driver::{BookDelete, BookDetail, BookForm, BookListItem};
use crate::model::{BookInstance, BookInstanceStatus};
use crate::rest::views::{layout, link, list, option, violations, DELETE_FORM};
use axum::response::Html;
use locallib_core::template;

/// Template for the `book_detail` page.
const BOOK_DETAIL: &str = r#"<p><strong>Author:</strong> %author%</p>
<p><strong>Summary:</strong> %summary%</p>
<p><strong>ISBN:</strong> %isbn%</p>
<p><strong>Genre:</strong> %genres%</p>

<div>
<h2>Copies</h2>
%instances%
</div>

<hr>
<p><a href="%url%/delete">Delete book</a></p>
<p><a href="%url%/update">Update book</a></p>
"#;

/// Template for the `book_form` page.
const BOOK_FORM: &str = r#"<form method="POST" action="">
<div>
<label for="title">Title:</label>
<input id="title" type="text" name="title" placeholder="Name of book" value="%title%">
</div>
<div>
<label for="author">Author:</label>
<select id="author" name="author">
<option value="">--Please select an author--</option>
%authors%</select>
</div>
<div>
<label for="summary">Summary:</label>
<textarea id="summary" name="summary" placeholder="Summary">%summary%</textarea>
</div>
<div>
<label for="isbn">ISBN:</label>
<input id="isbn" type="text" name="isbn" placeholder="ISBN13" value="%isbn%">
</div>
<div>
<label>Genre:</label>
%genres%</div>
<button type="submit">Submit</button>
</form>

%violations%"#;

/// Template for a genre checkbox in the `book_form` page.
const GENRE_CHECKBOX: &str = r#"<div>
<input type="checkbox" name="genre" id="genre-%id%" value="%id%"%checked%>
<label for="genre-%id%">%name%</label>
</div>
"#;

/// Template for the `book_delete` page.
const BOOK_DELETE: &str = r#"<p><strong>Author:</strong> %author%</p>

<div>
<h2>Copies</h2>
%instances%
</div>

%confirm%"#;

/// Renders a copy as an item of the copies of a book.
fn instance_item(instance: &BookInstance) -> String {
    let due_back = match instance.status() {
        BookInstanceStatus::Available => String::new(),
        _ => format!("<p><strong>Due back:</strong> {}</p>", instance.due_back_formatted()),
    };
    format!(
        "<p class=\"status-{}\">{}</p><p><strong>Imprint:</strong> {}</p>{}<p><strong>Id:</strong> {}</p>",
        instance.status().as_str().to_lowercase(),
        instance.status(),
        instance.imprint(),
        due_back,
        link(&instance.url(), &instance.id().to_string()),
    )
}

/// Renders the `book_list` page.
pub(crate) fn book_list(items: &[BookListItem]) -> Html<String> {
    let content = list(items, "There are no books.", |item| {
        format!("{} ({})", link(&item.book.url(), item.book.title()), item.author.name())
    });
    layout("Book List", &content)
}

/// Renders the `book_detail` page.
pub(crate) fn book_detail(detail: &BookDetail) -> Html<String> {
    let genres = detail
        .genres
        .iter()
        .map(|genre| link(&genre.url(), genre.name()))
        .collect::<Vec<String>>()
        .join(", ");
    let instances = list(&detail.instances, "There are no copies of this book.", instance_item);
    let content = template::apply(
        BOOK_DETAIL,
        &[
            ("author", &link(&detail.author.url(), &detail.author.name())),
            ("summary", detail.book.summary()),
            ("isbn", detail.book.isbn()),
            ("genres", &genres),
            ("instances", &instances),
            ("url", &detail.book.url()),
        ],
    );
    layout(&format!("Title: {}", detail.book.title()), &content)
}

/// Renders the `book_form` page.
pub(crate) fn book_form(form: &BookForm) -> Html<String> {
    let mut authors = String::new();
    for author in &form.authors {
        let selected = form.selected_author == Some(*author.id());
        authors.push_str(&option(&author.id().to_string(), &author.name(), selected));
    }

    let mut genres = String::new();
    for genre in &form.genres {
        let checked = form.selected_genres.get(genre.id()).copied().unwrap_or(false);
        genres.push_str(&template::apply(
            GENRE_CHECKBOX,
            &[
                ("id", &genre.id().to_string()),
                ("checked", if checked { " checked" } else { "" }),
                ("name", genre.name()),
            ],
        ));
    }

    let content = template::apply(
        BOOK_FORM,
        &[
            ("title", &form.fields.title),
            ("authors", &authors),
            ("summary", &form.fields.summary),
            ("isbn", &form.fields.isbn),
            ("genres", &genres),
            ("violations", &violations(&form.violations)),
        ],
    );
    layout(form.title, &content)
}

/// Renders the `book_delete` page.
pub(crate) fn book_delete(page: &BookDelete) -> Html<String> {
    let confirm = if page.instances.is_empty() {
        format!("<p>Do you really want to delete this book?</p>\n{}", DELETE_FORM)
    } else {
        "<p><strong>Delete the following copies before attempting to delete this book.</strong></p>\n"
            .to_owned()
    };
    let instances = list(&page.instances, "There are no copies of this book.", instance_item);
    let content = template::apply(
        BOOK_DELETE,
        &[
            ("author", &link(&page.author.url(), &page.author.name())),
            ("instances", &instances),
            ("confirm", &confirm),
        ],
    );
    layout(&format!("Delete Book: {}", page.book.title()), &content)
}
