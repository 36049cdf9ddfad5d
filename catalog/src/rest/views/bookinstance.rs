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

//! Rendering of the book copy pages.

use crate::driver::{BookInstanceDelete, BookInstanceDetail, BookInstanceForm, BookInstanceListItem};
use crate::model::{BookInstance, BookInstanceStatus};
use crate::rest::views::{layout, link, list, option, violations, DELETE_FORM};
use axum::response::Html;
use locallib_core::template;

/// Template for the `bookinstance_detail` and `bookinstance_delete` pages.
const BOOKINSTANCE_DETAIL: &str = r#"<p><strong>Title:</strong> %book%</p>
<p><strong>Imprint:</strong> %imprint%</p>
<p><strong>Status:</strong> <span class="status-%status_class%">%status%</span></p>
%due_back%
%footer%"#;

/// Footer of the `bookinstance_detail` page.
const DETAIL_FOOTER: &str = r#"<hr>
<p><a href="%url%/delete">Delete book copy</a></p>
<p><a href="%url%/update">Update book copy</a></p>
"#;

/// Template for the `bookinstance_form` page.
const BOOKINSTANCE_FORM: &str = r#"<form method="POST" action="">
<div>
<label for="book">Book:</label>
<select id="book" name="book">
<option value="">--Please select a book--</option>
%books%</select>
</div>
<div>
<label for="imprint">Imprint:</label>
<input id="imprint" type="text" name="imprint" placeholder="Publisher and date information" value="%imprint%">
</div>
<div>
<label for="due_back">Date when book available:</label>
<input id="due_back" type="date" name="due_back" value="%due_back%">
</div>
<div>
<label for="status">Status:</label>
<select id="status" name="status">
%statuses%</select>
</div>
<button type="submit">Submit</button>
</form>

%violations%"#;

/// Renders the due-back line of a copy, which only makes sense when the copy is not available.
fn due_back(instance: &BookInstance) -> String {
    match instance.status() {
        BookInstanceStatus::Available => String::new(),
        _ => format!("<p><strong>Due back:</strong> {}</p>", instance.due_back_formatted()),
    }
}

/// Renders the details of a copy followed by `footer`.
fn details(item: &BookInstanceDetail, footer: &str) -> String {
    let status = item.instance.status();
    template::apply(
        BOOKINSTANCE_DETAIL,
        &[
            ("book", &link(&item.book.url(), item.book.title())),
            ("imprint", item.instance.imprint()),
            ("status_class", &status.as_str().to_lowercase()),
            ("status", status.as_str()),
            ("due_back", &due_back(&item.instance)),
            ("footer", footer),
        ],
    )
}

/// Renders the `bookinstance_list` page.
pub(crate) fn bookinstance_list(items: &[BookInstanceListItem]) -> Html<String> {
    let content = list(items, "There are no book copies in this library.", |item| {
        let status = item.instance.status();
        let due_back = match status {
            BookInstanceStatus::Available => String::new(),
            _ => format!(" (Due: {})", item.instance.due_back_formatted()),
        };
        format!(
            "{} - <span class=\"status-{}\">{}</span>{}",
            link(
                &item.instance.url(),
                &format!("{}: {}", item.book.title(), item.instance.imprint())
            ),
            status.as_str().to_lowercase(),
            status,
            due_back,
        )
    });
    layout("Book Copy List", &content)
}

/// Renders the `bookinstance_detail` page.
pub(crate) fn bookinstance_detail(detail: &BookInstanceDetail) -> Html<String> {
    let footer = template::apply(DETAIL_FOOTER, &[("url", &detail.instance.url())]);
    layout(&format!("ID: {}", detail.instance.id()), &details(detail, &footer))
}

/// Renders the `bookinstance_form` page.
pub(crate) fn bookinstance_form(form: &BookInstanceForm) -> Html<String> {
    let mut books = String::new();
    for book in &form.books {
        let selected = form.selected_book == Some(*book.id());
        books.push_str(&option(&book.id().to_string(), book.title(), selected));
    }

    let mut statuses = String::new();
    for status in BookInstanceStatus::ALL {
        let selected = form.fields.status == status.as_str();
        statuses.push_str(&option(status.as_str(), status.as_str(), selected));
    }

    let content = template::apply(
        BOOKINSTANCE_FORM,
        &[
            ("books", &books),
            ("imprint", &form.fields.imprint),
            ("due_back", &form.fields.due_back),
            ("statuses", &statuses),
            ("violations", &violations(&form.violations)),
        ],
    );
    layout(form.title, &content)
}

/// Renders the `bookinstance_delete` page.
pub(crate) fn bookinstance_delete(page: &BookInstanceDelete) -> Html<String> {
    let footer = format!("<p>Do you really want to delete this book copy?</p>\n{}", DELETE_FORM);
    layout(&format!("Delete Book Copy: {}", page.instance.id()), &details(page, &footer))
}
