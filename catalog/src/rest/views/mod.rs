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

//! HTML rendering of the catalog pages.
//!
//! Every page is rendered by applying a template to the view model returned by the driver and by
//! wrapping the result in the shared layout.  Values coming from the database or from form
//! submissions were escaped when they were sanitized, so they are inserted verbatim.

use crate::driver::validation::Violation;
use axum::response::Html;
use locallib_core::template;

mod author;
pub(crate) use author::*;
mod book;
pub(crate) use book::*;
mod bookinstance;
pub(crate) use bookinstance::*;
mod genre;
pub(crate) use genre::*;
mod index;
pub(crate) use index::*;

/// Document shared by all pages, with the navigation links.
const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>%title% | Local Library</title>
</head>

<body>
<nav>
<ul>
<li><a href="/catalog">Home</a></li>
<li><a href="/catalog/books">All books</a></li>
<li><a href="/catalog/authors">All authors</a></li>
<li><a href="/catalog/genres">All genres</a></li>
<li><a href="/catalog/bookinstances">All book copies</a></li>
</ul>
<ul>
<li><a href="/catalog/author/create">Create new author</a></li>
<li><a href="/catalog/genre/create">Create new genre</a></li>
<li><a href="/catalog/book/create">Create new book</a></li>
<li><a href="/catalog/bookinstance/create">Create new book copy</a></li>
</ul>
</nav>

<main>
<h1>%title%</h1>

%content%
</main>
</body>
</html>
"#;

/// Wraps the `content` of a page titled `title` in the shared layout.
fn layout(title: &str, content: &str) -> Html<String> {
    Html(template::apply(LAYOUT, &[("title", title), ("content", content)]))
}

/// Renders `items` as an HTML list using `render` for every item, or the paragraph `empty` if
/// there are no items.
fn list<T, F>(items: &[T], empty: &str, render: F) -> String
where
    F: Fn(&T) -> String,
{
    if items.is_empty() {
        return format!("<p>{}</p>\n", empty);
    }

    let mut output = String::from("<ul>\n");
    for item in items {
        output.push_str("<li>");
        output.push_str(&render(item));
        output.push_str("</li>\n");
    }
    output.push_str("</ul>\n");
    output
}

/// Renders the problems found in a form submission.
fn violations(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return String::new();
    }

    let mut output = String::from("<ul class=\"violations\">\n");
    for violation in violations {
        output.push_str(&format!(
            "<li data-field=\"{}\">{}</li>\n",
            violation.field, violation.message
        ));
    }
    output.push_str("</ul>\n");
    output
}

/// Renders a `<select>` option.
fn option(value: &str, text: &str, selected: bool) -> String {
    let selected = if selected { " selected" } else { "" };
    format!("<option value=\"{}\"{}>{}</option>\n", value, selected, text)
}

/// Renders a link to `url` with `text` as its content.
fn link(url: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", url, text)
}

/// Delete form shared by all confirmation pages.
const DELETE_FORM: &str = r#"<form method="POST" action="">
<button type="submit">Delete</button>
</form>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let page = layout("The title", "<p>The content</p>").0;
        assert!(page.contains("<title>The title | Local Library</title>"));
        assert!(page.contains("<h1>The title</h1>"));
        assert!(page.contains("<p>The content</p>"));
        assert!(page.contains("<a href=\"/catalog/bookinstances\">"));
    }

    #[test]
    fn test_list() {
        assert_eq!("<p>Nothing here.</p>\n", list(&[] as &[u8], "Nothing here.", |_| panic!()));
        assert_eq!(
            "<ul>\n<li>1</li>\n<li>2</li>\n</ul>\n",
            list(&[1, 2], "Nothing here.", |i| i.to_string())
        );
    }

    #[test]
    fn test_violations() {
        assert_eq!("", violations(&[]));
        assert_eq!(
            "<ul class=\"violations\">\n<li data-field=\"a\">Bad a.</li>\n</ul>\n",
            violations(&[Violation { field: "a", message: "Bad a." }])
        );
    }

    #[test]
    fn test_option() {
        assert_eq!("<option value=\"1\">One</option>\n", option("1", "One", false));
        assert_eq!("<option value=\"2\" selected>Two</option>\n", option("2", "Two", true));
    }
}
