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

//! Trivial templating engine.

/// Performs various named string replacements in `input` based on `replacements`.
///
/// The `input` string can have `%key%` strings in it where `key` must appear in `replacements` and
/// which will be replaced by its corresponding value.  Raw `%` characters can be escaped via `%%`
/// and nested expansions are not supported.
///
/// Values are inserted verbatim.  Callers are responsible for passing values that have already
/// gone through `escape` when they come from untrusted sources.
pub fn apply(input: &'static str, replacements: &[(&'static str, &str)]) -> String {
    let mut output = String::with_capacity(input.len());
    let mut partial_key: Option<String> = None;
    for ch in input.chars() {
        if ch == '%' {
            match partial_key {
                Some(key) if key.is_empty() => {
                    output.push('%');
                    partial_key = None;
                }
                Some(key) => {
                    let mut found = false;
                    for (candidate_key, value) in replacements {
                        if *candidate_key == key {
                            assert!(!found, "Found two values for replacement {}", key);
                            output.push_str(value);
                            found = true;
                        }
                    }
                    assert!(found, "No replacement for {} but it must have been defined", key);
                    partial_key = None;
                }
                None => partial_key = Some(String::new()),
            }
        } else {
            match partial_key.as_mut() {
                Some(k) => k.push(ch),
                None => output.push(ch),
            }
        }
    }
    output
}

/// Replaces the characters of `input` that have a meaning in HTML with their entities so that
/// the result can be stored and later embedded in any text or attribute context.
pub fn escape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '/' => output.push_str("&#x2F;"),
            '\\' => output.push_str("&#x5C;"),
            '`' => output.push_str("&#96;"),
            ch => output.push(ch),
        }
    }
    output
}
