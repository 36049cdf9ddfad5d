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

//! Coercion of raw form submissions into the driver's field types.

use crate::driver::BookFields;
use locallib_core::rest::{RestError, RestResult};
use serde::de::value::{Error as ValueError, MapDeserializer};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Builds the fields of a form whose keys are all single-valued from the raw `pairs` of a
/// submission.
///
/// As with `book_fields`, the last occurrence of a repeated key wins and unknown keys are ignored.
pub(super) fn single_valued<T: DeserializeOwned>(pairs: Vec<(String, String)>) -> RestResult<T> {
    let fields: BTreeMap<String, String> = pairs.into_iter().collect();
    Deserialize::deserialize(MapDeserializer::<_, ValueError>::new(fields.into_iter()))
        .map_err(|e| RestError::InvalidRequest(format!("Invalid form: {}", e)))
}

/// Builds the fields of a book form from the raw `pairs` of a submission.
///
/// Browsers send one `genre` pair per checked box, so `genre` is collected into a sequence no
/// matter how many times it appears.  Unknown keys are ignored and, for single-valued fields,
/// the last occurrence wins.
pub(super) fn book_fields(pairs: Vec<(String, String)>) -> BookFields {
    let mut fields = BookFields::default();
    for (key, value) in pairs {
        match key.as_str() {
            "title" => fields.title = value,
            "author" => fields.author = value,
            "summary" => fields.summary = value,
            "isbn" => fields.isbn = value,
            "genre" => fields.genre.push(value),
            _ => (),
        }
    }
    fields
}
