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

//! Identifiers of the catalog entities.

use locallib_core::model::ModelError;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Defines a new identifier type named `$name` for entities described as `$what`.
macro_rules! define_id [
    ( $name:ident, $what:literal ) => {
        #[doc = concat!("Opaque identifier of ", $what, ".")]
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub(crate) struct $name(Uuid);

        impl $name {
            /// Generates a new random identifier.
            pub(crate) fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the UUID backing this identifier.
            pub(crate) fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| ModelError(format!("Invalid identifier for {}: '{}'", $what, s)))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    }
];

define_id!(AuthorId, "an author");
define_id!(BookId, "a book");
define_id!(BookInstanceId, "a book copy");
define_id!(GenreId, "a genre");
