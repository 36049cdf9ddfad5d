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

//! Field-level validation and sanitization of form submissions.
//!
//! A `Validator` accumulates the violations found while checking the fields of one form.  Each
//! field is checked through a chain of rules that stops at the first failing rule, so a field
//! contributes at most one violation no matter how many rules it breaks.

use crate::model::parse_iso_date;
use locallib_core::template;

/// A single validation failure for one field.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Violation {
    /// Name of the form field that failed validation.
    pub(crate) field: &'static str,

    /// Message to show to the user.
    pub(crate) message: &'static str,
}

/// Collects the violations of all the fields of a form.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    /// Violations found so far, in the order in which fields were checked.
    violations: Vec<Violation>,
}

impl Validator {
    /// Starts checking the field `name` whose submitted value is `value`.
    pub(crate) fn field<'a>(&'a mut self, name: &'static str, value: &str) -> FieldCheck<'a> {
        FieldCheck { validator: self, name, value: value.to_owned(), failed: false }
    }

    /// Records a violation for `field` found outside of a `FieldCheck` chain, which is useful
    /// for checks that need the database.
    ///
    /// Does nothing if `field` already has a violation.
    pub(crate) fn reject(&mut self, field: &'static str, message: &'static str) {
        if !self.has_violation(field) {
            self.violations.push(Violation { field, message });
        }
    }

    /// Returns true if `field` has failed validation.
    pub(crate) fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Returns true if no field has failed validation.
    pub(crate) fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Consumes the validator and returns the violations it found.
    pub(crate) fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

/// Chain of rules applied to a single field.
#[must_use]
pub(crate) struct FieldCheck<'a> {
    /// Validator that collects the violation of this field, if any.
    validator: &'a mut Validator,

    /// Name of the field being checked.
    name: &'static str,

    /// Current value of the field after applying all sanitizers so far.
    value: String,

    /// Whether a rule already failed, in which case later rules are skipped.
    failed: bool,
}

impl FieldCheck<'_> {
    /// Applies the rule `ok` and records `message` if it does not hold.
    fn check<F: FnOnce(&str) -> bool>(mut self, ok: F, message: &'static str) -> Self {
        if !self.failed && !ok(&self.value) {
            self.validator.reject(self.name, message);
            self.failed = true;
        }
        self
    }

    /// Removes leading and trailing whitespace from the value.
    pub(crate) fn trim(mut self) -> Self {
        self.value = self.value.trim().to_owned();
        self
    }

    /// Requires the value to not be empty.
    pub(crate) fn not_empty(self, message: &'static str) -> Self {
        self.check(|v| !v.is_empty(), message)
    }

    /// Requires the value to have at least `min` characters.
    pub(crate) fn min_chars(self, min: usize, message: &'static str) -> Self {
        self.check(|v| v.chars().count() >= min, message)
    }

    /// Requires the value to have at most `max` characters.
    pub(crate) fn max_chars(self, max: usize, message: &'static str) -> Self {
        self.check(|v| v.chars().count() <= max, message)
    }

    /// Requires the value to only contain letters and digits.
    pub(crate) fn alphanumeric(self, message: &'static str) -> Self {
        self.check(|v| v.chars().all(|ch| ch.is_ascii_alphanumeric()), message)
    }

    /// Requires the value to be a `YYYY-MM-DD` date if it is not empty.
    pub(crate) fn optional_iso_date(self, message: &'static str) -> Self {
        self.check(|v| v.is_empty() || parse_iso_date(v).is_ok(), message)
    }

    /// Requires the value to be one of `choices`.  Empty values are accepted when `allow_empty`
    /// is true.
    pub(crate) fn one_of(self, choices: &[&str], allow_empty: bool, message: &'static str) -> Self {
        self.check(|v| (allow_empty && v.is_empty()) || choices.contains(&v), message)
    }

    /// Replaces HTML metacharacters in the value with their entities.
    pub(crate) fn escape(mut self) -> Self {
        self.value = template::escape(&self.value);
        self
    }

    /// Finishes the chain and returns the sanitized value.
    pub(crate) fn value(self) -> String {
        self.value
    }
}

/// Trims and escapes every value of a multi-valued field.
pub(crate) fn sanitize_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| template::escape(v.trim())).collect()
}
