// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Scope frames of the render context stack.
//!
//! Block helpers push a [`Scope`] while their body renders and pop it on
//! exit. Only iteration helpers attach an [`Iteration`], so `@index` and
//! friends resolve to nothing outside a loop.

use crate::value::Value;

/// Position of the current element within an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iteration {
    /// 0-based position.
    pub index: usize,
    /// Number of elements being iterated.
    pub length: usize,
}

impl Iteration {
    /// Creates the iteration state for element `index` of `length`.
    pub fn new(index: usize, length: usize) -> Self {
        Self { index, length }
    }

    /// `@first`
    pub fn first(&self) -> bool {
        self.index == 0
    }

    /// `@last`
    pub fn last(&self) -> bool {
        self.index + 1 == self.length
    }

    /// `@even`, counting from index 0.
    pub fn even(&self) -> bool {
        self.index % 2 == 0
    }

    /// `@odd`
    pub fn odd(&self) -> bool {
        !self.even()
    }

    /// Value of a pseudo-property such as `@index`, or `None` for other names.
    pub fn pseudo(&self, name: &str) -> Option<Value<'static>> {
        let value = match name {
            "@index" => Value::Int(self.index as i64),
            "@number" => Value::Int(self.index as i64 + 1),
            "@first" => Value::Bool(self.first()),
            "@last" => Value::Bool(self.last()),
            "@even" => Value::Bool(self.even()),
            "@odd" => Value::Bool(self.odd()),
            _ => return None,
        };
        Some(value)
    }
}

/// One frame of the context stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope<'a> {
    /// The current `this`.
    pub subject: Value<'a>,
    /// Resolved hash arguments of the helper call that pushed this scope.
    pub hash: Vec<(&'a str, Value<'a>)>,
    /// Present only when the scope was pushed by an iteration helper.
    pub iteration: Option<Iteration>,
}

impl<'a> Scope<'a> {
    /// A scope with the given subject and no hash arguments.
    pub fn new(subject: Value<'a>) -> Self {
        Self {
            subject,
            hash: Vec::new(),
            iteration: None,
        }
    }

    /// Attaches hash arguments.
    pub fn with_hash(mut self, hash: Vec<(&'a str, Value<'a>)>) -> Self {
        self.hash = hash;
        self
    }

    /// Attaches iteration state.
    pub fn with_iteration(mut self, iteration: Iteration) -> Self {
        self.iteration = Some(iteration);
        self
    }

    /// Looks a single name up in this frame.
    ///
    /// Pseudo-properties (`@...`) come from the iteration state; `this` is
    /// the subject itself; anything else is a subject field or, failing
    /// that, a hash argument.
    pub fn lookup(&self, name: &str) -> Value<'a> {
        if name.starts_with('@') {
            return self
                .iteration
                .and_then(|iteration| iteration.pseudo(name))
                .unwrap_or(Value::Absent);
        }
        if name == "this" {
            return self.subject.clone();
        }

        let field = self.subject.field(name);
        if !field.is_absent() {
            return field;
        }
        self.hash
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.clone())
            .unwrap_or(Value::Absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;

    #[test]
    fn test_pseudo_properties_for_every_index() {
        let length = 5;
        for index in 0..length {
            let iteration = Iteration::new(index, length);
            assert_eq!(iteration.first(), index == 0);
            assert_eq!(iteration.last(), index == length - 1);
            assert_eq!(iteration.even(), index % 2 == 0);
            assert_eq!(iteration.odd(), !iteration.even());
            assert_eq!(iteration.pseudo("@index"), Some(Value::Int(index as i64)));
        }
    }

    #[test]
    fn test_pseudo_properties_absent_outside_iteration() {
        let scope = Scope::new(Value::Int(1));
        assert_eq!(scope.lookup("@index"), Value::Absent);
        assert_eq!(scope.lookup("@first"), Value::Absent);
    }

    #[test]
    fn test_lookup_order() {
        let tag = Tag {
            name: "rust".to_string(),
            ..Tag::default()
        };
        let scope = Scope::new(Value::Tag(&tag))
            .with_hash(vec![("name", Value::str("hash")), ("extra", Value::Int(7))]);

        assert_eq!(scope.lookup("name"), Value::str("rust"));
        assert_eq!(scope.lookup("extra"), Value::Int(7));
        assert_eq!(scope.lookup("this"), Value::Tag(&tag));
        assert_eq!(scope.lookup("nothing"), Value::Absent);
    }
}
