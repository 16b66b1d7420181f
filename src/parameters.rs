// Copyright (c) Chris Gunn.
// Licensed under the MIT license.


use std::collections::VecDeque;

use crate::{
    ast::{Expr, Parameters},
    error::SyntaxError,
};

/// The type class a parameter accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterKind {
    /// Only array (or hash) literals.
    Array,
    /// Anything but array literals.
    Value,
}

impl ParameterKind {
    pub fn accepts(self, expr: &Expr) -> bool {
        match self {
            ParameterKind::Array => expr.is_array_literal(),
            ParameterKind::Value => !expr.is_array_literal(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    /// `None` marks the parameter as required.
    pub default: Option<Expr>,
}

/// Ordered parameter declarations of a directive.
///
/// Order decides which parameter gets the first claim on an expression, so two
/// adjacent optional parameters of the same kind are filled front to back.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterSchema {
    specs: Vec<ParameterSpec>,
}

impl ParameterSchema {
    pub fn new() -> ParameterSchema {
        ParameterSchema::default()
    }

    pub fn array(self, name: &str, default: Expr) -> ParameterSchema {
        self.with(name, ParameterKind::Array, Some(default))
    }

    pub fn value(self, name: &str, default: Expr) -> ParameterSchema {
        self.with(name, ParameterKind::Value, Some(default))
    }

    pub fn required_array(self, name: &str) -> ParameterSchema {
        self.with(name, ParameterKind::Array, None)
    }

    pub fn required_value(self, name: &str) -> ParameterSchema {
        self.with(name, ParameterKind::Value, None)
    }

    /// Appends a parameter. Panics on a duplicate name.
    pub fn with(mut self, name: &str, kind: ParameterKind, default: Option<Expr>) -> ParameterSchema {
        assert!(
            self.specs.iter().all(|spec| spec.name != name),
            "parameter {:?} declared twice",
            name
        );
        self.specs.push(ParameterSpec {
            name: name.to_string(),
            kind,
            default,
        });
        self
    }

    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Binds parsed expressions to the schema's parameters.
///
/// Each parameter, in schema order, takes the next pending expression if that
/// expression fits its kind, and falls back to its default otherwise.
pub fn bind_parameters(schema: &ParameterSchema, expressions: Vec<Expr>) -> Result<Parameters, SyntaxError> {
    let mut pending = VecDeque::from(expressions);
    let mut parameters = Parameters::new();

    for spec in schema.specs() {
        match pending.pop_front() {
            Some(expr) if spec.kind.accepts(&expr) => {
                parameters.insert(spec.name.clone(), expr);
                continue;
            }
            // Not a fit; leave it for the next parameter.
            Some(expr) => pending.push_front(expr),
            None => {}
        }

        match &spec.default {
            Some(default) => {
                parameters.insert(spec.name.clone(), default.clone());
            }
            None => {
                tracing::debug!(parameter = %spec.name, "required parameter has no expression");
                return Err(SyntaxError::new("A required parameter is missing"));
            }
        }
    }

    if !pending.is_empty() {
        tracing::debug!(unmatched = pending.len(), "expressions left after binding");
        return Err(SyntaxError::new("Too many parameters"));
    }

    Ok(parameters)
}
