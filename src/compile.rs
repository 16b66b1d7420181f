// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

#[cfg(test)]
mod tests;

use std::{fs, path::Path};

use anyhow::{Context, Error};

use crate::{
    ast::{dump_template, Template},
    error::SyntaxError,
    parser::Parser,
    syntax_check::check_template,
};

/// Parses a template and checks its structure.
pub fn compile_template(parser: &Parser, filename: &str, source: &str) -> Result<Template, SyntaxError> {
    let template = parser.parse(filename, source)?;
    tracing::debug!(filename, "parsed template");

    let template = check_template(template)?;
    tracing::debug!(filename, "checked template");
    Ok(template)
}

/// Compiles a template and renders its AST.
pub fn compile_template_str(parser: &Parser, filename: &str, source: &str) -> Result<String, SyntaxError> {
    let template = compile_template(parser, filename, source)?;
    Ok(dump_template(&template))
}

pub fn compile_file(parser: &Parser, path: &Path) -> Result<Template, Error> {
    let source = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path.display().to_string();
    let template = compile_template(parser, &filename, &source)?;
    Ok(template)
}
