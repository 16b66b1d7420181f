// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! Template compiler for spreadsheet documents.
//!
//! Templates mix host tags (`if`, `for`, `macro`) with spreadsheet directives
//! (`workbook`, `sheet`, `row`, `cell`, ...). Compiling a template parses it and
//! then checks that every element sits inside an element that may contain it.

pub mod ast;
pub mod compile;
pub mod directive;
pub mod elements;
pub mod error;
pub mod parameters;
pub mod parser;
pub mod syntax_check;
