//! Command front end
//!
//! This module provides:
//! - `parser`: lexer and parser for the supported statements
//! - `executor`: statement execution against the table store
//! - `engine`: the session that ties the two together

pub mod engine;
pub mod executor;
pub mod parser;
