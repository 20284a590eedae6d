//! SQL script sources.
//!
//! Scripts never enter the row model. The text is split into statements on
//! `;` outside of quoted strings, quoted identifiers and comments, and the
//! statements are handed to the database as written.

use super::{FormatParser, ParseOptions, ParsedSource, Script, line_column};
use crate::error::{DatasetError, DatasetResult};
use crate::format::FixtureFormat;

/// Parser for SQL script sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlScriptParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Code,
	SingleQuote,
	DoubleQuote,
	LineComment,
	BlockComment,
}

/// Splits a script into statements. Empty statements are dropped.
pub fn split_statements(source_name: &str, content: &str) -> DatasetResult<Vec<String>> {
	let mut statements = Vec::new();
	let mut current = String::new();
	let mut state = State::Code;
	let mut opened_at = 0usize;
	let mut chars = content.char_indices().peekable();

	while let Some((offset, ch)) = chars.next() {
		match state {
			State::Code => match ch {
				';' => {
					push_statement(&mut statements, &mut current);
					continue;
				}
				'\'' => {
					state = State::SingleQuote;
					opened_at = offset;
				}
				'"' => {
					state = State::DoubleQuote;
					opened_at = offset;
				}
				'-' if matches!(chars.peek(), Some((_, '-'))) => {
					chars.next();
					state = State::LineComment;
					continue;
				}
				'/' if matches!(chars.peek(), Some((_, '*'))) => {
					chars.next();
					state = State::BlockComment;
					opened_at = offset;
					continue;
				}
				_ => {}
			},
			State::SingleQuote if ch == '\'' => {
				// '' is an escaped quote
				if matches!(chars.peek(), Some((_, '\''))) {
					current.push(ch);
					chars.next();
				} else {
					state = State::Code;
				}
			}
			State::DoubleQuote if ch == '"' => state = State::Code,
			State::LineComment => {
				if ch == '\n' {
					state = State::Code;
					current.push(ch);
				}
				continue;
			}
			State::BlockComment => {
				if ch == '*' && matches!(chars.peek(), Some((_, '/'))) {
					chars.next();
					state = State::Code;
					current.push(' ');
				}
				continue;
			}
			_ => {}
		}
		current.push(ch);
	}

	match state {
		State::SingleQuote | State::DoubleQuote => Err(DatasetError::malformed_at(
			source_name,
			line_column(content, opened_at),
			"unterminated quoted string",
		)),
		State::BlockComment => Err(DatasetError::malformed_at(
			source_name,
			line_column(content, opened_at),
			"unterminated block comment",
		)),
		State::Code | State::LineComment => {
			push_statement(&mut statements, &mut current);
			Ok(statements)
		}
	}
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
	let statement = current.trim();
	if !statement.is_empty() {
		statements.push(statement.to_string());
	}
	current.clear();
}

impl FormatParser for SqlScriptParser {
	fn format(&self) -> FixtureFormat {
		FixtureFormat::Sql
	}

	fn parse(
		&self,
		source_name: &str,
		content: &str,
		_options: &ParseOptions,
	) -> DatasetResult<ParsedSource> {
		let statements = split_statements(source_name, content)?;
		Ok(ParsedSource::Script(Script {
			source_name: source_name.to_string(),
			statements,
		}))
	}
}
