//! Tolerant extraction of INSERT statements from a seed script.
//!
//! Seed scripts are dumps that mix comments, schema statements
//! (`CREATE TABLE ...`, `SET ...`) and one-or-more-line `INSERT` statements.
//! Only the inserts are kept. Extraction is line-oriented and keyed on the
//! trailing `;` rather than on a SQL grammar:
//!
//! - A comment or schema line ends any open statement (emitting it) and is
//!   itself dropped.
//! - An `INSERT` line opens a new statement. An open statement that never saw
//!   its `;` is discarded, not emitted.
//! - Lines are appended to the open statement until one ends with `;`.
//! - A statement still open at end of input is emitted as-is.
//!
//! Parsing never fails. Irregularities are reported as [`ParseAnomaly`]
//! values next to the statements.

use serde::Serialize;

/// Line prefixes that mark a comment.
const COMMENT_MARKERS: &[&str] = &["--", "#", "/*"];

/// Leading keywords of schema-definition and session statements.
const ADMINISTRATIVE_KEYWORDS: &[&str] = &["CREATE", "DROP", "ALTER", "SET", "LOCK", "UNLOCK"];

const INSERT_KEYWORD: &str = "INSERT";

const STATEMENT_DELIMITER: char = ';';

/// A single INSERT statement lifted from the script, original line breaks intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedStatement {
    /// Statement text, lines joined with `\n`.
    pub text: String,
    /// 1-based line number of the `INSERT` line.
    pub start_line: usize,
}

impl SeedStatement {
    /// True when the statement has no executable content.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// True when the statement ends with the delimiter.
    pub fn is_terminated(&self) -> bool {
        self.text.trim_end().ends_with(STATEMENT_DELIMITER)
    }
}

/// Why an unterminated statement was emitted anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlushCause {
    /// A comment or schema line at `line` interrupted the statement.
    AdministrativeLine { line: usize },
    /// The script ended.
    EndOfInput,
}

/// Irregularity found while extracting statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseAnomaly {
    /// An unterminated statement was dropped because another INSERT began.
    DiscardedUnterminated {
        start_line: usize,
        interrupted_at: usize,
    },
    /// An unterminated statement was emitted without its delimiter.
    FlushedUnterminated { start_line: usize, cause: FlushCause },
}

/// Output of [`SeedScriptParser::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedScript {
    /// Extracted statements, in script order.
    pub statements: Vec<SeedStatement>,
    /// Irregularities, in the order they were found.
    pub anomalies: Vec<ParseAnomaly>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Administrative,
    Insert,
    Other,
}

/// Statement under accumulation.
struct OpenStatement {
    start_line: usize,
    lines: Vec<String>,
}

impl OpenStatement {
    fn into_statement(self) -> SeedStatement {
        SeedStatement {
            text: self.lines.join("\n"),
            start_line: self.start_line,
        }
    }
}

/// Single-pass scanner over a seed script.
#[derive(Default)]
pub struct SeedScriptParser {
    open: Option<OpenStatement>,
    output: ParsedScript,
}

impl SeedScriptParser {
    /// Extract every INSERT statement from `script`.
    pub fn parse(script: &str) -> ParsedScript {
        let mut parser = Self::default();
        for (idx, line) in script.lines().enumerate() {
            parser.feed(idx + 1, line);
        }
        parser.finish()
    }

    fn feed(&mut self, line_no: usize, line: &str) {
        match classify(line) {
            LineKind::Administrative => {
                if let Some(open) = self.open.take() {
                    self.flush_unterminated(
                        open,
                        FlushCause::AdministrativeLine { line: line_no },
                    );
                }
            }
            LineKind::Insert => {
                if let Some(previous) = self.open.take() {
                    log::debug!(
                        "Seed script: discarding unterminated INSERT from line {} (new INSERT at line {})",
                        previous.start_line,
                        line_no
                    );
                    self.output
                        .anomalies
                        .push(ParseAnomaly::DiscardedUnterminated {
                            start_line: previous.start_line,
                            interrupted_at: line_no,
                        });
                }
                self.open = Some(OpenStatement {
                    start_line: line_no,
                    lines: Vec::new(),
                });
                self.append(line);
            }
            LineKind::Other => {
                if self.open.is_some() {
                    self.append(line);
                }
            }
        }
    }

    /// Append `line` to the open statement and close it on a trailing delimiter.
    fn append(&mut self, line: &str) {
        let Some(open) = self.open.as_mut() else {
            return;
        };
        open.lines.push(line.to_string());

        if line.trim_end().ends_with(STATEMENT_DELIMITER) {
            if let Some(done) = self.open.take() {
                self.output.statements.push(done.into_statement());
            }
        }
    }

    fn flush_unterminated(&mut self, open: OpenStatement, cause: FlushCause) {
        log::debug!(
            "Seed script: emitting unterminated INSERT from line {} ({:?})",
            open.start_line,
            cause
        );
        self.output.anomalies.push(ParseAnomaly::FlushedUnterminated {
            start_line: open.start_line,
            cause,
        });
        self.output.statements.push(open.into_statement());
    }

    fn finish(mut self) -> ParsedScript {
        if let Some(open) = self.open.take() {
            self.flush_unterminated(open, FlushCause::EndOfInput);
        }
        self.output
    }
}

/// Extract the INSERT statements from `script`, dropping anomaly details.
pub fn parse_seed_script(script: &str) -> Vec<SeedStatement> {
    SeedScriptParser::parse(script).statements
}

fn classify(line: &str) -> LineKind {
    let trimmed = line.trim_start();
    if COMMENT_MARKERS.iter().any(|m| trimmed.starts_with(m)) {
        return LineKind::Administrative;
    }
    if starts_with_keyword(trimmed, INSERT_KEYWORD) {
        return LineKind::Insert;
    }
    if ADMINISTRATIVE_KEYWORDS
        .iter()
        .any(|kw| starts_with_keyword(trimmed, kw))
    {
        return LineKind::Administrative;
    }
    LineKind::Other
}

/// Case-insensitive keyword match that rejects longer identifiers
/// (`SETTINGS` does not start with the keyword `SET`).
fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    let Some(head) = text.get(..keyword.len()) else {
        return false;
    };
    if !head.eq_ignore_ascii_case(keyword) {
        return false;
    }
    text[keyword.len()..]
        .chars()
        .next()
        .map_or(true, |c| !(c.is_alphanumeric() || c == '_'))
}

#[cfg(test)]
#[path = "seed_script_test.rs"]
mod tests;
