use super::*;

fn texts(script: &str) -> Vec<String> {
    parse_seed_script(script)
        .into_iter()
        .map(|s| s.text)
        .collect()
}

// ── Well-formed scripts ────────────────────────────────────────────────

#[test]
fn test_interleaved_script_yields_inserts_in_order() {
    let script = "\
-- Stockroom baseline data
SET NAMES utf8mb4;
DROP TABLE IF EXISTS Items;
CREATE TABLE Items (
  Id int NOT NULL,
  Name longtext NOT NULL,
  PRIMARY KEY (Id)
);
/* items */
INSERT INTO Items (Id, Name) VALUES
  (1, 'Scalpel'),
  (2, 'Forceps');
-- units
INSERT INTO Units (Id, Name, ItemId) VALUES
  (1, 'Box of 10', 1);
# events
INSERT INTO Events (Id, Name) VALUES (1, 'Knee replacement');
";
    let parsed = SeedScriptParser::parse(script);
    assert!(parsed.anomalies.is_empty());
    assert_eq!(parsed.statements.len(), 3);
    assert_eq!(
        parsed.statements[0].text,
        "INSERT INTO Items (Id, Name) VALUES\n  (1, 'Scalpel'),\n  (2, 'Forceps');"
    );
    assert_eq!(
        parsed.statements[1].text,
        "INSERT INTO Units (Id, Name, ItemId) VALUES\n  (1, 'Box of 10', 1);"
    );
    assert_eq!(
        parsed.statements[2].text,
        "INSERT INTO Events (Id, Name) VALUES (1, 'Knee replacement');"
    );
    for stmt in &parsed.statements {
        assert!(stmt.is_terminated());
        assert!(!stmt.text.contains("CREATE"));
        assert!(!stmt.text.contains("PRIMARY KEY"));
        assert!(!stmt.text.contains("--"));
    }
}

#[test]
fn test_start_lines_are_one_based() {
    let script = "-- header\nINSERT INTO Items VALUES (1);\n\nINSERT INTO Items\nVALUES (2);";
    let parsed = parse_seed_script(script);
    assert_eq!(parsed[0].start_line, 2);
    assert_eq!(parsed[1].start_line, 4);
}

#[test]
fn test_insert_keyword_is_case_insensitive() {
    let script = "insert into Items values (1);\n  Insert Into Items values (2);";
    assert_eq!(
        texts(script),
        vec![
            "insert into Items values (1);",
            "  Insert Into Items values (2);"
        ]
    );
}

#[test]
fn test_blank_lines_inside_statement_are_kept() {
    let script = "INSERT INTO Items VALUES\n\n  (1);";
    assert_eq!(texts(script), vec!["INSERT INTO Items VALUES\n\n  (1);"]);
}

#[test]
fn test_trailing_whitespace_after_delimiter_closes_statement() {
    let script = "INSERT INTO Items VALUES (1);   \nINSERT INTO Items VALUES (2);";
    let parsed = SeedScriptParser::parse(script);
    assert_eq!(parsed.statements.len(), 2);
    assert!(parsed.anomalies.is_empty());
}

#[test]
fn test_crlf_line_endings() {
    let script = "-- c\r\nINSERT INTO Items VALUES\r\n  (1);\r\n";
    assert_eq!(texts(script), vec!["INSERT INTO Items VALUES\n  (1);"]);
}

// ── Administrative lines ───────────────────────────────────────────────

#[test]
fn test_lines_outside_statements_are_ignored() {
    let script = "CREATE TABLE Units (\n  Id int,\n  ItemId int\n);\nVALUES (9);\n";
    let parsed = SeedScriptParser::parse(script);
    assert!(parsed.statements.is_empty());
    assert!(parsed.anomalies.is_empty());
}

#[test]
fn test_indented_comment_is_administrative() {
    let script = "INSERT INTO Items VALUES\n   -- inline note\n  (1);";
    let parsed = SeedScriptParser::parse(script);
    assert_eq!(parsed.statements.len(), 1);
    assert_eq!(parsed.statements[0].text, "INSERT INTO Items VALUES");
    assert_eq!(
        parsed.anomalies,
        vec![ParseAnomaly::FlushedUnterminated {
            start_line: 1,
            cause: FlushCause::AdministrativeLine { line: 2 },
        }]
    );
}

#[test]
fn test_schema_line_flushes_open_statement() {
    let script = "INSERT INTO Items VALUES (1),\n(2)\nALTER TABLE Items ADD COLUMN x int;\n";
    let parsed = SeedScriptParser::parse(script);
    assert_eq!(
        parsed.statements,
        vec![SeedStatement {
            text: "INSERT INTO Items VALUES (1),\n(2)".to_string(),
            start_line: 1,
        }]
    );
    assert!(!parsed.statements[0].is_terminated());
}

#[test]
fn test_keyword_must_be_whole_word() {
    let script = "INSERT INTO Items VALUES\nsettings_note,\nINSERTED (1);";
    // `settings_note` and `INSERTED` are plain continuation lines.
    assert_eq!(
        texts(script),
        vec!["INSERT INTO Items VALUES\nsettings_note,\nINSERTED (1);"]
    );
}

// ── Anomalies ──────────────────────────────────────────────────────────

#[test]
fn test_unterminated_insert_discarded_when_next_insert_begins() {
    let script = "INSERT INTO Items VALUES (1)\nINSERT INTO Items VALUES (2);";
    let parsed = SeedScriptParser::parse(script);
    assert_eq!(
        parsed.statements,
        vec![SeedStatement {
            text: "INSERT INTO Items VALUES (2);".to_string(),
            start_line: 2,
        }]
    );
    assert_eq!(
        parsed.anomalies,
        vec![ParseAnomaly::DiscardedUnterminated {
            start_line: 1,
            interrupted_at: 2,
        }]
    );
}

#[test]
fn test_end_of_input_flushes_open_statement() {
    let script = "INSERT INTO Items VALUES (1);\nINSERT INTO Items VALUES\n  (2),\n  (3)";
    let parsed = SeedScriptParser::parse(script);
    assert_eq!(parsed.statements.len(), 2);
    assert_eq!(
        parsed.statements[1].text,
        "INSERT INTO Items VALUES\n  (2),\n  (3)"
    );
    assert_eq!(
        parsed.anomalies,
        vec![ParseAnomaly::FlushedUnterminated {
            start_line: 2,
            cause: FlushCause::EndOfInput,
        }]
    );
}

#[test]
fn test_empty_script() {
    let parsed = SeedScriptParser::parse("");
    assert_eq!(parsed, ParsedScript::default());
}

#[test]
fn test_starts_with_keyword() {
    assert!(starts_with_keyword("SET NAMES utf8", "SET"));
    assert!(starts_with_keyword("set", "SET"));
    assert!(starts_with_keyword("Drop table x", "DROP"));
    assert!(!starts_with_keyword("SETUP", "SET"));
    assert!(!starts_with_keyword("SE", "SET"));
    assert!(!starts_with_keyword("créate", "CREATE"));
}
