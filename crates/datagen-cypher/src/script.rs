//! Structural reader for emitted Cypher scripts.
//!
//! Loaders must run each `:param` directive together with the statement that
//! follows it. Splitting the document on `;` breaks as soon as a payload
//! string contains a semicolon, so the reader parses each unit instead:
//!
//! 1. comment lines (`//`) and blank lines are skipped
//! 2. `:param <name> =>` is read, then exactly one JSON value is consumed with
//!    a streaming JSON parser, followed by `;`
//! 3. the statement runs up to the first line ending in `;`

use crate::error::ScriptError;
use serde_json::Value;

/// One parameter assignment and the statement that consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptUnit {
    /// Parameter name (without `$`)
    pub parameter: String,
    /// Parsed payload
    pub payload: Value,
    /// Statement text without the terminating `;`
    pub statement: String,
    /// 1-based line of the `:param` directive
    pub line: usize,
}

impl ScriptUnit {
    /// Number of rows in the payload (0 when it is not an array).
    pub fn rows(&self) -> usize {
        self.payload.as_array().map_or(0, Vec::len)
    }

    /// Whether the statement references `$parameter`.
    pub fn references_parameter(&self) -> bool {
        let needle = format!("${}", self.parameter);
        self.statement.match_indices(&needle).any(|(at, _)| {
            self.statement[at + needle.len()..]
                .chars()
                .next()
                .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_'))
        })
    }
}

/// Iterator over the units of an emitted script.
pub struct ScriptReader<'a> {
    text: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> ScriptReader<'a> {
    /// Create a reader over a script.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            failed: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn line_at(&self, pos: usize) -> usize {
        self.text[..pos].matches('\n').count() + 1
    }

    /// Skip whitespace and comment lines.
    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();
            if trimmed.starts_with("//") {
                let line_len = trimmed.find('\n').map_or(trimmed.len(), |i| i + 1);
                self.pos += line_len;
            } else {
                return;
            }
        }
    }

    fn skip_inline_spaces(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches([' ', '\t']);
        self.pos += rest.len() - trimmed.len();
    }

    fn read_unit(&mut self) -> Result<ScriptUnit, ScriptError> {
        let line = self.line_at(self.pos);
        let Some(after) = self.rest().strip_prefix(":param") else {
            let found = self.rest().lines().next().unwrap_or_default().to_string();
            return Err(ScriptError::ExpectedParam { line, found });
        };
        self.pos = self.text.len() - after.len();
        self.skip_inline_spaces();

        let name_len = self
            .rest()
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(self.rest().len());
        if name_len == 0 {
            return Err(ScriptError::MissingParamName { line });
        }
        let parameter = self.rest()[..name_len].to_string();
        self.pos += name_len;
        self.skip_inline_spaces();

        let Some(after) = self.rest().strip_prefix("=>") else {
            return Err(ScriptError::ExpectedArrow { line, parameter });
        };
        self.pos = self.text.len() - after.len();

        let mut stream = serde_json::Deserializer::from_str(self.rest()).into_iter::<Value>();
        let payload = match stream.next() {
            Some(Ok(value)) => value,
            Some(Err(source)) => {
                return Err(ScriptError::Payload {
                    line,
                    parameter,
                    source,
                })
            }
            None => return Err(ScriptError::ExpectedSemicolon { line, parameter }),
        };
        self.pos += stream.byte_offset();
        self.skip_inline_spaces();

        let Some(after) = self.rest().strip_prefix(';') else {
            return Err(ScriptError::ExpectedSemicolon { line, parameter });
        };
        self.pos = self.text.len() - after.len();

        let statement = self.read_statement(line, &parameter)?;
        Ok(ScriptUnit {
            parameter,
            payload,
            statement,
            line,
        })
    }

    /// Read statement lines up to the first line ending in `;`.
    fn read_statement(&mut self, line: usize, parameter: &str) -> Result<String, ScriptError> {
        self.skip_trivia();
        let mut lines = Vec::new();
        loop {
            let rest = self.rest();
            if rest.is_empty() || rest.starts_with(":param") {
                return Err(ScriptError::UnterminatedStatement {
                    line,
                    parameter: parameter.to_string(),
                });
            }
            let (current, consumed) = match rest.find('\n') {
                Some(i) => (&rest[..i], i + 1),
                None => (rest, rest.len()),
            };
            self.pos += consumed;

            let current = current.trim_end();
            if let Some(last) = current.strip_suffix(';') {
                lines.push(last);
                return Ok(lines.join("\n"));
            }
            lines.push(current);
        }
    }
}

impl Iterator for ScriptReader<'_> {
    type Item = Result<ScriptUnit, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_trivia();
        if self.rest().is_empty() {
            return None;
        }
        let unit = self.read_unit();
        self.failed = unit.is_err();
        Some(unit)
    }
}

/// Parse every unit of a script.
pub fn parse_script(text: &str) -> Result<Vec<ScriptUnit>, ScriptError> {
    ScriptReader::new(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCRIPT: &str = r#"// Generated by graph-datagen on 2024-03-15T09:00:00
// Schema: schema_analysis.json

// --- Recommended Indexes/Constraints (run manually before loading data) ---
// CREATE CONSTRAINT IF NOT EXISTS FOR (n:Customer) REQUIRE n.customerID IS UNIQUE;

// --- Creating nodes for Label: Customer ---
:param nodes_Customer => [{"customerID":"Customer_0001","note":"a;b\n:param x => 1;"}];
UNWIND $nodes_Customer AS node_props
MERGE (n:Customer { customerID: node_props.customerID })
SET n += node_props;

// --- Creating relationships: (Customer)-[:PLACED]->(Order) ---
:param rels_Customer_PLACED_Order => [{"source_id":"Customer_0001","target_id":1,"properties":{}}];
UNWIND $rels_Customer_PLACED_Order AS rel_data
MATCH (a:Customer { customerID: rel_data.source_id })
MATCH (b:Order { orderID: rel_data.target_id })
MERGE (a)-[r:PLACED]->(b)
SET r = rel_data.properties;

"#;

    #[test]
    fn test_parse_units_with_semicolons_in_payload() {
        let units = parse_script(SCRIPT).unwrap();
        assert_eq!(units.len(), 2);

        let nodes = &units[0];
        assert_eq!(nodes.parameter, "nodes_Customer");
        assert_eq!(nodes.line, 8);
        assert_eq!(nodes.payload[0]["note"], json!("a;b\n:param x => 1;"));
        assert_eq!(
            nodes.statement,
            "UNWIND $nodes_Customer AS node_props\n\
             MERGE (n:Customer { customerID: node_props.customerID })\n\
             SET n += node_props"
        );
        assert!(nodes.references_parameter());
        assert_eq!(nodes.rows(), 1);

        let rels = &units[1];
        assert_eq!(rels.parameter, "rels_Customer_PLACED_Order");
        assert_eq!(rels.payload[0]["target_id"], json!(1));
        assert!(rels.statement.ends_with("SET r = rel_data.properties"));
    }

    #[test]
    fn test_references_parameter_matches_whole_name() {
        let unit = ScriptUnit {
            parameter: "nodes_A".into(),
            payload: json!([]),
            statement: "UNWIND $nodes_AB AS node_props".into(),
            line: 1,
        };
        assert!(!unit.references_parameter());
    }

    #[test]
    fn test_unterminated_statement() {
        let script = ":param p => [];\nUNWIND $p AS row\n:param q => [];\nRETURN 1;\n";
        assert!(matches!(
            parse_script(script),
            Err(ScriptError::UnterminatedStatement { line: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_payload() {
        let script = "\n:param p => [{\"a\": }];\nRETURN 1;\n";
        assert!(matches!(
            parse_script(script),
            Err(ScriptError::Payload { line: 2, .. })
        ));
    }

    #[test]
    fn test_stray_content() {
        let script = "MATCH (n) RETURN n;\n";
        let mut reader = ScriptReader::new(script);
        assert!(matches!(
            reader.next(),
            Some(Err(ScriptError::ExpectedParam { line: 1, .. }))
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_missing_semicolon_after_payload() {
        let script = ":param p => [1]\nRETURN 1;\n";
        assert!(matches!(
            parse_script(script),
            Err(ScriptError::ExpectedSemicolon { .. })
        ));
    }
}
