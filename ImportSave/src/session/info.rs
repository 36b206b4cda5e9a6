//! Rendering of the package `Info` entry

use std::fmt::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::SessionMetadata;
use crate::error::Result;

const INDENT: &str = "    ";

/// Compose the `Info` text for a converted session, stamped with the current time
///
/// # Errors
/// Returns an error if the metadata cannot be serialized.
pub fn compose_info_text(
    metadata: &SessionMetadata,
    source_path: &Path,
    source_version: i32,
) -> Result<String> {
    compose_info_text_at(metadata, source_path, source_version, Utc::now())
}

/// Compose the `Info` text with an explicit generation timestamp
///
/// # Errors
/// Returns an error if the metadata cannot be serialized.
pub fn compose_info_text_at(
    metadata: &SessionMetadata,
    source_path: &Path,
    source_version: i32,
    generated: DateTime<Utc>,
) -> Result<String> {
    let mut text = String::new();
    let _ = writeln!(text, "# Doomsday Engine saved game session package.");
    let _ = writeln!(text, "#");
    let _ = writeln!(text, "# Generator: importsave {}", crate::VERSION);
    let _ = writeln!(text, "# Generation Date: {}", generated.to_rfc2822());
    let _ = writeln!(text, "# Converted from: {}", source_path.display());
    let _ = writeln!(text, "# Source format version: {source_version}");
    text.push('\n');
    text.push_str(&render_record(&metadata.to_record()?));
    Ok(text)
}

/// Render an ordered record in `Info` syntax
#[must_use]
pub fn render_record(record: &Map<String, Value>) -> String {
    let mut out = String::new();
    write_record(&mut out, record, 0);
    out
}

fn write_record(out: &mut String, record: &Map<String, Value>, depth: usize) {
    let indent = INDENT.repeat(depth);
    for (key, value) in record {
        match value {
            Value::Null => {}
            Value::Object(nested) => {
                let _ = writeln!(out, "{indent}{key} {{");
                write_record(out, nested, depth + 1);
                let _ = writeln!(out, "{indent}}}");
            }
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(scalar).collect();
                let _ = writeln!(out, "{indent}{key} <{}>", items.join(", "));
            }
            _ => {
                let _ = writeln!(out, "{indent}{key}: {}", scalar(value));
            }
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        // Nested collections never appear inside arrays in session metadata
        other => quote(&other.to_string()),
    }
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{GameRules, MapUri, MonsterRule};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_info_text_layout() {
        let metadata = SessionMetadata {
            game_identity_key: "doom2".to_string(),
            user_description: "say \"hi\"".to_string(),
            map_uri: MapUri::flat(7),
            map_time: Some(350),
            players: Some(vec![true, false]),
            session_id: 9,
            game_rules: GameRules {
                skill: -1,
                fast: true,
                deathmatch: 1,
                no_monsters: false,
                monsters: MonsterRule::RespawnMonsters(false),
            },
        };
        let when = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let text =
            compose_info_text_at(&metadata, Path::new("saves/DOOMSAV0.dsg"), 13, when).unwrap();

        let expected = "\
# Doomsday Engine saved game session package.
#
# Generator: importsave VERSION
# Generation Date: Tue, 2 Jan 2024 03:04:05 +0000
# Converted from: saves/DOOMSAV0.dsg
# Source format version: 13

gameIdentityKey: \"doom2\"
userDescription: \"say \\\"hi\\\"\"
mapUri: \"Maps:MAP07\"
mapTime: 350
players <True, False>
sessionId: 9
gameRules {
    skill: -1
    fast: True
    deathmatch: 1
    noMonsters: False
    respawnMonsters: False
}
"
        .replace("VERSION", crate::VERSION);
        assert_eq!(text, expected);
    }
}
