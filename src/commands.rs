//! Line-oriented commands against a sheet registry.
//!
//! ```text
//! create A:string B:boolean C:string
//! set 1 A 10 hello
//! set 1 C 1 lookup(A,10)
//! get 1
//! forward 1
//! reverse 1
//! ```

use cellgraph_core::{ColumnDefinition, ColumnType, ErrorResponse, SheetId, SheetRegistry};
use serde::Serialize;

use crate::error::{CommandError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create(Vec<ColumnDefinition>),
    Set {
        sheet: SheetId,
        column: String,
        row: usize,
        raw_value: String,
    },
    Get(SheetId),
    Forward(SheetId),
    Reverse(SheetId),
}

impl Command {
    /// Parse one command line. Returns None for blank lines and `#` comments.
    pub fn parse(line: &str) -> Option<Result<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (name, rest) = split_token(line);
        Some(match name {
            "create" => parse_create(rest),
            "set" => parse_set(rest),
            "get" => parse_sheet_id(rest, "get <sheet>").map(Command::Get),
            "forward" => parse_sheet_id(rest, "forward <sheet>").map(Command::Forward),
            "reverse" => parse_sheet_id(rest, "reverse <sheet>").map(Command::Reverse),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        })
    }
}

/// Split off the first whitespace-delimited token.
fn split_token(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(pos) => (&input[..pos], input[pos..].trim_start()),
        None => (input, ""),
    }
}

fn parse_create(rest: &str) -> Result<Command> {
    let columns = rest
        .split_whitespace()
        .map(|column| {
            let (name, ty) = column.split_once(':').ok_or_else(|| CommandError::InvalidColumn {
                column: column.to_string(),
                message: "expected <name>:<type>".to_string(),
            })?;
            let column_type =
                ty.parse::<ColumnType>()
                    .map_err(|message| CommandError::InvalidColumn {
                        column: column.to_string(),
                        message,
                    })?;
            Ok(ColumnDefinition::new(name, column_type))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Command::Create(columns))
}

fn parse_set(rest: &str) -> Result<Command> {
    const USAGE: &str = "set <sheet> <column> <row> <raw value>";
    let (sheet, rest) = split_token(rest);
    let (column, rest) = split_token(rest);
    let (row, raw_value) = split_token(rest);
    if column.is_empty() || row.is_empty() {
        return Err(CommandError::Usage(USAGE));
    }
    Ok(Command::Set {
        sheet: parse_sheet_id(sheet, USAGE)?,
        column: column.to_string(),
        row: row
            .parse()
            .map_err(|_| CommandError::InvalidRow(row.to_string()))?,
        raw_value: raw_value.to_string(),
    })
}

fn parse_sheet_id(input: &str, usage: &'static str) -> Result<SheetId> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    input
        .parse()
        .map_err(|_| CommandError::InvalidSheetId(input.to_string()))
}

/// A registry plus output settings.
pub struct Session {
    registry: SheetRegistry,
    pretty: bool,
}

impl Session {
    pub fn new(pretty: bool) -> Self {
        Session {
            registry: SheetRegistry::new(),
            pretty,
        }
    }

    /// Run a command and render its output.
    pub fn execute(&self, command: Command) -> Result<String> {
        match command {
            Command::Create(columns) => Ok(self.registry.create_sheet(columns).to_string()),
            Command::Set {
                sheet,
                column,
                row,
                raw_value,
            } => {
                self.registry.set_cell(sheet, &column, row, &raw_value)?;
                Ok("ok".to_string())
            }
            Command::Get(sheet) => self.to_json(&self.registry.sheet_data(sheet)?),
            Command::Forward(sheet) => self.to_json(&self.registry.forward_dependencies(sheet)?),
            Command::Reverse(sheet) => self.to_json(&self.registry.reverse_dependencies(sheet)?),
        }
    }

    /// Parse and run one line. Sheet failures are rendered as an error
    /// payload in the `Err` string; usage errors keep their message.
    pub fn run_line(&self, line: &str) -> Option<std::result::Result<String, String>> {
        let command = match Command::parse(line)? {
            Ok(command) => command,
            Err(err) => return Some(Err(format!("error: {}", err))),
        };
        Some(self.execute(command).map_err(|err| self.render_error(&err)))
    }

    fn render_error(&self, err: &CommandError) -> String {
        match err {
            CommandError::Sheet(sheet_err) => self
                .to_json(&ErrorResponse::from(sheet_err))
                .unwrap_or_else(|_| sheet_err.to_string()),
            other => format!("error: {}", other),
        }
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let cmd = Command::parse("create A:string B:BOOLEAN").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Create(vec![
                ColumnDefinition::new("A", ColumnType::String),
                ColumnDefinition::new("B", ColumnType::Boolean),
            ])
        );
        assert!(Command::parse("create A:float").unwrap().is_err());
        assert!(Command::parse("create A").unwrap().is_err());
    }

    #[test]
    fn test_parse_set_keeps_raw_remainder() {
        let cmd = Command::parse("set 1 C 2 lookup(A,  10)").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Set {
                sheet: 1,
                column: "C".into(),
                row: 2,
                raw_value: "lookup(A,  10)".into(),
            }
        );
        assert!(matches!(
            Command::parse("set 1 C").unwrap(),
            Err(CommandError::Usage(_))
        ));
        assert!(matches!(
            Command::parse("set 1 C -2 x").unwrap(),
            Err(CommandError::InvalidRow(_))
        ));
    }

    #[test]
    fn test_skips_blank_and_comments() {
        assert!(Command::parse("   ").is_none());
        assert!(Command::parse("# note").is_none());
        assert!(matches!(
            Command::parse("drop 1").unwrap(),
            Err(CommandError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_session_renders_errors() {
        let session = Session::new(false);
        assert_eq!(
            session.run_line("create A:string B:boolean"),
            Some(Ok("1".to_string()))
        );
        assert_eq!(session.run_line("set 1 A 10 hello"), Some(Ok("ok".to_string())));
        let err = session.run_line("set 1 B 1 lookup(A,10)").unwrap().unwrap_err();
        assert!(err.starts_with(r#"{"code":"INVALID_TYPE","#), "{err}");
        assert_eq!(
            session.run_line("get 1"),
            Some(Ok(r#"{"A,10":"hello"}"#.to_string()))
        );
        let err = session.run_line("get 9").unwrap().unwrap_err();
        assert_eq!(err, r#"{"code":"SHEET_NOT_FOUND","message":"Sheet not found: 9"}"#);
    }
}
