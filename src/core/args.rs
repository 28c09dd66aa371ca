use clap::Parser;
use log::kv::{ToValue, Value};

#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    #[arg(short, long)]
    pub config: Option<String>,
    /// CSV or spreadsheet file to load into the session.
    #[arg(short, long)]
    pub file: String,
    /// SQL to run against the loaded table, exposed as `data`.
    #[arg(short, long)]
    pub query: Option<String>,
    /// Write the last result (or the raw table when no query ran) as CSV.
    #[arg(short, long)]
    pub export: Option<String>,
    #[arg(short, long, default_value_t = false)]
    pub suggest: bool,
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = CliArgs::parse_from([
            "self", "--config", "foo", "--file", "data.csv", "--query", "SELECT 1",
        ]);
        assert_eq!(
            args,
            CliArgs {
                config: Some("foo".to_string()),
                file: "data.csv".to_string(),
                query: Some("SELECT 1".to_string()),
                export: None,
                suggest: false,
            }
        );
    }

    #[test]
    fn test_args_require_file() {
        assert!(CliArgs::try_parse_from(["self", "--suggest"]).is_err());
    }
}
