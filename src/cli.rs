use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use lexloc::{Locate, Token};

use crate::rules::{parse_rule, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One `{ path, tokens }` object per input file.
    Json,
    /// One token per line: `source:line:col-line:col<TAB>kind<TAB>value`.
    Text,
}

/// Lex files and print every token with its location.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Files or directories to lex. Directories are walked respecting
    /// .gitignore.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Token rule as NAME=PATTERN, tried in the order given. Defaults to a
    /// rule set that covers any input.
    #[arg(short, long = "rule", value_name = "NAME=PATTERN", value_parser = parse_rule)]
    pub rules: Vec<Rule>,

    /// Property the location is attached under. Can't be one of the token's
    /// own keys (type, value, range).
    #[arg(short, long, default_value = lexloc::DEFAULT_PROPERTY, value_parser = parse_property)]
    pub property: String,

    /// Source label for every location. Defaults to each file's path.
    #[arg(long)]
    pub source: Option<String>,

    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    pub format: Format,
}

fn parse_property(arg: &str) -> Result<String, String> {
    if arg.is_empty() {
        return Err("property name can't be empty".to_string());
    }
    if Token::reserves_property(arg) {
        return Err(format!("'{}' is already a token key", arg));
    }

    Ok(arg.to_string())
}

pub fn parse_config() -> Config {
    Config::parse()
}
