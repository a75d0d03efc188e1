use std::path::Path;

use color_eyre::{eyre::WrapErr, Result};
use lexloc::{Lex, Lexer, LexerOptions, Token, LOCATION_EVENT};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Config, Format},
    rules::{Rule, DEFAULT_RULES},
    walk::SourceFile,
};

mod cli;
mod rules;
mod walk;

#[derive(Debug, Serialize)]
struct FileTokens {
    path: String,
    tokens: Vec<Token>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = cli::parse_config();
    let files = walk::collect_files(&config.inputs)?;

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let Some(input) = read_input(&file).await? else {
            continue;
        };
        let path = file.path;
        let tokens = lex_file(&config, &path, input)
            .wrap_err_with(|| format!("Failed to lex '{}'", path.display()))?;

        results.push(FileTokens {
            path: path.display().to_string(),
            tokens,
        });
    }

    match config.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        Format::Text => {
            for file in &results {
                for line in text_lines(&file.tokens, &config.property) {
                    println!("{}", line);
                }
            }
        }
    }

    Ok(())
}

/// Reads a file as UTF-8. Files found by walking a directory that aren't
/// text are skipped with a warning; files named explicitly must be text.
async fn read_input(file: &SourceFile) -> Result<Option<String>> {
    let bytes = tokio::fs::read(&file.path)
        .await
        .wrap_err_with(|| format!("Failed to read '{}'", file.path.display()))?;

    match String::from_utf8(bytes) {
        Ok(input) => Ok(Some(input)),
        Err(err) if file.walked => {
            tracing::warn!(path = %file.path.display(), %err, "skipping non-UTF-8 file");
            Ok(None)
        }
        Err(err) => Err(err).wrap_err_with(|| format!("'{}' is not UTF-8 text", file.path.display())),
    }
}

/// Lexes one file's contents with the configured rules, locating every token
/// under the configured property.
fn lex_file(config: &Config, path: &Path, input: String) -> Result<Vec<Token>> {
    let source = config
        .source
        .clone()
        .unwrap_or_else(|| path.display().to_string());

    let mut lexer = Lexer::with_options(
        input,
        LexerOptions {
            source: Some(source),
            ..Default::default()
        },
    );

    if config.rules.is_empty() {
        lexer.capture_all(DEFAULT_RULES.iter().copied())?;
    } else {
        lexer.capture_all(config.rules.iter().map(Rule::as_pair))?;
    }

    lexer.on(LOCATION_EVENT, |token: &Token| {
        tracing::trace!(kind = %token.kind, range = ?token.range, "located token");
    });

    let mut lexer = lexloc::plugin_as(config.property.clone()).install(lexer)?;
    let tokens = lexer.tokenize()?;
    tracing::debug!(path = %path.display(), tokens = tokens.len(), "lexed file");

    Ok(tokens)
}

fn text_lines<'a>(tokens: &'a [Token], property: &'a str) -> impl Iterator<Item = String> + 'a {
    tokens.iter().filter_map(move |token| {
        let location = token.location(property)?;
        Some(format!("{}\t{}\t{:?}", location, token.kind, token.value))
    })
}
