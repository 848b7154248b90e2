use std::path::{Path, PathBuf};

use shared::error::CommandLoadError;
use tracing::info;

pub const LOAD_COMMAND_PREFIX: &str = "loadCommand(";
const LOAD_COMMAND_SUFFIX: char = ')';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSource {
    Literal,
    File(PathBuf),
}

/// A submission after directive expansion, ready to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub raw: String,
    pub resolved: String,
    pub source: CommandSource,
}

impl Command {
    pub fn is_file_indirection(&self) -> bool {
        matches!(self.source, CommandSource::File(_))
    }
}

/// Expands `loadCommand(<path>)` submissions into the contents of `<path>`.
#[derive(Debug, Clone, Default)]
pub struct CommandResolver {
    base_dir: Option<PathBuf>,
}

impl CommandResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative directive paths are resolved against `dir` instead of the
    /// working directory.
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    pub async fn resolve(&self, raw: &str) -> Result<Command, CommandLoadError> {
        let Some(path) = parse_directive(raw)? else {
            return Ok(Command {
                raw: raw.to_string(),
                resolved: raw.to_string(),
                source: CommandSource::Literal,
            });
        };

        let path = self.locate(path);
        let resolved = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| CommandLoadError::Read {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), bytes = resolved.len(), "resolver: loaded command file");

        Ok(Command {
            raw: raw.to_string(),
            resolved,
            source: CommandSource::File(path),
        })
    }

    fn locate(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Returns the directive's path, `None` for plain commands, or an error for
/// input that mentions the directive without being exactly
/// `loadCommand(<path>)`.
pub fn parse_directive(raw: &str) -> Result<Option<&str>, CommandLoadError> {
    let Some(rest) = raw.strip_prefix(LOAD_COMMAND_PREFIX) else {
        if raw.contains(LOAD_COMMAND_PREFIX) {
            return Err(CommandLoadError::MisplacedDirective);
        }
        return Ok(None);
    };

    let path = rest
        .strip_suffix(LOAD_COMMAND_SUFFIX)
        .ok_or(CommandLoadError::MissingClosingParen)?;
    if path.contains(LOAD_COMMAND_PREFIX) {
        return Err(CommandLoadError::MisplacedDirective);
    }
    if path.trim().is_empty() {
        return Err(CommandLoadError::EmptyPath);
    }
    Ok(Some(path))
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
