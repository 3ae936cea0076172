//! Parsed TypeScript sources

use crate::error::ScanError;
use std::fs;
use std::path::{Path, PathBuf};

/// Grammar variant chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceDialect {
    /// `.ts`
    TypeScript,
    /// `.tsx`
    Tsx,
}

impl SourceDialect {
    /// Dialect for `path`, if it is a TypeScript source
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    /// Tree-sitter grammar
    #[must_use]
    pub fn tree_sitter_language(&self) -> tree_sitter::Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// True for declaration-only files (`*.d.ts`)
#[must_use]
pub fn is_declaration_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".d.ts"))
}

/// Source text together with its syntax tree
#[derive(Debug)]
pub struct ParsedSource {
    path: PathBuf,
    text: String,
    tree: tree_sitter::Tree,
}

impl ParsedSource {
    /// Read and parse the file at `path`
    ///
    /// # Errors
    /// [`ScanError::Io`] if the file cannot be read, otherwise as
    /// [`ParsedSource::parse`].
    pub fn read(path: impl Into<PathBuf>) -> Result<Self, ScanError> {
        let path = path.into();
        let text = fs::read_to_string(&path).map_err(|e| ScanError::io_error(&path, e))?;
        Self::parse(path, text)
    }

    /// Parse `text` as the source at `path`
    ///
    /// Syntax errors do not fail the parse; the tree contains error nodes and
    /// a warning is logged.
    ///
    /// # Errors
    /// - [`ScanError::UnsupportedSource`] if `path` is not `.ts`/`.tsx`
    /// - [`ScanError::ParserInit`] / [`ScanError::ParseFailed`] from the parser
    pub fn parse(path: impl Into<PathBuf>, text: impl Into<String>) -> Result<Self, ScanError> {
        let path = path.into();
        let text = text.into();
        let dialect =
            SourceDialect::from_path(&path).ok_or_else(|| ScanError::UnsupportedSource(path.clone()))?;

        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&dialect.tree_sitter_language())
            .map_err(|e| ScanError::ParserInit(e.to_string()))?;

        let tree = parser
            .parse(&text, None)
            .ok_or_else(|| ScanError::ParseFailed(path.clone()))?;

        if tree.root_node().has_error() {
            tracing::warn!(
                "{} contains syntax errors; scanning the recovered tree",
                path.display()
            );
        }

        Ok(Self { path, text, tree })
    }

    /// Source path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Syntax tree
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// True if the tree contains error nodes
    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_by_extension() {
        assert_eq!(
            SourceDialect::from_path(Path::new("src/a.ts")),
            Some(SourceDialect::TypeScript)
        );
        assert_eq!(
            SourceDialect::from_path(Path::new("src/a.tsx")),
            Some(SourceDialect::Tsx)
        );
        assert_eq!(SourceDialect::from_path(Path::new("src/a.js")), None);
        assert_eq!(SourceDialect::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn declaration_files() {
        assert!(is_declaration_file(Path::new("src/types.d.ts")));
        assert!(!is_declaration_file(Path::new("src/types.ts")));
    }

    #[test]
    fn parse_typescript() {
        let parsed = ParsedSource::parse("a.ts", "export class A implements B<'x'> {}").unwrap();
        assert!(!parsed.has_errors());
        assert_eq!(parsed.tree().root_node().kind(), "program");
    }

    #[test]
    fn syntax_errors_are_tolerated() {
        let parsed = ParsedSource::parse("a.ts", "export class A implements {").unwrap();
        assert!(parsed.has_errors());
    }

    #[test]
    fn unsupported_extension() {
        assert!(matches!(
            ParsedSource::parse("a.py", "x = 1"),
            Err(ScanError::UnsupportedSource(_))
        ));
    }
}
