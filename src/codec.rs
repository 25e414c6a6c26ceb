//! Reading and writing locale files
//!
//! Two textual shapes exist in the wild:
//!
//! ```text
//! { "home": { "title": "Home" } }                 // FileFormat::Json
//! export default { "home": { "title": "Home" } }; // FileFormat::Module
//! ```
//!
//! Both are accepted on read regardless of the configured format. Module bodies are
//! parsed leniently (comments, trailing commas, unquoted keys) since they are often
//! edited by hand. On write, the caller picks the shape.

use crate::error::{Error, Result};
use crate::nested::NestedMap;
use serde::Deserialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Plain JSON document
    Json,
    /// `export default {...};` language module
    #[default]
    Module,
}

impl FromStr for FileFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(FileFormat::Json),
            "module" | "js" | "esm" => Ok(FileFormat::Module),
            other => Err(Error::Config(format!("unknown file format '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error: {0}")]
pub struct ParseError(String);

/// Parse either textual shape into a map
pub fn parse(content: &str) -> std::result::Result<NestedMap, ParseError> {
    let trimmed = content.trim();

    let value = match strip_export_default(trimmed) {
        Some(body) => jsonc_parser::parse_to_serde_value(body, &Default::default())
            .map_err(|e| ParseError(e.to_string()))?
            .ok_or_else(|| ParseError("module has no default export value".to_string()))?,
        None => serde_json::from_str::<Value>(trimmed).map_err(|e| ParseError(e.to_string()))?,
    };

    NestedMap::from_value(value).ok_or_else(|| ParseError("root is not an object".to_string()))
}

/// Drop leading whitespace and `//` or `/* */` comments
fn skip_leading_comments(mut content: &str) -> &str {
    loop {
        content = content.trim_start();
        if let Some(rest) = content.strip_prefix("//") {
            content = rest.split_once('\n').map_or("", |(_, after)| after);
        } else if let Some(rest) = content.strip_prefix("/*") {
            content = rest.split_once("*/").map_or("", |(_, after)| after);
        } else {
            return content;
        }
    }
}

fn strip_export_default(content: &str) -> Option<&str> {
    let rest = skip_leading_comments(content).strip_prefix("export")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let body = rest.trim_start().strip_prefix("default")?;
    Some(body.trim().trim_end_matches(';').trim_end())
}

/// Load a locale file.
///
/// A missing file is an empty map. Unreadable or malformed files are logged and
/// also treated as empty; this never fails.
pub fn read(path: &Path) -> NestedMap {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "translation file does not exist yet");
            return NestedMap::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read translation file");
            return NestedMap::new();
        }
    };

    parse(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Failed to parse translation file");
        NestedMap::new()
    })
}

/// Serialize a map in the given shape, two-space indented
pub fn render(map: &NestedMap, format: FileFormat) -> String {
    let json = serde_json::to_string_pretty(&map.to_value()).unwrap_or_else(|_| "{}".to_string());
    match format {
        FileFormat::Json => format!("{}\n", json),
        FileFormat::Module => format!("export default {};\n", json),
    }
}

/// Create `dir` and its parents; an existing directory is fine
pub fn ensure_dir(dir: &Path) -> Result<()> {
    match std::fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(Error::io(dir, e)),
    }
}

/// Write a locale file, creating parent directories as needed
pub fn write(path: &Path, map: &NestedMap, format: FileFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    std::fs::write(path, render(map, format)).map_err(|e| Error::io(path, e))
}

/// A locale file bound to its path, language and output shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFile {
    pub path: PathBuf,
    pub locale: String,
    pub format: FileFormat,
}

impl TranslationFile {
    pub fn new(path: impl Into<PathBuf>, locale: impl Into<String>, format: FileFormat) -> Self {
        Self {
            path: path.into(),
            locale: locale.into(),
            format,
        }
    }

    pub fn load(&self) -> NestedMap {
        read(&self.path)
    }

    pub fn save(&self, map: &NestedMap) -> Result<()> {
        write(&self.path, map, self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> NestedMap {
        let mut map = NestedMap::new();
        map.set(&["home", "title"], "Home");
        map.set(&["home", "welcomeBack"], "Welcome Back");
        map.set(&["save"], "حفظ");
        map
    }

    #[test]
    fn test_round_trip_both_formats() {
        let dir = TempDir::new().unwrap();
        for (name, format) in [("en.json", FileFormat::Json), ("en.js", FileFormat::Module)] {
            let path = dir.path().join(name);
            write(&path, &sample(), format).unwrap();
            assert_eq!(read(&path), sample());
        }
    }

    #[test]
    fn test_render_shapes() {
        let mut map = NestedMap::new();
        map.set(&["a"], "A");
        assert_eq!(render(&map, FileFormat::Json), "{\n  \"a\": \"A\"\n}\n");
        assert_eq!(
            render(&map, FileFormat::Module),
            "export default {\n  \"a\": \"A\"\n};\n"
        );
    }

    #[test]
    fn test_write_preserves_insertion_order() {
        let mut map = NestedMap::new();
        map.set(&["zeta"], "Z");
        map.set(&["alpha"], "A");
        let text = render(&map, FileFormat::Json);
        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(read(&dir.path().join("absent.js")).is_empty());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"home\": ").unwrap();
        assert!(read(&path).is_empty());
    }

    #[test]
    fn test_non_object_root_is_parse_error() {
        assert!(parse("[1, 2]").is_err());
        assert!(parse("export default 'text';").is_err());
    }

    #[test]
    fn test_parse_hand_written_module() {
        let content = r#"
            // edited by hand
            export default {
              home: {
                title: "Home",
                subtitle: "Sub", // trailing comma below
              },
            };
        "#;
        let map = parse(content).unwrap();
        assert_eq!(map.get(&["home", "title"]), Some("Home"));
        assert_eq!(map.get(&["home", "subtitle"]), Some("Sub"));
    }

    #[test]
    fn test_parse_module_after_block_comment_header() {
        let content = "/* Copyright Example Corp */\n/** generated */ export default {\"a\": \"A\"};";
        let map = parse(content).unwrap();
        assert_eq!(map.get(&["a"]), Some("A"));
    }

    #[test]
    fn test_commented_module_keeps_entries_on_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ar.js");
        std::fs::write(
            &path,
            "// hand edited, do not lose\nexport default {\n  home: { title: \"الرئيسية\" },\n};\n",
        )
        .unwrap();
        assert_eq!(read(&path).get(&["home", "title"]), Some("الرئيسية"));
    }

    #[test]
    fn test_skip_leading_comments() {
        assert_eq!(skip_leading_comments("  // a\n /* b */ x"), "x");
        assert_eq!(skip_leading_comments("// only a comment"), "");
        assert_eq!(skip_leading_comments("/* unterminated"), "");
        assert_eq!(skip_leading_comments("{}"), "{}");
    }

    #[test]
    fn test_parse_module_without_semicolon() {
        let map = parse("export  default {\"a\": \"A\"}\n").unwrap();
        assert_eq!(map.to_value(), json!({"a": "A"}));
    }

    #[test]
    fn test_strip_export_default_requires_keyword_boundary() {
        assert!(strip_export_default("exportdefault {}").is_none());
        assert_eq!(strip_export_default("export default {};"), Some("{}"));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("locales").join("ar").join("index.js");
        write(&path, &sample(), FileFormat::Module).unwrap();
        assert!(path.exists());
        // second write into the now-existing directory
        write(&path, &sample(), FileFormat::Module).unwrap();
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let result = write(&blocker.join("en.js"), &sample(), FileFormat::Module);
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_translation_file_load_save() {
        let dir = TempDir::new().unwrap();
        let file = TranslationFile::new(dir.path().join("ar.js"), "ar", FileFormat::Module);
        assert!(file.load().is_empty());
        file.save(&sample()).unwrap();
        assert_eq!(file.load(), sample());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<FileFormat>().unwrap(), FileFormat::Json);
        assert_eq!("module".parse::<FileFormat>().unwrap(), FileFormat::Module);
        assert!("yaml".parse::<FileFormat>().is_err());
    }
}
