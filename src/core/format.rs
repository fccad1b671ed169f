//! Front matter format detection
//!
//! A content file starts with a YAML block (`---`), a TOML block (`+++`) or a
//! bare JSON object whose closing brace sits alone at the start of a line.
//! Detection is an ordered trial: the first pattern that matches wins.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Serialization format of a document's metadata block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataFormat {
    /// `---` delimited YAML
    Yaml,
    /// `+++` delimited TOML
    Toml,
    /// A leading JSON object
    Json,
}

impl MetadataFormat {
    /// Delimiter line surrounding the block, if the format uses one
    pub fn delimiter(&self) -> Option<&'static str> {
        match self {
            Self::Yaml => Some("---"),
            Self::Toml => Some("+++"),
            Self::Json => None,
        }
    }

    /// Lowercase name used in log and report lines
    pub fn name(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for MetadataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A metadata block located in raw file content, not yet parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrontMatter<'a> {
    pub format: MetadataFormat,
    /// Block text between the delimiters (the whole object for JSON)
    pub block: &'a str,
    /// Everything after the block's closing line
    pub body: &'a str,
}

fn patterns() -> &'static [(MetadataFormat, Regex); 3] {
    static PATTERNS: OnceLock<[(MetadataFormat, Regex); 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |re: &str| Regex::new(re).expect("front matter pattern is valid");
        [
            (
                MetadataFormat::Yaml,
                compile(r"(?s)\A---[ \t]*\r?\n(.*?\n)---[ \t]*\r?\n(.*)\z"),
            ),
            (
                MetadataFormat::Toml,
                compile(r"(?s)\A\+\+\+[ \t]*\r?\n(.*?\n)\+\+\+[ \t]*\r?\n(.*)\z"),
            ),
            (
                MetadataFormat::Json,
                compile(r"(?s)\A(\{.*?\n\})[ \t]*\r?\n(.*)\z"),
            ),
        ]
    })
}

/// Locate the metadata block at the start of `content`
///
/// Returns `None` when no pattern matches; the whole input is then body text.
pub fn split_front_matter(content: &str) -> Option<RawFrontMatter<'_>> {
    patterns().iter().find_map(|(format, re)| {
        let caps = re.captures(content)?;
        Some(RawFrontMatter {
            format: *format,
            block: caps.get(1)?.as_str(),
            body: caps.get(2)?.as_str(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_yaml() {
        let raw = split_front_matter("---\ntitle: Hi\n---\nBody\n").unwrap();
        assert_eq!(raw.format, MetadataFormat::Yaml);
        assert_eq!(raw.block, "title: Hi\n");
        assert_eq!(raw.body, "Body\n");
    }

    #[test]
    fn test_detects_toml() {
        let raw = split_front_matter("+++\ntitle = \"Hi\"\n+++\n\nBody").unwrap();
        assert_eq!(raw.format, MetadataFormat::Toml);
        assert_eq!(raw.block, "title = \"Hi\"\n");
        assert_eq!(raw.body, "\nBody");
    }

    #[test]
    fn test_detects_json() {
        let content = "{\n  \"title\": \"Hi\",\n  \"extra\": {\n    \"a\": 1\n  }\n}\nBody";
        let raw = split_front_matter(content).unwrap();
        assert_eq!(raw.format, MetadataFormat::Json);
        assert!(raw.block.starts_with('{'));
        assert!(raw.block.ends_with("\n}"));
        assert!(raw.block.contains("\"extra\""));
        assert_eq!(raw.body, "Body");
    }

    #[test]
    fn test_no_front_matter() {
        assert!(split_front_matter("# Just a heading\n\nText").is_none());
        assert!(split_front_matter("").is_none());
        // opening delimiter without a closing one
        assert!(split_front_matter("---\ntitle: Hi\nno end\n").is_none());
    }

    #[test]
    fn test_closing_delimiter_is_first_match() {
        let raw = split_front_matter("---\na: 1\n---\nbody\n---\nmore\n").unwrap();
        assert_eq!(raw.block, "a: 1\n");
        assert_eq!(raw.body, "body\n---\nmore\n");
    }

    #[test]
    fn test_crlf_delimiters() {
        let raw = split_front_matter("---\r\ntitle: Hi\r\n---\r\nBody").unwrap();
        assert_eq!(raw.format, MetadataFormat::Yaml);
        assert_eq!(raw.body, "Body");
    }

    #[test]
    fn test_format_names() {
        assert_eq!(MetadataFormat::Toml.to_string(), "toml");
        assert_eq!(MetadataFormat::Yaml.delimiter(), Some("---"));
        assert_eq!(MetadataFormat::Json.delimiter(), None);
    }
}
