//! Knowledge file loading

use pulldown_cmark::{Event, Parser, TagEnd};
use regex::Regex;
use serde_json::json;
use std::path::Path;
use std::sync::LazyLock;

use digiskill_core::{Document, Error, Result};

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("valid blank line pattern"));

/// Load a UTF-8 text or markdown file as a single document
pub async fn load_document(path: &Path) -> Result<Document> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::DocumentIndexer(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let markdown = is_markdown(path);
    let text = if markdown { markdown_to_text(&raw) } else { raw };
    let source = path.display().to_string();
    let title = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.clone());

    Ok(Document {
        id: format!("{:x}", md5::compute(source.as_bytes())),
        title,
        content: normalize_text(&text),
        url: None,
        metadata: json!({
            "source": source,
            "format": if markdown { "markdown" } else { "text" },
        }),
    })
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

/// Render markdown to plain text, one blank line between blocks
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            Event::End(TagEnd::Item) => text.push('\n'),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::CodeBlock | TagEnd::List(_)) => {
                text.push_str("\n\n")
            }
            _ => {}
        }
    }

    text
}

/// Unify line endings and collapse runs of blank lines into one
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n");
    BLANK_RUNS.replace_all(&unified, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("a\r\nb\n\n\n\nc\n \n\t\nd\n\ne\n"), "a\nb\n\nc\n\nd\n\ne");
    }

    #[test]
    fn test_markdown_to_text() {
        let text = markdown_to_text("# Online safety\n\nUse a *strong* password.\n\n- enable `2FA`\n- avoid phishing\n");
        let text = normalize_text(&text);

        assert!(text.starts_with("Online safety\n\nUse a strong password."));
        assert!(text.contains("enable 2FA\navoid phishing"));
        assert!(!text.contains('#'));
        assert!(!text.contains('*'));
    }

    #[tokio::test]
    async fn test_load_text_document() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Line one.\n\n\n\nLine two.\n").unwrap();

        let document = load_document(file.path()).await.unwrap();
        assert_eq!(document.content, "Line one.\n\nLine two.");
        assert_eq!(document.metadata["format"], "text");
        assert_eq!(document.id.len(), 32);

        let again = load_document(file.path()).await.unwrap();
        assert_eq!(document.id, again.id);
    }

    #[tokio::test]
    async fn test_load_markdown_document() {
        let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        write!(file, "## VPN\n\nA **virtual private network** encrypts traffic.\n").unwrap();

        let document = load_document(file.path()).await.unwrap();
        assert_eq!(document.content, "VPN\n\nA virtual private network encrypts traffic.");
        assert_eq!(document.metadata["format"], "markdown");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_document(Path::new("/definitely/not/here.txt")).await.unwrap_err();
        assert!(matches!(err, Error::DocumentIndexer(ref m) if m.contains("/definitely/not/here.txt")));
    }
}
