//! Markdown body → HTML.

use pulldown_cmark::{Options, Parser, html};

/// Render a markdown body to HTML.
///
/// Tables, strikethrough, task lists and footnotes are enabled. Metadata
/// blocks stay off so `---` fenced sections in the body render as markdown.
pub fn to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(markdown, options);

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_paragraphs() {
        let html = to_html("# Title\n\nSome *text*.\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>text</em>"));
    }

    #[test]
    fn renders_tables_and_tasklists() {
        let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n- [x] done\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn quotes_stay_straight() {
        let html = to_html("say \"hi\"");
        assert!(!html.contains('\u{201c}'));
    }

    #[test]
    fn fenced_sections_in_body_are_kept() {
        let html = to_html("Intro\n\n---\nnotes: here\n---\n\nEnd\n");
        assert!(html.contains("notes: here"));
        assert!(html.contains("<p>End</p>"));

        let html = to_html("---\nauthor: me\n---\n# Hi\n");
        assert!(html.contains("author: me"));
        assert!(html.contains("<h1>Hi</h1>"));
    }

    #[test]
    fn empty_body_is_empty() {
        assert_eq!(to_html("").trim(), "");
    }
}
