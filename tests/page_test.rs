//! Whole-page decoration and byte decoding.

use quotecraft::block::{decorate_all, summarize};
use quotecraft::dom::{parse_html, parse_html_bytes, select, serialize_html};
use quotecraft::observe::Unsupported;
use quotecraft::{QuoteConfig, decorate_page};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> String {
    format!("{}/{}", FIXTURES_DIR, name)
}

fn article() -> String {
    std::fs::read_to_string(fixture_path("article.html")).expect("Failed to read fixture")
}

// ============================================================================
// Library
// ============================================================================

#[test]
fn test_article_blocks_are_decorated() {
    let html = decorate_page(&article(), &QuoteConfig::default()).unwrap();
    let dom = parse_html(&html);

    let figures = select(&dom, r#".quote[role="figure"][aria-label="Quote"]"#).unwrap();
    assert_eq!(figures.len(), 3);
    assert_eq!(select(&dom, ".quote > blockquote[role=presentation]").unwrap().len(), 3);
    assert_eq!(select(&dom, ".quote > footer > cite").unwrap().len(), 2);
    assert_eq!(select(&dom, ".author-title").unwrap().len(), 1);
    assert!(select(&dom, ".cards blockquote").unwrap().is_empty());
}

#[test]
fn test_article_citations() {
    let mut dom = parse_html(&article());
    decorate_all(&mut dom, &mut Unsupported, &QuoteConfig::default()).unwrap();

    let summaries: Vec<_> = select(&dom, ".quote")
        .unwrap()
        .into_iter()
        .map(|b| summarize(&dom, b))
        .collect();

    assert_eq!(summaries[0].author.as_deref(), Some("Edsger W. Dijkstra"));
    assert_eq!(summaries[0].author_title.as_deref(), Some("Computer scientist"));
    // Link markup is flattened to text.
    assert_eq!(summaries[1].author.as_deref(), Some("Harold Abelson"));
    assert_eq!(summaries[1].author_title, None);
    assert_eq!(summaries[2].author, None);
    assert_eq!(summaries[2].quote, "Make it work, make it right, make it fast.");
}

#[test]
fn test_decorating_output_again_changes_nothing() {
    let once = decorate_page(&article(), &QuoteConfig::default()).unwrap();
    let twice = decorate_page(&once, &QuoteConfig::default()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_fragment_comes_back_as_fragment() {
    let fragment = r#"<p>Intro</p><div class="quote"><div>Hi</div><div>Ann</div></div>"#;
    let html = decorate_page(fragment, &QuoteConfig::default()).unwrap();
    assert_eq!(
        html,
        r#"<p>Intro</p><div class="quote" role="figure" aria-label="Quote" data-block-status="decorated"><blockquote role="presentation">Hi</blockquote><footer><cite>Ann</cite></footer></div>"#
    );
}

#[test]
fn test_document_keeps_document_wrappers() {
    let html = decorate_page(&article(), &QuoteConfig::default()).unwrap();
    assert!(html.starts_with("<!DOCTYPE html><html"));
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn test_custom_selector() {
    let config = QuoteConfig {
        block_selector: ".section:first-child .quote".to_string(),
        ..Default::default()
    };
    let html = decorate_page(&article(), &config).unwrap();
    let dom = parse_html(&html);
    assert_eq!(select(&dom, "blockquote").unwrap().len(), 1);
}

#[test]
fn test_legacy_encoded_page() {
    let bytes = b"<html><head><meta charset=\"windows-1252\"></head><body>\
        <div class=\"quote\"><div>\x93Hello\x94</div><div>Ren\xe9</div></div></body></html>"
        .to_vec();

    let mut dom = parse_html_bytes(&bytes);
    decorate_all(&mut dom, &mut Unsupported, &QuoteConfig::default()).unwrap();
    let html = serialize_html(&dom);

    assert!(html.contains("<blockquote role=\"presentation\">\u{201c}Hello\u{201d}</blockquote>"));
    assert!(html.contains("<cite>René</cite>"));
}
