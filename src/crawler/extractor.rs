//! Main-content extraction
//!
//! Turns an HTML page into a title and readable body text. Page chrome
//! (navigation, headers, footers, sidebars, forms, scripts) and tabular data
//! are dropped, and text blocks that are mostly link text are discarded.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Candidate main-content roots, most specific first
const CONTENT_ROOTS: &[&str] = &[
    "article",
    "main",
    "[role=\"main\"]",
    "#mw-content-text",
    "#content",
    "body",
];

/// Elements whose whole subtree never contributes text
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form",
    "button", "iframe", "svg", "table", "select", "textarea",
];

/// Class or id fragments that mark page chrome
const CHROME_MARKERS: &[&str] = &[
    "navbox",
    "sidebar",
    "menu",
    "cookie",
    "breadcrumb",
    "footer",
    "banner",
];

/// Elements that start a new text block
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "li", "ul", "ol", "dl", "dt", "dd", "h1", "h2",
    "h3", "h4", "h5", "h6", "blockquote", "pre", "figure", "figcaption", "details", "summary",
    "address", "hr", "body",
];

/// Title and body text extracted from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub text: String,
}

/// Extracts the title and main text of an HTML page
///
/// Returns `None` when no text survives boilerplate removal. The title falls
/// back to the page URL when the document has no non-empty `<title>`.
///
/// # Example
///
/// ```
/// use scholar_crawl::crawler::extract;
/// use url::Url;
///
/// let html = r#"<html><head><title> Limits </title></head>
///   <body><nav>Home | About</nav><p>A limit describes a value a function approaches.</p></body></html>"#;
/// let url = Url::parse("https://example.org/limits").unwrap();
/// let page = extract(html, &url).unwrap();
/// assert_eq!(page.title, "Limits");
/// assert_eq!(page.text, "A limit describes a value a function approaches.");
/// ```
pub fn extract(html: &str, url: &Url) -> Option<Extracted> {
    let document = Html::parse_document(html);

    let root = find_content_root(&document)?;
    let mut blocks = BlockCollector::default();
    blocks.walk(root, false);
    blocks.flush();

    if blocks.blocks.is_empty() {
        return None;
    }

    let title = extract_title(&document).unwrap_or_else(|| url.to_string());

    Some(Extracted {
        title,
        text: blocks.blocks.join("\n"),
    })
}

fn find_content_root(document: &Html) -> Option<ElementRef<'_>> {
    CONTENT_ROOTS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|selector| document.select(&selector).next())
        .or_else(|| Some(document.root_element()))
}

fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Returns true if the element's class or id names page chrome
fn is_chrome(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    let names = [value.attr("class"), value.id()];

    names.into_iter().flatten().any(|name| {
        let name = name.to_ascii_lowercase();
        CHROME_MARKERS.iter().any(|marker| name.contains(marker))
    })
}

/// Accumulates text into blocks while walking the DOM
#[derive(Default)]
struct BlockCollector {
    blocks: Vec<String>,
    current: String,
    link_text: String,
}

impl BlockCollector {
    fn walk(&mut self, element: ElementRef<'_>, in_link: bool) {
        for child in element.children() {
            if let Some(child_element) = ElementRef::wrap(child) {
                let name = child_element.value().name();

                if SKIPPED_TAGS.contains(&name) || is_chrome(&child_element) {
                    continue;
                }

                if name == "br" {
                    self.current.push(' ');
                    continue;
                }

                let is_block = BLOCK_TAGS.contains(&name);
                if is_block {
                    self.flush();
                }

                self.walk(child_element, in_link || name == "a");

                if is_block {
                    self.flush();
                }
            } else if let Some(text) = child.value().as_text() {
                self.current.push_str(text);
                if in_link {
                    self.link_text.push(' ');
                    self.link_text.push_str(text);
                }
            }
            // Comments, doctypes and processing instructions carry no text
        }
    }

    /// Closes the current block, keeping it unless links dominate it
    fn flush(&mut self) {
        let block = collapse_whitespace(&self.current);
        let link_chars = count_visible(&self.link_text);
        let block_chars = count_visible(&block);

        if block_chars > 0 && link_chars * 2 <= block_chars {
            self.blocks.push(block);
        }

        self.current.clear();
        self.link_text.clear();
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn count_visible(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}
