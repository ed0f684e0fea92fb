//! Ordered-fallback field extraction.
//!
//! Portal markup varies between sections and over time, so every field is
//! read through a list of [`Strategy`] values tried in order. The first
//! strategy that yields a non-empty (trimmed) value wins; missing elements,
//! missing attributes and unparsable selectors simply move on to the next
//! strategy. Nothing here returns an error.

use crate::utils::collapse_whitespace;
use scraper::{ElementRef, Node, Selector};
use tracing::trace;

/// Elements that start a new line when rendered. Their boundaries separate
/// words; inline elements do not.
const LINE_BREAKING: &[&str] = &[
    "br", "p", "div", "li", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "td",
];

/// What to read from the element a strategy locates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    /// Descendant text with whitespace collapsed.
    Text,
    /// The named attribute.
    Attr(&'static str),
}

/// One extraction attempt: a CSS selector and what to read from its first
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub selector: &'static str,
    pub read: Read,
}

impl Strategy {
    pub const fn text(selector: &'static str) -> Self {
        Self {
            selector,
            read: Read::Text,
        }
    }

    pub const fn attr(selector: &'static str, name: &'static str) -> Self {
        Self {
            selector,
            read: Read::Attr(name),
        }
    }
}

/// A DOM-like node the extractor can query.
///
/// Lookups are immediate: absence is reported as `None`, never waited on.
pub trait DomNode: Sized {
    /// First descendant matching `selector`.
    fn find(&self, selector: &str) -> Option<Self>;
    fn text(&self) -> String;
    fn attr(&self, name: &str) -> Option<String>;
}

impl DomNode for ElementRef<'_> {
    fn find(&self, selector: &str) -> Option<Self> {
        let parsed = Selector::parse(selector).ok()?;
        self.select(&parsed).next()
    }

    fn text(&self) -> String {
        let parts = self.descendants().filter_map(|node| match node.value() {
            Node::Text(text) => Some(&**text),
            Node::Element(el) if LINE_BREAKING.contains(&el.name()) => Some(" "),
            _ => None,
        });
        collapse_whitespace(parts)
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}

/// Return the first non-empty trimmed value produced by `strategies`.
pub fn extract<N: DomNode>(context: &N, strategies: &[Strategy]) -> String {
    extract_with(context, strategies, str::to_string)
}

/// Like [`extract`], but each trimmed candidate is passed through
/// `transform` and the emptiness check applies to the transformed value.
///
/// Lookups stop at the winning strategy.
pub fn extract_with<N, F>(context: &N, strategies: &[Strategy], transform: F) -> String
where
    N: DomNode,
    F: Fn(&str) -> String,
{
    for strategy in strategies {
        let Some(node) = context.find(strategy.selector) else {
            trace!(selector = strategy.selector, "No match");
            continue;
        };
        let raw = match strategy.read {
            Read::Text => node.text(),
            Read::Attr(name) => node.attr(name).unwrap_or_default(),
        };
        let value = transform(raw.trim());
        if !value.is_empty() {
            return value;
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;
    use std::cell::RefCell;
    use std::rc::Rc;

    const PAGE: &str = r#"
        <html><head>
          <meta property="og:description" content="   ">
          <meta name="description" content="Descrição genérica">
        </head><body>
          <h2 class="content-head__subtitle">
             Linha   fina
             <em>destacada</em>
          </h2>
          <a class="post__link" href="/a.ghtml" title="  Título  ">x</a>
        </body></html>"#;

    fn with_root<R>(f: impl FnOnce(ElementRef<'_>) -> R) -> R {
        let doc = Html::parse_document(PAGE);
        f(doc.root_element())
    }

    #[test]
    fn test_first_non_empty_wins() {
        with_root(|root| {
            let value = extract(
                &root,
                &[
                    Strategy::attr("meta[property='og:description']", "content"),
                    Strategy::text(".content-head__subtitle"),
                    Strategy::attr("meta[name='description']", "content"),
                ],
            );
            assert_eq!(value, "Linha fina destacada");
        });
    }

    #[test]
    fn test_text_separates_at_line_breaks_only() {
        let doc = Html::parse_fragment(
            "<h2 class='a'>Linha<br>fina</h2>\
             <h2 class='b'>Glo<b>bo</b> <i>hoje</i></h2>\
             <div class='c'><p>Um</p><p>dois</p></div>",
        );
        let root = doc.root_element();
        assert_eq!(extract(&root, &[Strategy::text("h2.a")]), "Linha fina");
        assert_eq!(extract(&root, &[Strategy::text("h2.b")]), "Globo hoje");
        assert_eq!(extract(&root, &[Strategy::text("div.c")]), "Um dois");
    }

    #[test]
    fn test_absent_elements_fall_through() {
        with_root(|root| {
            let value = extract(
                &root,
                &[
                    Strategy::text("h1.missing"),
                    Strategy::attr("meta[name='description']", "content"),
                ],
            );
            assert_eq!(value, "Descrição genérica");
        });
    }

    #[test]
    fn test_missing_attribute_falls_through() {
        with_root(|root| {
            let value = extract(
                &root,
                &[
                    Strategy::attr("a.post__link", "data-title"),
                    Strategy::attr("a.post__link", "title"),
                ],
            );
            assert_eq!(value, "Título");
        });
    }

    #[test]
    fn test_invalid_selector_is_absence() {
        with_root(|root| {
            let value = extract(
                &root,
                &[Strategy::text("###"), Strategy::attr("a.post__link", "href")],
            );
            assert_eq!(value, "/a.ghtml");
        });
    }

    #[test]
    fn test_exhausted_is_empty() {
        with_root(|root| {
            assert_eq!(extract(&root, &[Strategy::text("nav")]), "");
            assert_eq!(extract(&root, &[]), "");
        });
    }

    #[test]
    fn test_transform_decides_emptiness() {
        with_root(|root| {
            let value = extract_with(
                &root,
                &[
                    Strategy::attr("meta[name='description']", "content"),
                    Strategy::attr("a.post__link", "href"),
                ],
                |s| if s.ends_with(".ghtml") { s.to_uppercase() } else { String::new() },
            );
            assert_eq!(value, "/A.GHTML");
        });
    }

    /// Node that answers from a fixed table and records every lookup.
    #[derive(Clone)]
    struct Recorder {
        answers: Rc<Vec<(&'static str, &'static str)>>,
        lookups: Rc<RefCell<Vec<String>>>,
        value: &'static str,
    }

    impl DomNode for Recorder {
        fn find(&self, selector: &str) -> Option<Self> {
            self.lookups.borrow_mut().push(selector.to_string());
            self.answers
                .iter()
                .find(|(s, _)| *s == selector)
                .map(|(_, v)| Recorder {
                    value: *v,
                    ..self.clone()
                })
        }

        fn text(&self) -> String {
            self.value.to_string()
        }

        fn attr(&self, _name: &str) -> Option<String> {
            Some(self.value.to_string())
        }
    }

    #[test]
    fn test_no_lookups_after_winner() {
        let root = Recorder {
            answers: Rc::new(vec![("a", "  "), ("c", "winner"), ("d", "later")]),
            lookups: Rc::new(RefCell::new(Vec::new())),
            value: "",
        };
        let value = extract(
            &root,
            &[
                Strategy::text("a"),
                Strategy::text("b"),
                Strategy::attr("c", "content"),
                Strategy::text("d"),
            ],
        );
        assert_eq!(value, "winner");
        assert_eq!(*root.lookups.borrow(), vec!["a", "b", "c"]);
    }
}
