use log::debug;
use scraper::{Html, Selector};

use crate::error::{FixtureError, Result};

/// Handle of a `<style>` node injected into the document head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleNodeId(u64);

/// The document operations fixtures need.
pub trait Dom {
    /// Whether an element with `id` is currently in the document.
    fn has_element(&self, id: &str) -> bool;

    /// Create an empty `div` with `id` and append it to the body.
    fn create_container(&mut self, id: &str);

    fn inner_html(&self, id: &str) -> Option<String>;

    /// Replace the markup of element `id`. Returns false when it does not exist.
    fn set_inner_html(&mut self, id: &str, html: &str) -> bool;

    /// Detach element `id` from the document. Returns false when it does not exist.
    fn remove_element(&mut self, id: &str) -> bool;

    /// Create a `<style>` node holding `css` and append it to the head.
    fn append_style(&mut self, css: &str) -> StyleNodeId;

    /// Detach a style node. Returns false when it is no longer attached.
    fn remove_style(&mut self, node: StyleNodeId) -> bool;
}

impl<D: Dom + ?Sized> Dom for &mut D {
    fn has_element(&self, id: &str) -> bool {
        (**self).has_element(id)
    }

    fn create_container(&mut self, id: &str) {
        (**self).create_container(id)
    }

    fn inner_html(&self, id: &str) -> Option<String> {
        (**self).inner_html(id)
    }

    fn set_inner_html(&mut self, id: &str, html: &str) -> bool {
        (**self).set_inner_html(id, html)
    }

    fn remove_element(&mut self, id: &str) -> bool {
        (**self).remove_element(id)
    }

    fn append_style(&mut self, css: &str) -> StyleNodeId {
        (**self).append_style(css)
    }

    fn remove_style(&mut self, node: StyleNodeId) -> bool {
        (**self).remove_style(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StyleNode {
    id: StyleNodeId,
    css: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    tag: String,
    id: String,
    inner_html: String,
}

/// In-memory document with a head of style nodes and a body of elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDom {
    head: Vec<StyleNode>,
    body: Vec<Element>,
    next_style: u64,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an arbitrary element to the body, as page code outside the
    /// fixture loader would.
    pub fn insert_element(&mut self, tag: &str, id: &str, inner_html: &str) {
        self.body.push(Element {
            tag: tag.to_string(),
            id: id.to_string(),
            inner_html: inner_html.to_string(),
        });
    }

    /// CSS of every style node in the head, in document order.
    pub fn styles(&self) -> Vec<&str> {
        self.head.iter().map(|node| node.css.as_str()).collect()
    }

    /// Ids of the body elements, in document order.
    pub fn element_ids(&self) -> Vec<&str> {
        self.body.iter().map(|element| element.id.as_str()).collect()
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<!DOCTYPE html><html><head>");
        for node in &self.head {
            html.push_str("<style>");
            html.push_str(&node.css);
            html.push_str("</style>");
        }
        html.push_str("</head><body>");
        for element in &self.body {
            html.push_str(&format!(
                "<{tag} id=\"{id}\">{inner}</{tag}>",
                tag = element.tag,
                id = escape_attribute(&element.id),
                inner = element.inner_html
            ));
        }
        html.push_str("</body></html>");
        html
    }

    /// Text content of every element matching a CSS selector.
    pub fn select_text(&self, selector: &str) -> Result<Vec<String>> {
        self.select(selector, |element| element.text().collect::<String>())
    }

    /// Markup inside every element matching a CSS selector.
    pub fn select_inner_html(&self, selector: &str) -> Result<Vec<String>> {
        self.select(selector, |element| element.inner_html())
    }

    fn select<T>(&self, selector: &str, map: impl Fn(scraper::ElementRef) -> T) -> Result<Vec<T>> {
        let parsed = Selector::parse(selector).map_err(|e| FixtureError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;
        let document = Html::parse_document(&self.to_html());
        let matches = document.select(&parsed).map(map).collect();
        Ok(matches)
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.body.iter_mut().find(|element| element.id == id)
    }
}

impl Dom for MemoryDom {
    fn has_element(&self, id: &str) -> bool {
        self.body.iter().any(|element| element.id == id)
    }

    fn create_container(&mut self, id: &str) {
        debug!("Creating container #{}", id);
        self.insert_element("div", id, "");
    }

    fn inner_html(&self, id: &str) -> Option<String> {
        self.body
            .iter()
            .find(|element| element.id == id)
            .map(|element| element.inner_html.clone())
    }

    fn set_inner_html(&mut self, id: &str, html: &str) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.inner_html = html.to_string();
                true
            }
            None => false,
        }
    }

    fn remove_element(&mut self, id: &str) -> bool {
        match self.body.iter().position(|element| element.id == id) {
            Some(index) => {
                debug!("Removing element #{}", id);
                self.body.remove(index);
                true
            }
            None => false,
        }
    }

    fn append_style(&mut self, css: &str) -> StyleNodeId {
        let id = StyleNodeId(self.next_style);
        self.next_style += 1;
        self.head.push(StyleNode {
            id,
            css: css.to_string(),
        });
        id
    }

    fn remove_style(&mut self, node: StyleNodeId) -> bool {
        let before = self.head.len();
        self.head.retain(|style| style.id != node);
        self.head.len() != before
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_lifecycle() {
        let mut dom = MemoryDom::new();
        assert!(!dom.has_element("box"));
        assert!(!dom.set_inner_html("box", "<p>x</p>"));

        dom.create_container("box");
        assert!(dom.has_element("box"));
        assert_eq!(dom.inner_html("box"), Some(String::new()));

        assert!(dom.set_inner_html("box", "<p>x</p>"));
        assert_eq!(dom.inner_html("box").as_deref(), Some("<p>x</p>"));

        assert!(dom.remove_element("box"));
        assert!(!dom.remove_element("box"));
        assert_eq!(dom.inner_html("box"), None);
    }

    #[test]
    fn test_style_nodes_are_removed_once() {
        let mut dom = MemoryDom::new();
        let first = dom.append_style("a { color: red; }");
        let second = dom.append_style("b { color: blue; }");
        assert_ne!(first, second);
        assert_eq!(dom.styles(), vec!["a { color: red; }", "b { color: blue; }"]);

        assert!(dom.remove_style(first));
        assert!(!dom.remove_style(first));
        assert_eq!(dom.styles(), vec!["b { color: blue; }"]);
    }

    #[test]
    fn test_select_queries_rendered_document() {
        let mut dom = MemoryDom::new();
        dom.append_style("body { margin: 0; }");
        dom.insert_element("div", "sandbox", "<ul><li>one</li><li>two</li></ul>");

        assert_eq!(dom.select_text("head style").unwrap(), vec!["body { margin: 0; }"]);
        assert_eq!(dom.select_text("#sandbox li").unwrap(), vec!["one", "two"]);
        assert_eq!(
            dom.select_inner_html("#sandbox").unwrap(),
            vec!["<ul><li>one</li><li>two</li></ul>"]
        );
    }

    #[test]
    fn test_invalid_selector() {
        let dom = MemoryDom::new();
        let result = dom.select_text("div[");
        assert!(matches!(result, Err(FixtureError::InvalidSelector { .. })));
    }

    #[test]
    fn test_ids_are_escaped_when_rendering() {
        let mut dom = MemoryDom::new();
        dom.insert_element("div", "a\"b", "");
        assert!(dom.to_html().contains("<div id=\"a&quot;b\"></div>"));
    }
}
