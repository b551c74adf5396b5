use log::debug;

use crate::dom::{Dom, StyleNodeId};
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::loader::Fixtures;

/// Style nodes injected by the loader, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRegistry {
    nodes: Vec<StyleNodeId>,
}

impl StyleRegistry {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StyleNodeId> + '_ {
        self.nodes.iter().copied()
    }

    fn push(&mut self, node: StyleNodeId) {
        self.nodes.push(node);
    }

    fn drain(&mut self) -> std::vec::Drain<'_, StyleNodeId> {
        self.nodes.drain(..)
    }
}

impl<F: Fetcher, D: Dom> Fixtures<F, D> {
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Append the CSS fixture at `path` as a new style node, keeping prior ones.
    pub fn append_css(&mut self, path: &str) -> Result<()> {
        let css = self.markup(path)?;
        self.append_style(&css);
        Ok(())
    }

    /// Append the HTML fixture at `path` to the container's current markup.
    pub fn append_html(&mut self, path: &str) -> Result<()> {
        let html = self.markup(path)?;
        let id = self.container();
        let mut current = self.dom.inner_html(&id).unwrap_or_default();
        current.push_str(&html);
        self.dom.set_inner_html(&id, &current);
        Ok(())
    }

    /// Replace every injected style node with the CSS fixture at `path`.
    pub fn load_css(&mut self, path: &str) -> Result<()> {
        let css = self.markup(path)?;
        self.set_css(&css);
        Ok(())
    }

    /// Replace the container's content with the HTML fixture at `path`.
    pub fn load_html(&mut self, path: &str) -> Result<()> {
        let html = self.markup(path)?;
        self.set_html(&html);
        Ok(())
    }

    pub fn set_css(&mut self, css: &str) {
        self.clear_css();
        self.append_style(css);
    }

    pub fn set_html(&mut self, html: &str) {
        let id = self.container();
        self.dom.set_inner_html(&id, html);
    }

    /// Remove every injected style node still in the document and forget them.
    pub fn clear_css(&mut self) {
        for node in self.styles.drain() {
            if !self.dom.remove_style(node) {
                debug!("Style node {:?} was already detached", node);
            }
        }
    }

    /// Remove the container from the document. The next write recreates it.
    pub fn clear_html(&mut self) {
        let id = &self.config.container_id;
        if !self.dom.remove_element(id) {
            debug!("Container #{} not present, nothing to clear", id);
        }
    }

    /// Id of the fixture container, created and appended to the body if it
    /// is missing. Looked up on every call so external removal is tolerated.
    pub fn container(&mut self) -> String {
        let id = self.config.container_id.clone();
        if !self.dom.has_element(&id) {
            self.dom.create_container(&id);
        }
        id
    }

    fn append_style(&mut self, css: &str) {
        let node = self.dom.append_style(css);
        debug!("Injected style node {:?}", node);
        self.styles.push(node);
    }
}
