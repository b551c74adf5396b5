use roxmltree::Node;

/// Parsed XML fixture. Keeps the source text next to an owned element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    source: String,
    root: XmlElement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlDocument {
    pub fn parse(source: &str) -> Result<Self, roxmltree::Error> {
        let document = roxmltree::Document::parse(source)?;
        Ok(XmlDocument {
            source: source.to_string(),
            root: XmlElement::from_node(document.root_element()),
        })
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl XmlElement {
    fn from_node(node: Node) -> Self {
        let attributes = node
            .attributes()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect();

        let mut children = Vec::new();
        for child in node.children() {
            if child.is_element() {
                children.push(XmlNode::Element(XmlElement::from_node(child)));
            } else if child.is_text() {
                let text = child.text().unwrap_or("");
                // Indentation between elements carries no content
                if !text.trim().is_empty() {
                    children.push(XmlNode::Text(text.to_string()));
                }
            }
        }

        XmlElement {
            name: node.tag_name().name().to_string(),
            attributes,
            children,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Concatenated text of this element and its descendants.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                XmlNode::Text(t) => text.push_str(t),
                XmlNode::Element(element) => text.push_str(&element.text()),
            }
        }
        text
    }
}
