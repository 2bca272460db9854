// Render regions.
// A region owns a wrapper element whose content is always replaced whole.

use super::node::{Node, escape};

/// Designated subtree whose content is fully replaced on each update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    tag: &'static str,
    class: &'static str,
    content: Vec<Node>,
}

impl Region {
    pub fn new(tag: &'static str, class: &'static str) -> Self {
        Self {
            tag,
            class,
            content: Vec::new(),
        }
    }

    pub fn content(&self) -> &[Node] {
        &self.content
    }

    /// Replace the whole content. Nothing from the previous render survives.
    pub fn replace(&mut self, content: Vec<Node>) {
        self.content = content;
    }

    pub fn text_content(&self) -> String {
        self.content.iter().map(Node::text_content).collect()
    }

    /// Write the region, with `trailing` rendered after its own content
    /// inside the wrapper.
    pub fn write_html_with(&self, out: &mut String, trailing: impl FnOnce(&mut String)) {
        out.push_str(&format!("<{} class=\"{}\">", self.tag, escape(self.class)));
        for node in &self.content {
            node.write_html(out);
        }
        trailing(out);
        out.push_str(&format!("</{}>", self.tag));
    }

    pub fn write_html(&self, out: &mut String) {
        self.write_html_with(out, |_| {});
    }
}
