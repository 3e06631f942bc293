//! Parses HTML into the owned tree of `crate::dom::dom_tree`.
//!
//! html5ever does the tokenizing and tree construction; this module only
//! provides the `TreeSink` that records the result.

use crate::dom::dom_tree::{self, Handle, Node, NodeData};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink},
    LocalName, Namespace, QualName,
};
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

/// Parses a complete HTML document.
pub fn create_dom_tree(html_content: &str) -> dom_tree::Document {
    let tree_sink = PrettifyTreeSink::new();
    html5ever::parse_document(tree_sink, Default::default()).one(html_content)
}

/// Builds a `dom_tree::Document` from html5ever's tree construction callbacks.
pub struct PrettifyTreeSink {
    document: dom_tree::Document,
    quirks_mode: RefCell<QuirksMode>,
}

impl Default for PrettifyTreeSink {
    fn default() -> Self {
        Self::new()
    }
}

impl PrettifyTreeSink {
    pub fn new() -> Self {
        Self {
            document: dom_tree::new_document(),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }

    pub fn quirks_mode(&self) -> QuirksMode {
        *self.quirks_mode.borrow()
    }
}

/// Owned element name handed back to html5ever.
#[derive(Debug)]
pub struct OwnedElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for OwnedElemName {
    fn ns(&self) -> &Namespace {
        &self.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.local
    }
}

impl TreeSink for PrettifyTreeSink {
    type Handle = Handle;
    type Output = dom_tree::Document;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        log::trace!("HTML parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match target.borrow().element() {
            Some(elem) => OwnedElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            },
            // html5ever only asks for names of elements.
            None => OwnedElemName {
                ns: Namespace::from(""),
                local: LocalName::from(""),
            },
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attributes = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        Node::new(NodeData::Element(dom_tree::ElementNode::new(
            name, attributes,
        )))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        Node::new(NodeData::Comment(text.to_string()))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        Node::new(NodeData::Comment(format!("?{} {}?", target, data)))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => dom_tree::append_child(parent, node),
            NodeOrText::AppendText(text) => dom_tree::append_text(parent, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = element
            .borrow()
            .parent
            .as_ref()
            .is_some_and(|parent| parent.upgrade().is_some());
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.document.doctype.borrow_mut() = Some(dom_tree::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    /// Template contents live directly under the template element.
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        match new_node {
            NodeOrText::AppendNode(node) => dom_tree::insert_before(sibling, node),
            NodeOrText::AppendText(text) => dom_tree::insert_text_before(sibling, &text),
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        let mut target_node = target.borrow_mut();
        if let NodeData::Element(elem) = &mut target_node.data {
            for attr in attrs {
                let key = attr.name.local.to_string();
                if !elem.attributes.iter().any(|(k, _)| k == &key) {
                    elem.attributes.push((key, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        dom_tree::detach(target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        dom_tree::reparent_children(node, new_parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn outline(node: &Handle, depth: usize, out: &mut Vec<String>) {
        let node_ref = node.borrow();
        match &node_ref.data {
            NodeData::DocumentRoot => {}
            NodeData::Element(elem) => out.push(format!("{}{}", "  ".repeat(depth), elem.tag)),
            NodeData::Text(text) if !text.trim().is_empty() => {
                out.push(format!("{}#{}", "  ".repeat(depth), text.trim()))
            }
            NodeData::Text(_) => {}
            NodeData::Comment(text) => out.push(format!("{}!{}", "  ".repeat(depth), text)),
        }
        let child_depth = if matches!(node_ref.data, NodeData::DocumentRoot) { depth } else { depth + 1 };
        for child in &node_ref.children {
            outline(child, child_depth, out);
        }
    }

    fn structure(html: &str) -> Vec<String> {
        let document = create_dom_tree(html);
        let mut out = Vec::new();
        outline(&document.root, 0, &mut out);
        out
    }

    #[test]
    fn test_basic_structure() {
        let html = "<!DOCTYPE html><html><head><title>Test</title></head><body><h1>Hello</h1><p>World</p></body></html>";
        let document = create_dom_tree(html);
        assert_eq!(document.doctype.borrow().as_ref().unwrap().name, "html");
        assert_eq!(
            structure(html),
            vec![
                "html", "  head", "    title", "      #Test", "  body", "    h1", "      #Hello",
                "    p", "      #World",
            ]
        );
    }

    #[test]
    fn test_fragment_gets_implied_elements() {
        assert_eq!(
            structure("<p>one<!-- note --></p>"),
            vec!["html", "  head", "  body", "    p", "      #one", "      ! note "]
        );
    }

    #[test]
    fn test_misnested_formatting_is_repaired() {
        // The adoption agency algorithm reparents and removes nodes.
        assert_eq!(
            structure("<b>1<p>2</b>3</p>"),
            vec![
                "html", "  head", "  body", "    b", "      #1", "    p", "      b", "        #2",
                "      #3",
            ]
        );
    }

    #[test]
    fn test_attributes_keep_source_order() {
        let document = create_dom_tree("<a href=\"x\" class=\"c\" id=\"i\">t</a>");
        let html = Rc::clone(&document.root.borrow().children[0]);
        let body = Rc::clone(&html.borrow().children[1]);
        let anchor = Rc::clone(&body.borrow().children[0]);
        let anchor_ref = anchor.borrow();
        let attributes: Vec<&str> = anchor_ref
            .element()
            .unwrap()
            .attributes
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(attributes, vec!["href", "class", "id"]);
    }
}
