use html5ever::QualName;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub mod dom_tree {
    use super::*;

    pub type Handle = Rc<RefCell<Node>>;
    pub type WeakHandle = Weak<RefCell<Node>>;

    #[derive(Debug)]
    pub enum NodeData {
        DocumentRoot,
        Element(ElementNode),
        Text(String),
        Comment(String),
    }

    #[derive(Debug)]
    pub struct Node {
        pub data: NodeData,
        pub parent: Option<WeakHandle>,
        pub children: Vec<Handle>,
    }

    #[derive(Debug, Clone)]
    pub struct ElementNode {
        pub tag: String,
        pub qual_name: QualName,
        /// Attributes in source order.
        pub attributes: Vec<(String, String)>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: Handle,
        pub doctype: RefCell<Option<Doctype>>,
    }

    #[derive(Debug, Clone)]
    pub struct Doctype {
        pub name: String,
        pub public_id: String,
        pub system_id: String,
    }

    impl Node {
        pub fn new(data: NodeData) -> Handle {
            Rc::new(RefCell::new(Node {
                data,
                parent: None,
                children: Vec::new(),
            }))
        }

        pub fn element(&self) -> Option<&ElementNode> {
            match &self.data {
                NodeData::Element(elem) => Some(elem),
                _ => None,
            }
        }
    }

    impl ElementNode {
        pub fn new(qual_name: QualName, attributes: Vec<(String, String)>) -> Self {
            ElementNode {
                tag: qual_name.local.to_string(),
                qual_name,
                attributes,
            }
        }
    }

    pub fn new_document() -> Document {
        Document {
            root: Node::new(NodeData::DocumentRoot),
            doctype: RefCell::new(None),
        }
    }

    /// Unlinks `child` from its parent, if it has one.
    pub fn detach(child: &Handle) {
        let parent = child.borrow_mut().parent.take();
        if let Some(parent) = parent.and_then(|weak| weak.upgrade()) {
            parent
                .borrow_mut()
                .children
                .retain(|sibling| !Rc::ptr_eq(sibling, child));
        }
    }

    /// Moves `child` to the end of `parent`'s children.
    pub fn append_child(parent: &Handle, child: Handle) {
        detach(&child);
        child.borrow_mut().parent = Some(Rc::downgrade(parent));
        parent.borrow_mut().children.push(child);
    }

    /// Appends text to `parent`, merging it into a trailing text node.
    pub fn append_text(parent: &Handle, text: &str) {
        let mut parent_node = parent.borrow_mut();
        if let Some(last) = parent_node.children.last() {
            if let NodeData::Text(existing) = &mut last.borrow_mut().data {
                existing.push_str(text);
                return;
            }
        }
        let node = Node::new(NodeData::Text(text.to_string()));
        node.borrow_mut().parent = Some(Rc::downgrade(parent));
        parent_node.children.push(node);
    }

    /// Parent of `node` and the position of `node` among its children.
    pub fn position_in_parent(node: &Handle) -> Option<(Handle, usize)> {
        let parent = node.borrow().parent.as_ref()?.upgrade()?;
        let index = parent
            .borrow()
            .children
            .iter()
            .position(|sibling| Rc::ptr_eq(sibling, node))?;
        Some((parent, index))
    }

    /// Inserts `child` right before `sibling`.
    pub fn insert_before(sibling: &Handle, child: Handle) {
        detach(&child);
        let Some((parent, index)) = position_in_parent(sibling) else {
            return;
        };
        child.borrow_mut().parent = Some(Rc::downgrade(&parent));
        parent.borrow_mut().children.insert(index, child);
    }

    /// Inserts text right before `sibling`, merging with a text node already there.
    pub fn insert_text_before(sibling: &Handle, text: &str) {
        let Some((parent, index)) = position_in_parent(sibling) else {
            return;
        };
        if index > 0 {
            let previous = Rc::clone(&parent.borrow().children[index - 1]);
            let mut previous_node = previous.borrow_mut();
            if let NodeData::Text(existing) = &mut previous_node.data {
                existing.push_str(text);
                return;
            }
        }
        let node = Node::new(NodeData::Text(text.to_string()));
        node.borrow_mut().parent = Some(Rc::downgrade(&parent));
        parent.borrow_mut().children.insert(index, node);
    }

    /// Moves every child of `node` to the end of `new_parent`.
    pub fn reparent_children(node: &Handle, new_parent: &Handle) {
        let children = std::mem::take(&mut node.borrow_mut().children);
        for child in &children {
            child.borrow_mut().parent = Some(Rc::downgrade(new_parent));
        }
        new_parent.borrow_mut().children.extend(children);
    }
}

#[cfg(test)]
mod tests {
    use super::dom_tree::*;
    use html5ever::{LocalName, Namespace, QualName};
    use std::rc::Rc;

    fn element(tag: &str) -> Handle {
        let name = QualName::new(None, Namespace::from("http://www.w3.org/1999/xhtml"), LocalName::from(tag));
        Node::new(NodeData::Element(ElementNode::new(name, Vec::new())))
    }

    fn tags(parent: &Handle) -> Vec<String> {
        parent
            .borrow()
            .children
            .iter()
            .map(|child| match &child.borrow().data {
                NodeData::Element(elem) => elem.tag.clone(),
                NodeData::Text(text) => format!("#{}", text),
                _ => "?".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_append_moves_between_parents() {
        let a = element("div");
        let b = element("span");
        let child = element("p");
        append_child(&a, Rc::clone(&child));
        append_child(&b, Rc::clone(&child));
        assert!(tags(&a).is_empty());
        assert_eq!(tags(&b), vec!["p"]);
    }

    #[test]
    fn test_text_merges() {
        let div = element("div");
        append_text(&div, "Hello");
        append_text(&div, " world");
        assert_eq!(tags(&div), vec!["#Hello world"]);
    }

    #[test]
    fn test_insert_before_and_reparent() {
        let div = element("div");
        let p = element("p");
        append_child(&div, Rc::clone(&p));
        insert_before(&p, element("h1"));
        insert_text_before(&p, "x");
        assert_eq!(tags(&div), vec!["h1", "#x", "p"]);
        insert_text_before(&p, "y");
        assert_eq!(tags(&div), vec!["h1", "#xy", "p"]);

        let section = element("section");
        reparent_children(&div, &section);
        assert!(tags(&div).is_empty());
        assert_eq!(tags(&section), vec!["h1", "#x", "p"]);
        let (parent, index) = position_in_parent(&p).unwrap();
        assert!(Rc::ptr_eq(&parent, &section));
        assert_eq!(index, 2);
    }
}
