//! Arena-based mutable DOM.
//!
//! Every node lives in one contiguous vector and links to its relatives by
//! index. Detached nodes stay in the arena; they simply have no parent.
//! That keeps handles stable across the restructuring done by block
//! decorators, which move whole subtrees between containers.

use html5ever::{LocalName, Namespace, QualName, ns};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaNodeId(pub u32);

impl ArenaNodeId {
    /// Sentinel value for no node.
    pub const NONE: ArenaNodeId = ArenaNodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum ArenaNodeData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
    },
    Text(String),
    Comment(String),
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// Attribute in the null namespace, which is where HTML attributes live.
    pub fn new(local: &str, value: impl Into<String>) -> Self {
        Self {
            name: QualName::new(None, ns!(), LocalName::from(local)),
            value: value.into(),
        }
    }
}

/// A node in the arena DOM.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: ArenaNodeData,
    pub parent: ArenaNodeId,
    pub first_child: ArenaNodeId,
    pub last_child: ArenaNodeId,
    pub prev_sibling: ArenaNodeId,
    pub next_sibling: ArenaNodeId,
}

impl ArenaNode {
    fn new(data: ArenaNodeData) -> Self {
        Self {
            data,
            parent: ArenaNodeId::NONE,
            first_child: ArenaNodeId::NONE,
            last_child: ArenaNodeId::NONE,
            prev_sibling: ArenaNodeId::NONE,
            next_sibling: ArenaNodeId::NONE,
        }
    }
}

/// Arena-based DOM tree.
pub struct ArenaDom {
    nodes: Vec<ArenaNode>,
    document: ArenaNodeId,
}

impl ArenaDom {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: ArenaNodeId::NONE,
        };
        dom.document = dom.alloc(ArenaNode::new(ArenaNodeData::Document));
        dom
    }

    fn alloc(&mut self, node: ArenaNode) -> ArenaNodeId {
        let id = ArenaNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn document(&self) -> ArenaNodeId {
        self.document
    }

    pub fn get(&self, id: ArenaNodeId) -> Option<&ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ArenaNodeId) -> Option<&mut ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Element { name, attrs }))
    }

    /// Create a detached HTML element by tag name, like `document.createElement`.
    pub fn create_html_element(&mut self, tag: &str) -> ArenaNodeId {
        self.create_element(QualName::new(None, ns!(html), LocalName::from(tag)), Vec::new())
    }

    pub fn create_text(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Text(text)))
    }

    pub fn create_comment(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Comment(text)))
    }

    pub fn create_doctype(
        &mut self,
        name: String,
        public_id: String,
        system_id: String,
    ) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Doctype {
            name,
            public_id,
            system_id,
        }))
    }

    /// Append a child to a parent node, detaching it from any previous parent.
    pub fn append(&mut self, parent: ArenaNodeId, child: ArenaNodeId) {
        self.detach(child);

        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
        }

        if last_child.is_some()
            && let Some(last_node) = self.get_mut(last_child)
        {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: ArenaNodeId, new_node: ArenaNodeId) {
        self.detach(new_node);

        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Append text, merging into the last child when it is already a text node.
    pub fn append_text(&mut self, parent: ArenaNodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let ArenaNodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Unlink a node from its parent and siblings. The subtree stays intact.
    pub fn detach(&mut self, target: ArenaNodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = ArenaNodeId::NONE;
            node.prev_sibling = ArenaNodeId::NONE;
            node.next_sibling = ArenaNodeId::NONE;
        }
    }

    /// Detach every child of `node`, returning them in document order.
    pub fn take_children(&mut self, node: ArenaNodeId) -> Vec<ArenaNodeId> {
        let children: Vec<_> = self.children(node).collect();
        for &child in &children {
            if let Some(c) = self.get_mut(child) {
                c.parent = ArenaNodeId::NONE;
                c.prev_sibling = ArenaNodeId::NONE;
                c.next_sibling = ArenaNodeId::NONE;
            }
        }
        if let Some(n) = self.get_mut(node) {
            n.first_child = ArenaNodeId::NONE;
            n.last_child = ArenaNodeId::NONE;
        }
        children
    }

    /// Move all children of `node` to the end of `new_parent`.
    pub fn reparent_children(&mut self, node: ArenaNodeId, new_parent: ArenaNodeId) {
        for child in self.take_children(node) {
            self.append(new_parent, child);
        }
    }

    /// Number of allocated nodes, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the DOM is empty (only has document root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn children(&self, parent: ArenaNodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(ArenaNodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Element children only, like `Element.children`.
    pub fn element_children(&self, parent: ArenaNodeId) -> impl Iterator<Item = ArenaNodeId> + '_ {
        self.children(parent).filter(|&id| self.is_element(id))
    }

    /// All descendants of `root` in document order, `root` excluded.
    pub fn descendants(&self, root: ArenaNodeId) -> Vec<ArenaNodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<_> = self.children(root).collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            out.push(id);
            let mark = stack.len();
            stack.extend(self.children(id));
            stack[mark..].reverse();
        }
        out
    }

    /// Find the first node matching a predicate (DFS from the document).
    pub fn find<F>(&self, predicate: F) -> Option<ArenaNodeId>
    where
        F: Fn(&ArenaNode) -> bool,
    {
        self.descendants(self.document)
            .into_iter()
            .find(|&id| self.get(id).is_some_and(&predicate))
    }

    /// Find element by tag name (first match).
    pub fn find_by_tag(&self, tag: &str) -> Option<ArenaNodeId> {
        self.find(|node| match &node.data {
            ArenaNodeData::Element { name, .. } => name.local.as_ref() == tag,
            _ => false,
        })
    }
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    current: ArenaNodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(ArenaNodeId::NONE);
        Some(id)
    }
}

/// Element accessors and attribute mutation.
impl ArenaDom {
    pub fn element_name(&self, id: ArenaNodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    pub fn element_namespace(&self, id: ArenaNodeId) -> Option<&Namespace> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { name, .. } => Some(&name.ns),
            _ => None,
        })
    }

    pub fn attrs(&self, id: ArenaNodeId) -> &[Attribute] {
        self.get(id)
            .and_then(|n| match &n.data {
                ArenaNodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn get_attr(&self, id: ArenaNodeId, attr_name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name.local.as_ref() == attr_name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing any existing value. No-op on non-elements.
    pub fn set_attr(&mut self, id: ArenaNodeId, attr_name: &str, value: &str) {
        let Some(ArenaNode {
            data: ArenaNodeData::Element { attrs, .. },
            ..
        }) = self.get_mut(id)
        else {
            return;
        };
        match attrs.iter_mut().find(|a| a.name.local.as_ref() == attr_name) {
            Some(attr) => attr.value = value.to_string(),
            None => attrs.push(Attribute::new(attr_name, value)),
        }
    }

    pub fn element_id(&self, id: ArenaNodeId) -> Option<&str> {
        self.get_attr(id, "id")
    }

    /// Tokens of the `class` attribute.
    pub fn classes(&self, id: ArenaNodeId) -> impl Iterator<Item = &str> {
        self.get_attr(id, "class")
            .unwrap_or("")
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, id: ArenaNodeId, class: &str) -> bool {
        self.classes(id).any(|c| c == class)
    }

    /// `classList.add`: returns true when the class was not already present.
    pub fn add_class(&mut self, id: ArenaNodeId, class: &str) -> bool {
        if !self.is_element(id) || self.has_class(id, class) {
            return false;
        }
        let mut value = self.get_attr(id, "class").unwrap_or("").trim().to_string();
        if !value.is_empty() {
            value.push(' ');
        }
        value.push_str(class);
        self.set_attr(id, "class", &value);
        true
    }

    /// `classList.remove`: returns true when the class was present.
    pub fn remove_class(&mut self, id: ArenaNodeId, class: &str) -> bool {
        if !self.has_class(id, class) {
            return false;
        }
        let value = self
            .classes(id)
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(id, "class", &value);
        true
    }

    pub fn is_element(&self, id: ArenaNodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, ArenaNodeData::Element { .. }))
    }

    /// Whether `id` is the document or reachable from it through parent
    /// links. Nodes removed from the tree stay in the arena but are not
    /// connected.
    pub fn is_connected(&self, id: ArenaNodeId) -> bool {
        let mut current = id;
        while let Some(node) = self.get(current) {
            if current == self.document {
                return true;
            }
            current = node.parent;
        }
        false
    }

    /// Text of a single text node.
    pub fn text(&self, id: ArenaNodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of a node and all its descendants, like `Node.textContent`.
    pub fn text_content(&self, id: ArenaNodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.text(d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_children() {
        let mut dom = ArenaDom::new();

        let parent = dom.create_html_element("div");
        let child1 = dom.create_html_element("p");
        let child2 = dom.create_html_element("p");

        dom.append(dom.document(), parent);
        dom.append(parent, child1);
        dom.append(parent, child2);

        let children: Vec<_> = dom.children(parent).collect();
        assert_eq!(children, vec![child1, child2]);
        assert_eq!(dom.get(child2).unwrap().prev_sibling, child1);
    }

    #[test]
    fn test_append_moves_between_parents() {
        let mut dom = ArenaDom::new();
        let a = dom.create_html_element("div");
        let b = dom.create_html_element("div");
        let p = dom.create_html_element("p");

        dom.append(a, p);
        dom.append(b, p);

        assert_eq!(dom.children(a).count(), 0);
        assert_eq!(dom.children(b).collect::<Vec<_>>(), vec![p]);
        assert_eq!(dom.get(p).unwrap().parent, b);
    }

    #[test]
    fn test_text_merging() {
        let mut dom = ArenaDom::new();

        let p = dom.create_html_element("p");
        dom.append(dom.document(), p);

        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_detach_middle_child() {
        let mut dom = ArenaDom::new();
        let parent = dom.create_html_element("div");
        let kids: Vec<_> = (0..3).map(|_| dom.create_html_element("span")).collect();
        for &k in &kids {
            dom.append(parent, k);
        }

        dom.detach(kids[1]);

        assert_eq!(dom.children(parent).collect::<Vec<_>>(), vec![kids[0], kids[2]]);
        assert_eq!(dom.get(kids[2]).unwrap().prev_sibling, kids[0]);
    }

    #[test]
    fn test_take_children_empties_parent() {
        let mut dom = ArenaDom::new();
        let parent = dom.create_html_element("div");
        dom.append_text(parent, "a");
        let em = dom.create_html_element("em");
        dom.append(parent, em);

        let taken = dom.take_children(parent);

        assert_eq!(taken.len(), 2);
        assert_eq!(dom.children(parent).count(), 0);
        assert!(dom.get(em).unwrap().parent.is_none());
    }

    #[test]
    fn test_class_list_operations() {
        let mut dom = ArenaDom::new();
        let div = dom.create_html_element("div");
        dom.set_attr(div, "class", "quote  block");

        assert!(dom.add_class(div, "mobile-layout"));
        assert!(!dom.add_class(div, "mobile-layout"));
        assert_eq!(dom.get_attr(div, "class"), Some("quote  block mobile-layout"));

        assert!(dom.remove_class(div, "block"));
        assert!(!dom.remove_class(div, "block"));
        assert_eq!(dom.get_attr(div, "class"), Some("quote mobile-layout"));
    }

    #[test]
    fn test_set_attr_replaces_value() {
        let mut dom = ArenaDom::new();
        let div = dom.create_html_element("div");
        dom.set_attr(div, "role", "group");
        dom.set_attr(div, "role", "figure");

        assert_eq!(dom.attrs(div).len(), 1);
        assert_eq!(dom.get_attr(div, "role"), Some("figure"));
    }

    #[test]
    fn test_is_connected_follows_parents() {
        let mut dom = ArenaDom::new();
        let outer = dom.create_html_element("div");
        let inner = dom.create_html_element("span");
        dom.append(outer, inner);
        assert!(!dom.is_connected(inner));

        dom.append(dom.document(), outer);
        assert!(dom.is_connected(dom.document()));
        assert!(dom.is_connected(inner));

        dom.take_children(outer);
        assert!(!dom.is_connected(inner));
        assert!(dom.is_connected(outer));
        assert!(!dom.is_connected(ArenaNodeId::NONE));
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut dom = ArenaDom::new();
        let p = dom.create_html_element("p");
        dom.append_text(p, "  Jane ");
        let strong = dom.create_html_element("strong");
        dom.append_text(strong, "Doe");
        dom.append(p, strong);
        dom.append_text(p, "  ");

        assert_eq!(dom.text_content(p), "  Jane Doe  ");
    }
}
