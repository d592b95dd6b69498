//! The universal AST datum.
//!
//! A single sum-typed representation — token tag plus a children vector —
//! rather than one Rust type per token, following the design notes' guidance
//! that the closed ~80-token set is better served by one node shape than by
//! an enum with ~80 variants. Parent links are non-owning (`Weak`); the owner
//! of a node is always its parent's children vector (or nothing, for a root).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::location::Location;
use crate::symtab::SymbolTable;
use crate::token::Token;

struct NodeData {
    token: Token,
    location: Option<Location>,
    children: Vec<Node>,
    parent: Option<Weak<RefCell<NodeData>>>,
    symtab: Option<SymbolTable>,
}

/// A handle to a node in the tree. Cloning a `Node` clones the handle, not
/// the subtree; two handles to the same node are `==` and share mutations.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

impl Node {
    /// A leaf or branch with no location (a structural wrapper like `Group`
    /// or `Block` that exists only to hold children).
    pub fn new(token: Token) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            token,
            location: None,
            children: Vec::new(),
            parent: None,
            symtab: if token.is_symtab() {
                Some(SymbolTable::new())
            } else {
                None
            },
        })))
    }

    /// A leaf that carries a source location (identifiers, literals, symbols).
    pub fn new_leaf(token: Token, location: Location) -> Self {
        let node = Self::new(token);
        node.0.borrow_mut().location = Some(location);
        node
    }

    pub fn token(&self) -> Token {
        self.0.borrow().token
    }

    pub fn location(&self) -> Option<Location> {
        self.0.borrow().location.clone()
    }

    /// The node's printable value: its own location if it carries one,
    /// otherwise the location of its first `print`-capable descendant.
    pub fn printable_location(&self) -> Option<Location> {
        if self.token().is_print() {
            return self.location();
        }
        self.children()
            .iter()
            .find_map(|c| c.printable_location())
    }

    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn child(&self, index: usize) -> Option<Node> {
        self.0.borrow().children.get(index).cloned()
    }

    pub fn is_leaf(&self) -> bool {
        self.0.borrow().children.is_empty()
    }

    /// Non-owning back-reference to the parent, if any.
    pub fn parent(&self) -> Option<Node> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(|weak| weak.upgrade())
            .map(Node)
    }

    /// Walk upward, inclusive of `self`, until `pred` matches.
    pub fn find_ancestor(&self, pred: impl Fn(&Node) -> bool) -> Option<Node> {
        let mut cur = Some(self.clone());
        while let Some(n) = cur {
            if pred(&n) {
                return Some(n);
            }
            cur = n.parent();
        }
        None
    }

    /// The nearest ancestor (inclusive) carrying token `kind`, used by `Lift`
    /// replacements to hoist a produced node to an enclosing class/block.
    pub fn find_ancestor_of(&self, kind: Token) -> Option<Node> {
        self.find_ancestor(|n| n.token() == kind)
    }

    /// The nearest `symtab`-bearing ancestor (inclusive of `self`).
    pub fn find_scope(&self) -> Option<Node> {
        self.find_ancestor(|n| n.token().is_symtab())
    }

    /// Append a child, wiring its parent back-reference. Panics if `child`
    /// already has a parent — a node has exactly one owner.
    pub fn push(&self, child: Node) {
        assert!(
            child.parent().is_none(),
            "node {:?} already has a parent; clone the subtree before re-attaching",
            child.token()
        );
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(child);
    }

    pub fn extend(&self, children: impl IntoIterator<Item = Node>) {
        for c in children {
            self.push(c);
        }
    }

    /// Detach `child` from this node's children, clearing its parent link.
    /// Returns `false` if `child` was not found among the direct children.
    pub fn remove_child(&self, child: &Node) -> bool {
        let mut data = self.0.borrow_mut();
        if let Some(pos) = data.children.iter().position(|c| c == child) {
            data.children.remove(pos);
            drop(data);
            child.0.borrow_mut().parent = None;
            true
        } else {
            false
        }
    }

    /// Replace this node's children wholesale with `children`, clearing and
    /// re-wiring parent back-references. Used by rule actions that splice a
    /// rewritten sequence into the tree.
    pub fn replace_children(&self, children: impl IntoIterator<Item = Node>) {
        let old: Vec<Node> = self.0.borrow().children.clone();
        for c in &old {
            c.0.borrow_mut().parent = None;
        }
        self.0.borrow_mut().children.clear();
        self.extend(children);
    }

    /// Overwrite this node's token, location, and children with
    /// `replacement`'s, keeping `self`'s identity (and thus its place in its
    /// parent's children) but taking on the replacement's shape. Used by the
    /// rewrite engine's `Replace` action, which re-examines the mutated node
    /// in place rather than re-parenting a new one.
    pub fn become_node(&self, replacement: Node) {
        let (token, location, children) = {
            let data = replacement.0.borrow();
            (data.token, data.location.clone(), data.children.clone())
        };
        for child in &children {
            child.0.borrow_mut().parent = None;
        }
        {
            let mut data = self.0.borrow_mut();
            data.token = token;
            data.location = location;
            data.symtab = if token.is_symtab() {
                Some(SymbolTable::new())
            } else {
                None
            };
        }
        self.replace_children(children);
    }

    /// Replace this node's own slot in its parent's children with zero or
    /// more nodes, detaching `self`. Used by the rewrite engine's `Splice`,
    /// `Delete`, and `Lift` actions, which can turn one node into many (or
    /// none). Panics if `self` has no parent: splicing the root this way is
    /// not a supported operation.
    pub fn splice_siblings(&self, replacements: Vec<Node>) {
        self.splice_siblings_with(|_detached| replacements)
    }

    /// Like [`Node::splice_siblings`], but `build` receives `self` already
    /// detached from its parent (so it is free to be re-attached as a child
    /// of one of the nodes `build` returns) before the replacements are
    /// spliced into the original position. Used to wrap a node in a new
    /// parent (e.g. an `Error` node wrapping its offending fragment) without
    /// disturbing the fragment's own children.
    pub fn splice_siblings_with(&self, build: impl FnOnce(Node) -> Vec<Node>) {
        let parent = self
            .parent()
            .expect("splice_siblings requires a parent; cannot splice the root");
        let pos = {
            let data = parent.0.borrow();
            data.children
                .iter()
                .position(|c| c == self)
                .expect("self not found among parent's children")
        };
        parent.0.borrow_mut().children.remove(pos);
        self.0.borrow_mut().parent = None;

        let replacements = build(self.clone());
        for (i, repl) in replacements.into_iter().enumerate() {
            assert!(
                repl.parent().is_none(),
                "node {:?} already has a parent; clone the subtree before splicing",
                repl.token()
            );
            repl.0.borrow_mut().parent = Some(Rc::downgrade(&parent.0));
            parent.0.borrow_mut().children.insert(pos + i, repl);
        }
    }

    /// The symbol table owned by this node, if its token carries `symtab`.
    pub fn symtab(&self) -> Option<SymbolTable> {
        self.0.borrow().symtab.clone()
    }

    /// A fresh, unique identifier string for synthesized bindings (fresh type
    /// variables, closure-capture fields). Not derived from any location,
    /// since the node it names has no concrete-syntax counterpart.
    pub fn fresh(&self, prefix: &str) -> String {
        let addr = Rc::as_ptr(&self.0) as usize;
        format!("{prefix}${addr:x}")
    }

    /// A structural copy, detached from any parent. Needed wherever a
    /// definition subtree (a `TypeParam`, an identifier) is reused at a
    /// second site: `push` refuses to re-parent a node that already has an
    /// owner, so lookup's type-parameter extraction clones instead.
    pub fn deep_clone(&self) -> Node {
        let data = self.0.borrow();
        let clone = Node(Rc::new(RefCell::new(NodeData {
            token: data.token,
            location: data.location.clone(),
            children: Vec::new(),
            parent: None,
            symtab: if data.token.is_symtab() {
                Some(SymbolTable::new())
            } else {
                None
            },
        })));
        for child in &data.children {
            clone.push(child.deep_clone());
        }
        clone
    }

    /// Parenthesised text dump used as the test-comparison surface: each
    /// node is `(token location child child ...)`, literals print their
    /// location text, structural nodes print only their children.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        out.push('(');
        out.push_str(self.token().name());
        if self.token().is_print() {
            if let Some(loc) = self.location() {
                out.push(' ');
                out.push_str(loc.text());
            }
        }
        for child in self.children() {
            out.push('\n');
            out.push_str(&"  ".repeat(depth + 1));
            child.dump_into(out, depth + 1);
        }
        out.push(')');
    }
}

impl PartialEq for Node {
    /// Identity, not structural, equality — matches the original's `NodeSet`
    /// of visited *definition nodes* used for cycle detection: re-visiting
    /// the same node (not merely an equal-looking one) signals a cycle.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.token())
    }
}
