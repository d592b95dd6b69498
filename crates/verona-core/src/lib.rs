//! Core AST data structures shared by every subsystem of the Verona
//! compiler front-end: the [`Node`] tree, the [`Token`] set and its
//! capability flags, source [`Location`]s, and per-scope [`SymbolTable`]s.
//!
//! Nothing in this crate depends on any other workspace crate; the rewrite
//! engine, lookup, and subtyping subsystems are all built on top of it.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod interner;
mod location;
mod node;
mod symtab;
mod token;

pub use interner::{Interner, Symbol};
pub use location::{Location, SourceFile};
pub use node::Node;
pub use symtab::{BindError, SymbolTable, lookup_upward};
pub use token::{Capability, Token};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn loc(file: &Arc<SourceFile>, offset: u32, len: u32) -> Location {
        Location::new(file.clone(), offset, len)
    }

    #[test]
    fn locations_compare_by_content() {
        let a = SourceFile::new("a.verona", "foo foo");
        let first = loc(&a, 0, 3);
        let second = loc(&a, 4, 3);
        assert_eq!(first, second);
        assert_eq!(first.text(), "foo");
    }

    #[test]
    fn push_wires_parent_back_reference() {
        let class = Node::new(Token::Class);
        let body = Node::new(Token::ClassBody);
        class.push(body.clone());
        assert_eq!(body.parent().unwrap(), class);
        assert_eq!(class.child_count(), 1);
    }

    #[test]
    #[should_panic(expected = "already has a parent")]
    fn push_rejects_reparenting_without_detach() {
        let a = Node::new(Token::ClassBody);
        let b = Node::new(Token::ClassBody);
        let child = Node::new(Token::Block);
        a.push(child.clone());
        b.push(child);
    }

    #[test]
    fn remove_child_clears_parent_and_table() {
        let file = SourceFile::new("a.verona", "x");
        let block = Node::new(Token::Block);
        let ident = Node::new_leaf(Token::Let, loc(&file, 0, 1));
        block.push(ident.clone());
        let table = block.symtab().unwrap();
        table.bind("x", ident.clone()).unwrap();
        assert_eq!(table.lookup_local("x").len(), 1);

        assert!(block.remove_child(&ident));
        table.unbind("x", &ident);
        assert!(ident.parent().is_none());
        assert!(table.lookup_local("x").is_empty());
    }

    #[test]
    fn upward_lookup_walks_symtab_ancestors() {
        let file = SourceFile::new("a.verona", "x");
        let outer = Node::new(Token::Block);
        let inner = Node::new(Token::Block);
        outer.push(inner.clone());

        let def = Node::new_leaf(Token::Let, loc(&file, 0, 1));
        outer.symtab().unwrap().bind("x", def.clone()).unwrap();

        let use_site = Node::new(Token::Expr);
        inner.push(use_site.clone());

        let found = lookup_upward(&use_site, "x");
        assert_eq!(found, vec![def]);
    }

    #[test]
    fn shadowing_tokens_stack_most_recent_first() {
        let file = SourceFile::new("a.verona", "x x");
        let table = SymbolTable::new();
        let first = Node::new_leaf(Token::Let, loc(&file, 0, 1));
        let second = Node::new_leaf(Token::Let, loc(&file, 2, 1));
        table.bind("x", first.clone()).unwrap();
        table.bind("x", second.clone()).unwrap();
        assert_eq!(table.lookup_local("x"), vec![second, first]);
    }

    #[test]
    fn non_shadowing_collision_is_an_error() {
        let file = SourceFile::new("a.verona", "C C");
        let table = SymbolTable::new();
        let first = Node::new_leaf(Token::Class, loc(&file, 0, 1));
        let second = Node::new_leaf(Token::Class, loc(&file, 2, 1));
        table.bind("C", first).unwrap();
        assert!(matches!(
            table.bind("C", second),
            Err(BindError::Collision(_))
        ));
    }

    #[test]
    fn node_equality_is_identity_not_structure() {
        let file = SourceFile::new("a.verona", "x x");
        let a = Node::new_leaf(Token::Ident, loc(&file, 0, 1));
        let b = Node::new_leaf(Token::Ident, loc(&file, 2, 1));
        assert_eq!(a.location().unwrap(), b.location().unwrap());
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn dump_is_parenthesised_text() {
        let file = SourceFile::new("a.verona", "x");
        let block = Node::new(Token::Block);
        let ident = Node::new_leaf(Token::Ident, loc(&file, 0, 1));
        block.push(ident);
        assert_eq!(block.dump(), "(block\n  (ident x))");
    }
}
