//! Whether a type expression is valid as a predicate bound (the upper
//! bound of a predicate-kinded type parameter): a `TypeSubtype` assertion,
//! closed under union, intersection, and (necessarily non-recursive, by
//! [`crate::lookup_recursive`]) alias unfolding.

use verona_core::{Node, Token};

pub fn lookup_valid_predicate(node: &Node) -> bool {
    match node.token() {
        Token::TypeSubtype => true,
        Token::TypeUnion | Token::TypeIsect => node.children().iter().all(lookup_valid_predicate),
        Token::TypeAlias => node
            .child(2)
            .map(|t| lookup_valid_predicate(&t))
            .unwrap_or(false),
        _ => false,
    }
}
