//! Type-parameter bookkeeping shared by passes that introduce or
//! re-synthesise generics: collecting the free `TypeParamName`s a type
//! expression refers to, and turning a definition's own type parameters
//! back into the type-argument list needed to re-apply it to itself
//! (used when a pass hoists a generic definition and must keep forwarding
//! its parameters to the hoisted site).

use verona_core::{Node, Token};

/// Collects every distinct `TypeParam` that `t` refers to (by
/// `TypeParamName`) into `tp`, searching for each name's definition from
/// `scope` outward. Walks through every type-lattice wrapper and the
/// context/type-argument children of qualified names.
pub fn extract_typeparams(scope: &Node, t: &Node, tp: &Node) {
    match t.token() {
        Token::Type
        | Token::TypeArgs
        | Token::TypeUnion
        | Token::TypeIsect
        | Token::TypeTuple
        | Token::TypeList
        | Token::TypeView => {
            for child in t.children() {
                extract_typeparams(scope, &child, tp);
            }
        }
        Token::TypeClassName | Token::TypeAliasName | Token::TypeTraitName => {
            if let Some(lhs) = t.child(0) {
                extract_typeparams(scope, &lhs, tp);
            }
            if let Some(args) = t.child(2) {
                extract_typeparams(scope, &args, tp);
            }
        }
        Token::TypeParamName => {
            if let Some(id) = t.child(1) {
                let name = id.location().map(|l| l.text().to_string()).unwrap_or_default();
                let defs = verona_core::lookup_upward(scope, &name);
                if let [def] = defs.as_slice() {
                    if def.token() == Token::TypeParam {
                        let already_present = tp
                            .children()
                            .iter()
                            .any(|p| p.location() == def.location());
                        if !already_present {
                            tp.push(def.deep_clone());
                        }
                    }
                }
            }
            if let Some(lhs) = t.child(0) {
                extract_typeparams(scope, &lhs, tp);
            }
            if let Some(args) = t.child(2) {
                extract_typeparams(scope, &args, tp);
            }
        }
        _ => {}
    }
}

/// Appends one `TypeParamName` type argument per type parameter `node`
/// declares, so that re-applying `node` to itself (at a hoisted or
/// synthesised call site) still threads its own generics through.
pub fn typeparams_to_typeargs(node: &Node, typeargs: &Node) -> Node {
    if !matches!(node.token(), Token::Class | Token::Function) {
        return typeargs.clone();
    }

    let Some(type_params) = node.children().into_iter().find(|c| c.token() == Token::TypeParams) else {
        return typeargs.clone();
    };

    for type_param in type_params.children() {
        let ident = Node::new_leaf(
            Token::Ident,
            type_param.location().expect("typeparam carries its own spelling"),
        );
        let name = Node::new(Token::TypeParamName);
        name.push(Node::new(Token::TypeUnit));
        name.push(ident);
        name.push(Node::new(Token::TypeArgs));

        let ty = Node::new(Token::Type);
        ty.push(name);
        typeargs.push(ty);
    }

    typeargs.clone()
}
