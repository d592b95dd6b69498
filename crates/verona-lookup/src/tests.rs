use std::sync::Arc;

use verona_core::{Location, Node, SourceFile, Token};

use super::*;

fn loc(file: &Arc<SourceFile>, offset: u32, len: u32) -> Location {
    Location::new(file.clone(), offset, len)
}

fn ident(file: &Arc<SourceFile>, offset: u32, len: u32) -> Node {
    Node::new_leaf(Token::Ident, loc(file, offset, len))
}

/// Builds the positional `(ctx, id, type_args)` shape `lookup_scopedname`
/// and `lookup_scopedname_name` expect for a `TypeXName` node.
fn scoped_name(token: Token, ctx: Node, id: Node) -> Node {
    let name = Node::new(token);
    name.push(ctx);
    name.push(id);
    name.push(Node::new(Token::TypeArgs));
    name
}

fn unqualified_name(token: Token, id: Node) -> Node {
    scoped_name(token, Node::new(Token::TypeUnit), id)
}

#[test]
fn lookup_name_finds_a_class_bound_in_an_outer_scope() {
    let file = SourceFile::new("a.verona", "class C { } C");
    let class = Node::new_leaf(Token::Class, loc(&file, 6, 1));
    let file_scope = Node::new(Token::Block);
    file_scope.push(class.clone());
    file_scope.symtab().unwrap().bind("C", class.clone()).unwrap();

    let use_site = ident(&file, 12, 1);
    let block = Node::new(Token::Block);
    file_scope.push(block.clone());
    block.push(use_site.clone());

    let found = lookup_name(&use_site, None);
    assert_eq!(found.defs.len(), 1);
    assert_eq!(found.defs[0].def, class);
}

#[test]
fn lookdown_resolves_a_member_of_a_class() {
    let file = SourceFile::new("a.verona", "class C { let x: X }");
    let class = Node::new_leaf(Token::Class, loc(&file, 6, 1));
    let field = Node::new_leaf(Token::FieldLet, loc(&file, 14, 1));
    class.symtab().unwrap().bind("x", field.clone()).unwrap();

    let scope = Node::new(Token::Block);
    scope.push(class.clone());
    scope.symtab().unwrap().bind("C", class.clone()).unwrap();

    let class_ref = ident(&file, 6, 1);
    let class_name = unqualified_name(Token::TypeClassName, class_ref);
    scope.push(class_name.clone());

    let member_id = ident(&file, 14, 1);
    let resolved = lookup_scopedname_name(&class_name, &member_id, None);
    assert_eq!(resolved.defs.len(), 1);
    assert_eq!(resolved.defs[0].def, field);
}

#[test]
fn lookdown_unfolds_a_typealias_before_searching() {
    let file = SourceFile::new("a.verona", "typealias A = C; class C { fun f() }");
    let class = Node::new_leaf(Token::Class, loc(&file, 23, 1));
    let method = Node::new_leaf(Token::Function, loc(&file, 31, 1));
    class.symtab().unwrap().bind("f", method.clone()).unwrap();

    let alias = Node::new_leaf(Token::TypeAlias, loc(&file, 10, 1));
    alias.push(Node::new(Token::TypeParams));
    alias.push(Node::new(Token::Bound));
    let ty = Node::new(Token::Type);
    ty.push(class.clone());
    alias.push(ty);

    let scope = Node::new(Token::Block);
    scope.push(alias.clone());
    scope.symtab().unwrap().bind("A", alias.clone()).unwrap();

    let alias_ref = ident(&file, 10, 1);
    let alias_name = unqualified_name(Token::TypeAliasName, alias_ref);
    scope.push(alias_name.clone());

    let member_id = ident(&file, 31, 1);
    let resolved = lookup_scopedname_name(&alias_name, &member_id, None);
    assert_eq!(resolved.defs.len(), 1);
    assert_eq!(resolved.defs[0].def, method);
}

#[test]
fn lookup_recursive_detects_a_self_referential_alias() {
    let file = SourceFile::new("a.verona", "typealias A = A");
    let alias = Node::new_leaf(Token::TypeAlias, loc(&file, 10, 1));
    alias.push(Node::new(Token::TypeParams));
    alias.push(Node::new(Token::Bound));

    let name = unqualified_name(Token::TypeAliasName, ident(&file, 14, 1));
    let ty = Node::new(Token::Type);
    ty.push(name);
    alias.push(ty);

    let scope = Node::new(Token::Block);
    scope.push(alias.clone());
    scope.symtab().unwrap().bind("A", alias.clone()).unwrap();

    assert!(lookup_recursive(&alias));
}

#[test]
fn lookup_recursive_accepts_a_non_recursive_alias() {
    let file = SourceFile::new("a.verona", "typealias A = C");
    let class = Node::new_leaf(Token::Class, loc(&file, 14, 1));
    let alias = Node::new_leaf(Token::TypeAlias, loc(&file, 10, 1));
    alias.push(Node::new(Token::TypeParams));
    alias.push(Node::new(Token::Bound));
    let ty = Node::new(Token::Type);
    ty.push(class);
    alias.push(ty);

    assert!(!lookup_recursive(&alias));
}

#[test]
fn type_argument_binding_flags_too_many_typeargs() {
    let file = SourceFile::new("a.verona", "class C[T] { }");
    let class = Node::new_leaf(Token::Class, loc(&file, 6, 1));
    let type_params = Node::new(Token::TypeParams);
    let tp = Node::new_leaf(Token::TypeParam, loc(&file, 8, 1));
    tp.push(Node::new(Token::Bound));
    type_params.push(tp);
    class.push(type_params);

    let ta = Node::new(Token::TypeArgs);
    ta.push(Node::new(Token::TypeUnit));
    ta.push(Node::new(Token::TypeUnit));

    let bound = Lookup::new(class, Some(ta));
    assert!(bound.too_many_typeargs);
}

#[test]
fn type_argument_binding_fills_trailing_formals_with_fresh_typevars() {
    let file = SourceFile::new("a.verona", "class C[T, U] { }");
    let class = Node::new_leaf(Token::Class, loc(&file, 6, 1));
    let type_params = Node::new(Token::TypeParams);
    let t = Node::new_leaf(Token::TypeParam, loc(&file, 8, 1));
    t.push(Node::new(Token::Bound));
    let u = Node::new_leaf(Token::TypeParam, loc(&file, 11, 1));
    u.push(Node::new(Token::Bound));
    type_params.push(t.clone());
    type_params.push(u.clone());
    class.push(type_params);

    let ta = Node::new(Token::TypeArgs);
    ta.push(Node::new(Token::TypeUnit));

    let bound = Lookup::new(class, Some(ta));
    assert!(!bound.too_many_typeargs);
    assert!(bound.bindings.contains_key(&t));
    assert_eq!(bound.bindings[&u].token(), Token::TypeVar);
}

#[test]
fn lookup_valid_predicate_accepts_union_of_subtype_assertions() {
    let union = Node::new(Token::TypeUnion);
    union.push(Node::new(Token::TypeSubtype));
    union.push(Node::new(Token::TypeSubtype));
    assert!(lookup_valid_predicate(&union));

    let bad = Node::new(Token::TypeUnion);
    bad.push(Node::new(Token::TypeSubtype));
    bad.push(Node::new(Token::TypeUnit));
    assert!(!lookup_valid_predicate(&bad));
}

#[test]
fn extract_typeparams_collects_distinct_references_once() {
    let file = SourceFile::new("a.verona", "f[T](x: T, y: T)");
    let tp = Node::new_leaf(Token::TypeParam, loc(&file, 2, 1));
    tp.push(Node::new(Token::Bound));
    let scope = Node::new(Token::Function);
    scope.symtab().unwrap().bind("T", tp.clone()).unwrap();

    let collected = Node::new(Token::TypeParams);
    let use_a = unqualified_name(Token::TypeParamName, ident(&file, 8, 1));
    let use_b = unqualified_name(Token::TypeParamName, ident(&file, 14, 1));

    extract_typeparams(&scope, &use_a, &collected);
    extract_typeparams(&scope, &use_b, &collected);

    assert_eq!(collected.child_count(), 1);
}

#[test]
fn typeparams_to_typeargs_emits_one_argument_per_formal() {
    let file = SourceFile::new("a.verona", "f[T, U]()");
    let function = Node::new_leaf(Token::Function, loc(&file, 0, 1));
    let type_params = Node::new(Token::TypeParams);
    let t = Node::new_leaf(Token::TypeParam, loc(&file, 2, 1));
    t.push(Node::new(Token::Bound));
    let u = Node::new_leaf(Token::TypeParam, loc(&file, 5, 1));
    u.push(Node::new(Token::Bound));
    type_params.push(t);
    type_params.push(u);
    function.push(type_params);

    let typeargs = Node::new(Token::TypeArgs);
    typeparams_to_typeargs(&function, &typeargs);
    assert_eq!(typeargs.child_count(), 2);
    assert!(typeargs.children().iter().all(|t| t.token() == Token::Type));
}
