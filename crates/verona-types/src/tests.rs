use std::sync::Arc;

use verona_core::{Location, Node, SourceFile, Token};

use crate::{Bindings, BoundType, subtype};

fn loc(file: &Arc<SourceFile>, offset: u32, len: u32) -> Location {
    Location::new(file.clone(), offset, len)
}

fn ident(file: &Arc<SourceFile>, offset: u32, len: u32) -> Node {
    Node::new_leaf(Token::Ident, loc(file, offset, len))
}

fn class_name_ref(id: Node, typeargs: Node) -> Node {
    let name = Node::new(Token::TypeClassName);
    name.push(Node::new(Token::TypeUnit));
    name.push(id);
    name.push(typeargs);
    name
}

fn wrap_type(name: Node) -> Node {
    let ty = Node::new(Token::Type);
    ty.push(name);
    ty
}

#[test]
fn bound_type_unwinds_through_typeview_capability_lattice() {
    let view = Node::new(Token::TypeView);
    view.push(Node::new(Token::Lin));
    view.push(Node::new(Token::Out));
    let bound = BoundType::new(view, Bindings::new());
    assert_eq!(bound.node.token(), Token::In);

    let both_lin = Node::new(Token::TypeView);
    both_lin.push(Node::new(Token::Lin));
    both_lin.push(Node::new(Token::Lin));
    let bound = BoundType::new(both_lin, Bindings::new());
    assert_eq!(bound.node.token(), Token::TypeFalse);

    let const_view = Node::new(Token::TypeView);
    const_view.push(Node::new(Token::Lin));
    const_view.push(Node::new(Token::Const));
    let bound = BoundType::new(const_view, Bindings::new());
    assert_eq!(bound.node.token(), Token::Const);
}

#[test]
fn bound_type_reduces_a_lhs_class_view_to_true() {
    let class = Node::new_leaf(Token::Class, loc(&SourceFile::new("a.verona", "class C { }"), 6, 1));
    let view = Node::new(Token::TypeView);
    view.push(class);
    view.push(Node::new(Token::Lin));
    let bound = BoundType::new(view, Bindings::new());
    assert_eq!(bound.node.token(), Token::TypeTrue);
}

#[test]
fn bound_type_distributes_a_view_over_a_lhs_isect() {
    let isect = Node::new(Token::TypeIsect);
    isect.push(Node::new(Token::Lin));
    isect.push(Node::new(Token::Out));
    let view = Node::new(Token::TypeView);
    view.push(isect);
    view.push(Node::new(Token::Out));
    let bound = BoundType::new(view, Bindings::new());
    assert_eq!(bound.node.token(), Token::TypeIsect);
    assert_eq!(bound.node.child_count(), 2);
    for member in bound.node.children() {
        assert_eq!(member.token(), Token::TypeView);
    }
}

#[test]
fn subtype_accepts_identical_unit_types() {
    assert!(subtype(Node::new(Token::TypeUnit), Node::new(Token::TypeUnit)));
}

#[test]
fn subtype_rejects_a_package_against_a_differently_named_package() {
    let file = SourceFile::new("a.verona", "\"a\" \"b\"");
    let a = Node::new(Token::Package);
    a.push(Node::new_leaf(Token::String, loc(&file, 0, 3)));
    let b = Node::new(Token::Package);
    b.push(Node::new_leaf(Token::String, loc(&file, 4, 3)));
    assert!(!subtype(a, b));
}

#[test]
fn subtype_splits_a_rhs_union_into_alternatives() {
    let file = SourceFile::new("a.verona", "class X { } class Y { }");
    let x = Node::new_leaf(Token::Class, loc(&file, 6, 1));
    let y = Node::new_leaf(Token::Class, loc(&file, 19, 1));

    let union = Node::new(Token::TypeUnion);
    union.push(y.clone());
    union.push(x.clone());

    assert!(subtype(x, union));
}

#[test]
fn subtype_requires_every_member_of_a_rhs_isect() {
    let file = SourceFile::new("a.verona", "class X { } class Y { }");
    let x = Node::new_leaf(Token::Class, loc(&file, 6, 1));
    let y = Node::new_leaf(Token::Class, loc(&file, 19, 1));

    let isect = Node::new(Token::TypeIsect);
    isect.push(x.clone());
    isect.push(y);

    assert!(!subtype(x, isect));
}

/// Builds `class X { } class Y { } class C[T] { }` in one scope and a
/// `Type`-wrapped reference to `C[<arg>]`, so that bound-type construction
/// can resolve the names through `verona_lookup`.
fn generic_class_fixture() -> (Arc<SourceFile>, Node, Node) {
    let file = SourceFile::new("a.verona", "class X { } class Y { } class C[T] { }");
    let scope = Node::new(Token::Block);

    let class_x = Node::new_leaf(Token::Class, loc(&file, 6, 1));
    let class_y = Node::new_leaf(Token::Class, loc(&file, 19, 1));

    let tp = Node::new_leaf(Token::TypeParam, loc(&file, 33, 1));
    tp.push(Node::new(Token::Bound));
    let type_params = Node::new(Token::TypeParams);
    type_params.push(tp);
    let class_c = Node::new_leaf(Token::Class, loc(&file, 31, 1));
    class_c.push(type_params);

    scope.push(class_x.clone());
    scope.push(class_y.clone());
    scope.push(class_c.clone());
    let symtab = scope.symtab().unwrap();
    symtab.bind("X", class_x).unwrap();
    symtab.bind("Y", class_y).unwrap();
    symtab.bind("C", class_c).unwrap();

    (file, scope, Node::new(Token::TypeArgs))
}

fn c_ref(file: &Arc<SourceFile>, scope: &Node, arg_offset: u32) -> Node {
    let arg = wrap_type(class_name_ref(ident(file, arg_offset, 1), Node::new(Token::TypeArgs)));
    let targs = Node::new(Token::TypeArgs);
    targs.push(arg);
    let ty = wrap_type(class_name_ref(ident(file, 31, 1), targs));
    scope.push(ty.clone());
    ty
}

#[test]
fn subtype_checks_generic_type_arguments_invariantly() {
    let (file, scope, _) = generic_class_fixture();

    let c_of_x = c_ref(&file, &scope, 6);
    let c_of_x_again = c_ref(&file, &scope, 6);
    assert!(subtype(c_of_x, c_of_x_again));

    let c_of_x = c_ref(&file, &scope, 6);
    let c_of_y = c_ref(&file, &scope, 19);
    assert!(!subtype(c_of_x, c_of_y));
}
