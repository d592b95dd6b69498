//! Builds the first structural skeleton out of the concrete-syntax groupings
//! `modules` left behind: fields, functions, type parameters, parameters,
//! `use`/`type` declarations, classes, basic expression grouping (`Group` ->
//! `Expr`, `Equals` -> `Assign`, `List` -> `Tuple`, parenthesised tuples and
//! units), type-argument lists, and `if`/`else` chains.
//!
//! Grounded on `structure()` in `lang.cc`. Every rule's `Pattern` fully
//! decides whether the rule applies — the engine tries a node's rules in
//! order and fires the *first whose pattern matches*, so an action must
//! never discover mid-construction that it picked the wrong node; that
//! decision belongs in the pattern predicate below it.

use verona_core::{Node, Token};
use verona_rewrite::{Action, Captures, Direction, Pass, Pattern, Production, Rule, WellFormed};

use crate::util::take_children;

fn err(node: &Node, message: &str) -> Action {
    Action::Error(format!("{message} (at `{}`)", node.token()))
}

fn parent_is(node: &Node, tok: Token) -> bool {
    node.parent().is_some_and(|p| p.token() == tok)
}

fn parent_is_one_of(node: &Node, toks: &[Token]) -> bool {
    node.parent().is_some_and(|p| toks.contains(&p.token()))
}

fn typevar_or(ty: Option<Node>, fresh_on: &Node) -> Node {
    ty.unwrap_or_else(|| {
        let wrapper = Node::new(Token::Type);
        let var = crate::util::synthetic_leaf(Token::TypeVar, &fresh_on.fresh("?"));
        wrapper.push(var);
        wrapper
    })
}

fn split_field(children: Vec<Node>) -> (Node, Option<Node>) {
    let mut children = children;
    let id = children.remove(0);
    let ty = if children.first().map(|c| c.token()) == Some(Token::Type) {
        Some(children.remove(0))
    } else {
        None
    };
    (id, ty)
}

fn default_body(rhs: Vec<Node>) -> Node {
    let block = Node::new(Token::Block);
    for g in rhs {
        block.push(g);
    }
    let expr = Node::new(Token::Expr);
    expr.push(block);
    expr
}

// ---- fields -----------------------------------------------------------

fn field_shape(node: &Node, keyword: Token) -> bool {
    node.token() == Token::Group
        && node.child(0).is_some_and(|c| c.token() == keyword)
        && node.child(1).is_some_and(|c| c.token() == Token::Ident)
}

fn field_equals_shape(node: &Node, keyword: Token) -> bool {
    node.token() == Token::Equals && node.child(0).is_some_and(|g| field_shape(&g, keyword))
}

fn build_field(field_tok: Token, node: &Node, rhs: Option<Vec<Node>>) -> Action {
    let mut children = take_children(node);
    children.remove(0); // the `let`/`var` keyword
    let (id, ty) = split_field(children);
    let field = Node::new(field_tok);
    field.push(id);
    field.push(typevar_or(ty, node));
    match rhs {
        Some(rhs) => field.push(default_body(rhs)),
        None => field.push(Node::new(Token::DontCare)),
    }
    Action::Replace(field)
}

fn is_let_field_group(n: &Node) -> bool {
    parent_is(n, Token::ClassBody) && field_shape(n, Token::Let)
}
fn is_let_field_equals(n: &Node) -> bool {
    parent_is(n, Token::ClassBody) && field_equals_shape(n, Token::Let)
}
fn is_var_field_group(n: &Node) -> bool {
    parent_is(n, Token::ClassBody) && field_shape(n, Token::Var)
}
fn is_var_field_equals(n: &Node) -> bool {
    parent_is(n, Token::ClassBody) && field_equals_shape(n, Token::Var)
}

fn field_let_group(node: &Node, _: &Captures) -> Action {
    build_field(Token::FieldLet, node, None)
}
fn field_var_group(node: &Node, _: &Captures) -> Action {
    build_field(Token::FieldVar, node, None)
}
fn field_let_equals(node: &Node, _: &Captures) -> Action {
    let mut children = take_children(node);
    let group = children.remove(0);
    build_field(Token::FieldLet, &group, Some(children))
}
fn field_var_equals(node: &Node, _: &Captures) -> Action {
    let mut children = take_children(node);
    let group = children.remove(0);
    build_field(Token::FieldVar, &group, Some(children))
}

// ---- functions ----------------------------------------------------------

fn is_name_tok(tok: Token) -> bool {
    matches!(tok, Token::Ident | Token::Symbol)
}

/// Reads (without mutating) a function-header `Group`'s flat children into
/// name / type-params / value-params / return-type / trailing tokens.
/// Returns `None` if the mandatory `Paren` parameter list isn't present.
fn function_header(node: &Node) -> Option<(Option<Node>, Option<Node>, Node, Option<Node>, Vec<Node>)> {
    let children = node.children();
    let mut i = 0;
    let name = if children.first().is_some_and(|c| is_name_tok(c.token())) {
        let n = children[0].clone();
        i += 1;
        Some(n)
    } else {
        None
    };
    let type_params = if children.get(i).map(|c| c.token()) == Some(Token::Square) {
        let n = children[i].clone();
        i += 1;
        Some(n)
    } else {
        None
    };
    let params = children.get(i).filter(|c| c.token() == Token::Paren)?.clone();
    i += 1;
    let ret = if children.get(i).map(|c| c.token()) == Some(Token::Type) {
        let n = children[i].clone();
        i += 1;
        Some(n)
    } else {
        None
    };
    Some((name, type_params, params, ret, children[i..].to_vec()))
}

fn is_function_group(n: &Node) -> bool {
    parent_is(n, Token::ClassBody)
        && n.token() == Token::Group
        && function_header(n).is_some_and(|(_, _, _, _, rest)| rest.first().is_some_and(|c| c.token() == Token::Brace))
}

fn is_function_equals(n: &Node) -> bool {
    if !(parent_is(n, Token::ClassBody) && n.token() == Token::Equals) {
        return false;
    }
    n.child(0).is_some_and(|group| function_header(&group).is_some_and(|(_, _, _, _, rest)| rest.is_empty()))
}

fn build_function(fresh_on: &Node, name: Option<Node>, type_params: Option<Node>, params: Node, ret: Option<Node>, block: Node) -> Action {
    let id = name.unwrap_or_else(|| crate::util::synthetic_leaf(Token::Ident, "apply"));
    let func = Node::new(Token::Function);
    func.push(id);
    let tparams = Node::new(Token::TypeParams);
    if let Some(tp) = type_params {
        for c in take_children(&tp) {
            tparams.push(c);
        }
    }
    func.push(tparams);
    let fparams = Node::new(Token::Params);
    for c in take_children(&params) {
        fparams.push(c);
    }
    func.push(fparams);
    func.push(typevar_or(ret, fresh_on));
    func.push(block);
    Action::Replace(func)
}

fn function_group(node: &Node, _: &Captures) -> Action {
    let mut children = take_children(node);
    let (name, type_params, params, ret, rest) = function_header_take(&mut children);
    let mut rest = rest;
    let brace = rest.remove(0);
    let block = Node::new(Token::Block);
    for c in take_children(&brace) {
        block.push(c);
    }
    let action = build_function(node, name, type_params, params, ret, block);
    if rest.is_empty() {
        return action;
    }
    let Action::Replace(func) = action else { unreachable!() };
    let rest_group = Node::new(Token::Group);
    for c in rest {
        rest_group.push(c);
    }
    Action::Splice(vec![func, rest_group])
}

/// Same shape as [`function_header`] but consumes (removes) the pieces from
/// an already-detached `children` vec, for use once a rule has committed.
fn function_header_take(children: &mut Vec<Node>) -> (Option<Node>, Option<Node>, Node, Option<Node>, Vec<Node>) {
    let name = if children.first().is_some_and(|c| is_name_tok(c.token())) {
        Some(children.remove(0))
    } else {
        None
    };
    let type_params = if children.first().map(|c| c.token()) == Some(Token::Square) {
        Some(children.remove(0))
    } else {
        None
    };
    let params = children.remove(0); // guaranteed Paren by the pattern predicate
    let ret = if children.first().map(|c| c.token()) == Some(Token::Type) {
        Some(children.remove(0))
    } else {
        None
    };
    (name, type_params, params, ret, std::mem::take(children))
}

fn function_equals(node: &Node, _: &Captures) -> Action {
    let mut children = take_children(node);
    let group = children.remove(0);
    let mut group_children = take_children(&group);
    let (name, type_params, params, ret, _rest) = function_header_take(&mut group_children);
    let block = Node::new(Token::Block);
    block.push(default_body(children));
    build_function(node, name, type_params, params, ret, block)
}

// ---- type params / params -------------------------------------------------

fn is_list_flatten(tok_parent: Token) -> impl Fn(&Node) -> bool {
    move |n: &Node| n.token() == tok_parent && n.child_count() == 1 && n.child(0).unwrap().token() == Token::List
}

fn flatten_list_into(node: &Node, wrapper: Token) -> Action {
    let list = take_children(node).remove(0);
    let result = Node::new(wrapper);
    for c in take_children(&list) {
        result.push(c);
    }
    Action::Replace(result)
}

fn typeparams_flatten(node: &Node, _: &Captures) -> Action {
    flatten_list_into(node, Token::TypeParams)
}
fn params_flatten(node: &Node, _: &Captures) -> Action {
    flatten_list_into(node, Token::Params)
}

fn is_typeparam_group(n: &Node) -> bool {
    parent_is(n, Token::TypeParams) && n.token() == Token::Group && n.child(0).is_some_and(|c| c.token() == Token::Ident)
}
fn is_typeparam_equals(n: &Node) -> bool {
    parent_is(n, Token::TypeParams)
        && n.token() == Token::Equals
        && n.child(0).is_some_and(|g| g.token() == Token::Group && g.child(0).is_some_and(|c| c.token() == Token::Ident))
}
fn is_invalid_typeparam(n: &Node) -> bool {
    parent_is(n, Token::TypeParams) && n.token() != Token::TypeParam
}

fn typeparam_group(node: &Node, _: &Captures) -> Action {
    let children = take_children(node);
    let (id, ty) = split_field(children);
    let tp = Node::new(Token::TypeParam);
    tp.push(id);
    tp.push(typevar_or(ty, node));
    tp.push(Node::new(Token::Type));
    Action::Replace(tp)
}

fn typeparam_equals(node: &Node, _: &Captures) -> Action {
    let mut children = take_children(node);
    let group = children.remove(0);
    let (id, ty) = split_field(take_children(&group));
    let tp = Node::new(Token::TypeParam);
    tp.push(id);
    tp.push(typevar_or(ty, node));
    let default_ty = Node::new(Token::Type);
    default_ty.push(default_body(children));
    tp.push(default_ty);
    Action::Replace(tp)
}

fn invalid_typeparam(node: &Node, _: &Captures) -> Action {
    err(node, "expected a type parameter")
}

fn is_param_group(n: &Node) -> bool {
    parent_is(n, Token::Params) && n.token() == Token::Group && n.child(0).is_some_and(|c| c.token() == Token::Ident)
}
fn is_param_equals(n: &Node) -> bool {
    parent_is(n, Token::Params)
        && n.token() == Token::Equals
        && n.child(0).is_some_and(|g| g.token() == Token::Group && g.child(0).is_some_and(|c| c.token() == Token::Ident))
}
fn is_invalid_param(n: &Node) -> bool {
    parent_is(n, Token::Params) && n.token() != Token::Param
}

fn param_group(node: &Node, _: &Captures) -> Action {
    let children = take_children(node);
    let (id, ty) = split_field(children);
    let param = Node::new(Token::Param);
    param.push(id);
    param.push(typevar_or(ty, node));
    param.push(Node::new(Token::DontCare));
    Action::Replace(param)
}

fn param_equals(node: &Node, _: &Captures) -> Action {
    let mut children = take_children(node);
    let group = children.remove(0);
    let (id, ty) = split_field(take_children(&group));
    let param = Node::new(Token::Param);
    param.push(id);
    param.push(typevar_or(ty, node));
    param.push(default_body(children));
    Action::Replace(param)
}

fn invalid_param(node: &Node, _: &Captures) -> Action {
    err(node, "expected a parameter")
}

// ---- use / type alias / class --------------------------------------------

fn is_use_decl(n: &Node) -> bool {
    n.token() == Token::Group && parent_is_one_of(n, &[Token::ClassBody, Token::Block]) && n.child(0).is_some_and(|c| c.token() == Token::Use)
}
fn is_use_empty(n: &Node) -> bool {
    n.token() == Token::Use && n.child_count() == 0
}

fn use_decl(node: &Node, _: &Captures) -> Action {
    let mut children = take_children(node);
    children.remove(0); // `use`
    let ty = Node::new(Token::Type);
    if children.is_empty() {
        ty.push(Node::new(Token::DontCare));
    } else {
        for c in children {
            ty.push(c);
        }
    }
    let use_node = Node::new(Token::Use);
    use_node.push(ty);
    Action::Replace(use_node)
}

fn use_empty(node: &Node, _: &Captures) -> Action {
    err(node, "can't put a `use` here")
}

fn typealias_shape(group: &Node) -> bool {
    group.token() == Token::Group && group.child(0).is_some_and(|c| c.token() == Token::TypeAlias) && group.child(1).is_some_and(|c| c.token() == Token::Ident)
}

fn is_typealias_group(n: &Node) -> bool {
    parent_is_one_of(n, &[Token::ClassBody, Token::Block]) && typealias_shape(n)
}
fn is_typealias_equals(n: &Node) -> bool {
    n.token() == Token::Equals && parent_is_one_of(n, &[Token::ClassBody, Token::Block]) && n.child(0).is_some_and(|g| typealias_shape(&g))
}
fn is_typealias_empty(n: &Node) -> bool {
    n.token() == Token::TypeAlias && n.child_count() == 0
}

fn parse_typealias_group(mut children: Vec<Node>) -> (Node, Node, Option<Node>) {
    children.remove(0); // `type`
    let id = children.remove(0);
    let type_params = if children.first().map(|c| c.token()) == Some(Token::Square) {
        children.remove(0)
    } else {
        Node::new(Token::Square)
    };
    let bound = if children.first().map(|c| c.token()) == Some(Token::Type) {
        Some(children.remove(0))
    } else {
        None
    };
    (id, type_params, bound)
}

fn typealias_group(node: &Node, _: &Captures) -> Action {
    let (id, type_params, bound) = parse_typealias_group(take_children(node));
    let alias = Node::new(Token::TypeAlias);
    alias.push(id);
    let tparams = Node::new(Token::TypeParams);
    for c in take_children(&type_params) {
        tparams.push(c);
    }
    alias.push(tparams);
    alias.push(typevar_or(bound, node));
    alias.push(Node::new(Token::Type));
    Action::Replace(alias)
}

fn typealias_equals(node: &Node, _: &Captures) -> Action {
    let mut children = take_children(node);
    let group = children.remove(0);
    let (id, type_params, bound) = parse_typealias_group(take_children(&group));
    let alias = Node::new(Token::TypeAlias);
    alias.push(id);
    let tparams = Node::new(Token::TypeParams);
    for c in take_children(&type_params) {
        tparams.push(c);
    }
    alias.push(tparams);
    alias.push(typevar_or(bound, node));
    let default_ty = Node::new(Token::Type);
    default_ty.push(default_body(children));
    alias.push(default_ty);
    Action::Replace(alias)
}

fn typealias_empty(node: &Node, _: &Captures) -> Action {
    if parent_is_one_of(node, &[Token::ClassBody, Token::Block]) {
        err(node, "expected a `type` definition")
    } else {
        err(node, "can't put a `type` definition here")
    }
}

fn class_shape(group: &Node) -> bool {
    group.token() == Token::Group
        && group.child(0).is_some_and(|c| c.token() == Token::Class)
        && group.child(1).is_some_and(|c| matches!(c.token(), Token::Ident | Token::Ref))
}

/// Reads (without mutating) whether a `class`-keyword `Group` has its
/// mandatory `Brace` body somewhere after the optional type params/bound.
fn class_ready(group: &Node) -> bool {
    if !class_shape(group) {
        return false;
    }
    let children = group.children();
    let mut i = 2;
    if children.get(i).map(|c| c.token()) == Some(Token::Square) {
        i += 1;
    }
    if children.get(i).map(|c| c.token()) == Some(Token::Type) {
        i += 1;
    }
    children.get(i).is_some_and(|c| c.token() == Token::Brace)
}

fn is_class_group(n: &Node) -> bool {
    parent_is_one_of(n, &[Token::Top, Token::ClassBody, Token::Block]) && class_ready(n)
}
fn is_class_empty(n: &Node) -> bool {
    n.token() == Token::Class && n.child_count() == 0
}

fn class_group(node: &Node, _: &Captures) -> Action {
    let mut children = take_children(node);
    children.remove(0); // `class`
    let id = children.remove(0);
    let id = if id.token() == Token::Ref {
        crate::util::synthetic_leaf(Token::Ident, "ref")
    } else {
        id
    };
    let type_params = if children.first().map(|c| c.token()) == Some(Token::Square) {
        children.remove(0)
    } else {
        Node::new(Token::Square)
    };
    let bound = if children.first().map(|c| c.token()) == Some(Token::Type) {
        Some(children.remove(0))
    } else {
        None
    };
    let brace = children.remove(0);
    let class = Node::new(Token::Class);
    class.push(id);
    let tparams = Node::new(Token::TypeParams);
    for c in take_children(&type_params) {
        tparams.push(c);
    }
    class.push(tparams);
    class.push(bound.unwrap_or_else(|| Node::new(Token::Type)));
    let body = Node::new(Token::ClassBody);
    for c in take_children(&brace) {
        body.push(c);
    }
    class.push(body);
    if children.is_empty() {
        return Action::Replace(class);
    }
    let rest_group = Node::new(Token::Group);
    for c in children {
        rest_group.push(c);
    }
    Action::Splice(vec![class, rest_group])
}

fn class_empty(node: &Node, _: &Captures) -> Action {
    if parent_is_one_of(node, &[Token::Top, Token::ClassBody, Token::Block]) {
        err(node, "expected a `class` definition")
    } else {
        err(node, "can't put a `class` definition here")
    }
}

// ---- type structure ---------------------------------------------------

fn in_type_struct(node: &Node) -> bool {
    parent_is_one_of(
        node,
        &[Token::Type, Token::TypeList, Token::TypeTuple, Token::TypeView, Token::TypeFunc, Token::TypeThrow, Token::TypeUnion, Token::TypeIsect],
    )
}

fn is_type_group(n: &Node) -> bool {
    n.token() == Token::Group && in_type_struct(n)
}
fn is_type_list(n: &Node) -> bool {
    n.token() == Token::List && in_type_struct(n)
}
fn is_type_paren(n: &Node) -> bool {
    n.token() == Token::Paren && in_type_struct(n)
}
fn is_anonymous_trait_brace(n: &Node) -> bool {
    n.token() == Token::Brace && in_type_struct(n)
}
fn is_ref_as_typename(n: &Node) -> bool {
    n.token() == Token::Ref && in_type_struct(n)
}
fn is_invalid_in_type(n: &Node) -> bool {
    in_type_struct(n)
        && matches!(
            n.token(),
            Token::Use
                | Token::Let
                | Token::Var
                | Token::Equals
                | Token::Class
                | Token::TypeAlias
                | Token::String
                | Token::Escaped
                | Token::Char
                | Token::Bool
                | Token::Hex
                | Token::Bin
                | Token::Int
                | Token::Float
                | Token::HexFloat
        )
}

fn type_group(node: &Node, _: &Captures) -> Action {
    let result = Node::new(Token::Type);
    for c in take_children(node) {
        result.push(c);
    }
    Action::Replace(result)
}

fn type_list(node: &Node, _: &Captures) -> Action {
    let result = Node::new(Token::TypeTuple);
    for c in take_children(node) {
        result.push(c);
    }
    Action::Replace(result)
}

fn type_paren(node: &Node, _: &Captures) -> Action {
    let result = Node::new(Token::Type);
    for c in take_children(node) {
        result.push(c);
    }
    Action::Replace(result)
}

fn lift_anonymous_trait(node: &Node, _: &Captures) -> Action {
    let id_text = node.fresh("anon");
    let id = crate::util::synthetic_leaf(Token::Ident, &id_text);
    let trait_node = Node::new(Token::TypeTrait);
    trait_node.push(id.deep_clone());
    let body = Node::new(Token::ClassBody);
    for c in take_children(node) {
        body.push(c);
    }
    trait_node.push(body);
    Action::Lift(Token::ClassBody, trait_node)
}

fn ref_as_typename(_: &Node, _c: &Captures) -> Action {
    Action::Replace(crate::util::synthetic_leaf(Token::Ident, "ref"))
}

fn invalid_in_type(node: &Node, _: &Captures) -> Action {
    err(node, "can't put this in a type")
}

// ---- basic expression grouping -------------------------------------------

fn is_group_to_expr(n: &Node) -> bool {
    n.token() == Token::Group && parent_is_one_of(n, &[Token::Block, Token::Expr, Token::ExprSeq, Token::Tuple, Token::Assign])
}
fn is_equals_block_like(n: &Node) -> bool {
    n.token() == Token::Equals && parent_is_one_of(n, &[Token::Block, Token::ExprSeq, Token::Tuple])
}
fn is_equals_in_expr(n: &Node) -> bool {
    n.token() == Token::Equals && parent_is(n, Token::Expr)
}
fn is_list_block_like(n: &Node) -> bool {
    n.token() == Token::List && parent_is_one_of(n, &[Token::Block, Token::ExprSeq])
}
fn is_list_in_expr(n: &Node) -> bool {
    n.token() == Token::List && parent_is(n, Token::Expr)
}
fn is_paren_in_expr(n: &Node) -> bool {
    n.token() == Token::Paren && parent_is(n, Token::Expr)
}
fn is_tuple_unit_in_expr(n: &Node) -> bool {
    n.token() == Token::Tuple && parent_is(n, Token::Expr) && n.child_count() == 0
}
fn is_tuple_scalar_in_expr(n: &Node) -> bool {
    n.token() == Token::Tuple && parent_is(n, Token::Expr) && n.child_count() == 1 && n.child(0).unwrap().token() == Token::Expr
}

fn group_to_expr(node: &Node, _: &Captures) -> Action {
    let expr = Node::new(Token::Expr);
    for c in take_children(node) {
        expr.push(c);
    }
    Action::Replace(expr)
}

fn equals_block_like(node: &Node, _: &Captures) -> Action {
    let assign = Node::new(Token::Assign);
    for c in take_children(node) {
        assign.push(c);
    }
    let expr = Node::new(Token::Expr);
    expr.push(assign);
    Action::Replace(expr)
}

fn equals_in_expr(node: &Node, _: &Captures) -> Action {
    let assign = Node::new(Token::Assign);
    for c in take_children(node) {
        assign.push(c);
    }
    Action::Replace(assign)
}

fn list_block_like(node: &Node, _: &Captures) -> Action {
    let tuple = Node::new(Token::Tuple);
    for c in take_children(node) {
        tuple.push(c);
    }
    let expr = Node::new(Token::Expr);
    expr.push(tuple);
    Action::Replace(expr)
}

fn list_in_expr(node: &Node, _: &Captures) -> Action {
    let tuple = Node::new(Token::Tuple);
    for c in take_children(node) {
        tuple.push(c);
    }
    Action::Replace(tuple)
}

fn paren_in_expr(node: &Node, _: &Captures) -> Action {
    let count = node.child_count();
    if count == 0 {
        return Action::Replace(Node::new(Token::Unit));
    }
    if count == 1 {
        return Action::Replace(take_children(node).remove(0));
    }
    let exprseq = Node::new(Token::ExprSeq);
    for c in take_children(node) {
        exprseq.push(c);
    }
    Action::Replace(exprseq)
}

fn tuple_unit_in_expr(_: &Node, _c: &Captures) -> Action {
    Action::Replace(Node::new(Token::Unit))
}

fn tuple_scalar_in_expr(node: &Node, _: &Captures) -> Action {
    Action::Replace(take_children(node).remove(0))
}

// ---- type-argument lists -------------------------------------------------

fn in_typeargs_scope(node: &Node) -> bool {
    in_type_struct(node) || parent_is(node, Token::Expr)
}

fn is_square_to_typeargs(n: &Node) -> bool {
    n.token() == Token::Square && in_typeargs_scope(n)
}
fn is_typeargs_flatten(n: &Node) -> bool {
    n.token() == Token::TypeArgs && n.child_count() == 1 && n.child(0).unwrap().token() == Token::List
}
fn is_typeargs_group_or_paren(n: &Node) -> bool {
    parent_is(n, Token::TypeArgs) && matches!(n.token(), Token::Group | Token::Paren)
}

fn square_to_typeargs(node: &Node, _: &Captures) -> Action {
    let result = Node::new(Token::TypeArgs);
    for c in take_children(node) {
        result.push(c);
    }
    Action::Replace(result)
}

fn typeargs_flatten(node: &Node, _: &Captures) -> Action {
    flatten_list_into(node, Token::TypeArgs)
}

fn typeargs_group_or_paren(node: &Node, _: &Captures) -> Action {
    let result = Node::new(Token::Type);
    for c in take_children(node) {
        result.push(c);
    }
    Action::Replace(result)
}

// ---- conditionals ---------------------------------------------------------

fn is_if(c: &Node) -> bool {
    c.token() == Token::If
}

fn has_if(node: &Node) -> bool {
    node.token() == Token::Expr && node.children().iter().any(is_if)
}

fn fold_conditional(node: &Node, _: &Captures) -> Action {
    let mut children = take_children(node);
    let if_idx = children.iter().position(is_if).expect("`has_if` guarantees an `if` token");
    let prefix: Vec<Node> = children.drain(..if_idx).collect();
    children.remove(0); // `if`

    let mut branches: Vec<(Vec<Node>, Node)> = Vec::new();
    loop {
        let Some(brace_idx) = children.iter().position(|c| c.token() == Token::Brace) else {
            break;
        };
        let cond: Vec<Node> = children.drain(..brace_idx).collect();
        let brace = children.remove(0);
        branches.push((cond, brace));
        if children.first().map(|c| c.token()) == Some(Token::Else) && children.get(1).map(|c| c.token()) == Some(Token::If) {
            children.remove(0);
            children.remove(0);
        } else {
            break;
        }
    }

    let else_branch = if children.first().map(|c| c.token()) == Some(Token::Else) {
        children.remove(0);
        Some(children.remove(0))
    } else {
        None
    };
    let suffix = children;

    let mut else_block = {
        let block = Node::new(Token::Block);
        match else_branch {
            Some(brace) => {
                for c in take_children(&brace) {
                    block.push(c);
                }
            }
            None => {
                let unit_expr = Node::new(Token::Expr);
                unit_expr.push(Node::new(Token::Unit));
                block.push(unit_expr);
            }
        }
        block
    };

    let mut outer_conditional = None;
    for (idx, (cond, brace)) in branches.into_iter().enumerate().rev() {
        let cond_expr = Node::new(Token::Expr);
        for c in cond {
            cond_expr.push(c);
        }
        let then_block = Node::new(Token::Block);
        for c in take_children(&brace) {
            then_block.push(c);
        }
        let conditional = Node::new(Token::Conditional);
        conditional.push(cond_expr);
        conditional.push(then_block);
        conditional.push(else_block);
        if idx == 0 {
            outer_conditional = Some(conditional);
            break;
        }
        let wrapped = Node::new(Token::Expr);
        wrapped.push(conditional);
        else_block = Node::new(Token::Block);
        else_block.push(wrapped);
    }

    let result = Node::new(Token::Expr);
    for c in prefix {
        result.push(c);
    }
    result.push(outer_conditional.expect("at least one branch was collected above"));
    for c in suffix {
        result.push(c);
    }
    Action::Replace(result)
}

// ---------------------------------------------------------------------

pub fn pass() -> Pass {
    let rules = vec![
        Rule::new("field-let-equals", Pattern::when(Pattern::any(), is_let_field_equals), field_let_equals),
        Rule::new("field-let-group", Pattern::when(Pattern::any(), is_let_field_group), field_let_group),
        Rule::new("field-var-equals", Pattern::when(Pattern::any(), is_var_field_equals), field_var_equals),
        Rule::new("field-var-group", Pattern::when(Pattern::any(), is_var_field_group), field_var_group),
        Rule::new("function-equals", Pattern::when(Pattern::any(), is_function_equals), function_equals),
        Rule::new("function-group", Pattern::when(Pattern::any(), is_function_group), function_group),
        Rule::new("typeparams-flatten", Pattern::when(Pattern::any(), is_list_flatten(Token::TypeParams)), typeparams_flatten),
        Rule::new("typeparam-group", Pattern::when(Pattern::any(), is_typeparam_group), typeparam_group),
        Rule::new("typeparam-equals", Pattern::when(Pattern::any(), is_typeparam_equals), typeparam_equals),
        Rule::new("invalid-typeparam", Pattern::when(Pattern::any(), is_invalid_typeparam), invalid_typeparam),
        Rule::new("params-flatten", Pattern::when(Pattern::any(), is_list_flatten(Token::Params)), params_flatten),
        Rule::new("param-group", Pattern::when(Pattern::any(), is_param_group), param_group),
        Rule::new("param-equals", Pattern::when(Pattern::any(), is_param_equals), param_equals),
        Rule::new("invalid-param", Pattern::when(Pattern::any(), is_invalid_param), invalid_param),
        Rule::new("use-decl", Pattern::when(Pattern::any(), is_use_decl), use_decl),
        Rule::new("use-empty", Pattern::when(Pattern::any(), is_use_empty), use_empty),
        Rule::new("typealias-group", Pattern::when(Pattern::any(), is_typealias_group), typealias_group),
        Rule::new("typealias-equals", Pattern::when(Pattern::any(), is_typealias_equals), typealias_equals),
        Rule::new("typealias-empty", Pattern::when(Pattern::any(), is_typealias_empty), typealias_empty),
        Rule::new("class-group", Pattern::when(Pattern::any(), is_class_group), class_group),
        Rule::new("class-empty", Pattern::when(Pattern::any(), is_class_empty), class_empty),
        Rule::new("type-group", Pattern::when(Pattern::any(), is_type_group), type_group),
        Rule::new("type-list", Pattern::when(Pattern::any(), is_type_list), type_list),
        Rule::new("type-paren", Pattern::when(Pattern::any(), is_type_paren), type_paren),
        Rule::new("lift-anonymous-trait", Pattern::when(Pattern::any(), is_anonymous_trait_brace), lift_anonymous_trait),
        Rule::new("ref-as-typename", Pattern::when(Pattern::any(), is_ref_as_typename), ref_as_typename),
        Rule::new("invalid-in-type", Pattern::when(Pattern::any(), is_invalid_in_type), invalid_in_type),
        Rule::new("group-to-expr", Pattern::when(Pattern::any(), is_group_to_expr), group_to_expr),
        Rule::new("equals-block-like", Pattern::when(Pattern::any(), is_equals_block_like), equals_block_like),
        Rule::new("equals-in-expr", Pattern::when(Pattern::any(), is_equals_in_expr), equals_in_expr),
        Rule::new("list-block-like", Pattern::when(Pattern::any(), is_list_block_like), list_block_like),
        Rule::new("list-in-expr", Pattern::when(Pattern::any(), is_list_in_expr), list_in_expr),
        Rule::new("tuple-unit-in-expr", Pattern::when(Pattern::any(), is_tuple_unit_in_expr), tuple_unit_in_expr),
        Rule::new("tuple-scalar-in-expr", Pattern::when(Pattern::any(), is_tuple_scalar_in_expr), tuple_scalar_in_expr),
        Rule::new("paren-in-expr", Pattern::when(Pattern::any(), is_paren_in_expr), paren_in_expr),
        Rule::new("square-to-typeargs", Pattern::when(Pattern::any(), is_square_to_typeargs), square_to_typeargs),
        Rule::new("typeargs-flatten", Pattern::when(Pattern::any(), is_typeargs_flatten), typeargs_flatten),
        Rule::new("typeargs-group-or-paren", Pattern::when(Pattern::any(), is_typeargs_group_or_paren), typeargs_group_or_paren),
        Rule::new("fold-conditional", Pattern::when(Pattern::any(), has_if), fold_conditional),
    ];

    let schema = WellFormed::new()
        .with(Token::FieldLet, Production::new([]).arity(3, Some(3)))
        .with(Token::FieldVar, Production::new([]).arity(3, Some(3)))
        .with(Token::Function, Production::new([]).arity(5, Some(5)))
        .with(Token::TypeParam, Production::new([]).arity(3, Some(3)))
        .with(Token::Param, Production::new([]).arity(3, Some(3)))
        .with(Token::Use, Production::new([Token::Type]).arity(1, Some(1)))
        .with(Token::TypeAlias, Production::new([]).arity(4, Some(4)))
        .with(Token::Class, Production::new([]).arity(4, Some(4)))
        .with(Token::TypeTrait, Production::new([]).arity(2, Some(2)))
        .with(Token::Conditional, Production::new([]).arity(3, Some(3)))
        .with(Token::TypeArgs, Production::new([Token::Type]));

    Pass::new("structure", Direction::TopDown, rules, schema)
}
