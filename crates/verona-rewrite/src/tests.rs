use std::sync::Arc;

use verona_core::{Location, Node, SourceFile, Token};

use super::*;

fn loc(file: &Arc<SourceFile>, offset: u32, len: u32) -> Location {
    Location::new(file.clone(), offset, len)
}

#[test]
fn tok_and_any_match() {
    let n = Node::new(Token::Block);
    let mut caps = Captures::new();
    assert!(matches(&Pattern::tok(Token::Block), &n, &mut caps));
    assert!(matches(&Pattern::any(), &n, &mut caps));
    assert!(!matches(&Pattern::tok(Token::Class), &n, &mut caps));
}

#[test]
fn not_and_or_compose() {
    let n = Node::new(Token::Block);
    let mut caps = Captures::new();
    assert!(matches(&Pattern::not(Pattern::tok(Token::Class)), &n, &mut caps));
    assert!(matches(
        &Pattern::or([Pattern::tok(Token::Class), Pattern::tok(Token::Block)]),
        &n,
        &mut caps
    ));
}

#[test]
fn capture_binds_the_matched_node() {
    let n = Node::new(Token::Block);
    let mut caps = Captures::new();
    assert!(matches(&Pattern::capture("b", Pattern::tok(Token::Block)), &n, &mut caps));
    assert_eq!(caps.get("b"), Some(&n));
}

#[test]
fn children_sequence_with_repeat_matches_variable_arity() {
    let block = Node::new(Token::Block);
    block.push(Node::new(Token::Let));
    block.push(Node::new(Token::Let));
    block.push(Node::new(Token::Expr));

    let mut caps = Captures::new();
    let pattern = Pattern::children([
        Pattern::repeat(Pattern::tok(Token::Let)),
        Pattern::tok(Token::Expr),
    ]);
    assert!(matches(&pattern, &block, &mut caps));

    let mismatched = Node::new(Token::Block);
    mismatched.push(Node::new(Token::Let));
    mismatched.push(Node::new(Token::Class));
    let mut caps2 = Captures::new();
    assert!(!matches(&pattern, &mismatched, &mut caps2));
}

#[test]
fn descendant_searches_the_whole_subtree() {
    let class = Node::new(Token::Class);
    let body = Node::new(Token::ClassBody);
    let inner = Node::new(Token::Lambda);
    body.push(inner);
    class.push(body);

    let mut caps = Captures::new();
    assert!(matches(&Pattern::descendant(Pattern::tok(Token::Lambda)), &class, &mut caps));
}

#[test]
fn in_context_checks_ancestor_chain() {
    let class = Node::new(Token::Class);
    let body = Node::new(Token::ClassBody);
    let func = Node::new(Token::Function);
    body.push(func.clone());
    class.push(body);

    assert!(in_context(&func, Token::Class));
    assert!(!in_context(&func, Token::Lambda));
}

#[test]
fn rule_replace_mutates_in_place() {
    let file = SourceFile::new("a.verona", "1");
    let literal = Node::new_leaf(Token::Int, loc(&file, 0, 1));
    let parent = Node::new(Token::Expr);
    parent.push(literal.clone());

    let rule = Rule::new("int-to-float", Pattern::tok(Token::Int), |node, _caps| {
        Action::Replace(Node::new_leaf(Token::Float, node.location().unwrap()))
    });

    let action = rule.try_fire(&literal).expect("rule should fire");
    assert!(matches!(action, Action::Replace(_)));
}

#[test]
fn engine_runs_pass_to_fixpoint() {
    let file = SourceFile::new("a.verona", "1 2 3");
    let block = Node::new(Token::Block);
    block.push(Node::new_leaf(Token::Int, loc(&file, 0, 1)));
    block.push(Node::new_leaf(Token::Int, loc(&file, 2, 1)));
    block.push(Node::new_leaf(Token::Int, loc(&file, 4, 1)));

    let rule = Rule::new("int-to-float", Pattern::tok(Token::Int), |node, _caps| {
        Action::Replace(Node::new_leaf(Token::Float, node.location().unwrap()))
    });
    let schema = WellFormed::new();
    let pass = Pass::new("floatify", Direction::BottomUp, vec![rule], schema);

    let diagnostics = engine::run_pass(&pass, &block, 100, 64).expect("pass should succeed");
    assert!(diagnostics.is_empty());
    assert!(block.children().iter().all(|c| c.token() == Token::Float));
}

#[test]
fn engine_reports_fuel_exhaustion() {
    let leaf = Node::new(Token::Expr);
    // A rule that always fires (Replace with an equivalent fresh node) never
    // reaches a fixpoint, so it must exhaust the fuel budget.
    let rule = Rule::new("loop", Pattern::tok(Token::Expr), |_node, _caps| {
        Action::Replace(Node::new(Token::Expr))
    });
    let pass = Pass::new("looping", Direction::TopDown, vec![rule], WellFormed::new());

    let result = engine::run_pass(&pass, &leaf, 3, 64);
    assert!(matches!(result, Err(Error::RewriteFuelExhausted { .. })));
}

#[test]
fn error_action_splices_in_an_error_node_wrapping_the_fragment() {
    let file = SourceFile::new("a.verona", "bogus");
    let bad = Node::new_leaf(Token::Ident, loc(&file, 0, 5));
    let parent = Node::new(Token::Expr);
    parent.push(bad.clone());

    let rule = Rule::new("reject", Pattern::tok(Token::Ident), |_node, _caps| {
        Action::Error("not a valid reference".to_string())
    });
    let pass = Pass::new("reference", Direction::TopDown, vec![rule], WellFormed::new());

    let diagnostics = engine::run_pass(&pass, &parent, 100, 64).unwrap();
    assert!(diagnostics.has_errors());

    let error_node = parent.child(0).unwrap();
    assert_eq!(error_node.token(), Token::Error);
    let ast = error_node.child(1).unwrap();
    assert_eq!(ast.token(), Token::ErrorAst);
    assert_eq!(ast.child(0).unwrap(), bad);
}

#[test]
fn lift_hoists_to_the_enclosing_ancestor_and_removes_the_match() {
    let class = Node::new(Token::Class);
    let body = Node::new(Token::ClassBody);
    let lambda = Node::new(Token::Lambda);
    body.push(lambda.clone());
    class.push(body);

    let rule = Rule::new("hoist-lambda", Pattern::tok(Token::Lambda), |_node, _caps| {
        Action::Lift(Token::Class, Node::new(Token::Function))
    });
    let pass = Pass::new("lambda", Direction::TopDown, vec![rule], WellFormed::new());

    engine::run_pass(&pass, &class, 100, 64).unwrap();

    assert!(class.children().iter().any(|c| c.token() == Token::Function));
    assert!(class.child(0).unwrap().children().is_empty() || class.child(0).unwrap().token() == Token::ClassBody);
}

#[test]
fn wf_schema_rejects_unexpected_children() {
    let schema = WellFormed::new().with(
        Token::Block,
        Production::new([Token::Let]).arity(0, None),
    );
    let block = Node::new(Token::Block);
    block.push(Node::new(Token::Class));
    assert!(schema.validate(&block).is_err());
}

#[test]
fn wf_schema_extend_inherits_unless_overridden() {
    let base = WellFormed::new().with(Token::Block, Production::new([Token::Let]));
    let extended = WellFormed::new().extend(&base);
    let block = Node::new(Token::Block);
    block.push(Node::new(Token::Let));
    assert!(extended.validate(&block).is_ok());
}

#[test]
fn pipeline_run_to_stops_at_named_pass() {
    let file = SourceFile::new("a.verona", "1");
    let tree = Node::new_leaf(Token::Int, loc(&file, 0, 1));

    let first = Pass::new(
        "first",
        Direction::TopDown,
        vec![Rule::new("noop", Pattern::tok(Token::Int), |_n, _c| Action::NoChange)],
        WellFormed::new(),
    );
    let second = Pass::new(
        "second",
        Direction::TopDown,
        vec![Rule::new("noop2", Pattern::tok(Token::Int), |_n, _c| Action::NoChange)],
        WellFormed::new(),
    );

    let pipeline = Pipeline::builder(vec![first, second]).build();
    let (_tree, diagnostics) = pipeline.run_to(tree, Some("first")).unwrap();
    assert!(diagnostics.is_empty());
}
