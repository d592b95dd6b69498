//! The `Lookup`/`Lookups` result types and the `lookdown` state machine.
//!
//! `lookdown` walks a found definition through `TypeAlias` unfolding,
//! `TypeParam` substitution, `Type` unwrapping, qualified-name resolution,
//! and `TypeView` right-hand-side extraction until it reaches a `Class`,
//! `TypeTrait`, or `Function` to search, or gives up on a lattice shape
//! the search doesn't yet handle (`TypeIsect`/`TypeUnion`, §9).

use std::collections::{HashMap, HashSet};

use verona_core::{Location, Node, SourceFile, Token};

pub type Bindings = HashMap<Node, Node>;
type NodeSet = HashSet<Node>;

/// One resolved definition, together with the type-argument bindings in
/// effect at the point it was found. Bindings are for the *context* of
/// `def`; they don't include type arguments applied to `def` itself.
#[derive(Clone)]
pub struct Lookup {
    pub def: Node,
    pub ta: Option<Node>,
    pub bindings: Bindings,
    /// `ta` supplied more type arguments than `def` declares type parameters.
    pub too_many_typeargs: bool,
}

impl Lookup {
    pub fn new(def: Node, ta: Option<Node>) -> Self {
        Self::with_bindings(def, ta, Bindings::new())
    }

    /// Binds `def`'s formal type parameters (if it has any) to `ta`'s
    /// supplied arguments, in order, extending `bindings`; any trailing
    /// formals are bound to fresh type variables.
    pub fn with_bindings(def: Node, ta: Option<Node>, mut bindings: Bindings) -> Self {
        if !matches!(
            def.token(),
            Token::Class | Token::TypeAlias | Token::Function
        ) {
            return Self {
                too_many_typeargs: ta.is_some(),
                def,
                ta,
                bindings,
            };
        }

        let Some(ta) = ta else {
            return Self {
                def,
                ta: None,
                bindings,
                too_many_typeargs: false,
            };
        };

        let params: Vec<Node> = def
            .children()
            .into_iter()
            .find(|c| c.token() == Token::TypeParams)
            .map(|tp| tp.children())
            .unwrap_or_default();
        let args = ta.children();

        if params.len() < args.len() {
            return Self {
                def,
                ta: Some(ta),
                bindings,
                too_many_typeargs: true,
            };
        }

        for (param, arg) in params.iter().zip(args.iter()) {
            bindings.insert(param.clone(), arg.clone());
        }
        for param in &params[args.len()..] {
            bindings.insert(param.clone(), fresh_typevar(param));
        }

        Self {
            def,
            ta: Some(ta),
            bindings,
            too_many_typeargs: false,
        }
    }
}

/// A fresh `TypeVar` leaf, named but with no concrete-syntax span of its own.
fn fresh_typevar(scope: &Node) -> Node {
    let name = scope.fresh("tv");
    let file = SourceFile::new("<fresh>", name.clone());
    let location = Location::new(file, 0, name.len() as u32);
    Node::new_leaf(Token::TypeVar, location)
}

/// A set of resolved definitions, accumulated across branches (a scoped
/// name walked through several enclosing scopes, a symbol bound to several
/// overloads, ...).
#[derive(Clone, Default)]
pub struct Lookups {
    pub defs: Vec<Lookup>,
}

impl Lookups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn extend(&mut self, other: Lookups) {
        self.defs.extend(other.defs);
    }

    /// True when there is exactly one result and it is one of `kinds`.
    pub fn one_of(&self, kinds: &[Token]) -> bool {
        matches!(self.defs.as_slice(), [only] if kinds.contains(&only.def.token()))
    }
}

fn spelling(id: &Node) -> String {
    id.location().map(|l| l.text().to_string()).unwrap_or_default()
}

/// `def` (a `Use`) is only visible to `id` if it textually precedes it,
/// mirroring the `defbeforeuse` ordering a `Block` scope enforces.
fn precedes(def: &Node, id: &Node) -> bool {
    match (def.printable_location(), id.printable_location()) {
        (Some(a), Some(b)) => a.file() == b.file() && a.offset() < b.offset(),
        _ => true,
    }
}

/// Resolve an unqualified identifier by walking symbol tables outward from
/// `id`'s enclosing scope. A candidate `Use` is expanded by looking down
/// into its target type (only if the `Use` precedes `id`); any other
/// candidate is yielded directly, paired with `ta`.
pub fn lookup_name(id: &Node, ta: Option<Node>) -> Lookups {
    let name = spelling(id);
    let mut lookups = Lookups::new();

    for def in verona_core::lookup_upward(id, &name) {
        if def.token() == Token::Use {
            if precedes(&def, id) {
                let target = def.child(0).expect("`use` has a target type");
                lookups.extend(lookdown_one(Lookup::new(target, None), id, ta.clone(), NodeSet::new()));
            }
        } else {
            lookups.defs.push(Lookup::new(def, ta.clone()));
        }
    }

    lookups
}

/// Resolve `A::B::...::x` by unrolling the nested context: `tn`'s own
/// context child is `TypeUnit` (an unqualified name) or another scoped
/// name to resolve first.
pub fn lookup_scopedname(tn: &Node) -> Lookups {
    let ctx = tn.child(0).expect("scoped name has a context");
    let id = tn.child(1).expect("scoped name has an identifier");
    let ta = tn.child(2).filter(|t| t.token() == Token::TypeArgs);

    if ctx.token() == Token::TypeUnit {
        lookup_name(&id, ta)
    } else {
        lookup_scopedname_name(&ctx, &id, ta)
    }
}

/// Resolve `id` as a member of `ctx` (itself a scoped name to resolve first).
pub fn lookup_scopedname_name(ctx: &Node, id: &Node, ta: Option<Node>) -> Lookups {
    lookdown_batch(lookup_scopedname(ctx), id, ta, NodeSet::new())
}

/// `FunctionName` nodes share `lookup_scopedname`'s three-field shape
/// (context, identifier, type arguments); this is a naming convenience.
pub fn lookup_functionname(fname: &Node) -> Lookups {
    lookup_scopedname(fname)
}

fn lookdown_batch(lookups: Lookups, id: &Node, ta: Option<Node>, visited: NodeSet) -> Lookups {
    let mut result = Lookups::new();
    for lookup in lookups.defs {
        result.extend(lookdown_one(lookup, id, ta.clone(), visited.clone()));
    }
    result
}

/// The `lookdown` state machine: loops, replacing `lookup.def` with a
/// simpler node, until it finds a `Class`/`TypeTrait`/`Function` to search
/// inside, hits a dead end, or re-visits a node (a cycle).
fn lookdown_one(mut lookup: Lookup, id: &Node, ta: Option<Node>, mut visited: NodeSet) -> Lookups {
    loop {
        if !visited.insert(lookup.def.clone()) {
            return Lookups::new();
        }

        match lookup.def.token() {
            Token::Class | Token::TypeTrait | Token::Function => {
                let name = spelling(id);
                let found = lookup
                    .def
                    .symtab()
                    .map(|table| table.lookup_local(&name))
                    .unwrap_or_default();
                return Lookups {
                    defs: found
                        .into_iter()
                        .map(|def| Lookup::with_bindings(def, ta.clone(), lookup.bindings.clone()))
                        .collect(),
                };
            }
            Token::TypeAlias => {
                lookup.def = lookup.def.child(2).expect("typealias has an aliased type");
            }
            Token::TypeParam => match lookup.bindings.get(&lookup.def).cloned() {
                Some(bound) => lookup.def = bound,
                None => return Lookups::new(),
            },
            Token::Type => {
                lookup.def = lookup.def.child(0).expect("type wraps an inner type");
            }
            Token::TypeClassName | Token::TypeAliasName | Token::TypeTraitName | Token::TypeParamName => {
                // Resolve the name and retry; each resulting branch tracks
                // cycles independently from the point of the fork.
                return lookdown_batch(lookup_scopedname(&lookup.def), id, ta, visited);
            }
            Token::TypeView => {
                lookup.def = lookup.def.children().pop().expect("typeview has a rhs");
            }
            Token::TypeIsect | Token::TypeUnion => {
                // TODO: TypeIsect should return everything found in any
                // member; TypeUnion only what's identical across all of them.
                return Lookups::new();
            }
            _ => return Lookups::new(),
        }
    }
}
