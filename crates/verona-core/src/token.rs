//! The closed, extensible token set and the capability flags each token carries.
//!
//! Mirrors the `TokenDef(name, flags)` table of the original front-end: every
//! node in the tree is tagged with one `Token`, and a handful of boolean
//! capabilities (`print`, `symtab`, `lookup`, `lookdown`, `shadowing`,
//! `defbeforeuse`) drive the rewrite engine and the lookup subsystem without
//! a per-token `match` arm at every call site.

/// Capability flags attached to a [`Token`]. A minimal hand-rolled bitset
/// (rather than a dependency) since the flag set is small, fixed, and never
/// grows past the six capabilities the original front-end defines.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Capability(u8);

impl Capability {
    /// The node's location is its printable value (literals, identifiers, symbols).
    pub const PRINT: Capability = Capability(1 << 0);
    /// The node owns a symbol table of its descendants' bindings.
    pub const SYMTAB: Capability = Capability(1 << 1);
    /// An identifier under this token participates in upward lookup.
    pub const LOOKUP: Capability = Capability(1 << 2);
    /// An identifier under this token participates in downward lookup (lookdown).
    pub const LOOKDOWN: Capability = Capability(1 << 3);
    /// A new binding of the same name shadows an outer one rather than erroring.
    pub const SHADOWING: Capability = Capability(1 << 4);
    /// Within this symbol table, a use must lexically follow its definition.
    pub const DEFBEFOREUSE: Capability = Capability(1 << 5);

    pub const fn empty() -> Self {
        Capability(0)
    }

    pub const fn union(self, other: Capability) -> Capability {
        Capability(self.0 | other.0)
    }

    pub const fn contains(self, other: Capability) -> bool {
        (self.0 & other.0) == other.0
    }
}

macro_rules! tokens {
    ($($(#[$meta:meta])* $variant:ident => $name:literal $(, $flags:expr)?),* $(,)?) => {
        /// A node tag. Closed enum mirroring the original `TokenDef` table.
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
        #[non_exhaustive]
        pub enum Token {
            $($(#[$meta])* $variant),*
        }

        impl Token {
            /// Lowercase, hyphenated spelling used in AST dumps (matches the
            /// original's `TokenDef` string names).
            pub fn name(self) -> &'static str {
                match self {
                    $(Token::$variant => $name),*
                }
            }

            pub fn capabilities(self) -> Capability {
                match self {
                    $(Token::$variant => tokens!(@flags $($flags)?)),*
                }
            }
        }
    };
    (@flags) => { Capability::empty() };
    (@flags $flags:expr) => { $flags };
}

tokens! {
    // Concrete-syntax grouping (produced by the out-of-scope lexer/parser).
    Top => "top",
    File => "file",
    Directory => "directory",
    Group => "group",
    Paren => "paren",
    Square => "square",
    Brace => "brace",
    List => "list",
    Equals => "equals",

    // Punctuation / literals carried through from concrete syntax.
    DontCare => "dontcare",
    Dot => "dot",
    Ellipsis => "ellipsis",
    Colon => "colon",
    DoubleColon => "doublecolon",
    TripleColon => "triplecolon",
    Arrow => "arrow",
    Bool => "bool", Capability::PRINT,
    Hex => "hex", Capability::PRINT,
    Bin => "bin", Capability::PRINT,
    Int => "int", Capability::PRINT,
    HexFloat => "hexfloat", Capability::PRINT,
    Float => "float", Capability::PRINT,
    Char => "char", Capability::PRINT,
    Escaped => "escaped", Capability::PRINT,
    String => "string", Capability::PRINT,
    Symbol => "symbol", Capability::PRINT,
    Ident => "ident", Capability::PRINT,

    // Definitions.
    Class => "class", Capability::SYMTAB.union(Capability::LOOKUP).union(Capability::LOOKDOWN),
    TypeAlias => "typealias", Capability::SYMTAB.union(Capability::LOOKUP).union(Capability::LOOKDOWN),
    Use => "use",
    Package => "package",
    Var => "var", Capability::LOOKUP.union(Capability::SHADOWING),
    Let => "let", Capability::LOOKUP.union(Capability::SHADOWING),
    Ref => "ref",
    Lin => "lin",
    In => "in",
    Out => "out",
    Const => "const",
    If => "if",
    Else => "else",
    New => "new",
    Try => "try",

    TypeTrait => "typetrait", Capability::SYMTAB.union(Capability::LOOKUP).union(Capability::LOOKDOWN),
    ClassBody => "classbody",
    FieldLet => "fieldlet", Capability::LOOKDOWN,
    FieldVar => "fieldvar", Capability::LOOKDOWN,
    Function => "function", Capability::SYMTAB.union(Capability::LOOKUP).union(Capability::LOOKDOWN),
    TypeParams => "typeparams",
    TypeParam => "typeparam", Capability::LOOKUP.union(Capability::LOOKDOWN).union(Capability::SHADOWING),
    Params => "params",
    Param => "param", Capability::LOOKUP.union(Capability::SHADOWING),
    Block => "block", Capability::SYMTAB.union(Capability::DEFBEFOREUSE),

    // Type lattice.
    Type => "type",
    TypeUnit => "typeunit",
    TypeList => "typelist",
    TypeClassName => "typeclassname",
    TypeAliasName => "typealiasname",
    TypeParamName => "typeparamname",
    TypeTraitName => "typetraitname",
    TypeTuple => "typetuple",
    TypeView => "typeview",
    TypeFunc => "typefunc",
    TypeThrow => "typethrow",
    TypeIsect => "typeisect",
    TypeUnion => "typeunion",
    TypeVar => "typevar", Capability::PRINT,
    TypeEmpty => "typeempty",
    TypeName => "typename",
    TypeTrue => "typetrue",
    TypeFalse => "typefalse",
    TypeSubtype => "typesubtype",

    // Expressions.
    Expr => "expr",
    ExprSeq => "exprseq",
    TypeAssert => "typeassert",
    TypeAssertOp => "typeassertop",
    TypeArgs => "typeargs",
    Lambda => "lambda", Capability::SYMTAB.union(Capability::DEFBEFOREUSE),
    Tuple => "tuple",
    Unit => "unit",
    Assign => "assign",
    RefVar => "refvar",
    RefLet => "reflet",
    FunctionName => "funcname",
    Selector => "selector",
    Call => "call",
    Args => "args",
    TupleLHS => "tuple-lhs",
    CallLHS => "call-lhs",
    RefVarLHS => "refvar-lhs",
    Conditional => "conditional",
    FieldRef => "fieldref",
    Bind => "bind", Capability::LOOKUP.union(Capability::SHADOWING),
    Move => "move",
    Copy => "copy",
    Drop => "drop",
    TypeTest => "typetest",
    Cast => "cast",
    Return => "return",
    Throw => "throw",
    NLRCheck => "nlrcheck",

    // Structural helpers.
    Bound => "bound",
    Default => "default",
    Id => "Id",
    Lhs => "Lhs",
    Rhs => "Rhs",
    Op => "Op",

    // Diagnostics.
    Error => "error",
    ErrorMsg => "errormsg",
    ErrorAst => "errorast",
}

impl Token {
    #[inline]
    pub fn has(self, cap: Capability) -> bool {
        self.capabilities().contains(cap)
    }

    #[inline]
    pub fn is_print(self) -> bool {
        self.has(Capability::PRINT)
    }

    #[inline]
    pub fn is_symtab(self) -> bool {
        self.has(Capability::SYMTAB)
    }

    #[inline]
    pub fn is_lookup(self) -> bool {
        self.has(Capability::LOOKUP)
    }

    #[inline]
    pub fn is_lookdown(self) -> bool {
        self.has(Capability::LOOKDOWN)
    }

    #[inline]
    pub fn is_shadowing(self) -> bool {
        self.has(Capability::SHADOWING)
    }

    #[inline]
    pub fn is_defbeforeuse(self) -> bool {
        self.has(Capability::DEFBEFOREUSE)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
