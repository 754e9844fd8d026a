use indexmap::IndexMap;
use std::fmt;

/// Most variables of one kind a class or subroutine may declare. The field
/// count is pushed as a constant, so every count stays within that range.
pub const MAX_VARS: u16 = 32767;

/// Storage class of a declared name. Static and field live in the class
/// scope, argument and local in the subroutine scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymKind {
    Static,
    Field,
    Argument,
    Local,
}

impl fmt::Display for SymKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            SymKind::Static => "static",
            SymKind::Field => "field",
            SymKind::Argument => "argument",
            SymKind::Local => "local",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub ty: String,
    pub kind: SymKind,
    pub index: u16,
}

/// What the qualifier of `q.name(...)` refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallTarget {
    /// An object held in a variable. The call dispatches on its declared type.
    Variable(Symbol),
    /// Anything that does not resolve is taken to be a class name.
    Class(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymTabErr {
    /// The name is already declared in the scope being inserted into.
    Duplicate(String),
    /// `declare_class_var` only takes static and field.
    NotClassKind(SymKind),
    /// Declaring one more would go past `MAX_VARS`.
    TooMany(SymKind),
}

/// Scope maps names to symbols in declaration order.
type Scope = IndexMap<String, Symbol>;

/// Two-level symbol table: one scope for the class being compiled and one for
/// the subroutine currently being compiled. Lookups try the subroutine scope
/// first. Index counters for static and field run for the life of the class;
/// argument and local counters restart with every subroutine.
#[derive(Debug, Default)]
pub struct SymTab {
    class: Scope,
    sub: Scope,
    static_cnt: u16,
    field_cnt: u16,
    arg_cnt: u16,
    local_cnt: u16,
}

impl SymTab {
    pub fn new() -> SymTab {
        SymTab::default()
    }

    pub fn declare_class_var(
        &mut self,
        name: &str,
        ty: &str,
        kind: SymKind,
    ) -> Result<&Symbol, SymTabErr> {
        let counter = match kind {
            SymKind::Static => &mut self.static_cnt,
            SymKind::Field => &mut self.field_cnt,
            _ => return Err(SymTabErr::NotClassKind(kind)),
        };

        insert(&mut self.class, counter, name, ty, kind)
    }

    /// Declares the next argument. The first parameter of a method is
    /// preceded by the implicit `this`, which takes argument 0.
    pub fn declare_param(
        &mut self,
        name: &str,
        ty: &str,
        is_method: bool,
    ) -> Result<&Symbol, SymTabErr> {
        if is_method && self.sub.is_empty() {
            insert(&mut self.sub, &mut self.arg_cnt, "this", "", SymKind::Argument)?;
        }

        insert(&mut self.sub, &mut self.arg_cnt, name, ty, SymKind::Argument)
    }

    pub fn declare_local(&mut self, name: &str, ty: &str) -> Result<&Symbol, SymTabErr> {
        insert(&mut self.sub, &mut self.local_cnt, name, ty, SymKind::Local)
    }

    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.sub.get(name).or_else(|| self.class.get(name))
    }

    pub fn resolve_call_target(&self, name: &str) -> CallTarget {
        match self.resolve(name) {
            Some(sym) => CallTarget::Variable(sym.clone()),
            None => CallTarget::Class(name.to_string()),
        }
    }

    /// Drops every argument and local, resetting their counters.
    pub fn clear_subroutine_scope(&mut self) {
        self.sub.clear();
        self.arg_cnt = 0;
        self.local_cnt = 0;
    }

    pub fn field_count(&self) -> u16 {
        self.field_cnt
    }

    pub fn static_count(&self) -> u16 {
        self.static_cnt
    }

    pub fn var_count(&self, kind: SymKind) -> u16 {
        match kind {
            SymKind::Static => self.static_cnt,
            SymKind::Field => self.field_cnt,
            SymKind::Argument => self.arg_cnt,
            SymKind::Local => self.local_cnt,
        }
    }

    /// Class-scope symbols in declaration order.
    pub fn class_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.class.values()
    }

    /// Subroutine-scope symbols in declaration order.
    pub fn subroutine_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.sub.values()
    }
}

fn insert<'s>(
    scope: &'s mut Scope,
    counter: &mut u16,
    name: &str,
    ty: &str,
    kind: SymKind,
) -> Result<&'s Symbol, SymTabErr> {
    if scope.contains_key(name) {
        return Err(SymTabErr::Duplicate(name.to_string()));
    }
    if *counter >= MAX_VARS {
        return Err(SymTabErr::TooMany(kind));
    }

    let sym = Symbol {
        name: name.to_string(),
        ty: ty.to_string(),
        kind,
        index: *counter,
    };
    *counter += 1;

    let (idx, _) = scope.insert_full(name.to_string(), sym);
    Ok(&scope[idx])
}
