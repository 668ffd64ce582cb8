use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{Block, Parameter};
use crate::evaluator::value::Value;

#[derive(Debug, Clone)]
pub struct Var {
    pub name: String,
    pub value: Value,
    pub mutable: bool,
}

impl Var {
    pub fn new(name: impl Into<String>, value: Value, mutable: bool) -> Self {
        Self {
            name: name.into(),
            value,
            mutable,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Rc<Block>,
}

/// The three built-in callables. These dispatch straight to evaluator
/// methods rather than running a parsed body, since there is no AST to
/// walk for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Print,
    ToStr,
    Input,
}

impl Builtin {
    pub const ALL: [Builtin; 3] = [Builtin::Print, Builtin::ToStr, Builtin::Input];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::ToStr => "to_str",
            Builtin::Input => "input",
        }
    }

    pub fn params(self) -> Vec<Parameter> {
        match self {
            Builtin::Print | Builtin::ToStr => vec![Parameter {
                name: "arg".to_string(),
                mutable: false,
            }],
            Builtin::Input => Vec::new(),
        }
    }
}

/// Anything a name in scope can resolve to.
#[derive(Debug, Clone)]
pub enum Binding {
    Var(Var),
    Function(Function),
    Builtin(Builtin),
}

impl Binding {
    pub fn name(&self) -> &str {
        match self {
            Binding::Var(v) => &v.name,
            Binding::Function(f) => &f.name,
            Binding::Builtin(b) => b.name(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Scope {
    bindings: HashMap<String, Binding>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn look_up(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn update(&mut self, binding: Binding) {
        self.bindings.insert(binding.name().to_string(), binding);
    }
}

/// One persistent global scope plus, at most, a single active call-frame
/// scope. A function body only ever sees its own frame and the globals --
/// never an enclosing caller's locals -- so nested calls can't leak state
/// between each other.
#[derive(Debug, Default)]
pub struct GlobalScope {
    global: Scope,
    stack: Vec<Scope>,
}

impl GlobalScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn look_up(&self, name: &str) -> Option<&Binding> {
        if let Some(top) = self.stack.last() {
            if let Some(found) = top.look_up(name) {
                return Some(found);
            }
        }
        self.global.look_up(name)
    }

    pub fn update(&mut self, binding: Binding) {
        match self.stack.last_mut() {
            Some(top) => top.update(binding),
            None => self.global.update(binding),
        }
    }

    /// Pushes a fresh call frame pre-populated with the argument bindings
    /// and the callee itself (under its own name), which is what lets a
    /// function call itself recursively without falling through to an
    /// unrelated global of the same name.
    pub fn call(&mut self, callee: Binding, args: Vec<Var>) {
        let mut scope = Scope::new();
        for arg in args {
            scope.update(Binding::Var(arg));
        }
        scope.update(callee);
        self.stack.push(scope);
    }

    pub fn fn_return(&mut self) -> bool {
        self.stack.pop().is_some()
    }
}
