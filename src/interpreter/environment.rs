use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::frontend::grammar::Expr;

/// A scope in the chain of scopes. Cloning shares the scope.
#[derive(Clone, Default)]
pub struct Environment {
    env_ptr: Rc<RefCell<EnvironmentData>>,
}

#[derive(Default)]
struct EnvironmentData {
    values: HashMap<String, Expr>,
    enclosing: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn with_enclosing(env: &Environment) -> Self {
        let env_data = EnvironmentData {
            values: HashMap::new(),
            enclosing: Some(env.clone()),
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(env_data)),
        }
    }

    /// Binds `name` in this scope only, shadowing any outer binding.
    pub fn define(&self, name: String, value: Expr) {
        self.env_ptr.borrow_mut().values.insert(name, value);
    }

    /// Looks `name` up from this scope outward.
    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<Expr> {
        let env_data = self.env_ptr.borrow();
        match env_data.values.get(name) {
            Some(value) => Some(value.clone()),
            None => env_data.enclosing.as_ref()?.get(name),
        }
    }

    /// Like `get`, but first moves the stored value to `line_num` so errors
    /// raised on it point at the use site.
    pub fn get_at_line(&self, name: &str, line_num: usize) -> Option<Expr> {
        let mut env_data = self.env_ptr.borrow_mut();
        match env_data.values.get_mut(name) {
            Some(value) => {
                value.line_num = line_num;
                Some(value.clone())
            }
            None => env_data.enclosing.as_ref()?.get_at_line(name, line_num),
        }
    }
}

// Scopes compare by identity. Two closures are equal only if they captured
// the same scope.
impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.env_ptr, &other.env_ptr)
    }
}

// A scope can hold a closure that captured it, so the contents are not printed.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Environment").finish_non_exhaustive()
    }
}
