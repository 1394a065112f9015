use oxmem::{Term, Variable};
use std::collections::BTreeMap;
use std::fmt;

/// One row of a query result: a partial map from variables to terms.
///
/// A variable absent from the map is *unbound*, which is an ordinary state
/// a solution can be in (e.g. after an `OPTIONAL` that did not match).
#[derive(Eq, PartialEq, Debug, Clone, Default, Hash)]
pub struct QuerySolution {
    pub(crate) bindings: BTreeMap<Variable, Term>,
}

impl QuerySolution {
    /// Returns the term bound to the variable named `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings
            .iter()
            .find_map(|(variable, term)| (variable.as_str() == name).then_some(term))
    }

    /// Checks if the variable named `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The number of bound variables.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Checks if this solution binds no variable at all.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates over the bound variables in variable name order.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.bindings.iter()
    }
}

impl fmt::Display for QuerySolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (variable, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{variable} = {term}")?;
        }
        f.write_str("}")
    }
}

impl FromIterator<(Variable, Term)> for QuerySolution {
    fn from_iter<I: IntoIterator<Item = (Variable, Term)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}
