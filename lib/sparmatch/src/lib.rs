//! Sparmatch evaluates [SPARQL](https://www.w3.org/TR/sparql11-query/)-style
//! graph patterns against an [Oxmem](../oxmem) [`oxmem::Graph`].
//!
//! Queries are built directly as [`GraphPattern`] algebra trees, there is no
//! query string parser. The [`QueryEvaluator`] walks the tree and returns
//! [`QuerySolution`]s, i.e. partial maps from variables to terms.
//!
//! Usage example:
//!
//! ```
//! use oxmem::{Graph, NamedNode, Triple, Variable};
//! use sparmatch::{GraphPattern, QueryEvaluator, TriplePattern};
//!
//! let mut graph = Graph::new();
//! let alice = NamedNode::new("http://example.com/alice")?;
//! let knows = NamedNode::new("http://example.com/knows")?;
//! let bob = NamedNode::new("http://example.com/bob")?;
//! graph.insert(&Triple::new(alice.clone(), knows.clone(), bob.clone()));
//!
//! let who = Variable::new("who")?;
//! let solutions = QueryEvaluator::new().evaluate(
//!     &graph,
//!     &GraphPattern::Bgp {
//!         patterns: vec![TriplePattern::new(alice, knows, who)],
//!     },
//! )?;
//! assert_eq!(solutions.len(), 1);
//! assert_eq!(solutions[0].get("who"), Some(&bob.into()));
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod algebra;
mod error;
mod eval;
mod solution;

pub use crate::algebra::{
    AggregateExpression, Expression, GraphPattern, OrderExpression, TermPattern, TriplePattern,
};
pub use crate::error::{ExpressionError, QueryEvaluationError};
pub use crate::eval::QueryEvaluator;
pub use crate::solution::QuerySolution;
