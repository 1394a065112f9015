//! Oxmem is a simple library providing an in-memory triple store for
//! [RDF 1.1 concepts](https://www.w3.org/TR/rdf11-concepts/).
//!
//! It is intended to be a basic building block of other crates like
//! [Sparmatch](../sparmatch) (graph pattern evaluation) and
//! [Oxentail](../oxentail) (rule-based entailment).
//!
//! It does not parse nor serialize any RDF syntax: a decoder is expected to
//! hand over already resolved [`Triple`]s, optionally expanding prefixed
//! names through [`Namespaces`] first.
//!
//! Usage example:
//! ```
//! use oxmem::*;
//!
//! let mut graph = Graph::default();
//!
//! // insertion
//! let ex = NamedNodeRef::new("http://example.com")?;
//! let triple = TripleRef::new(ex, ex, ex);
//! graph.insert(triple);
//!
//! // simple filter
//! let results: Vec<_> = graph.triples_matching(Some(ex.into()), None, None).collect();
//! assert_eq!(vec![triple.into_owned()], results);
//! # Result::<_,Box<dyn std::error::Error>>::Ok(())
//! ```

mod blank_node;
pub mod graph;
mod literal;
mod named_node;
mod namespaces;
mod term;
mod variable;
pub mod vocab;

pub use crate::blank_node::{BlankNode, BlankNodeIdParseError, BlankNodeRef};
pub use crate::graph::Graph;
pub use crate::literal::{Literal, LiteralRef, MalformedLiteral};
pub use crate::named_node::{NamedNode, NamedNodeRef};
pub use crate::namespaces::Namespaces;
pub use crate::term::{Subject, SubjectRef, Term, TermRef, Triple, TripleRef};
pub use crate::variable::{Variable, VariableNameParseError};
pub use oxilangtag::LanguageTagParseError;
pub use oxiri::IriParseError;
