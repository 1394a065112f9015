//! Oxentail computes [RDFS](https://www.w3.org/TR/rdf11-mt/#rdfs-entailment)
//! and partial
//! [OWL 2 RL](https://www.w3.org/TR/owl2-profiles/#Reasoning_in_OWL_2_RL_and_RDF_Graphs_using_Rules)
//! entailment over [Oxmem](../oxmem) graphs by forward chaining:
//! [`RuleEngine::compute_closure`] materializes every derivable triple
//! directly into the store, after which plain lookups and
//! [Sparmatch](../sparmatch) queries see the inferred data with no extra
//! cost.
//!
//! The rule table lives in [`RuleSet::rdfs_owl_rl`] and covers class and
//! property hierarchies, domains and ranges, equivalent classes, and
//! transitive, symmetric and inverse properties.

mod engine;
mod error;
mod rules;

pub use crate::engine::{ClosureStats, EngineConfig, RuleEngine};
pub use crate::error::EntailmentError;
pub use crate::rules::{Rule, RuleSet};
