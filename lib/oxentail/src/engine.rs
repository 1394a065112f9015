use crate::error::EntailmentError;
use crate::rules::{Rule, RuleSet};
use oxmem::vocab::{rdf, rdfs};
use oxmem::{Graph, NamedNode, NamedNodeRef, Subject, SubjectRef, Term, Triple};
use sparmatch::{GraphPattern, QueryEvaluator, QuerySolution, TermPattern, TriplePattern};

/// Tuning knobs for [`RuleEngine`].
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Upper bound on fixpoint rounds before [`EntailmentError::RoundLimitExceeded`].
    pub max_rounds: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_rounds: 1_000 }
    }
}

/// What a closure computation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosureStats {
    /// Number of evaluation rounds until the fixpoint, zero for an already
    /// closed (or empty) store.
    pub rounds: usize,
    /// Number of triples the closure added.
    pub inferred: usize,
}

/// A semi-naive forward-chaining rule engine.
///
/// [`RuleEngine::compute_closure`] repeatedly applies its rules and inserts
/// the derived triples until nothing new can be derived. Each round only
/// considers rule applications that use at least one triple derived in the
/// previous round, so already explored combinations are not re-derived.
///
/// ```
/// use oxentail::{RuleEngine, RuleSet};
/// use oxmem::vocab::{rdf, rdfs};
/// use oxmem::{Graph, NamedNode, Triple};
///
/// let mut graph = Graph::new();
/// let dog = NamedNode::new("http://example.com/Dog")?;
/// let animal = NamedNode::new("http://example.com/Animal")?;
/// let rex = NamedNode::new("http://example.com/rex")?;
/// graph.insert(&Triple::new(dog.clone(), rdfs::SUB_CLASS_OF, animal.clone()));
/// graph.insert(&Triple::new(rex.clone(), rdf::TYPE, dog));
///
/// let engine = RuleEngine::new(RuleSet::rdfs_owl_rl());
/// engine.compute_closure(&mut graph)?;
/// assert!(graph.contains(&Triple::new(rex, rdf::TYPE, animal)));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct RuleEngine {
    rules: RuleSet,
    config: EngineConfig,
    evaluator: QueryEvaluator,
}

impl RuleEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self::with_config(rules, EngineConfig::default())
    }

    pub fn with_config(rules: RuleSet, config: EngineConfig) -> Self {
        Self {
            rules,
            config,
            evaluator: QueryEvaluator::new(),
        }
    }

    /// Extends the graph with everything its rules can derive from it.
    ///
    /// Inference is monotonic: triples are only ever added, never retracted,
    /// and running the closure a second time adds nothing.
    pub fn compute_closure(&self, graph: &mut Graph) -> Result<ClosureStats, EntailmentError> {
        // round zero: every triple counts as freshly derived
        let mut delta = graph.clone();
        let mut stats = ClosureStats {
            rounds: 0,
            inferred: 0,
        };
        while !delta.is_empty() {
            if stats.rounds == self.config.max_rounds {
                return Err(EntailmentError::RoundLimitExceeded {
                    limit: self.config.max_rounds,
                });
            }
            let mut derived = Vec::new();
            for rule in self.rules.rules() {
                self.apply_rule(graph, &delta, rule, &mut derived)?;
            }
            let mut next_delta = Graph::new();
            for triple in derived {
                if !graph.contains(&triple) {
                    graph.insert(&triple);
                    next_delta.insert(&triple);
                    stats.inferred += 1;
                }
            }
            delta = next_delta;
            stats.rounds += 1;
        }
        Ok(stats)
    }

    /// Derives every instantiation of `rule` that uses at least one triple
    /// of `delta`.
    fn apply_rule(
        &self,
        graph: &Graph,
        delta: &Graph,
        rule: &Rule,
        derived: &mut Vec<Triple>,
    ) -> Result<(), EntailmentError> {
        for delta_atom in 0..rule.body().len() {
            let mut bindings = vec![QuerySolution::default()];
            for (i, atom) in rule.body().iter().enumerate() {
                let scan = if i == delta_atom { delta } else { graph };
                let step = GraphPattern::Bgp {
                    patterns: vec![atom.clone()],
                };
                let mut extended = Vec::new();
                for binding in &bindings {
                    extended.extend(self.evaluator.evaluate_with(scan, &step, binding)?);
                }
                bindings = extended;
                if bindings.is_empty() {
                    break;
                }
            }
            for binding in &bindings {
                if let Some(triple) = instantiate(rule.head(), binding) {
                    derived.push(triple);
                }
            }
        }
        Ok(())
    }

    /// All classes `class` is a declared or derived subclass of.
    pub fn superclasses_of(graph: &Graph, class: NamedNodeRef<'_>) -> Vec<NamedNode> {
        graph
            .triples_matching(Some(class.into()), Some(rdfs::SUB_CLASS_OF), None)
            .filter_map(|triple| {
                if let Term::NamedNode(node) = triple.object {
                    Some(node)
                } else {
                    None
                }
            })
            .collect()
    }

    /// All classes `node` is a declared or derived instance of.
    pub fn types_of(graph: &Graph, node: SubjectRef<'_>) -> Vec<NamedNode> {
        graph
            .triples_matching(Some(node), Some(rdf::TYPE), None)
            .filter_map(|triple| {
                if let Term::NamedNode(node) = triple.object {
                    Some(node)
                } else {
                    None
                }
            })
            .collect()
    }

    /// All declared or derived instances of `class`.
    pub fn instances_of(graph: &Graph, class: NamedNodeRef<'_>) -> Vec<Subject> {
        graph
            .triples_matching(None, Some(rdf::TYPE), Some(class.into()))
            .map(|triple| triple.subject)
            .collect()
    }
}

/// Builds the concrete triple a rule head stands for under `binding`, or
/// `None` when the instantiation is not a well-formed triple (a literal
/// subject, say).
fn instantiate(head: &TriplePattern, binding: &QuerySolution) -> Option<Triple> {
    let subject = Subject::try_from(head_term(&head.subject, binding)?).ok()?;
    let Term::NamedNode(predicate) = head_term(&head.predicate, binding)? else {
        return None;
    };
    let object = head_term(&head.object, binding)?;
    Some(Triple::new(subject, predicate, object))
}

fn head_term(pattern: &TermPattern, binding: &QuerySolution) -> Option<Term> {
    match pattern {
        TermPattern::NamedNode(node) => Some(node.clone().into()),
        TermPattern::BlankNode(node) => Some(node.clone().into()),
        TermPattern::Literal(literal) => Some(literal.clone().into()),
        TermPattern::Variable(variable) => binding.get(variable.as_str()).cloned(),
    }
}
