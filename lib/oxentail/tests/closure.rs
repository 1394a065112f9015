#![allow(clippy::panic_in_result_fn)]

use oxentail::{EngineConfig, EntailmentError, RuleEngine, RuleSet};
use oxmem::vocab::{owl, rdf, rdfs};
use oxmem::{Graph, NamedNode, Triple};

fn named(suffix: &str) -> NamedNode {
    NamedNode::new(format!("http://example.com/{suffix}")).unwrap()
}

fn engine() -> RuleEngine {
    RuleEngine::new(RuleSet::rdfs_owl_rl())
}

#[test]
fn subclass_chain_propagates_types() -> Result<(), EntailmentError> {
    let mut graph = Graph::new();
    graph.insert(&Triple::new(
        named("Dog"),
        rdfs::SUB_CLASS_OF,
        named("Mammal"),
    ));
    graph.insert(&Triple::new(
        named("Mammal"),
        rdfs::SUB_CLASS_OF,
        named("Animal"),
    ));
    graph.insert(&Triple::new(named("rex"), rdf::TYPE, named("Dog")));

    engine().compute_closure(&mut graph)?;

    assert!(graph.contains(&Triple::new(named("rex"), rdf::TYPE, named("Mammal"))));
    assert!(graph.contains(&Triple::new(named("rex"), rdf::TYPE, named("Animal"))));
    assert!(graph.contains(&Triple::new(
        named("Dog"),
        rdfs::SUB_CLASS_OF,
        named("Animal")
    )));
    // entailment only runs forward
    assert!(!graph.contains(&Triple::new(
        named("Animal"),
        rdfs::SUB_CLASS_OF,
        named("Dog")
    )));
    Ok(())
}

#[test]
fn domain_and_range_type_the_endpoints() -> Result<(), EntailmentError> {
    let mut graph = Graph::new();
    graph.insert(&Triple::new(
        named("teaches"),
        rdfs::DOMAIN,
        named("Professor"),
    ));
    graph.insert(&Triple::new(named("teaches"), rdfs::RANGE, named("Course")));
    graph.insert(&Triple::new(named("alice"), named("teaches"), named("logic")));

    engine().compute_closure(&mut graph)?;

    assert!(graph.contains(&Triple::new(named("alice"), rdf::TYPE, named("Professor"))));
    assert!(graph.contains(&Triple::new(named("logic"), rdf::TYPE, named("Course"))));
    Ok(())
}

#[test]
fn subproperty_lifts_assertions() -> Result<(), EntailmentError> {
    let mut graph = Graph::new();
    graph.insert(&Triple::new(
        named("hasMother"),
        rdfs::SUB_PROPERTY_OF,
        named("hasParent"),
    ));
    graph.insert(&Triple::new(named("ada"), named("hasMother"), named("mary")));

    engine().compute_closure(&mut graph)?;

    assert!(graph.contains(&Triple::new(named("ada"), named("hasParent"), named("mary"))));
    Ok(())
}

#[test]
fn transitive_property_closes_long_chains() -> Result<(), EntailmentError> {
    let mut graph = Graph::new();
    graph.insert(&Triple::new(
        named("ancestorOf"),
        rdf::TYPE,
        owl::TRANSITIVE_PROPERTY,
    ));
    for (a, b) in [("a", "b"), ("b", "c"), ("c", "d")] {
        graph.insert(&Triple::new(named(a), named("ancestorOf"), named(b)));
    }

    let stats = engine().compute_closure(&mut graph)?;

    assert!(graph.contains(&Triple::new(named("a"), named("ancestorOf"), named("d"))));
    // a-c, b-d in the first round, a-d in the second
    assert_eq!(stats.inferred, 3);
    Ok(())
}

#[test]
fn symmetric_and_inverse_properties() -> Result<(), EntailmentError> {
    let mut graph = Graph::new();
    graph.insert(&Triple::new(
        named("marriedTo"),
        rdf::TYPE,
        owl::SYMMETRIC_PROPERTY,
    ));
    graph.insert(&Triple::new(named("ada"), named("marriedTo"), named("bob")));
    graph.insert(&Triple::new(
        named("teaches"),
        owl::INVERSE_OF,
        named("taughtBy"),
    ));
    graph.insert(&Triple::new(named("carol"), named("teaches"), named("logic")));

    engine().compute_closure(&mut graph)?;

    assert!(graph.contains(&Triple::new(named("bob"), named("marriedTo"), named("ada"))));
    assert!(graph.contains(&Triple::new(named("logic"), named("taughtBy"), named("carol"))));
    Ok(())
}

#[test]
fn equivalent_classes_share_their_instances() -> Result<(), EntailmentError> {
    let mut graph = Graph::new();
    graph.insert(&Triple::new(
        named("Human"),
        owl::EQUIVALENT_CLASS,
        named("Person"),
    ));
    graph.insert(&Triple::new(named("ada"), rdf::TYPE, named("Human")));
    graph.insert(&Triple::new(named("bob"), rdf::TYPE, named("Person")));

    engine().compute_closure(&mut graph)?;

    assert!(graph.contains(&Triple::new(named("ada"), rdf::TYPE, named("Person"))));
    assert!(graph.contains(&Triple::new(named("bob"), rdf::TYPE, named("Human"))));
    Ok(())
}

#[test]
fn closure_is_idempotent_and_monotonic() -> Result<(), EntailmentError> {
    let mut graph = Graph::new();
    graph.insert(&Triple::new(
        named("Dog"),
        rdfs::SUB_CLASS_OF,
        named("Animal"),
    ));
    graph.insert(&Triple::new(named("rex"), rdf::TYPE, named("Dog")));
    let original = graph.clone();

    engine().compute_closure(&mut graph)?;
    let closed_len = graph.len();
    // every asserted triple survives
    assert!(original.iter().all(|triple| graph.contains(&triple)));

    let stats = engine().compute_closure(&mut graph)?;
    assert_eq!(stats.inferred, 0);
    assert_eq!(graph.len(), closed_len);
    Ok(())
}

#[test]
fn rule_order_does_not_change_the_fixpoint() -> Result<(), EntailmentError> {
    let mut seed = Graph::new();
    seed.insert(&Triple::new(
        named("Student"),
        owl::EQUIVALENT_CLASS,
        named("Learner"),
    ));
    seed.insert(&Triple::new(
        named("Learner"),
        rdfs::SUB_CLASS_OF,
        named("Person"),
    ));
    seed.insert(&Triple::new(named("ada"), rdf::TYPE, named("Student")));
    seed.insert(&Triple::new(
        named("knows"),
        rdf::TYPE,
        owl::SYMMETRIC_PROPERTY,
    ));
    seed.insert(&Triple::new(named("ada"), named("knows"), named("bob")));

    let mut forward = seed.clone();
    engine().compute_closure(&mut forward)?;

    let mut reversed_rules = RuleSet::rdfs_owl_rl().rules().to_vec();
    reversed_rules.reverse();
    let mut backward = seed;
    RuleEngine::new(RuleSet::new(reversed_rules)).compute_closure(&mut backward)?;

    assert_eq!(forward, backward);
    Ok(())
}

#[test]
fn subclass_cycles_stabilize() -> Result<(), EntailmentError> {
    let mut graph = Graph::new();
    graph.insert(&Triple::new(named("A"), rdfs::SUB_CLASS_OF, named("B")));
    graph.insert(&Triple::new(named("B"), rdfs::SUB_CLASS_OF, named("A")));
    graph.insert(&Triple::new(named("x"), rdf::TYPE, named("A")));

    engine().compute_closure(&mut graph)?;

    assert!(graph.contains(&Triple::new(named("x"), rdf::TYPE, named("B"))));
    // the cycle collapses to mutual subclassing, nothing diverges
    assert!(graph.contains(&Triple::new(named("A"), rdfs::SUB_CLASS_OF, named("A"))));
    Ok(())
}

#[test]
fn round_limit_aborts_early() {
    let mut graph = Graph::new();
    graph.insert(&Triple::new(
        named("ancestorOf"),
        rdf::TYPE,
        owl::TRANSITIVE_PROPERTY,
    ));
    for (a, b) in [("a", "b"), ("b", "c"), ("c", "d")] {
        graph.insert(&Triple::new(named(a), named("ancestorOf"), named(b)));
    }
    let engine = RuleEngine::with_config(RuleSet::rdfs_owl_rl(), EngineConfig { max_rounds: 1 });
    assert!(matches!(
        engine.compute_closure(&mut graph),
        Err(EntailmentError::RoundLimitExceeded { limit: 1 })
    ));
}

#[test]
fn helper_queries_see_inferred_triples() -> Result<(), EntailmentError> {
    let mut graph = Graph::new();
    graph.insert(&Triple::new(
        named("Dog"),
        rdfs::SUB_CLASS_OF,
        named("Mammal"),
    ));
    graph.insert(&Triple::new(
        named("Mammal"),
        rdfs::SUB_CLASS_OF,
        named("Animal"),
    ));
    graph.insert(&Triple::new(named("rex"), rdf::TYPE, named("Dog")));

    engine().compute_closure(&mut graph)?;

    let dog = named("Dog");
    let mut superclasses = RuleEngine::superclasses_of(&graph, dog.as_ref());
    superclasses.sort();
    assert_eq!(superclasses, [named("Animal"), named("Mammal")]);

    let rex = named("rex");
    let mut types = RuleEngine::types_of(&graph, rex.as_ref().into());
    types.sort();
    assert_eq!(types, [named("Animal"), named("Dog"), named("Mammal")]);

    let animal = named("Animal");
    assert_eq!(
        RuleEngine::instances_of(&graph, animal.as_ref()),
        [named("rex").into()]
    );
    Ok(())
}
