//! Prefix-to-IRI mapping used to build and print [`NamedNode`]s.

use crate::named_node::NamedNode;
use crate::vocab::{owl, rdf, rdfs, xsd};
use oxiri::{Iri, IriParseError};
use rustc_hash::FxHashMap;

/// A registry of namespace prefixes, as bound by `PREFIX` declarations or
/// `@prefix` directives before the excluded parsing layer hands triples over.
///
/// ```
/// use oxmem::Namespaces;
///
/// let mut namespaces = Namespaces::new();
/// namespaces.bind("ex", "http://example.com/")?;
/// assert_eq!(
///     namespaces.expand("ex:foo")?.unwrap().as_str(),
///     "http://example.com/foo"
/// );
/// # Result::<_,oxmem::IriParseError>::Ok(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct Namespaces {
    prefixes: FxHashMap<String, String>,
}

impl Namespaces {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with the `rdf`, `rdfs`, `owl` and `xsd` prefixes.
    pub fn with_well_known() -> Self {
        let mut namespaces = Self::new();
        for (prefix, sample) in [
            ("rdf", rdf::TYPE.as_str()),
            ("rdfs", rdfs::SUB_CLASS_OF.as_str()),
            ("owl", owl::EQUIVALENT_CLASS.as_str()),
            ("xsd", xsd::STRING.as_str()),
        ] {
            let base = &sample[..=sample.rfind(['#', '/']).unwrap_or(sample.len() - 1)];
            namespaces.prefixes.insert(prefix.into(), base.into());
        }
        namespaces
    }

    /// Binds a prefix to a namespace IRI, validating the IRI.
    ///
    /// Binding an already bound prefix rebinds it.
    pub fn bind(
        &mut self,
        prefix: impl Into<String>,
        base: impl Into<String>,
    ) -> Result<(), IriParseError> {
        let base = Iri::parse(base.into())?.into_inner();
        self.prefixes.insert(prefix.into(), base);
        Ok(())
    }

    /// The namespace IRI bound to a prefix, if any.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Expands a `prefix:local` name into a full [`NamedNode`].
    ///
    /// Returns `Ok(None)` if the name has no colon or uses an unbound prefix.
    pub fn expand(&self, name: &str) -> Result<Option<NamedNode>, IriParseError> {
        let Some((prefix, local)) = name.split_once(':') else {
            return Ok(None);
        };
        let Some(base) = self.prefixes.get(prefix) else {
            return Ok(None);
        };
        Ok(Some(NamedNode::new(format!("{base}{local}"))?))
    }

    /// Shrinks an IRI back to a `prefix:local` name using the longest bound
    /// namespace that is a prefix of it.
    pub fn shrink(&self, node: &NamedNode) -> Option<String> {
        let iri = node.as_str();
        let (prefix, base) = self
            .prefixes
            .iter()
            .filter(|(_, base)| iri.starts_with(base.as_str()))
            .max_by_key(|(_, base)| base.len())?;
        Some(format!("{prefix}:{}", &iri[base.len()..]))
    }

    /// All bound (prefix, namespace IRI) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(prefix, base)| (prefix.as_str(), base.as_str()))
    }
}
