//!
//! # Field Selector Engine
//!
//! Parses selector expressions of the form `path=value,path!=value` into a
//! conjunction of terms and evaluates them against stored objects. Only `=`
//! and `!=` are supported, there is no OR. The set of queryable paths is a
//! closed allowlist: `metadata.name` and `metadata.namespace` always
//! resolve, everything else must be declared by the kind's strategy.
//!
use armature_model::store::ResourceObject;

use crate::strategy::ResourceStrategy;

/// fields every kind supports in selectors
pub const STANDARD_FIELDS: &[&str] = &["metadata.name", "metadata.namespace"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("malformed field selector term '{offending}'")]
    Malformed { offending: String },
    #[error("'{field}' is not a known field selector: supported fields are {}", .supported.join(", "))]
    UnsupportedField {
        field: String,
        supported: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorOp {
    Equals,
    NotEquals,
}

/// Single `path <op> value` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorTerm {
    pub path: String,
    pub op: SelectorOp,
    pub value: String,
}

impl SelectorTerm {
    fn matches_value(&self, actual: Option<&str>) -> bool {
        match self.op {
            SelectorOp::Equals => actual == Some(self.value.as_str()),
            SelectorOp::NotEquals => actual != Some(self.value.as_str()),
        }
    }
}

/// Parsed conjunction of equality terms. An empty selector accepts every
/// object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelector {
    terms: Vec<SelectorTerm>,
}

impl FieldSelector {
    /// parse a raw selector expression
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut terms = Vec::new();
        for raw in input.split(',') {
            let term = raw.trim();

            // `!=` must be tried first, `a!=b` also contains `=`
            let (path, op, value) = if let Some((path, value)) = term.split_once("!=") {
                (path, SelectorOp::NotEquals, value)
            } else if let Some((path, value)) = term.split_once('=') {
                (path, SelectorOp::Equals, value)
            } else {
                return Err(SelectorError::Malformed {
                    offending: term.to_owned(),
                });
            };

            let path = path.trim();
            if path.is_empty() {
                return Err(SelectorError::Malformed {
                    offending: term.to_owned(),
                });
            }

            terms.push(SelectorTerm {
                path: path.to_owned(),
                op,
                value: value.trim().to_owned(),
            });
        }

        Ok(Self { terms })
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[SelectorTerm] {
        &self.terms
    }

    /// reject any term whose path is neither standard nor declared by the
    /// kind, before a single object is examined
    pub fn check_fields(&self, declared: &'static [&'static str]) -> Result<(), SelectorError> {
        for term in &self.terms {
            let path = term.path.as_str();
            if STANDARD_FIELDS.contains(&path) || declared.contains(&path) {
                continue;
            }

            let supported = STANDARD_FIELDS
                .iter()
                .chain(declared.iter())
                .map(|field| (*field).to_owned())
                .collect();
            return Err(SelectorError::UnsupportedField {
                field: term.path.clone(),
                supported,
            });
        }
        Ok(())
    }

    /// evaluate the conjunction against one object
    /// total and side effect free: nothing is mutated
    pub fn matches<St>(&self, obj: &ResourceObject<St::Spec>, strategy: &St) -> bool
    where
        St: ResourceStrategy,
    {
        self.terms.iter().all(|term| {
            let actual = match term.path.as_str() {
                "metadata.name" => Some(obj.meta.name().to_owned()),
                "metadata.namespace" => obj.meta.namespace().map(ToOwned::to_owned),
                path => strategy.selector_value(obj, path),
            };
            term.matches_value(actual.as_deref())
        })
    }
}

#[cfg(test)]
mod test {

    use armature_model::fixture::TestSpec;
    use armature_model::store::ResourceObject;

    use crate::FieldError;
    use crate::strategy::ResourceStrategy;

    use super::{FieldSelector, SelectorError, SelectorOp};

    struct ReplicaStrategy;

    impl ResourceStrategy for ReplicaStrategy {
        type Spec = TestSpec;

        fn validate(&self, _obj: &ResourceObject<TestSpec>) -> Vec<FieldError> {
            Vec::new()
        }

        fn selector_fields(&self) -> &'static [&'static str] {
            &["spec.replica"]
        }

        fn selector_value(&self, obj: &ResourceObject<TestSpec>, field: &str) -> Option<String> {
            match field {
                "spec.replica" => Some(obj.spec.replica.to_string()),
                _ => None,
            }
        }
    }

    fn test_object(name: &str, replica: u16) -> ResourceObject<TestSpec> {
        ResourceObject::with_namespace(name, "default", TestSpec { replica })
    }

    #[test]
    fn test_parse_empty_matches_everything() {
        let selector = FieldSelector::parse("").expect("parsed");
        assert!(selector.is_empty());
        assert!(selector.matches(&test_object("t1", 1), &ReplicaStrategy));
    }

    #[test]
    fn test_parse_conjunction() {
        let selector =
            FieldSelector::parse("metadata.name=t1,spec.replica!=3").expect("parsed");
        assert_eq!(selector.terms().len(), 2);
        assert_eq!(selector.terms()[0].op, SelectorOp::Equals);
        assert_eq!(selector.terms()[1].op, SelectorOp::NotEquals);
        assert_eq!(selector.terms()[1].value, "3");
    }

    #[test]
    fn test_parse_malformed() {
        let err = FieldSelector::parse("metadata.name").unwrap_err();
        assert_eq!(
            err,
            SelectorError::Malformed {
                offending: "metadata.name".to_owned()
            }
        );

        // operator with no path
        assert!(matches!(
            FieldSelector::parse("=value"),
            Err(SelectorError::Malformed { .. })
        ));

        // empty term inside a conjunction
        assert!(matches!(
            FieldSelector::parse("metadata.name=t1,,spec.replica=2"),
            Err(SelectorError::Malformed { .. })
        ));
    }

    #[test]
    fn test_check_fields_closed_allowlist() {
        let selector = FieldSelector::parse("spec.replica=2").expect("parsed");
        selector
            .check_fields(ReplicaStrategy.selector_fields())
            .expect("declared field accepted");

        let selector = FieldSelector::parse("spec.unknown=2").expect("parsed");
        let err = selector
            .check_fields(ReplicaStrategy.selector_fields())
            .unwrap_err();
        match err {
            SelectorError::UnsupportedField { field, supported } => {
                assert_eq!(field, "spec.unknown");
                assert_eq!(
                    supported,
                    vec!["metadata.name", "metadata.namespace", "spec.replica"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_matches_standard_and_declared_fields() {
        let obj = test_object("t1", 2);

        let selector = FieldSelector::parse("metadata.name=t1").expect("parsed");
        assert!(selector.matches(&obj, &ReplicaStrategy));

        let selector =
            FieldSelector::parse("metadata.namespace=default,spec.replica=2").expect("parsed");
        assert!(selector.matches(&obj, &ReplicaStrategy));

        let selector = FieldSelector::parse("spec.replica!=2").expect("parsed");
        assert!(!selector.matches(&obj, &ReplicaStrategy));

        let selector = FieldSelector::parse("metadata.name=other").expect("parsed");
        assert!(!selector.matches(&obj, &ReplicaStrategy));
    }
}
