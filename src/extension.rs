//! Extension-namespace validation.
//!
//! Every field outside a node's standard field set must be a validly
//! namespace-qualified extension (`prefix:localName`, prefix declared in the
//! document's `@context`), at every depth of the tree. Extension subtrees
//! are vendor-controlled: their internal structure is unrestricted, but all
//! of their own object keys must themselves be namespace-qualified.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{ValidationError, Violation};
use crate::field_set::{Child, FieldSetRegistry};
use crate::types::EventType;

/// Collect the legal extension-key prefixes declared by a namespace
/// context value.
///
/// A single mapping contributes its keys; a sequence contributes the union
/// of the keys of its mapping elements (plain strings contribute none); a
/// bare string contributes none.
pub fn collect_prefixes(context: &Value) -> HashSet<String> {
    match context {
        Value::Object(map) => map.keys().cloned().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_object)
            .flat_map(|map| map.keys().cloned())
            .collect(),
        _ => HashSet::new(),
    }
}

/// Split a well-formed extension key into prefix and local name.
///
/// Well-formed means exactly one colon separating two non-empty parts.
fn split_qualified(key: &str) -> Option<(&str, &str)> {
    let mut parts = key.splitn(3, ':');
    let prefix = parts.next()?;
    let local = parts.next()?;
    if parts.next().is_some() || prefix.is_empty() || local.is_empty() {
        return None;
    }
    Some((prefix, local))
}

/// Validate every extension field in a document tree.
///
/// Walks the tree from the root field set, partitioning each
/// document-standard node's keys into known and foreign, recursing into
/// known structured children by their field-set names and into foreign
/// values as extension subtrees. Violations are accumulated across the
/// whole tree, never short-circuited.
///
/// # Errors
///
/// `ValidationError::UnknownFieldSet` for an unregistered set name and
/// `ValidationError::UnknownEventType` for an event whose discriminator
/// resolves to no known variant; both abort the walk.
pub fn validate_extensions(
    document: &Value,
    field_sets: &FieldSetRegistry,
    root_set: &str,
) -> Result<Vec<Violation>, ValidationError> {
    let context = document.get("@context").unwrap_or(&Value::Null);
    let walker = Walker {
        field_sets,
        prefixes: collect_prefixes(context),
    };
    let mut violations = Vec::new();
    walker.walk_known(document, root_set, "", &mut violations)?;
    Ok(violations)
}

struct Walker<'a> {
    field_sets: &'a FieldSetRegistry,
    prefixes: HashSet<String>,
}

impl Walker<'_> {
    /// Descend through a document-standard node governed by a field set.
    fn walk_known(
        &self,
        node: &Value,
        set_name: &str,
        path: &str,
        violations: &mut Vec<Violation>,
    ) -> Result<(), ValidationError> {
        let set = self
            .field_sets
            .get(set_name)
            .ok_or_else(|| ValidationError::UnknownFieldSet {
                name: set_name.into(),
            })?;
        let partition = self.field_sets.ensure_field_set(node, set_name)?;
        let Value::Object(map) = node else {
            return Ok(());
        };

        for key in &partition.known {
            let child_path = format!("{}/{}", path, key);
            let value = &map[key];
            let Some(child) = set.child(key) else {
                continue;
            };
            // The field set is consulted by key name only; a shape mismatch
            // (e.g. an object where a list belongs) is the structural
            // schema's finding, so non-matching shapes are skipped here.
            match child {
                Child::Leaf => {}
                Child::Node(child_set) => {
                    if value.is_object() {
                        self.walk_known(value, child_set, &child_path, violations)?;
                    }
                }
                Child::List(child_set) => {
                    if let Value::Array(items) = value {
                        for (i, item) in items.iter().enumerate() {
                            if item.is_object() {
                                let item_path = format!("{}/{}", child_path, i);
                                self.walk_known(item, child_set, &item_path, violations)?;
                            }
                        }
                    }
                }
                Child::Event => {
                    self.walk_event(value, &child_path, violations)?;
                }
                Child::EventList => {
                    if let Value::Array(items) = value {
                        for (i, item) in items.iter().enumerate() {
                            let item_path = format!("{}/{}", child_path, i);
                            self.walk_event(item, &item_path, violations)?;
                        }
                    }
                }
                Child::Extension => {
                    self.walk_extension_subtree(value, &child_path, violations);
                }
            }
        }

        for key in &partition.foreign {
            let child_path = format!("{}/{}", path, key);
            self.check_foreign_key(key, &child_path, violations);
            self.walk_extension_subtree(&map[key], &child_path, violations);
        }

        Ok(())
    }

    /// Resolve an event node's own field set from its discriminator.
    ///
    /// An empty object is the zero-event body serialization, not an event.
    fn walk_event(
        &self,
        node: &Value,
        path: &str,
        violations: &mut Vec<Violation>,
    ) -> Result<(), ValidationError> {
        if node.as_object().map(|m| m.is_empty()).unwrap_or(true) {
            return Ok(());
        }
        let event_type = EventType::resolve(node)
            .map_err(|found| ValidationError::UnknownEventType { found })?;
        self.walk_known(node, event_type.name(), path, violations)
    }

    /// Check one foreign key for namespace qualification.
    fn check_foreign_key(&self, key: &str, path: &str, violations: &mut Vec<Violation>) {
        match split_qualified(key) {
            None => violations.push(Violation::extension(
                path,
                format!(
                    "field \"{}\" is not namespace-qualified (expected prefix:localName)",
                    key
                ),
            )),
            Some((prefix, _)) => {
                if !self.prefixes.contains(prefix) {
                    violations.push(Violation::extension(
                        path,
                        format!(
                            "namespace prefix \"{}\" is not declared in @context",
                            prefix
                        ),
                    ));
                }
            }
        }
    }

    /// Descend through an extension subtree.
    ///
    /// The known/foreign split does not apply here: every object key at any
    /// depth must be namespace-qualified. Arrays recurse element-wise and
    /// scalar leaves are always accepted.
    fn walk_extension_subtree(&self, node: &Value, path: &str, violations: &mut Vec<Violation>) {
        match node {
            Value::Object(map) => {
                for (key, value) in map {
                    let child_path = format!("{}/{}", path, key);
                    self.check_foreign_key(key, &child_path, violations);
                    self.walk_extension_subtree(value, &child_path, violations);
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{}/{}", path, i);
                    self.walk_extension_subtree(item, &item_path, violations);
                }
            }
            _ => {}
        }
    }
}
