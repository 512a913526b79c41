//! `PermissionProjector`: regex-based parsing of active policy text into
//! structured permission entries for `ListPermissions`.
//!
//! This is intentionally an approximation over the human-readable policy
//! text, not a re-implementation of Cedar's evaluator — it re-parses text
//! that has already round-tripped through `cedar_policy::Policy::parse` at
//! write time, so syntax errors are not a concern here, only which of a
//! handful of recognized shapes a clause takes. Its output is advisory and
//! must never stand in for an actual `Authorize` call.

use std::collections::HashSet;

use kernel::PolicyVersion;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::engine::EntityRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Permit,
    Forbid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionEntry {
    pub policy_id: String,
    pub effect: Effect,
    pub actions: Vec<String>,
    pub resource_types: Vec<String>,
    pub resource_ids: Option<Vec<String>>,
    pub conditions: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Projection {
    pub permissions: Vec<PermissionEntry>,
    pub effective_actions: Vec<String>,
}

/// How a principal/resource clause constrains matches.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Constraint {
    Any,
    Exact { entity_type: String, id: String },
    TypeOnly { entity_type: String },
    Group { entity_type: String, id: String },
}

impl Constraint {
    fn matches(&self, entity: &EntityRef, group_ids: &[(String, String)]) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::Exact { entity_type, id } => {
                entity.entity_type == *entity_type && entity.id == *id
            }
            Constraint::TypeOnly { entity_type } => entity.entity_type == *entity_type,
            Constraint::Group { entity_type, id } => group_ids
                .iter()
                .any(|(t, i)| t == entity_type && i == id),
        }
    }

    fn resource_types(&self) -> Vec<String> {
        match self {
            Constraint::Any => vec!["*".to_string()],
            Constraint::Exact { entity_type, .. }
            | Constraint::TypeOnly { entity_type }
            | Constraint::Group { entity_type, .. } => vec![entity_type.clone()],
        }
    }

    fn resource_id(&self) -> Option<Vec<String>> {
        match self {
            Constraint::Exact { id, .. } => Some(vec![id.clone()]),
            _ => None,
        }
    }
}

enum ActionConstraint {
    Any,
    Single(String),
    List(Vec<String>),
}

impl ActionConstraint {
    fn actions(&self) -> Vec<String> {
        match self {
            ActionConstraint::Any => vec!["*".to_string()],
            ActionConstraint::Single(a) => vec![a.clone()],
            ActionConstraint::List(items) => items.clone(),
        }
    }
}

static POLICY_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)^\s*(permit|forbid)\s*\(\s*principal\s*(.*?)\s*,\s*action\s*(.*?)\s*,\s*resource\s*(.*?)\s*\)\s*(?:when\s*\{(.*?)\})?\s*;?\s*$",
    )
    .expect("static regex is valid")
});

static EXACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^==\s*([A-Za-z_][A-Za-z0-9_]*)\s*::\s*"([^"]*)"$"#).expect("static regex is valid")
});
static GROUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^in\s*([A-Za-z_][A-Za-z0-9_]*)\s*::\s*"([^"]*)"$"#).expect("static regex is valid")
});
static TYPE_ONLY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^is\s*([A-Za-z_][A-Za-z0-9_]*)$").expect("static regex is valid"));

static ACTION_EXACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^==\s*Action\s*::\s*"([^"]*)"$"#).expect("static regex is valid")
});
static ACTION_LIST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^in\s*\[(.*)\]$").expect("static regex is valid"));
static ACTION_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"Action\s*::\s*"([^"]*)""#).expect("static regex is valid")
});

fn parse_constraint(clause: &str) -> Constraint {
    let clause = clause.trim();
    if clause.is_empty() {
        return Constraint::Any;
    }
    if let Some(caps) = EXACT_RE.captures(clause) {
        return Constraint::Exact {
            entity_type: caps[1].to_string(),
            id: caps[2].to_string(),
        };
    }
    if let Some(caps) = GROUP_RE.captures(clause) {
        return Constraint::Group {
            entity_type: caps[1].to_string(),
            id: caps[2].to_string(),
        };
    }
    if let Some(caps) = TYPE_ONLY_RE.captures(clause) {
        return Constraint::TypeOnly {
            entity_type: caps[1].to_string(),
        };
    }
    Constraint::Any
}

fn parse_action_constraint(clause: &str) -> ActionConstraint {
    let clause = clause.trim();
    if clause.is_empty() {
        return ActionConstraint::Any;
    }
    if let Some(caps) = ACTION_EXACT_RE.captures(clause) {
        return ActionConstraint::Single(caps[1].to_string());
    }
    if let Some(caps) = ACTION_LIST_RE.captures(clause) {
        let items: Vec<String> = ACTION_ITEM_RE
            .captures_iter(&caps[1])
            .map(|c| c[1].to_string())
            .collect();
        return ActionConstraint::List(items);
    }
    ActionConstraint::Any
}

struct ParsedPolicy {
    effect: Effect,
    principal: Constraint,
    action: ActionConstraint,
    resource: Constraint,
    condition: Option<String>,
}

fn parse_policy_text(text: &str) -> Option<ParsedPolicy> {
    let caps = POLICY_HEAD.captures(text)?;
    let effect = if &caps[1] == "permit" {
        Effect::Permit
    } else {
        Effect::Forbid
    };
    let principal = parse_constraint(&caps[2]);
    let action = parse_action_constraint(&caps[3]);
    let resource = parse_constraint(&caps[4]);
    let condition = caps.get(5).map(|m| m.as_str().trim().to_string());
    Some(ParsedPolicy {
        effect,
        principal,
        action,
        resource,
        condition,
    })
}

/// Parses active policy text into permission entries and an effective
/// action set for one principal and its group memberships.
pub struct PermissionProjector;

impl PermissionProjector {
    pub fn project(
        &self,
        versions: &[PolicyVersion],
        principal: &EntityRef,
        group_ids: &[(String, String)],
    ) -> Projection {
        let mut permissions = Vec::new();

        for version in versions {
            let Some(parsed) = parse_policy_text(&version.policy_text) else {
                tracing::debug!(policy_id = %version.policy_id, "policy text did not match any recognized projector shape");
                continue;
            };
            if !parsed.principal.matches(principal, group_ids) {
                continue;
            }
            permissions.push(PermissionEntry {
                policy_id: version.policy_id.clone(),
                effect: parsed.effect,
                actions: parsed.action.actions(),
                resource_types: parsed.resource.resource_types(),
                resource_ids: parsed.resource.resource_id(),
                conditions: parsed.condition,
            });
        }

        let effective_actions = Self::effective_actions(&permissions);
        Projection {
            permissions,
            effective_actions,
        }
    }

    fn effective_actions(entries: &[PermissionEntry]) -> Vec<String> {
        let mut permitted = HashSet::new();
        let mut wildcard_permit = false;
        let mut forbidden = HashSet::new();
        let mut wildcard_forbid = false;

        for entry in entries {
            for action in &entry.actions {
                match entry.effect {
                    Effect::Permit if action == "*" => wildcard_permit = true,
                    Effect::Permit => {
                        permitted.insert(action.clone());
                    }
                    Effect::Forbid if action == "*" => wildcard_forbid = true,
                    Effect::Forbid => {
                        forbidden.insert(action.clone());
                    }
                }
            }
        }

        if wildcard_forbid {
            return Vec::new();
        }

        let mut effective: Vec<String> = permitted.difference(&forbidden).cloned().collect();
        if wildcard_permit {
            effective.push("*".to_string());
        }
        effective.sort();
        effective.dedup();
        effective
    }
}
