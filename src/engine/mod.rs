//! Execution engine for vapi-sync
//!
//! The engine walks every resource kind in dependency order:
//! 1. Planning - pair declared resources with held state
//! 2. Diffing - show what reconciliation would do
//! 3. Executing - apply changes, one kind at a time, instances in parallel
//!
//! Files and SIP trunks come first because tools, assistants and phone
//! numbers reference their identifiers. Destroy walks the same list
//! backwards.

pub mod differ;
pub mod executor;

use anyhow::Result;
use declarative::{Resource, parse_target};
use std::collections::BTreeMap;

use crate::config::Manifest;
use crate::state::SyncState;

/// Manifest tables in dependency order
pub const SECTIONS: [&str; 7] = [
    "files",
    "sip_trunks",
    "tools",
    "query_tools",
    "assistants",
    "twilio_phone_numbers",
    "sip_trunk_phone_numbers",
];

/// Direction of a walk over the resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Referenced kinds first
    Dependencies,
    /// Referencing kinds first
    Reverse,
}

/// Per-kind work, called once for every resource kind
pub trait KindVisitor {
    fn visit<R: Resource>(
        &mut self,
        section: &'static str,
        declared: &BTreeMap<String, R>,
        held: &mut BTreeMap<String, R>,
    ) -> Result<()>;

    /// Called after each kind with the whole state, e.g. to checkpoint it
    fn after_kind(&mut self, _section: &'static str, _state: &mut SyncState) -> Result<()> {
        Ok(())
    }
}

/// Run a visitor over every kind, pairing manifest and state tables
pub fn each_kind<V: KindVisitor>(
    manifest: &Manifest,
    state: &mut SyncState,
    order: Order,
    visitor: &mut V,
) -> Result<()> {
    macro_rules! visit {
        ($($field:ident),+) => {{
            $(
                visitor.visit(stringify!($field), &manifest.$field, &mut state.$field)?;
                visitor.after_kind(stringify!($field), state)?;
            )+
        }};
    }

    match order {
        Order::Dependencies => visit!(
            files,
            sip_trunks,
            tools,
            query_tools,
            assistants,
            twilio_phone_numbers,
            sip_trunk_phone_numbers
        ),
        Order::Reverse => visit!(
            sip_trunk_phone_numbers,
            twilio_phone_numbers,
            assistants,
            query_tools,
            tools,
            sip_trunks,
            files
        ),
    }
    Ok(())
}

/// Check whether a `kind[.key]` target selects one instance
///
/// The kind part may name either the manifest table or the resource kind.
pub fn selects<R: Resource>(section: &str, key: &str, target: Option<&str>) -> bool {
    let Some(target) = target else {
        return true;
    };
    let (kind, wanted) = parse_target(target);
    let kind_matches = kind
        .as_deref()
        .is_none_or(|kind| kind == section || kind == R::KIND);
    kind_matches && wanted.as_deref().is_none_or(|wanted| wanted == key)
}

/// Reject a target naming no known kind
pub fn validate_target(target: Option<&str>) -> Result<()> {
    struct KnownKinds<'a> {
        kind: &'a str,
        found: bool,
    }

    impl KindVisitor for KnownKinds<'_> {
        fn visit<R: Resource>(
            &mut self,
            section: &'static str,
            _declared: &BTreeMap<String, R>,
            _held: &mut BTreeMap<String, R>,
        ) -> Result<()> {
            if self.kind == section || self.kind == R::KIND {
                self.found = true;
            }
            Ok(())
        }
    }

    let Some(target) = target else {
        return Ok(());
    };
    let (Some(kind), _) = parse_target(target) else {
        anyhow::bail!("Invalid target '{target}': expected kind or kind.key");
    };

    let mut known = KnownKinds {
        kind: &kind,
        found: false,
    };
    each_kind(
        &Manifest::default(),
        &mut SyncState::default(),
        Order::Dependencies,
        &mut known,
    )?;

    if !known.found {
        anyhow::bail!(
            "Unknown target '{target}'. Valid kinds: {}",
            SECTIONS.join(", ")
        );
    }
    Ok(())
}
