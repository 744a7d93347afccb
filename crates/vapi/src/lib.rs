//! Vapi API binding for the `declarative` reconciliation engine.
//!
//! Provides an authenticated [`ApiClient`] and one [`Resource`] adapter
//! per remote kind:
//!
//! | Kind | Collection | Update |
//! |------|------------|--------|
//! | [`Assistant`] | `assistant` | delete + create |
//! | [`File`] | `file` | re-upload when content changes |
//! | [`SipTrunk`] | `credential` | `PATCH` |
//! | [`TwilioPhoneNumber`] | `phone-number` | delete + create |
//! | [`SipTrunkPhoneNumber`] | `phone-number` | delete + create |
//! | [`Tool`] | `tool` | delete + create |
//! | [`QueryTool`] | `tool` | `PATCH` |
//!
//! [`Resource`]: declarative::Resource

pub mod assistant;
pub mod client;
pub mod common;
pub mod file;
pub mod multipart;
pub mod phone_number;
pub mod query_tool;
pub mod sip_trunk;
pub mod tool;

pub use assistant::Assistant;
pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use common::{Property, Server};
pub use file::File;
pub use phone_number::{SipTrunkPhoneNumber, TwilioPhoneNumber};
pub use query_tool::QueryTool;
pub use sip_trunk::SipTrunk;
pub use tool::Tool;
