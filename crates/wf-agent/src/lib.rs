//! `wf-agent` — the mobile-agent registry.
//!
//! | Module    | Contents                                     |
//! |-----------|----------------------------------------------|
//! | [`store`] | `AgentStore`, `AgentRecord`, `AgentStatus`   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                       |
//! |---------|----------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on records |

pub mod store;


pub use store::{AgentRecord, AgentStatus, AgentStore};
