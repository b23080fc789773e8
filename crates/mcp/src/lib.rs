//! MCP server exposing the Crucible data-management platform as tools.
//!
//! Layers, from the wire inwards: [`transport`] frames JSON-RPC messages,
//! [`server`] routes MCP methods, [`dispatch`] resolves a tool call against the
//! [`tools`] registry and invokes the shared [`crucible_client::CrucibleApi`].

pub mod config;
pub mod dispatch;
pub mod server;
pub mod tools;
pub mod transport;
