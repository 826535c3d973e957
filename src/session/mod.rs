//! Host-integration layer: one explicit session per workbench instead of global state.

pub(crate) mod animation_session;
pub(crate) mod command;
pub(crate) mod control;
pub(crate) mod example;
