//! # user-roles-contracts
//!
//! Shared types, errors, and name rules for the user-roles role manager.
//!
//! Every crate in the workspace imports from here. Apart from the name
//! normalization helpers in [`names`], no behavior lives in this crate.

pub mod addon;
pub mod capability;
pub mod content;
pub mod error;
pub mod event;
pub mod names;
pub mod role;
pub mod settings;
