//! Domain logic for the assetdesk asset tracker.
//!
//! Holds the asset identifier allocator, the record store contract it runs
//! against, the validation rules for categories and assets, and the borrow
//! and maintenance lifecycles that drive asset status. Nothing in
//! here talks to the database directly; `assetdesk-db` implements the store.

pub mod allocation;
pub mod assets;
pub mod borrowing;
pub mod categories;
pub mod error;
pub mod maintenance;
pub mod status;
pub mod types;
