//! Materializes a project directory layout from an ordered list of path specs.
//!
//! A spec ending in a separator becomes an empty directory, any other spec an empty file.
//! Whatever already exists at a spec's path is deleted first, so applying the same list twice
//! leaves the same tree behind.
pub mod api;
pub mod errors;
pub mod layout;
pub mod preview;
pub mod scaffold;
pub mod spec;
