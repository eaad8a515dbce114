//! GitHub trending listing: page fetch and record extraction.

pub mod index;
