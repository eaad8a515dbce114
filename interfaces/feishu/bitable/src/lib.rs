//! Feishu Bitable record writes.

pub mod index;
