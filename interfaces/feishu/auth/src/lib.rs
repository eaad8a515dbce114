//! Feishu tenant access token exchange.

pub mod index;
