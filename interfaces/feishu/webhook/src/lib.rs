//! Feishu custom bot webhook: interactive card payloads and delivery.

pub mod index;
