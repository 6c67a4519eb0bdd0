//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies. Each sub-module groups adapters by
//! infrastructure concern.
//!
//! Adapter categories:
//! - `broker`: brokerage REST API client, catalog, market data,
//!   portfolio, and order adapters
//! - `console`: operator-facing pair selection and threshold entry

pub mod broker;
pub mod console;
