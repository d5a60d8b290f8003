// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod lenient;
pub mod pro;
pub mod role;
pub mod user;

pub use pro::{PortfolioItem, ProPatch, ProRecord, Review};
pub use role::{AppRole, TargetRole};
pub use user::{AccountType, SupportLevel, UserPatch, UserRecord};
