// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod lifecycle;
pub mod password;

pub use auth::AuthService;
pub use lifecycle::{TaskUpdatePolicy, WeekListService};
