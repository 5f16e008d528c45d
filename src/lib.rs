// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Week List Server: weekly task lists behind a small REST API.
//!
//! Users sign up and log in for a bearer token, then create time-boxed
//! week lists whose tasks can be completed while the list is editable.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::{UserRepository, WeekListRepository};
use services::{AuthService, WeekListService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub auth: AuthService,
    pub week_lists: WeekListService,
}

impl AppState {
    /// Wire the services onto the given repositories.
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        week_lists: Arc<dyn WeekListRepository>,
    ) -> Self {
        let auth = AuthService::new(users, &config);
        Self {
            config,
            auth,
            week_lists: WeekListService::new(week_lists),
        }
    }
}
