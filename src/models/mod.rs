// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod user;
pub mod week_list;

pub use user::{LoginRequest, SignupRequest, TokenResponse, User};
pub use week_list::{
    CreateWeekListRequest, NewTask, Task, UpdateTaskRequest, UpdateWeekListRequest, WeekList,
    WeekListState, WeekListSummary,
};
