// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod roles;
pub mod worker;

pub use roles::{is_role_available, list_available_roles};
pub use worker::LocalWorker;
