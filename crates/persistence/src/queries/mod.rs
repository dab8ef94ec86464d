// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `audit` — Audit event queries
//! - `events` — Events with registrations, listings, capacity rechecks
//! - `reporting` — Dashboard aggregates
//! - `sessions` — Session lookup
//! - `users` — Users, credentials, and the user event index

pub mod audit;
pub mod events;
pub mod reporting;
pub mod sessions;
pub mod users;
