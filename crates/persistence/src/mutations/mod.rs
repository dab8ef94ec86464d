// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! ## Module Organization
//!
//! - `audit` — Audit event persistence
//! - `events` — Event rows
//! - `index` — User event index maintenance and reconciliation
//! - `registrations` — Registration rows with write-time rechecks
//! - `sessions` — Login sessions
//! - `transition` — Orchestration (`persist_transition`)
//! - `users` — User accounts and preferences

pub mod audit;
pub mod events;
pub mod index;
pub mod registrations;
pub mod sessions;
pub mod transition;
pub mod users;
