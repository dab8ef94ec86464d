// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregate statistics for administrators.
//!
//! All figures are computed from a single read transaction. Empty stores
//! yield zero counts and empty lists.

use evently_domain::format_instant;
use evently_persistence::{DashboardCounts, Persistence};
use time::OffsetDateTime;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    DailyRegistrationCount, DashboardResponse, EventTypeCount, RecentRegistrationInfo,
};

/// Number of recent registrations shown when the caller does not say.
pub const DEFAULT_RECENT_REGISTRATIONS: u32 = 5;

/// Computes the admin dashboard.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `now` - The instant separating upcoming from past events
/// * `recent_limit` - How many recent registrations to include
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the store cannot be read.
pub fn dashboard(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
    now: OffsetDateTime,
    recent_limit: Option<u32>,
) -> Result<DashboardResponse, ApiError> {
    AuthorizationService::authorize_view_dashboard(authenticated_actor)?;

    let now_str: String = format_instant(now).map_err(translate_domain_error)?;
    let counts: DashboardCounts = persistence
        .dashboard_counts(
            &now_str,
            recent_limit.unwrap_or(DEFAULT_RECENT_REGISTRATIONS),
        )
        .map_err(translate_persistence_error)?;

    let recent_registrations: Vec<RecentRegistrationInfo> = counts
        .recent_registrations
        .into_iter()
        .map(|entry| {
            Ok(RecentRegistrationInfo {
                event_id: entry.event_id,
                event_title: entry.event_title,
                user_id: entry.user_id,
                user_display_name: entry.user_display_name,
                registered_at: format_instant(entry.registered_at)
                    .map_err(translate_domain_error)?,
            })
        })
        .collect::<Result<_, ApiError>>()?;

    Ok(DashboardResponse {
        total_events: counts.total_events,
        total_users: counts.total_users,
        upcoming_events: counts.upcoming_events,
        events_by_type: counts
            .events_by_type
            .into_iter()
            .map(|(event_type, count)| EventTypeCount {
                event_type: event_type.to_string(),
                count,
            })
            .collect(),
        registrations_by_day: counts
            .registrations_by_day
            .into_iter()
            .map(|(day, count)| DailyRegistrationCount { day, count })
            .collect(),
        recent_registrations,
    })
}
