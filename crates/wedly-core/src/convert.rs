// ── API-to-domain type conversions ──
//
// Bridges raw `wedly_api` wire types into canonical `wedly_core::model`
// types, and domain requests back into request bodies.

use wedly_api::models::{ApiGuest, ApiGuestStats, GuestBody, GuestQuery, InvitationData};

use crate::model::{Guest, GuestId, GuestStats, Invitation};
use crate::requests::{GuestFilter, NewGuest};

impl From<ApiGuest> for Guest {
    fn from(g: ApiGuest) -> Self {
        // A backend can report `checkedIn` without a timestamp. The flag
        // wins; creation time stands in as the earliest possible arrival.
        let checked_in_at = if g.checked_in {
            Some(g.checked_in_at.unwrap_or(g.created_at))
        } else {
            None
        };
        Self {
            id: GuestId::from(g.id),
            name: g.name,
            is_vip: g.is_vip,
            group: g.group,
            attendance_count: g.attendance_count.max(1),
            checked_in: g.checked_in,
            checked_in_at,
            created_at: g.created_at,
        }
    }
}

impl From<ApiGuestStats> for GuestStats {
    fn from(s: ApiGuestStats) -> Self {
        Self {
            total: s.total,
            checked_in: s.checked_in,
            vip_total: s.vip_total,
            vip_checked_in: s.vip_checked_in,
        }
    }
}

impl From<InvitationData> for Invitation {
    fn from(d: InvitationData) -> Self {
        Self {
            guest: d.guest.into(),
            config: d.config,
        }
    }
}

impl From<&NewGuest> for GuestBody {
    fn from(g: &NewGuest) -> Self {
        Self {
            name: g.name.trim().to_owned(),
            is_vip: g.is_vip,
            group: g.group.clone(),
            attendance_count: g.attendance_count,
        }
    }
}

impl From<&Guest> for GuestBody {
    fn from(g: &Guest) -> Self {
        Self {
            name: g.name.clone(),
            is_vip: g.is_vip,
            group: g.group.clone(),
            attendance_count: g.attendance_count,
        }
    }
}

impl From<&GuestFilter> for GuestQuery {
    fn from(f: &GuestFilter) -> Self {
        Self {
            search: f.needle().map(str::to_owned),
            is_vip: f.vip,
        }
    }
}
