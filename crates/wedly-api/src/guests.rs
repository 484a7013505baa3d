// Guest endpoints
//
// CRUD, aggregate stats, and the check-in transition. All paths are
// relative to the API root (`/guests`, `/guests/{id}`, ...).

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    ApiGuest, ApiGuestStats, CheckInBody, GuestBody, GuestEnvelope, GuestList, GuestQuery,
    MessageResponse,
};

impl ApiClient {
    /// List guests, optionally filtered by name substring and VIP flag.
    ///
    /// `GET /guests?search={search}&isVIP={is_vip}`
    pub async fn list_guests(&self, query: &GuestQuery) -> Result<Vec<ApiGuest>, Error> {
        debug!(search = ?query.search, is_vip = ?query.is_vip, "listing guests");
        let list: GuestList = self.get_with_query(&["guests"], query).await?;
        Ok(list.guests)
    }

    /// Aggregate attendance counters.
    ///
    /// `GET /guests/stats`
    pub async fn guest_stats(&self) -> Result<ApiGuestStats, Error> {
        self.get(&["guests", "stats"]).await
    }

    /// Create a guest.
    ///
    /// `POST /guests`
    pub async fn create_guest(&self, body: &GuestBody) -> Result<ApiGuest, Error> {
        debug!(name = %body.name, "creating guest");
        let envelope: GuestEnvelope = self.post(&["guests"], body).await?;
        Ok(envelope.guest)
    }

    /// Replace a guest's editable fields.
    ///
    /// `PUT /guests/{id}`
    pub async fn update_guest(&self, id: &str, body: &GuestBody) -> Result<ApiGuest, Error> {
        debug!(id, "updating guest");
        let envelope: GuestEnvelope = self.put(&["guests", id], body).await?;
        Ok(envelope.guest)
    }

    /// Delete a guest.
    ///
    /// `DELETE /guests/{id}`
    pub async fn delete_guest(&self, id: &str) -> Result<String, Error> {
        debug!(id, "deleting guest");
        let resp: Option<MessageResponse> = self.delete(&["guests", id]).await?;
        Ok(resp.map(|r| r.message).unwrap_or_default())
    }

    /// Mark a guest as arrived, optionally overriding the party size.
    ///
    /// `POST /guests/{id}/check-in` with `{"attendanceCount": n}`.
    /// The response carries the updated guest and refreshed stats.
    pub async fn check_in_guest(
        &self,
        id: &str,
        attendance_count: Option<u32>,
    ) -> Result<GuestEnvelope, Error> {
        debug!(id, ?attendance_count, "checking in guest");
        self.post(&["guests", id, "check-in"], &CheckInBody { attendance_count })
            .await
    }
}
