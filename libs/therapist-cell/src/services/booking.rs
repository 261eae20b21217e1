use std::collections::HashSet;

use anyhow::Result;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::BookingRecord;

const BOOKING_SELECT: &str = "time,status,client:clients(id,name)";

pub struct BookingService {
    supabase: SupabaseClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// All bookings assigned to a therapist, with the client reference
    /// expanded by the store. No explicit ordering is requested; rows come
    /// back in store-return order.
    pub async fn for_therapist(
        &self,
        therapist_id: &str,
        auth_token: &str,
    ) -> Result<Vec<BookingRecord>> {
        debug!("Fetching bookings for therapist: {}", therapist_id);

        let filter = format!("doctor_id=eq.{}", therapist_id);
        self.supabase
            .find_filtered("bookings", &filter, BOOKING_SELECT, Some(auth_token))
            .await
    }
}

/// Unique client display names across a booking set, keeping
/// first-occurrence order. Bookings without a resolvable client, or whose
/// client has an empty name, are skipped. Two distinct clients sharing a
/// name collapse into one entry.
pub fn unique_client_names(bookings: &[BookingRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for booking in bookings {
        let Some(client) = &booking.client else { continue };
        let Some(name) = client.name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientRecord;
    use chrono::Utc;
    use uuid::Uuid;

    fn booking_with(name: Option<&str>) -> BookingRecord {
        BookingRecord {
            time: Utc::now(),
            status: "confirmed".to_string(),
            client: Some(ClientRecord {
                id: Uuid::new_v4(),
                name: name.map(str::to_string),
            }),
        }
    }

    fn booking_unresolved() -> BookingRecord {
        BookingRecord {
            time: Utc::now(),
            status: "pending".to_string(),
            client: None,
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let bookings = vec![
            booking_with(Some("A")),
            booking_with(Some("B")),
            booking_with(Some("A")),
            booking_with(Some("C")),
        ];

        assert_eq!(unique_client_names(&bookings), vec!["A", "B", "C"]);
    }

    #[test]
    fn dedup_skips_unresolved_and_unnamed_clients() {
        let bookings = vec![
            booking_unresolved(),
            booking_with(None),
            booking_with(Some("")),
            booking_with(Some("A")),
        ];

        assert_eq!(unique_client_names(&bookings), vec!["A"]);
    }

    #[test]
    fn dedup_of_empty_set_is_empty() {
        assert!(unique_client_names(&[]).is_empty());
    }
}
