use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

pub const DEFAULT_ROLE: &str = "Licensed Therapist";
pub const DEFAULT_STATUS: &str = "Available";
pub const UNKNOWN_CLIENT: &str = "Unknown";

/// A therapist record as stored. The credential hash deserializes from the
/// store but is never serialized into a response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Therapist {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub license: String,
    pub expertise: Vec<String>,
    pub years: i32,
    pub institution: String,
    pub credentials_url: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile projection returned by `select=name,email,role,status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TherapistProfile {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub status: Option<String>,
}

impl TherapistProfile {
    /// Display role, falling back to the default label when the stored
    /// value is missing or empty.
    pub fn role_label(&self) -> &str {
        self.role
            .as_deref()
            .filter(|role| !role.is_empty())
            .unwrap_or(DEFAULT_ROLE)
    }

    pub fn status_label(&self) -> &str {
        self.status
            .as_deref()
            .filter(|status| !status.is_empty())
            .unwrap_or(DEFAULT_STATUS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterTherapistRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub license: String,
    pub expertise: Vec<String>,
    pub years: i32,
    pub institution: String,
}

impl RegisterTherapistRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        if !self.email.contains('@') {
            return Err("email must be a valid address".to_string());
        }
        if self.password.len() < 8 {
            return Err("password must be at least 8 characters".to_string());
        }
        if self.license.trim().is_empty() {
            return Err("license is required".to_string());
        }
        if self.expertise.is_empty() {
            return Err("expertise is required".to_string());
        }
        if self.years < 0 {
            return Err("years must be a non-negative number".to_string());
        }
        if self.institution.trim().is_empty() {
            return Err("institution is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

/// A booking row with its client reference expanded by the store
/// (`select=time,status,client:clients(id,name)`). An unresolved
/// reference comes back as null, not as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub time: DateTime<Utc>,
    pub status: String,
    pub client: Option<ClientRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: Uuid,
    pub name: Option<String>,
}

/// Response shape for the bookings listing.
#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub time: DateTime<Utc>,
    pub client: String,
    pub status: String,
}

impl BookingView {
    /// `client` is the resolved client's name, or `"Unknown"` exactly when
    /// the reference did not resolve. A resolved client without a name
    /// yields its empty name.
    pub fn from_record(record: &BookingRecord) -> Self {
        let client = match &record.client {
            Some(client) => client.name.clone().unwrap_or_default(),
            None => UNKNOWN_CLIENT.to_string(),
        };

        Self {
            time: record.time,
            client,
            status: record.status.clone(),
        }
    }
}
