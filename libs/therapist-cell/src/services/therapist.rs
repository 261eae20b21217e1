use anyhow::{Result, anyhow};
use serde_json::json;
use tracing::debug;
use chrono::Utc;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_utils::password::hash_password;

use crate::models::{
    RegisterTherapistRequest, Therapist, TherapistProfile, UpdateProfileRequest,
    DEFAULT_ROLE, DEFAULT_STATUS,
};

const PROFILE_SELECT: &str = "name,email,role,status";

pub struct TherapistService {
    supabase: SupabaseClient,
}

impl TherapistService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Create a new therapist record. The credential is hashed before it
    /// leaves this function; the plaintext is never persisted.
    pub async fn register(
        &self,
        request: RegisterTherapistRequest,
        credentials_url: &str,
    ) -> Result<Therapist> {
        debug!("Registering therapist: {}", request.email);

        let password_hash = hash_password(&request.password)
            .map_err(|e| anyhow!(e))?;

        let now = Utc::now().to_rfc3339();
        let row = json!({
            "name": request.name,
            "email": request.email,
            "password_hash": password_hash,
            "license": request.license,
            "expertise": request.expertise,
            "years": request.years,
            "institution": request.institution,
            "credentials_url": credentials_url,
            "role": DEFAULT_ROLE,
            "status": DEFAULT_STATUS,
            "created_at": now,
            "updated_at": now
        });

        let therapist: Therapist = self.supabase
            .insert_returning("therapists", row, None)
            .await?;

        debug!("Therapist registered with ID: {}", therapist.id);
        Ok(therapist)
    }

    /// Fetch the profile projection for a therapist. `None` means the
    /// record does not exist; errors mean the store failed.
    pub async fn fetch_profile(
        &self,
        therapist_id: &str,
        auth_token: &str,
    ) -> Result<Option<TherapistProfile>> {
        debug!("Fetching therapist profile: {}", therapist_id);

        self.supabase
            .find_by_id("therapists", therapist_id, PROFILE_SELECT, Some(auth_token))
            .await
    }

    /// Patch the therapist's own record with merge semantics: only the
    /// supplied fields are written, plus `updated_at`. No existence check.
    pub async fn update_profile(
        &self,
        therapist_id: &str,
        request: UpdateProfileRequest,
        auth_token: &str,
    ) -> Result<()> {
        debug!("Updating therapist profile: {}", therapist_id);

        let mut patch = serde_json::Map::new();

        if let Some(name) = request.name {
            patch.insert("name".to_string(), json!(name));
        }
        if let Some(role) = request.role {
            patch.insert("role".to_string(), json!(role));
        }
        if let Some(status) = request.status {
            patch.insert("status".to_string(), json!(status));
        }
        patch.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        self.supabase
            .update_by_id(
                "therapists",
                therapist_id,
                serde_json::Value::Object(patch),
                Some(auth_token),
            )
            .await
    }
}
