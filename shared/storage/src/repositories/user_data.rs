//! User Data Repository
//!
//! Profile, custom fields, medications and emergency contacts in `user_data.json`.

use chrono::Utc;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use healthbot_models::{ProfilePayload, Record, UserData};
use healthbot_utils::{validate_index, HealthBotResult};

use crate::json_store::{load_json, save_json};

#[derive(Clone)]
pub struct UserDataRepository {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl UserDataRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn load(&self) -> UserData {
        let _guard = self.lock.lock().await;
        load_json(&self.path).await
    }

    /// Writes the whole document back.
    pub async fn save(&self, data: &UserData) -> HealthBotResult<()> {
        let _guard = self.lock.lock().await;
        save_json(&self.path, data).await
    }

    /// Overwrites the profile and custom fields wholesale.
    pub async fn save_profile(&self, payload: ProfilePayload) -> HealthBotResult<ProfilePayload> {
        self.update(|data| {
            data.profile = payload.profile;
            data.custom_fields = payload.custom_fields;
            Ok(data.profile_payload())
        })
        .await
    }

    pub async fn add_medication(&self, medication: Record) -> HealthBotResult<Vec<Record>> {
        self.update(|data| {
            data.medications.push(stamped(medication));
            Ok(data.medications.clone())
        })
        .await
    }

    pub async fn delete_medication(&self, index: usize) -> HealthBotResult<Vec<Record>> {
        self.update(|data| {
            validate_index("Medication", index, data.medications.len())?;
            data.medications.remove(index);
            Ok(data.medications.clone())
        })
        .await
    }

    pub async fn add_emergency_contact(&self, contact: Record) -> HealthBotResult<Vec<Record>> {
        self.update(|data| {
            data.emergency_contacts.push(stamped(contact));
            Ok(data.emergency_contacts.clone())
        })
        .await
    }

    pub async fn delete_emergency_contact(&self, index: usize) -> HealthBotResult<Vec<Record>> {
        self.update(|data| {
            validate_index("Emergency contact", index, data.emergency_contacts.len())?;
            data.emergency_contacts.remove(index);
            Ok(data.emergency_contacts.clone())
        })
        .await
    }

    /// Read-modify-write under the file lock. Nothing is written if `apply` fails.
    async fn update<T, F>(&self, apply: F) -> HealthBotResult<T>
    where
        F: FnOnce(&mut UserData) -> HealthBotResult<T>,
    {
        let _guard = self.lock.lock().await;
        let mut data: UserData = load_json(&self.path).await;
        let result = apply(&mut data)?;
        save_json(&self.path, &data).await?;
        Ok(result)
    }
}

fn stamped(mut record: Record) -> Record {
    record
        .entry("added_at")
        .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let repo = UserDataRepository::new(dir.path().join("user_data.json"));
        assert_eq!(repo.load().await, UserData::default());
    }

    #[tokio::test]
    async fn test_save_profile_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let repo = UserDataRepository::new(dir.path().join("user_data.json"));

        repo.save_profile(ProfilePayload {
            profile: record(json!({"name": "Ada", "age": "36"})),
            custom_fields: vec![record(json!({"label": "Diet", "value": "Vegan"}))],
        })
        .await
        .unwrap();
        repo.save_profile(ProfilePayload {
            profile: record(json!({"name": "Ada L."})),
            custom_fields: vec![],
        })
        .await
        .unwrap();

        let data = repo.load().await;
        assert_eq!(data.profile, record(json!({"name": "Ada L."})));
        assert!(data.custom_fields.is_empty());
    }

    #[tokio::test]
    async fn test_medications_keep_order_and_shift_on_delete() {
        let dir = tempfile::tempdir().unwrap();
        let repo = UserDataRepository::new(dir.path().join("user_data.json"));

        for name in ["Aspirin", "Metformin", "Lisinopril"] {
            repo.add_medication(record(json!({"name": name}))).await.unwrap();
        }
        let remaining = repo.delete_medication(1).await.unwrap();
        let names: Vec<_> = remaining.iter().map(|m| m["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Aspirin", "Lisinopril"]);
        assert!(remaining.iter().all(|m| m.contains_key("added_at")));

        assert_eq!(repo.delete_medication(2).await.unwrap_err().http_status_code(), 404);
        assert_eq!(repo.load().await.medications.len(), 2);
    }

    #[tokio::test]
    async fn test_emergency_contacts_are_independent_of_medications() {
        let dir = tempfile::tempdir().unwrap();
        let repo = UserDataRepository::new(dir.path().join("user_data.json"));

        repo.add_medication(record(json!({"name": "Aspirin"}))).await.unwrap();
        repo.add_emergency_contact(record(json!({"name": "Bob", "phone": "555-0100", "added_at": "then"})))
            .await
            .unwrap();

        let data = repo.load().await;
        assert_eq!(data.medications.len(), 1);
        assert_eq!(data.emergency_contacts.len(), 1);
        assert_eq!(data.emergency_contacts[0]["added_at"], "then");

        repo.delete_emergency_contact(0).await.unwrap();
        let data = repo.load().await;
        assert!(data.emergency_contacts.is_empty());
        assert_eq!(data.medications.len(), 1);
    }
}
