use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row of the `users` table as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Absent until the first update.
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_timestamps_in_camel_case() {
        let user = User {
            id: Uuid::nil(),
            name: "alice".into(),
            email: "a@x.com".into(),
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["name"], "alice");
        assert_eq!(json["email"], "a@x.com");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_none());
        assert!(json.get("created_at").is_none());
    }
}
