use serde::{Deserialize, Serialize};

/// Body of `POST /api/users` and `PUT /api/users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
}
