//! Users API.

use serde::Deserialize;

use crate::client::GorseClient;
use crate::contract::{ApiRequest, Operation, decode_json};
use crate::error::Result;
use crate::types::{Page, RowAffected, User, UserPatch, null_as_default};

/// Insert one user: `POST /api/user`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertUser {
    pub user: User,
}

impl Operation for InsertUser {
    type Output = RowAffected;

    fn request(&self) -> Result<ApiRequest> {
        ApiRequest::post(["api", "user"]).json(&self.user)
    }

    fn decode(&self, body: &str) -> Result<RowAffected> {
        decode_json(body)
    }
}

/// Insert a batch of users: `POST /api/users`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertUsers {
    pub users: Vec<User>,
}

impl Operation for InsertUsers {
    type Output = RowAffected;

    fn request(&self) -> Result<ApiRequest> {
        ApiRequest::post(["api", "users"]).json(&self.users)
    }

    fn decode(&self, body: &str) -> Result<RowAffected> {
        decode_json(body)
    }
}

/// Fetch one user: `GET /api/user/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct GetUser {
    pub user_id: String,
}

impl Operation for GetUser {
    type Output = User;

    fn request(&self) -> Result<ApiRequest> {
        Ok(ApiRequest::get(["api", "user", self.user_id.as_str()]))
    }

    fn decode(&self, body: &str) -> Result<User> {
        decode_json(body)
    }
}

/// Overwrite some fields of a user: `PATCH /api/user/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateUser {
    pub user_id: String,
    pub patch: UserPatch,
}

impl Operation for UpdateUser {
    type Output = RowAffected;

    fn request(&self) -> Result<ApiRequest> {
        ApiRequest::patch(["api", "user", self.user_id.as_str()]).json(&self.patch)
    }

    fn decode(&self, body: &str) -> Result<RowAffected> {
        decode_json(body)
    }
}

/// Delete one user: `DELETE /api/user/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteUser {
    pub user_id: String,
}

impl Operation for DeleteUser {
    type Output = RowAffected;

    fn request(&self) -> Result<ApiRequest> {
        Ok(ApiRequest::delete(["api", "user", self.user_id.as_str()]))
    }

    fn decode(&self, body: &str) -> Result<RowAffected> {
        decode_json(body)
    }
}

/// One page of the user listing: `GET /api/users?n=&cursor=`.
#[derive(Debug, Clone, PartialEq)]
pub struct GetUsers {
    pub n: usize,
    pub cursor: String,
}

impl GetUsers {
    /// First page of `n` users.
    pub fn first(n: usize) -> Self {
        Self {
            n,
            cursor: String::new(),
        }
    }

    /// Page of `n` users following `cursor`.
    pub fn after(n: usize, cursor: impl Into<String>) -> Self {
        Self {
            n,
            cursor: cursor.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserIterator {
    #[serde(default)]
    cursor: String,
    #[serde(default, deserialize_with = "null_as_default")]
    users: Vec<User>,
}

impl Operation for GetUsers {
    type Output = Page<User>;

    fn request(&self) -> Result<ApiRequest> {
        Ok(ApiRequest::get(["api", "users"])
            .query("n", self.n)
            .query("cursor", &self.cursor))
    }

    fn decode(&self, body: &str) -> Result<Page<User>> {
        let page: UserIterator = decode_json(body)?;
        Ok(Page {
            items: page.users,
            cursor: page.cursor,
        })
    }
}

impl GorseClient {
    /// Insert a user.
    pub async fn insert_user(&self, user: User) -> Result<RowAffected> {
        self.send(&InsertUser { user }).await
    }

    /// Insert a batch of users.
    pub async fn insert_users(&self, users: Vec<User>) -> Result<RowAffected> {
        self.send(&InsertUsers { users }).await
    }

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        self.send(&GetUser {
            user_id: user_id.to_string(),
        })
        .await
    }

    /// Update the fields present in `patch`.
    pub async fn update_user(&self, user_id: &str, patch: UserPatch) -> Result<RowAffected> {
        self.send(&UpdateUser {
            user_id: user_id.to_string(),
            patch,
        })
        .await
    }

    /// Delete a user.
    pub async fn delete_user(&self, user_id: &str) -> Result<RowAffected> {
        self.send(&DeleteUser {
            user_id: user_id.to_string(),
        })
        .await
    }

    /// Get a page of `n` users. Pass an empty cursor for the first page.
    pub async fn get_users(&self, n: usize, cursor: &str) -> Result<Page<User>> {
        self.send(&GetUsers::after(n, cursor)).await
    }
}

#[cfg(feature = "blocking")]
impl crate::blocking::GorseClient {
    /// Insert a user.
    pub fn insert_user(&self, user: User) -> Result<RowAffected> {
        self.send(&InsertUser { user })
    }

    /// Insert a batch of users.
    pub fn insert_users(&self, users: Vec<User>) -> Result<RowAffected> {
        self.send(&InsertUsers { users })
    }

    /// Get a user by ID.
    pub fn get_user(&self, user_id: &str) -> Result<User> {
        self.send(&GetUser {
            user_id: user_id.to_string(),
        })
    }

    /// Update the fields present in `patch`.
    pub fn update_user(&self, user_id: &str, patch: UserPatch) -> Result<RowAffected> {
        self.send(&UpdateUser {
            user_id: user_id.to_string(),
            patch,
        })
    }

    /// Delete a user.
    pub fn delete_user(&self, user_id: &str) -> Result<RowAffected> {
        self.send(&DeleteUser {
            user_id: user_id.to_string(),
        })
    }

    /// Get a page of `n` users. Pass an empty cursor for the first page.
    pub fn get_users(&self, n: usize, cursor: &str) -> Result<Page<User>> {
        self.send(&GetUsers::after(n, cursor))
    }
}
