// SPDX-License-Identifier: Apache-2.0

//! Minimal user identity service (spec.md §3 `User`, C8). Consumed by the
//! out-of-scope HTTP/auth collaborator; this crate only guards the
//! ADMIN-cannot-be-deleted rule and surfaces typed errors.

use std::str::FromStr;

use moneybox_primitives::UserRole;
use moneybox_store::models::UserRow;
use moneybox_store::{SqliteStore, StoreError, user};

use crate::error::CoreError;

pub struct UserService {
    store: SqliteStore,
}

impl UserService {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        user_login: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<UserRow, CoreError> {
        let trimmed = user_login.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("user_login must not be empty".to_string()));
        }
        if password_hash.len() != 60 {
            return Err(CoreError::Validation(
                "password_hash must be a 60-character bcrypt hash".to_string(),
            ));
        }

        let mut tx = self.store.begin().await?;
        let row = user::insert(&mut tx, trimmed, password_hash, &role.to_string()).await?;
        tx.commit().await.map_err(StoreError::from)?;
        Ok(row)
    }

    pub async fn get(&self, id: i64) -> Result<UserRow, CoreError> {
        let mut tx = self.store.begin().await?;
        let row = user::get(&mut tx, id).await?;
        tx.commit().await.map_err(StoreError::from)?;
        Ok(row)
    }

    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        let mut tx = self.store.begin().await?;
        let current = user::get(&mut tx, id).await?;
        let role = UserRole::from_str(&current.role)?;
        if role == UserRole::Admin {
            return Err(CoreError::Validation(
                "admin users cannot be deleted".to_string(),
            ));
        }

        user::soft_delete(&mut tx, id).await?;
        tx.commit().await.map_err(StoreError::from)?;
        Ok(())
    }
}
