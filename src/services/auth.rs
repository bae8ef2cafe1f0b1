// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account registration, multi-device login, logout and lookup.
//!
//! Device bookkeeping happens inside [`UserRepository::modify`], so the
//! active-device cap holds even when logins for one user race.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::{
        extract_device_name,
        password::{hash_password, verify_password},
        TokenService,
    },
    config::AuthSettings,
    error::ServiceError,
    models::{LoginRequest, MessageResponse, RegisterRequest},
    storage::{
        Device, DocumentDatabase, SessionRepository, StoreError, StoredSession, StoredUser,
        UserRepository,
    },
};

pub const EMAIL_TAKEN: &str = "Email sudah terdaftar";
pub const USERNAME_TAKEN: &str = "Username sudah terdaftar";
pub const INVALID_CREDENTIALS: &str = "Identitas atau password tidak dikenali";
pub const ACCOUNT_INACTIVE: &str = "Akun tidak aktif";
pub const USER_NOT_FOUND: &str = "User tidak ditemukan";
pub const DEVICE_NOT_FOUND: &str = "Device tidak ditemukan";
pub const LOGOUT_SUCCESS: &str = "Logout berhasil";

const REGISTER_FAILED: &str = "Gagal melakukan registrasi";
const LOGIN_FAILED: &str = "Gagal login";
const LOGOUT_FAILED: &str = "Gagal melakukan logout";
const GET_USER_FAILED: &str = "Gagal mengambil data user";

fn device_limit_message(max_devices: usize) -> String {
    format!(
        "Maksimal {max_devices} perangkat dapat login. Silakan logout dari perangkat lain terlebih dahulu."
    )
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access_token: String,
    /// Stored user after the device update (still carries the hash)
    pub user: StoredUser,
    pub device_id: String,
}

#[derive(Clone)]
pub struct AuthService {
    db: Arc<DocumentDatabase>,
    tokens: Arc<TokenService>,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(db: Arc<DocumentDatabase>, tokens: Arc<TokenService>, settings: AuthSettings) -> Self {
        Self {
            db,
            tokens,
            settings,
        }
    }

    /// Create an account. Email and username are stored lowercased.
    pub async fn register(&self, input: RegisterRequest) -> Result<StoredUser, ServiceError> {
        self.try_register(input)
            .await
            .map_err(|e| e.or_bad_request("Registration failed", REGISTER_FAILED))
    }

    async fn try_register(&self, input: RegisterRequest) -> Result<StoredUser, ServiceError> {
        let users = UserRepository::new(&self.db);

        if users.find_by_email(&input.email)?.is_some() {
            return Err(ServiceError::Conflict(EMAIL_TAKEN.to_string()));
        }
        if users.find_by_username(&input.username)?.is_some() {
            return Err(ServiceError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let password = hash_password(input.password, self.settings.bcrypt_cost).await?;
        let now = Utc::now();
        let user = StoredUser {
            id: Uuid::new_v4().to_string(),
            email: input.email,
            username: input.username,
            password,
            name: input.name,
            is_active: true,
            devices: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        // The existence checks above can race; the unique insert cannot.
        let stored = users.create(&user).map_err(|e| match e {
            StoreError::Duplicate { ref field, .. } if field == "email" => {
                ServiceError::Conflict(EMAIL_TAKEN.to_string())
            }
            StoreError::Duplicate { ref field, .. } if field == "username" => {
                ServiceError::Conflict(USERNAME_TAKEN.to_string())
            }
            other => ServiceError::Store(other),
        })?;

        info!(user_id = %stored.id, "User registered");
        Ok(stored)
    }

    /// Authenticate, record the device and issue a token for it.
    pub async fn login(
        &self,
        input: LoginRequest,
        user_agent: &str,
        ip_address: &str,
    ) -> Result<LoginOutcome, ServiceError> {
        self.try_login(input, user_agent, ip_address)
            .await
            .map_err(|e| e.or_bad_request("Login failed", LOGIN_FAILED))
    }

    async fn try_login(
        &self,
        input: LoginRequest,
        user_agent: &str,
        ip_address: &str,
    ) -> Result<LoginOutcome, ServiceError> {
        let users = UserRepository::new(&self.db);
        let sessions = SessionRepository::new(&self.db);

        let found = if input.identity.contains('@') {
            users.find_by_email(&input.identity)?
        } else {
            users.find_by_username(&input.identity)?
        };
        let user = found.ok_or_else(|| ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !user.is_active {
            return Err(ServiceError::Unauthorized(ACCOUNT_INACTIVE.to_string()));
        }
        if !verify_password(input.password, user.password.clone()).await? {
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let now = Utc::now();
        let max_devices = self.settings.max_devices_per_user;
        let device_id = users
            .modify(&user.id, |stored| {
                record_device_login(stored, user_agent, ip_address, now, max_devices)
            })?
            .ok_or_else(|| ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let issued = self
            .tokens
            .issue(&user.id, &user.email, &user.username, &device_id, now)?;

        sessions.create(&StoredSession {
            id: String::new(),
            user_id: user.id.clone(),
            device_id: device_id.clone(),
            token: issued.token.clone(),
            expires_at: issued.expires_at,
            created_at: now,
            updated_at: now,
        })?;

        let user = users
            .get(&user.id)?
            .ok_or_else(|| ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        info!(user_id = %user.id, device_id = %device_id, "User logged in");
        Ok(LoginOutcome {
            access_token: issued.token,
            user,
            device_id,
        })
    }

    /// Deactivate a device and drop its sessions.
    pub async fn logout(&self, user_id: &str, device_id: &str) -> Result<MessageResponse, ServiceError> {
        self.try_logout(user_id, device_id)
            .map_err(|e| e.or_bad_request("Logout failed", LOGOUT_FAILED))
    }

    fn try_logout(&self, user_id: &str, device_id: &str) -> Result<MessageResponse, ServiceError> {
        let users = UserRepository::new(&self.db);
        let sessions = SessionRepository::new(&self.db);

        users
            .modify(user_id, |user| {
                let device = user
                    .devices
                    .iter_mut()
                    .find(|device| device.id == device_id)
                    .ok_or_else(|| ServiceError::BadRequest(DEVICE_NOT_FOUND.to_string()))?;
                device.is_active = false;
                Ok::<_, ServiceError>(())
            })?
            .ok_or_else(|| ServiceError::Unauthorized(USER_NOT_FOUND.to_string()))?;

        let removed = sessions.delete_by_device(user_id, device_id)?;

        info!(user_id, device_id, sessions = removed, "User logged out");
        Ok(MessageResponse {
            message: LOGOUT_SUCCESS.to_string(),
        })
    }

    /// Raw stored user, hash included.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<StoredUser>, ServiceError> {
        UserRepository::new(&self.db)
            .get(user_id)
            .map_err(|e| ServiceError::from(e).or_bad_request("User lookup failed", GET_USER_FAILED))
    }
}

/// Register a login from `user_agent` on the user's device list.
///
/// An active device with the same user-agent is refreshed in place.
/// Otherwise a new active device is appended, unless `max_devices` are
/// already active. Returns the ID of the device used.
pub fn record_device_login(
    user: &mut StoredUser,
    user_agent: &str,
    ip_address: &str,
    now: DateTime<Utc>,
    max_devices: usize,
) -> Result<String, ServiceError> {
    if let Some(device) = user
        .devices
        .iter_mut()
        .find(|device| device.is_active && device.user_agent == user_agent)
    {
        device.last_login_at = now;
        device.user_agent = user_agent.to_string();
        device.ip_address = ip_address.to_string();
        return Ok(device.id.clone());
    }

    if user.active_device_count() >= max_devices {
        return Err(ServiceError::Forbidden(device_limit_message(max_devices)));
    }

    let device = Device {
        id: Uuid::new_v4().to_string(),
        name: extract_device_name(user_agent).to_string(),
        user_agent: user_agent.to_string(),
        ip_address: ip_address.to_string(),
        last_login_at: now,
        is_active: true,
    };
    let device_id = device.id.clone();
    user.devices.push(device);
    Ok(device_id)
}
