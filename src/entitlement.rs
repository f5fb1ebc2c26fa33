// ABOUTME: Entitlement seam between the player services and the purchase store
// ABOUTME: Capability-style "does this caller hold entitlement X" fact
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::PurchasesManager;
use crate::errors::AppResult;

/// Source of the opaque entitlement fact consumed by the access evaluator
///
/// The engine never inspects payment internals; it only asks whether a user
/// holds an entitlement to a course. Production uses the purchases table;
/// tests substitute fixed answers.
#[async_trait]
pub trait EntitlementSource: Send + Sync {
    /// Whether `user_id` holds an active entitlement to `course_id`
    async fn has_entitlement(&self, user_id: Uuid, course_id: Uuid) -> AppResult<bool>;
}

#[async_trait]
impl EntitlementSource for PurchasesManager {
    async fn has_entitlement(&self, user_id: Uuid, course_id: Uuid) -> AppResult<bool> {
        PurchasesManager::has_entitlement(self, user_id, course_id).await
    }
}
