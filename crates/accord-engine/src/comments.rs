//! Threaded comments on versions
//!
//! Replies are one level deep: a reply's parent must be a root comment.

use crate::engine::ContractEngine;
use crate::records::CommentRecord;
use crate::state::CommentRow;
use accord_core::{AccordError, CommentId, ContractId, Result, UserId, VersionId};
use chrono::Utc;

impl ContractEngine {
    /// Attach a comment (or a one-level reply) to a version
    pub async fn add_comment(
        &self,
        user: UserId,
        contract: ContractId,
        version: VersionId,
        body: &str,
        parent_comment_id: Option<CommentId>,
    ) -> Result<CommentRecord> {
        if body.trim().is_empty() {
            return Err(AccordError::invalid("Comment required"));
        }
        if body.len() > self.config.max_comment_length {
            return Err(AccordError::invalid("Comment too long"));
        }

        let mut state = self.state.write().await;
        state
            .accessible_contract(user, contract)
            .ok_or_else(|| AccordError::not_found("Contract not found"))?;
        state
            .version_in_contract(contract, version)
            .ok_or_else(|| AccordError::not_found("Version not found"))?;

        if let Some(parent_id) = parent_comment_id {
            let parent = state
                .comments
                .iter()
                .find(|c| c.id == parent_id && c.version_id == version)
                .ok_or_else(|| AccordError::not_found("Parent comment not found"))?;
            if parent.parent_comment_id.is_some() {
                return Err(AccordError::invalid("Replies cannot be nested further"));
            }
        }

        let row = CommentRow {
            id: CommentId::new(),
            version_id: version,
            user_id: user,
            body: body.to_string(),
            parent_comment_id,
            created_at: Utc::now(),
        };
        let record = CommentRecord {
            id: row.id,
            version_id: row.version_id,
            user_id: row.user_id,
            user_name: state.display_name(user),
            body: row.body.clone(),
            parent_comment_id: row.parent_comment_id,
            created_at: row.created_at,
        };
        state.comments.push(row);
        Ok(record)
    }

    /// Comments on a version in creation order
    pub async fn list_comments(
        &self,
        user: UserId,
        contract: ContractId,
        version: VersionId,
    ) -> Result<Vec<CommentRecord>> {
        let state = self.state.read().await;
        state
            .accessible_contract(user, contract)
            .ok_or_else(|| AccordError::not_found("Contract not found"))?;
        state
            .version_in_contract(contract, version)
            .ok_or_else(|| AccordError::not_found("Version not found"))?;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.version_id == version)
            .map(|c| CommentRecord {
                id: c.id,
                version_id: c.version_id,
                user_id: c.user_id,
                user_name: state.display_name(c.user_id),
                body: c.body.clone(),
                parent_comment_id: c.parent_comment_id,
                created_at: c.created_at,
            })
            .collect())
    }
}
