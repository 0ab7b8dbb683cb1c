//! Contact-form message repository.

use plantara_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use super::fetch_page;
use crate::entities::messages;

/// Input for a contact-form submission.
#[derive(Debug, Clone)]
pub struct CreateMessageInput {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Sender phone.
    pub phone: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Message text.
    pub body: String,
}

/// Message repository.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    db: DatabaseConnection,
}

impl MessageRepository {
    /// Creates a new message repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a submission as unread.
    pub async fn create(&self, input: CreateMessageInput) -> Result<messages::Model, DbErr> {
        let message = messages::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            subject: Set(input.subject),
            body: Set(input.body),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };
        message.insert(&self.db).await
    }

    /// Lists messages, newest first.
    pub async fn list(
        &self,
        unread_only: bool,
        page: &PageRequest,
    ) -> Result<PageResponse<messages::Model>, DbErr> {
        let mut query = messages::Entity::find().order_by_desc(messages::Column::CreatedAt);
        if unread_only {
            query = query.filter(messages::Column::IsRead.eq(false));
        }
        fetch_page(&self.db, query, page).await
    }

    /// Marks a message as read. Returns `None` for an unknown ID.
    pub async fn mark_read(&self, id: Uuid) -> Result<Option<messages::Model>, DbErr> {
        let Some(message) = messages::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        if message.is_read {
            return Ok(Some(message));
        }

        let mut active: messages::ActiveModel = message.into();
        active.is_read = Set(true);
        active.update(&self.db).await.map(Some)
    }

    /// Deletes a message. Returns false if it did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = messages::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
