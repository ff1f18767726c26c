use chrono::{DateTime, Utc};
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::{thread, user};

use super::Id;

#[derive(Queryable, Selectable, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Message {
    id: Id,
    thread_id: thread::Id,
    sender_id: user::Id,
    text: String,
    created_at: DateTime<Utc>,
    is_read: bool,
}

impl Message {
    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub const fn thread_id(&self) -> &thread::Id {
        &self.thread_id
    }

    pub const fn sender_id(&self) -> &user::Id {
        &self.sender_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    pub fn as_read(&self) -> Self {
        Self {
            is_read: true,
            ..self.clone()
        }
    }
}

impl From<NewMessage> for Message {
    fn from(m: NewMessage) -> Self {
        Self {
            id: m.id,
            thread_id: m.thread_id,
            sender_id: m.sender_id,
            text: m.text,
            created_at: m.created_at,
            is_read: false,
        }
    }
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = crate::schema::messages)]
pub struct NewMessage {
    id: Id,
    thread_id: thread::Id,
    sender_id: user::Id,
    text: String,
    created_at: DateTime<Utc>,
}

impl NewMessage {
    pub fn new(thread_id: thread::Id, sender_id: user::Id, text: &str) -> Self {
        Self {
            id: Id::random(),
            thread_id,
            sender_id,
            text: text.to_owned(),
            created_at: Utc::now(),
        }
    }

    pub const fn thread_id(&self) -> &thread::Id {
        &self.thread_id
    }

    pub const fn sender_id(&self) -> &user::Id {
        &self.sender_id
    }

    pub const fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct NewMessageParams {
    thread_id: thread::Id,
    text: String,
}

impl NewMessageParams {
    pub fn new(thread_id: thread::Id, text: &str) -> Self {
        Self {
            thread_id,
            text: text.to_owned(),
        }
    }

    pub fn validate(&self, sender: &user::Id) -> super::Result<NewMessage> {
        if self.text.trim().is_empty() {
            return Err(super::Error::EmptyText);
        }

        Ok(NewMessage::new(self.thread_id, *sender, &self.text))
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct MessageDto {
    id: Id,
    thread_id: thread::Id,
    sender_id: user::Id,
    text: String,
    created_at: DateTime<Utc>,
    is_read: bool,
}

impl MessageDto {
    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    pub const fn sender_id(&self) -> &user::Id {
        &self.sender_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<Message> for MessageDto {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            thread_id: m.thread_id,
            sender_id: m.sender_id,
            text: m.text,
            created_at: m.created_at,
            is_read: m.is_read,
        }
    }
}
