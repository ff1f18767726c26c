use std::collections::HashSet;

use chrono::{DateTime, Utc};
use diesel::prelude::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::user;

use super::Id;

#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::schema::threads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Thread {
    id: Id,
    participants_key: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Thread {
    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub fn participants_key(&self) -> &str {
        &self.participants_key
    }

    pub const fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub const fn updated_at(&self) -> &DateTime<Utc> {
        &self.updated_at
    }

    pub fn with_updated_at(&self, updated_at: DateTime<Utc>) -> Self {
        Self {
            updated_at,
            ..self.clone()
        }
    }
}

impl From<NewThread> for Thread {
    fn from(t: NewThread) -> Self {
        Self {
            id: t.id,
            participants_key: t.participants_key,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::threads)]
pub struct NewThread {
    id: Id,
    participants_key: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NewThread {
    pub fn new(participants: &Participants) -> Self {
        let now = Utc::now();
        Self {
            id: Id::random(),
            participants_key: participants.key(),
            created_at: now,
            updated_at: now,
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }
}

#[derive(Queryable, Selectable, Identifiable, Associations, Insertable, Clone, Debug)]
#[diesel(table_name = crate::schema::thread_participants)]
#[diesel(primary_key(thread_id, user_id))]
#[diesel(belongs_to(Thread))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Participant {
    thread_id: Id,
    user_id: user::Id,
}

impl Participant {
    pub const fn new(thread_id: Id, user_id: user::Id) -> Self {
        Self { thread_id, user_id }
    }

    pub const fn thread_id(&self) -> &Id {
        &self.thread_id
    }

    pub const fn user_id(&self) -> &user::Id {
        &self.user_id
    }
}

/// Validated participant pair, kept in ascending order so that both sides
/// of a conversation produce the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Participants([user::Id; 2]);

impl Participants {
    pub fn try_new(requester: &user::Id, others: &[user::Id]) -> super::Result<Self> {
        let mut candidates = HashSet::with_capacity(others.len() + 1);
        for id in others {
            if !candidates.insert(*id) {
                return Err(super::Error::DuplicateParticipant(*id));
            }
        }
        candidates.insert(*requester);

        let mut members = candidates.into_iter().collect::<Vec<_>>();
        members.sort();

        match members.as_slice() {
            [a, b] => Ok(Self([*a, *b])),
            m if m.len() > 2 => Err(super::Error::TooManyParticipants(m.len())),
            m => Err(super::Error::NotEnoughParticipants(m.len())),
        }
    }

    pub const fn members(&self) -> &[user::Id; 2] {
        &self.0
    }

    pub fn key(&self) -> String {
        format!("{}:{}", self.0[0], self.0[1])
    }

    /// Set equality against the participants of a stored thread.
    pub fn matches(&self, ids: &[user::Id]) -> bool {
        let ids = ids.iter().collect::<HashSet<_>>();
        ids.len() == self.0.len() && self.0.iter().all(|m| ids.contains(m))
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct NewThreadParams {
    participants: Vec<user::Id>,
}

impl NewThreadParams {
    pub fn new(participants: impl Into<Vec<user::Id>>) -> Self {
        Self {
            participants: participants.into(),
        }
    }

    /// Builds the candidate set `participants ∪ {requester}`.
    pub fn validate(&self, requester: &user::Id) -> super::Result<Participants> {
        Participants::try_new(requester, &self.participants)
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct ThreadDto {
    id: Id,
    participants: Vec<user::Id>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ThreadDto {
    pub fn new(thread: Thread, participants: Vec<Participant>) -> Self {
        let mut participants = participants
            .into_iter()
            .map(|p| p.user_id)
            .collect::<Vec<_>>();
        participants.sort();

        Self {
            id: thread.id,
            participants,
            created_at: thread.created_at,
            updated_at: thread.updated_at,
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub fn participants(&self) -> &[user::Id] {
        &self.participants
    }

    pub const fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub const fn updated_at(&self) -> &DateTime<Utc> {
        &self.updated_at
    }

    pub fn has_participant(&self, id: &user::Id) -> bool {
        self.participants.contains(id)
    }
}
