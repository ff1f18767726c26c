use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::message::model::{Message, NewMessage};
use crate::message::repository::MessageRepository;
use crate::pagination::Page;
use crate::thread::model::{NewThread, Participant, Participants, Thread, ThreadDto};
use crate::thread::repository::ThreadRepository;
use crate::{message, thread, user};

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Store>>,
}

#[derive(Default)]
struct Store {
    threads: Vec<Thread>,
    participants: Vec<Participant>,
    messages: Vec<Message>,
}

impl Store {
    fn is_participant(&self, thread_id: &thread::Id, user_id: &user::Id) -> bool {
        self.participants
            .iter()
            .any(|p| p.thread_id() == thread_id && p.user_id() == user_id)
    }

    fn dto(&self, thread: &Thread) -> ThreadDto {
        let participants = self
            .participants
            .iter()
            .filter(|p| p.thread_id() == thread.id())
            .cloned()
            .collect();
        ThreadDto::new(thread.clone(), participants)
    }

    fn threads_where(&self, f: impl Fn(&Thread) -> bool, page: &Page) -> Vec<ThreadDto> {
        let mut threads = self.threads.iter().filter(|&t| f(t)).collect::<Vec<_>>();
        threads.sort_by(|a, b| {
            b.updated_at()
                .cmp(a.updated_at())
                .then_with(|| a.id().cmp(b.id()))
        });

        page.slice(threads)
            .into_iter()
            .map(|t| self.dto(t))
            .collect()
    }
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.inner.lock().unwrap()
    }

    pub fn thread_count(&self) -> usize {
        self.lock().threads.len()
    }

    pub fn message_count(&self) -> usize {
        self.lock().messages.len()
    }

    pub fn push_message(&self, thread_id: &thread::Id, sender: &user::Id, text: &str) -> Message {
        MessageRepository::insert(self, &NewMessage::new(*thread_id, *sender, text)).unwrap()
    }

    pub fn message_created_at(&self, id: &message::Id) -> DateTime<Utc> {
        *self
            .lock()
            .messages
            .iter()
            .find(|m| m.id() == id)
            .unwrap()
            .created_at()
    }
}

impl ThreadRepository for MemoryStore {
    fn find_all(&self, page: &Page) -> thread::Result<Vec<ThreadDto>> {
        Ok(self.lock().threads_where(|_| true, page))
    }

    fn find_by_participant(
        &self,
        user_id: &user::Id,
        page: &Page,
    ) -> thread::Result<Vec<ThreadDto>> {
        let store = self.lock();
        Ok(store.threads_where(|t| store.is_participant(t.id(), user_id), page))
    }

    fn find_by_id(&self, id: &thread::Id) -> thread::Result<ThreadDto> {
        let store = self.lock();
        store
            .threads
            .iter()
            .find(|t| t.id() == id)
            .map(|t| store.dto(t))
            .ok_or(thread::Error::NotFound(*id))
    }

    fn find_by_any_participant(&self, user_ids: &[user::Id]) -> thread::Result<Vec<ThreadDto>> {
        let store = self.lock();
        Ok(store.threads_where(
            |t| user_ids.iter().any(|u| store.is_participant(t.id(), u)),
            &Page::default(),
        ))
    }

    fn insert(&self, participants: &Participants) -> thread::Result<ThreadDto> {
        let mut store = self.lock();

        let key = participants.key();
        if let Some(existing) = store.threads.iter().find(|t| t.participants_key() == key) {
            return Ok(store.dto(existing));
        }

        let thread = Thread::from(NewThread::new(participants));
        for user_id in participants.members() {
            store
                .participants
                .push(Participant::new(*thread.id(), *user_id));
        }
        store.threads.push(thread.clone());

        Ok(store.dto(&thread))
    }

    fn delete(&self, id: &thread::Id) -> thread::Result<bool> {
        let mut store = self.lock();

        store.messages.retain(|m| m.thread_id() != id);
        store.participants.retain(|p| p.thread_id() != id);
        let before = store.threads.len();
        store.threads.retain(|t| t.id() != id);

        Ok(store.threads.len() < before)
    }
}

impl MessageRepository for MemoryStore {
    fn find_by_thread_for_participant(
        &self,
        thread_id: &thread::Id,
        user_id: &user::Id,
        page: &Page,
    ) -> message::Result<Vec<Message>> {
        let store = self.lock();
        if !store.is_participant(thread_id, user_id) {
            return Ok(vec![]);
        }

        let mut messages = store
            .messages
            .iter()
            .filter(|m| m.thread_id() == thread_id)
            .cloned()
            .collect::<Vec<_>>();
        messages.sort_by(|a, b| a.created_at().cmp(b.created_at()));

        Ok(page.slice(messages))
    }

    fn insert(&self, message: &NewMessage) -> message::Result<Message> {
        let mut store = self.lock();
        if !store.is_participant(message.thread_id(), message.sender_id()) {
            return Err(message::Error::NotParticipant);
        }

        let thread = store
            .threads
            .iter_mut()
            .find(|t| t.id() == message.thread_id())
            .ok_or(message::Error::NotParticipant)?;
        *thread = thread.with_updated_at(*message.created_at());

        let message = Message::from(message.clone());
        store.messages.push(message.clone());

        Ok(message)
    }

    fn mark_as_read(&self, id: &message::Id) -> message::Result<Message> {
        let mut store = self.lock();

        let message = store
            .messages
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(message::Error::NotFound(*id))?;
        *message = message.as_read();

        Ok(message.clone())
    }

    fn count_unread(&self, user_id: &user::Id) -> message::Result<i64> {
        let store = self.lock();

        let count = store
            .messages
            .iter()
            .filter(|m| !m.is_read() && m.sender_id() != user_id)
            .filter(|m| store.is_participant(m.thread_id(), user_id))
            .count();

        Ok(count as i64)
    }
}
