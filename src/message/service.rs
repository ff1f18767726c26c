use async_trait::async_trait;
use log::debug;

use crate::pagination::Page;
use crate::{auth, thread};

use super::model::{MessageDto, NewMessageParams};
use super::{Id, Repository};

#[async_trait]
pub trait MessageService {
    async fn list_for_thread(
        &self,
        auth_user: &auth::User,
        thread_id: &thread::Id,
        page: &Page,
    ) -> super::Result<Vec<MessageDto>>;

    async fn create(
        &self,
        sender: &auth::User,
        params: &NewMessageParams,
    ) -> super::Result<MessageDto>;

    async fn mark_as_read(&self, id: &Id) -> super::Result<MessageDto>;

    async fn unread_count(&self, auth_user: &auth::User) -> super::Result<i64>;
}

#[derive(Clone)]
pub struct MessageServiceImpl {
    repo: Repository,
}

impl MessageServiceImpl {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl MessageService for MessageServiceImpl {
    async fn list_for_thread(
        &self,
        auth_user: &auth::User,
        thread_id: &thread::Id,
        page: &Page,
    ) -> super::Result<Vec<MessageDto>> {
        let page = page.validate()?;

        let messages = self
            .repo
            .find_by_thread_for_participant(thread_id, auth_user.id(), &page)?;

        Ok(messages.into_iter().map(MessageDto::from).collect())
    }

    async fn create(
        &self,
        sender: &auth::User,
        params: &NewMessageParams,
    ) -> super::Result<MessageDto> {
        let message = params.validate(sender.id())?;

        let message = self.repo.insert(&message)?;
        debug!("Message {} added to thread {}", message.id(), message.thread_id());

        Ok(message.into())
    }

    async fn mark_as_read(&self, id: &Id) -> super::Result<MessageDto> {
        self.repo.mark_as_read(id).map(MessageDto::from)
    }

    async fn unread_count(&self, auth_user: &auth::User) -> super::Result<i64> {
        self.repo.count_unread(auth_user.id())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::integration::memory::MemoryStore;
    use crate::message::Error;
    use crate::thread::model::NewThreadParams;
    use crate::thread::service::{ThreadService, ThreadServiceImpl};
    use crate::user;

    use super::*;

    struct Fixture {
        store: MemoryStore,
        threads: ThreadServiceImpl,
        messages: MessageServiceImpl,
    }

    impl Fixture {
        fn new() -> Self {
            let store = MemoryStore::default();
            Self {
                threads: ThreadServiceImpl::new(Arc::new(store.clone())),
                messages: MessageServiceImpl::new(Arc::new(store.clone())),
                store,
            }
        }

        async fn open(&self, from: &auth::User, to: &auth::User) -> thread::Id {
            *self
                .threads
                .get_or_create(from, &NewThreadParams::new([*to.id()]))
                .await
                .unwrap()
                .id()
        }

        async fn send(&self, from: &auth::User, thread_id: thread::Id, text: &str) -> MessageDto {
            self.messages
                .create(from, &NewMessageParams::new(thread_id, text))
                .await
                .unwrap()
        }
    }

    fn member() -> auth::User {
        auth::User::new(user::Id::random(), false)
    }

    #[tokio::test]
    async fn should_walk_through_conversation() {
        let f = Fixture::new();
        let (jora, valera) = (member(), member());
        let thread_id = f.open(&jora, &valera).await;

        let message = f.send(&jora, thread_id, "hi").await;
        assert!(!message.is_read());
        assert_eq!(f.messages.unread_count(&valera).await.unwrap(), 1);

        let read = f.messages.mark_as_read(message.id()).await.unwrap();
        assert!(read.is_read());
        assert_eq!(f.messages.unread_count(&valera).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn should_exclude_own_messages_from_unread_count() {
        let f = Fixture::new();
        let (jora, valera) = (member(), member());
        let thread_id = f.open(&jora, &valera).await;

        f.send(&jora, thread_id, "one").await;
        f.send(&jora, thread_id, "two").await;
        f.send(&valera, thread_id, "three").await;

        assert_eq!(f.messages.unread_count(&jora).await.unwrap(), 1);
        assert_eq!(f.messages.unread_count(&valera).await.unwrap(), 2);
        assert_eq!(f.messages.unread_count(&member()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn should_mark_as_read_idempotently() {
        let f = Fixture::new();
        let (jora, valera) = (member(), member());
        let thread_id = f.open(&jora, &valera).await;
        let message = f.send(&jora, thread_id, "hi").await;

        let first = f.messages.mark_as_read(message.id()).await.unwrap();
        let second = f.messages.mark_as_read(message.id()).await.unwrap();

        assert!(first.is_read());
        assert!(second.is_read());
        assert_eq!(f.messages.unread_count(&valera).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn should_report_unknown_message_on_read() {
        let f = Fixture::new();

        let res = f.messages.mark_as_read(&Id::random()).await;

        assert!(matches!(res, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn should_reject_message_from_stranger() {
        let f = Fixture::new();
        let (jora, valera) = (member(), member());
        let thread_id = f.open(&jora, &valera).await;

        let res = f
            .messages
            .create(&member(), &NewMessageParams::new(thread_id, "let me in"))
            .await;

        assert!(matches!(res, Err(Error::NotParticipant)));
        assert_eq!(f.store.message_count(), 0);
    }

    #[tokio::test]
    async fn should_reject_message_to_missing_thread() {
        let f = Fixture::new();

        let res = f
            .messages
            .create(&member(), &NewMessageParams::new(thread::Id::random(), "hello?"))
            .await;

        assert!(matches!(res, Err(Error::NotParticipant)));
    }

    #[tokio::test]
    async fn should_reject_blank_message() {
        let f = Fixture::new();
        let (jora, valera) = (member(), member());
        let thread_id = f.open(&jora, &valera).await;

        let res = f
            .messages
            .create(&jora, &NewMessageParams::new(thread_id, "  "))
            .await;

        assert!(matches!(res, Err(Error::EmptyText)));
        assert_eq!(f.store.message_count(), 0);
    }

    #[tokio::test]
    async fn should_list_messages_in_creation_order() {
        let f = Fixture::new();
        let (jora, valera) = (member(), member());
        let thread_id = f.open(&jora, &valera).await;
        for text in ["one", "two", "three"] {
            f.send(&jora, thread_id, text).await;
        }

        let all = f
            .messages
            .list_for_thread(&valera, &thread_id, &Page::default())
            .await
            .unwrap();
        let tail = f
            .messages
            .list_for_thread(&valera, &thread_id, &Page::new(Some(5), Some(1)))
            .await
            .unwrap();

        let texts = all.iter().map(MessageDto::text).collect::<Vec<_>>();
        assert_eq!(texts, ["one", "two", "three"]);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].text(), "two");
    }

    #[tokio::test]
    async fn should_list_nothing_for_stranger() {
        let f = Fixture::new();
        let (jora, valera) = (member(), member());
        let thread_id = f.open(&jora, &valera).await;
        f.send(&jora, thread_id, "secret").await;

        let messages = f
            .messages
            .list_for_thread(&member(), &thread_id, &Page::default())
            .await
            .unwrap();

        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn should_bump_thread_activity_on_new_message() {
        let f = Fixture::new();
        let (jora, valera, radu) = (member(), member(), member());
        let older = f.open(&jora, &valera).await;
        let newer = f.open(&jora, &radu).await;

        let message = f.send(&valera, older, "ping").await;

        let threads = f
            .threads
            .list_for_user(Some(&jora), None, &Page::default())
            .await
            .unwrap();
        assert_eq!(threads[0].id(), &older);
        assert_eq!(threads[1].id(), &newer);
        assert_eq!(threads[0].updated_at(), &f.store.message_created_at(message.id()));
    }
}
