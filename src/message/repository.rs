use diesel::Connection;
use diesel::ExpressionMethods;
use diesel::OptionalExtension;
use diesel::QueryDsl;
use diesel::RunQueryDsl;
use diesel::SelectableHelper;
use diesel::dsl::exists;

use crate::integration::db::Pool;
use crate::pagination::Page;
use crate::schema::{messages, thread_participants, threads};
use crate::{thread, user};

use super::Id;
use super::model::{Message, NewMessage};

pub trait MessageRepository {
    /// Messages of the thread in creation order, or nothing when the user
    /// does not participate in it.
    fn find_by_thread_for_participant(
        &self,
        thread_id: &thread::Id,
        user_id: &user::Id,
        page: &Page,
    ) -> super::Result<Vec<Message>>;

    /// Stores the message and bumps the thread's `updated_at`.
    fn insert(&self, message: &NewMessage) -> super::Result<Message>;

    fn mark_as_read(&self, id: &Id) -> super::Result<Message>;

    fn count_unread(&self, user_id: &user::Id) -> super::Result<i64>;
}

pub struct PgMessageRepository {
    pool: Pool,
}

impl PgMessageRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

impl MessageRepository for PgMessageRepository {
    fn find_by_thread_for_participant(
        &self,
        thread_id: &thread::Id,
        user_id: &user::Id,
        page: &Page,
    ) -> super::Result<Vec<Message>> {
        let mut conn = self.pool.get()?;

        let mut query = messages::table
            .filter(messages::thread_id.eq(thread_id))
            .filter(exists(
                thread_participants::table
                    .filter(thread_participants::thread_id.eq(thread_id))
                    .filter(thread_participants::user_id.eq(user_id)),
            ))
            .select(Message::as_select())
            .order((messages::created_at.asc(), messages::id.asc()))
            .into_boxed();
        if let Some(limit) = page.limit() {
            query = query.limit(limit);
        }
        if let Some(offset) = page.offset() {
            query = query.offset(offset);
        }

        query.load(&mut conn).map_err(super::Error::from)
    }

    fn insert(&self, message: &NewMessage) -> super::Result<Message> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, super::Error, _>(|conn| {
            let is_participant = diesel::select(exists(
                thread_participants::table
                    .filter(thread_participants::thread_id.eq(message.thread_id()))
                    .filter(thread_participants::user_id.eq(message.sender_id())),
            ))
            .get_result::<bool>(conn)?;

            if !is_participant {
                return Err(super::Error::NotParticipant);
            }

            let touched = diesel::update(threads::table.find(message.thread_id()))
                .set(threads::updated_at.eq(*message.created_at()))
                .execute(conn)?;
            if touched == 0 {
                return Err(super::Error::NotParticipant);
            }

            diesel::insert_into(messages::table)
                .values(message)
                .returning(Message::as_returning())
                .get_result(conn)
                .map_err(super::Error::from)
        })
    }

    fn mark_as_read(&self, id: &Id) -> super::Result<Message> {
        let mut conn = self.pool.get()?;

        diesel::update(messages::table.find(id))
            .set(messages::is_read.eq(true))
            .returning(Message::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or(super::Error::NotFound(*id))
    }

    fn count_unread(&self, user_id: &user::Id) -> super::Result<i64> {
        let mut conn = self.pool.get()?;

        messages::table
            .filter(
                messages::thread_id.eq_any(
                    thread_participants::table
                        .filter(thread_participants::user_id.eq(user_id))
                        .select(thread_participants::thread_id),
                ),
            )
            .filter(messages::is_read.eq(false))
            .filter(messages::sender_id.ne(user_id))
            .count()
            .get_result(&mut conn)
            .map_err(super::Error::from)
    }
}
