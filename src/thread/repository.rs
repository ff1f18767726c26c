use diesel::BelongingToDsl;
use diesel::Connection;
use diesel::ExpressionMethods;
use diesel::GroupedBy;
use diesel::OptionalExtension;
use diesel::PgConnection;
use diesel::QueryDsl;
use diesel::RunQueryDsl;
use diesel::SelectableHelper;
use log::debug;

use crate::integration::db::Pool;
use crate::pagination::Page;
use crate::schema::{messages, thread_participants, threads};
use crate::user;

use super::Id;
use super::model::{NewThread, Participant, Participants, Thread, ThreadDto};

pub trait ThreadRepository {
    fn find_all(&self, page: &Page) -> super::Result<Vec<ThreadDto>>;

    fn find_by_participant(&self, user_id: &user::Id, page: &Page)
    -> super::Result<Vec<ThreadDto>>;

    fn find_by_id(&self, id: &Id) -> super::Result<ThreadDto>;

    /// Threads having at least one of the given users among participants.
    fn find_by_any_participant(&self, user_ids: &[user::Id]) -> super::Result<Vec<ThreadDto>>;

    /// Inserts a thread for the pair, or returns the one already stored
    /// under the same participants key.
    fn insert(&self, participants: &Participants) -> super::Result<ThreadDto>;

    /// Removes the thread together with its messages and participants.
    fn delete(&self, id: &Id) -> super::Result<bool>;
}

pub struct PgThreadRepository {
    pool: Pool,
}

impl PgThreadRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

impl ThreadRepository for PgThreadRepository {
    fn find_all(&self, page: &Page) -> super::Result<Vec<ThreadDto>> {
        let mut conn = self.pool.get()?;

        let mut query = threads::table
            .select(Thread::as_select())
            .order((threads::updated_at.desc(), threads::id.asc()))
            .into_boxed();
        if let Some(limit) = page.limit() {
            query = query.limit(limit);
        }
        if let Some(offset) = page.offset() {
            query = query.offset(offset);
        }

        let threads = query.load(&mut conn)?;
        with_participants(&mut conn, threads)
    }

    fn find_by_participant(
        &self,
        user_id: &user::Id,
        page: &Page,
    ) -> super::Result<Vec<ThreadDto>> {
        let mut conn = self.pool.get()?;

        let mut query = threads::table
            .inner_join(thread_participants::table)
            .filter(thread_participants::user_id.eq(user_id))
            .select(Thread::as_select())
            .order((threads::updated_at.desc(), threads::id.asc()))
            .into_boxed();
        if let Some(limit) = page.limit() {
            query = query.limit(limit);
        }
        if let Some(offset) = page.offset() {
            query = query.offset(offset);
        }

        let threads = query.load(&mut conn)?;
        with_participants(&mut conn, threads)
    }

    fn find_by_id(&self, id: &Id) -> super::Result<ThreadDto> {
        let mut conn = self.pool.get()?;

        let thread = threads::table
            .find(id)
            .select(Thread::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(super::Error::NotFound(*id))?;

        with_participants(&mut conn, vec![thread])?
            .pop()
            .ok_or(super::Error::NotFound(*id))
    }

    fn find_by_any_participant(&self, user_ids: &[user::Id]) -> super::Result<Vec<ThreadDto>> {
        let mut conn = self.pool.get()?;

        let threads = threads::table
            .filter(
                threads::id.eq_any(
                    thread_participants::table
                        .filter(thread_participants::user_id.eq_any(user_ids))
                        .select(thread_participants::thread_id),
                ),
            )
            .select(Thread::as_select())
            .load(&mut conn)?;

        with_participants(&mut conn, threads)
    }

    fn insert(&self, participants: &Participants) -> super::Result<ThreadDto> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, super::Error, _>(|conn| {
            let new_thread = NewThread::new(participants);
            let inserted = diesel::insert_into(threads::table)
                .values(&new_thread)
                .on_conflict(threads::participants_key)
                .do_nothing()
                .returning(Thread::as_returning())
                .get_result(conn)
                .optional()?;

            let thread = match inserted {
                Some(thread) => {
                    let rows = participants
                        .members()
                        .iter()
                        .map(|user_id| Participant::new(*thread.id(), *user_id))
                        .collect::<Vec<_>>();
                    diesel::insert_into(thread_participants::table)
                        .values(&rows)
                        .execute(conn)?;
                    thread
                }
                None => {
                    debug!(
                        "Thread for {} was created concurrently, reusing it",
                        participants.key()
                    );
                    threads::table
                        .filter(threads::participants_key.eq(participants.key()))
                        .select(Thread::as_select())
                        .first(conn)?
                }
            };

            let id = *thread.id();
            with_participants(conn, vec![thread])?
                .pop()
                .ok_or(super::Error::NotFound(id))
        })
    }

    fn delete(&self, id: &Id) -> super::Result<bool> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, super::Error, _>(|conn| {
            let messages = diesel::delete(messages::table.filter(messages::thread_id.eq(id)))
                .execute(conn)?;
            diesel::delete(thread_participants::table.filter(thread_participants::thread_id.eq(id)))
                .execute(conn)?;
            let deleted = diesel::delete(threads::table.find(id)).execute(conn)?;

            debug!("Deleted thread {id} with {messages} messages");
            Ok(deleted > 0)
        })
    }
}

fn with_participants(
    conn: &mut PgConnection,
    threads: Vec<Thread>,
) -> super::Result<Vec<ThreadDto>> {
    let participants = Participant::belonging_to(&threads)
        .select(Participant::as_select())
        .load::<Participant>(conn)?
        .grouped_by(&threads);

    Ok(threads
        .into_iter()
        .zip(participants)
        .map(|(t, p)| ThreadDto::new(t, p))
        .collect())
}
