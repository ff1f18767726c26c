use async_trait::async_trait;
use log::debug;

use crate::pagination::Page;
use crate::{auth, user};

use super::model::{NewThreadParams, ThreadDto};
use super::{Id, Repository};

#[async_trait]
pub trait ThreadService {
    /// Lists threads visible to the caller. Anonymous callers get nothing,
    /// members get their own threads, staff may look at anyone's.
    async fn list_for_user(
        &self,
        auth_user: Option<&auth::User>,
        target: Option<&user::Id>,
        page: &Page,
    ) -> super::Result<Vec<ThreadDto>>;

    async fn find_by_id(&self, auth_user: &auth::User, id: &Id) -> super::Result<ThreadDto>;

    async fn get_or_create(
        &self,
        auth_user: &auth::User,
        params: &NewThreadParams,
    ) -> super::Result<ThreadDto>;

    async fn delete(&self, auth_user: &auth::User, id: &Id) -> super::Result<()>;
}

#[derive(Clone)]
pub struct ThreadServiceImpl {
    repo: Repository,
}

impl ThreadServiceImpl {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ThreadService for ThreadServiceImpl {
    async fn list_for_user(
        &self,
        auth_user: Option<&auth::User>,
        target: Option<&user::Id>,
        page: &Page,
    ) -> super::Result<Vec<ThreadDto>> {
        let Some(auth_user) = auth_user else {
            return Ok(vec![]);
        };

        let page = page.validate()?;

        match (auth_user.is_staff(), target) {
            (true, Some(target)) => self.repo.find_by_participant(target, &page),
            (true, None) => self.repo.find_all(&page),
            (false, _) => self.repo.find_by_participant(auth_user.id(), &page),
        }
    }

    async fn find_by_id(&self, auth_user: &auth::User, id: &Id) -> super::Result<ThreadDto> {
        let thread = self.repo.find_by_id(id)?;

        if auth_user.is_staff() || thread.has_participant(auth_user.id()) {
            Ok(thread)
        } else {
            Err(super::Error::NotFound(*id))
        }
    }

    async fn get_or_create(
        &self,
        auth_user: &auth::User,
        params: &NewThreadParams,
    ) -> super::Result<ThreadDto> {
        let participants = params.validate(auth_user.id())?;

        let existing = self
            .repo
            .find_by_any_participant(participants.members())?
            .into_iter()
            .find(|t| participants.matches(t.participants()));

        if let Some(thread) = existing {
            debug!("Reusing thread {} for {}", thread.id(), participants.key());
            return Ok(thread);
        }

        self.repo.insert(&participants)
    }

    async fn delete(&self, auth_user: &auth::User, id: &Id) -> super::Result<()> {
        let thread = self.repo.find_by_id(id)?;

        if !auth_user.is_staff() && !thread.has_participant(auth_user.id()) {
            return Err(super::Error::Forbidden);
        }

        if self.repo.delete(id)? {
            Ok(())
        } else {
            Err(super::Error::NotFound(*id))
        }
    }
}
