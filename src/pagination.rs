use serde::Deserialize;

pub const MAX_LIMIT: i64 = 100;

/// Limit/offset window over an ordered listing.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Page {
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Page {
    pub const fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    pub fn validate(&self) -> Result<Self, Error> {
        if self.limit.is_some_and(|l| l < 0) {
            return Err(Error::Negative("limit"));
        }
        if self.offset.is_some_and(|o| o < 0) {
            return Err(Error::Negative("offset"));
        }

        Ok(Self {
            limit: self.limit.map(|l| l.min(MAX_LIMIT)),
            offset: self.offset,
        })
    }

    pub const fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub const fn offset(&self) -> Option<i64> {
        self.offset
    }

    /// Applies the window to an already ordered in-memory sequence.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = self.offset.unwrap_or(0) as usize;
        let iter = items.into_iter().skip(offset);
        match self.limit {
            Some(limit) => iter.take(limit as usize).collect(),
            None => iter.collect(),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("{0} must not be negative")]
    Negative(&'static str),
}
