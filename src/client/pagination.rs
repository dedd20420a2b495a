//! Lazy traversal of paginated list endpoints

use std::collections::VecDeque;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{api::GitlabApi, error::Result};

/// One page of a list endpoint
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// URL of the following page, if any
    pub next: Option<Url>,
}

/// Forward-only sequence over every item of a list endpoint
///
/// Pages are requested one at a time, only once the items of the previous
/// page have been consumed. The sequence ends after the last page or after
/// the first error; restarting requires a new `Paginated`.
#[derive(Debug)]
pub struct Paginated<'a, T> {
    api: &'a GitlabApi,
    next_url: Option<Url>,
    buffer: VecDeque<T>,
    pages_fetched: u32,
}

impl<'a, T> Paginated<'a, T>
where
    T: DeserializeOwned,
{
    pub(super) fn new(api: &'a GitlabApi, first_page: Url) -> Self {
        Self {
            api,
            next_url: Some(first_page),
            buffer: VecDeque::new(),
            pages_fetched: 0,
        }
    }

    /// Next item, fetching the next page when the current one is exhausted
    pub async fn next_item(&mut self) -> Option<Result<T>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }

            let url = self.next_url.take()?;
            match self.api.get_page::<T>(url).await {
                Ok(page) => {
                    self.pages_fetched += 1;
                    debug!(
                        page = self.pages_fetched,
                        items = page.items.len(),
                        has_next = page.next.is_some(),
                        "Fetched page"
                    );
                    self.next_url = page.next;
                    self.buffer.extend(page.items);
                },
                Err(e) => return Some(Err(e)),
            }
        }
    }

    /// Drain the sequence, failing on the first error
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next_item().await {
            items.push(item?);
        }
        Ok(items)
    }

    /// Number of pages requested so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }
}
