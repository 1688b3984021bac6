//! Collection iteration
//!
//! Walks a paginated collection one page at a time. A collection GET with
//! `page` and `per_page` parameters answers with
//! `{"results": [...], "pages": N, "total": N}`.
//!
//! The sequences returned here are lazy [`Stream`]s. Pages are fetched
//! strictly one after another and only when the consumer asks for more.
//! Dropping a stream part-way leaves nothing to clean up, and calling the
//! same method again starts over from the first page.
//!
//! Every fetch is checked: a failed page surfaces as an `Err` item and ends
//! the stream. Only [`Resource::while_results`] stops quietly, on an empty
//! page.

mod page;

pub use page::Page;

use crate::error::{Error, Result};
use crate::resource::Resource;
use crate::response::Response;
use crate::types::Record;
use futures::stream::{self, Stream, TryStreamExt};
use tracing::{debug, warn};

/// Query parameter selecting the page number
pub const PAGE_PARAM: &str = "page";

/// Query parameter selecting the page size
pub const PER_PAGE_PARAM: &str = "per_page";

/// Cursor state of one running page walk
#[derive(Debug)]
struct PageCursor {
    resource: Resource,
    page: u64,
    total_pages: Option<u64>,
}

impl PageCursor {
    fn new(resource: Resource) -> Self {
        Self {
            resource,
            page: 1,
            total_pages: None,
        }
    }

    fn is_exhausted(&self) -> bool {
        matches!(self.total_pages, Some(total) if self.page > total)
    }
}

impl Resource {
    /// Lazily fetch every page of the collection, as responses.
    ///
    /// The page count is read from the first page and not re-read. A first
    /// page without a `pages` field is treated as the only page; a page
    /// whose `results` or `pages` cannot be read fails with `MissingField`.
    /// A caller-set `per_page` wins over the client default.
    pub fn each_page(&self) -> impl Stream<Item = Result<Response>> + Send + 'static {
        let start = self.with_default_per_page();

        stream::try_unfold(PageCursor::new(start), |mut cursor| async move {
            if cursor.is_exhausted() {
                return Ok(None);
            }

            let response = cursor
                .resource
                .query([(PAGE_PARAM, cursor.page)])
                .get_checked()
                .await?;

            if cursor.total_pages.is_none() {
                let total = match response.page()?.pages {
                    Some(total) => total,
                    None => {
                        warn!(
                            "No 'pages' field in first page of {}, assuming a single page",
                            cursor.resource
                        );
                        1
                    }
                };
                debug!("{} has {} page(s)", cursor.resource, total);
                cursor.total_pages = Some(total);
            }

            cursor.page += 1;
            Ok::<_, Error>(Some((response, cursor)))
        })
    }

    /// Lazily yield every record of every page, in page order
    pub fn each(&self) -> impl Stream<Item = Result<Record>> + Send + 'static {
        self.each_page()
            .and_then(|response| async move {
                let results = response.page()?.results;
                Ok::<_, Error>(stream::iter(results.into_iter().map(Ok::<Record, Error>)))
            })
            .try_flatten()
    }

    /// Repeatedly GET this exact resource, yielding each batch of results,
    /// until a fetch returns no results.
    ///
    /// No page parameter is sent; the endpoint is expected to advance on its
    /// own, like a queue. A page with empty or absent `results` ends the
    /// stream quietly; a failed fetch is an error.
    pub fn while_results(&self) -> impl Stream<Item = Result<Record>> + Send + 'static {
        stream::try_unfold(self.clone(), |resource| async move {
            let response = resource.get_checked().await?;
            let results = Page::from_body(response.body()?).results;
            if results.is_empty() {
                debug!("{} returned no results, stopping", resource);
                return Ok(None);
            }
            let batch = stream::iter(results.into_iter().map(Ok::<Record, Error>));
            Ok::<_, Error>(Some((batch, resource)))
        })
        .try_flatten()
    }

    /// Total number of records, from the `total` field of a one-record page.
    ///
    /// Issues exactly one request.
    pub async fn count(&self) -> Result<u64> {
        self.single_record_page()
            .await?
            .total
            .ok_or_else(|| Error::missing_field("total"))
    }

    /// The first record of the collection; fails with `EmptyCollection` if
    /// there is none
    pub async fn first(&self) -> Result<Record> {
        self.single_record_page()
            .await?
            .results
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmptyCollection {
                uri: self.uri().to_string(),
            })
    }

    /// True if the collection has no records
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.count().await? == 0)
    }

    /// Fetch every page eagerly
    pub async fn pages(&self) -> Result<Vec<Response>> {
        self.each_page().try_collect().await
    }

    /// Fetch every record eagerly
    pub async fn records(&self) -> Result<Vec<Record>> {
        self.each().try_collect().await
    }

    async fn single_record_page(&self) -> Result<Page> {
        self.query([(PAGE_PARAM, 1), (PER_PAGE_PARAM, 1)])
            .get_checked()
            .await?
            .page()
    }

    fn with_default_per_page(&self) -> Resource {
        if self.query_values().contains_key(PER_PAGE_PARAM) {
            self.clone()
        } else {
            self.query([(PER_PAGE_PARAM, self.client().config().per_page)])
        }
    }
}

#[cfg(test)]
mod tests;
