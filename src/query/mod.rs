//! Query orchestration.
//!
//! Coordinates one user action end to end:
//! 1. Normalize the clan tag
//! 2. Call the war statistics API
//! 3. Normalize the payload, compute derived metrics, rank
//! 4. Sort by the active column
//!
//! The controller owns the current tag, sort state and result set. The result
//! set is only replaced once a response has been fully processed.

pub mod link;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::calculate::{apply_derived_metrics, summarize, ClanSummary};
use crate::fetch::{FetchError, WarStatsApi};
use crate::models::{ClanTag, MemberRecord, SortKey, SortState};
use crate::normalize::{parse_payload, PayloadError};
use crate::rank::rank;
use crate::render::ResultView;
use crate::sort::apply_sort;

pub use link::{link_for, tag_from_link};

/// Errors surfaced to the user for a query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Please enter a clan tag")]
    EmptyInput,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl QueryError {
    /// Single user-facing message, optionally followed by a hint.
    pub fn user_message(&self, hint: Option<&str>) -> String {
        match (self, hint) {
            // No request is made for a blank tag.
            (QueryError::EmptyInput, _) | (_, None) => self.to_string(),
            (_, Some(hint)) => format!("{}. {}", self, hint),
        }
    }
}

/// Run a decoded response through normalization, metrics and ranking.
///
/// The result keeps the payload's member order.
pub fn process_response(data: Value) -> Result<Vec<MemberRecord>, PayloadError> {
    let mut records = parse_payload(data)?;
    apply_derived_metrics(&mut records);
    Ok(rank(records))
}

const UPDATE_REQUESTED: &str = "Update requested. Fetching latest data…";

/// Owns query state and drives the API.
pub struct QueryController {
    api: Arc<dyn WarStatsApi>,
    hint: Option<String>,
    tag: Option<ClanTag>,
    sort: SortState,
    ranked: Vec<MemberRecord>,
    error: Option<String>,
    info: Option<String>,
}

impl QueryController {
    /// Create a controller with an initial sort state.
    pub fn new(api: Arc<dyn WarStatsApi>, sort: SortState) -> Self {
        Self {
            api,
            hint: None,
            tag: None,
            sort,
            ranked: Vec::new(),
            error: None,
            info: None,
        }
    }

    /// Append `hint` to every error message.
    pub fn with_error_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Fetch and process recommendations for a user-supplied tag.
    ///
    /// A blank tag fails before any request and leaves the current results
    /// alone. Any other failure clears them.
    pub async fn fetch(&mut self, raw_tag: &str) -> Result<Vec<MemberRecord>, QueryError> {
        let tag = match ClanTag::normalize(raw_tag) {
            Some(tag) => tag,
            None => return Err(self.fail(QueryError::EmptyInput)),
        };

        self.info = None;
        self.fetch_tag(tag).await
    }

    async fn fetch_tag(&mut self, tag: ClanTag) -> Result<Vec<MemberRecord>, QueryError> {
        self.error = None;
        self.ranked.clear();

        match self.load(&tag).await {
            Ok(records) => {
                info!("Loaded {} members for {}", records.len(), tag);
                self.ranked = records;
                self.tag = Some(tag);
                Ok(self.sorted())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Ask the API to pull the latest war, then fetch again.
    pub async fn update_latest(
        &mut self,
        raw_tag: &str,
    ) -> Result<Vec<MemberRecord>, QueryError> {
        let tag = match ClanTag::normalize(raw_tag) {
            Some(tag) => tag,
            None => return Err(self.fail(QueryError::EmptyInput)),
        };

        self.error = None;
        self.info = None;

        if let Err(e) = self.api.request_refresh(&tag).await {
            return Err(self.fail(e.into()));
        }

        self.info = Some(UPDATE_REQUESTED.to_string());
        self.fetch_tag(tag).await
    }

    /// Fetch the tag carried by a shareable link, if it has one.
    pub async fn open_link(
        &mut self,
        url: &Url,
    ) -> Result<Option<Vec<MemberRecord>>, QueryError> {
        match tag_from_link(url) {
            Some(tag) => self.fetch(&tag).await.map(Some),
            None => Ok(None),
        }
    }

    /// Handle a column header click and return the re-sorted rows.
    pub fn request_sort(&mut self, key: SortKey) -> Vec<MemberRecord> {
        self.sort = self.sort.next_for(key);
        self.sorted()
    }

    /// Current rows in display order.
    pub fn sorted(&self) -> Vec<MemberRecord> {
        apply_sort(&self.ranked, &self.sort)
    }

    /// Current rows in payload order, with scores and ranks.
    pub fn ranked(&self) -> &[MemberRecord] {
        &self.ranked
    }

    pub fn summary(&self) -> ClanSummary {
        summarize(&self.ranked)
    }

    pub fn tag(&self) -> Option<&ClanTag> {
        self.tag.as_ref()
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Message for the last failure, if the last action failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Informational message from the last update request.
    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    /// Link reproducing the current query, once a query has succeeded.
    pub fn shareable_link(&self, base: &Url) -> Option<Url> {
        self.tag.as_ref().map(|tag| link_for(base, tag))
    }

    /// Snapshot for presentation.
    pub fn view(&self) -> ResultView {
        ResultView {
            tag: self.tag.clone(),
            sort: self.sort.clone(),
            records: self.sorted(),
            summary: self.summary(),
        }
    }

    async fn load(&self, tag: &ClanTag) -> Result<Vec<MemberRecord>, QueryError> {
        let data = self.api.fetch_members(tag).await?;
        Ok(process_response(data)?)
    }

    fn fail(&mut self, error: QueryError) -> QueryError {
        let message = error.user_message(self.hint.as_deref());
        warn!("Query failed: {}", message);
        self.error = Some(message);
        error
    }
}
