use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::{ALL_ENVIRONMENTS_KEY, DEFAULT_API_URL, FIRST_PAGE};

/// Watering frequency as the backend serves it, e.g. `{ "times": 2, "repeat_every": "week" }`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WaterFrequency {
    pub times: u32,
    pub repeat_every: String,
}

impl WaterFrequency {
    /// Human-readable label for plant cards, e.g. "2x per week".
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}x per {}", self.times, self.repeat_every)
    }
}

/// A plant record as received from the backend. Immutable once stored;
/// `id` is unique within a fetch page but pages are not de-duplicated
/// against each other.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Plant {
    pub id: String,
    pub name: String,
    pub about: String,
    pub water_tips: String,
    pub photo: String,
    pub environments: Vec<String>,
    pub frequency: WaterFrequency,
}

impl Plant {
    #[must_use]
    pub fn grows_in(&self, environment_key: &str) -> bool {
        self.environments.iter().any(|e| e == environment_key)
    }
}

/// A filter tag. The `"all"` sentinel is synthesized locally and never
/// appears in server data.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    pub key: String,
    pub title: String,
}

impl Environment {
    #[must_use]
    pub fn all() -> Self {
        Self {
            key: ALL_ENVIRONMENTS_KEY.to_string(),
            title: "All".to_string(),
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.key == ALL_ENVIRONMENTS_KEY
    }
}

/// Identity of the plants fetch currently in flight. The sequence token is
/// monotonic per model; a response carrying any other token is stale and
/// must be discarded.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingFetch {
    pub seq: u64,
    pub page: u32,
}

/// All state owned by the plant selection screen. Mutated only through the
/// transition functions below, never directly from event handlers.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Model {
    pub api_url: String,

    // Tag bar
    pub environments: Vec<Environment>,
    pub environments_pending: bool,

    // Plant collection: `plants` accumulates across pages, `filtered` is the
    // derived view for the currently selected environment.
    pub plants: Vec<Plant>,
    pub filtered: Vec<Plant>,
    pub selected_environment: String,

    // Pagination: `page` is the page targeted by the most recent request,
    // `loaded_page` the highest page whose data made it into `plants`. A
    // repeated `Start` rewinds both to page one; "load more" always asks
    // for `loaded_page + 1`, so no page is ever skipped.
    pub page: u32,
    pub loaded_page: u32,
    pub loading: bool,
    pub loading_more: bool,
    pub loaded_all: bool,
    pub plants_request: Option<PendingFetch>,

    pub last_error: Option<FetchError>,

    // Liveness: set on screen teardown so late completions are dropped.
    pub closed: bool,

    next_seq: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            environments: Vec::new(),
            environments_pending: false,
            plants: Vec::new(),
            filtered: Vec::new(),
            selected_environment: ALL_ENVIRONMENTS_KEY.to_string(),
            page: FIRST_PAGE,
            loaded_page: 0,
            loading: false,
            loading_more: false,
            loaded_all: false,
            plants_request: None,
            last_error: None,
            closed: false,
            next_seq: 0,
        }
    }
}

impl Model {
    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Begin a first-page fetch, rewinding the page cursor to one. The
    /// response will replace the collection, so the loaded prefix restarts
    /// from scratch. Returns the fetch identity to attach to the outgoing
    /// request.
    pub fn begin_first_page(&mut self) -> PendingFetch {
        self.loading = true;
        self.last_error = None;
        self.page = FIRST_PAGE;
        let pending = PendingFetch {
            seq: self.bump_seq(),
            page: FIRST_PAGE,
        };
        self.plants_request = Some(pending);
        pending
    }

    /// Begin a "load more" fetch in response to the end-of-list trigger,
    /// targeting the page after the highest one already loaded.
    ///
    /// Returns `None` (no cursor movement, no fetch) when the screen is
    /// closed, a fetch is already in flight, the collection is exhausted,
    /// or no content has been loaded yet.
    pub fn begin_fetch_more(&mut self) -> Option<PendingFetch> {
        if self.closed
            || self.plants_request.is_some()
            || self.loaded_all
            || self.plants.is_empty()
        {
            return None;
        }

        self.page = self.loaded_page + 1;
        self.loading_more = true;
        self.last_error = None;
        let pending = PendingFetch {
            seq: self.bump_seq(),
            page: self.page,
        };
        self.plants_request = Some(pending);
        Some(pending)
    }

    /// Re-issue the plants fetch at the current page after a failure. The
    /// cursor still points at the page that failed, so this retries exactly
    /// that page. Returns `None` when there is nothing to retry.
    pub fn begin_retry(&mut self) -> Option<PendingFetch> {
        if self.closed || self.plants_request.is_some() || self.last_error.is_none() {
            return None;
        }

        self.last_error = None;
        if self.page == FIRST_PAGE {
            self.loading = true;
        } else {
            self.loading_more = true;
        }
        let pending = PendingFetch {
            seq: self.bump_seq(),
            page: self.page,
        };
        self.plants_request = Some(pending);
        Some(pending)
    }

    /// Whether a plants response carrying `seq` should be applied. False for
    /// stale tokens and for completions arriving after teardown.
    #[must_use]
    pub fn accepts(&self, seq: u64) -> bool {
        !self.closed && self.plants_request.map(|p| p.seq) == Some(seq)
    }

    /// Apply a successful page fetch. Page one replaces the collection;
    /// later pages append. An empty later page means the backend has no more
    /// pages: the collection is marked exhausted instead of re-entering a
    /// loading state. The filtered view is recomputed with the active
    /// predicate either way.
    pub fn apply_page(&mut self, page: u32, batch: Vec<Plant>) {
        self.plants_request = None;
        self.loading = false;
        self.loading_more = false;
        self.last_error = None;

        if page > FIRST_PAGE {
            if batch.is_empty() {
                self.loaded_all = true;
                return;
            }
            self.plants.extend(batch);
            self.loaded_page = self.loaded_page.max(page);
        } else {
            // An empty first page is valid data: the backend has no plants.
            self.loaded_all = batch.is_empty();
            self.plants = batch;
            self.loaded_page = FIRST_PAGE;
        }
        self.refresh_filtered();
    }

    /// Record a failed page fetch. Loading flags clear so the spinner never
    /// runs forever; the error is surfaced through the view model.
    pub fn fail_page(&mut self, error: FetchError) {
        self.plants_request = None;
        self.loading = false;
        self.loading_more = false;
        self.last_error = Some(error);
    }

    /// Select a filter tag. Never mutates the full collection; the filtered
    /// view is recomputed from scratch so it reflects every loaded page.
    pub fn select_environment(&mut self, key: impl Into<String>) {
        self.selected_environment = key.into();
        self.refresh_filtered();
    }

    /// Replace the tag list wholesale with the sentinel followed by the
    /// server's tags (already title-ascending).
    pub fn apply_environments(&mut self, server_tags: Vec<Environment>) {
        self.environments_pending = false;
        let mut environments = Vec::with_capacity(server_tags.len() + 1);
        environments.push(Environment::all());
        environments.extend(server_tags);
        self.environments = environments;
    }

    fn refresh_filtered(&mut self) {
        if self.selected_environment == ALL_ENVIRONMENTS_KEY {
            self.filtered = self.plants.clone();
        } else {
            self.filtered = self
                .plants
                .iter()
                .filter(|plant| plant.grows_in(&self.selected_environment))
                .cloned()
                .collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant(id: &str, environments: &[&str]) -> Plant {
        Plant {
            id: id.to_string(),
            name: format!("plant-{id}"),
            about: String::new(),
            water_tips: String::new(),
            photo: String::new(),
            environments: environments.iter().map(ToString::to_string).collect(),
            frequency: WaterFrequency {
                times: 1,
                repeat_every: "week".to_string(),
            },
        }
    }

    #[test]
    fn first_page_replaces_collection() {
        let mut model = Model::default();
        model.begin_first_page();
        model.apply_page(1, vec![plant("1", &["indoor"])]);

        let pending = model.begin_first_page();
        model.apply_page(pending.page, vec![plant("2", &["outdoor"])]);

        assert_eq!(model.plants.len(), 1);
        assert_eq!(model.plants[0].id, "2");
        assert_eq!(model.filtered, model.plants);
    }

    #[test]
    fn later_pages_append() {
        let mut model = Model::default();
        model.begin_first_page();
        model.apply_page(1, vec![plant("1", &["indoor"])]);

        let pending = model.begin_fetch_more().unwrap();
        assert_eq!(pending.page, 2);
        assert!(model.loading_more);

        model.apply_page(pending.page, vec![plant("2", &["outdoor"])]);
        assert_eq!(model.plants.len(), 2);
        assert!(!model.loading_more);
    }

    #[test]
    fn empty_batch_marks_exhausted_and_clears_flags() {
        let mut model = Model::default();
        model.begin_first_page();
        model.apply_page(1, vec![plant("1", &["indoor"])]);

        let pending = model.begin_fetch_more().unwrap();
        model.apply_page(pending.page, Vec::new());

        assert!(model.loaded_all);
        assert!(!model.loading);
        assert!(!model.loading_more);
        assert_eq!(model.plants.len(), 1);
    }

    #[test]
    fn fetch_more_rejected_while_in_flight_or_exhausted_or_empty() {
        let mut model = Model::default();
        // Nothing loaded yet.
        assert!(model.begin_fetch_more().is_none());

        model.begin_first_page();
        model.apply_page(1, vec![plant("1", &["indoor"])]);

        let pending = model.begin_fetch_more().unwrap();
        // Overlapping trigger while the previous fetch is pending.
        assert!(model.begin_fetch_more().is_none());
        assert_eq!(model.page, 2);

        model.apply_page(pending.page, Vec::new());
        assert!(model.loaded_all);
        assert!(model.begin_fetch_more().is_none());
    }

    #[test]
    fn fetch_more_follows_loaded_prefix_after_refresh() {
        let mut model = Model::default();
        model.begin_first_page();
        model.apply_page(1, vec![plant("1", &["indoor"])]);
        let pending = model.begin_fetch_more().unwrap();
        model.apply_page(pending.page, vec![plant("2", &["outdoor"])]);
        assert_eq!(model.loaded_page, 2);

        // A refresh replaces the collection with a fresh page one...
        let pending = model.begin_first_page();
        assert_eq!(model.page, FIRST_PAGE);
        model.apply_page(pending.page, vec![plant("3", &["indoor"])]);
        assert_eq!(model.loaded_page, 1);

        // ...so the next "load more" must ask for page two, not page three.
        let pending = model.begin_fetch_more().unwrap();
        assert_eq!(pending.page, 2);
    }

    #[test]
    fn stale_sequence_tokens_are_rejected() {
        let mut model = Model::default();
        let first = model.begin_first_page();
        assert!(model.accepts(first.seq));

        // A fresh first-page fetch supersedes the old one.
        let second = model.begin_first_page();
        assert!(!model.accepts(first.seq));
        assert!(model.accepts(second.seq));

        model.closed = true;
        assert!(!model.accepts(second.seq));
    }

    #[test]
    fn selecting_environment_filters_without_mutating_collection() {
        let mut model = Model::default();
        model.begin_first_page();
        model.apply_page(
            1,
            vec![
                plant("1", &["indoor"]),
                plant("2", &["outdoor"]),
                plant("3", &["indoor", "outdoor"]),
            ],
        );

        model.select_environment("indoor");
        assert_eq!(
            model
                .filtered
                .iter()
                .map(|p| p.id.as_str())
                .collect::<Vec<_>>(),
            vec!["1", "3"]
        );
        assert_eq!(model.plants.len(), 3);

        model.select_environment("all");
        assert_eq!(model.filtered, model.plants);

        model.select_environment("bathroom");
        assert!(model.filtered.is_empty());
        assert_eq!(model.plants.len(), 3);
    }

    #[test]
    fn append_reapplies_active_filter() {
        let mut model = Model::default();
        model.begin_first_page();
        model.apply_page(1, vec![plant("1", &["indoor"])]);
        model.select_environment("indoor");

        let pending = model.begin_fetch_more().unwrap();
        model.apply_page(
            pending.page,
            vec![plant("2", &["outdoor"]), plant("3", &["indoor"])],
        );

        // Only matching plants reach the filtered view; the full collection
        // keeps everything.
        assert_eq!(
            model
                .filtered
                .iter()
                .map(|p| p.id.as_str())
                .collect::<Vec<_>>(),
            vec!["1", "3"]
        );
        assert_eq!(model.plants.len(), 3);
    }

    #[test]
    fn retry_refetches_current_page() {
        let mut model = Model::default();
        model.begin_first_page();
        model.apply_page(1, vec![plant("1", &["indoor"])]);

        model.begin_fetch_more().unwrap();
        model.fail_page(FetchError::Network("connection reset".to_string()));
        assert!(!model.loading_more);
        assert!(model.last_error.is_some());

        let retry = model.begin_retry().unwrap();
        assert_eq!(retry.page, 2);
        assert!(model.loading_more);
        assert!(model.last_error.is_none());
    }

    #[test]
    fn retry_requires_an_error() {
        let mut model = Model::default();
        assert!(model.begin_retry().is_none());

        model.begin_first_page();
        assert!(model.begin_retry().is_none());
    }

    #[test]
    fn environments_are_prepended_with_sentinel() {
        let mut model = Model::default();
        model.apply_environments(vec![Environment {
            key: "indoor".to_string(),
            title: "Indoor".to_string(),
        }]);

        assert_eq!(model.environments.len(), 2);
        assert!(model.environments[0].is_all());
        assert_eq!(model.environments[1].key, "indoor");
    }

    #[test]
    fn watering_label_formats_frequency() {
        let frequency = WaterFrequency {
            times: 2,
            repeat_every: "day".to_string(),
        };
        assert_eq!(frequency.label(), "2x per day");
    }
}
