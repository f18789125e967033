use serde::{Deserialize, Serialize};

use crate::model::{Environment, Plant};

/// Everything that can happen to the plant selection screen: user intents
/// from the shell plus fetch completions coming back from the HTTP
/// capability. Capability responses are `#[serde(skip)]` because they never
/// cross the FFI boundary, and boxed to keep the enum small.
#[derive(Serialize, Deserialize)]
pub enum Event {
    /// Shell override for the backend base URL. Subsequent fetches use it.
    Configure { api_url: String },

    /// Screen became active: bootstrap the tag list and fetch page one.
    Start,

    /// A filter tag was tapped.
    EnvironmentSelected { key: String },

    /// The scrollable list reported its remaining distance-to-end (as a
    /// fraction of the viewport). Negative values are sent by some list
    /// widgets during layout and must not trigger a fetch.
    EndReached { distance_from_end: f64 },

    /// Retry affordance on the error notice was tapped.
    Retry,

    /// Screen is being torn down; late fetch completions must be dropped.
    ScreenClosed,

    #[serde(skip)]
    EnvironmentsFetched(Box<crux_http::Result<crux_http::Response<Vec<Environment>>>>),

    #[serde(skip)]
    PlantsFetched {
        seq: u64,
        page: u32,
        result: Box<crux_http::Result<crux_http::Response<Vec<Plant>>>>,
    },
}
