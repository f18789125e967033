use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api;
use crate::capabilities::Capabilities;
use crate::error::FetchError;
use crate::event::Event;
use crate::model::{Environment, Model, PendingFetch, Plant};

/// The plant selection screen core. All behavior lives in `update`; the
/// shell renders whatever `view` derives from the model.
#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        match event {
            Event::Configure { api_url } => {
                model.api_url = api_url;
            }

            Event::Start => {
                model.environments_pending = Self::fetch_environments(model, caps);
                let pending = model.begin_first_page();
                Self::fetch_plants(model, pending, caps);
                caps.render.render();
            }

            Event::EnvironmentSelected { key } => {
                model.select_environment(key);
                caps.render.render();
            }

            Event::EndReached { distance_from_end } => {
                // Some list widgets report a negative distance during layout;
                // that is not a real end-of-list signal.
                if distance_from_end < 0.0 {
                    return;
                }
                if let Some(pending) = model.begin_fetch_more() {
                    Self::fetch_plants(model, pending, caps);
                    caps.render.render();
                }
            }

            Event::Retry => {
                if let Some(pending) = model.begin_retry() {
                    Self::fetch_plants(model, pending, caps);
                    caps.render.render();
                }
            }

            Event::ScreenClosed => {
                model.closed = true;
            }

            Event::EnvironmentsFetched(result) => {
                Self::handle_environments(*result, model);
                caps.render.render();
            }

            Event::PlantsFetched { seq, page, result } => {
                if !model.accepts(seq) {
                    debug!(seq, page, "discarding stale plants response");
                    return;
                }
                Self::handle_plants(page, *result, model);
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel {
            environments: model
                .environments
                .iter()
                .map(|environment| EnvironmentChip {
                    key: environment.key.clone(),
                    title: environment.title.clone(),
                    active: environment.key == model.selected_environment,
                })
                .collect(),
            plants: model.filtered.iter().map(PlantCard::from).collect(),
            loading: model.loading,
            loading_more: model.loading_more,
            loaded_all: model.loaded_all,
            error: model.last_error.as_ref().map(|error| ErrorNotice {
                message: error.user_facing_message(),
                can_retry: error.is_retryable(),
            }),
        }
    }
}

impl App {
    /// Issue the one-shot tag list fetch. Returns whether a request actually
    /// went out.
    fn fetch_environments(model: &Model, caps: &Capabilities) -> bool {
        let url = match api::environments_url(&model.api_url) {
            Ok(url) => url,
            Err(error) => {
                warn!(%error, "invalid environments url, tag bar stays empty");
                return false;
            }
        };

        debug!(url = %url, "fetching environments");
        caps.http
            .get(url.as_str())
            .expect_json::<Vec<Environment>>()
            .send(|result| Event::EnvironmentsFetched(Box::new(result)));
        true
    }

    fn fetch_plants(model: &mut Model, pending: PendingFetch, caps: &Capabilities) {
        let url = match api::plants_url(&model.api_url, pending.page) {
            Ok(url) => url,
            Err(error) => {
                warn!(%error, page = pending.page, "invalid plants url");
                model.fail_page(FetchError::InvalidUrl(error.to_string()));
                return;
            }
        };

        debug!(url = %url, page = pending.page, seq = pending.seq, "fetching plants page");
        let PendingFetch { seq, page } = pending;
        caps.http
            .get(url.as_str())
            .expect_json::<Vec<Plant>>()
            .send(move |result| Event::PlantsFetched {
                seq,
                page,
                result: Box::new(result),
            });
    }

    /// Tag fetch completion. Failure leaves the tag bar empty, without even
    /// the sentinel: the screen still works, plants just cannot be filtered.
    fn handle_environments(
        result: crux_http::Result<crux_http::Response<Vec<Environment>>>,
        model: &mut Model,
    ) {
        if model.closed || !model.environments_pending {
            debug!("discarding environments response");
            return;
        }
        model.environments_pending = false;

        match result {
            Ok(mut response) if response.status().is_success() => {
                match response.take_body() {
                    Some(tags) => {
                        debug!(count = tags.len(), "applying environments");
                        model.apply_environments(tags);
                    }
                    None => warn!("environments response had no body"),
                }
            }
            Ok(response) => {
                warn!(status = %response.status(), "environments fetch failed");
            }
            Err(error) => {
                warn!(%error, "environments fetch failed");
            }
        }
    }

    fn handle_plants(
        page: u32,
        result: crux_http::Result<crux_http::Response<Vec<Plant>>>,
        model: &mut Model,
    ) {
        match result {
            Ok(mut response) if response.status().is_success() => {
                match response.take_body() {
                    Some(batch) => {
                        debug!(page, count = batch.len(), "applying plants page");
                        model.apply_page(page, batch);
                    }
                    None => {
                        model.fail_page(FetchError::Decode("response had no body".to_string()));
                    }
                }
            }
            Ok(response) => {
                let error = FetchError::from_status(u16::from(response.status()), None);
                warn!(page, %error, "plants fetch failed");
                model.fail_page(error);
            }
            Err(http_error) => {
                let error = FetchError::from(&http_error);
                warn!(page, %error, "plants fetch failed");
                model.fail_page(error);
            }
        }
    }
}

/// What the shell renders. Derived, never mutated directly.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub environments: Vec<EnvironmentChip>,
    pub plants: Vec<PlantCard>,
    pub loading: bool,
    pub loading_more: bool,
    pub loaded_all: bool,
    pub error: Option<ErrorNotice>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EnvironmentChip {
    pub key: String,
    pub title: String,
    pub active: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlantCard {
    pub id: String,
    pub name: String,
    pub photo: String,
    pub about: String,
    pub water_tips: String,
    pub watering_label: String,
}

impl From<&Plant> for PlantCard {
    fn from(plant: &Plant) -> Self {
        Self {
            id: plant.id.clone(),
            name: plant.name.clone(),
            photo: plant.photo.clone(),
            about: plant.about.clone(),
            water_tips: plant.water_tips.clone(),
            watering_label: plant.frequency.label(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorNotice {
    pub message: String,
    pub can_retry: bool,
}
