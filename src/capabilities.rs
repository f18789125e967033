//! Capability wiring. The core only needs HTTP and Render; both come from
//! Crux directly.

pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

pub type AppHttp = Http<Event>;
pub type AppRender = Render<Event>;

// The Effect derive reads the field types syntactically, so they are spelled
// out here rather than going through the aliases above.
#[derive(crux_macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
}
