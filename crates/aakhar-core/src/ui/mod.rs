//! Presentation layer: the shared container, the fragment router and the
//! page controllers.
//!
//! - `container`: the content area and its per-navigation session handles
//! - `router`: routes, the `View` trait and the `Router`
//! - `views`: one controller per route
//! - `input`: user actions and their text form
//! - `markup`, `styles`: shared markup fragments and class names

pub mod container;
pub mod error;
pub mod input;
pub mod markup;
pub mod router;
pub mod styles;
pub mod views;

pub use container::{Container, ContainerHandle};
pub use error::ViewError;
pub use input::{Action, InputError};
pub use router::{Route, Router, View, ViewFactory};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use crate::api::http::mock::{MockNetwork, BASE};
    use crate::app::AppContext;
    use crate::config::Config;

    pub(crate) fn context() -> (Arc<MockNetwork>, Arc<AppContext<Arc<MockNetwork>>>) {
        let network = Arc::new(MockNetwork::new());
        let config = Config {
            base_url: BASE.to_string(),
            ..Config::default()
        };
        let ctx = AppContext::new(config, network.clone()).unwrap();
        (network, Arc::new(ctx))
    }

    /// `count` entries, each with a distinct Garhwali answer.
    pub(crate) fn garhwali_dataset(count: usize) -> Value {
        Value::Array(
            (1..=count)
                .map(|i| {
                    json!({
                        "English": format!("Word {}", i),
                        "Hindi": format!("शब्द {}", i),
                        "Garhwali": format!("गढ़वळि {}", i),
                    })
                })
                .collect(),
        )
    }
}
