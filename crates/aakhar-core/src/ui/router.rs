//! Fragment router: maps `#route` fragments to view factories and owns the
//! currently entered view.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, error};

use crate::api::Fetch;
use crate::app::AppContext;

use super::views::{AboutView, HomeView, LearnView, QuizView, RecallView, UttarakhandView};
use super::{markup, Action, Container, ContainerHandle, ViewError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    About,
    Uttarakhand,
    Learn,
    Recall,
    Quiz,
}

impl Route {
    /// Navigation bar order.
    pub const NAV: [Route; 6] = [
        Route::Home,
        Route::Learn,
        Route::Recall,
        Route::Quiz,
        Route::Uttarakhand,
        Route::About,
    ];

    /// Where empty and unknown fragments land.
    pub const FALLBACK: Route = Route::About;

    pub fn fragment(&self) -> &'static str {
        match self {
            Route::Home => "#home",
            Route::About => "#about",
            Route::Uttarakhand => "#uttarakhand",
            Route::Learn => "#learn",
            Route::Recall => "#recall",
            Route::Quiz => "#quiz",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::About => "About",
            Route::Uttarakhand => "Uttarakhand",
            Route::Learn => "Learn",
            Route::Recall => "Recall",
            Route::Quiz => "Quiz",
        }
    }

    /// Accepts `#learn` or `learn`.
    pub fn from_fragment(fragment: &str) -> Option<Route> {
        let name = fragment.trim();
        let name = name.strip_prefix('#').unwrap_or(name);
        Route::NAV
            .into_iter()
            .find(|route| route.fragment()[1..].eq_ignore_ascii_case(name))
    }
}

/// A page controller. It is built fresh on every navigation with a handle to
/// that navigation's container session, and dropped on the next one.
pub trait View<F>: Send {
    /// Render the initial state.
    fn enter<'a>(&'a mut self, ctx: &'a AppContext<F>) -> BoxFuture<'a, Result<(), ViewError>>;

    /// Apply a user action. `Ok(false)` means the action does not apply to
    /// the view's current state and nothing changed.
    fn handle<'a>(
        &'a mut self,
        ctx: &'a AppContext<F>,
        action: Action,
    ) -> BoxFuture<'a, Result<bool, ViewError>>;
}

pub type ViewFactory<F> = Box<dyn Fn(ContainerHandle) -> Box<dyn View<F>> + Send + Sync>;

pub struct Router<F> {
    context: Arc<AppContext<F>>,
    container: Container,
    factories: HashMap<Route, ViewFactory<F>>,
    current: Option<Box<dyn View<F>>>,
    current_route: Option<Route>,
}

impl<F: Fetch + 'static> Router<F> {
    /// Router with every application route registered.
    pub fn new(context: Arc<AppContext<F>>) -> Self {
        let mut router = Self::empty(context);
        router.register(Route::Home, |out| Box::new(HomeView::new(out)));
        router.register(Route::About, |out| Box::new(AboutView::new(out)));
        router.register(Route::Uttarakhand, |out| Box::new(UttarakhandView::new(out)));
        router.register(Route::Learn, |out| Box::new(LearnView::new(out)));
        router.register(Route::Recall, |out| Box::new(RecallView::new(out)));
        router.register(Route::Quiz, |out| Box::new(QuizView::new(out)));
        router
    }

    pub fn empty(context: Arc<AppContext<F>>) -> Self {
        Self {
            context,
            container: Container::new(),
            factories: HashMap::new(),
            current: None,
            current_route: None,
        }
    }

    pub fn register<V>(&mut self, route: Route, factory: V)
    where
        V: Fn(ContainerHandle) -> Box<dyn View<F>> + Send + Sync + 'static,
    {
        self.factories.insert(route, Box::new(factory));
    }

    /// The route a fragment leads to: its own when registered, the fallback
    /// otherwise.
    pub fn resolve(&self, fragment: &str) -> Route {
        match Route::from_fragment(fragment) {
            Some(route) if self.factories.contains_key(&route) => route,
            _ => {
                debug!(fragment, "Unknown route, using fallback");
                Route::FALLBACK
            }
        }
    }

    /// Clear the container, build the view for `fragment` and enter it.
    ///
    /// A failing view is replaced by an inline error; the router stays usable.
    pub async fn navigate(&mut self, fragment: &str) -> Route {
        let route = self.resolve(fragment);
        let out = self.container.begin_session();
        self.current = None;
        self.current_route = Some(route);

        let Some(factory) = self.factories.get(&route) else {
            error!(route = route.fragment(), "No view registered for route");
            out.render(markup::route_error());
            return route;
        };

        let mut view = factory(out.clone());
        let entered = view.enter(&self.context).await;
        match entered {
            Ok(()) => self.current = Some(view),
            Err(e) => {
                error!(route = route.fragment(), error = %e, "Error rendering route");
                out.render(markup::route_error());
            }
        }
        route
    }

    /// Hand an action to the current view. Returns whether it applied.
    pub async fn dispatch(&mut self, action: Action) -> bool {
        let Some(view) = self.current.as_mut() else {
            return false;
        };

        let result = view.handle(&self.context, action).await;
        match result {
            Ok(handled) => handled,
            Err(e) => {
                let route = self.current_route.map(|r| r.fragment()).unwrap_or_default();
                error!(route, error = %e, "Error handling action");
                self.current = None;
                // Renders into whichever session is current; the failed view owned it
                self.container.begin_session().render(markup::route_error());
                true
            }
        }
    }

    pub fn current_route(&self) -> Option<Route> {
        self.current_route
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn context(&self) -> &Arc<AppContext<F>> {
        &self.context
    }

    /// Navigation entries with the active one flagged.
    pub fn nav_links(&self) -> Vec<(Route, bool)> {
        Route::NAV
            .into_iter()
            .map(|route| (route, Some(route) == self.current_route))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ui::test_support::{context, garhwali_dataset};

    struct FailingView;

    impl<F: Fetch> View<F> for FailingView {
        fn enter<'a>(&'a mut self, _ctx: &'a AppContext<F>) -> BoxFuture<'a, Result<(), ViewError>> {
            Box::pin(async { Err(ViewError::render("broken", "template missing")) })
        }

        fn handle<'a>(
            &'a mut self,
            _ctx: &'a AppContext<F>,
            _action: Action,
        ) -> BoxFuture<'a, Result<bool, ViewError>> {
            Box::pin(async { Ok(false) })
        }
    }

    #[test]
    fn test_fragment_parsing() {
        assert_eq!(Route::from_fragment("#learn"), Some(Route::Learn));
        assert_eq!(Route::from_fragment("quiz"), Some(Route::Quiz));
        assert_eq!(Route::from_fragment(" #Recall "), Some(Route::Recall));
        assert_eq!(Route::from_fragment("#nowhere"), None);
        assert_eq!(Route::from_fragment(""), None);
    }

    #[tokio::test]
    async fn test_unknown_fragment_renders_about() {
        let (_network, ctx) = context();
        let mut router = Router::new(ctx);

        assert_eq!(router.navigate("#about").await, Route::About);
        let about = router.container().html();

        assert_eq!(router.navigate("#does-not-exist").await, Route::About);
        assert_eq!(router.container().html(), about);
        assert_eq!(router.navigate("").await, Route::About);
        assert_eq!(router.container().html(), about);
    }

    #[tokio::test]
    async fn test_failing_view_shows_inline_error_and_router_recovers() {
        let (_network, ctx) = context();
        let mut router = Router::new(ctx);
        router.register(Route::Uttarakhand, |_out| Box::new(FailingView));

        router.navigate("#uttarakhand").await;
        assert_eq!(router.container().html(), markup::route_error());
        assert!(!router.dispatch(Action::Next).await);

        router.navigate("#home").await;
        assert!(router.container().html().contains("Aakhar"));
    }

    #[tokio::test]
    async fn test_empty_router_falls_back_to_error() {
        let (_network, ctx) = context();
        let mut router = Router::empty(ctx);
        assert_eq!(router.navigate("#learn").await, Route::About);
        assert_eq!(router.container().html(), markup::route_error());
    }

    #[tokio::test]
    async fn test_nav_links_flag_active_route() {
        let (network, ctx) = context();
        network.serve_json("assets/data/_categories.json", json!(["common_words"]));
        network.serve_json("assets/data/common_words.json", garhwali_dataset(12));
        let mut router = Router::new(ctx);

        router.navigate("#learn").await;
        let active: Vec<Route> = router
            .nav_links()
            .into_iter()
            .filter(|(_, active)| *active)
            .map(|(route, _)| route)
            .collect();
        assert_eq!(active, vec![Route::Learn]);
    }

    #[tokio::test]
    async fn test_navigation_replaces_view_state() {
        let (network, ctx) = context();
        network.serve_json("assets/data/_categories.json", json!(["common_words"]));
        network.serve_json("assets/data/common_words.json", garhwali_dataset(12));
        let mut router = Router::new(ctx);

        router.navigate("#learn").await;
        assert!(router.dispatch(Action::Select("common_words".into())).await);
        assert!(router.container().html().contains("Card 1 of 12"));

        router.navigate("#learn").await;
        assert!(router.container().html().contains("Please select a category"));
        assert!(!router.dispatch(Action::Next).await);
    }
}
