use futures::future::{self, BoxFuture, FutureExt};

use crate::api::Fetch;
use crate::app::AppContext;
use crate::ui::router::{Route, View};
use crate::ui::{markup, styles, Action, ContainerHandle, ViewError};

pub struct HomeView {
    out: ContainerHandle,
}

impl HomeView {
    pub fn new(out: ContainerHandle) -> Self {
        Self { out }
    }

    fn markup() -> String {
        format!(
            "<div class=\"home-container\">\
             <div class=\"home-logo-card\"><div class=\"home-logo\">आखर | Aakhar</div></div>\
             <div class=\"home-content\">\
             <div class=\"home-text-block\">\
             <h1 class=\"home-title-hindi\">उत्तराखंडी भाषा तत्काल लघु शब्दकोश</h1>\
             <p class=\"home-subtitle-hindi\">हिंदी / अंग्रेज़ी / गढ़वाली / कुमाऊँनी / जौनसारी</p>\
             </div>\
             <div class=\"home-text-block\">\
             <h1 class=\"home-title-english\">Uttarakhandi Language Instant Short Dictionary</h1>\
             <p class=\"home-subtitle-english\">Hindi / English / Garhwali / Kumaoni / Jaunsari</p>\
             </div>\
             <div class=\"home-cta-buttons\">{}{}</div>\
             </div></div>",
            markup::link(Route::Learn.fragment(), "Start Learning &rarr;", styles::BUTTON),
            markup::link(Route::Uttarakhand.fragment(), "About Uttarakhand", styles::BUTTON_SECONDARY),
        )
    }
}

impl<F: Fetch> View<F> for HomeView {
    fn enter<'a>(&'a mut self, _ctx: &'a AppContext<F>) -> BoxFuture<'a, Result<(), ViewError>> {
        self.out.render(Self::markup());
        future::ready(Ok(())).boxed()
    }

    fn handle<'a>(
        &'a mut self,
        _ctx: &'a AppContext<F>,
        _action: Action,
    ) -> BoxFuture<'a, Result<bool, ViewError>> {
        future::ready(Ok(false)).boxed()
    }
}
