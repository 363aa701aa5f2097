use futures::future::{self, BoxFuture, FutureExt};

use crate::api::Fetch;
use crate::app::AppContext;
use crate::install::InstallOutcome;
use crate::ui::router::View;
use crate::ui::{markup, Action, ContainerHandle, ViewError};

const INTRODUCTION: &str = "Aakhar is a community-driven project aimed at preserving and \
    promoting the local languages of Uttarakhand: Garhwali, Kumaoni and Jaunsari. It is a \
    simple, accessible tool for anyone looking to learn and practice commonly used words and \
    phrases.";

const INSTALL_PITCH: &str = "Install this app for easy, offline access. It works just like a native app!";

pub struct AboutView {
    out: ContainerHandle,
    /// Result of the last install attempt from this page.
    notice: Option<InstallOutcome>,
}

impl AboutView {
    pub fn new(out: ContainerHandle) -> Self {
        Self { out, notice: None }
    }

    fn markup(&self) -> String {
        let mut install = markup::paragraph(INSTALL_PITCH);
        install.push_str(&markup::button("btn-install", "Add to Home Screen", false));
        if let Some(outcome) = self.notice {
            install.push_str(&format!(
                "<p class=\"install-notice\">{}</p>",
                outcome.notice()
            ));
        }

        format!(
            "<div class=\"about-container\">{}<div class=\"card\" id=\"add-to-home-card\">\
             <h2>Add to Home Screen</h2>{}</div></div>",
            markup::titled_card("Introduction | परिचय", &markup::paragraph(INTRODUCTION)),
            install
        )
    }
}

impl<F: Fetch> View<F> for AboutView {
    fn enter<'a>(&'a mut self, _ctx: &'a AppContext<F>) -> BoxFuture<'a, Result<(), ViewError>> {
        self.out.render(self.markup());
        future::ready(Ok(())).boxed()
    }

    fn handle<'a>(
        &'a mut self,
        ctx: &'a AppContext<F>,
        action: Action,
    ) -> BoxFuture<'a, Result<bool, ViewError>> {
        async move {
            if action != Action::Install {
                return Ok(false);
            }
            self.notice = Some(ctx.install.trigger().await);
            self.out.render(self.markup());
            Ok(true)
        }
        .boxed()
    }
}
