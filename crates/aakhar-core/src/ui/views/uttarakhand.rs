use futures::future::{self, BoxFuture, FutureExt};

use crate::api::Fetch;
use crate::app::AppContext;
use crate::ui::router::View;
use crate::ui::{markup, Action, ContainerHandle, ViewError};

const OVERVIEW: &[&str] = &[
    "Uttarakhand, formerly known as Uttaranchal, is a state in the northern part of India. \
     On 9 November 2000 it became the 27th state of the Republic of India, carved from the \
     Himalayan districts of Uttar Pradesh.",
    "It is often referred to as Devabhumi (Land of the Gods) for the many temples and \
     pilgrimage centres spread throughout the state.",
    "The state is divided into two divisions, Garhwal and Kumaon. The temporary capital is \
     Dehradun, and Gairsain was declared the summer capital on 4 March 2020.",
];

const ADMIN_DETAILS: &[(&str, &str)] = &[
    ("Total Area", "53,483 sq km"),
    ("Divisions (Mandal)", "2 (Garhwal and Kumaon)"),
    ("Districts", "13"),
    ("Lok Sabha Seats", "5"),
    ("Vidhan Sabha Seats", "70"),
];

pub struct UttarakhandView {
    out: ContainerHandle,
}

impl UttarakhandView {
    pub fn new(out: ContainerHandle) -> Self {
        Self { out }
    }

    fn markup() -> String {
        let overview: String = OVERVIEW.iter().map(|p| markup::paragraph(p)).collect();
        let rows: String = ADMIN_DETAILS
            .iter()
            .map(|(label, value)| format!("<tr><td>{}</td><td>{}</td></tr>", label, value))
            .collect();

        format!(
            "<div class=\"uttarakhand-container\">{}{}</div>",
            markup::titled_card("About Uttarakhand", &overview),
            markup::titled_card(
                "State Administrative Details",
                &format!("<table class=\"admin-table\"><tbody>{}</tbody></table>", rows)
            ),
        )
    }
}

impl<F: Fetch> View<F> for UttarakhandView {
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
