//! HTML rendering of router views.

use minijinja::{Environment, context};

use cleanai_core::View;

use crate::assets::AssetLinks;

const TEMPLATES: [(&str, &str); 5] = [
    ("base.html", include_str!("../templates/base.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("upload.html", include_str!("../templates/upload.html")),
    ("loading.html", include_str!("../templates/loading.html")),
    ("chat.html", include_str!("../templates/chat.html")),
];

/// Renders one template per page. Templates are compiled into the binary
/// and autoescape HTML.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render(&self, view: &View, assets: &AssetLinks) -> Result<String, minijinja::Error> {
        let name = format!("{}.html", view.page());
        let template = self.env.get_template(&name)?;
        template.render(context! { view => view, assets => assets })
    }
}
