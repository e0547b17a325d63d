#![forbid(unsafe_code)]

use std::sync::Arc;

use anyhow::{Result, anyhow};
use log::error;
use poem::http::StatusCode;
use poem::web::{Data, Html};
use poem::{handler, Request};
use tera::{Context, Tera};

use crate::utils::errors::Errors;
use crate::utils::greeting_utils::{self, RequestDebug};

// Page messages.
pub const HOME_MESSAGE  : &str = "Welcome to Spring Boot with Thymeleaf!";
pub const ABOUT_MESSAGE : &str = "This is the about page.";

// Templates compiled into the binary.
const TEMPLATES: [(&str, &str); 3] = [
    ("base.html",  include_str!("../../templates/base.html")),
    ("home.html",  include_str!("../../templates/home.html")),
    ("about.html", include_str!("../../templates/about.html")),
];

// ***************************************************************************
//                               Page Renderer
// ***************************************************************************
#[derive(Clone)]
pub struct PageRenderer {
    tera: Arc<Tera>,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)
            .map_err(|e| anyhow!(Errors::TemplateError(e.to_string())))?;
        Ok(PageRenderer {tera: Arc::new(tera)})
    }

    /// Render the named page with its single message attribute.
    pub fn render(&self, page: &str, message: &str) -> Result<String, Errors> {
        let mut ctx = Context::new();
        ctx.insert("message", message);
        self.tera.render(&format!("{}.html", page), &ctx)
            .map_err(|e| Errors::TemplateError(e.to_string()))
    }
}

// ***************************************************************************
//                                 Handlers
// ***************************************************************************
struct ReqPage
{
    page: String,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqPage {
    type Req = ReqPage;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request body:");
        s.push_str("\n    page: ");
        s.push_str(&self.page);
        s
    }
}

#[handler]
pub fn home(http_req: &Request, Data(pages): Data<&PageRenderer>) -> poem::Result<Html<String>> {
    render_page(http_req, pages, "home", HOME_MESSAGE)
}

#[handler]
pub fn about(http_req: &Request, Data(pages): Data<&PageRenderer>) -> poem::Result<Html<String>> {
    render_page(http_req, pages, "about", ABOUT_MESSAGE)
}

fn render_page(http_req: &Request, pages: &PageRenderer, page: &str, message: &str)
-> poem::Result<Html<String>> {
    // Conditional logging depending on log level.
    greeting_utils::debug_request(http_req, &ReqPage {page: page.to_string()});

    match pages.render(page, message) {
        Ok(body) => Ok(Html(body)),
        Err(e) => {
            let msg = "ERROR: ".to_owned() + e.to_string().as_str();
            error!("{}", msg);
            Err(poem::Error::from_string(msg, StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_renders_message() {
        let pages = PageRenderer::new().unwrap();
        let html = pages.render("home", HOME_MESSAGE).unwrap();
        assert!(html.contains("<p>Welcome to Spring Boot with Thymeleaf!</p>"));
        assert!(html.contains("<title>Home</title>"));
    }

    #[test]
    fn message_is_escaped() {
        let pages = PageRenderer::new().unwrap();
        let html = pages.render("about", "<b>hi</b>").unwrap();
        assert!(html.contains("&lt;b&gt;hi&lt;&#x2F;b&gt;"));
    }

    #[test]
    fn unknown_page_is_an_error() {
        let pages = PageRenderer::new().unwrap();
        assert!(matches!(pages.render("contact", "x"), Err(Errors::TemplateError(_))));
    }
}
