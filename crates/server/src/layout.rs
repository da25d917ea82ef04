//! Page shell selection: public pages get the site header and footer,
//! dashboard pages and signed-in visitors get a bare shell.

use axum::response::Html;

use crate::{context::RequestContext, views::escape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Chrome {
    Public,
    Hidden,
}

impl Chrome {
    pub(crate) fn shows_header_and_footer(self) -> bool {
        self == Chrome::Public
    }
}

pub(crate) fn is_dashboard_route(path: &str) -> bool {
    path.split('/').any(|segment| segment == "dashboard")
}

pub(crate) fn select_chrome(is_dashboard: bool, is_authenticated: bool) -> Chrome {
    if is_dashboard || is_authenticated {
        Chrome::Hidden
    } else {
        Chrome::Public
    }
}

pub(crate) fn render_page(ctx: &RequestContext, title: &str, body: &str) -> Html<String> {
    let chrome = ctx.chrome();
    let mut page = format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{} | Harbor Hotel</title>\n</head>\n<body data-chrome=\"{}\">\n",
        escape(title),
        if chrome.shows_header_and_footer() { "public" } else { "none" },
    );
    if chrome.shows_header_and_footer() {
        page.push_str(SITE_HEADER);
    }
    page.push_str("<main>\n");
    page.push_str(body);
    page.push_str("\n</main>\n");
    if chrome.shows_header_and_footer() {
        page.push_str(SITE_FOOTER);
    }
    page.push_str("</body>\n</html>\n");
    Html(page)
}

const SITE_HEADER: &str = "<header class=\"site-header\">\n\
<a class=\"brand\" href=\"/\">Harbor Hotel</a>\n\
<nav><a href=\"/rooms\">Rooms</a> <a href=\"/login\">Sign in</a> <a href=\"/register\">Register</a></nav>\n\
</header>\n";

const SITE_FOOTER: &str = "<footer class=\"site-footer\">\n\
<p>Harbor Hotel. Reception is open around the clock.</p>\n\
</footer>\n";

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod tests;
