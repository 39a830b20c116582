/// Page renderer for the leafscan web front-end.
///
/// Both pages share one HTML shell (`web/assets/page.html`) with `{{TOKEN}}`
/// placeholders. The shell is embedded at compile time; handlers supply the
/// page body through a closure.

const TEMPLATE: &str = include_str!("assets/page.html");

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    About,
}

impl Page {
    fn title(self) -> &'static str {
        match self {
            Page::Home  => "Cucumber Leaf Disease Classification",
            Page::About => "Information & Tutorial",
        }
    }
}

/// Renders a full page.
///
/// `fill` receives the shell with navigation already resolved and replaces
/// the page-specific tokens (at least `{{CONTENT}}`).
pub fn render_page<F>(page: Page, fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    let mut html = TEMPLATE.to_owned();

    html = html.replace("{{TITLE}}", page.title());
    html = html.replace("{{NAV_HOME}}",  if page == Page::Home  { "active" } else { "" });
    html = html.replace("{{NAV_ABOUT}}", if page == Page::About { "active" } else { "" });

    html = fill(html);

    blank_remaining(html)
}

/// Replaces any `{{TOKEN}}` the caller did not fill with an empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}
