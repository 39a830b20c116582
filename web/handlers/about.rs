use std::io::Cursor;
use tiny_http::Response;
use tracing::warn;

use leafscan::gallery::{
    archive_url, build_sections, entry_for, load_example, GallerySection, ARCHIVE_LINKS,
    TUTORIAL_STEPS,
};
use leafscan::{ClassLabel, Error};

use crate::render::{render_page, Page};
use crate::state::SharedState;
use crate::util::html::html_escape;

// ---------------------------------------------------------------------------
// GET /about
// ---------------------------------------------------------------------------

pub fn handle_get(state: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let sections = build_sections(&state.config.gallery_dir);
    crate::routes::html_response(build_about_page(&sections))
}

// ---------------------------------------------------------------------------
// GET /gallery/{slug}/image.jpg  and  GET /gallery/{slug}/download
// ---------------------------------------------------------------------------

pub fn handle_example(slug: &str, download: bool, state: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let label = match ClassLabel::from_slug(slug) {
        Some(l) => l,
        None    => return crate::routes::not_found(),
    };
    let entry = entry_for(label);

    match load_example(&state.config.gallery_dir, entry) {
        Ok(example) if download => crate::routes::jpeg_download_response(example.jpeg, entry.download_name),
        Ok(example)             => crate::routes::jpeg_response(example.jpeg),
        Err(e @ Error::ExampleNotFound(_)) => crate::routes::text_response(404, &e.to_string()),
        Err(e) => {
            warn!(label = %label, error = %e, "example image unreadable");
            crate::routes::text_response(500, &e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Page builder
// ---------------------------------------------------------------------------

fn build_about_page(sections: &[GallerySection]) -> String {
    let tutorial: String = TUTORIAL_STEPS.iter().map(|step| {
        let points: String = step.points.iter()
            .map(|p| format!("<li>{}</li>", html_escape(p)))
            .collect();
        format!(
            r#"<div class="card"><div class="info-box"><strong>{}</strong></div><ul>{}</ul></div>"#,
            html_escape(step.title), points
        )
    }).collect();

    let gallery: String = sections.iter().map(section_html).collect();

    let archives: String = ARCHIVE_LINKS.iter().map(|(text, label)| {
        format!(
            r#"<a class="btn btn-secondary" href="{}" target="_blank" rel="noopener">{}</a>"#,
            html_escape(archive_url(*label)), html_escape(text)
        )
    }).collect();

    let content = format!(
        r#"<h1>📖 Disease Information & Usage Tutorial</h1>
<p>Detailed information about each disease, example images to download for testing, and a guide to using the application.</p>
<h2 class="divider">💡 How to use the application</h2>
<div class="cols">{tutorial}</div>
<h2 class="divider">🖼️ Disease gallery & information</h2>
{gallery}
<h2 class="divider">📂 Download more images</h2>
<p>Need more images for testing? Each class has a larger collection available at the links below.</p>
<div class="cols-5">{archives}</div>"#,
        tutorial = tutorial,
        gallery  = gallery,
        archives = archives,
    );

    render_page(Page::About, |tmpl| tmpl.replace("{{CONTENT}}", &content))
}

fn section_html(section: &GallerySection) -> String {
    let entry = section.entry;
    let slug  = entry.label.slug();

    let image_col = match &section.image {
        Ok(_) => format!(
            r#"<img class="example" src="/gallery/{slug}/image.jpg" alt="{caption}">
<p class="caption">{caption}</p>
<a class="btn btn-primary" href="/gallery/{slug}/download">Download this image</a>"#,
            slug = slug,
            caption = html_escape(entry.caption),
        ),
        Err(Error::ExampleNotFound(path)) => format!(
            r#"<div class="error-box">Example image not found at: {}. Make sure the gallery folder and its images exist.</div>"#,
            html_escape(&path.display().to_string())
        ),
        Err(e) => format!(
            r#"<div class="error-box">Example image could not be loaded: {}</div>"#,
            html_escape(&e.to_string())
        ),
    };

    let bullets: String = entry.bullets.iter()
        .map(|(k, v)| format!("<li><strong>{}:</strong> {}</li>", html_escape(k), html_escape(v)))
        .collect();
    let citation = entry.citation
        .map(|c| format!(r#"<p class="citation">Source: {}</p>"#, html_escape(c)))
        .unwrap_or_default();

    format!(
        r#"<details id="{slug}"><summary>{title}</summary>
<div class="cols-1-3">
  <div>{image_col}</div>
  <div><h3>{heading}</h3><ul>{bullets}</ul>{citation}</div>
</div></details>"#,
        slug      = slug,
        title     = html_escape(&entry.title()),
        image_col = image_col,
        heading   = html_escape(entry.heading),
        bullets   = bullets,
        citation  = citation,
    )
}
