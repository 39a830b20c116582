use std::io::{Cursor, Read};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageOutputFormat};
use tiny_http::{Request, Response};
use tracing::{error, info, warn};

use leafscan::decision::{
    format_confidence, Decision, Outcome, REJECTION_HINT, REJECTION_MESSAGE, SUCCESS_MESSAGE,
};
use leafscan::{classify_image, decode_input, select_source};

use crate::render::{render_page, Page};
use crate::state::SharedState;
use crate::util::html::{emphasis_to_html, html_escape};
use crate::util::multipart::{extract_boundary, file_field};

const INTRO: &str = "This application uses a deep-learning (CNN) model to classify diseases \
    of cucumber leaves from a photo. The model can predict Anthracnose, Bacterial Wilt, \
    Downy Mildew, Fresh Leaf and Gummy Stem Blight. Upload an image or use the camera to \
    photograph a leaf.";

const NO_INPUT: &str = "Please take a photo or upload an image to start the analysis.";
const WAITING: &str = "Waiting for an image to analyse.";

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub fn handle_get() -> Response<Cursor<Vec<u8>>> {
    crate::routes::html_response(build_home_page(&info_html(WAITING)))
}

// ---------------------------------------------------------------------------
// POST /classify
// ---------------------------------------------------------------------------

pub fn handle_classify(request: &mut Request, state: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let limit = state.config.max_upload_bytes;

    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    let boundary = match extract_boundary(&content_type) {
        Some(b) if content_type.starts_with("multipart/form-data") => b,
        _ => return page_with_status(400, &error_html("Invalid form submission.")),
    };

    if request.body_length().map_or(false, |len| len > limit) {
        return page_with_status(413, &error_html(&too_large(limit)));
    }

    let mut body: Vec<u8> = Vec::new();
    if let Err(e) = request.as_reader().take(limit as u64 + 1).read_to_end(&mut body) {
        warn!(error = %e, "failed to read request body");
        return page_with_status(400, &error_html("The upload could not be read."));
    }
    if body.len() > limit {
        return page_with_status(413, &error_html(&too_large(limit)));
    }

    let camera = file_field(&body, &boundary, "camera_photo");
    let upload = file_field(&body, &boundary, "image_file");
    let source = match select_source(camera, upload) {
        Some(s) => s,
        None    => return crate::routes::html_response(build_home_page(&info_html(NO_INPUT))),
    };
    info!(source = source.kind(), bytes = source.bytes().len(), "classify request");

    // A bad upload is the client's fault even when the model is unavailable.
    let image = match decode_input(source.bytes()) {
        Ok(img) => img,
        Err(e)  => return page_with_status(400, &error_html(&e.to_string())),
    };

    let model = match state.model.get() {
        Ok(m)  => m,
        Err(e) => {
            error!(error = %e, "classifier unavailable");
            return page_with_status(500, &error_html(&format!("The model could not be loaded: {}", e)));
        }
    };

    match classify_image(&image, &**model) {
        Ok(decision) => {
            crate::routes::html_response(build_home_page(&result_html(&image, &decision)))
        }
        Err(e) => {
            error!(error = %e, "classification failed");
            page_with_status(500, &error_html(&format!("Classification failed: {}", e)))
        }
    }
}

fn too_large(limit: usize) -> String {
    format!("The image is too large (limit {} MB).", limit / (1024 * 1024))
}

fn page_with_status(status: u16, result: &str) -> Response<Cursor<Vec<u8>>> {
    crate::routes::html_with_status(status, build_home_page(result))
}

// ---------------------------------------------------------------------------
// Page builder
// ---------------------------------------------------------------------------

fn build_home_page(result_section: &str) -> String {
    let content = format!(
        r#"<h1>🌱 Cucumber Leaf Disease Classification</h1>
<p>{intro}</p>
<div class="cols">
  <div class="card">
    <h2>🖼️ Image Input</h2>
    <form method="POST" action="/classify" enctype="multipart/form-data">
      <label for="camera_photo">Take a photo with the camera</label>
      <input type="file" id="camera_photo" name="camera_photo" accept="image/jpeg,image/png" capture="environment">
      <label for="image_file">Or choose an image from your device...</label>
      <input type="file" id="image_file" name="image_file" accept=".jpg,.jpeg,.png,image/jpeg,image/png">
      <p class="hint">JPG, JPEG or PNG. A camera photo is used when both are given.</p>
      <img id="preview" alt="Selected image">
      <div><button type="submit" class="btn btn-primary">Classify!</button></div>
    </form>
  </div>
  <div class="card">
    <h2>📊 Analysis Result</h2>
    {result}
  </div>
</div>
<script>
['camera_photo', 'image_file'].forEach(function(id) {{
  document.getElementById(id).addEventListener('change', function() {{
    if (!this.files.length) return;
    var img = document.getElementById('preview');
    img.src = URL.createObjectURL(this.files[0]);
    img.style.display = 'block';
  }});
}});
</script>"#,
        intro  = html_escape(INTRO),
        result = result_section,
    );

    render_page(Page::Home, |tmpl| tmpl.replace("{{CONTENT}}", &content))
}

// ---------------------------------------------------------------------------
// Result formatters
// ---------------------------------------------------------------------------

fn result_html(image: &DynamicImage, decision: &Decision) -> String {
    let preview = image_data_uri(image)
        .map(|uri| format!(
            r#"<img class="analysed" src="{}" alt="Analysed image"><p class="caption">Analysed image</p>"#,
            uri
        ))
        .unwrap_or_default();

    let verdict = match &decision.outcome {
        Outcome::Classified { prediction, guidance } => {
            let guidance_box = if prediction.label.is_healthy() { "info-box" } else { "warning-box" };
            format!(
                r#"<div class="success-box">{success}</div>
<div class="metric"><div class="metric-label">Classification result</div><div class="prediction-hero">{label}</div></div>
<div class="metric"><div class="metric-label">Confidence</div><div class="prediction-hero">{conf}</div></div>
<div class="{guidance_box}">{guidance}</div>"#,
                success      = SUCCESS_MESSAGE,
                label        = html_escape(prediction.label.name()),
                conf         = format_confidence(prediction.confidence),
                guidance_box = guidance_box,
                guidance     = emphasis_to_html(&guidance.message()),
            )
        }
        Outcome::Rejected { .. } => format!(
            r#"<div class="error-box">{}</div><div class="warning-box">{}</div>"#,
            REJECTION_MESSAGE, REJECTION_HINT
        ),
    };

    format!("{}{}{}", preview, verdict, probability_table(decision))
}

fn probability_table(decision: &Decision) -> String {
    let best = decision.ranked.first().map(|(l, _)| *l);
    let rows: String = decision.ranked.iter().map(|(label, p)| {
        let width = (p.clamp(0.0, 1.0) * 260.0) as u32;
        let dim   = if Some(*label) != best { " dim" } else { "" };
        format!(
            r#"<tr><td>{}</td><td><div class="bar-wrap"><div class="bar-fill{}" style="width:{}px"></div></div></td><td class="prob-pct">{}</td></tr>"#,
            html_escape(label.name()), dim, width, format_confidence(*p)
        )
    }).collect();

    format!(
        r#"<details><summary>All class probabilities</summary>
<table class="prob-table"><tbody>{}</tbody></table></details>"#,
        rows
    )
}

fn image_data_uri(image: &DynamicImage) -> Option<String> {
    let mut buf = Vec::new();
    match image.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Jpeg(85)) {
        Ok(()) => Some(format!("data:image/jpeg;base64,{}", STANDARD.encode(&buf))),
        Err(e) => {
            warn!(error = %e, "could not re-encode analysed image for preview");
            None
        }
    }
}

fn info_html(msg: &str) -> String {
    format!(r#"<div class="info-box">{}</div>"#, html_escape(msg))
}

fn error_html(msg: &str) -> String {
    format!(r#"<div class="error-box">{}</div>"#, html_escape(msg))
}
