use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::debug;

use crate::handlers;
use crate::state::SharedState;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn with_body(status: u16, content_type: &str, body: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    let len = body.len();
    Response::new(
        StatusCode(status),
        vec![Header::from_bytes(b"Content-Type", content_type.as_bytes()).unwrap()],
        Cursor::new(body),
        Some(len),
        None,
    )
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    html_with_status(200, body)
}

pub fn html_with_status(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    with_body(status, "text/html; charset=utf-8", body.into_bytes())
}

pub fn text_response(status: u16, body: &str) -> Response<Cursor<Vec<u8>>> {
    with_body(status, "text/plain; charset=utf-8", body.as_bytes().to_vec())
}

pub fn jpeg_response(bytes: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    with_body(200, "image/jpeg", bytes)
}

/// Serves `bytes` as an attachment so the browser saves it as `filename`.
pub fn jpeg_download_response(bytes: Vec<u8>, filename: &str) -> Response<Cursor<Vec<u8>>> {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    jpeg_response(bytes)
        .with_header(Header::from_bytes(b"Content-Disposition", disposition.as_bytes()).unwrap())
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    text_response(404, "404 Not Found")
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Gallery asset paths: `/gallery/{slug}/image.jpg` and `/gallery/{slug}/download`.
fn gallery_asset(path: &str) -> Option<(&str, bool)> {
    let rest = path.strip_prefix("/gallery/")?;
    if let Some(slug) = rest.strip_suffix("/image.jpg") {
        Some((slug, false))
    } else {
        rest.strip_suffix("/download").map(|slug| (slug, true))
    }
}

/// Dispatches one request and writes the response.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();
    let path   = url.split('?').next().unwrap_or("").to_owned();

    debug!(%method, %path, "request");

    if method == Method::Get {
        if let Some((slug, download)) = gallery_asset(&path) {
            let resp = handlers::about::handle_example(slug, download, &state);
            let _ = request.respond(resp);
            return;
        }
    }

    let response = match (method, path.as_str()) {
        // ── Home ─────────────────────────────────────────────────────────
        (Method::Get,  "/")         => handlers::home::handle_get(),
        (Method::Post, "/classify") => handlers::home::handle_classify(&mut request, &state),

        // ── About ────────────────────────────────────────────────────────
        (Method::Get, "/about")     => handlers::about::handle_get(&state),

        // ── Health ───────────────────────────────────────────────────────
        (Method::Get, "/healthz")   => handlers::health::handle_get(&state),

        // ── 404 ──────────────────────────────────────────────────────────
        _ => not_found(),
    };

    let _ = request.respond(response);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gallery_paths_are_recognised() {
        assert_eq!(gallery_asset("/gallery/downy-mildew/image.jpg"), Some(("downy-mildew", false)));
        assert_eq!(gallery_asset("/gallery/fresh-leaf/download"), Some(("fresh-leaf", true)));
        assert_eq!(gallery_asset("/gallery/fresh-leaf"), None);
        assert_eq!(gallery_asset("/about"), None);
    }
}

/// Helpers for driving handlers without a socket.
#[cfg(test)]
pub mod testing {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tiny_http::{HTTPVersion, Header, Method, Request, Response, TestRequest};

    use leafscan::{AppConfig, Classifier, LazyModel};

    use crate::state::{AppState, SharedState};

    pub const BOUNDARY: &str = "leafscanTestBoundary";

    /// State whose model loader counts its calls and always fails.
    pub fn state_without_model(config: AppConfig) -> (SharedState, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let model: LazyModel<Box<dyn Classifier>> = LazyModel::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(leafscan::Error::ModelNotFound("missing.onnx".into()))
        });
        (Arc::new(AppState::with_model(config, model)), calls)
    }

    /// Multipart body with one file part per `(field, filename, data)`.
    pub fn form(parts: &[(&str, &str, &str)]) -> String {
        let mut out = String::new();
        for (name, filename, data) in parts {
            out.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n{}\r\n",
                BOUNDARY, name, filename, data
            ));
        }
        out.push_str(&format!("--{}--\r\n", BOUNDARY));
        out
    }

    /// `POST /classify` carrying `body` as multipart/form-data.
    pub fn classify_request(body: String) -> Request {
        let content_type = format!("multipart/form-data; boundary={}", BOUNDARY);
        TestRequest::new()
            .with_method(Method::Post)
            .with_path("/classify")
            .with_header(Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()).unwrap())
            .with_header(Header::from_bytes(&b"Content-Length"[..], body.len().to_string().as_bytes()).unwrap())
            .with_body(Box::leak(body.into_boxed_str()))
            .into()
    }

    /// A response as it would go over the wire.
    pub struct Sent {
        pub status: u16,
        pub head: String,
        pub body: Vec<u8>,
    }

    impl Sent {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.head.lines().skip(1).find_map(|line| {
                let (field, value) = line.split_once(": ")?;
                field.eq_ignore_ascii_case(name).then_some(value)
            })
        }

        pub fn text(&self) -> String {
            String::from_utf8_lossy(&self.body).into_owned()
        }
    }

    pub fn send(response: Response<Cursor<Vec<u8>>>) -> Sent {
        let status = response.status_code().0;
        let mut wire = Vec::new();
        // HTTP/1.0 keeps the body unchunked
        response.raw_print(&mut wire, HTTPVersion(1, 0), &[], false, None).unwrap();
        let split = wire.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        Sent {
            status,
            head: String::from_utf8_lossy(&wire[..split]).into_owned(),
            body: wire[split + 4..].to_vec(),
        }
    }
}
