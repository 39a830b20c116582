//! Minimal multipart/form-data reader for the classify form.
//!
//! The form carries at most two small file fields, so the whole body is
//! buffered and split on the boundary in one pass.

/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
        .filter(|b| !b.is_empty())
}

/// One field of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part<'a> {
    pub name: String,
    pub filename: Option<String>,
    pub data: &'a [u8],
}

/// Parses every part that has a `Content-Disposition` name.
pub fn parts<'a>(body: &'a [u8], boundary: &str) -> Vec<Part<'a>> {
    let delimiter = format!("--{}", boundary);
    let sep = b"\r\n\r\n";

    split_on(body, delimiter.as_bytes())
        .into_iter()
        .filter_map(|raw| {
            let sep_pos = find_subsequence(raw, sep)?;
            let headers = String::from_utf8_lossy(&raw[..sep_pos]);
            let name = quoted_param(&headers, "name")?;
            let filename = quoted_param(&headers, "filename");
            let data = &raw[sep_pos + sep.len()..];
            let data = data.strip_suffix(b"\r\n").unwrap_or(data);
            Some(Part { name, filename, data })
        })
        .collect()
}

/// Bytes of the named file field, if the browser sent one with content.
pub fn file_field(body: &[u8], boundary: &str, field_name: &str) -> Option<Vec<u8>> {
    parts(body, boundary)
        .into_iter()
        .find(|p| p.name == field_name && p.filename.is_some() && !p.data.is_empty())
        .map(|p| p.data.to_vec())
}

/// Parses `key="value"` out of a Content-Disposition header block.
/// `name=` must not match the tail of `filename=`.
fn quoted_param(headers: &str, key: &str) -> Option<String> {
    let needle = format!("{}=\"", key);
    let mut search_from = 0;
    while let Some(rel) = headers[search_from..].find(&needle) {
        let pos = search_from + rel;
        let preceded_ok = pos == 0
            || matches!(headers.as_bytes()[pos - 1], b' ' | b';' | b'\t');
        let rest = &headers[pos + needle.len()..];
        if preceded_ok {
            let end = rest.find('"')?;
            return Some(rest[..end].to_owned());
        }
        search_from = pos + needle.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "----leafscanBoundary";

    fn body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, filename, data) in parts {
            out.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            let disposition = match filename {
                Some(f) => format!("Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n", name, f),
                None => format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name),
            };
            out.extend_from_slice(disposition.as_bytes());
            out.extend_from_slice(data);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        out
    }

    #[test]
    fn boundary_from_content_type() {
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=\"abc\""),
            Some("abc".to_owned())
        );
        assert_eq!(extract_boundary("multipart/form-data"), None);
    }

    #[test]
    fn picks_file_by_field_name() {
        let b = body(&[
            ("camera_photo", Some("capture.jpg"), &b"CAM"[..]),
            ("image_file", Some("leaf.png"), &b"UPL"[..]),
        ]);
        assert_eq!(file_field(&b, BOUNDARY, "image_file"), Some(b"UPL".to_vec()));
        assert_eq!(file_field(&b, BOUNDARY, "camera_photo"), Some(b"CAM".to_vec()));
    }

    #[test]
    fn empty_file_input_counts_as_absent() {
        let b = body(&[("camera_photo", Some(""), &b""[..]), ("image_file", Some("leaf.png"), &b"UPL"[..])]);
        assert_eq!(file_field(&b, BOUNDARY, "camera_photo"), None);
    }

    #[test]
    fn name_does_not_match_filename_attribute() {
        let b = body(&[("note", None, &b"hello"[..])]);
        let ps = parts(&b, BOUNDARY);
        assert_eq!(ps.len(), 1);
        assert_eq!(ps[0].name, "note");
        assert_eq!(ps[0].filename, None);
        assert_eq!(file_field(&b, BOUNDARY, "note"), None);
    }

    #[test]
    fn binary_payload_survives() {
        let payload = [0u8, 13, 10, 255, 13, 10, 13, 10, 7];
        let b = body(&[("image_file", Some("x.png"), &payload[..])]);
        assert_eq!(file_field(&b, BOUNDARY, "image_file"), Some(payload.to_vec()));
    }
}
