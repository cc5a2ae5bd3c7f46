//! `Content-Disposition` parsing and download filename resolution.
//!
//! Grammar handled (RFC 6266 / RFC 8187, leniently):
//!
//! ```text
//! disposition = type *( ";" param )
//! param       = name "=" ( token | quoted-string )
//! filename*   = charset "'" [ language ] "'" pct-encoded
//! ```
//!
//! Resolution order: `filename*` → `filename` → content-type default. Any
//! parse or decode failure falls through to the next step; it is never an
//! error.

use tracing::debug;

/// Fallback name when the response does not suggest one.
pub const DEFAULT_FILENAME: &str = "report.zip";

pub const SPREADSHEET_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const ZIP_MIME: &str = "application/zip";

/// A parsed `Content-Disposition` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    /// `attachment`, `inline`, ... lower-cased.
    pub kind: String,
    /// Parameters in header order, names lower-cased, values unquoted.
    pub params: Vec<(String, String)>,
}

impl ContentDisposition {
    pub fn parse(header: &str) -> Option<Self> {
        let mut parts = split_params(header).into_iter();
        let kind = parts.next()?.trim().to_ascii_lowercase();
        if kind.is_empty() || kind.contains('=') {
            return None;
        }

        let params = parts
            .filter_map(|part| {
                let (name, value) = part.split_once('=')?;
                let name = name.trim().to_ascii_lowercase();
                if name.is_empty() {
                    return None;
                }
                Some((name, unquote(value.trim())))
            })
            .collect();

        Some(Self { kind, params })
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Suggested filename, preferring the extended parameter.
    pub fn filename(&self) -> Option<String> {
        if let Some(ext) = self.param("filename*") {
            match decode_ext_value(ext) {
                Some(name) if !name.is_empty() => return Some(name),
                _ => debug!("Undecodable filename* value {ext:?}, trying filename"),
            }
        }

        let plain = self.param("filename")?;
        let decoded = urlencoding::decode(plain).ok()?.into_owned();
        if decoded.is_empty() {
            None
        } else {
            Some(decoded)
        }
    }
}

/// Split on `;` outside quoted strings.
fn split_params(header: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in header.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => {
                current.push(c);
                escaped = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ';' if !in_quotes => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts.retain(|p| !p.trim().is_empty());
    parts
}

fn unquote(value: &str) -> String {
    let Some(inner) = value.strip_prefix('"') else {
        return value.to_string();
    };
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode an RFC 8187 `charset'language'value`.
fn decode_ext_value(raw: &str) -> Option<String> {
    let mut pieces = raw.splitn(3, '\'');
    let charset = pieces.next()?.trim().to_ascii_lowercase();
    let _language = pieces.next()?;
    let encoded = pieces.next()?;

    let bytes = urlencoding::decode_binary(encoded.as_bytes());
    match charset.as_str() {
        "utf-8" | "utf8" => String::from_utf8(bytes.into_owned()).ok(),
        "iso-8859-1" | "latin1" => Some(bytes.iter().map(|&b| b as char).collect()),
        _ => None,
    }
}

/// Media type without parameters, lower-cased.
fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name.is_char_boundary(name.len() - suffix.len())
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Extension the content type requires, if any.
fn required_extension(content_type: Option<&str>) -> Option<&'static str> {
    match content_type.map(mime_essence).as_deref() {
        Some(SPREADSHEET_MIME) => Some(".xlsx"),
        Some(ZIP_MIME) => Some(".zip"),
        _ => None,
    }
}

/// Append the extension implied by the content type when it is missing.
pub fn repair_extension(filename: String, content_type: Option<&str>) -> String {
    match required_extension(content_type) {
        Some(ext) if !ends_with_ignore_case(&filename, ext) => filename + ext,
        _ => filename,
    }
}

/// Name used when the response suggests none: `report` plus the extension the
/// content type implies, `report.zip` otherwise.
pub fn default_filename(content_type: Option<&str>) -> String {
    match required_extension(content_type) {
        Some(ext) => format!("report{ext}"),
        None => DEFAULT_FILENAME.to_string(),
    }
}

/// Resolve the local filename for a report download.
pub fn resolve_filename(content_disposition: Option<&str>, content_type: Option<&str>) -> String {
    let suggested = content_disposition
        .and_then(ContentDisposition::parse)
        .and_then(|cd| cd.filename());

    match suggested {
        Some(name) => repair_extension(name, content_type),
        None => default_filename(content_type),
    }
}
