use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::paste::FetchedPaste;

/// JSON shape of a served paste. Absent limits are serialized as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiView {
    pub content: String,
    pub remaining_views: Option<u32>,
    pub expires_at: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expiry {0} ms is outside the representable date range")]
pub struct UnrepresentableExpiry(pub i64);

impl TryFrom<FetchedPaste> for ApiView {
    type Error = UnrepresentableExpiry;

    fn try_from(paste: FetchedPaste) -> Result<Self, Self::Error> {
        Ok(Self {
            expires_at: paste.expires_at.map(expiry_text).transpose()?,
            remaining_views: paste.remaining_views,
            content: paste.content,
        })
    }
}

fn expiry_text(ms: i64) -> Result<String, UnrepresentableExpiry> {
    iso8601(ms).ok_or(UnrepresentableExpiry(ms))
}

/// UTC timestamp with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
/// Years outside 0..=9999 get a sign and six digits (`+010000-01-01T...`).
pub fn iso8601(ms: i64) -> Option<String> {
    let at = OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000).ok()?;
    let year = at.year();
    let year = if (0..=9999).contains(&year) {
        format!("{year:04}")
    } else {
        format!("{}{:06}", if year < 0 { '-' } else { '+' }, year.unsigned_abs())
    };
    Some(format!(
        "{year}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
        at.millisecond(),
    ))
}

/// Full HTML page for a served paste. Only `&`, `<` and `>` are escaped.
pub fn render_html(paste: &FetchedPaste) -> Result<String, UnrepresentableExpiry> {
    let safe = html_escape::encode_text(&paste.content);
    let mut meta = String::new();
    if let Some(left) = paste.remaining_views {
        meta.push_str(&format!("\n      <p>Remaining views: {left}</p>"));
    }
    if let Some(at) = paste.expires_at.map(expiry_text).transpose()? {
        meta.push_str(&format!("\n      <p>Expires at: {at}</p>"));
    }
    Ok(format!(
        r#"<!doctype html>
<html>
    <head><meta charset="utf-8"><title>Paste</title></head>
    <body>
      <h2>Paste Content</h2>
      <pre>{safe}</pre>{meta}
    </body>
</html>"#
    ))
}
