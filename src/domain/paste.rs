use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A stored paste. Everything except `remaining_views` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteRecord {
    pub id: String,
    pub content: String,
    pub created_at: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub max_views: Option<u32>,
    #[serde(default)]
    pub remaining_views: Option<u32>,
}

/// Why a record can no longer be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoidReason {
    Expired,
    ViewLimitExceeded,
}

impl PasteRecord {
    pub fn new(paste: ValidPaste, now: i64) -> Self {
        let expires_at = paste.ttl_seconds.map(|ttl| now.saturating_add(i64::from(ttl) * 1000));
        Self {
            id: Uuid::new_v4().to_string(),
            content: paste.content,
            created_at: now,
            expires_at,
            max_views: paste.max_views,
            remaining_views: paste.max_views,
        }
    }

    /// Time expiry wins over an exhausted view budget.
    pub fn void_reason(&self, now: i64) -> Option<VoidReason> {
        if let Some(expires_at) = self.expires_at {
            if now >= expires_at {
                return Some(VoidReason::Expired);
            }
        }
        if self.max_views.is_some() && self.remaining_views.unwrap_or(0) == 0 {
            return Some(VoidReason::ViewLimitExceeded);
        }
        None
    }

    pub fn is_view_limited(&self) -> bool {
        self.max_views.is_some()
    }

    pub(crate) fn with_view_consumed(&self) -> Self {
        let mut next = self.clone();
        next.remaining_views = self.remaining_views.map(|v| v.saturating_sub(1));
        next
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPaste {
    pub content: String,
    pub remaining_views: Option<u32>,
    pub expires_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    NotFound,
    Expired,
    ViewLimitExceeded,
    Success(FetchedPaste),
}

impl From<VoidReason> for FetchOutcome {
    fn from(reason: VoidReason) -> Self {
        match reason {
            VoidReason::Expired => FetchOutcome::Expired,
            VoidReason::ViewLimitExceeded => FetchOutcome::ViewLimitExceeded,
        }
    }
}

/// Raw create input as it arrives from a client.
#[derive(Debug, Clone, Default)]
pub struct NewPaste {
    pub content: Option<String>,
    pub ttl_seconds: Option<i64>,
    pub max_views: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPaste {
    pub content: String,
    pub ttl_seconds: Option<u32>,
    pub max_views: Option<u32>,
}

/// A create field that failed validation, with the message shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidField {
    Content,
    TtlSeconds,
    MaxViews,
}

impl InvalidField {
    pub fn message(self) -> &'static str {
        match self {
            InvalidField::Content => "content is required",
            InvalidField::TtlSeconds => "ttl_seconds must be >= 1",
            InvalidField::MaxViews => "max_views must be >= 1",
        }
    }
}

impl std::fmt::Display for InvalidField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl NewPaste {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Self::default() }
    }

    pub fn with_ttl_seconds(mut self, ttl: i64) -> Self {
        self.ttl_seconds = Some(ttl);
        self
    }

    pub fn with_max_views(mut self, views: i64) -> Self {
        self.max_views = Some(views);
        self
    }

    /// Reads a JSON request body. `null` fields count as absent; a field of
    /// the wrong type is reported against that field.
    pub fn from_json(body: &Value) -> Result<Self, InvalidField> {
        let field = |name: &str| body.get(name).filter(|v| !v.is_null());
        let content = match field("content") {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(InvalidField::Content),
        };
        let integer = |name: &str, on_err: InvalidField| match field(name) {
            None => Ok(None),
            Some(v) => whole_number(v).map(Some).ok_or(on_err),
        };
        Ok(Self {
            content,
            ttl_seconds: integer("ttl_seconds", InvalidField::TtlSeconds)?,
            max_views: integer("max_views", InvalidField::MaxViews)?,
        })
    }

    pub fn validate(self) -> Result<ValidPaste, InvalidField> {
        let content = match self.content {
            Some(c) if !c.trim().is_empty() => c,
            _ => return Err(InvalidField::Content),
        };
        let ttl_seconds = positive(self.ttl_seconds).ok_or(InvalidField::TtlSeconds)?;
        let max_views = positive(self.max_views).ok_or(InvalidField::MaxViews)?;
        Ok(ValidPaste { content, ttl_seconds, max_views })
    }
}

// JSON numbers like `2.0` or `1e3` still count as integers.
fn whole_number(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| {
        v.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

// None is allowed; Some must be 1..=u32::MAX.
fn positive(value: Option<i64>) -> Option<Option<u32>> {
    match value {
        None => Some(None),
        Some(v) if v >= 1 => u32::try_from(v).ok().map(Some),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_content_rejected() {
        assert_eq!(NewPaste::new("   \n\t").validate(), Err(InvalidField::Content));
        assert_eq!(NewPaste::default().validate(), Err(InvalidField::Content));
    }

    #[test]
    fn test_non_positive_limits_rejected() {
        let err = NewPaste::new("x").with_ttl_seconds(0).validate();
        assert_eq!(err, Err(InvalidField::TtlSeconds));
        let err = NewPaste::new("x").with_max_views(-3).validate();
        assert_eq!(err, Err(InvalidField::MaxViews));
    }

    #[test]
    fn test_content_kept_untrimmed() {
        let valid = NewPaste::new("  hi  ").with_max_views(2).validate().unwrap();
        assert_eq!(valid.content, "  hi  ");
        assert_eq!(valid.max_views, Some(2));
        assert_eq!(valid.ttl_seconds, None);
    }

    #[test]
    fn test_from_json_field_types() {
        let body = serde_json::json!({"content": "x", "ttl_seconds": null, "max_views": 2});
        let paste = NewPaste::from_json(&body).unwrap();
        assert_eq!(paste.ttl_seconds, None);
        assert_eq!(paste.max_views, Some(2));

        let body = serde_json::json!({"content": "x", "ttl_seconds": 1.5});
        assert_eq!(NewPaste::from_json(&body).unwrap_err(), InvalidField::TtlSeconds);
        let body = serde_json::json!({"content": "x", "max_views": "3"});
        assert_eq!(NewPaste::from_json(&body).unwrap_err(), InvalidField::MaxViews);
        let body = serde_json::json!({"content": 42});
        assert_eq!(NewPaste::from_json(&body).unwrap_err(), InvalidField::Content);
    }

    #[test]
    fn test_from_json_accepts_integral_floats() {
        let body: Value = serde_json::from_str(r#"{"content":"x","ttl_seconds":2.0,"max_views":1e3}"#).unwrap();
        let paste = NewPaste::from_json(&body).unwrap();
        assert_eq!(paste.ttl_seconds, Some(2));
        assert_eq!(paste.max_views, Some(1_000));

        let body: Value = serde_json::from_str(r#"{"content":"x","max_views":1e300}"#).unwrap();
        assert_eq!(NewPaste::from_json(&body).unwrap_err(), InvalidField::MaxViews);
    }

    #[test]
    fn test_new_record_budgets() {
        let valid = NewPaste::new("a").with_ttl_seconds(5).with_max_views(3).validate().unwrap();
        let record = PasteRecord::new(valid, 1_000);
        assert_eq!(record.created_at, 1_000);
        assert_eq!(record.expires_at, Some(6_000));
        assert_eq!(record.max_views, Some(3));
        assert_eq!(record.remaining_views, Some(3));
    }

    #[test]
    fn test_expiry_takes_priority() {
        let valid = NewPaste::new("a").with_ttl_seconds(1).with_max_views(1).validate().unwrap();
        let mut record = PasteRecord::new(valid, 0);
        record.remaining_views = Some(0);
        assert_eq!(record.void_reason(999), Some(VoidReason::ViewLimitExceeded));
        assert_eq!(record.void_reason(1_000), Some(VoidReason::Expired));
    }

    #[test]
    fn test_unlimited_never_void() {
        let record = PasteRecord::new(NewPaste::new("a").validate().unwrap(), 0);
        assert_eq!(record.void_reason(i64::MAX), None);
    }
}
