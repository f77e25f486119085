//! Wire representations and content negotiation.
//!
//! Every entity has two independent mappings: [`Render::to_json`] builds a
//! JSON value and [`Render::write_xml`] writes XML elements. Both use the
//! same field names. Nothing here derives the wire shape from the structs,
//! so changing a Rust field name never silently changes the API.

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::model::{
    Address, ContactInfo, Nested, NotificationSettings, Preferences, PrivacySettings, Profile, User,
};
use crate::response::{ContentType, Response};
use crate::status::Status;

pub type XmlWriter = Writer<Vec<u8>>;
pub type XmlResult = Result<(), quick_xml::Error>;

/// Representation picked from the request's `Accept` header.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Format {
    #[default]
    Json,
    Xml,
}

impl Format {
    /// Picks the highest-`q` media range we can produce. Ties keep header
    /// order. No header, or nothing we can produce, means JSON.
    pub fn negotiate(accept: Option<&str>) -> Self {
        let Some(accept) = accept else { return Self::Json };

        let mut ranges: Vec<(f32, Format)> = accept
            .split(',')
            .filter_map(|range| {
                let mut parts = range.split(';').map(str::trim);
                let media = parts.next()?.to_ascii_lowercase();
                let q = parts
                    .find_map(|p| p.strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                let format = match media.as_str() {
                    "application/xml" | "text/xml" => Format::Xml,
                    "application/json" | "application/*" | "*/*" => Format::Json,
                    _ => return None,
                };
                (q > 0.0).then_some((q, format))
            })
            .collect();

        ranges.sort_by(|a, b| b.0.total_cmp(&a.0));
        ranges.first().map_or(Self::Json, |(_, format)| *format)
    }
}

/// Two mappings of one entity: a JSON value and XML child elements.
pub trait Render {
    /// Name of the enclosing XML element.
    fn xml_root(&self) -> &'static str;

    fn to_json(&self) -> Value;

    /// Writes the children of the root element.
    fn write_xml(&self, w: &mut XmlWriter) -> XmlResult;

    fn to_xml(&self) -> Result<Vec<u8>, quick_xml::Error> {
        let mut w = Writer::new(Vec::new());
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        element(&mut w, self.xml_root(), |w| self.write_xml(w))?;
        Ok(w.into_inner())
    }
}

/// Renders `value` in `format` with `status`. Encoding failures become an
/// [`ApiError::Internal`] answered in plain text.
pub fn respond<T: Render + ?Sized>(format: Format, status: Status, value: &T) -> Response {
    let encoded = match format {
        Format::Json => serde_json::to_vec(&value.to_json())
            .map(|body| (ContentType::Json, body))
            .map_err(|e| e.to_string()),
        Format::Xml => value
            .to_xml()
            .map(|body| (ContentType::Xml, body))
            .map_err(|e| e.to_string()),
    };
    match encoded {
        Ok((content_type, body)) => Response::builder().status(status).bytes(content_type, body),
        Err(e) => {
            let err = ApiError::Internal(format!("failed to encode response: {e}"));
            tracing::error!(?format, "{err}");
            encoding_failed(&err)
        }
    }
}

// The negotiated format is what just failed, so fall back to plain text.
fn encoding_failed(err: &ApiError) -> Response {
    Response::builder().status(err.status()).text(err.to_string())
}

/// Renders an [`ApiError`] as `{ "error": … }` with its status.
pub fn error(format: Format, err: &ApiError) -> Response {
    respond(format, err.status(), &ErrorBody(err.to_string()))
}

/// `{ "message": … }` for successes that carry no entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody(pub String);

// ── XML helpers ───────────────────────────────────────────────────────────────

fn element(
    w: &mut XmlWriter,
    name: &str,
    children: impl FnOnce(&mut XmlWriter) -> XmlResult,
) -> XmlResult {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    children(w)?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text(w: &mut XmlWriter, name: &str, value: &str) -> XmlResult {
    element(w, name, |w| {
        w.write_event(Event::Text(BytesText::new(value)))?;
        Ok(())
    })
}

/// Absent optionals are omitted, matching their absence from the JSON.
fn optional(w: &mut XmlWriter, name: &str, value: Option<&str>) -> XmlResult {
    match value {
        Some(value) => text(w, name, value),
        None => Ok(()),
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ── Entities ──────────────────────────────────────────────────────────────────

impl Render for User {
    fn xml_root(&self) -> &'static str { "user" }

    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "address": self.address.to_json(),
            "contact": self.contact.to_json(),
            "profile": self.profile.to_json(),
            "preferences": self.preferences.to_json(),
            "created_at": timestamp(&self.created_at),
            "updated_at": timestamp(&self.updated_at),
        })
    }

    fn write_xml(&self, w: &mut XmlWriter) -> XmlResult {
        text(w, "id", &self.id.to_string())?;
        text(w, "name", &self.name)?;
        text(w, "email", &self.email)?;
        element(w, "address", |w| self.address.write_xml(w))?;
        element(w, "contact", |w| self.contact.write_xml(w))?;
        element(w, "profile", |w| self.profile.write_xml(w))?;
        element(w, "preferences", |w| self.preferences.write_xml(w))?;
        text(w, "created_at", &timestamp(&self.created_at))?;
        text(w, "updated_at", &timestamp(&self.updated_at))
    }
}

impl Render for Vec<User> {
    fn xml_root(&self) -> &'static str { "users" }

    fn to_json(&self) -> Value {
        Value::Array(self.iter().map(Render::to_json).collect())
    }

    fn write_xml(&self, w: &mut XmlWriter) -> XmlResult {
        for user in self {
            element(w, user.xml_root(), |w| user.write_xml(w))?;
        }
        Ok(())
    }
}

impl Render for Address {
    fn xml_root(&self) -> &'static str { "address" }

    fn to_json(&self) -> Value {
        json!({
            "street": self.street,
            "city": self.city,
            "state": self.state,
            "postal_code": self.postal_code,
            "country": self.country,
        })
    }

    fn write_xml(&self, w: &mut XmlWriter) -> XmlResult {
        text(w, "street", &self.street)?;
        text(w, "city", &self.city)?;
        text(w, "state", &self.state)?;
        text(w, "postal_code", &self.postal_code)?;
        text(w, "country", &self.country)
    }
}

impl Render for ContactInfo {
    fn xml_root(&self) -> &'static str { "contact" }

    fn to_json(&self) -> Value {
        let mut doc = json!({ "phone": self.phone });
        if let Some(alt) = &self.alternate_email {
            doc["alternate_email"] = json!(alt);
        }
        if let Some(site) = &self.website {
            doc["website"] = json!(site);
        }
        doc
    }

    fn write_xml(&self, w: &mut XmlWriter) -> XmlResult {
        text(w, "phone", &self.phone)?;
        optional(w, "alternate_email", self.alternate_email.as_deref())?;
        optional(w, "website", self.website.as_deref())
    }
}

impl Render for Profile {
    fn xml_root(&self) -> &'static str { "profile" }

    fn to_json(&self) -> Value {
        let mut doc = json!({ "experience": self.experience });
        if !self.skills.is_empty() {
            doc["skills"] = json!(self.skills);
        }
        if let Some(bio) = &self.bio {
            doc["bio"] = json!(bio);
        }
        if let Some(avatar) = &self.avatar {
            doc["avatar"] = json!(avatar);
        }
        doc
    }

    fn write_xml(&self, w: &mut XmlWriter) -> XmlResult {
        optional(w, "bio", self.bio.as_deref())?;
        optional(w, "avatar", self.avatar.as_deref())?;
        if !self.skills.is_empty() {
            element(w, "skills", |w| {
                for skill in &self.skills {
                    text(w, "skill", skill)?;
                }
                Ok(())
            })?;
        }
        text(w, "experience", &self.experience.to_string())
    }
}

impl Render for Preferences {
    fn xml_root(&self) -> &'static str { "preferences" }

    fn to_json(&self) -> Value {
        json!({
            "theme": self.theme,
            "language": self.language,
            "notifications": self.notifications.to_json(),
            "privacy": self.privacy.to_json(),
        })
    }

    fn write_xml(&self, w: &mut XmlWriter) -> XmlResult {
        text(w, "theme", &self.theme)?;
        text(w, "language", &self.language)?;
        element(w, "notifications", |w| self.notifications.write_xml(w))?;
        element(w, "privacy", |w| self.privacy.write_xml(w))
    }
}

impl Render for NotificationSettings {
    fn xml_root(&self) -> &'static str { "notifications" }

    fn to_json(&self) -> Value {
        json!({
            "email": self.email,
            "sms": self.sms,
            "push": self.push,
            "marketing": self.marketing,
        })
    }

    fn write_xml(&self, w: &mut XmlWriter) -> XmlResult {
        text(w, "email", &self.email.to_string())?;
        text(w, "sms", &self.sms.to_string())?;
        text(w, "push", &self.push.to_string())?;
        text(w, "marketing", &self.marketing.to_string())
    }
}

impl Render for PrivacySettings {
    fn xml_root(&self) -> &'static str { "privacy" }

    fn to_json(&self) -> Value {
        json!({
            "profile_visible": self.profile_visible,
            "show_email": self.show_email,
            "show_phone": self.show_phone,
        })
    }

    fn write_xml(&self, w: &mut XmlWriter) -> XmlResult {
        text(w, "profile_visible", &self.profile_visible.to_string())?;
        text(w, "show_email", &self.show_email.to_string())?;
        text(w, "show_phone", &self.show_phone.to_string())
    }
}

impl Render for Nested {
    fn xml_root(&self) -> &'static str {
        self.section().as_str()
    }

    fn to_json(&self) -> Value {
        match self {
            Nested::Address(v)     => v.to_json(),
            Nested::Profile(v)     => v.to_json(),
            Nested::Preferences(v) => v.to_json(),
        }
    }

    fn write_xml(&self, w: &mut XmlWriter) -> XmlResult {
        match self {
            Nested::Address(v)     => v.write_xml(w),
            Nested::Profile(v)     => v.write_xml(w),
            Nested::Preferences(v) => v.write_xml(w),
        }
    }
}

impl Render for Message {
    fn xml_root(&self) -> &'static str { "response" }

    fn to_json(&self) -> Value {
        json!({ "message": self.0 })
    }

    fn write_xml(&self, w: &mut XmlWriter) -> XmlResult {
        text(w, "message", &self.0)
    }
}

impl Render for ErrorBody {
    fn xml_root(&self) -> &'static str { "response" }

    fn to_json(&self) -> Value {
        json!({ "error": self.0 })
    }

    fn write_xml(&self, w: &mut XmlWriter) -> XmlResult {
        text(w, "error", &self.0)
    }
}
