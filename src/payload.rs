//! Payload encoding.
//!
//! Turns one of the structured [`ContentModel`] variants into the exact text
//! embedded in the code. Scanner apps parse these strings (vCard 3.0,
//! iCalendar, `mailto:`, `sms:`, `wa.me` links), so the layout of every
//! variant is fixed down to line order and separators.
//!
//! Encoding is total: any field values, including empty strings, produce a
//! payload. Validation warnings are the caller's business.
//!
//! # Example
//!
//! ```rust
//! use qirust_studio::payload::{encode, ContentModel, MessagingLink};
//!
//! let model = ContentModel::MessagingLink(MessagingLink {
//!     phone_digits: "+1 (234) 567-8900".into(),
//!     message: String::new(),
//! });
//! assert_eq!(encode(&model), "https://wa.me/12345678900");
//! ```

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Bytes left untouched by URI component encoding: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Structured user input for one content type.
///
/// Serialized with a `kind` discriminator, e.g.
/// `{"kind":"sms","phoneDigits":"555","message":"hi"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentModel {
    Url(UrlText),
    Contact(Contact),
    MessagingLink(MessagingLink),
    Email(Email),
    Sms(Sms),
    Event(Event),
}

/// Raw URL or arbitrary text, encoded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UrlText {
    pub text: String,
}

/// Contact card fields, encoded as a vCard 3.0 block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub company: String,
    pub job_title: String,
    pub website: String,
}

/// A `wa.me` deep link with an optional prefilled message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MessagingLink {
    pub phone_digits: String,
    pub message: String,
}

/// A `mailto:` link with optional subject and body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Email {
    pub address: String,
    pub subject: String,
    pub body: String,
}

/// An `sms:` link with an optional body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sms {
    pub phone_digits: String,
    pub message: String,
}

/// Calendar event, encoded as an iCalendar VEVENT.
///
/// `start_date_time` and `end_date_time` are local wall-clock strings in
/// `YYYY-MM-DDTHH:mm` form, as produced by a `datetime-local` input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    pub title: String,
    pub location: String,
    pub start_date_time: String,
    pub end_date_time: Option<String>,
    pub description: String,
}

/// How event date-times are written into `DTSTART` / `DTEND`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventTime {
    /// Local digits reused with a `Z` suffix. Wrong outside UTC, but it is
    /// what existing codes contain.
    #[default]
    NaiveUtc,
    /// RFC 5545 floating time: local digits without a zone suffix.
    Floating,
}

/// Knobs for [`encode_with`]. The default reproduces [`encode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncodeOptions {
    /// Escape `\`, `;`, `,` and newlines in TEXT properties (`N`, `FN`,
    /// `ORG`, `TITLE`, `SUMMARY`, `LOCATION`, `DESCRIPTION`). Phone, email
    /// and URL values stay verbatim.
    pub escape_text: bool,
    pub event_time: EventTime,
}

/// Encodes a content model into its payload string.
///
/// Field values are inserted verbatim and event times use the naive UTC
/// transform. See [`encode_with`] for the corrected variants.
pub fn encode(model: &ContentModel) -> String {
    encode_with(model, &EncodeOptions::default())
}

/// Encodes a content model with explicit options.
pub fn encode_with(model: &ContentModel, options: &EncodeOptions) -> String {
    match model {
        ContentModel::Url(url) => url.text.clone(),
        ContentModel::Contact(contact) => encode_contact(contact, options),
        ContentModel::MessagingLink(link) => encode_messaging_link(link),
        ContentModel::Email(email) => encode_email(email),
        ContentModel::Sms(sms) => encode_sms(sms),
        ContentModel::Event(event) => encode_event(event, options),
    }
}

fn encode_contact(contact: &Contact, options: &EncodeOptions) -> String {
    let text = |value: &str| text_value(value, options);
    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("N:{};{};;;", text(&contact.last_name), text(&contact.first_name)),
        format!("FN:{} {}", text(&contact.first_name), text(&contact.last_name)),
        format!("ORG:{}", text(&contact.company)),
    ];
    if !contact.job_title.is_empty() {
        lines.push(format!("TITLE:{}", text(&contact.job_title)));
    }
    lines.push(format!("TEL;TYPE=CELL:{}", contact.phone));
    lines.push(format!("EMAIL:{}", contact.email));
    lines.push(format!("URL:{}", contact.website));
    lines.push("END:VCARD".to_string());
    lines.join("\n")
}

fn encode_messaging_link(link: &MessagingLink) -> String {
    let mut out = format!("https://wa.me/{}", digits_only(&link.phone_digits));
    if !link.message.is_empty() {
        out.push_str("?text=");
        out.push_str(&encode_uri_component(&link.message));
    }
    out
}

fn encode_email(email: &Email) -> String {
    let mut out = format!("mailto:{}", email.address);
    if email.subject.is_empty() && email.body.is_empty() {
        return out;
    }
    let mut query = form_urlencoded::Serializer::new(String::new());
    if !email.subject.is_empty() {
        query.append_pair("subject", &email.subject);
    }
    if !email.body.is_empty() {
        query.append_pair("body", &email.body);
    }
    out.push('?');
    out.push_str(&query.finish());
    out
}

fn encode_sms(sms: &Sms) -> String {
    let mut out = format!("sms:{}", digits_only(&sms.phone_digits));
    if !sms.message.is_empty() {
        out.push_str("?body=");
        out.push_str(&encode_uri_component(&sms.message));
    }
    out
}

fn encode_event(event: &Event, options: &EncodeOptions) -> String {
    let text = |value: &str| text_value(value, options);
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("SUMMARY:{}", text(&event.title)),
    ];
    if !event.location.is_empty() {
        lines.push(format!("LOCATION:{}", text(&event.location)));
    }
    lines.push(format!(
        "DTSTART:{}",
        format_date_time(&event.start_date_time, options.event_time)
    ));
    if let Some(end) = event.end_date_time.as_deref().filter(|end| !end.is_empty()) {
        lines.push(format!("DTEND:{}", format_date_time(end, options.event_time)));
    }
    if !event.description.is_empty() {
        lines.push(format!("DESCRIPTION:{}", text(&event.description)));
    }
    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());
    lines.join("\n")
}

/// Rewrites a `YYYY-MM-DDTHH:mm` string into an iCalendar date-time.
///
/// Every `-` and `:` is dropped and seconds are appended, so
/// `2024-05-01T09:30` becomes `20240501T093000Z` under
/// [`EventTime::NaiveUtc`]. No zone conversion happens.
pub fn format_date_time(input: &str, style: EventTime) -> String {
    let mut out: String = input.chars().filter(|c| *c != '-' && *c != ':').collect();
    out.push_str("00");
    if style == EventTime::NaiveUtc {
        out.push('Z');
    }
    out
}

/// Keeps only ASCII decimal digits.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Percent-encodes a string the way a URI component is encoded
/// (space becomes `%20`).
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

fn text_value(value: &str, options: &EncodeOptions) -> String {
    if options.escape_text {
        escape_text(value)
    } else {
        value.to_string()
    }
}

/// Escapes a vCard / iCalendar TEXT value.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn jane() -> Contact {
        Contact {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            phone: "555".into(),
            email: "j@d.com".into(),
            company: "Acme".into(),
            job_title: String::new(),
            website: String::new(),
        }
    }

    fn launch() -> Event {
        Event {
            title: "Launch".into(),
            location: "HQ".into(),
            start_date_time: "2024-05-01T09:30".into(),
            end_date_time: Some("2024-05-01T11:00".into()),
            description: "Ship it".into(),
        }
    }

    #[test]
    fn test_url_verbatim() {
        let model = ContentModel::Url(UrlText { text: "https://example.com/a b".into() });
        assert_eq!(encode(&model), "https://example.com/a b");
        let empty = ContentModel::Url(UrlText::default());
        assert_eq!(encode(&empty), "");
    }

    #[test]
    fn test_vcard_layout() {
        let payload = encode(&ContentModel::Contact(jane()));
        assert_eq!(
            payload,
            "BEGIN:VCARD\nVERSION:3.0\nN:Doe;Jane;;;\nFN:Jane Doe\nORG:Acme\n\
             TEL;TYPE=CELL:555\nEMAIL:j@d.com\nURL:\nEND:VCARD"
        );
        assert!(!payload.contains("TITLE:"));
        assert!(!payload.ends_with('\n'));
    }

    #[test]
    fn test_vcard_title_sits_after_org() {
        let mut contact = jane();
        contact.job_title = "CTO".into();
        let payload = encode(&ContentModel::Contact(contact));
        let lines: Vec<&str> = payload.lines().collect();
        assert_eq!(lines[4], "ORG:Acme");
        assert_eq!(lines[5], "TITLE:CTO");
        assert_eq!(lines[6], "TEL;TYPE=CELL:555");
    }

    #[test]
    fn test_vcard_values_verbatim_by_default() {
        let mut contact = jane();
        contact.company = "Acme; Inc, Ltd".into();
        let payload = encode(&ContentModel::Contact(contact));
        assert!(payload.contains("\nORG:Acme; Inc, Ltd\n"));
    }

    #[test]
    fn test_vcard_escaping_when_enabled() {
        let mut contact = jane();
        contact.company = "Acme; Inc, Ltd\\x".into();
        contact.job_title = "Line1\nLine2".into();
        let options = EncodeOptions { escape_text: true, ..Default::default() };
        let payload = encode_with(&ContentModel::Contact(contact), &options);
        assert!(payload.contains("\nORG:Acme\\; Inc\\, Ltd\\\\x\n"));
        assert!(payload.contains("\nTITLE:Line1\\nLine2\n"));
        assert!(payload.contains("\nN:Doe;Jane;;;\n"));
    }

    #[test]
    fn test_vcard_escaping_leaves_uri_fields_alone() {
        let mut contact = jane();
        contact.website = "https://a.com/x,y;z".into();
        contact.phone = "+1;ext=2".into();
        contact.email = "a,b@d.com".into();
        let options = EncodeOptions { escape_text: true, ..Default::default() };
        let payload = encode_with(&ContentModel::Contact(contact), &options);
        assert!(payload.contains("\nURL:https://a.com/x,y;z\n"));
        assert!(payload.contains("\nTEL;TYPE=CELL:+1;ext=2\n"));
        assert!(payload.contains("\nEMAIL:a,b@d.com\n"));
    }

    #[test]
    fn test_messaging_link_strips_non_digits() {
        let link = MessagingLink { phone_digits: "+1 (234) 567-8900".into(), message: String::new() };
        assert_eq!(encode(&ContentModel::MessagingLink(link)), "https://wa.me/12345678900");
    }

    #[test]
    fn test_messaging_link_with_message() {
        let link = MessagingLink { phone_digits: "1234567890".into(), message: "Hi there".into() };
        assert_eq!(
            encode(&ContentModel::MessagingLink(link)),
            "https://wa.me/1234567890?text=Hi%20there"
        );
    }

    #[test]
    fn test_messaging_link_reserved_characters() {
        let link = MessagingLink { phone_digits: "1".into(), message: "a&b=c?d/e (ok)!".into() };
        assert_eq!(
            encode(&ContentModel::MessagingLink(link)),
            "https://wa.me/1?text=a%26b%3Dc%3Fd%2Fe%20(ok)!"
        );
    }

    #[test]
    fn test_messaging_link_without_digits() {
        let link = MessagingLink { phone_digits: "call me".into(), message: String::new() };
        assert_eq!(encode(&ContentModel::MessagingLink(link)), "https://wa.me/");
    }

    #[test]
    fn test_email_minimal() {
        let email = Email { address: "a@b.com".into(), ..Default::default() };
        assert_eq!(encode(&ContentModel::Email(email)), "mailto:a@b.com");
    }

    #[test]
    fn test_email_query() {
        let email = Email {
            address: "a@b.com".into(),
            subject: "Hello world".into(),
            body: "x&y".into(),
        };
        assert_eq!(
            encode(&ContentModel::Email(email)),
            "mailto:a@b.com?subject=Hello+world&body=x%26y"
        );
    }

    #[test]
    fn test_email_body_only() {
        let email = Email { address: "a@b.com".into(), subject: String::new(), body: "hi".into() };
        assert_eq!(encode(&ContentModel::Email(email)), "mailto:a@b.com?body=hi");
    }

    #[test]
    fn test_sms() {
        let sms = Sms { phone_digits: "+44 20 7946 0000".into(), message: String::new() };
        assert_eq!(encode(&ContentModel::Sms(sms)), "sms:442079460000");
        let sms = Sms { phone_digits: "555".into(), message: "On my way".into() };
        assert_eq!(encode(&ContentModel::Sms(sms)), "sms:555?body=On%20my%20way");
    }

    #[test]
    fn test_event_full() {
        assert_eq!(
            encode(&ContentModel::Event(launch())),
            "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VEVENT\nSUMMARY:Launch\nLOCATION:HQ\n\
             DTSTART:20240501T093000Z\nDTEND:20240501T110000Z\nDESCRIPTION:Ship it\n\
             END:VEVENT\nEND:VCALENDAR"
        );
    }

    #[test]
    fn test_event_optional_lines_omitted() {
        let event = Event {
            title: "Standup".into(),
            start_date_time: "2024-05-01T09:30".into(),
            end_date_time: Some(String::new()),
            ..Default::default()
        };
        let payload = encode(&ContentModel::Event(event));
        assert!(!payload.contains("LOCATION:"));
        assert!(!payload.contains("DTEND:"));
        assert!(!payload.contains("DESCRIPTION:"));
        assert!(payload.contains("\nDTSTART:20240501T093000Z\n"));
    }

    #[test]
    fn test_event_floating_time() {
        let options = EncodeOptions { event_time: EventTime::Floating, ..Default::default() };
        let payload = encode_with(&ContentModel::Event(launch()), &options);
        assert!(payload.contains("\nDTSTART:20240501T093000\n"));
        assert!(payload.contains("\nDTEND:20240501T110000\n"));
    }

    #[test]
    fn test_format_date_time() {
        assert_eq!(format_date_time("2024-12-31T23:59", EventTime::NaiveUtc), "20241231T235900Z");
        assert_eq!(format_date_time("", EventTime::NaiveUtc), "00Z");
    }

    #[test]
    fn test_serde_kind_tag() {
        let json = r#"{"kind":"messagingLink","phoneDigits":"12","message":"yo"}"#;
        let model: ContentModel = serde_json::from_str(json).unwrap();
        assert_eq!(
            model,
            ContentModel::MessagingLink(MessagingLink { phone_digits: "12".into(), message: "yo".into() })
        );
        let partial: ContentModel = serde_json::from_str(r#"{"kind":"email","address":"a@b.com"}"#).unwrap();
        assert_eq!(encode(&partial), "mailto:a@b.com");
    }

    proptest! {
        #[test]
        fn prop_url_identity(text in ".*") {
            let model = ContentModel::Url(UrlText { text: text.clone() });
            prop_assert_eq!(encode(&model), text);
        }

        #[test]
        fn prop_encode_is_deterministic(
            first in ".*", last in ".*", phone in ".*", message in ".*"
        ) {
            let models = [
                ContentModel::Contact(Contact {
                    first_name: first.clone(),
                    last_name: last.clone(),
                    phone: phone.clone(),
                    ..Default::default()
                }),
                ContentModel::MessagingLink(MessagingLink { phone_digits: phone.clone(), message: message.clone() }),
                ContentModel::Event(Event {
                    title: first.clone(),
                    location: last.clone(),
                    start_date_time: phone.clone(),
                    end_date_time: Some(message.clone()),
                    description: message.clone(),
                }),
                ContentModel::Url(UrlText { text: message.clone() }),
                ContentModel::Email(Email { address: first, subject: last, body: message.clone() }),
                ContentModel::Sms(Sms { phone_digits: phone, message }),
            ];
            let escaped = EncodeOptions { escape_text: true, event_time: EventTime::Floating };
            for model in &models {
                prop_assert_eq!(encode(model), encode(model));
                prop_assert_eq!(encode_with(model, &escaped), encode_with(model, &escaped));
            }
        }

        #[test]
        fn prop_clean_phone_is_digits(phone in ".*") {
            prop_assert!(digits_only(&phone).chars().all(|c| c.is_ascii_digit()));
        }
    }
}
