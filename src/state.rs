//! Session state for the content form.
//!
//! Every content type keeps its own field group for the whole session, and
//! only the selector says which one is encoded. Flipping between types never
//! throws away what was typed into the others.

use serde::{Deserialize, Serialize};

use crate::payload::{
    encode_with, Contact, ContentModel, Email, EncodeOptions, Event, MessagingLink, Sms, UrlText,
};

/// The content type selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentKind {
    #[default]
    Url,
    Contact,
    MessagingLink,
    Email,
    Sms,
    Event,
}

impl ContentKind {
    /// All kinds in display order.
    pub const ALL: [ContentKind; 6] = [
        ContentKind::Url,
        ContentKind::Contact,
        ContentKind::MessagingLink,
        ContentKind::Email,
        ContentKind::Sms,
        ContentKind::Event,
    ];

    /// Label shown on the type picker.
    pub const fn label(self) -> &'static str {
        match self {
            ContentKind::Url => "Website URL",
            ContentKind::Contact => "Contact Card",
            ContentKind::MessagingLink => "WhatsApp",
            ContentKind::Email => "Send Email",
            ContentKind::Sms => "Text Message",
            ContentKind::Event => "Event Link",
        }
    }
}

impl ContentModel {
    /// The selector value for this variant.
    pub const fn kind(&self) -> ContentKind {
        match self {
            ContentModel::Url(_) => ContentKind::Url,
            ContentModel::Contact(_) => ContentKind::Contact,
            ContentModel::MessagingLink(_) => ContentKind::MessagingLink,
            ContentModel::Email(_) => ContentKind::Email,
            ContentModel::Sms(_) => ContentKind::Sms,
            ContentModel::Event(_) => ContentKind::Event,
        }
    }
}

/// All six field groups plus the active selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentState {
    active: ContentKind,
    pub url: UrlText,
    pub contact: Contact,
    pub messaging_link: MessagingLink,
    pub email: Email,
    pub sms: Sms,
    pub event: Event,
}

impl Default for ContentState {
    fn default() -> Self {
        Self {
            active: ContentKind::Url,
            url: UrlText { text: "https://example.com".to_string() },
            contact: Contact::default(),
            messaging_link: MessagingLink::default(),
            email: Email::default(),
            sms: Sms::default(),
            event: Event::default(),
        }
    }
}

impl ContentState {
    /// Switches the active content type. Field groups are left untouched.
    pub fn select(&mut self, kind: ContentKind) {
        self.active = kind;
    }

    pub fn active_kind(&self) -> ContentKind {
        self.active
    }

    /// Snapshot of the active field group as a [`ContentModel`].
    pub fn active_model(&self) -> ContentModel {
        match self.active {
            ContentKind::Url => ContentModel::Url(self.url.clone()),
            ContentKind::Contact => ContentModel::Contact(self.contact.clone()),
            ContentKind::MessagingLink => ContentModel::MessagingLink(self.messaging_link.clone()),
            ContentKind::Email => ContentModel::Email(self.email.clone()),
            ContentKind::Sms => ContentModel::Sms(self.sms.clone()),
            ContentKind::Event => ContentModel::Event(self.event.clone()),
        }
    }

    /// Stores a model into its field group and makes it active.
    pub fn apply(&mut self, model: ContentModel) {
        self.active = model.kind();
        match model {
            ContentModel::Url(url) => self.url = url,
            ContentModel::Contact(contact) => self.contact = contact,
            ContentModel::MessagingLink(link) => self.messaging_link = link,
            ContentModel::Email(email) => self.email = email,
            ContentModel::Sms(sms) => self.sms = sms,
            ContentModel::Event(event) => self.event = event,
        }
    }

    /// Payload for the active content type.
    pub fn payload(&self) -> String {
        self.payload_with(&EncodeOptions::default())
    }

    pub fn payload_with(&self, options: &EncodeOptions) -> String {
        encode_with(&self.active_model(), options)
    }
}
