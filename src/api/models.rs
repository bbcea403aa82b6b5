use serde::Serialize;

pub const EVENT_INFO: &str = "Suspicious Email Submitter";
pub const EMAIL_TEMPLATE_UUID: &str = "a0c666e0-fc65-4be8-b48f-3423d788b552";
pub const EMAIL_TEMPLATE_VERSION: u32 = 10;

/// Top-level document accepted by the MISP `events/add` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    #[serde(rename = "Event")]
    pub event: Event,
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub info: &'static str,
    pub distribution: u8,
    pub threat_level_id: u8,
    pub analysis: u8,
    #[serde(rename = "Object")]
    pub objects: Vec<EventObject>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventObject {
    pub name: &'static str,
    #[serde(rename = "meta-category")]
    pub meta_category: &'static str,
    pub description: &'static str,
    pub template_uuid: &'static str,
    pub template_version: u32,
    #[serde(rename = "Attribute")]
    pub attributes: Vec<ObjectAttribute>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectAttribute {
    pub category: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub object_relation: &'static str,
    pub value: &'static str,
    pub data: String,
}

impl EventEnvelope {
    /// Wraps one raw message (headers and body) as an `email` object with a
    /// single `eml` attachment attribute.
    pub fn for_raw_email(raw: impl Into<String>) -> Self {
        Self {
            event: Event {
                info: EVENT_INFO,
                distribution: 0,
                threat_level_id: 3,
                analysis: 1,
                objects: vec![EventObject {
                    name: "email",
                    meta_category: "network",
                    description: "Email object describing an email with meta-information",
                    template_uuid: EMAIL_TEMPLATE_UUID,
                    template_version: EMAIL_TEMPLATE_VERSION,
                    attributes: vec![ObjectAttribute {
                        category: "Payload delivery",
                        kind: "attachment",
                        object_relation: "eml",
                        value: "Raw Email",
                        data: raw.into(),
                    }],
                }],
            },
        }
    }
}

/// What the server said about one submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResult {
    pub status: u16,
    pub accepted: bool,
}
