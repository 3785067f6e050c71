//! Outbound side of the form: the multipart payload and the capability that
//! delivers it.

use crate::config::{BOUNDARY_LEN, SUBMIT_DELAY_MS};
use crate::form::{Field, FormValues};
use futures::future::{FutureExt, LocalBoxFuture};
use gloo_timers::future::TimeoutFuture;
use log::info;
use rand::distr::Alphanumeric;
use rand::Rng;
use std::fmt;
use std::rc::Rc;

/// Body of a single multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartBody {
    Text(String),
    File {
        file_name: String,
        content_type: String,
        bytes: Rc<[u8]>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: &'static str,
    pub body: PartBody,
}

/// Transmittable representation of a [`FormValues`] snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub parts: Vec<Part>,
}

impl Payload {
    /// Lay the values out as named parts. An absent photo produces no part.
    pub fn from_values(values: &FormValues) -> Self {
        let mut parts = vec![
            text_part(Field::FirstName.name(), &values.first_name),
            text_part(Field::LastName.name(), &values.last_name),
            text_part(Field::Email.name(), &values.email),
            text_part(Field::PhoneNumber.name(), &values.phone_number),
        ];
        if let Some(photo) = &values.photo {
            parts.push(Part {
                name: Field::Photo.name(),
                body: PartBody::File {
                    file_name: photo.name.clone(),
                    content_type: photo.content_type.clone(),
                    bytes: photo.bytes.clone(),
                },
            });
        }
        parts.push(text_part(Field::Age.name(), &values.age.to_string()));
        parts.push(text_part("level", values.level.as_str()));
        Self { parts }
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Total number of body bytes across all parts.
    pub fn body_len(&self) -> usize {
        self.parts
            .iter()
            .map(|p| match &p.body {
                PartBody::Text(text) => text.len(),
                PartBody::File { bytes, .. } => bytes.len(),
            })
            .sum()
    }

    /// `Content-Type` header value matching [`Payload::encode`].
    pub fn content_type(boundary: &str) -> String {
        format!("multipart/form-data; boundary={}", boundary)
    }

    /// Encode the parts as a `multipart/form-data` body.
    pub fn encode(&self, boundary: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.body_len() + self.parts.len() * 96);
        for part in &self.parts {
            out.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
            match &part.body {
                PartBody::Text(text) => {
                    out.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                            .as_bytes(),
                    );
                    out.extend_from_slice(text.as_bytes());
                }
                PartBody::File {
                    file_name,
                    content_type,
                    bytes,
                } => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: {}\r\n\r\n",
                            part.name,
                            escape_file_name(file_name),
                            content_type
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(bytes);
                }
            }
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
        out
    }
}

fn text_part(name: &'static str, value: &str) -> Part {
    Part {
        name,
        body: PartBody::Text(value.to_string()),
    }
}

/// Percent-encode the characters that would end the quoted `filename`
/// parameter or the header line.
fn escape_file_name(s: &str) -> String {
    s.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}

/// Fresh alphanumeric multipart boundary.
pub fn random_boundary() -> String {
    let token: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(BOUNDARY_LEN)
        .map(char::from)
        .collect();
    format!("----MarathonForm{}", token)
}

/// Failure reported by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The endpoint could not be reached.
    Network(String),
    /// The endpoint answered with a non-success status.
    Status(u16),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(reason) => write!(f, "network error: {}", reason),
            TransportError::Status(code) => write!(f, "server responded with status {}", code),
        }
    }
}

impl std::error::Error for TransportError {}

/// Delivers a submitted payload somewhere.
pub trait Transport {
    fn submit(&self, payload: Payload) -> LocalBoxFuture<'_, Result<(), TransportError>>;
}

/// Stand-in for the remote endpoint: waits a fixed delay, then succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    pub delay_ms: u32,
}

impl SimulatedTransport {
    pub fn new(delay_ms: u32) -> Self {
        Self { delay_ms }
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(SUBMIT_DELAY_MS)
    }
}

impl Transport for SimulatedTransport {
    fn submit(&self, payload: Payload) -> LocalBoxFuture<'_, Result<(), TransportError>> {
        let delay_ms = self.delay_ms;
        async move {
            let boundary = random_boundary();
            let body = payload.encode(&boundary);
            info!(
                "Simulating submission of {} parts ({} bytes, {})",
                payload.parts.len(),
                body.len(),
                Payload::content_type(&boundary)
            );
            TimeoutFuture::new(delay_ms).await;
            Ok(())
        }
        .boxed_local()
    }
}
