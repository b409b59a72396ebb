//! Header extraction for archived messages.
//!
//! Only the headers needed for threading are read; MIME structure is not
//! interpreted. `mailparse` takes care of RFC 2047 encoded words and header
//! folding.

use mailparse::{MailHeaderMap, MailParseError, parse_headers};

use crate::models::Message;
use crate::threading::message_id::split_references;

/// Remove NUL bytes and surrounding whitespace; empty values become None.
fn sanitize_header(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.replace('\0', "").trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse one raw message (headers plus body) into a [`Message`].
///
/// Missing Message-ID or Subject is not an error here; such messages are
/// skipped later by the thread builder.
pub fn parse_message(raw: &[u8]) -> Result<Message, MailParseError> {
    let (headers, body_offset) = parse_headers(raw)?;

    let message_id = sanitize_header(headers.get_first_value("Message-ID"));
    let subject = sanitize_header(headers.get_first_value("Subject"));
    let in_reply_to = sanitize_header(headers.get_first_value("In-Reply-To"));
    let references = headers
        .get_first_value("References")
        .map(|value| split_references(&value))
        .unwrap_or_default();

    let body = raw
        .get(body_offset..)
        .map(|body| String::from_utf8_lossy(body).into_owned())
        .unwrap_or_default();

    log::trace!(
        "parsed: {} - {}",
        message_id.as_deref().unwrap_or("<none>"),
        subject.as_deref().unwrap_or("")
    );

    Ok(Message {
        message_id,
        subject,
        in_reply_to,
        references,
        body,
    })
}
