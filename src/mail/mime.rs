use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use lettre::Address;
use rand::Rng;

/// Forward-as-attachment request: the reported message travels unmodified
/// as a `message/rfc822` part.
#[derive(Debug, Clone)]
pub struct ForwardRequest<'a> {
    pub from: &'a Address,
    pub to: &'a [Address],
    pub reporter: &'a str,
    pub raw_message: &'a [u8],
}

pub fn build_forward_message(request: &ForwardRequest<'_>) -> Vec<u8> {
    let boundary = random_boundary();
    let original_subject =
        header_value(request.raw_message, "Subject").unwrap_or_else(|| "(no subject)".to_string());

    let headers = [
        format!("From: {}", request.from),
        format!("To: {}", join_addresses(request.to)),
        format!("Subject: Fwd: {}", sanitize_header_value(&original_subject)),
        "MIME-Version: 1.0".to_string(),
        format!("Content-Type: multipart/mixed; boundary=\"{boundary}\""),
    ];

    let mut out = headers.join("\r\n").into_bytes();
    out.extend_from_slice(b"\r\n\r\n");
    write_multipart_body(&mut out, request, &boundary);
    out
}

fn write_multipart_body(out: &mut Vec<u8>, request: &ForwardRequest<'_>, boundary: &str) {
    let attached = to_crlf(request.raw_message);
    let encoding = if attached.is_ascii() { "7bit" } else { "8bit" };

    let mut head = String::new();
    head.push_str(&format!("--{boundary}\r\n"));
    head.push_str("Content-Type: text/plain; charset=utf-8\r\n\r\n");
    head.push_str(&format!(
        "Suspicious message reported by {}.\r\n",
        sanitize_header_value(request.reporter)
    ));

    head.push_str(&format!("--{boundary}\r\n"));
    head.push_str("Content-Type: message/rfc822\r\n");
    head.push_str(&format!("Content-Transfer-Encoding: {encoding}\r\n"));
    head.push_str("Content-Disposition: attachment; filename=\"suspicious.eml\"\r\n\r\n");
    out.extend_from_slice(head.as_bytes());

    out.extend_from_slice(&attached);
    if !attached.ends_with(b"\r\n") {
        out.extend_from_slice(b"\r\n");
    }

    out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
}

/// Unfolded value of the first `name` header in the message's header block.
/// Header bytes that are not UTF-8 are replaced.
pub fn header_value(raw_message: &[u8], name: &str) -> Option<String> {
    let mut value: Option<String> = None;

    for line in raw_message.split(|byte| *byte == b'\n') {
        let line = String::from_utf8_lossy(line.strip_suffix(b"\r").unwrap_or(line));
        if line.is_empty() {
            break;
        }

        if line.starts_with([' ', '\t']) {
            if let Some(current) = value.as_mut() {
                current.push(' ');
                current.push_str(line.trim());
            }
            continue;
        }

        if value.is_some() {
            break;
        }

        if let Some((field, rest)) = line.split_once(':') {
            if field.trim().eq_ignore_ascii_case(name) {
                value = Some(rest.trim().to_string());
            }
        }
    }

    value.filter(|value| !value.is_empty())
}

fn join_addresses(addresses: &[Address]) -> String {
    addresses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_crlf(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() + input.len() / 40);
    let mut previous = 0_u8;
    for &byte in input {
        if byte == b'\n' && previous != b'\r' {
            out.push(b'\r');
        }
        out.push(byte);
        previous = byte;
    }
    out
}

fn random_boundary() -> String {
    let mut bytes = [0_u8; 12];
    rand::thread_rng().fill(&mut bytes);
    let token = URL_SAFE_NO_PAD.encode(bytes);
    format!("ses-{token}")
}

fn sanitize_header_value(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|value| *value != '\r' && *value != '\n')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(value: &str) -> Address {
        value.parse().expect("valid address")
    }

    fn forward(raw_message: &[u8]) -> String {
        let from = address("analyst@example.com");
        let to = vec![address("abuse@example.com")];
        let message = build_forward_message(&ForwardRequest {
            from: &from,
            to: &to,
            reporter: "Acme SOC",
            raw_message,
        });
        String::from_utf8(message).expect("utf-8 message")
    }

    #[test]
    fn attaches_original_as_rfc822_part() {
        let message = forward(b"From: bad@example.net\nSubject: You won\n\nclick here\n");

        assert!(message.starts_with("From: analyst@example.com\r\nTo: abuse@example.com\r\n"));
        assert!(message.contains("Subject: Fwd: You won\r\n"));
        assert!(message.contains("multipart/mixed; boundary=\"ses-"));
        assert!(message.contains("Content-Type: message/rfc822\r\n"));
        assert!(message.contains("Content-Transfer-Encoding: 7bit\r\n"));
        assert!(message.contains("From: bad@example.net\r\nSubject: You won\r\n\r\nclick here\r\n"));
        assert!(message.trim_end().ends_with("--"));
    }

    #[test]
    fn marks_non_ascii_attachment_as_8bit() {
        let message = forward("Subject: caf\u{e9}\r\n\r\nbody".as_bytes());
        assert!(message.contains("Content-Transfer-Encoding: 8bit\r\n"));
    }

    #[test]
    fn missing_subject_gets_placeholder() {
        let message = forward(b"From: x@example.com\r\n\r\nSubject: not a header");
        assert!(message.contains("Subject: Fwd: (no subject)\r\n"));
    }

    #[test]
    fn unfolds_continued_headers() {
        let raw = b"Subject: first\r\n  second\r\nFrom: x@example.com\r\n\r\n";
        assert_eq!(header_value(raw, "subject").as_deref(), Some("first second"));
    }

    #[test]
    fn normalizes_bare_newlines_only() {
        assert_eq!(to_crlf(b"a\nb\r\nc"), b"a\r\nb\r\nc");
    }
}
