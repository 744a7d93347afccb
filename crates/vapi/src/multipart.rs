//! `multipart/form-data` encoding for artifact uploads.

use declarative::Upload;

/// An encoded multipart body with its content type header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Encode one upload as a single-part form.
///
/// The boundary is derived from the content digest, so the same upload
/// always encodes to the same bytes.
pub fn encode(upload: &Upload) -> MultipartBody {
    let hash = blake3::hash(&upload.content).to_hex();
    let boundary = format!("vapi-sync-{}", &hash.as_str()[..32]);
    let mime = mime_guess::from_path(&upload.file_name).first_or_octet_stream();

    let mut body = Vec::with_capacity(upload.content.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            escape_quotes(&upload.field_name),
            escape_quotes(&upload.file_name)
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime.essence_str()).as_bytes());
    body.extend_from_slice(&upload.content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        body,
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, content: &[u8]) -> Upload {
        Upload {
            field_name: "file".into(),
            file_name: name.into(),
            content: content.to_vec(),
        }
    }

    #[test]
    fn test_encode_layout() {
        let encoded = encode(&upload("notes.txt", b"content-1"));
        let text = String::from_utf8(encoded.body).unwrap();
        let boundary = encoded
            .content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();

        assert!(text.starts_with(&format!("--{boundary}\r\n")));
        assert!(text.contains("name=\"file\"; filename=\"notes.txt\""));
        assert!(text.contains("Content-Type: text/plain\r\n\r\ncontent-1\r\n"));
        assert!(text.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn test_unknown_extension_is_octet_stream() {
        let encoded = encode(&upload("blob.zzzz", b"x"));
        let text = String::from_utf8_lossy(&encoded.body);
        assert!(text.contains("Content-Type: application/octet-stream"));
    }

    #[test]
    fn test_boundary_is_stable_per_content() {
        let a = encode(&upload("a.txt", b"content-1"));
        let b = encode(&upload("a.txt", b"content-1"));
        let c = encode(&upload("a.txt", b"content-2"));
        assert_eq!(a.content_type, b.content_type);
        assert_ne!(a.content_type, c.content_type);
    }

    #[test]
    fn test_quotes_in_file_name_are_escaped() {
        let encoded = encode(&upload("my \"file\".txt", b"x"));
        let text = String::from_utf8_lossy(&encoded.body);
        assert!(text.contains("filename=\"my \\\"file\\\".txt\""));
    }
}
