use crate::client::FormData;

/// Media category of a group post attachment, as reported by the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Video,
    Audio,
    Document,
    Other,
}

impl AttachmentKind {
    pub fn parse(value: &str) -> Self {
        match value {
            "image" => AttachmentKind::Image,
            "video" => AttachmentKind::Video,
            "audio" => AttachmentKind::Audio,
            "document" => AttachmentKind::Document,
            _ => AttachmentKind::Other,
        }
    }

    pub fn default_mime_type(self) -> &'static str {
        match self {
            AttachmentKind::Image => "image/jpeg",
            AttachmentKind::Video => "video/mp4",
            AttachmentKind::Audio => "audio/m4a",
            AttachmentKind::Document | AttachmentKind::Other => "application/octet-stream",
        }
    }

    pub fn default_extension(self) -> &'static str {
        match self {
            AttachmentKind::Image => "jpg",
            AttachmentKind::Video => "mp4",
            AttachmentKind::Audio => "m4a",
            AttachmentKind::Document | AttachmentKind::Other => "file",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub bytes: Vec<u8>,
    pub name: Option<String>,
    pub mime_type: Option<String>,
}

impl Attachment {
    pub fn new(kind: AttachmentKind, bytes: Vec<u8>) -> Self {
        Self {
            kind,
            bytes,
            name: None,
            mime_type: None,
        }
    }

    pub fn mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .unwrap_or_else(|| self.kind.default_mime_type())
    }

    /// Given name, or `attachment_<unix millis>.<ext>`.
    pub fn file_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!(
                "attachment_{}.{}",
                chrono::Utc::now().timestamp_millis(),
                self.kind.default_extension()
            ),
        }
    }

    pub(crate) fn append_to(&self, form: FormData, field: &str) -> FormData {
        form.file(field, self.bytes.clone(), self.file_name(), self.mime_type())
    }
}
