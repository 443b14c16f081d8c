use bytes::{Bytes, BytesMut};
use sha2::{Digest, Sha256};

pub const WEBM_CONTENT_TYPE: &str = "video/webm";

/// One finished recording, ready for preview or upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaObject {
    data: Bytes,
    content_type: String,
}

impl MediaObject {
    pub fn new(data: impl Into<Bytes>, content_type: &str) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.to_string(),
        }
    }

    pub fn webm(data: impl Into<Bytes>) -> Self {
        Self::new(data, WEBM_CONTENT_TYPE)
    }

    pub fn from_slices(slices: &[Bytes], content_type: &str) -> Self {
        let total = slices.iter().map(Bytes::len).sum();
        let mut buf = BytesMut::with_capacity(total);
        for slice in slices {
            buf.extend_from_slice(slice);
        }
        Self::new(buf.freeze(), content_type)
    }

    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.data))
    }
}
