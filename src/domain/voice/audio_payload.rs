//! Audio payload value object

use std::fmt;

/// Container formats the backend understands for uploaded commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Wav,
    Webm,
    Ogg,
    Mp3,
}

impl AudioFormat {
    /// Get the MIME type string
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
            Self::Mp3 => "audio/mpeg",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Webm => "webm",
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
        }
    }

    /// Upload filename for a recorded command
    pub fn upload_filename(&self) -> String {
        format!("recording.{}", self.extension())
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mime_type())
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::Wav
    }
}

/// Value object representing one recording ready for upload.
/// Holds the concatenated capture bytes and their container format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    data: Vec<u8>,
    format: AudioFormat,
}

impl AudioPayload {
    /// Create a payload from raw bytes
    pub fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Build a payload by concatenating capture chunks in delivery order
    pub fn from_chunks(chunks: &[Vec<u8>], format: AudioFormat) -> Self {
        let mut data = Vec::with_capacity(chunks.iter().map(Vec::len).sum());
        for chunk in chunks {
            data.extend_from_slice(chunk);
        }
        Self { data, format }
    }

    /// Get the raw bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the container format
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload carries no audio at all
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_types() {
        assert_eq!(AudioFormat::Wav.mime_type(), "audio/wav");
        assert_eq!(AudioFormat::Webm.mime_type(), "audio/webm");
        assert_eq!(AudioFormat::Mp3.mime_type(), "audio/mpeg");
    }

    #[test]
    fn upload_filename_uses_extension() {
        assert_eq!(AudioFormat::Wav.upload_filename(), "recording.wav");
        assert_eq!(AudioFormat::Webm.upload_filename(), "recording.webm");
    }

    #[test]
    fn from_chunks_concatenates_in_order() {
        let chunks = vec![vec![1u8, 2], vec![3u8], vec![], vec![4u8, 5, 6]];
        let payload = AudioPayload::from_chunks(&chunks, AudioFormat::Wav);
        assert_eq!(payload.data(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn empty_chunks_give_empty_payload() {
        let payload = AudioPayload::from_chunks(&[], AudioFormat::Wav);
        assert!(payload.is_empty());
        assert_eq!(payload.size_bytes(), 0);
    }

    #[test]
    fn human_readable_size_bytes() {
        let payload = AudioPayload::new(vec![0u8; 500], AudioFormat::Wav);
        assert_eq!(payload.human_readable_size(), "500 B");
    }

    #[test]
    fn human_readable_size_kb() {
        let payload = AudioPayload::new(vec![0u8; 2048], AudioFormat::Wav);
        assert_eq!(payload.human_readable_size(), "2.0 KB");
    }

    #[test]
    fn default_format_is_wav() {
        assert_eq!(AudioFormat::default(), AudioFormat::Wav);
    }
}
