use std::path::Path;

/// Output container formats the renderer knows how to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    Mp4,
    Mkv,
    Mov,
}

impl Extension {
    /// Return the extension with the leading dot.
    /// e.g. ".ext"
    pub fn with_dot(self) -> &'static str {
        match self {
            Extension::Mp4 => ".mp4",
            Extension::Mkv => ".mkv",
            Extension::Mov => ".mov",
        }
    }

    /// Parse the path file extension.
    /// Return None in case of no or unsupported extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext {
                "mp4" => Some(Self::Mp4),
                "mkv" => Some(Self::Mkv),
                "mov" => Some(Self::Mov),
                _ => None,
            })
    }
}
