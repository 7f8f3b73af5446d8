use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Kind of piece a custom request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtType {
    #[default]
    DigitalIllustration,
    HandmadeCollage,
    MixedMedia,
    Other,
}

impl ArtType {
    pub const ALL: [ArtType; 4] = [
        ArtType::DigitalIllustration,
        ArtType::HandmadeCollage,
        ArtType::MixedMedia,
        ArtType::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ArtType::DigitalIllustration => "Digital Illustration",
            ArtType::HandmadeCollage => "Handmade Collage",
            ArtType::MixedMedia => "Mixed Media",
            ArtType::Other => "Other",
        }
    }
}

impl fmt::Display for ArtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ArtType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised = value.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalised.as_str() {
            "digital illustration" | "digital" | "illustration" => {
                Ok(ArtType::DigitalIllustration)
            }
            "handmade collage" | "handmade" | "collage" => Ok(ArtType::HandmadeCollage),
            "mixed media" | "mixed" => Ok(ArtType::MixedMedia),
            "other" => Ok(ArtType::Other),
            _ => Err(format!(
                "unknown art type '{}'; expected one of: {}",
                value.trim(),
                ArtType::ALL.map(ArtType::label).join(", ")
            )),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommissionError {
    #[error("Please fill out your name and description.")]
    MissingFields,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("reference image {path} is not a readable file")]
    ReferenceUnreadable { path: PathBuf },
}

/// A custom art request as entered on the commission form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommissionRequest {
    pub name: String,
    pub email: Option<String>,
    pub art_type: ArtType,
    pub message: String,
    pub reference: Option<PathBuf>,
}

impl CommissionRequest {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_art_type(mut self, art_type: ArtType) -> Self {
        self.art_type = art_type;
        self
    }

    pub fn with_reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference = Some(path.into());
        self
    }

    pub fn validate(&self) -> Result<(), CommissionError> {
        if self.name.trim().is_empty() || self.message.trim().is_empty() {
            return Err(CommissionError::MissingFields);
        }
        if let Some(email) = self.email.as_deref() {
            if !looks_like_email(email.trim()) {
                return Err(CommissionError::InvalidEmail(email.to_string()));
            }
        }
        if let Some(path) = self.reference.as_deref() {
            if !path.is_file() {
                return Err(CommissionError::ReferenceUnreadable {
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }

    /// Validates the request and returns the studio's acknowledgement.
    ///
    /// Nothing is sent anywhere; delivery to the studio happens outside the
    /// gallery.
    pub fn submit(&self) -> Result<String, CommissionError> {
        self.validate()?;
        Ok(format!(
            "Thank you, {}! Your creative request for a \"{}\" has been received. \
             We're excited to review your idea and will be in touch via email shortly.",
            self.name.trim(),
            self.art_type
        ))
    }

    pub fn reference_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
