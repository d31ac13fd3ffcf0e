//! Advisory validation
//!
//! Validators never change a value. They report issues the host can show
//! next to the field, while the sanitize pipeline decides what is stored.

use crate::sanitize::{ALLOWED_HEAD_TAGS, Segment, scan};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue code for disallowed markup
pub const INVALID_CODE: &str = "invalid-code";

/// Issue code for images outside their size constraint
pub const IMAGE_SIZE: &str = "image-size";

/// Issue code for values refused by a registered validator
pub const INVALID_VALUE: &str = "invalid-value";

/// One advisory problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Outcome of an advisory check; valid when it holds no issues
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    issues: Vec<ValidationIssue>,
}

impl Validity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            code: code.into(),
            message: message.into(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Whether an issue with `code` was reported
    pub fn has_code(&self, code: &str) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }

    pub fn merge(&mut self, other: Validity) {
        self.issues.extend(other.issues);
    }
}

// =============================================================================
// Restricted snippets
// =============================================================================

/// Report any markup other than `<link>` and `<meta>` tags
pub fn validate_restricted_snippet(value: &str) -> Validity {
    let mut validity = Validity::new();
    let disallowed = scan(value).iter().any(|segment| match segment {
        Segment::Tag(tag) => !tag.is_allowed(&ALLOWED_HEAD_TAGS),
        Segment::Text(_) => false,
    });
    if disallowed {
        validity.add(INVALID_CODE, "Only <link> and <meta> tags are allowed");
    }
    validity
}

// =============================================================================
// Image constraints
// =============================================================================

/// Pixel size of a stored image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Minimum size (and optional squareness) an image must meet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageConstraint {
    /// How the image is named in messages
    pub subject: &'static str,
    pub min_width: u32,
    pub min_height: Option<u32>,
    pub square: bool,
}

impl ImageConstraint {
    /// Site icon override: at least 32×32 and square
    pub const SITE_ICON: Self = Self {
        subject: "amp icon",
        min_width: 32,
        min_height: Some(32),
        square: true,
    };

    /// Default post image: at least 696 wide
    pub const DEFAULT_IMAGE: Self = Self {
        subject: "amp default image",
        min_width: 696,
        min_height: None,
        square: false,
    };

    fn size_message(&self) -> String {
        match self.min_height {
            Some(height) => format!(
                "The {} needs to be at least {}px × {}px",
                self.subject, self.min_width, height
            ),
            None => format!(
                "The {} needs to be at least {}px wide",
                self.subject, self.min_width
            ),
        }
    }
}

/// Check an image against `constraint`
///
/// `None` means the dimensions could not be looked up, which is not
/// reported.
pub fn validate_image_constraint(
    dimensions: Option<ImageDimensions>,
    constraint: &ImageConstraint,
) -> Validity {
    let mut validity = Validity::new();
    let Some(size) = dimensions else {
        return validity;
    };

    let too_small = size.width < constraint.min_width
        || constraint.min_height.is_some_and(|min| size.height < min);
    if too_small {
        validity.add(IMAGE_SIZE, constraint.size_message());
    }
    if constraint.square && size.width != size.height {
        validity.add(
            IMAGE_SIZE,
            format!("The {} needs to have the same width and height", constraint.subject),
        );
    }
    validity
}
