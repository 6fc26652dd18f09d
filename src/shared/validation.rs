use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Content types accepted for report images.
    /// The extension stored alongside the object is derived from this declared
    /// type, never from a client-supplied filename.
    /// - Valid: "image/jpeg", "image/png", "image/webp", "image/gif"
    /// - Invalid: "image/svg+xml", "application/pdf", "video/mp4"
    pub static ref IMAGE_CONTENT_TYPE_REGEX: Regex =
        Regex::new(r"^image/(jpeg|png|webp|gif)$").unwrap();
}

/// Check whether a declared content type is an accepted report image type
pub fn is_image_content_type(content_type: &str) -> bool {
    IMAGE_CONTENT_TYPE_REGEX.is_match(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_content_type_valid() {
        assert!(is_image_content_type("image/jpeg"));
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("image/webp"));
        assert!(is_image_content_type("image/gif"));
    }

    #[test]
    fn test_image_content_type_invalid() {
        assert!(!is_image_content_type("image/svg+xml")); // scriptable
        assert!(!is_image_content_type("application/pdf"));
        assert!(!is_image_content_type("video/mp4"));
        assert!(!is_image_content_type("image/JPEG")); // case-sensitive
        assert!(!is_image_content_type("image/jpeg; charset=utf-8"));
        assert!(!is_image_content_type(""));
    }
}
