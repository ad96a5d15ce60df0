use serde::{Deserialize, Serialize};

/// A single image record as returned by `/v2/list` and `/id/{id}/info`.
///
/// Every field is required; a record missing any of them fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PicsumImage {
    pub id: String,
    pub author: String,
    pub width: u32,
    pub height: u32,
    /// Page on unsplash.com the photo originates from.
    pub url: String,
    /// Full-resolution rendition on picsum.photos.
    pub download_url: String,
}

/// Query parameters for the list endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_wire_record() {
        let json = r#"{
            "id": "0",
            "author": "Alejandro Escamilla",
            "width": 5000,
            "height": 3333,
            "url": "https://unsplash.com/photos/yC-Yzbqy7PY",
            "download_url": "https://picsum.photos/id/0/5000/3333"
        }"#;

        let image: PicsumImage = serde_json::from_str(json).unwrap();
        assert_eq!(image.id, "0");
        assert_eq!(image.author, "Alejandro Escamilla");
        assert_eq!(image.width, 5000);
        assert_eq!(image.download_url, "https://picsum.photos/id/0/5000/3333");
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{"id": "1", "author": "x", "width": 10, "height": 10, "url": "u"}"#;
        let err = serde_json::from_str::<PicsumImage>(json).unwrap_err();
        assert!(err.to_string().contains("download_url"));
    }
}
