//! Storage metadata records and their canonical resource form.

use fake::{
    faker::{filesystem::en::FileName, internet::en::Username, lorem::en::Word},
    Fake,
};
use serde::{Deserialize, Serialize};

/// The `resource_type` assigned to every converted upload record.
pub const RESOURCE_TYPE: &str = "file.upload";

/// The object-storage service's native description of an uploaded file.
///
/// Internal fields on the wire carry an underscore prefix; a couple use
/// kebab-case. The serde renames keep the Rust names conventional.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageMetadata {
    /// Checksum of the stored file, in `algo:digest` form.
    #[serde(rename = "_checksum")]
    pub checksum: String,

    /// Size of the stored file, in bytes.
    #[serde(rename = "_content_length")]
    pub content_length: u64,

    /// When the file was uploaded, without timezone qualifier.
    #[serde(rename = "_creation_date")]
    pub creation_date: String,

    /// The storage service's display label.
    #[serde(rename = "_label")]
    pub label: String,

    /// When the file was last modified, without timezone qualifier.
    #[serde(rename = "_last_modified")]
    pub last_modified: String,

    /// Where the file can be downloaded from. Either an absolute URL or a
    /// root-relative path.
    #[serde(rename = "_location")]
    pub location: String,

    /// The filename the uploader gave the file.
    #[serde(rename = "filename-original")]
    pub filename_original: String,

    /// The storage key of the file.
    pub key: String,

    /// The account that uploaded the file.
    #[serde(rename = "uploaded-by")]
    pub uploaded_by: String,

    /// The MIME type of the file, when the storage service recorded one.
    #[serde(rename = "_format", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl StorageMetadata {
    /// Convert this record into its canonical [`Resource`] form.
    ///
    /// `site_root` is the absolute base URL used to qualify a root-relative
    /// `_location`; an already-absolute location is used as-is. Timestamps
    /// pass through byte-for-byte; qualifying them with a timezone is
    /// [`normalize_timestamp`](crate::normalize_timestamp)'s job, applied by
    /// consumers that need it.
    pub fn to_resource(&self, site_root: &str) -> Resource {
        let url = if self.location.starts_with('/') {
            // Plain concatenation: the location's percent-encoding must
            // survive byte-for-byte, so no URL resolution here.
            format!("{}{}", site_root, self.location)
        } else {
            self.location.clone()
        };

        let (format, mimetype) = match &self.format {
            Some(mime) => (Some(mime.clone()), Some(mime.clone())),
            None => (filename_extension(&self.filename_original), None),
        };

        Resource {
            url: url.clone(),
            key: self.key.clone(),
            name: self.filename_original.clone(),
            size: self.content_length,
            created: self.creation_date.clone(),
            last_modified: self.last_modified.clone(),
            format,
            mimetype,
            resource_type: RESOURCE_TYPE.to_string(),
            owner: self.uploaded_by.clone(),
            hash: self.checksum.clone(),
            cache_url: url,
            cache_url_updated: self.last_modified.clone(),
        }
    }
}

impl<F> fake::Dummy<F> for StorageMetadata {
    fn dummy_with_rng<R: rand::Rng + ?Sized>(_config: &F, rng: &mut R) -> Self {
        Self {
            checksum: format!("md5:{:032x}", rng.gen::<u128>()),
            content_length: rng.gen_range(1..10_000_000),
            creation_date: fake_plain_timestamp(rng),
            label: Word().fake_with_rng(rng),
            last_modified: fake_plain_timestamp(rng),
            location: format!("/storage/f/{}", Word().fake_with_rng::<String, R>(rng)),
            filename_original: FileName().fake_with_rng(rng),
            key: format!("{:08x}", rng.gen::<u32>()),
            uploaded_by: Username().fake_with_rng(rng),
            format: None,
        }
    }
}

/// A timestamp in the storage service's plain format, without sub-second
/// fraction or timezone. For test data.
fn fake_plain_timestamp<R: rand::Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "20{:02}-{:02}-{:02}T{:02}:{:02}:{:02}",
        rng.gen_range(10..30),
        rng.gen_range(1..13),
        rng.gen_range(1..29),
        rng.gen_range(0..24),
        rng.gen_range(0..60),
        rng.gen_range(0..60),
    )
}

/// The canonical, storage-backend-independent description of an upload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    /// Absolute URL the file can be downloaded from.
    pub url: String,

    /// The storage key of the file.
    pub key: String,

    /// The original filename.
    pub name: String,

    /// Size in bytes.
    pub size: u64,

    /// Upload time, passed through from the metadata record.
    pub created: String,

    /// Last modification time, passed through from the metadata record.
    pub last_modified: String,

    /// The file format. The recorded MIME type when there is one, otherwise
    /// the lowercased filename extension, otherwise `None`.
    pub format: Option<String>,

    /// The recorded MIME type, or `None` when the storage service did not
    /// record one.
    pub mimetype: Option<String>,

    /// Always [`RESOURCE_TYPE`].
    pub resource_type: String,

    /// The account that uploaded the file.
    pub owner: String,

    /// Checksum of the file.
    pub hash: String,

    /// Cached-copy URL. Equal to `url` for storage-backed resources.
    pub cache_url: String,

    /// When the cached copy was refreshed. Equal to `last_modified`.
    pub cache_url_updated: String,
}

/// The lowercased extension of `name`, or `None` when it has no `.`.
fn filename_extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_stem, ext)| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_convert_remaps_every_field() {
        let meta: StorageMetadata = serde_json::from_value(json!({
            "_checksum": "md5:527a2c7ed21dd8a8d11f28fab38c7750",
            "_content_length": 110576,
            "_creation_date": "2014-10-01T11:31:36",
            "_label": "2014-10-01T11:31:36.331Z/report.pdf",
            "_last_modified": "2014-10-01T11:31:37",
            "_location": "/storage/f/2014-10-01T11%3A31%3A36.331Z/report.pdf",
            "filename-original": "report.pdf",
            "key": "2014-10-01T11:31:36.331Z/report.pdf",
            "uploaded-by": "demo",
        }))
        .unwrap();

        let resource = meta.to_resource("http://example.com");
        assert_eq!(
            resource,
            Resource {
                url: "http://example.com/storage/f/2014-10-01T11%3A31%3A36.331Z/report.pdf"
                    .to_string(),
                key: "2014-10-01T11:31:36.331Z/report.pdf".to_string(),
                name: "report.pdf".to_string(),
                size: 110576,
                created: "2014-10-01T11:31:36".to_string(),
                last_modified: "2014-10-01T11:31:37".to_string(),
                format: Some("pdf".to_string()),
                mimetype: None,
                resource_type: "file.upload".to_string(),
                owner: "demo".to_string(),
                hash: "md5:527a2c7ed21dd8a8d11f28fab38c7750".to_string(),
                cache_url:
                    "http://example.com/storage/f/2014-10-01T11%3A31%3A36.331Z/report.pdf"
                        .to_string(),
                cache_url_updated: "2014-10-01T11:31:37".to_string(),
            }
        );
    }

    #[test]
    fn test_absolute_location_is_used_as_is() {
        let meta = StorageMetadata {
            location: "https://cdn.example.com/f/report.pdf".to_string(),
            ..Faker.fake()
        };
        let resource = meta.to_resource("http://example.com");
        assert_eq!(resource.url, "https://cdn.example.com/f/report.pdf");
        assert_eq!(resource.cache_url, resource.url);
    }

    #[test]
    fn test_recorded_mime_type_fills_both_format_fields() {
        let meta = StorageMetadata {
            format: Some("image/jpeg".to_string()),
            filename_original: "holiday.png".to_string(),
            ..Faker.fake()
        };
        let resource = meta.to_resource("http://example.com");
        assert_eq!(resource.format.as_deref(), Some("image/jpeg"));
        assert_eq!(resource.mimetype.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn test_format_falls_back_to_the_lowercased_extension() {
        let meta = StorageMetadata {
            format: None,
            filename_original: "Holiday.JPG".to_string(),
            ..Faker.fake()
        };
        let resource = meta.to_resource("http://example.com");
        assert_eq!(resource.format.as_deref(), Some("jpg"));
        assert_eq!(resource.mimetype, None);
    }

    #[test]
    fn test_extensionless_filename_gives_no_format() {
        let meta = StorageMetadata {
            format: None,
            filename_original: "README".to_string(),
            ..Faker.fake()
        };
        let resource = meta.to_resource("http://example.com");
        assert_eq!(resource.format, None);
        assert_eq!(resource.mimetype, None);
    }

    #[test]
    fn test_timestamps_pass_through_unmodified() {
        let meta = StorageMetadata {
            creation_date: "2012-07-17T14:35:35".to_string(),
            last_modified: "2012-07-18T09:00:01".to_string(),
            ..Faker.fake()
        };
        let resource = meta.to_resource("http://example.com");
        assert_eq!(resource.created, "2012-07-17T14:35:35");
        assert_eq!(resource.last_modified, "2012-07-18T09:00:01");
        assert_eq!(resource.cache_url_updated, "2012-07-18T09:00:01");
    }
}
