//! Product drafts and the validated product that leaves the client.
//!
//! A [`ProductDraft`] is whatever the user has typed so far. The only way to
//! obtain a [`NewProduct`] is [`ProductDraft::validated`], so code that sends
//! products can never be handed a draft that failed validation.

use core::fmt;

use thiserror::Error;

use crate::types::{CategoryId, CategoryOption};
use crate::validation::{ValidationResult, check};

/// Content types the image picker offers.
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// Errors building an [`ImageFile`] from a picked file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageFileError {
    /// The file is not a PNG or JPEG image.
    #[error("unsupported image type for {0}: expected PNG or JPEG")]
    UnsupportedType(String),
}

/// A file chosen in the image picker.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl ImageFile {
    /// Wrap file contents with an explicit content type.
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Wrap file contents, inferring the content type from the file name.
    ///
    /// # Errors
    ///
    /// Returns [`ImageFileError::UnsupportedType`] unless the name ends in
    /// `.png`, `.jpg` or `.jpeg`.
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ImageFileError> {
        let name = name.into();
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let content_type = match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            _ => return Err(ImageFileError::UnsupportedType(name)),
        };

        Ok(Self::new(name, content_type, bytes))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// In-progress state of the new-product form.
///
/// `files` mirrors a multi-select file input. Only the first file is ever
/// validated or uploaded; any further files are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub price: String,
    pub category: Option<CategoryOption>,
    pub files: Vec<ImageFile>,
}

impl ProductDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: CategoryOption) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: ImageFile) -> Self {
        self.files.push(file);
        self
    }

    /// The file that will be validated and uploaded: the first one picked.
    #[must_use]
    pub fn image(&self) -> Option<&ImageFile> {
        self.files.first()
    }

    /// Label for the upload control: the chosen file's name, if any.
    #[must_use]
    pub fn upload_label(&self) -> Option<&str> {
        self.image().map(ImageFile::name)
    }

    /// Validate the draft and, if every field passes, produce the product
    /// to send.
    ///
    /// # Errors
    ///
    /// Returns the full per-field result when any rule fails.
    pub fn validated(&self) -> Result<NewProduct, ValidationResult> {
        let (category, image) = check(self)?;
        Ok(NewProduct {
            name: self.name.clone(),
            price: self.price.clone(),
            category_id: category.id,
            image: image.clone(),
        })
    }
}

/// A product that passed validation, ready for the multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    name: String,
    price: String,
    category_id: CategoryId,
    image: ImageFile,
}

impl NewProduct {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price exactly as typed.
    #[must_use]
    pub fn price(&self) -> &str {
        &self.price
    }

    #[must_use]
    pub const fn category_id(&self) -> CategoryId {
        self.category_id
    }

    #[must_use]
    pub const fn image(&self) -> &ImageFile {
        &self.image
    }
}
