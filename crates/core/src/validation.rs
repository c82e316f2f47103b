//! Field rules for the new-product form.
//!
//! [`validate`] checks every field independently and collects all failures
//! in one pass, so a form can flag each offending field at once.
//!
//! | Field      | Rule                                                     |
//! |------------|----------------------------------------------------------|
//! | `name`     | required                                                 |
//! | `price`    | required (any non-empty text, no numeric check)          |
//! | `category` | required                                                 |
//! | `image`    | required; first file at most [`MAX_IMAGE_BYTES`] bytes   |

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::draft::{ImageFile, ProductDraft};
use crate::types::CategoryOption;

/// Largest accepted image upload, inclusive.
pub const MAX_IMAGE_BYTES: usize = 400_000;

/// Form fields that carry validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Price,
    Category,
    Image,
}

impl Field {
    /// All fields, in form order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Price, Self::Category, Self::Image];

    /// Form field name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Category => "category",
            Self::Image => "file",
        }
    }
}

/// Why a field failed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    #[error("required")]
    Required,
    #[error("file too large")]
    TooLarge,
}

impl FieldError {
    /// Message shown under the field in the form.
    #[must_use]
    pub const fn message(self, field: Field) -> &'static str {
        match (field, self) {
            (Field::Name, _) => "Digite o nome do produto",
            (Field::Price, _) => "Digite o valor do produto",
            (Field::Category, _) => "Escolha uma categoria",
            (Field::Image, Self::Required) => "Insira uma imagem",
            (Field::Image, Self::TooLarge) => "Carregue arquivos de até 4MB",
        }
    }
}

/// Per-field outcome of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: BTreeMap<Field, FieldError>,
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    /// Failing fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.errors.iter().map(|(field, error)| (*field, *error))
    }

    /// Form message for a failing field.
    #[must_use]
    pub fn message(&self, field: Field) -> Option<&'static str> {
        self.get(field).map(|error| error.message(field))
    }

    fn insert(&mut self, field: Field, error: FieldError) {
        self.errors.insert(field, error);
    }
}

/// Check every field of `draft`.
#[must_use]
pub fn validate(draft: &ProductDraft) -> ValidationResult {
    check(draft).err().unwrap_or_default()
}

/// Check every field of `draft`, returning the category and image that
/// passed when nothing failed. An `Err` always names at least one field.
pub(crate) fn check(
    draft: &ProductDraft,
) -> Result<(&CategoryOption, &ImageFile), ValidationResult> {
    let mut result = ValidationResult::default();

    if draft.name.is_empty() {
        result.insert(Field::Name, FieldError::Required);
    }

    // Presence only: "abc" is an accepted price.
    if draft.price.is_empty() {
        result.insert(Field::Price, FieldError::Required);
    }

    let category = draft.category.as_ref();
    if category.is_none() {
        result.insert(Field::Category, FieldError::Required);
    }

    let image = match draft.image() {
        None => {
            result.insert(Field::Image, FieldError::Required);
            None
        }
        Some(file) if file.size() > MAX_IMAGE_BYTES => {
            result.insert(Field::Image, FieldError::TooLarge);
            None
        }
        Some(file) => Some(file),
    };

    match (category, image) {
        (Some(category), Some(image)) if result.is_valid() => Ok((category, image)),
        _ => Err(result),
    }
}
