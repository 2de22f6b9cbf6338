pub mod product;

use crate::error::FieldErrors;

/// Request bodies that check themselves before reaching a service.
pub trait Validate: Sized {
    /// What a body becomes once every field has passed.
    type Valid;

    fn validate(self) -> Result<Self::Valid, FieldErrors>;
}

impl Validate for product::ProductRequest {
    type Valid = product::NewProduct;

    fn validate(self) -> Result<Self::Valid, FieldErrors> {
        product::ProductRequest::validate(self)
    }
}
