use std::fmt;

/// Policy deciding which element names an encoder may write.
///
/// Messages only carry the validator; encoders consult it.
pub trait ElementNameValidator: fmt::Debug + Send + Sync {
    fn is_valid_element_name(&self, name: &str) -> bool;

    /// Validator to apply to the content of the element called `name`.
    fn validator_for(&self, name: &str) -> &dyn ElementNameValidator;
}

/// Accepts every name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpElementNameValidator;

impl ElementNameValidator for NoOpElementNameValidator {
    fn is_valid_element_name(&self, _name: &str) -> bool {
        true
    }

    fn validator_for(&self, _name: &str) -> &dyn ElementNameValidator {
        self
    }
}

/// Names allowed in documents stored in a collection: non-empty, no leading
/// `$`, no `.`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionElementNameValidator;

impl ElementNameValidator for CollectionElementNameValidator {
    fn is_valid_element_name(&self, name: &str) -> bool {
        !name.is_empty() && !name.starts_with('$') && !name.contains('.')
    }

    fn validator_for(&self, _name: &str) -> &dyn ElementNameValidator {
        self
    }
}
