//! Decides, per declared part, whether absence is permitted and what value results.

use crate::PartError;

/// Whether a part has to be present in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optionality {
    /// Absence fails the request with [`PartError::MissingRequiredPart`].
    Required,

    /// Absence resolves to `None`.
    Optional,
}

/// Declaration of one named part of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartSpec {
    name: &'static str,
    optionality: Optionality,
    limit: Option<usize>,
}

impl PartSpec {
    /// Declares a part that must be present.
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            optionality: Optionality::Required,
            limit: None,
        }
    }

    /// Declares a part that may be left out of the request.
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            optionality: Optionality::Optional,
            limit: None,
        }
    }

    /// Caps the number of bytes accepted for this part. The limit is shared by every occurrence
    /// of the name.
    pub const fn limit(self, limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }

    /// Name of the part in the form.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared optionality.
    pub const fn optionality(&self) -> Optionality {
        self.optionality
    }

    /// Returns true if the part may be absent.
    pub const fn is_optional(&self) -> bool {
        matches!(self.optionality, Optionality::Optional)
    }

    /// Byte limit for this part, if any.
    pub const fn size_limit(&self) -> Option<usize> {
        self.limit
    }
}

/// Resolves a declared part against what the request carried.
///
/// Optionality is consulted before the part is decoded, and the rule is the same for every part
/// type: an absent optional part is `Ok(None)`, an absent required part is
/// [`PartError::MissingRequiredPart`], a present part is passed through for decoding.
pub fn resolve<T>(spec: &PartSpec, found: Option<T>) -> Result<Option<T>, PartError> {
    match (found, spec.optionality) {
        (Some(part), _) => Ok(Some(part)),
        (None, Optionality::Optional) => Ok(None),
        (None, Optionality::Required) => Err(PartError::MissingRequiredPart(spec.name.to_owned())),
    }
}

/// Resolves a part the form cannot do without.
///
/// The part must be declared [`Optionality::Required`]; binding an optional declaration this way
/// fails with [`PartError::OptionalityMismatch`] whether or not the part is present, so the
/// declaration stays the only source of optionality.
pub fn resolve_required<T>(spec: &PartSpec, found: Option<T>) -> Result<T, PartError> {
    let mismatch = || PartError::OptionalityMismatch(spec.name.to_owned());

    if spec.is_optional() {
        return Err(mismatch());
    }

    resolve(spec, found)?.ok_or_else(mismatch)
}

/// Types with a designated "empty" value, used in place of an absent optional part.
pub trait EmptyValue {
    /// The empty value.
    fn empty() -> Self;
}

/// Returns the resolved value, or the type's designated empty value when the part was absent.
pub fn or_empty<T: EmptyValue>(value: Option<T>) -> T {
    value.unwrap_or_else(T::empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{form::file::FilePart, Item};

    const ITEM: PartSpec = PartSpec::required("item");
    const MAYBE_ITEM: PartSpec = PartSpec::optional("item");

    #[test]
    fn present_parts_pass_through() {
        assert_eq!(resolve(&ITEM, Some(1)).unwrap(), Some(1));
        assert_eq!(resolve(&MAYBE_ITEM, Some(1)).unwrap(), Some(1));
    }

    #[test]
    fn absent_optional_part_is_none() {
        assert!(resolve::<Item>(&MAYBE_ITEM, None).unwrap().is_none());
    }

    #[test]
    fn absent_required_part_fails() {
        match resolve::<Item>(&ITEM, None) {
            Err(PartError::MissingRequiredPart(name)) => assert_eq!(name, "item"),
            other => panic!("unexpected resolution: {other:?}"),
        }
    }

    #[test]
    fn optionality_does_not_depend_on_part_type() {
        let file = PartSpec::optional("file");
        assert!(resolve::<FilePart>(&file, None).unwrap().is_none());
        assert!(resolve::<Item>(&file, None).unwrap().is_none());
        assert!(resolve::<String>(&file, None).unwrap().is_none());

        let file = PartSpec::required("file");
        assert!(resolve::<FilePart>(&file, None).is_err());
        assert!(resolve::<Item>(&file, None).is_err());
    }

    #[test]
    fn required_resolution() {
        assert_eq!(resolve_required(&ITEM, Some(1)).unwrap(), 1);

        match resolve_required::<Item>(&ITEM, None) {
            Err(PartError::MissingRequiredPart(name)) => assert_eq!(name, "item"),
            other => panic!("unexpected resolution: {other:?}"),
        }
    }

    #[test]
    fn required_resolution_rejects_optional_declaration() {
        assert!(matches!(
            resolve_required::<Item>(&MAYBE_ITEM, None),
            Err(PartError::OptionalityMismatch(name)) if name == "item"
        ));
        assert!(matches!(
            resolve_required(&MAYBE_ITEM, Some(1)),
            Err(PartError::OptionalityMismatch(_))
        ));
    }

    #[test]
    fn builder() {
        let spec = PartSpec::optional("file").limit(1024);
        assert_eq!(spec.name(), "file");
        assert_eq!(spec.optionality(), Optionality::Optional);
        assert!(spec.is_optional());
        assert_eq!(spec.size_limit(), Some(1024));
        assert_eq!(ITEM.size_limit(), None);
        assert!(!ITEM.is_optional());
    }

    #[test]
    fn empty_substitution() {
        assert_eq!(or_empty::<Item>(None), Item { name: None });

        let item = Item {
            name: Some("Test".to_owned()),
        };
        assert_eq!(or_empty(Some(item.clone())), item);
    }
}
