//! Boundary validation for candidate events.
//!
//! Runs before a draft is handed to [`Timeline::add`]; the store itself
//! performs no re-validation. The checks mirror the input form: age in
//! (0, 120], happiness in [1, 10], non-blank description, and -- for
//! programmatic callers the form cannot police -- a well-formed embedded
//! photo buffer.
//!
//! [`Timeline::add`]: crate::Timeline::add

use lifegraph_types::{EventDraft, MAX_AGE, MAX_HAPPINESS, MIN_HAPPINESS};

use crate::error::ValidationError;

/// Check a candidate event against the domain constraints.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered, checked in form
/// order: age, description, happiness, photo.
pub fn validate_draft(draft: &EventDraft) -> Result<(), ValidationError> {
    if draft.age == 0 || draft.age > MAX_AGE {
        return Err(ValidationError::AgeOutOfRange {
            provided: draft.age,
        });
    }
    if draft.description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if draft.happiness < MIN_HAPPINESS || draft.happiness > MAX_HAPPINESS {
        return Err(ValidationError::HappinessOutOfRange {
            provided: draft.happiness,
        });
    }
    if let Some(image) = &draft.image
        && !image.is_well_formed()
    {
        return Err(ValidationError::MalformedImage {
            width: image.width,
            height: image.height,
            actual_len: image.pixels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lifegraph_types::EmbeddedImage;

    use super::*;

    fn valid_draft() -> EventDraft {
        EventDraft::new(10, 5, "처음으로 햄스터를 키웠어요".to_owned())
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(validate_draft(&valid_draft()), Ok(()));
    }

    #[test]
    fn age_zero_is_rejected_with_form_message() {
        let mut draft = valid_draft();
        draft.age = 0;
        let err = validate_draft(&draft).unwrap_err();
        assert_eq!(err, ValidationError::AgeOutOfRange { provided: 0 });
        assert_eq!(err.to_string(), "유효한 나이를 입력해주세요 (1-120).");
    }

    #[test]
    fn age_121_is_rejected() {
        let mut draft = valid_draft();
        draft.age = 121;
        assert_eq!(
            validate_draft(&draft),
            Err(ValidationError::AgeOutOfRange { provided: 121 })
        );
    }

    #[test]
    fn age_bounds_are_inclusive() {
        for age in [1, 120] {
            let mut draft = valid_draft();
            draft.age = age;
            assert_eq!(validate_draft(&draft), Ok(()), "age {age} should be valid");
        }
    }

    #[test]
    fn blank_description_is_rejected() {
        let mut draft = valid_draft();
        draft.description = "   \n".to_owned();
        let err = validate_draft(&draft).unwrap_err();
        assert_eq!(err, ValidationError::EmptyDescription);
        assert_eq!(err.to_string(), "어떤 일이 있었는지 설명해주세요.");
    }

    #[test]
    fn happiness_out_of_range_is_rejected() {
        for happiness in [0, 11] {
            let mut draft = valid_draft();
            draft.happiness = happiness;
            assert_eq!(
                validate_draft(&draft),
                Err(ValidationError::HappinessOutOfRange {
                    provided: happiness
                })
            );
        }
    }

    #[test]
    fn malformed_image_is_rejected() {
        let mut draft = valid_draft();
        draft.image = Some(EmbeddedImage {
            width: 4,
            height: 4,
            pixels: vec![0; 10],
        });
        assert_eq!(
            validate_draft(&draft),
            Err(ValidationError::MalformedImage {
                width: 4,
                height: 4,
                actual_len: 10
            })
        );
    }
}
