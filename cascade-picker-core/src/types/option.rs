//! Picker option type definition

use serde::{Deserialize, Serialize};

/// Bounds every option value has to meet.
///
/// Values are compared for equality only, never ordered.
pub trait PickerValue: Clone + PartialEq + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Send + Sync + 'static> PickerValue for T {}

/// One selectable entry of a picker column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PickerOption<T> {
    /// Display label
    pub text: String,
    /// Comparison key, handed to the loader as the parent value of the next column
    pub value: T,
}

impl<T> PickerOption<T> {
    #[must_use]
    pub fn new(text: impl Into<String>, value: T) -> Self {
        Self {
            text: text.into(),
            value,
        }
    }
}

/// Position of the first option whose value equals `value`.
pub(crate) fn position_of<T: PartialEq>(group: &[PickerOption<T>], value: &T) -> Option<usize> {
    group.iter().position(|item| item.value == *value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_of_first_match_wins() {
        let group = vec![
            PickerOption::new("A", 1),
            PickerOption::new("B", 2),
            PickerOption::new("B again", 2),
        ];
        assert_eq!(position_of(&group, &2), Some(1));
        assert_eq!(position_of(&group, &9), None);
    }

    #[test]
    fn option_uses_plain_field_names_on_the_wire() {
        let json = serde_json::to_value(PickerOption::new("Nanning", "450100")).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "Nanning", "value": "450100" }));
    }
}
