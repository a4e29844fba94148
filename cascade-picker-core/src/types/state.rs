//! Picker state published to the host store

use serde::{Deserialize, Serialize};

use super::option::{position_of, PickerOption};
use super::prompt::PromptTemplate;

/// Everything the view layer needs to render one cascade picker.
///
/// Selected indices are *display* indices: when a column has a placeholder it
/// occupies display index 0 and every real option is shifted by one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerState<T> {
    /// Placeholder text per column, `None` when the column has none
    #[serde(default)]
    pub prompt_texts: Vec<Option<String>>,

    /// Option group per column
    #[serde(default)]
    pub options_groups: Vec<Vec<PickerOption<T>>>,

    /// Display index per column, absent until a selection is first resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_indexs: Option<Vec<Option<usize>>>,

    /// Binding name of the change handler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_change_name: Option<String>,

    /// Binding name of the cancel-click handler (presenter only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_cancel_name: Option<String>,

    /// Binding name of the confirm-click handler (presenter only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_confirm_name: Option<String>,

    /// Whether the panel is shown (presenter only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl<T> Default for PickerState<T> {
    fn default() -> Self {
        Self {
            prompt_texts: Vec::new(),
            options_groups: Vec::new(),
            select_indexs: None,
            on_change_name: None,
            on_cancel_name: None,
            on_confirm_name: None,
            visible: None,
        }
    }
}

impl<T: Clone + PartialEq> PickerState<T> {
    /// Number of columns currently known.
    pub fn column_count(&self) -> usize {
        self.options_groups.len()
    }

    pub fn options_group(&self, column: usize) -> Option<&[PickerOption<T>]> {
        self.options_groups.get(column).map(Vec::as_slice)
    }

    pub fn has_prompt(&self, column: usize) -> bool {
        matches!(self.prompt_texts.get(column), Some(Some(_)))
    }

    /// Display index selected in `column`.
    pub fn select_index(&self, column: usize) -> Option<usize> {
        self.select_indexs
            .as_ref()
            .and_then(|indexs| indexs.get(column).copied().flatten())
    }

    /// `index` if it is a valid display index of `column`, counting the placeholder slot.
    pub fn bounded_index(&self, column: usize, index: usize) -> Option<usize> {
        let group = self.options_groups.get(column)?;
        let bound = group.len() + usize::from(self.has_prompt(column));
        (index < bound).then_some(index)
    }

    /// Index into the option group selected in `column`, i.e. with the
    /// placeholder slot removed. Selecting the placeholder yields `None`.
    pub fn select_data_index(&self, column: usize) -> Option<usize> {
        let index = self.select_index(column)?;
        if self.has_prompt(column) {
            index.checked_sub(1)
        } else {
            Some(index)
        }
    }

    pub fn selected_item(&self, column: usize) -> Option<&PickerOption<T>> {
        let index = self.select_data_index(column)?;
        self.options_groups.get(column)?.get(index)
    }

    pub fn selected_value(&self, column: usize) -> Option<T> {
        self.selected_item(column).map(|item| item.value.clone())
    }

    /// Selected option per column.
    pub fn selected_items(&self) -> Vec<Option<PickerOption<T>>> {
        (0..self.column_count())
            .map(|column| self.selected_item(column).cloned())
            .collect()
    }

    /// Selected value per column.
    pub fn values(&self) -> Vec<Option<T>> {
        (0..self.column_count())
            .map(|column| self.selected_value(column))
            .collect()
    }

    pub fn set_select_index(&mut self, column: usize, index: Option<usize>) {
        let indexs = self.select_indexs.get_or_insert_with(Vec::new);
        if indexs.len() <= column {
            indexs.resize(column + 1, None);
        }
        indexs[column] = index;
    }

    /// Point `column` at the first option whose value equals `value`.
    ///
    /// A miss selects the placeholder when the column has one, otherwise
    /// clears the selection.
    pub fn update_select_index_by_value(&mut self, column: usize, value: &T) {
        let position = self
            .options_group(column)
            .and_then(|group| position_of(group, value));
        let index = if self.has_prompt(column) {
            Some(position.map_or(0, |p| p + 1))
        } else {
            position
        };
        self.set_select_index(column, index);
    }

    /// Replace every option group, resizing the placeholders to match.
    pub fn set_options_groups(
        &mut self,
        groups: Vec<Vec<PickerOption<T>>>,
        template: &PromptTemplate,
    ) {
        self.options_groups = groups;
        self.adjust_prompt_texts(template);
        self.clear_out_of_range_indexs(usize::MAX);
    }

    /// Write the option group of `column`, growing the column list if needed.
    pub fn set_options_group(
        &mut self,
        column: usize,
        items: Vec<PickerOption<T>>,
        template: &PromptTemplate,
    ) {
        if self.options_groups.len() <= column {
            self.options_groups.resize_with(column + 1, Vec::new);
        }
        self.options_groups[column] = items;
        self.adjust_prompt_texts(template);
        if let Some(index) = self.select_index(column) {
            if self.bounded_index(column, index).is_none() {
                self.set_select_index(column, None);
            }
        }
    }

    /// Clear the selection of every column whose index falls outside its
    /// group, skipping the known columns from `end` on.
    pub fn clear_out_of_range_indexs(&mut self, end: usize) {
        let Some(indexs) = self.select_indexs.take() else {
            return;
        };
        let count = self.column_count();
        let indexs = indexs
            .into_iter()
            .enumerate()
            .map(|(column, index)| match index {
                Some(index) if column < end || column >= count => {
                    self.bounded_index(column, index)
                }
                index => index,
            })
            .collect();
        self.select_indexs = Some(indexs);
    }

    /// Keep one placeholder per option group: drop the extra ones and render
    /// the missing ones from `template`.
    pub fn adjust_prompt_texts(&mut self, template: &PromptTemplate) {
        let count = self.options_groups.len();
        if self.prompt_texts.len() > count {
            self.prompt_texts.truncate(count);
        }
        for column in self.prompt_texts.len()..count {
            self.prompt_texts.push(template.render(column));
        }
    }

    /// First column whose selection differs between the stored indices and
    /// `incoming`. No stored indices means everything changed from column 0;
    /// `None` means nothing changed. An incoming index outside its group
    /// counts as no selection.
    pub fn first_changed_column(&self, incoming: &[usize]) -> Option<usize> {
        let Some(previous) = self.select_indexs.as_ref() else {
            return Some(0);
        };
        incoming
            .iter()
            .enumerate()
            .find(|(column, index)| {
                previous.get(*column).copied().flatten() != self.bounded_index(*column, **index)
            })
            .map(|(column, _)| column)
    }
}
