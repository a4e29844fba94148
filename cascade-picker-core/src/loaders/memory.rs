//! In-memory options loader

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::hash::Hash;

use crate::engine::CascadeEngine;
use crate::error::CascadeResult;
use crate::traits::OptionsLoader;
use crate::types::{PickerOption, PickerValue};

/// One node of an option tree, its children fill the next column
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct OptionNode<T> {
    pub text: String,
    pub value: T,
    #[serde(default)]
    pub children: Vec<OptionNode<T>>,
}

/// Loader answering from a static option tree
///
/// Column 0 always gets the root options. A deeper column gets the children
/// registered for its parent value, or nothing.
#[derive(Debug, Clone)]
pub struct MemoryOptionsLoader<T> {
    roots: Vec<PickerOption<T>>,
    children: HashMap<(usize, T), Vec<PickerOption<T>>>,
}

impl<T: PickerValue + Eq + Hash> MemoryOptionsLoader<T> {
    #[must_use]
    pub fn new(roots: Vec<PickerOption<T>>) -> Self {
        Self {
            roots,
            children: HashMap::new(),
        }
    }

    /// Register the options `column` shows when `parent` is selected before it.
    #[must_use]
    pub fn with_children(
        mut self,
        column: usize,
        parent: T,
        options: Vec<PickerOption<T>>,
    ) -> Self {
        self.children.insert((column, parent), options);
        self
    }

    /// Flatten a tree: roots fill column 0, each level below the next column.
    #[must_use]
    pub fn from_tree(nodes: Vec<OptionNode<T>>) -> Self {
        let mut loader = Self::new(Vec::new());
        loader.roots = loader.flatten(nodes, 0);
        loader
    }

    fn flatten(&mut self, nodes: Vec<OptionNode<T>>, column: usize) -> Vec<PickerOption<T>> {
        let mut options = Vec::with_capacity(nodes.len());
        for node in nodes {
            if !node.children.is_empty() {
                let children = self.flatten(node.children, column + 1);
                self.children
                    .insert((column + 1, node.value.clone()), children);
            }
            options.push(PickerOption::new(node.text, node.value));
        }
        options
    }

    fn options_for(&self, parent: Option<&T>, column: usize) -> Vec<PickerOption<T>> {
        if column == 0 {
            return self.roots.clone();
        }
        parent
            .and_then(|parent| self.children.get(&(column, parent.clone())))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl<T: PickerValue + Eq + Hash> OptionsLoader<T> for MemoryOptionsLoader<T> {
    async fn load(
        &self,
        _picker: &CascadeEngine<T>,
        parent: Option<&T>,
        column: usize,
    ) -> CascadeResult<Vec<PickerOption<T>>> {
        Ok(self.options_for(parent, column))
    }
}
