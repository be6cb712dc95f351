//! Per-user watermark colour choices.
//!
//! Held in memory only; everything is forgotten on restart. Users that
//! never picked a colour get the store's default.

use crate::watermark::NamedColor;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ColorPreferences {
    default: NamedColor,
    choices: HashMap<u64, NamedColor>,
}

impl ColorPreferences {
    pub fn new(default: NamedColor) -> Self {
        Self {
            default,
            choices: HashMap::new(),
        }
    }

    pub fn default_color(&self) -> NamedColor {
        self.default
    }

    pub fn get(&self, user_id: u64) -> NamedColor {
        self.choices.get(&user_id).copied().unwrap_or(self.default)
    }

    /// Store `color` for `user_id`, returning the previous explicit choice.
    pub fn set(&mut self, user_id: u64, color: NamedColor) -> Option<NamedColor> {
        self.choices.insert(user_id, color)
    }

    pub fn clear(&mut self, user_id: u64) -> Option<NamedColor> {
        self.choices.remove(&user_id)
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}
