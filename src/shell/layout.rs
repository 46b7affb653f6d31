//! Declarative component tree.

use serde::Serialize;

use super::ComponentId;

/// Title styling carried through to the web page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingStyle {
    pub text_align: &'static str,
    pub color: &'static str,
    pub font_size_px: u32,
}

impl Default for HeadingStyle {
    fn default() -> Self {
        Self {
            text_align: "center",
            color: "#503D36",
            font_size_px: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    Page {
        children: Vec<Component>,
    },
    Heading {
        text: String,
        style: HeadingStyle,
    },
    Section {
        children: Vec<Component>,
    },
    Label {
        text: String,
    },
    /// Single-choice selector with no default value.
    Dropdown {
        id: ComponentId,
        options: Vec<DropdownOption>,
        placeholder: String,
        disabled: bool,
    },
    /// Region whose children are replaced by a binding.
    Output {
        id: ComponentId,
        class_name: String,
    },
}

impl Component {
    pub fn children(&self) -> &[Component] {
        match self {
            Component::Page { children } | Component::Section { children } => children,
            _ => &[],
        }
    }

    /// Depth-first search for the dropdown with `id`.
    pub fn find_dropdown(&self, id: ComponentId) -> Option<&Component> {
        if let Component::Dropdown { id: own, .. } = self {
            if *own == id {
                return Some(self);
            }
        }
        self.children().iter().find_map(|child| child.find_dropdown(id))
    }

    /// Options of the dropdown with `id` (empty when absent).
    pub fn dropdown_options(&self, id: ComponentId) -> &[DropdownOption] {
        match self.find_dropdown(id) {
            Some(Component::Dropdown { options, .. }) => options,
            _ => &[],
        }
    }
}
