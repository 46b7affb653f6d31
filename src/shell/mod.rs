//! Presentation shell: the declared component tree and its reactive bindings.
//!
//! Runtimes (web, terminal) never call the controller directly. They hold a
//! [`Dashboard`], report which selector changed, and apply the returned
//! [`Update`]s to the named output slots.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::controller;
use crate::domain::{ChartSet, ReportKind, SalesTable, SelectionState, YEAR_MAX, YEAR_MIN};

pub mod layout;

pub use layout::{Component, DropdownOption, HeadingStyle};

pub const TITLE: &str = "Automobile Sales Statistics Dashboard";

/// Identifiers of the interactive components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComponentId {
    #[serde(rename = "dropdown-statistics")]
    ReportSelector,
    #[serde(rename = "select-year")]
    YearSelector,
    #[serde(rename = "output-container")]
    Output,
}

impl ComponentId {
    pub const ALL: [ComponentId; 3] = [
        ComponentId::ReportSelector,
        ComponentId::YearSelector,
        ComponentId::Output,
    ];

    /// DOM id used by the web page.
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentId::ReportSelector => "dropdown-statistics",
            ComponentId::YearSelector => "select-year",
            ComponentId::Output => "output-container",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == raw)
    }
}

/// Component property a binding reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    Value,
    Disabled,
    Children,
}

/// A (component, property) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub component: ComponentId,
    pub property: Property,
}

impl Slot {
    pub const fn new(component: ComponentId, property: Property) -> Self {
        Self { component, property }
    }
}

/// New content for an output slot.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateValue {
    Disabled(bool),
    Children(ChartSet),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub target: Slot,
    pub value: UpdateValue,
}

/// Handler signature: the table plus current values of the declared inputs,
/// in declaration order.
pub type Handler = fn(&SalesTable, &[Option<&str>]) -> UpdateValue;

/// One declared input→output binding.
pub struct Callback {
    pub name: &'static str,
    pub inputs: Vec<Slot>,
    pub output: Slot,
    pub handler: Handler,
}

impl Callback {
    pub fn listens_to(&self, component: ComponentId) -> bool {
        self.inputs.iter().any(|slot| slot.component == component)
    }
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("output", &self.output)
            .finish()
    }
}

fn update_year_selector(_table: &SalesTable, inputs: &[Option<&str>]) -> UpdateValue {
    let report = inputs.first().copied().flatten();
    UpdateValue::Disabled(controller::year_selector_disabled(report))
}

fn update_output_container(table: &SalesTable, inputs: &[Option<&str>]) -> UpdateValue {
    let report = inputs.first().copied().flatten();
    let year = inputs.get(1).copied().flatten();
    UpdateValue::Children(controller::compute_chart_set(table, report, year))
}

/// The dashboard: immutable dataset, static layout, two bindings.
#[derive(Debug)]
pub struct Dashboard {
    table: Arc<SalesTable>,
    callbacks: Vec<Callback>,
}

impl Dashboard {
    pub fn new(table: Arc<SalesTable>) -> Self {
        let report_value = Slot::new(ComponentId::ReportSelector, Property::Value);
        let year_value = Slot::new(ComponentId::YearSelector, Property::Value);

        let callbacks = vec![
            Callback {
                name: "update_input_container",
                inputs: vec![report_value],
                output: Slot::new(ComponentId::YearSelector, Property::Disabled),
                handler: update_year_selector,
            },
            Callback {
                name: "update_output_container",
                inputs: vec![report_value, year_value],
                output: Slot::new(ComponentId::Output, Property::Children),
                handler: update_output_container,
            },
        ];

        Self { table, callbacks }
    }

    pub fn table(&self) -> &SalesTable {
        &self.table
    }

    pub fn callbacks(&self) -> &[Callback] {
        &self.callbacks
    }

    /// The static component tree.
    pub fn layout(&self) -> Component {
        let report_options = ReportKind::ALL
            .into_iter()
            .map(|kind| DropdownOption::new(kind.label(), kind.label()))
            .collect();
        let year_options = (YEAR_MIN..=YEAR_MAX)
            .map(|year| DropdownOption::new(year.to_string(), year.to_string()))
            .collect();

        Component::Page {
            children: vec![
                Component::Heading {
                    text: TITLE.to_string(),
                    style: HeadingStyle::default(),
                },
                Component::Section {
                    children: vec![
                        Component::Label {
                            text: "Select Statistics:".to_string(),
                        },
                        Component::Dropdown {
                            id: ComponentId::ReportSelector,
                            options: report_options,
                            placeholder: "Select a report type".to_string(),
                            disabled: false,
                        },
                    ],
                },
                Component::Section {
                    children: vec![
                        Component::Label {
                            text: "Select Year:".to_string(),
                        },
                        Component::Dropdown {
                            id: ComponentId::YearSelector,
                            options: year_options,
                            placeholder: "Select-year".to_string(),
                            disabled: true,
                        },
                    ],
                },
                Component::Output {
                    id: ComponentId::Output,
                    class_name: "chart-grid".to_string(),
                },
            ],
        }
    }

    /// Run every callback bound to `changed` (all of them when `None`, the
    /// initial render) against the current selector values.
    pub fn dispatch(&self, state: &SelectionState, changed: Option<ComponentId>) -> Vec<Update> {
        self.callbacks
            .iter()
            .filter(|cb| changed.is_none_or(|id| cb.listens_to(id)))
            .map(|cb| {
                let inputs: Vec<Option<&str>> = cb
                    .inputs
                    .iter()
                    .map(|slot| slot_value(state, slot.component))
                    .collect();
                debug!(callback = cb.name, ?changed, "dispatching");
                Update {
                    target: cb.output,
                    value: (cb.handler)(&self.table, &inputs),
                }
            })
            .collect()
    }
}

fn slot_value(state: &SelectionState, component: ComponentId) -> Option<&str> {
    match component {
        ComponentId::ReportSelector => state.report(),
        ComponentId::YearSelector => state.year(),
        ComponentId::Output => None,
    }
}
