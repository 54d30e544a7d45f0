//! Asyn parameters: the structured description of one driver parameter and
//! the records that expose it.

use indexmap::IndexMap;
use pvi_device::{enforce_pascal_case, Layout, ReadWidget, WriteWidget};
use serde::{Deserialize, Serialize};

use crate::kinds::AsynKind;

/// Records a parameter needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Access {
    /// Read record only.
    R,
    /// Write record only.
    W,
    /// Read and write record.
    #[default]
    RW,
}

impl Access {
    #[must_use]
    pub fn needs_read_record(self) -> bool {
        self != Self::W
    }

    #[must_use]
    pub fn needs_write_record(self) -> bool {
        self != Self::R
    }

    fn is_default(&self) -> bool {
        *self == Self::RW
    }
}

/// How a number should be formatted for display, from `info(Q:form, ...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayForm {
    Default,
    String,
    Binary,
    Decimal,
    Hex,
    Exponential,
    Engineering,
}

impl DisplayForm {
    /// Parses the value of a `Q:form` info tag.
    #[must_use]
    pub fn from_info(value: &str) -> Option<Self> {
        Some(match value {
            "Default" => Self::Default,
            "String" => Self::String,
            "Binary" => Self::Binary,
            "Decimal" => Self::Decimal,
            "Hex" => Self::Hex,
            "Exponential" => Self::Exponential,
            "Engineering" => Self::Engineering,
            _ => return None,
        })
    }

    /// The `Q:form` info value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::String => "String",
            Self::Binary => "Binary",
            Self::Decimal => "Decimal",
            Self::Hex => "Hex",
            Self::Exponential => "Exponential",
            Self::Engineering => "Engineering",
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One driver parameter with the read and/or write record exposing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsynParameter {
    pub name: String,
    pub description: String,
    pub asyn_type: AsynKind,
    /// Index variable in the driver source, `name` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    /// Driver info string, `name` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drv_info: Option<String>,
    #[serde(default, skip_serializing_if = "Access::is_default")]
    pub access: Access,
    /// Whether the write record updates when the readback changes.
    #[serde(default, skip_serializing_if = "is_false")]
    pub demand_auto_updates: bool,
    /// Read record suffix, `<name>_RBV` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_record_suffix: Option<String>,
    /// Write record suffix, `<name>` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_record_suffix: Option<String>,
    /// Value written at IOC start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,
    /// Fields saved by autosave.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub autosave: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_form: Option<DisplayForm>,
    /// Read widget, the kind default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_widget: Option<ReadWidget>,
    /// Write widget, the kind default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_widget: Option<WriteWidget>,
    /// Extra fields of the records.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub record_fields: IndexMap<String, String>,
}

impl AsynParameter {
    /// A read/write parameter with every optional setting at its default.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, asyn_type: AsynKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            asyn_type,
            index_name: None,
            drv_info: None,
            access: Access::RW,
            demand_auto_updates: false,
            read_record_suffix: None,
            write_record_suffix: None,
            initial: None,
            autosave: Vec::new(),
            display_form: None,
            read_widget: None,
            write_widget: None,
            record_fields: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn get_index_name(&self) -> &str {
        self.index_name.as_deref().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn get_drv_info(&self) -> &str {
        self.drv_info.as_deref().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn read_record_suffix(&self) -> String {
        self.read_record_suffix
            .clone()
            .unwrap_or_else(|| format!("{}_RBV", self.name))
    }

    #[must_use]
    pub fn write_record_suffix(&self) -> String {
        self.write_record_suffix
            .clone()
            .unwrap_or_else(|| self.name.clone())
    }

    #[must_use]
    pub fn read_widget(&self) -> ReadWidget {
        self.read_widget
            .clone()
            .unwrap_or_else(|| self.asyn_type.read_widget())
    }

    #[must_use]
    pub fn write_widget(&self) -> WriteWidget {
        self.write_widget
            .clone()
            .unwrap_or_else(|| self.asyn_type.write_widget())
    }
}

/// A named group of parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub layout: Layout,
    #[serde(default)]
    pub children: Vec<ParameterNode>,
}

/// A node of a parameter tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ParameterNode {
    Group(ParameterGroup),
    #[serde(rename = "AsynParameter")]
    Parameter(AsynParameter),
}

impl ParameterNode {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Group(group) => &group.name,
            Self::Parameter(parameter) => &parameter.name,
        }
    }
}

/// Every parameter of `nodes`, depth first.
pub fn parameters(nodes: &[ParameterNode]) -> Vec<&AsynParameter> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            ParameterNode::Group(group) => out.extend(parameters(&group.children)),
            ParameterNode::Parameter(parameter) => out.push(parameter),
        }
    }
    out
}

fn parameters_mut<'a>(nodes: &'a mut [ParameterNode], out: &mut Vec<&'a mut AsynParameter>) {
    for node in nodes {
        match node {
            ParameterNode::Group(group) => parameters_mut(&mut group.children, out),
            ParameterNode::Parameter(parameter) => out.push(parameter),
        }
    }
}

/// Wraps the parameters converted from template `stem` in a grid group named
/// after it.
#[must_use]
pub fn template_parameters(stem: &str, parameters: Vec<AsynParameter>) -> ParameterNode {
    ParameterNode::Group(ParameterGroup {
        name: enforce_pascal_case(stem),
        label: None,
        layout: Layout::grid(),
        children: parameters.into_iter().map(ParameterNode::Parameter).collect(),
    })
}

/// Sets the index name of each parameter found in `info_index` under its
/// driver info string. Index names equal to the parameter name stay unset.
pub fn merge_in_index_names(nodes: &mut [ParameterNode], info_index: &IndexMap<String, String>) {
    let mut found = Vec::new();
    parameters_mut(nodes, &mut found);
    for parameter in found {
        if let Some(index) = info_index.get(parameter.get_drv_info()) {
            parameter.index_name = (*index != parameter.name).then(|| index.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_defaults_are_omitted() {
        let parameter = AsynParameter::new("Gain", "Gain", AsynKind::Float64);
        let json = serde_json::to_string(&ParameterNode::Parameter(parameter)).expect("json");
        expect![[r#"{"type":"AsynParameter","name":"Gain","description":"Gain","asyn_type":"Float64"}"#]]
            .assert_eq(&json);
    }

    #[test]
    fn test_suffix_defaults() {
        let mut parameter = AsynParameter::new("Gain", "Gain", AsynKind::Float64);
        assert_eq!(parameter.read_record_suffix(), "Gain_RBV");
        assert_eq!(parameter.write_record_suffix(), "Gain");
        parameter.read_record_suffix = Some("GainReadback".to_string());
        assert_eq!(parameter.read_record_suffix(), "GainReadback");
    }

    #[test]
    fn test_merge_in_index_names() {
        let mut gain = AsynParameter::new("Gain", "Gain", AsynKind::Float64);
        gain.drv_info = Some("GAIN".to_string());
        let mut tree = vec![template_parameters(
            "sim_detector",
            vec![gain, AsynParameter::new("Acquire", "Acquire", AsynKind::Binary)],
        )];

        let map = IndexMap::from([
            ("GAIN".to_string(), "SimGain".to_string()),
            ("Acquire".to_string(), "Acquire".to_string()),
        ]);
        merge_in_index_names(&mut tree, &map);

        assert_eq!(tree[0].name(), "Simdetector");
        let found = parameters(&tree);
        assert_eq!(found[0].get_index_name(), "SimGain");
        assert_eq!(found[1].index_name, None);
    }

    #[test]
    fn test_kind_default_widgets() {
        let parameter = AsynParameter::new("Acquire", "Acquire", AsynKind::Binary);
        assert_eq!(parameter.read_widget(), ReadWidget::Led);
        assert_eq!(parameter.write_widget(), WriteWidget::CheckBox);
    }
}
