//! Asyn producers: a tree of parameters and the artifacts generated from it.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use pvi_device::{
    Component, Device, Group, SignalR, SignalRW, SignalW, Tree, ROOT_DEVICE,
};
use pvi_syntax::ast::quote;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::fields::FieldTable;
use crate::parameter::{parameters, AsynParameter, ParameterNode};

/// File suffix of serialized producers.
pub const PRODUCER_SUFFIX: &str = ".pvi.producer.json";

const GENERATED_HEADER: &str = "\
# This file was automatically generated
# *** Please do not edit this file: edit the source file instead. ***
";

/// Name of the ParamSet class of `driver`.
#[must_use]
pub fn param_set_name(driver: &str) -> String {
    if driver == ROOT_DEVICE {
        "asynParamSet".to_string()
    } else {
        format!("{driver}ParamSet")
    }
}

/// First line of a description, cut to the 40 characters DESC holds.
#[must_use]
pub fn truncate_description(description: &str) -> String {
    description
        .trim()
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(40)
        .collect()
}

/// The parameters of one asyn driver class and the macros its records use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsynProducer {
    /// Screen title.
    pub label: String,
    /// Producer of the parent driver class, `asynPortDriver` at the root.
    pub parent: String,
    /// Record name prefix, e.g. `$(P)$(R)`.
    pub prefix: String,
    pub asyn_port: String,
    pub address: String,
    pub timeout: String,
    #[serde(default)]
    pub parameters: Vec<ParameterNode>,
}

impl AsynProducer {
    /// File name of the producer called `name`.
    #[must_use]
    pub fn file_name(name: &str) -> String {
        format!("{name}{PRODUCER_SUFFIX}")
    }

    /// Serializes the producer as pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading producer");
        let text = fs::read_to_string(path).map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConvertError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?).map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Adds the parameters of the parent producer chain found on
    /// `search_paths`. A parent group with the name of one of ours puts its
    /// children first; other parent nodes are appended.
    pub fn merge_parents(&mut self, search_paths: &[PathBuf]) -> Result<()> {
        for node in find_parameters(&self.parent, search_paths)? {
            match node {
                ParameterNode::Group(parent_group) => {
                    let existing = self.parameters.iter_mut().find_map(|own| match own {
                        ParameterNode::Group(group) if group.name == parent_group.name => {
                            Some(group)
                        }
                        _ => None,
                    });
                    match existing {
                        Some(group) => {
                            let own = std::mem::take(&mut group.children);
                            group.children = parent_group.children;
                            group.children.extend(own);
                        }
                        None => self.parameters.push(ParameterNode::Group(parent_group)),
                    }
                }
                parameter => self.parameters.push(parameter),
            }
        }
        Ok(())
    }

    /// The database template holding every parameter's records.
    #[must_use]
    pub fn produce_records(&self, table: &FieldTable) -> String {
        let mut out = String::from(GENERATED_HEADER);
        self.write_nodes(&mut out, &self.parameters, table, &mut None);
        out
    }

    // A group's comment sits above its first record only.
    fn write_nodes(
        &self,
        out: &mut String,
        nodes: &[ParameterNode],
        table: &FieldTable,
        comment: &mut Option<String>,
    ) {
        for node in nodes {
            match node {
                ParameterNode::Group(group) => {
                    *comment = Some(format!("# Group: {}", group.name));
                    self.write_nodes(out, &group.children, table, comment);
                }
                ParameterNode::Parameter(parameter) => {
                    for record in self.records(parameter, table) {
                        out.push('\n');
                        if let Some(comment) = comment.take() {
                            out.push_str(&comment);
                            out.push('\n');
                        }
                        out.push_str(&record);
                    }
                }
            }
        }
    }

    fn records(&self, parameter: &AsynParameter, table: &FieldTable) -> Vec<String> {
        let signature = parameter.asyn_type.signature();
        let (read_fields, mut write_fields) = table.split(
            signature.read_record,
            signature.write_record,
            &parameter.record_fields,
        );
        let link = format!(
            "@asyn({},{},{}){}",
            self.asyn_port,
            self.address,
            self.timeout,
            parameter.get_drv_info()
        );
        let description = truncate_description(&parameter.description);
        let form = parameter.display_form.map(|form| form.as_str());

        let mut records = Vec::new();
        if parameter.access.needs_read_record() {
            let mut fields = IndexMap::new();
            fields.insert("DESC", description.clone());
            fields.insert("DTYP", signature.dtyp_read.to_string());
            fields.insert("INP", link.clone());
            for (name, value) in &read_fields {
                fields.entry(name.as_str()).or_insert_with(|| value.clone());
            }
            let mut infos = Vec::new();
            if let Some(form) = form {
                infos.push(("Q:form", form.to_string()));
            }
            records.push(render_record(
                signature.read_record,
                &format!("{}{}", self.prefix, parameter.read_record_suffix()),
                &fields,
                &infos,
            ));
        }

        if parameter.access.needs_write_record() {
            write_fields.shift_remove("SCAN");
            let mut fields = IndexMap::new();
            fields.insert("DESC", description);
            fields.insert("DTYP", signature.dtyp_write.to_string());
            let link_field = if signature.write_record == "waveform" {
                "INP"
            } else {
                "OUT"
            };
            fields.insert(link_field, link);
            if let Some(initial) = &parameter.initial {
                fields.insert("PINI", "YES".to_string());
                fields.insert("VAL", initial.clone());
            }
            for (name, value) in &write_fields {
                fields.entry(name.as_str()).or_insert_with(|| value.clone());
            }
            let mut infos = Vec::new();
            if let Some(form) = form {
                infos.push(("Q:form", form.to_string()));
            }
            if parameter.demand_auto_updates {
                infos.push(("asyn:READBACK", "1".to_string()));
            }
            if !parameter.autosave.is_empty() {
                infos.push(("autosaveFields", parameter.autosave.join(" ")));
            }
            records.push(render_record(
                signature.write_record,
                &format!("{}{}", self.prefix, parameter.write_record_suffix()),
                &fields,
                &infos,
            ));
        }
        records
    }

    /// The device shown for this producer. PVs are record suffixes; the
    /// screen prefix supplies the rest.
    #[must_use]
    pub fn produce_device(&self) -> Device {
        let mut device = Device::new(self.label.clone(), device_tree(&self.parameters));
        device.parent = Some(self.parent.clone());
        device
    }

    /// The C++ header declaring the ParamSet class `stem`, which registers
    /// every parameter and holds its index.
    #[must_use]
    pub fn produce_param_set_header(&self, stem: &str) -> String {
        let parent = param_set_name(&self.parent);
        let mut first = stem.chars();
        let guard = match first.next() {
            Some(c) => format!("{}{}_H", c.to_ascii_uppercase(), first.as_str()),
            None => "_H".to_string(),
        };

        let mut defines = Vec::new();
        let mut adds = Vec::new();
        let mut indexes = Vec::new();
        for parameter in parameters(&self.parameters) {
            let index = parameter.get_index_name();
            defines.push(format!(
                "#define {index}String \"{}\"",
                parameter.get_drv_info()
            ));
            adds.push(format!(
                "this->add({index}String, {}, &{index});",
                parameter.asyn_type.signature().asyn_param
            ));
            indexes.push(format!("int {index};"));
            if indexes.len() == 1 {
                indexes.push(format!(
                    "#define FIRST_{}_PARAM {index}",
                    stem.to_ascii_uppercase()
                ));
            }
        }

        let mut out = String::new();
        let _ = write!(
            out,
            "#ifndef {guard}\n\
             #define {guard}\n\
             \n\
             #include \"{parent}.h\"\n\
             \n\
             {defines}\n\
             \n\
             class {stem} : public virtual {parent} {{\n\
             public:\n\
             \x20   {stem}() {{\n\
             \x20       {adds}\n\
             \x20   }}\n\
             \n\
             \x20   {indexes}\n\
             }};\n\
             \n\
             #endif // {guard}\n",
            defines = defines.join("\n"),
            adds = adds.join("\n        "),
            indexes = indexes.join("\n    "),
        );
        out
    }
}

fn device_tree(nodes: &[ParameterNode]) -> Tree {
    nodes
        .iter()
        .map(|node| match node {
            ParameterNode::Group(group) => {
                let mut component =
                    Group::new(group.name.clone(), group.layout.clone(), device_tree(&group.children));
                component.label = group.label.clone();
                Component::Group(component)
            }
            ParameterNode::Parameter(parameter) => signal(parameter),
        })
        .collect()
}

fn signal(parameter: &AsynParameter) -> Component {
    use crate::parameter::Access;

    let description = (!parameter.description.is_empty()).then(|| parameter.description.clone());
    match parameter.access {
        Access::R => {
            let mut signal = SignalR::new(
                parameter.name.clone(),
                parameter.read_record_suffix(),
                parameter.read_widget(),
            );
            signal.description = description;
            Component::SignalR(signal)
        }
        Access::W => {
            let mut signal = SignalW::new(
                parameter.name.clone(),
                parameter.write_record_suffix(),
                parameter.write_widget(),
            );
            signal.description = description;
            Component::SignalW(signal)
        }
        Access::RW => {
            let need_both = !parameter.demand_auto_updates;
            let mut signal = SignalRW::new(
                parameter.name.clone(),
                parameter.write_record_suffix(),
                parameter.write_widget(),
                need_both.then(|| parameter.read_record_suffix()),
                need_both.then(|| parameter.read_widget()),
            );
            signal.description = description;
            Component::SignalRW(signal)
        }
    }
}

fn render_record(
    record_type: &str,
    name: &str,
    fields: &IndexMap<&str, String>,
    infos: &[(&str, String)],
) -> String {
    let mut out = format!("record({record_type}, \"{name}\")\n{{\n");
    for (field, value) in fields {
        let _ = writeln!(out, "    field({:<5} {})", format!("{field},"), quote(value));
    }
    for (info, value) in infos {
        let _ = writeln!(out, "    info({info}, {})", quote(value));
    }
    out.push_str("}\n");
    out
}

/// Returns the parameters of producer `name` followed by those of its
/// parents.
pub fn find_parameters(name: &str, search_paths: &[PathBuf]) -> Result<Vec<ParameterNode>> {
    if name == ROOT_DEVICE {
        return Ok(Vec::new());
    }

    let file = AsynProducer::file_name(name);
    let path = search_paths
        .iter()
        .map(|dir| dir.join(&file))
        .find(|path| path.is_file())
        .ok_or_else(|| ConvertError::ProducerNotFound {
            file: file.clone(),
            paths: search_paths.to_vec(),
        })?;

    let producer = AsynProducer::load(&path)?;
    let mut nodes = producer.parameters;
    nodes.extend(find_parameters(&producer.parent, search_paths)?);
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::AsynKind;
    use crate::parameter::{template_parameters, Access};
    use expect_test::expect;

    fn producer(parameters: Vec<AsynParameter>) -> AsynProducer {
        AsynProducer {
            label: "Sim Detector".to_string(),
            parent: "ADDriver".to_string(),
            prefix: "$(P)$(R)".to_string(),
            asyn_port: "$(PORT)".to_string(),
            address: "$(ADDR=0)".to_string(),
            timeout: "$(TIMEOUT=1)".to_string(),
            parameters: vec![template_parameters("SimDetector", parameters)],
        }
    }

    fn gain() -> AsynParameter {
        let mut gain = AsynParameter::new("Gain", "Detector gain", AsynKind::Float64);
        gain.drv_info = Some("SIM_GAIN".to_string());
        gain.index_name = Some("SimGain".to_string());
        gain.initial = Some("1".to_string());
        gain.record_fields.insert("EGU".to_string(), "dB".to_string());
        gain.record_fields.insert("SCAN".to_string(), "I/O Intr".to_string());
        gain
    }

    fn reset() -> AsynParameter {
        let mut reset = AsynParameter::new("Reset", "Reset", AsynKind::Binary);
        reset.access = Access::W;
        reset
    }

    #[test]
    fn test_produce_records() {
        let text = producer(vec![gain(), reset()]).produce_records(FieldTable::builtin());
        expect![[r#"
            # This file was automatically generated
            # *** Please do not edit this file: edit the source file instead. ***

            # Group: SimDetector
            record(ai, "$(P)$(R)Gain_RBV")
            {
                field(DESC, "Detector gain")
                field(DTYP, "asynFloat64")
                field(INP,  "@asyn($(PORT),$(ADDR=0),$(TIMEOUT=1))SIM_GAIN")
                field(EGU,  "dB")
                field(SCAN, "I/O Intr")
            }

            record(ao, "$(P)$(R)Gain")
            {
                field(DESC, "Detector gain")
                field(DTYP, "asynFloat64")
                field(OUT,  "@asyn($(PORT),$(ADDR=0),$(TIMEOUT=1))SIM_GAIN")
                field(PINI, "YES")
                field(VAL,  "1")
                field(EGU,  "dB")
            }

            record(bo, "$(P)$(R)Reset")
            {
                field(DESC, "Reset")
                field(DTYP, "asynInt32")
                field(OUT,  "@asyn($(PORT),$(ADDR=0),$(TIMEOUT=1))Reset")
            }
        "#]]
        .assert_eq(&text);
    }

    #[test]
    fn test_produce_param_set_header() {
        let text = producer(vec![gain(), reset()]).produce_param_set_header("simDetectorParamSet");
        expect![[r#"
            #ifndef SimDetectorParamSet_H
            #define SimDetectorParamSet_H

            #include "ADDriverParamSet.h"

            #define SimGainString "SIM_GAIN"
            #define ResetString "Reset"

            class simDetectorParamSet : public virtual ADDriverParamSet {
            public:
                simDetectorParamSet() {
                    this->add(SimGainString, asynParamFloat64, &SimGain);
                    this->add(ResetString, asynParamInt32, &Reset);
                }

                int SimGain;
                #define FIRST_SIMDETECTORPARAMSET_PARAM SimGain
                int Reset;
            };

            #endif // SimDetectorParamSet_H
        "#]]
        .assert_eq(&text);
    }

    #[test]
    fn test_produce_device() {
        let mut auto = AsynParameter::new("Exposure", "Exposure", AsynKind::Float64);
        auto.demand_auto_updates = true;
        let device = producer(vec![gain(), reset(), auto]).produce_device();

        assert_eq!(device.parent.as_deref(), Some("ADDriver"));
        let group = device.children[0].as_group().expect("group");
        assert_eq!(group.name, "SimDetector");

        match &group.children[0] {
            Component::SignalRW(gain) => {
                assert_eq!(gain.write_pv, "Gain");
                assert_eq!(gain.read_pv.as_deref(), Some("Gain_RBV"));
            }
            other => panic!("unexpected component {other:?}"),
        }
        assert!(matches!(&group.children[1], Component::SignalW(reset) if reset.write_pv == "Reset"));
        match &group.children[2] {
            Component::SignalRW(exposure) => {
                assert_eq!(exposure.read_pv, None);
                assert_eq!(exposure.read_widget, None);
            }
            other => panic!("unexpected component {other:?}"),
        }
    }

    #[test]
    fn test_truncate_description() {
        assert_eq!(truncate_description("  First line\nsecond"), "First line");
        assert_eq!(truncate_description(&"x".repeat(50)).len(), 40);
    }

    #[test]
    fn test_param_set_name() {
        assert_eq!(param_set_name("asynPortDriver"), "asynParamSet");
        assert_eq!(param_set_name("ADDriver"), "ADDriverParamSet");
    }
}
