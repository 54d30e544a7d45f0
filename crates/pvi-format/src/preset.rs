//! Screen styles: a template file, layout parameters and the snippets each
//! kind of widget is rendered with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::error::{FormatError, Result};
use crate::formatter::WidgetFormatter;
use crate::layout::ScreenLayout;
use crate::template::{AdlTemplate, BobTemplate, EdlTemplate, UiTemplate};

const DLS_EDL: &str = include_str!("../templates/dls.edl");
const DLS_BOB: &str = include_str!("../templates/dls.bob");
const APS_ADL: &str = include_str!("../templates/aps.adl");

/// A screen style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// DLS style EDM screens.
    DlsEdl,
    /// DLS style Phoebus screens.
    DlsBob,
    /// APS style MEDM screens.
    ApsAdl,
}

/// Snippets a style renders widgets and decorations with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Title,
    Label,
    Header,
    GroupTitle,
    GroupBox,
    LabelBackground,
    Group,
    Led,
    ProgressBar,
    TextRead,
    TextWrite,
    CheckBox,
    ComboBox,
    Table,
    Action,
    SubScreen,
}

/// Formatter value a template property is set to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Text,
    Tooltip,
    Pv,
    Label,
    Value,
    File,
    Macros,
}

/// How widget bounds are adjusted before they are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sizing {
    Copy,
    Square,
}

impl Sizing {
    #[must_use]
    pub fn apply(self, bounds: Bounds) -> Bounds {
        match self {
            Self::Copy => bounds,
            Self::Square => bounds.square(),
        }
    }
}

/// Where a kind of widget comes from in a template, and which of its
/// properties are set from the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetTemplate {
    pub search: &'static str,
    pub sizing: Sizing,
    pub properties: &'static [(&'static str, Field)],
}

impl WidgetTemplate {
    const fn new(search: &'static str, properties: &'static [(&'static str, Field)]) -> Self {
        Self {
            search,
            sizing: Sizing::Copy,
            properties,
        }
    }

    const fn square(search: &'static str, properties: &'static [(&'static str, Field)]) -> Self {
        Self {
            search,
            sizing: Sizing::Square,
            properties,
        }
    }
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::DlsEdl, Preset::DlsBob, Preset::ApsAdl];

    /// Name used in configuration and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DlsEdl => "dls-edl",
            Self::DlsBob => "dls-bob",
            Self::ApsAdl => "aps-adl",
        }
    }

    /// Extension of the screen files, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::DlsEdl => "edl",
            Self::DlsBob => "bob",
            Self::ApsAdl => "adl",
        }
    }

    /// The style writing files with `extension`.
    #[must_use]
    pub fn for_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.extension().eq_ignore_ascii_case(extension))
    }

    /// Default layout parameters.
    #[must_use]
    pub fn layout(self) -> ScreenLayout {
        match self {
            Self::DlsEdl => ScreenLayout::DLS_EDL,
            Self::DlsBob => ScreenLayout::DLS_BOB,
            Self::ApsAdl => ScreenLayout::APS_ADL,
        }
    }

    /// Parses the embedded template file.
    pub fn template(self) -> Result<Box<dyn UiTemplate>> {
        let template: Box<dyn UiTemplate> = match self {
            Self::DlsEdl => Box::new(EdlTemplate::new(DLS_EDL)?),
            Self::DlsBob => Box::new(BobTemplate::new(DLS_BOB)?),
            Self::ApsAdl => Box::new(AdlTemplate::new(APS_ADL)?),
        };
        Ok(template)
    }

    /// Where `kind` is found in the template, if the style has it.
    #[must_use]
    pub fn widget_template(self, kind: TemplateKind) -> Option<WidgetTemplate> {
        use Field::{File, Label, Macros, Pv, Text, Tooltip, Value};
        use TemplateKind as K;

        let template = match (self, kind) {
            (Self::DlsEdl, K::Title) => WidgetTemplate::new("\"Title\"", &[("value", Text)]),
            (Self::DlsEdl, K::Label) => WidgetTemplate::new("\"Label\"", &[("value", Text)]),
            (Self::DlsEdl, K::Header) => WidgetTemplate::new("\"Heading\"", &[("value", Text)]),
            (Self::DlsEdl, K::GroupTitle) => {
                WidgetTemplate::new("\"  Group  \"", &[("value", Text)])
            }
            (Self::DlsEdl, K::GroupBox) => WidgetTemplate::new("fillColor index 5", &[]),
            (Self::DlsEdl, K::Led) => WidgetTemplate::square("\"LED\"", &[("controlPv", Pv)]),
            (Self::DlsEdl, K::ProgressBar) => {
                WidgetTemplate::new("\"ProgressBar\"", &[("indicatorPv", Pv)])
            }
            (Self::DlsEdl, K::TextRead) => WidgetTemplate::new("\"TextRead\"", &[("controlPv", Pv)]),
            (Self::DlsEdl, K::TextWrite) => {
                WidgetTemplate::new("\"TextWrite\"", &[("controlPv", Pv)])
            }
            (Self::DlsEdl, K::CheckBox) => WidgetTemplate::new("\"CheckBox\"", &[("controlPv", Pv)]),
            (Self::DlsEdl, K::ComboBox) => WidgetTemplate::new("\"ComboBox\"", &[("controlPv", Pv)]),
            // EDM has no tables; show the PV name instead.
            (Self::DlsEdl, K::Table) => WidgetTemplate::new("\"Label\"", &[("value", Pv)]),
            (Self::DlsEdl, K::Action) => WidgetTemplate::new(
                "\"SignalX\"",
                &[
                    ("onLabel", Label),
                    ("offLabel", Label),
                    ("controlPv", Pv),
                    ("pressValue", Value),
                ],
            ),
            (Self::DlsEdl, K::SubScreen) => WidgetTemplate::new(
                "\"SubScreenFile\"",
                &[
                    ("buttonLabel", Label),
                    ("displayFileName", File),
                    ("symbols", Macros),
                ],
            ),

            (Self::DlsBob, K::Title) => WidgetTemplate::new("Title", &[("text", Text)]),
            (Self::DlsBob, K::Label) => {
                WidgetTemplate::new("Label", &[("text", Text), ("tooltip", Tooltip)])
            }
            (Self::DlsBob, K::Header) => WidgetTemplate::new("Heading", &[("text", Text)]),
            (Self::DlsBob, K::Group) => WidgetTemplate::new("Group", &[("name", Text)]),
            (Self::DlsBob, K::Led) => WidgetTemplate::square("LED", &[("pv_name", Pv)]),
            (Self::DlsBob, K::ProgressBar) => WidgetTemplate::new("ProgressBar", &[("pv_name", Pv)]),
            (Self::DlsBob, K::TextRead) => WidgetTemplate::new("TextUpdate", &[("pv_name", Pv)]),
            (Self::DlsBob, K::TextWrite) => WidgetTemplate::new("TextEntry", &[("pv_name", Pv)]),
            (Self::DlsBob, K::CheckBox) => WidgetTemplate::new("ChoiceButton", &[("pv_name", Pv)]),
            (Self::DlsBob, K::ComboBox) => WidgetTemplate::new("ComboBox", &[("pv_name", Pv)]),
            (Self::DlsBob, K::Table) => WidgetTemplate::new("Table", &[("pv_name", Pv)]),
            (Self::DlsBob, K::Action) => WidgetTemplate::new(
                "ActionButton",
                &[("text", Label), ("pv_name", Pv), ("value", Value)],
            ),
            (Self::DlsBob, K::SubScreen) => WidgetTemplate::new(
                "SubScreen",
                &[("text", Label), ("file", File), ("macros", Macros)],
            ),

            (Self::ApsAdl, K::Title) => WidgetTemplate::new("\"Title\"", &[("textix", Text)]),
            (Self::ApsAdl, K::Label) => WidgetTemplate::new("\"Label\"", &[("textix", Text)]),
            (Self::ApsAdl, K::Header) => WidgetTemplate::new("\"Heading\"", &[("textix", Text)]),
            (Self::ApsAdl, K::GroupTitle) => WidgetTemplate::new("\"Group\"", &[("textix", Text)]),
            (Self::ApsAdl, K::GroupBox) => WidgetTemplate::new("fill=\"outline\"", &[]),
            (Self::ApsAdl, K::LabelBackground) => WidgetTemplate::new("clr=2", &[]),
            (Self::ApsAdl, K::Led) => WidgetTemplate::square("\"LED\"", &[("chan", Pv)]),
            (Self::ApsAdl, K::ProgressBar) => WidgetTemplate::new("\"ProgressBar\"", &[("chan", Pv)]),
            (Self::ApsAdl, K::TextRead) => WidgetTemplate::new("\"TextRead\"", &[("chan", Pv)]),
            (Self::ApsAdl, K::TextWrite) => WidgetTemplate::new("\"TextWrite\"", &[("chan", Pv)]),
            (Self::ApsAdl, K::CheckBox) => WidgetTemplate::new("\"CheckBox\"", &[("chan", Pv)]),
            (Self::ApsAdl, K::ComboBox) => WidgetTemplate::new("\"ComboBox\"", &[("chan", Pv)]),
            // MEDM has no tables; show the PV name instead.
            (Self::ApsAdl, K::Table) => WidgetTemplate::new("\"Label\"", &[("textix", Pv)]),
            (Self::ApsAdl, K::Action) => WidgetTemplate::new(
                "\"SignalX\"",
                &[("label", Label), ("chan", Pv), ("press_msg", Value)],
            ),
            (Self::ApsAdl, K::SubScreen) => WidgetTemplate::new(
                "\"SubScreenFile\"",
                &[("label", Label), ("name", File), ("args", Macros)],
            ),

            _ => return None,
        };
        Some(template)
    }

    /// Widgets drawn on a screen before its contents.
    #[must_use]
    pub fn screen_decorations(
        self,
        layout: &ScreenLayout,
        bounds: &Bounds,
        title: &str,
    ) -> Vec<(TemplateKind, WidgetFormatter)> {
        let title_bounds = Bounds::new(0, 0, bounds.w, layout.title_height);
        let mut decorations = Vec::new();
        if self == Self::ApsAdl {
            decorations.push((TemplateKind::LabelBackground, text(title_bounds, "")));
        }
        decorations.push((TemplateKind::Title, text(title_bounds, title)));
        decorations
    }

    /// Widgets drawn for a group before its contents.
    #[must_use]
    pub fn group_decorations(
        self,
        layout: &ScreenLayout,
        bounds: &Bounds,
        title: &str,
    ) -> Vec<(TemplateKind, WidgetFormatter)> {
        let spacing = layout.spacing;
        match self {
            Self::DlsEdl => vec![
                (
                    TemplateKind::GroupBox,
                    text(
                        Bounds::new(bounds.x, bounds.y + spacing, bounds.w, bounds.h - spacing),
                        "",
                    ),
                ),
                (
                    TemplateKind::GroupTitle,
                    text(
                        Bounds::new(bounds.x, bounds.y, bounds.w, layout.group_label_height),
                        &format!("  {title}  "),
                    ),
                ),
            ],
            Self::DlsBob => vec![(TemplateKind::Group, text(*bounds, title))],
            Self::ApsAdl => {
                let title_bounds = Bounds::new(
                    bounds.x + spacing,
                    bounds.y + spacing,
                    bounds.w - 2 * spacing,
                    layout.group_label_height - spacing,
                );
                vec![
                    (TemplateKind::GroupBox, text(*bounds, "")),
                    (TemplateKind::LabelBackground, text(title_bounds, "")),
                    (TemplateKind::GroupTitle, text(title_bounds, title)),
                ]
            }
        }
    }
}

fn text(bounds: Bounds, text: &str) -> WidgetFormatter {
    WidgetFormatter::Label {
        bounds,
        text: text.to_string(),
        tooltip: String::new(),
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = FormatError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == name)
            .ok_or_else(|| FormatError::UnknownPreset {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [TemplateKind; 16] = [
        TemplateKind::Title,
        TemplateKind::Label,
        TemplateKind::Header,
        TemplateKind::GroupTitle,
        TemplateKind::GroupBox,
        TemplateKind::LabelBackground,
        TemplateKind::Group,
        TemplateKind::Led,
        TemplateKind::ProgressBar,
        TemplateKind::TextRead,
        TemplateKind::TextWrite,
        TemplateKind::CheckBox,
        TemplateKind::ComboBox,
        TemplateKind::Table,
        TemplateKind::Action,
        TemplateKind::SubScreen,
    ];

    #[test]
    fn test_every_widget_template_is_unique() {
        for preset in Preset::ALL {
            let template = preset.template().expect("embedded template");
            for kind in KINDS {
                if let Some(widget) = preset.widget_template(kind) {
                    let snippet = template
                        .search(widget.search)
                        .unwrap_or_else(|err| panic!("{preset} {kind:?}: {err}"));
                    assert!(!snippet.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_names_and_extensions() {
        assert_eq!("dls-bob".parse::<Preset>().expect("preset"), Preset::DlsBob);
        assert!("dls".parse::<Preset>().is_err());
        assert_eq!(Preset::for_extension("ADL"), Some(Preset::ApsAdl));
        assert_eq!(Preset::for_extension("ui"), None);
        assert_eq!(Preset::ApsAdl.to_string(), "aps-adl");
    }

    #[test]
    fn test_edl_group_decorations() {
        let decorations = Preset::DlsEdl.group_decorations(
            &ScreenLayout::DLS_EDL,
            &Bounds::new(5, 30, 255, 40),
            "Settings",
        );
        let bounds: Vec<Bounds> = decorations.iter().map(|(_, w)| w.bounds()).collect();
        assert_eq!(bounds, [Bounds::new(5, 35, 255, 35), Bounds::new(5, 30, 255, 10)]);
        assert_eq!(
            decorations[1].1.field(Field::Text).as_deref(),
            Some("  Settings  ")
        );
    }
}
