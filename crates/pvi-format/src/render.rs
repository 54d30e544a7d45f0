//! Rendering laid out screens to text with a [`UiTemplate`].

use pvi_device::Device;
use tracing::{debug, info};

use crate::bounds::Bounds;
use crate::error::{FormatError, Result};
use crate::formatter::{GroupFormatter, WidgetFormatter};
use crate::layout::ScreenLayout;
use crate::preset::{Preset, TemplateKind};
use crate::screen::ScreenFormatterFactory;
use crate::template::UiTemplate;

/// Renders screens of one style.
pub struct ScreenRenderer<'a> {
    template: &'a dyn UiTemplate,
    preset: Preset,
    layout: ScreenLayout,
}

impl<'a> ScreenRenderer<'a> {
    #[must_use]
    pub fn new(template: &'a dyn UiTemplate, preset: Preset, layout: ScreenLayout) -> Self {
        Self {
            template,
            preset,
            layout,
        }
    }

    /// Text of the screen file for `screen`.
    pub fn render(&self, screen: &GroupFormatter) -> Result<String> {
        let screen_text = self
            .template
            .set(self.template.screen(), Some(&screen.bounds), None, &[])?;

        let mut widgets = Vec::new();
        for (kind, decoration) in
            self.preset
                .screen_decorations(&self.layout, &screen.bounds, &screen.title)
        {
            widgets.extend(self.render_template(kind, &decoration)?);
        }

        let content = Bounds::with_title(self.layout.spacing, self.layout.title_height)
            .added_to(&screen.bounds);
        for child in &screen.children {
            widgets.extend(self.format(&child.shifted(content.x, content.y))?);
        }
        Ok(self.template.document(screen_text, widgets))
    }

    fn format(&self, widget: &WidgetFormatter) -> Result<Vec<String>> {
        let WidgetFormatter::Group(group) = widget else {
            return match widget.template_kind() {
                Some(kind) => self.render_template(kind, widget),
                None => Ok(Vec::new()),
            };
        };

        let padding = Bounds::with_title(self.layout.spacing, self.layout.group_label_height)
            .added_to(&group.bounds);
        let mut decorations = Vec::new();
        for (kind, decoration) in
            self.preset
                .group_decorations(&self.layout, &group.bounds, &group.title)
        {
            decorations.extend(self.render_template(kind, &decoration)?);
        }
        self.template
            .create_group(decorations, &group.children, &padding, &|child: &WidgetFormatter| {
                self.format(child)
            })
    }

    fn render_template(&self, kind: TemplateKind, widget: &WidgetFormatter) -> Result<Vec<String>> {
        let Some(spec) = self.preset.widget_template(kind) else {
            debug!(preset = %self.preset, ?kind, "no template, skipping");
            return Ok(Vec::new());
        };
        let snippet = self.template.search(spec.search)?;
        let bounds = spec.sizing.apply(widget.bounds());
        let properties = spec
            .properties
            .iter()
            .map(|(name, field)| {
                widget
                    .field(*field)
                    .map(|value| (*name, value))
                    .ok_or_else(|| FormatError::MissingProperty {
                        property: (*name).to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let text = self
            .template
            .set(&snippet, Some(&bounds), widget.widget(), &properties)?;
        Ok(vec![text])
    }
}

/// A rendered screen file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedScreen {
    /// Screen name, without extension.
    pub name: String,
    /// File name, with the extension of the style.
    pub file_name: String,
    pub text: String,
}

/// Formats devices as screens of one style.
#[derive(Debug, Clone, Copy)]
pub struct DeviceFormatter {
    preset: Preset,
    layout: ScreenLayout,
}

impl DeviceFormatter {
    /// A formatter with the default layout of `preset`.
    #[must_use]
    pub fn new(preset: Preset) -> Self {
        Self {
            preset,
            layout: preset.layout(),
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: ScreenLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn preset(&self) -> Preset {
        self.preset
    }

    /// The screen of `device` named `base_file_name`, followed by every
    /// sub-screen it opens. PVs are prefixed with `prefix`.
    pub fn format(
        &self,
        device: &Device,
        prefix: &str,
        base_file_name: &str,
    ) -> Result<Vec<FormattedScreen>> {
        let template = self.preset.template()?;
        let renderer = ScreenRenderer::new(template.as_ref(), self.preset, self.layout);

        let title = format!("{} - {prefix}", device.label);
        let mut factory = ScreenFormatterFactory::new(self.layout, prefix, base_file_name);
        let (screen, sub_screens) = factory.create_screen_formatter(&device.children, &title)?;

        let mut screens = Vec::with_capacity(sub_screens.len() + 1);
        screens.push(self.screen(&renderer, base_file_name, &screen)?);
        for (name, sub_screen) in &sub_screens {
            screens.push(self.screen(&renderer, name, sub_screen)?);
        }
        info!(
            device = %device.label,
            preset = %self.preset,
            screens = screens.len(),
            "formatted device"
        );
        Ok(screens)
    }

    fn screen(
        &self,
        renderer: &ScreenRenderer<'_>,
        name: &str,
        screen: &GroupFormatter,
    ) -> Result<FormattedScreen> {
        Ok(FormattedScreen {
            name: name.to_string(),
            file_name: format!("{name}.{}", self.preset.extension()),
            text: renderer.render(screen)?,
        })
    }
}
