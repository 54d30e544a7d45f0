//! Rendering devices to screen files.

mod common;

use common::{group, read_write, text_read, text_write};
use pvi_device::{Device, Layout};
use pvi_format::{DeviceFormatter, Preset};

fn camera() -> Device {
    Device::new("Camera", vec![text_read("Temp")])
}

fn settings() -> Device {
    Device::new(
        "Camera",
        vec![
            text_read("Temp"),
            group(
                "Settings",
                Layout::grid(),
                vec![read_write("Gain"), text_write("Offset")],
            ),
            group("Advanced", Layout::sub_screen(), vec![text_write("Threshold")]),
        ],
    )
}

#[test]
fn edl_screen_places_widgets_below_title() {
    let screens = DeviceFormatter::new(Preset::DlsEdl)
        .format(&camera(), "$(P)", "camera")
        .expect("format");
    assert_eq!(screens.len(), 1);
    let text = &screens[0].text;
    assert!(text.starts_with("4 0 1\n"));
    assert!(text.contains("x 0\ny 0\nw 260\nh 55\n"), "{text}");
    assert!(text.contains("x 130\ny 30\nw 125\nh 20\ncontrolPv \"$(P)Temp_RBV\""), "{text}");
    assert!(text.contains("value {\n  \"Camera - $(P)\"\n}"));
    assert!(text.contains("value {\n  \"Temp\"\n}"));
}

#[test]
fn bob_screens_are_valid_xml() {
    let screens = DeviceFormatter::new(Preset::DlsBob)
        .format(&settings(), "$(P)", "camera")
        .expect("format");
    let names: Vec<&str> = screens.iter().map(|s| s.file_name.as_str()).collect();
    assert_eq!(names, ["camera.bob", "camera_Advanced.bob"]);

    for screen in &screens {
        roxmltree::Document::parse(&screen.text)
            .unwrap_or_else(|err| panic!("{}: {err}\n{}", screen.name, screen.text));
    }

    let document = roxmltree::Document::parse(&screens[0].text).expect("xml");
    let group = document
        .descendants()
        .find(|node| node.attribute("type") == Some("group"))
        .expect("group widget");
    let pvs: Vec<&str> = group
        .descendants()
        .filter(|node| node.has_tag_name("pv_name"))
        .filter_map(|node| node.text())
        .collect();
    assert_eq!(pvs, ["$(P)Gain", "$(P)Gain_RBV", "$(P)Offset"]);

    let file = document
        .descendants()
        .find(|node| node.has_tag_name("file"))
        .and_then(|node| node.text());
    assert_eq!(file, Some("camera_Advanced.bob"));
}

#[test]
fn adl_related_display_names_screen_file() {
    let screens = DeviceFormatter::new(Preset::ApsAdl)
        .format(&settings(), "$(P)", "camera")
        .expect("format");
    assert_eq!(screens.len(), 2);
    let text = &screens[0].text;
    assert!(text.starts_with("file {\n"));
    assert!(text.contains("name=\"camera_Advanced.adl\""), "{text}");
    assert!(text.contains("chan=\"$(P)Temp_RBV\""));
    assert!(screens[1].text.contains("chan=\"$(P)Threshold\""));
}
