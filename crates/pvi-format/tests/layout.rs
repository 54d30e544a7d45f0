//! Layout engine integration tests.

mod common;

use common::{factory, flatten, group, labels, read_write, row, text_read, text_write};
use pvi_device::{Component, Layout, SignalRef};
use pvi_format::{FormatError, ScreenLayout, WidgetFormatter};

#[test]
fn widgets_stay_inside_their_screen() {
    let components = vec![
        text_read("Temperature"),
        group(
            "Settings",
            Layout::grid(),
            vec![read_write("Gain"), text_write("Offset"), text_read("Status")],
        ),
        row("Trigger", vec![text_write("Mode"), text_write("Source")]),
    ];
    let (screen, _) = factory()
        .create_screen_formatter(&components, "Camera")
        .expect("layout");

    let layout = ScreenLayout::DLS_EDL;
    for widget in &screen.children {
        let bounds = widget.bounds();
        assert!(bounds.x >= 0 && bounds.y >= 0, "{widget:?}");
        assert!(bounds.right() + layout.spacing * 2 <= screen.bounds.w, "{widget:?}");
        assert!(bounds.bottom() <= screen.bounds.h, "{widget:?}");
        if let WidgetFormatter::Group(group) = widget {
            for child in &group.children {
                assert!(child.bounds().right() <= group.bounds.w, "{child:?}");
                assert!(child.bounds().bottom() <= group.bounds.h, "{child:?}");
            }
        }
    }
}

#[test]
fn tall_screens_wrap_into_columns() {
    let layout = ScreenLayout::DLS_EDL;
    let components: Vec<Component> = (1..=7)
        .map(|index| {
            let children = (1..=10).map(|n| text_read(&format!("G{index}S{n}"))).collect();
            group(&format!("Group{index}"), Layout::grid(), children)
        })
        .collect();
    let (screen, _) = factory()
        .create_screen_formatter(&components, "Camera")
        .expect("layout");

    let mut columns: Vec<i32> = screen.children.iter().map(|w| w.bounds().x).collect();
    columns.dedup();
    assert_eq!(columns, [0, 260, 520]);
    for widget in &screen.children {
        assert_eq!(widget.bounds().h, 265);
        assert!(widget.bounds().bottom() <= layout.max_height);
    }
}

#[test]
fn grid_of_rows_opens_a_table_screen() {
    let channels = group(
        "Channels",
        Layout::grid(),
        ["One", "Two", "Three"]
            .into_iter()
            .map(|name| row(name, vec![text_write(&format!("{name}Gain")), text_read(&format!("{name}Value"))]))
            .collect(),
    );
    let (screen, sub_screens) = factory()
        .create_screen_formatter(&[text_read("Temp"), channels], "Camera")
        .expect("layout");

    let button = screen
        .children
        .iter()
        .find_map(|widget| match widget {
            WidgetFormatter::SubScreen(sub_screen) => Some(sub_screen),
            _ => None,
        })
        .expect("sub-screen button");
    assert_eq!(button.file_name, "camera_Channels");
    assert_eq!(button.label, "Channels");

    assert_eq!(sub_screens.len(), 1);
    let (name, table) = &sub_screens[0];
    assert_eq!(name, "camera_Channels");
    assert_eq!(table.title, "Channels");
    assert_eq!(labels(&table.children), ["One", "Two", "Three"]);
    let pvs: Vec<&str> = flatten(&table.children)
        .into_iter()
        .filter_map(|widget| match widget {
            WidgetFormatter::Pv { pv, .. } => Some(pv.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(pvs.len(), 6);
    assert_eq!(pvs[0], "$(P)OneGain");
}

#[test]
fn row_header_must_match_children() {
    let trigger = group(
        "Trigger",
        Layout::Row {
            header: Some(vec!["Mode".to_string(), "Source".to_string()]),
        },
        vec![text_write("Mode"), text_write("Source"), text_write("Delay")],
    );
    let err = factory()
        .create_screen_formatter(&[trigger], "Camera")
        .unwrap_err();
    assert!(matches!(
        err,
        FormatError::RowHeaderMismatch {
            header: 2,
            children: 3,
            ..
        }
    ));
}

#[test]
fn sub_screens_do_not_nest() {
    let inner = group("Inner", Layout::sub_screen(), vec![text_read("Deep")]);
    let outer = group("Outer", Layout::sub_screen(), vec![inner]);
    let err = factory()
        .create_screen_formatter(&[text_read("Temp"), outer], "Camera")
        .unwrap_err();
    assert!(
        matches!(&err, FormatError::NestedSubScreen { group } if group == "Inner"),
        "{err}"
    );
}

#[test]
fn signal_refs_must_resolve() {
    let reference = Component::SignalRef(SignalRef {
        name: "Missing".to_string(),
        label: None,
        description: None,
    });
    let err = factory()
        .create_screen_formatter(&[text_read("Temp"), reference], "Camera")
        .unwrap_err();
    assert!(matches!(&err, FormatError::UnknownSignalRef { name } if name == "Missing"));
}
