//! The convert, produce and format commands end to end.

mod common;

use std::fs;
use std::process::Command;

use common::{names, unique_temp_dir, write_file, TEMPLATE};
use pvi::config::FormatConfig;
use pvi::{Config, ConvertOptions, FormatOptions};
use pvi_convert::{AsynProducer, FieldTable, Template, TemplateConverter};
use pvi_format::Preset;

fn convert_templates(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let template = write_file(dir, "db/simDetector.template", TEMPLATE);
    let options = ConvertOptions {
        output_dir: dir.join("pvi"),
        templates: vec![template],
        source: None,
        module_root: dir.to_path_buf(),
        name: Some("simDetector".to_string()),
    };
    pvi::convert(&options, FieldTable::builtin()).expect("convert")
}

#[test]
fn convert_writes_producer_and_records() {
    let dir = unique_temp_dir("convert");
    let written = convert_templates(&dir);
    assert_eq!(
        names(&written),
        [
            "simDetector.template",
            "simDetector.pvi.producer.json",
            "simDetectorParamSet.template",
        ]
    );

    let top_level = fs::read_to_string(dir.join("pvi/simDetector.template")).expect("read");
    assert!(top_level.contains("include \"simDetectorParamSet.template\""));
    assert!(!top_level.contains("SIM_GAIN_X"));

    let producer =
        AsynProducer::load(&dir.join("pvi/simDetector.pvi.producer.json")).expect("producer");
    assert_eq!(producer.label, "simDetector");
    assert_eq!(producer.parent, "asynPortDriver");

    // The generated records convert back to the same parameters.
    let records = fs::read_to_string(dir.join("pvi/simDetectorParamSet.template")).expect("read");
    let again = TemplateConverter::new(vec![Template::new("simDetector", records)])
        .convert()
        .expect("convert generated records");
    assert_eq!(again.drv_infos(), ["RESET", "SIM_GAIN_X"]);
}

#[test]
fn produce_then_format_device_screens() {
    let dir = unique_temp_dir("format");
    convert_templates(&dir);
    let producer = dir.join("pvi/simDetector.pvi.producer.json");
    let device = dir.join("pvi/simDetector.pvi.device.json");
    pvi::produce(&device, &producer, FieldTable::builtin()).expect("produce device");

    let header = dir.join("pvi/simDetectorParamSet.h");
    pvi::produce(&header, &producer, FieldTable::builtin()).expect("produce header");
    let header = fs::read_to_string(header).expect("read");
    assert!(header.contains("class simDetectorParamSet : public virtual asynParamSet"));
    assert!(header.contains("String \"SIM_GAIN_X\""));

    for (screen, preset) in [
        ("simDetector.edl", Preset::DlsEdl),
        ("simDetector.bob", Preset::DlsBob),
    ] {
        let options = FormatOptions {
            output: dir.join("opi").join(screen),
            device: device.clone(),
            prefix: "$(P)$(R)".to_string(),
            preset: None,
            search_paths: Vec::new(),
        };
        let written = pvi::format_device(&options, &FormatConfig::default()).expect("format");
        assert_eq!(names(&written), [screen]);
        let text = fs::read_to_string(&written[0]).expect("read screen");
        assert!(text.contains("$(P)$(R)GainX"), "{preset}: {text}");
    }
}

#[test]
fn config_layout_overrides_apply_to_screens() {
    let dir = unique_temp_dir("config");
    convert_templates(&dir);
    let producer = dir.join("pvi/simDetector.pvi.producer.json");
    let device = dir.join("pvi/simDetector.pvi.device.json");
    pvi::produce(&device, &producer, FieldTable::builtin()).expect("produce device");

    let config_path = write_file(
        &dir,
        "pvi.toml",
        "[format]\npreset = \"aps-adl\"\n\n[format.layout]\nlabel_width = 300\n",
    );
    let config = Config::load(&config_path).expect("config");
    let options = FormatOptions {
        output: dir.join("opi/simDetector"),
        device,
        prefix: "$(P)".to_string(),
        preset: None,
        search_paths: Vec::new(),
    };
    let written = pvi::format_device(&options, &config.format).expect("format");
    assert_eq!(names(&written), ["simDetector.adl"]);
    let text = fs::read_to_string(&written[0]).expect("read screen");
    assert!(text.contains("\t\twidth=300\n"), "{text}");
}

#[test]
fn produce_rejects_unknown_output_kinds() {
    let dir = unique_temp_dir("produce");
    convert_templates(&dir);
    let producer = dir.join("pvi/simDetector.pvi.producer.json");
    let err = pvi::produce(&dir.join("pvi/simDetector.json"), &producer, FieldTable::builtin())
        .expect_err("unknown extension");
    assert!(err.to_string().contains("can't tell what to produce"));
    assert!(!dir.join("pvi/simDetector.json").exists());
}

#[test]
fn missing_device_is_reported_with_its_path() {
    let dir = unique_temp_dir("missing");
    let output = Command::new(env!("CARGO_BIN_EXE_pvi"))
        .arg("format")
        .arg(dir.join("camera.edl"))
        .arg(dir.join("camera.pvi.device.json"))
        .output()
        .expect("run pvi");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: failed to load device"), "{stderr}");
    assert!(stderr.contains("camera.pvi.device.json"), "{stderr}");
}

#[test]
fn completions_are_printed() {
    let output = Command::new(env!("CARGO_BIN_EXE_pvi"))
        .args(["completions", "bash"])
        .output()
        .expect("run pvi");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("pvi"));
}
