//! End-to-end runs of the `vcdscope` binary.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use flate2::write::GzEncoder;
use flate2::Compression;

const DUMP: &str = "\
$date today $end
$timescale 1ns $end
$scope module top $end
$var wire 1 ! clk $end
$var wire 8 \" data [7:0] $end
$upscope $end
$enddefinitions $end
#0
0!
b0 \"
#5
1!
#10
0!
b11111111 \"
#12
";

fn vcdscope(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vcdscope"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("dump.vcd"), DUMP).unwrap();
    dir
}

#[test]
fn list_text() {
    let dir = workspace();
    let out = vcdscope(dir.path(), &["-q", "list", "dump.vcd"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "top:clk\ntop:data[7:0]\n");
    assert!(stderr(&out).is_empty());
}

#[test]
fn list_json() {
    let dir = workspace();
    let out = vcdscope(dir.path(), &["-q", "list", "dump.vcd", "--format", "json"]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["max_time"], 12);
    assert_eq!(json["signals"].as_array().unwrap().len(), 2);
}

#[test]
fn show_window() {
    let dir = workspace();
    let out = vcdscope(
        dir.path(),
        &["-q", "--color", "never", "show", "dump.vcd", "top:clk", "--length", "12"],
    );
    assert!(out.status.success());
    assert_eq!(stdout(&out), "       0    5    10\nclk  : _____/‾‾‾‾\\_\n");
}

#[test]
fn show_unknown_key_fails() {
    let dir = workspace();
    let out = vcdscope(dir.path(), &["-q", "show", "dump.vcd", "top:nope"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("error: no signal named `top:nope`"));
}

#[test]
fn value_query() {
    let dir = workspace();
    let out = vcdscope(dir.path(), &["-q", "value", "dump.vcd", "top:data[7:0]", "11"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "top:data[7:0] @ 11 = 0xff (since #10)\n");
}

#[test]
fn gzipped_input() {
    let dir = workspace();
    let path = dir.path().join("dump.vcd.gz");
    let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    encoder.write_all(DUMP.as_bytes()).unwrap();
    encoder.finish().unwrap();
    let out = vcdscope(dir.path(), &["-q", "value", "dump.vcd.gz", "top:clk", "5"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "top:clk @ 5 = 1 (since #5)\n");
}

#[test]
fn parse_error_reports_position() {
    let dir = workspace();
    std::fs::write(dir.path().join("bad.vcd"), "$var wire 1 ! clk $end\n#0\n").unwrap();
    let out = vcdscope(dir.path(), &["list", "bad.vcd"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("error: bad.vcd:2:1"));
}

#[test]
fn missing_file_fails() {
    let dir = workspace();
    let out = vcdscope(dir.path(), &["list", "absent.vcd"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("cannot read absent.vcd"));
}

#[test]
fn warnings_are_rendered() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("warn.vcd"),
        format!("{DUMP}1?\n"),
    )
    .unwrap();
    let out = vcdscope(dir.path(), &["--color", "never", "list", "warn.vcd"]);
    assert!(out.status.success());
    let err = stderr(&out);
    assert!(err.contains("warning[W101]"));
    assert!(err.contains("--> warn.vcd:17:"));

    let quiet = vcdscope(dir.path(), &["-q", "list", "warn.vcd"]);
    assert!(stderr(&quiet).is_empty());
}

#[test]
fn config_file_sets_window() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("vcdscope.toml"),
        "[view]\nlength = 6\nname_width = 3\n",
    )
    .unwrap();
    let out = vcdscope(dir.path(), &["-q", "--color", "never", "show", "dump.vcd", "top:clk"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "     0    5\nclk: _____/\n");
}

#[test]
fn invalid_config_fails() {
    let dir = workspace();
    std::fs::write(dir.path().join("alt.toml"), "[view]\nstride = 0\n").unwrap();
    let out = vcdscope(dir.path(), &["--config", "alt.toml", "list", "dump.vcd"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("stride"));
}

#[test]
fn view_command_loop() {
    let dir = workspace();
    let mut child = Command::new(env!("CARGO_BIN_EXE_vcdscope"))
        .current_dir(dir.path())
        .args(["-q", "--color", "never", "view", "dump.vcd"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"aa\nsc\nr 0 16\nt\nq\n")
        .unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("added 2 signals"));
    assert!(text.contains("clk  : _____/‾‾‾‾\\_____\n"));
    assert!(text.contains("data : ╳0x0      ╳0xff \n"));
    assert!(text.contains("timescale 1ns, max time #12, window #0..#16 (stride 1)"));
    let saved = std::fs::read_to_string(dir.path().join("signals.json")).unwrap();
    assert!(saved.contains("top:data[7:0]"));
}
