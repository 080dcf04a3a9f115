//! Runs the binary headless and checks its output files and exit codes.

use std::fs;
use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pi-energy-sim"))
}

#[test]
fn headless_run_prints_samples_and_exports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("run.csv");

    let output = bin()
        .args(["--seed", "1", "--ticks", "5", "--export"])
        .arg(&path)
        .output()
        .expect("binary should run");
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().filter(|l| l.starts_with("t=")).count(), 5);
    assert!(stdout.contains("Run Summary"));

    let csv = fs::read_to_string(&path).expect("export written");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "Time,Voltage(V),Current(mA),Power(mW)");
    assert!(lines[1].starts_with("0,"));
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        bin()
            .args(["--seed", "77", "--ticks", "20"])
            .output()
            .expect("binary should run")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn invalid_configuration_exits_nonzero() {
    let output = bin()
        .args(["--voltage", "12"])
        .output()
        .expect("binary should run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parameters.voltage"), "{stderr}");
}

#[test]
fn config_file_is_loaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sim.toml");
    fs::write(
        &path,
        "[simulation]\nseed = 3\n\n[parameters]\nvoltage = 5.0\nresistance = 100.0\n\n[noise]\nvoltage_jitter_v = 0.0\ncurrent_jitter_ratio = 0.0\npower_jitter_ratio = 0.0\n",
    )
    .expect("write config");

    let output = bin()
        .arg("--config")
        .arg(&path)
        .args(["--ticks", "1"])
        .output()
        .expect("binary should run");
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("I=  50.000 mA"), "{stdout}");
}
