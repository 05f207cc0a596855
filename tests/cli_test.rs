//! End-to-end tests that drive the `dripcu` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const FIELD_SAMPLE: [&str; 8] = ["3.5", "3.6", "3.8", "3.2", "4.0", "2.0", "3.9", "3.7"];

fn dripcu(dir: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    dripcu_with_env(dir, args, stdin, &[])
}

fn dripcu_with_env(
    dir: &Path,
    args: &[&str],
    stdin: Option<&str>,
    envs: &[(&str, &str)],
) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_dripcu"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("DRIPCU_LOCALE")
        .env_remove("DRIPCU_CONFIG")
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn dripcu");

    {
        let mut pipe = child.stdin.take().expect("stdin pipe");
        if let Some(text) = stdin {
            pipe.write_all(text.as_bytes()).expect("write stdin");
        }
    }
    child.wait_with_output().expect("wait for dripcu")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn calc_with_arguments_reports_deficient() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = vec!["calc"];
    args.extend(FIELD_SAMPLE);
    let output = dripcu(dir.path(), &args, None);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("CU: 75.09 %"), "stdout: {}", out);
    assert!(out.contains("Uniformidad deficiente"));
    assert!(out.contains("Goteros analizados: 8"));
}

#[test]
fn calc_reads_stdin_in_english() {
    let dir = tempfile::tempdir().unwrap();
    let output = dripcu(
        dir.path(),
        &["--locale", "en", "calc"],
        Some("5.0, 5.0, 5.0\n5.0 5.0\n"),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("CU: 100.00 %"));
    assert!(out.contains("Excellent uniformity"));
}

#[test]
fn calc_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("caudales.txt"), FIELD_SAMPLE.join("\n")).unwrap();
    let output = dripcu(dir.path(), &["calc", "--file", "caudales.txt", "--table"], None);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("75.09 %"));
    assert!(out.contains("Caudal (ml)"));
}

#[test]
fn calc_without_values_shows_hint() {
    let dir = tempfile::tempdir().unwrap();
    let output = dripcu(dir.path(), &["calc"], Some("   \n"));

    assert!(output.status.success());
    assert!(stdout(&output).contains("Introduce los caudales para calcular el CU."));
}

#[test]
fn calc_rejects_all_zero_sample() {
    let dir = tempfile::tempdir().unwrap();
    let output = dripcu(dir.path(), &["calc", "0", "0", "0"], None);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("overall mean flow is zero"));
}

#[test]
fn calc_rejects_malformed_value() {
    let dir = tempfile::tempdir().unwrap();
    let output = dripcu(dir.path(), &["calc", "3.5,abc"], None);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("'abc'"));
}

#[test]
fn calc_exports_text_report() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = vec!["calc"];
    args.extend(FIELD_SAMPLE);
    args.extend(["--report", "informe.txt"]);
    let output = dripcu(dir.path(), &args, None);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report = std::fs::read_to_string(dir.path().join("informe.txt")).unwrap();
    assert!(report.contains("CU (Coeficiente de Uniformidad): 75.09 %"));
    assert!(report.contains("2.0, 3.2, 3.5, 3.6, 3.7\n3.8, 3.9, 4.0\n"));
}

#[test]
fn calc_report_uses_default_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let output = dripcu(
        dir.path(),
        &["calc", "--format", "md", "--report"],
        Some("4 4 4 4"),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report =
        std::fs::read_to_string(dir.path().join("informe_CU_riego_goteo.md")).unwrap();
    assert!(report.starts_with("# Informe"));
}

#[test]
fn calc_prints_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let output = dripcu(
        dir.path(),
        &["calc", "--report", "-", "--format", "json"],
        Some("5 5 5 5"),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("\"category\": \"EXCELLENT\""));
    assert!(out.contains("\"locale\": \"es\""));
}

#[test]
fn config_file_sets_locale_and_chart() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("dripcu.toml"),
        "locale = \"en\"\n\n[display]\nchart = true\nchart_width = 10\n",
    )
    .unwrap();
    let output = dripcu(dir.path(), &["calc", "4", "2"], None);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Emitters analyzed: 2"));
    assert!(out.contains("██████████ 4.0"));
}

#[test]
fn locale_env_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("dripcu.toml"), "locale = \"es\"\n").unwrap();
    let output = dripcu_with_env(
        dir.path(),
        &["calc", "5", "5", "5", "5"],
        None,
        &[("DRIPCU_LOCALE", "en")],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Excellent uniformity"), "stdout: {}", out);
    assert!(!out.contains("Uniformidad"));
}

#[test]
fn locale_flag_overrides_env() {
    let dir = tempfile::tempdir().unwrap();
    let output = dripcu_with_env(
        dir.path(),
        &["--locale", "es", "calc", "5", "5", "5", "5"],
        None,
        &[("DRIPCU_LOCALE", "en")],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Uniformidad excelente"), "stdout: {}", out);
}

#[test]
fn invalid_locale_env_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dripcu_with_env(dir.path(), &["calc", "1"], None, &[("DRIPCU_LOCALE", "xx")]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("DRIPCU_LOCALE"));
}

#[test]
fn shell_honors_display_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("dripcu.toml"),
        "locale = \"en\"\n\n[display]\ntable = true\nchart = true\nchart_width = 10\n",
    )
    .unwrap();
    let output = dripcu(dir.path(), &["shell"], Some("4 2\nquit\n"));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Flow (ml)"), "stdout: {}", out);
    assert!(out.contains("██████████ 4.0"));
}

#[test]
fn deficient_result_shows_advice() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = vec!["--locale", "en", "calc"];
    args.extend(FIELD_SAMPLE);
    let output = dripcu(dir.path(), &args, None);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Check for clogged emitters"));
}

#[test]
fn invalid_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.toml"), "[report]\ngroup_size = 0\n").unwrap();
    let output = dripcu(dir.path(), &["--config", "bad.toml", "calc", "1"], None);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("group_size"));
}

#[test]
fn grid_collects_one_value_per_emitter() {
    let dir = tempfile::tempdir().unwrap();
    let output = dripcu(
        dir.path(),
        &["--locale", "en", "grid", "-n", "4", "--columns", "2"],
        Some("4\n4\n\n4\n"),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Emitter 3 [row 2, col 1]: "));
    assert!(out.contains("CU: 0.00 %"));
    assert!(out.contains("Very deficient uniformity"));
}

#[test]
fn shell_keeps_last_result() {
    let dir = tempfile::tempdir().unwrap();
    let output = dripcu(
        dir.path(),
        &["--locale", "en", "shell"],
        Some("5 5 5 5\n0 0\ntable\nreport out.txt\nquit\n"),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("CU: 100.00 %"));
    assert!(stderr(&output).contains("overall mean flow is zero"));
    let report = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert!(report.contains("CU (Uniformity Coefficient): 100.00 %"));
    assert!(report.contains("5.0, 5.0, 5.0, 5.0"));
}
