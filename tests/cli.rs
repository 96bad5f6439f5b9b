//! Runs the built binary and checks its report and exit status.

use std::process::Command;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_melb-regression"))
}

#[test]
fn fit_prints_formula_and_one_mae_line() {
    let output = binary()
        .args(["-q", "fit", "--input", "testdata/melb_sample.csv"])
        .output()
        .expect("binary runs");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Regression Formula:"));
    let mae_lines: Vec<&str> = stdout.lines().filter(|l| l.starts_with("MAE = ")).collect();
    assert_eq!(mae_lines.len(), 1);

    let value: f64 = mae_lines[0]["MAE = ".len()..].parse().expect("numeric MAE");
    assert!(value >= 0.0);
    let decimals = mae_lines[0].rsplit('.').next().unwrap_or_default();
    assert_eq!(decimals.len(), 2);
}

#[test]
fn missing_input_exits_non_zero() {
    let output = binary()
        .args(["-q", "fit", "--input", "testdata/absent.csv"])
        .output()
        .expect("binary runs");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("load stage failed"));
    assert!(stderr.contains("absent.csv"));
}

#[test]
fn unknown_column_exits_non_zero() {
    let output = binary()
        .args([
            "-q",
            "fit",
            "--input",
            "testdata/melb_sample.csv",
            "--target",
            "SalePrice",
        ])
        .output()
        .expect("binary runs");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("SalePrice"));
}

#[test]
fn describe_lists_columns() {
    let output = binary()
        .args(["-q", "describe", "--input", "testdata/melb_sample.csv", "--head", "0"])
        .output()
        .expect("binary runs");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Rows: 20  Columns: 7"));
    assert!(stdout.contains("Landsize"));
}

#[test]
fn fit_with_plots_reports_then_renders() {
    let dir = tempfile::tempdir().expect("temp dir");
    let hist_dir = dir.path().join("hist");
    let scatter_dir = dir.path().join("scatter");
    let output = binary()
        .args(["-q", "fit", "--input", "testdata/melb_sample.csv", "--plots"])
        .arg("--hist-dir")
        .arg(&hist_dir)
        .arg("--scatter-dir")
        .arg(&scatter_dir)
        .args(["--columns", "Nope,Distance"])
        .output()
        .expect("binary runs");

    // A failing plot never changes the exit status or the report
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim_end().ends_with(|c: char| c.is_ascii_digit()));
    assert_eq!(stdout.lines().filter(|l| l.starts_with("MAE = ")).count(), 1);
    assert!(hist_dir.join("Distance_hist.png").exists());
    assert!(scatter_dir.join("Distance_scatter.png").exists());
}
