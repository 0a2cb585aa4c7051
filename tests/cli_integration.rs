use std::fs;
use std::path::Path;
use std::process::Command;

fn run_csvfit(args: &[&str], cwd: &Path) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_csvfit"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("run csvfit");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn no_matches_reports_zero_files_and_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();

    let (ok, stdout, stderr) = run_csvfit(&["*.csv"], dir.path());

    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("A total of 0 csv files will be processed."));
    assert!(!stdout.contains("All files processed"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn quoted_pattern_is_expanded_and_plotted() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("data1.csv"), "x,y\n0,1\n1,2\n2,4\n").unwrap();
    fs::write(dir.path().join("bad.csv"), "x,y\n0,1\nn/a,2\n").unwrap();
    fs::write(dir.path().join("readme.txt"), "not data").unwrap();

    let (ok, stdout, stderr) = run_csvfit(&["*"], dir.path());

    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("A total of 2 csv files will be processed."));
    assert!(stdout.contains("Processing file 1 of 2"));
    assert!(stdout.contains("Could not process file bad.csv."));
    assert!(stdout.contains("All files processed"));
    assert!(dir.path().join("data1_output.png").exists());
    assert!(!dir.path().join("bad_output.png").exists());
    assert!(!dir.path().join("fit_data_output.csv").exists());
}
