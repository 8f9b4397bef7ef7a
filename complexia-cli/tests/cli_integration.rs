use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

struct TestDir {
    path: PathBuf,
}

impl TestDir {
    fn new(tag: &str) -> Self {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let path = std::env::temp_dir().join(format!(
            "complexia_cli_{tag}_{}_{}",
            std::process::id(),
            ts
        ));
        fs::create_dir_all(&path).expect("create temp test dir");
        Self { path }
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_complexia(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_complexia"))
        .args(args)
        .output()
        .expect("run complexia")
}

#[test]
fn one_shot_eval_prints_the_value() {
    let output = run_complexia(&["3 + 5 * 4"]);

    assert!(output.status.success(), "process failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("(23 + 0i)"),
        "expected value in stdout, got: {stdout}"
    );
}

#[test]
fn imaginary_arithmetic() {
    let output = run_complexia(&["3i * 3i"]);

    assert!(output.status.success(), "process failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("(-9 + 0i)"),
        "expected -9 in stdout, got: {stdout}"
    );
}

#[test]
fn leading_minus_is_an_expression_not_a_flag() {
    let output = run_complexia(&["-2^2"]);

    assert!(output.status.success(), "process failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("(-4 + 0i)"),
        "expected -4 in stdout, got: {stdout}"
    );
}

#[test]
fn syntax_error_exits_nonzero() {
    let output = run_complexia(&["3 +- 5"]);

    assert!(!output.status.success(), "expected failure: {output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error"),
        "expected diagnostic on stderr, got: {stderr}"
    );
}

#[test]
fn disasm_lists_the_bytecode() {
    let output = run_complexia(&["--disasm", "2^3"]);

    assert!(output.status.success(), "process failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("const (2 + 0i)"), "got: {stdout}");
    assert!(stdout.contains("pow"), "got: {stdout}");
    assert!(stdout.contains("done"), "got: {stdout}");
}

#[test]
fn graph_writes_an_svg_file() {
    let dir = TestDir::new("graph");
    let out_file = dir.path.join("plot.svg");

    let output = run_complexia(&[
        "--graph",
        out_file.to_str().expect("utf-8 path"),
        "--step",
        "0.5",
        "--window",
        "-1,-1,1,1",
        "sin 0",
    ]);

    assert!(output.status.success(), "process failed: {output:?}");
    let contents = fs::read_to_string(&out_file).expect("read svg output");
    assert!(contents.contains("<svg"), "not an svg: {contents}");
    assert!(contents.contains("<rect"), "no cells: {contents}");
}

#[test]
fn graph_without_expression_is_an_error() {
    let output = run_complexia(&["--graph", "out.svg"]);

    assert!(!output.status.success(), "expected failure: {output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("expression"),
        "expected usage hint, got: {stderr}"
    );
}

#[test]
fn repl_evaluates_lines_until_quit() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_complexia"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn complexia");

    child
        .stdin
        .as_mut()
        .expect("stdin")
        .write_all(b"1 + 1\nq\n")
        .expect("write to repl");

    let output = child.wait_with_output().expect("wait for repl");
    assert!(output.status.success(), "process failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(2 + 0i)"), "got: {stdout}");
}

#[test]
fn repl_survives_a_bad_line() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_complexia"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn complexia");

    child
        .stdin
        .as_mut()
        .expect("stdin")
        .write_all(b"3 +- 5\n2 * 2\nq\n")
        .expect("write to repl");

    let output = child.wait_with_output().expect("wait for repl");
    assert!(output.status.success(), "process failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "expected diagnostic: {stderr}");
    assert!(stdout.contains("(4 + 0i)"), "got: {stdout}");
}
