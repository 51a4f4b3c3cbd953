use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

fn maze_runner(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_maze-runner"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to invoke the maze-runner binary")
}

fn dump(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "maze-runner-{}-{name}.txt",
        std::process::id()
    ));
    fs::write(&path, contents).expect("temporary grid dump");
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 output")
}

#[test]
fn new_prints_an_open_grid() {
    let output = maze_runner(&["new", "--rows", "2", "--columns", "3"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "0 0 0\n0 0 0\n");
}

#[test]
fn solve_prints_both_fields() {
    let file = dump("solve", "1 0 0\n-1 -1 0\n7 0 0\n");

    let output = maze_runner(&["solve", file.to_str().expect("utf-8 path")]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "fully reachable: true\n\
         distances:\n\
         \x200  1  2\n\
         -1 -1  3\n\
         \x206  5  4\n\
         directions:\n\
         X<<\n\
         ##^\n\
         >>^\n"
    );
}

#[test]
fn path_reports_unreachable_start() {
    let file = dump("path", "1 -1 0\n");

    let reachable = maze_runner(&["path", file.to_str().expect("utf-8 path"), "0", "0"]);
    let stranded = maze_runner(&["path", file.to_str().expect("utf-8 path"), "0", "2"]);

    assert!(reachable.status.success());
    assert_eq!(stdout(&reachable), "(0, 0)\n");
    assert!(!stranded.status.success());
    assert!(String::from_utf8_lossy(&stranded.stderr).contains("(0, 2)"));
}

#[test]
fn play_runs_a_headless_session() {
    let file = dump("play", "1 0 0\n-1 -1 0\n7 0 0\n");

    let output = maze_runner(&[
        "play",
        file.to_str().expect("utf-8 path"),
        "--cell-size",
        "4",
        "--tick-ms",
        "50",
        "--block",
        "9,9@0",
    ]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "block (9, 9) at 0.000s: rejected\nactor 0 reached the goal in 6.000s\n"
    );
    assert_eq!(
        fs::read_to_string(&file).expect("grid dump"),
        "1 0 0\n-1 -1 0\n7 0 0\n"
    );
}

#[test]
fn malformed_dump_fails_with_line_number() {
    let file = dump("ragged", "0 0\n0\n");

    let output = maze_runner(&["overlay", file.to_str().expect("utf-8 path")]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));
}
