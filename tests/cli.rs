#![cfg(all(feature = "std", not(loom)))]

use std::process::Command;

fn axiom_ticket() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_axiom-ticket"));
    cmd.env_remove("RUST_LOG")
        .env_remove("AXIOM_THREADS")
        .env_remove("AXIOM_ITERATIONS")
        .env_remove("AXIOM_SCOPE");
    cmd
}

#[test]
fn failure_is_reported_once() {
    let output = axiom_ticket().args(["--threads", "0"]).output().unwrap();

    assert!(!output.status.success(), "zero threads should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("threads must be at least 1").count(),
        1,
        "error printed more than once:\n{stderr}"
    );
    assert!(!stderr.contains("InvalidConfig"), "Debug form leaked:\n{stderr}");
}

#[test]
fn small_run_prints_report() {
    let output = axiom_ticket()
        .args(["--threads", "2", "--iterations", "100", "--scope", "block"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("scope:        block"));
    assert!(stdout.contains("increments:   200"));
}
