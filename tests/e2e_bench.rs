mod support;

use std::io::Write;
use std::net::SocketAddr;

use support::run_dfsbench;
use support::{spawn_error_server_or_skip, spawn_http_server_or_skip};

fn write_payload() -> Result<tempfile::NamedTempFile, String> {
    let mut file = tempfile::NamedTempFile::new()
        .map_err(|err| format!("create payload failed: {}", err))?;
    file.write_all(b"dfsbench e2e payload")
        .map_err(|err| format!("write payload failed: {}", err))?;
    Ok(file)
}

fn bench_args(addr: SocketAddr, file: &str, tail: &[&str]) -> Vec<String> {
    let mut args = vec![
        "-H".to_owned(),
        addr.ip().to_string(),
        "-P".to_owned(),
        addr.port().to_string(),
        "-f".to_owned(),
        file.to_owned(),
        "--no-color".to_owned(),
    ];
    args.extend(tail.iter().map(|arg| (*arg).to_owned()));
    args
}

#[test]
fn e2e_write_reports_both_phases() -> Result<(), String> {
    let Some((addr, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let payload = write_payload()?;
    let file = payload.path().display().to_string();

    let output = run_dfsbench(bench_args(addr, &file, &["-n", "3", "-b", "5", "write"]))?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sequential benchmarking:"));
    assert!(stdout.contains("Trials: 3"));
    assert!(stdout.contains("Mean:"));
    assert!(stdout.contains("Burst benchmarking:"));
    assert!(stdout.contains("Requests: 5"));
    assert!(stdout.contains("Throughput:"));
    Ok(())
}

#[test]
fn e2e_read_reports_both_phases() -> Result<(), String> {
    let Some((addr, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let payload = write_payload()?;
    let file = payload.path().display().to_string();

    let output = run_dfsbench(bench_args(addr, &file, &["-n", "2", "-b", "3", "read"]))?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sequential benchmarking:"));
    assert!(stdout.contains("Trials: 2"));
    assert!(stdout.contains("Burst benchmarking:"));
    assert!(stdout.contains("Requests: 3"));
    Ok(())
}

#[test]
fn e2e_mixed_reports_batches() -> Result<(), String> {
    let Some((addr, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let payload = write_payload()?;
    let file = payload.path().display().to_string();

    let output = run_dfsbench(bench_args(addr, &file, &["-n", "2", "mixed"]))?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Mixed benchmarking (write + read):"));
    assert!(stdout.contains("Batches: 2"));
    assert!(stdout.contains("Std Dev:"));
    Ok(())
}

#[test]
fn e2e_server_errors_fail_the_run_but_not_the_phases() -> Result<(), String> {
    let Some((addr, _server)) = spawn_error_server_or_skip()? else {
        return Ok(());
    };
    let payload = write_payload()?;
    let file = payload.path().display().to_string();

    let output = run_dfsbench(bench_args(addr, &file, &["-n", "2", "-b", "2", "write"]))?;
    assert!(!output.status.success());

    // Both phases still ran; each failure was reported in place.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sequential benchmarking:"));
    assert!(stdout.contains("Burst benchmarking:"));
    assert!(stdout.contains("Sequential benchmark failed"));
    assert!(stdout.contains("Burst benchmark failed"));
    Ok(())
}

#[test]
fn e2e_concurrency_limit_and_op_timeout_flags_parse() -> Result<(), String> {
    let Some((addr, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let payload = write_payload()?;
    let file = payload.path().display().to_string();

    let output = run_dfsbench(bench_args(
        addr,
        &file,
        &[
            "-n",
            "2",
            "-b",
            "4",
            "--concurrency-limit",
            "2",
            "--op-timeout",
            "5s",
            "write",
        ],
    ))?;
    assert!(output.status.success());
    Ok(())
}
