use std::io::Write;

use lounge_cli::run;
use serde_json::Value;
use serial_test::serial;

fn run_args(args: &[&str]) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(args.iter().copied(), &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

fn clear_env() {
    for key in [
        "LOUNGE_CONFIG",
        "LOUNGE_SEED",
        "LOUNGE_VARIANT",
        "LOUNGE_SEATS",
        "LOUNGE_STACK",
        "LOUNGE_POLICY",
    ] {
        unsafe {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn eval_prints_category_and_key() {
    let (code, stdout, _) = run_args(&["lounge", "eval", "Kh", "Kd", "Ks", "7c", "7d", "2s"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Category: Full House (Three of a kind with a pair)"));
    assert!(stdout.contains("Hand: Full House, Kings over Sevens"));
    assert!(stdout.contains("Key: 13 7"));
}

#[test]
fn eval_errors_exit_with_two() {
    let (code, _, stderr) = run_args(&["lounge", "eval", "As", "Ks", "Qs", "Js"]);
    assert_eq!(code, 2);
    assert!(stderr.starts_with("Error:"));
}

#[test]
#[serial]
fn deal_is_deterministic_per_seed() {
    clear_env();
    let args = ["lounge", "deal", "--players", "2", "--seed", "42"];
    let (code, first, _) = run_args(&args);
    assert_eq!(code, 0);
    let (_, second, _) = run_args(&args);
    assert_eq!(first, second);
    assert!(first.contains("p1 (seat 1): "));
    assert!(first.contains("p2 (seat 2): "));
    assert!(first.contains("Board: "));
}

#[test]
#[serial]
fn deal_uses_the_configured_seed() {
    clear_env();
    unsafe {
        std::env::set_var("LOUNGE_SEED", "77");
    }
    let (code, stdout, _) = run_args(&["lounge", "deal"]);
    clear_env();
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Seed: 77\n"));
}

#[test]
#[serial]
fn cfg_shows_defaults() {
    clear_env();
    let (code, stdout, _) = run_args(&["lounge", "cfg"]);
    assert_eq!(code, 0);
    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["variant"]["value"], "holdem");
    assert_eq!(json["variant"]["source"], "default");
    assert_eq!(json["starting_stack"]["value"], 1000);
    assert_eq!(json["policy"]["value"], "baseline");
}

#[test]
#[serial]
fn cfg_env_beats_file() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "seed = 456\nvariant = \"omaha\"\nstarting_stack = 500").unwrap();
    unsafe {
        std::env::set_var("LOUNGE_CONFIG", file.path());
        std::env::set_var("LOUNGE_STACK", "2500");
    }
    let (code, stdout, stderr) = run_args(&["lounge", "cfg"]);
    clear_env();
    assert_eq!(code, 0, "stderr: {}", stderr);

    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["seed"]["value"], 456);
    assert_eq!(json["seed"]["source"], "file");
    assert_eq!(json["variant"]["value"], "omaha");
    assert_eq!(json["starting_stack"]["value"], 2500);
    assert_eq!(json["starting_stack"]["source"], "env");
    assert_eq!(json["seats"]["source"], "default");
}

#[test]
#[serial]
fn invalid_config_is_reported_not_defaulted() {
    clear_env();
    unsafe {
        std::env::set_var("LOUNGE_SEATS", "eleven");
    }
    let (cfg_code, _, cfg_err) = run_args(&["lounge", "cfg"]);
    let (deal_code, _, _) = run_args(&["lounge", "deal", "--seed", "1"]);
    clear_env();
    assert_eq!(cfg_code, 2);
    assert_eq!(cfg_err.lines().count(), 1);
    assert!(cfg_err.contains("LOUNGE_SEATS"));
    assert_eq!(deal_code, 2);
}
