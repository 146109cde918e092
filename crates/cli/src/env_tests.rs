// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn log_filter_defaults_to_warn() {
    std::env::remove_var("TIDY_LOG");
    assert_eq!(log_filter(), "warn");
    std::env::set_var("TIDY_LOG", "  ");
    assert_eq!(log_filter(), "warn");
    std::env::set_var("TIDY_LOG", "tidy_engine=debug");
    assert_eq!(log_filter(), "tidy_engine=debug");
    std::env::remove_var("TIDY_LOG");
}

#[test]
#[serial]
fn empty_config_path_is_unset() {
    std::env::set_var("TIDY_CONFIG", "");
    assert_eq!(config_path(), None);
    std::env::set_var("TIDY_CONFIG", "/etc/tidy.toml");
    assert_eq!(config_path(), Some(PathBuf::from("/etc/tidy.toml")));
    std::env::remove_var("TIDY_CONFIG");
}

#[test]
#[serial]
fn log_file_reads_env() {
    std::env::remove_var("TIDY_LOG_FILE");
    assert_eq!(log_file(), None);
    std::env::set_var("TIDY_LOG_FILE", "/tmp/tidy.log");
    assert_eq!(log_file(), Some(PathBuf::from("/tmp/tidy.log")));
    std::env::remove_var("TIDY_LOG_FILE");
}
