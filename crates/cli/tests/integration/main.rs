mod common;
mod download_tests;
mod list_tests;
mod remove_tests;
mod update_tests;
