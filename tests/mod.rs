mod config_server_tests;
mod config_tests;
