pub mod capture_config;
