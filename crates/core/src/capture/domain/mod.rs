pub mod capture_trigger;
