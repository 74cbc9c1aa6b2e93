pub mod logging;
pub mod print_output;
