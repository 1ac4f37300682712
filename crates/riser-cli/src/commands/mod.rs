pub mod generate;
pub mod partition;
pub mod solve;
pub mod util;
pub mod validate;
