pub mod gate;
pub mod password;
pub mod token;
