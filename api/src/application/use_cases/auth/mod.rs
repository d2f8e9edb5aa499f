pub mod authenticate;
pub mod login;
pub mod register;
