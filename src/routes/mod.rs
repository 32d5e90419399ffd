pub(crate) mod admin;
pub(crate) mod auth;
pub(crate) mod health;
pub(crate) mod users;
pub(crate) mod wallet;
