//! Authentication module
//!
//! IGDB requests are authorized with a Twitch application token. When only a
//! client id and secret are configured, the token is obtained here through the
//! OAuth2 client-credentials grant.

mod token;

pub use token::{request_app_token, AppToken, TWITCH_TOKEN_URL};

#[cfg(test)]
mod tests;
