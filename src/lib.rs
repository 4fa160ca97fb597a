//! Core library for pkce-gen: RFC 7636 code verifiers and S256 challenges.
pub mod config;
pub mod models;
pub mod output;
pub mod pkce;
