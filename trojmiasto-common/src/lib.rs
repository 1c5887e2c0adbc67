//! Shared constants and utilities for the trojmiasto workspace.
//!
//! This crate pins down the remote endpoints every other crate talks to and
//! hosts the centralised logging initialisation. It is intentionally
//! lightweight and dependency-minimal so that all crates can depend on it
//! without introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`BASE_URL`], [`SEARCH_URL`], [`OBFUSCATOR_URL`]: remote endpoints
//! - [`WHITELISTED_DOMAINS`]: listing mirrors accepted as offer sources
//! - [`observability`]: centralised tracing/logging initialisation

pub mod observability;

/// Root of the classifieds site; direct listing paths hang off this.
pub const BASE_URL: &str = "http://ogloszenia.trojmiasto.pl";

/// Search engine endpoint; a form POST here redirects to the listing URL.
pub const SEARCH_URL: &str = "https://ogloszenia.trojmiasto.pl/szukaj/";

/// Contact-detail deobfuscation endpoint.
pub const OBFUSCATOR_URL: &str = "http://ogloszenia.trojmiasto.pl/_ajax/obfuscator/?decode";

/// External domains whose offer links are accepted alongside the site's own.
pub const WHITELISTED_DOMAINS: [&str; 2] = ["olx.pl", "www.olx.pl"];
