//! Test helpers para cnam-server.

#![allow(dead_code, unused_imports)]

pub mod app;
pub mod assertions;
pub mod client;

pub use app::{StubProvider, TestApp, key};
pub use assertions::*;
pub use client::{TestClient, TestResponse};
