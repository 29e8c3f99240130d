//! HTTP surface for the ModelMatch engine

pub mod rest;

pub use rest::RestApi;
