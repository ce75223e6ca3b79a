//! Core data models for articles and their authors.

mod article;

pub use article::{Article, User};
