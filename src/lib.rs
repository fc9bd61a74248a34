//! Shelf application library
//!
//! Catalog modules, their storage, and the bootstrap that wires them into the
//! module registry and HTTP server.

pub mod bootstrap;
pub mod modules;
pub mod seed;
pub mod utils;

pub use modules::books::{
    models::{Book, CreateBook, UpdateBook},
    repository::{BookRepository, InMemoryBookRepository, MongoBookRepository},
};
