//! The stylesheet side of the workspace
//!
//! Covers CSS, SCSS and Less documents: a lenient single pass parser that
//! extracts selector and custom property parts, a per-document service
//! caching that parse, and the map that keys services by document version.

pub mod parser;
pub mod service;
pub mod service_map;
