//! The markup side of the workspace
//!
//! Covers HTML, JSX/TSX and Vue documents: a lenient single pass parser that
//! extracts class, id and custom element parts (delegating `<style>` block
//! content to the stylesheet parser), a per-document service caching that
//! parse, and the map that keys services by document version.

pub mod parser;
pub mod service;
pub mod service_map;
