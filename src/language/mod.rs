//! Building blocks shared by both language families

pub mod document;
pub mod part;
pub mod scanner;
