//! Linux adapters for the resolution engine: neighbor-table readers and network scanners.
pub mod process;
pub mod scanner;
pub mod system;
