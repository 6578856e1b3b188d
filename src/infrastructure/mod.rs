pub mod filesystem;
pub mod hooks;
pub mod memory;
pub mod plugins;
pub mod repository;
pub mod xml_codec;

#[cfg(test)]
pub mod test_utils;

pub use filesystem::*;
pub use hooks::*;
pub use memory::*;
pub use plugins::*;
pub use repository::*;
pub use xml_codec::*;
