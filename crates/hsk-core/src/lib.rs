pub mod align;
pub mod dict;
pub mod pinyin;
pub mod resolve;
pub mod rows;
pub mod settings;
pub mod unicode;
pub mod validate;

#[cfg(test)]
pub(crate) mod testutil;
