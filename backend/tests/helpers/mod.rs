use std::fs;
use std::path::PathBuf;

use dotenvy::dotenv;

use scripture_backend::formats::{convert_book, ConvertOptions};
use scripture_backend::types::BookOutputs;
use scripture_backend::verse_table::CanonicalVerseTable;

pub fn setup() {
    dotenv().ok();
}

pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

pub fn read_fixture(name: &str) -> String {
    fs::read_to_string(data_path(name)).expect("Can't read fixture")
}

#[allow(dead_code)]
pub fn convert_fixture(name: &str, options: &ConvertOptions) -> BookOutputs {
    setup();
    convert_book(&read_fixture(name), CanonicalVerseTable::standard(), options).expect("Can't convert fixture")
}

#[allow(dead_code)]
pub fn fixture_html(name: &str) -> String {
    convert_fixture(name, &ConvertOptions::default()).html
}
